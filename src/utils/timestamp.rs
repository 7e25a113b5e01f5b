use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Date-time layouts tried in order. Trailing fractional seconds get their own
/// entry because `%S` alone rejects leftover input.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y", "%Y%m%d"];

/// Offset-carrying layouts besides strict RFC 3339
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%z"];

/// Leniently parse a meter timestamp.
///
/// Timestamps with a UTC offset keep their wall-clock time; no timezone
/// conversion is performed. Returns `None` when no layout matches.
///
/// # Examples
/// ```
/// use campus_energy::utils::parse_timestamp;
///
/// let ts = parse_timestamp("2024-01-02 13:45").unwrap();
/// assert_eq!(ts.to_string(), "2024-01-02 13:45:00");
/// assert!(parse_timestamp("not a date").is_none());
/// ```
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(trimmed, format) {
            return Some(dt.naive_local());
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Canonical `YYYY-MM` period label for a timestamp
pub fn month_label(timestamp: &NaiveDateTime) -> String {
    timestamp.format("%Y-%m").to_string()
}
