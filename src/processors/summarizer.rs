use crate::models::{
    AggregateRow, BuildingSummaryRow, CampusSummary, Granularity, MeterRecord, PeakDay, PeakLookup,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy)]
struct KwhStats {
    total: f64,
    count: usize,
    min: f64,
    max: f64,
}

impl KwhStats {
    fn new(kwh: f64) -> Self {
        Self {
            total: kwh,
            count: 1,
            min: kwh,
            max: kwh,
        }
    }

    fn add(&mut self, kwh: f64) {
        self.total += kwh;
        self.count += 1;
        self.min = self.min.min(kwh);
        self.max = self.max.max(kwh);
    }
}

/// Per-building statistics and campus-wide headline numbers
pub struct Summarizer;

impl Summarizer {
    pub fn new() -> Self {
        Self
    }

    /// One row per building observed, sorted by building name
    pub fn building_summary(&self, records: &[MeterRecord]) -> Vec<BuildingSummaryRow> {
        self.building_stats(records)
            .into_iter()
            .map(|(building, stats)| BuildingSummaryRow {
                building: building.to_string(),
                total_kwh: stats.total,
                mean_kwh: stats.total / stats.count as f64,
                min_kwh: stats.min,
                max_kwh: stats.max,
                readings_count: stats.count,
            })
            .collect()
    }

    /// Campus totals. An empty input yields `CampusSummary::degenerate()`
    /// rather than an error.
    pub fn campus_summary(&self, records: &[MeterRecord], daily: &[AggregateRow]) -> CampusSummary {
        if records.is_empty() {
            return CampusSummary::degenerate();
        }

        let per_building = self.building_stats(records);
        let total_campus_kwh = per_building.values().map(|s| s.total).sum();

        // Iteration is in name order and only a strictly larger total
        // replaces the leader, so ties go to the alphabetically first name.
        let highest_building = per_building
            .iter()
            .fold(None::<(&str, f64)>, |best, (&name, stats)| match best {
                Some((_, total)) if total >= stats.total => best,
                _ => Some((name, stats.total)),
            })
            .map(|(name, _)| name.to_string())
            .unwrap_or_else(|| CampusSummary::degenerate().highest_building);

        CampusSummary {
            total_campus_kwh,
            highest_building,
            peak_lookup: self.peak_lookup(records),
            peak_day: self.peak_day(daily),
        }
    }

    /// Timestamp of the single largest reading; the earliest wins a tie
    pub fn peak_lookup(&self, records: &[MeterRecord]) -> PeakLookup {
        if records.is_empty() {
            return PeakLookup::NotFound;
        }

        let peak = records
            .iter()
            .filter(|r| r.has_finite_kwh())
            .fold(None::<&MeterRecord>, |best, r| match best {
                Some(b) if b.kwh >= r.kwh => Some(b),
                _ => Some(r),
            });

        match peak {
            Some(record) => PeakLookup::Found(record.timestamp),
            None => PeakLookup::Error("no finite kWh readings".to_string()),
        }
    }

    /// Day with the largest campus-wide daily total
    pub fn peak_day(&self, daily: &[AggregateRow]) -> Option<PeakDay> {
        let mut per_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for row in daily.iter().filter(|r| r.granularity == Granularity::Daily) {
            *per_day.entry(row.bucket_start.date()).or_insert(0.0) += row.kwh;
        }

        per_day
            .into_iter()
            .fold(None::<PeakDay>, |best, (day, kwh)| match best {
                Some(b) if b.kwh >= kwh => Some(b),
                _ => Some(PeakDay { day, kwh }),
            })
    }

    fn building_stats<'a>(&self, records: &'a [MeterRecord]) -> BTreeMap<&'a str, KwhStats> {
        let mut stats: BTreeMap<&str, KwhStats> = BTreeMap::new();

        for record in records.iter().filter(|r| r.has_finite_kwh()) {
            stats
                .entry(record.building.as_str())
                .and_modify(|s| s.add(record.kwh))
                .or_insert_with(|| KwhStats::new(record.kwh));
        }

        stats
    }
}

impl Default for Summarizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::TimeBucketAggregator;
    use chrono::NaiveDateTime;
    use pretty_assertions::assert_eq;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn sample() -> Vec<MeterRecord> {
        vec![
            MeterRecord::new(at(1, 0), 10.0, "library"),
            MeterRecord::new(at(1, 0), 5.0, "gym"),
            MeterRecord::new(at(2, 0), 20.0, "library"),
        ]
    }

    #[test]
    fn test_building_summary() {
        let rows = Summarizer::new().building_summary(&sample());

        assert_eq!(
            rows,
            vec![
                BuildingSummaryRow {
                    building: "gym".to_string(),
                    total_kwh: 5.0,
                    mean_kwh: 5.0,
                    min_kwh: 5.0,
                    max_kwh: 5.0,
                    readings_count: 1,
                },
                BuildingSummaryRow {
                    building: "library".to_string(),
                    total_kwh: 30.0,
                    mean_kwh: 15.0,
                    min_kwh: 10.0,
                    max_kwh: 20.0,
                    readings_count: 2,
                },
            ]
        );
    }

    #[test]
    fn test_campus_summary() {
        let records = sample();
        let daily = TimeBucketAggregator::new().daily_totals(&records);
        let summary = Summarizer::new().campus_summary(&records, &daily);

        assert_eq!(summary.total_campus_kwh, 35.0);
        assert_eq!(summary.highest_building, "library");
        assert_eq!(summary.peak_lookup, PeakLookup::Found(at(2, 0)));
        assert_eq!(
            summary.peak_day,
            Some(PeakDay {
                day: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                kwh: 20.0,
            })
        );
    }

    #[test]
    fn test_empty_campus_summary_is_degenerate() {
        let summary = Summarizer::new().campus_summary(&[], &[]);
        assert_eq!(summary, CampusSummary::degenerate());
        assert_eq!(summary.peak_time(), None);
    }

    #[test]
    fn test_highest_building_tie_goes_to_first_name() {
        let records = vec![
            MeterRecord::new(at(1, 0), 10.0, "zoo"),
            MeterRecord::new(at(1, 1), 10.0, "arts"),
        ];
        let summary = Summarizer::new().campus_summary(&records, &[]);
        assert_eq!(summary.highest_building, "arts");
        assert_eq!(summary.peak_day, None);
    }

    #[test]
    fn test_peak_tie_keeps_earliest_reading() {
        let records = vec![
            MeterRecord::new(at(1, 0), 9.0, "a"),
            MeterRecord::new(at(1, 5), 9.0, "b"),
        ];
        assert_eq!(
            Summarizer::new().peak_lookup(&records),
            PeakLookup::Found(at(1, 0))
        );
    }

    #[test]
    fn test_peak_lookup_without_finite_readings() {
        let records = vec![MeterRecord::new(at(1, 0), f64::NAN, "a")];
        let lookup = Summarizer::new().peak_lookup(&records);
        assert!(matches!(lookup, PeakLookup::Error(_)));
        assert_eq!(lookup.timestamp(), None);
    }
}
