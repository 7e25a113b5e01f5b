use crate::error::{ProcessingError, Result};
use crate::models::AggregateRow;
use crate::utils::constants::{DASHBOARD_HEIGHT, DASHBOARD_WIDTH};
use chrono::{Duration, NaiveDate};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::collections::BTreeMap;
use std::error::Error;
use std::ops::Range;
use std::path::Path;

type DrawResult = std::result::Result<(), Box<dyn Error>>;

/// Three-panel SVG dashboard: daily consumption lines, average weekly usage
/// bars and peak daily consumption points, one series per building.
pub struct ChartWriter {
    width: u32,
    height: u32,
}

impl ChartWriter {
    pub fn new() -> Self {
        Self {
            width: DASHBOARD_WIDTH,
            height: DASHBOARD_HEIGHT,
        }
    }

    pub fn write_dashboard(&self, daily: &[AggregateRow], weekly: &[AggregateRow], path: &Path) -> Result<()> {
        if daily.is_empty() {
            return Err(ProcessingError::Chart("no daily totals to plot".to_string()));
        }

        self.draw(daily, weekly, path)
            .map_err(|e| ProcessingError::Chart(e.to_string()))
    }

    fn draw(&self, daily: &[AggregateRow], weekly: &[AggregateRow], path: &Path) -> DrawResult {
        let root = SVGBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let panels = root.split_evenly((1, 3));
        draw_daily_lines(&panels[0], daily)?;

        let weekly_mean: Vec<(String, f64)> = per_building(weekly)
            .into_iter()
            .map(|(building, values)| {
                let mean = values.iter().sum::<f64>() / values.len() as f64;
                (building, mean)
            })
            .collect();
        draw_bars(&panels[1], "Average Weekly Usage by Building", "Average Weekly kWh", &weekly_mean)?;

        let peak_daily: Vec<(String, f64)> = per_building(daily)
            .into_iter()
            .map(|(building, values)| {
                let peak = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                (building, peak)
            })
            .collect();
        draw_points(&panels[2], "Peak Daily Consumption by Building", "Peak Daily kWh", &peak_daily)?;

        root.present()?;
        Ok(())
    }
}

impl Default for ChartWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Bucket values grouped by building, in building order
fn per_building(rows: &[AggregateRow]) -> BTreeMap<String, Vec<f64>> {
    let mut grouped: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for row in rows {
        grouped.entry(row.building.clone()).or_default().push(row.kwh);
    }
    grouped
}

/// Value axis always spans zero; negative totals extend it downwards
fn y_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values.fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let lower = if min < 0.0 { min * 1.1 } else { 0.0 };
    let upper = if max > 0.0 { max * 1.1 } else { 1.0 };
    lower..upper
}

fn draw_daily_lines<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, daily: &[AggregateRow]) -> DrawResult
where
    DB::ErrorType: 'static,
{
    // Days are plotted as offsets from the first bucket
    let origin: NaiveDate = daily
        .iter()
        .map(|r| r.bucket_start.date())
        .min()
        .ok_or("no daily totals")?;
    let offset = |day: NaiveDate| (day - origin).num_days() as f64;

    let x_max = daily
        .iter()
        .map(|r| offset(r.bucket_start.date()))
        .fold(0.0_f64, f64::max)
        .max(1.0);
    let y_axis = y_range(daily.iter().map(|r| r.kwh));

    let mut chart = ChartBuilder::on(area)
        .caption("Daily Consumption Over Time", ("sans-serif", 18))
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(0.0..x_max, y_axis)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Daily kWh")
        .x_labels(6)
        .x_label_formatter(&|v| (origin + Duration::days(v.round() as i64)).format("%m-%d").to_string())
        .draw()?;

    let mut series: BTreeMap<&str, Vec<(f64, f64)>> = BTreeMap::new();
    for row in daily {
        series
            .entry(row.building.as_str())
            .or_default()
            .push((offset(row.bucket_start.date()), row.kwh));
    }

    for (idx, (building, points)) in series.into_iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        chart
            .draw_series(LineSeries::new(points, &color))?
            .label(building)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

fn category_chart<'a, DB: DrawingBackend>(
    area: &'a DrawingArea<DB, Shift>,
    title: &str,
    y_desc: &str,
    values: &'a [(String, f64)],
) -> std::result::Result<
    ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    Box<dyn Error>,
>
where
    DB::ErrorType: 'static,
{
    let y_axis = y_range(values.iter().map(|(_, v)| *v));
    let x_max = values.len().max(1) as f64 - 0.5;

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 18))
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(-0.5..x_max, y_axis)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Building")
        .y_desc(y_desc)
        .x_labels(values.len().max(1))
        .x_label_formatter(&|v| {
            let idx = v.round();
            if idx >= 0.0 && (v - idx).abs() < 1e-6 {
                values
                    .get(idx as usize)
                    .map(|(name, _)| name.clone())
                    .unwrap_or_default()
            } else {
                String::new()
            }
        })
        .draw()?;

    Ok(chart)
}

fn draw_bars<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    y_desc: &str,
    values: &[(String, f64)],
) -> DrawResult
where
    DB::ErrorType: 'static,
{
    let mut chart = category_chart(area, title, y_desc, values)?;
    chart.draw_series(values.iter().enumerate().map(|(idx, (_, v))| {
        let x = idx as f64;
        Rectangle::new([(x - 0.35, 0.0), (x + 0.35, *v)], BLUE.mix(0.7).filled())
    }))?;
    Ok(())
}

fn draw_points<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    y_desc: &str,
    values: &[(String, f64)],
) -> DrawResult
where
    DB::ErrorType: 'static,
{
    let mut chart = category_chart(area, title, y_desc, values)?;
    chart.draw_series(
        values
            .iter()
            .enumerate()
            .map(|(idx, (_, v))| Circle::new((idx as f64, *v), 5, RED.filled())),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Granularity;
    use tempfile::TempDir;

    fn row(building: &str, day: u32, kwh: f64, granularity: Granularity) -> AggregateRow {
        AggregateRow {
            building: building.to_string(),
            bucket_start: NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            kwh,
            granularity,
        }
    }

    #[test]
    fn test_write_dashboard_svg() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("dashboard.svg");
        let daily = vec![
            row("gym", 1, 5.0, Granularity::Daily),
            row("library", 1, 10.0, Granularity::Daily),
            row("library", 2, 20.0, Granularity::Daily),
        ];
        let weekly = vec![
            row("gym", 1, 5.0, Granularity::Weekly),
            row("library", 1, 30.0, Granularity::Weekly),
        ];

        ChartWriter::new().write_dashboard(&daily, &weekly, &path)?;

        let svg = std::fs::read_to_string(&path)?;
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Daily Consumption Over Time"));
        Ok(())
    }

    #[test]
    fn test_empty_daily_is_rejected() {
        let dir = TempDir::new().unwrap();
        let result = ChartWriter::new().write_dashboard(&[], &[], &dir.path().join("x.svg"));
        assert!(matches!(result, Err(ProcessingError::Chart(_))));
    }

    #[test]
    fn test_value_axis_covers_negative_totals() {
        let axis = y_range([-5.0, 10.0].into_iter());
        assert!(axis.start <= -5.0);
        assert!(axis.end >= 10.0);

        let axis = y_range([-2.0, -8.0].into_iter());
        assert!(axis.start <= -8.0);
        assert!(axis.end > 0.0);

        assert_eq!(y_range([3.0].into_iter()).start, 0.0);
    }

    #[test]
    fn test_dashboard_with_negative_daily_totals() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("dashboard.svg");
        let daily = vec![
            row("solar_roof", 1, -12.0, Granularity::Daily),
            row("solar_roof", 2, 4.0, Granularity::Daily),
        ];
        let weekly = vec![row("solar_roof", 1, -8.0, Granularity::Weekly)];

        ChartWriter::new().write_dashboard(&daily, &weekly, &path)?;
        assert!(std::fs::read_to_string(&path)?.contains("<svg"));
        Ok(())
    }
}
