use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::UnifiedDataset;
use crate::utils::constants::NOT_AVAILABLE;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeterReading {
    pub timestamp: NaiveDateTime,
    pub kwh: f64,
}

impl MeterReading {
    pub fn new(timestamp: NaiveDateTime, kwh: f64) -> Self {
        Self { timestamp, kwh }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingReport {
    pub building: String,
    pub total_kwh: f64,
    pub peak_kwh: f64,
    pub peak_time: String,
    pub readings_count: usize,
}

#[derive(Debug, Clone)]
pub struct Building {
    pub name: String,
    readings: Vec<MeterReading>,
}

impl Building {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            readings: Vec::new(),
        }
    }

    pub fn add_reading(&mut self, reading: MeterReading) {
        self.readings.push(reading);
    }

    pub fn readings(&self) -> &[MeterReading] {
        &self.readings
    }

    pub fn total_consumption(&self) -> f64 {
        self.readings.iter().map(|r| r.kwh).sum()
    }

    /// Largest single reading; the earliest one wins a tie
    pub fn peak_load(&self) -> Option<&MeterReading> {
        self.readings.iter().fold(None, |best, r| match best {
            Some(b) if b.kwh >= r.kwh => Some(b),
            _ => Some(r),
        })
    }

    pub fn report(&self) -> BuildingReport {
        let peak = self.peak_load();

        BuildingReport {
            building: self.name.clone(),
            total_kwh: self.total_consumption(),
            peak_kwh: peak.map_or(0.0, |p| p.kwh),
            peak_time: peak.map_or_else(|| NOT_AVAILABLE.to_string(), |p| p.timestamp.to_string()),
            readings_count: self.readings.len(),
        }
    }
}

/// Buildings keyed by name, kept in first-seen order
#[derive(Debug, Default)]
pub struct BuildingManager {
    buildings: Vec<Building>,
    index: HashMap<String, usize>,
}

impl BuildingManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create_building(&mut self, name: &str) -> &mut Building {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                self.buildings.push(Building::new(name));
                let idx = self.buildings.len() - 1;
                self.index.insert(name.to_string(), idx);
                idx
            }
        };
        &mut self.buildings[idx]
    }

    pub fn building(&self, name: &str) -> Option<&Building> {
        self.index.get(name).map(|&idx| &self.buildings[idx])
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn load_from_dataset(&mut self, dataset: &UnifiedDataset) {
        for (building, timestamp, kwh) in dataset.triples() {
            self.get_or_create_building(building)
                .add_reading(MeterReading::new(timestamp, kwh));
        }
    }

    pub fn generate_all_reports(&self) -> Vec<BuildingReport> {
        self.buildings.iter().map(Building::report).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MeterRecord;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_building_peak_and_total() {
        let mut building = Building::new("library");
        building.add_reading(MeterReading::new(at(1, 0), 10.0));
        building.add_reading(MeterReading::new(at(1, 1), 25.0));
        building.add_reading(MeterReading::new(at(1, 2), 25.0));

        assert_eq!(building.total_consumption(), 60.0);
        assert_eq!(building.peak_load().unwrap().timestamp, at(1, 1));

        let report = building.report();
        assert_eq!(report.peak_kwh, 25.0);
        assert_eq!(report.peak_time, "2024-01-01 01:00:00");
        assert_eq!(report.readings_count, 3);
    }

    #[test]
    fn test_empty_building_report() {
        let report = Building::new("annex").report();
        assert_eq!(report.total_kwh, 0.0);
        assert_eq!(report.peak_kwh, 0.0);
        assert_eq!(report.peak_time, "N/A");
        assert_eq!(report.readings_count, 0);
    }

    #[test]
    fn test_manager_keeps_first_seen_order() {
        let dataset = UnifiedDataset::new(vec![
            MeterRecord::new(at(1, 0), 5.0, "gym"),
            MeterRecord::new(at(1, 1), 10.0, "library"),
            MeterRecord::new(at(2, 0), 20.0, "library"),
        ])
        .unwrap();

        let mut manager = BuildingManager::new();
        manager.load_from_dataset(&dataset);

        let reports = manager.generate_all_reports();
        let names: Vec<&str> = reports.iter().map(|r| r.building.as_str()).collect();
        assert_eq!(names, vec!["gym", "library"]);
        assert_eq!(manager.building("library").unwrap().total_consumption(), 30.0);
        assert!(manager.building("pool").is_none());
    }
}
