pub mod building;
pub mod dataset;
pub mod reading;
pub mod summary;

pub use building::{Building, BuildingManager, BuildingReport, MeterReading};
pub use dataset::UnifiedDataset;
pub use reading::{MeterRecord, RawRecord, RowRejection};
pub use summary::{
    AggregateRow, BuildingSummaryRow, CampusSummary, DailyAggregateRow, Granularity, PeakDay,
    PeakLookup, WeeklyAggregateRow,
};
