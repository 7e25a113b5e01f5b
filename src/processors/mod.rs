pub mod pipeline;
pub mod summarizer;
pub mod time_buckets;
pub mod trend;

pub use pipeline::{EnergyPipeline, PipelineOutput};
pub use summarizer::Summarizer;
pub use time_buckets::{bucket_start, TimeBucketAggregator};
pub use trend::{TrendCommentator, TrendLabel};
