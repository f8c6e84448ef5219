// file: src/pipeline/mod.rs
// description: progress tracking shared by the conversion and generation runs
// reference: pipeline orchestration

pub mod progress;

pub use progress::{PipelineStats, ProgressTracker};
