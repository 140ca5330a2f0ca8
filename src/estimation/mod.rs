pub mod buffer_size;
mod initial_size_estimator;
mod row_size_stats;
mod sampling_size_estimator;
mod size_estimator;
mod two_stage_size_estimator;

pub use buffer_size::{fetch_size_for, target_buffer_byte_size};
pub use initial_size_estimator::InitialSizeEstimator;
pub use row_size_stats::RowSizeStats;
pub use sampling_size_estimator::SamplingSizeEstimator;
pub use size_estimator::SizeEstimator;
pub use two_stage_size_estimator::{EstimatorStage, SizeEstimatorStage, TwoStageSizeEstimator};
