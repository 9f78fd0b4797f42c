pub mod charts;
pub mod classifier;
pub mod correlation;
pub mod dataset;
pub mod summary;
pub mod types;
pub mod utils;

pub use charts::plan_charts;
pub use classifier::classify;
pub use correlation::correlation_matrix;
pub use dataset::{Column, ColumnData, Dataset};
pub use summary::build_summary;
pub use types::*;
