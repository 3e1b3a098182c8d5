mod error;
mod label;
mod summary;
mod trajectory;

pub use error::ClassifyError;
pub use label::TrajectoryLabel;
pub use summary::TrajectorySummary;
pub use trajectory::{Classifier, DEFAULT_LINEAR_TOLERANCE};
