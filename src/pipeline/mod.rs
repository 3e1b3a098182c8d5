mod discovery;
mod error;
mod report;
mod runner;

pub use discovery::discover_inputs;
pub use error::PipelineError;
pub use report::{RunReport, TrackFailure};
pub use runner::Runner;
