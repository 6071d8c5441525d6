pub mod constants;
pub mod error;

pub use error::{PipelineError, Result};
