use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("source '{path}' is not readable as tabular data: {reason}")]
    SourceUnreadable { path: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    /// Wrap any parse-level failure as a batch-fatal unreadable-source error.
    pub fn unreadable(path: impl Into<String>, reason: impl ToString) -> Self {
        PipelineError::SourceUnreadable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
