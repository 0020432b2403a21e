//! Remote call error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("failed to get a response after {attempts} attempts: {last_error}")]
    ExhaustedRetries { attempts: u32, last_error: String },

    #[error("configuration error: {0}")]
    Configuration(String),

    /// The task making the call died before it produced a result
    #[error("remote call interrupted: {0}")]
    Interrupted(String),
}

impl RemoteError {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::ExhaustedRetries { .. })
    }
}

/// Outcome of one remote call
pub type RemoteResult = Result<String, RemoteError>;
