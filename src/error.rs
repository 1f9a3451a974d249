use std::io;
use thiserror::Error;

/// Everything that can stop a benchmark run.
///
/// Nothing in the harness recovers from these: a failing workload must abort the
/// report rather than leave a misleading partial row behind.
#[derive(Debug, Error)]
pub enum BenchError {
    /// A workload or sweep was given a parameter that violates its precondition.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A backend operation failed (unparsable text, unknown variable, size limit, ...).
    #[error("{backend} backend failed: {message}")]
    BackendFailure {
        backend: &'static str,
        message: String,
    },

    /// Statistics were requested over zero samples.
    #[error("cannot compute statistics of an empty sample set")]
    EmptySampleSet,

    /// Two backends computed different functions for the same workload instance.
    #[error("{left} and {right} disagree on `{instance}` at valuation {valuation:?}")]
    ParityMismatch {
        left: &'static str,
        right: &'static str,
        instance: String,
        valuation: Vec<bool>,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Logger(#[from] log::SetLoggerError),
}

impl BenchError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        BenchError::InvalidInput(message.into())
    }

    pub fn backend(backend: &'static str, message: impl Into<String>) -> Self {
        BenchError::BackendFailure {
            backend,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BenchError>;
