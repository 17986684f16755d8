//! Pipeline error taxonomy

use thiserror::Error;

/// Failure of a single pipeline invocation
///
/// All variants are terminal for the call that produced them. Nothing in the
/// pipeline retries; callers decide whether to run the whole call again.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// The classification capability could not be invoked
    #[error("classifier unavailable: {0}")]
    ClassifierUnavailable(String),

    /// The capability answered, but not with ranked labels and scores
    #[error("malformed classification: {0}")]
    MalformedClassification(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
