use thiserror::Error;

/// Errors raised by the matching core
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error("Model not trained: call train() before requesting similarities")]
    ModelNotTrained,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
