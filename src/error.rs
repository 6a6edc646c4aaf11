use thiserror::Error;

/// Errors raised at the load boundary. The estimators themselves never fail.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid cell spec `{id}`: {reason}")]
    InvalidCell { id: String, reason: &'static str },
    #[error("duplicate cell id `{0}` in catalog")]
    DuplicateCellId(String),
    #[error("invalid scenario: {0}")]
    InvalidScenario(&'static str),
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
}
