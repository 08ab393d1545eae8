use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("No model configured; call set_model() or set `model` in the config")]
    ModelNotSet,

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Chat request failed: {status} - {body}")]
    Http { status: u16, body: String },

    #[error("Chat response contained no message")]
    EmptyResponse,

    #[error("Invalid score payload: {0}")]
    Payload(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScoringError>;
