use thiserror::Error;

/// Errors raised while setting up the highlighter.
///
/// The pipeline itself never fails; only a bad configuration is rejected.
#[derive(Debug, Error)]
pub enum HighlightError {
    /// Invalid configuration
    #[error("Invalid highlight configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, HighlightError>;
