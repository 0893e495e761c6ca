use thiserror::Error;

/// Errors raised inside a fitting stage.
///
/// These never leave the crate's public fitting API; the operation boundary
/// turns them into a narrower fallback and records them in
/// [`FitResult::error`](crate::fitter::FitResult::error).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FitError {
    #[error("Banner ({banner_chars} chars) leaves no room for content within {ceiling_chars} chars")]
    NoRoomForContent {
        banner_chars: usize,
        ceiling_chars: usize,
    },

    #[error("Document produced no usable sections")]
    NoSections,

    #[error("Fallback limit leaves nothing to keep")]
    EmptyFallback,

    #[error("Fitting panicked: {0}")]
    Panicked(String),
}

/// Errors loading or validating a [`FitterConfig`](crate::config::FitterConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
