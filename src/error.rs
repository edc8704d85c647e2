use thiserror::Error;

/// Errors raised while loading data or driving the terminal.
///
/// Most of these never reach the user: border and price failures are logged
/// and replaced by a fallback at the call site.
#[derive(Debug, Error)]
pub enum GlobeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(Box<ureq::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings error: {0}")]
    Settings(#[from] toml::de::Error),

    #[error("Bad data: {0}")]
    Data(String),
}

impl From<ureq::Error> for GlobeError {
    fn from(err: ureq::Error) -> Self {
        GlobeError::Http(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, GlobeError>;
