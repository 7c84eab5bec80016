use thiserror::Error;

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    /// Failure reported by the generation service. The message is surfaced to
    /// the user verbatim.
    #[error("{0}")]
    Remote(String),
    #[error("{0}")]
    ImageError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("A generation is already in progress")]
    Busy,
    #[error("An uploaded image is required in image-to-image mode")]
    MissingSourceImage,
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<reqwest::Error> for StudioError {
    fn from(e: reqwest::Error) -> Self {
        StudioError::RequestError(e.to_string())
    }
}

impl From<serde_json::Error> for StudioError {
    fn from(e: serde_json::Error) -> Self {
        StudioError::SerializationError(e.to_string())
    }
}

impl From<image::ImageError> for StudioError {
    fn from(e: image::ImageError) -> Self {
        StudioError::ImageError(e.to_string())
    }
}

impl From<base64::DecodeError> for StudioError {
    fn from(e: base64::DecodeError) -> Self {
        StudioError::ImageError(format!("invalid base64 image data: {}", e))
    }
}

impl From<tokio::task::JoinError> for StudioError {
    fn from(e: tokio::task::JoinError) -> Self {
        StudioError::InternalError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StudioError>;
