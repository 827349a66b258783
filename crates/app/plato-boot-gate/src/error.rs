use thiserror::Error;

#[derive(Error, Debug)]
pub enum GateError {
    #[error("Invalid gate configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Blocking release {0} has no download location")]
    MissingDownloadUrl(String),

    #[error("Failed to open download location: {0}")]
    OpenUrl(String),

    #[error("Gate is not blocked")]
    NotBlocked,
}

pub type GateResult<T> = std::result::Result<T, GateError>;

/// Error reported by the platform OTA runtime
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("OTA runtime error: {0}")]
pub struct OtaError(pub String);

impl OtaError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
