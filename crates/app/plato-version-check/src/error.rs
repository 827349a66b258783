pub type Result<T> = std::result::Result<T, VersionCheckError>;

#[derive(Debug, thiserror::Error)]
pub enum VersionCheckError {
    #[error("Invalid version code: {0}")]
    InvalidVersionCode(i64),

    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("Invalid authority endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Version authority request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Version authority returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Malformed version authority response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Invalid version record: {0}")]
    InvalidRecord(String),

    #[error("Update marker storage failed: {0}")]
    Storage(#[from] plato_storage::StorageError),
}

impl VersionCheckError {
    /// Short machine-friendly label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            VersionCheckError::InvalidVersionCode(_) => "invalid_version_code",
            VersionCheckError::UnknownPlatform(_) => "unknown_platform",
            VersionCheckError::InvalidEndpoint(_) => "invalid_endpoint",
            VersionCheckError::Transport(_) => "transport",
            VersionCheckError::Status { .. } => "status",
            VersionCheckError::Malformed(_) => "malformed",
            VersionCheckError::InvalidRecord(_) => "invalid_record",
            VersionCheckError::Storage(_) => "storage",
        }
    }
}
