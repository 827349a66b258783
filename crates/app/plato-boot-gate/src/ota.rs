use async_trait::async_trait;

use crate::error::OtaError;

/// Answer of the OTA runtime's availability probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OtaCheck {
    pub is_available: bool,
}

/// Over-the-air patch runtime provided by the platform.
///
/// The gate only ever calls `fetch_update` after a probe reported a patch,
/// and `reload` after `fetch_update` succeeded.
#[async_trait]
pub trait OtaUpdates: Send + Sync {
    async fn check_for_update(&self) -> Result<OtaCheck, OtaError>;

    async fn fetch_update(&self) -> Result<(), OtaError>;

    /// Restarts the app on the fetched patch.
    async fn reload(&self) -> Result<(), OtaError>;
}

/// Runtime for builds that ship without OTA support.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOtaUpdates;

#[async_trait]
impl OtaUpdates for NoOtaUpdates {
    async fn check_for_update(&self) -> Result<OtaCheck, OtaError> {
        Ok(OtaCheck::default())
    }

    async fn fetch_update(&self) -> Result<(), OtaError> {
        Err(OtaError::new("OTA updates are not supported by this build"))
    }

    async fn reload(&self) -> Result<(), OtaError> {
        Err(OtaError::new("OTA updates are not supported by this build"))
    }
}
