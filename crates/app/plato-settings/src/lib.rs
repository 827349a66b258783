use plato_boot_gate::BuildProfile;
use serde::{Deserialize, Serialize};

mod error;
mod json;
mod persistence;
mod settings;

pub use error::{Error, Result};
pub use settings::{AuthoritySettings, StorageSettings, UpdateSettings};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub update: UpdateSettings,
    pub authority: AuthoritySettings,
    pub storage: StorageSettings,
}

impl AppSettings {
    /// Reject settings the gate or the authority client could not run with.
    pub fn validate(&self) -> Result<()> {
        self.update
            .gate_config(BuildProfile::Release)
            .map_err(|err| Error::Invalid(err.to_string()))?;

        if self.update.reminder_interval.is_zero() {
            return Err(Error::Invalid("reminderInterval cannot be zero".into()));
        }

        let endpoint = url::Url::parse(&self.authority.endpoint).map_err(|err| {
            Error::Invalid(format!(
                "authority endpoint {:?} is not a URL: {}",
                self.authority.endpoint, err
            ))
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(Error::Invalid(format!(
                "authority endpoint must be http(s), got {}",
                endpoint.scheme()
            )));
        }

        if self.authority.function.trim().is_empty() {
            return Err(Error::Invalid("authority function cannot be empty".into()));
        }

        Ok(())
    }
}
