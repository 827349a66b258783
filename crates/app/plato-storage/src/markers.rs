use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    error::{Result, StorageError},
    store::KeyValueStore,
};

pub const LAST_CHECK_AT_KEY: &str = "plato.update.last_check_at";
pub const DISMISSED_VERSION_CODE_KEY: &str = "plato.update.dismissed_version_code";

/// Typed access to the two scalars the update checks keep between launches.
#[derive(Clone)]
pub struct UpdateMarkers {
    store: Arc<dyn KeyValueStore>,
}

impl UpdateMarkers {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn last_check_at(&self) -> Result<Option<DateTime<Utc>>> {
        let Some(raw) = self.store.get(LAST_CHECK_AT_KEY)? else {
            return Ok(None);
        };
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| Some(at.with_timezone(&Utc)))
            .map_err(|_| StorageError::InvalidValue {
                key: LAST_CHECK_AT_KEY.to_owned(),
                value: raw,
            })
    }

    pub fn record_check(&self, at: DateTime<Utc>) -> Result<()> {
        self.store.set(LAST_CHECK_AT_KEY, &at.to_rfc3339())
    }

    pub fn dismissed_version_code(&self) -> Result<Option<u32>> {
        let Some(raw) = self.store.get(DISMISSED_VERSION_CODE_KEY)? else {
            return Ok(None);
        };
        raw.trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|_| StorageError::InvalidValue {
                key: DISMISSED_VERSION_CODE_KEY.to_owned(),
                value: raw,
            })
    }

    pub fn dismiss_version(&self, version_code: u32) -> Result<()> {
        self.store.set(DISMISSED_VERSION_CODE_KEY, &version_code.to_string())
    }

    pub fn clear_dismissed(&self) -> Result<()> {
        self.store.remove(DISMISSED_VERSION_CODE_KEY)
    }
}
