use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub(crate) const STATE_FILE: &str = "update-state.json";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StorageSettings {
    pub path: Option<PathBuf>,
}

impl StorageSettings {
    /// Where the update markers live, falling back to the platform data dir.
    pub fn resolve_path(&self) -> Option<PathBuf> {
        self.path
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join("plato").join(STATE_FILE)))
    }
}
