use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json_lenient::to_string_pretty;
use tracing::debug;

use crate::{
    AppSettings,
    error::{Error, Result},
    json::{json_difference, merge_non_null_json_value},
};

pub(crate) static DEFAULTS: &str = include_str!("../assets/defaults.jsonc");

pub(crate) const SETTINGS_FILE: &str = "settings.json";

const API_BASE_URL_ENV: &str = "PLATO_API_BASE_URL";
const API_KEY_ENV: &str = "PLATO_API_KEY";

fn read_customizations(config_path: &Path) -> Result<serde_json::Value> {
    let contents = plato_fs::read_to_string_if_exists(config_path).map_err(|source| {
        Error::Read {
            path: config_path.to_owned(),
            source,
        }
    })?;
    match contents {
        Some(contents) if !contents.trim().is_empty() => {
            Ok(serde_json_lenient::from_str(&contents)?)
        }
        _ => Ok(json!({})),
    }
}

fn write_customizations(config_path: &Path, contents: &str) -> Result<()> {
    plato_fs::create_dirs_then_write(config_path, contents).map_err(|source| Error::Write {
        path: config_path.to_owned(),
        source,
    })
}

impl AppSettings {
    /// Defaults overlaid with the customization file, then the environment.
    pub fn load(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            write_customizations(config_path, "{}\n")?;
        }

        let customizations = read_customizations(config_path)?;
        let mut settings: serde_json::Value = serde_json_lenient::from_str(DEFAULTS)?;

        merge_non_null_json_value(customizations, &mut settings);

        let mut app_settings: AppSettings = serde_json::from_value(settings)?;

        if let Ok(api_base_url) = std::env::var(API_BASE_URL_ENV) {
            debug!("Using authority endpoint from {}", API_BASE_URL_ENV);
            app_settings.authority.endpoint = api_base_url;
        }
        if let Ok(api_key) = std::env::var(API_KEY_ENV) {
            app_settings.authority.api_key = Some(api_key);
        }

        app_settings.validate()?;
        Ok(app_settings)
    }

    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("plato").join(SETTINGS_FILE))
            .ok_or(Error::NoConfigDir)
    }

    pub fn load_from_default_path_creating() -> Result<Self> {
        AppSettings::load(&Self::default_path()?)
    }

    /// Save only values that differ from what is currently on disk.
    pub fn save(&self, config_path: &Path) -> Result<()> {
        self.validate()?;
        let current = serde_json::to_value(AppSettings::load(config_path)?)?;
        let update = serde_json::to_value(self)?;
        let diff = json_difference(current, &update);

        if diff == json!({}) {
            return Ok(());
        }

        let mut customizations = read_customizations(config_path)?;

        // TODO: preserve comments in the customization file when rewriting it
        merge_non_null_json_value(diff, &mut customizations);
        write_customizations(config_path, &to_string_pretty(&customizations)?)
    }

    pub fn save_to_default_path(&self) -> Result<()> {
        self.save(&Self::default_path()?)
    }
}
