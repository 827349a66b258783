use plato_version_check::AppVersionRecord;
use tracing::{debug, info};
use url::Url;

use crate::error::{GateError, GateResult};

const BLOCKED_TITLE: &str = "Update required";
const DEFAULT_BLOCKED_MESSAGE: &str =
    "A new version of Plato is available. Please update to continue using the app.";
const DOWNLOAD_ACTION_LABEL: &str = "Update now";

/// Opens an external location (app store page, download site).
pub trait UrlOpener: Send + Sync {
    fn open(&self, url: &Url) -> Result<(), String>;
}

/// What happened to a hardware back press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackPressOutcome {
    /// Consumed by the gate; the platform default must not run.
    Suppressed,
    /// Not the gate's business; let the platform handle it.
    PassThrough,
}

impl BackPressOutcome {
    pub fn is_suppressed(&self) -> bool {
        matches!(self, BackPressOutcome::Suppressed)
    }
}

/// Content of the full-screen, non-dismissible mandatory update notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedScreen {
    pub title: String,
    pub message: String,
    pub version_name: String,
    pub release_notes: Option<String>,
    pub action_label: String,
    pub download_url: Option<Url>,
}

impl BlockedScreen {
    pub fn for_record(record: &AppVersionRecord) -> Self {
        Self {
            title: BLOCKED_TITLE.to_owned(),
            message: record
                .update_message
                .clone()
                .unwrap_or_else(|| DEFAULT_BLOCKED_MESSAGE.to_owned()),
            version_name: record.version_name.clone(),
            release_notes: record.release_notes.clone(),
            action_label: DOWNLOAD_ACTION_LABEL.to_owned(),
            download_url: record.download_url.clone(),
        }
    }

    /// The screen's single action.
    pub fn open_download(&self, opener: &dyn UrlOpener) -> GateResult<()> {
        let url = self
            .download_url
            .as_ref()
            .ok_or_else(|| GateError::MissingDownloadUrl(self.version_name.clone()))?;
        info!("Opening download location for {}", self.version_name);
        debug!("Download location: {}", url);
        opener.open(url).map_err(GateError::OpenUrl)
    }
}
