//! In-app update prompt.
//!
//! Runs while the app is in use, well after the boot gate has let it
//! through. It shares the boot check's "last checked" marker for
//! throttling and remembers which optional release the user waved away.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, info, warn};

use crate::{
    checker::VersionChecker,
    error::Result,
    types::{AppVersionRecord, CurrentVersion, Platform},
};

pub const DEFAULT_REMINDER_INTERVAL: Duration = Duration::from_secs(6 * 60 * 60);

/// A release the user should be told about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePrompt {
    pub record: AppVersionRecord,
    pub is_mandatory: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissOutcome {
    Dismissed,
    /// Mandatory releases keep coming back until installed.
    NotDismissible,
}

pub struct UpdateReminder {
    checker: Arc<VersionChecker>,
    interval: Duration,
}

impl UpdateReminder {
    pub fn new(checker: Arc<VersionChecker>) -> Self {
        Self {
            checker,
            interval: DEFAULT_REMINDER_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Whether enough time passed since the last recorded check.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        let last = match self.checker.markers().last_check_at() {
            Ok(Some(last)) => last,
            Ok(None) => return true,
            Err(e) => {
                warn!("Unreadable last check marker, treating check as due: {}", e);
                return true;
            }
        };

        // A timestamp from the future means the clock moved; check again.
        if last > now {
            return true;
        }
        let interval = TimeDelta::from_std(self.interval).unwrap_or(TimeDelta::MAX);
        now - last >= interval
    }

    pub async fn poll_if_due(
        &self,
        now: DateTime<Utc>,
        current: &CurrentVersion,
        platform: Platform,
    ) -> Option<UpdatePrompt> {
        if !self.is_due(now) {
            debug!("Update reminder not due yet");
            return None;
        }
        self.poll(current, platform).await
    }

    /// Runs one check and decides whether the user should see a prompt.
    pub async fn poll(&self, current: &CurrentVersion, platform: Platform) -> Option<UpdatePrompt> {
        let result = self.checker.check_for_update(current, platform).await;
        if !result.update_required {
            return None;
        }
        let record = result.latest_version?;
        let markers = self.checker.markers();

        if result.is_mandatory {
            if let Err(e) = markers.clear_dismissed() {
                warn!("Failed to clear dismissed update marker: {}", e);
            }
            info!("Mandatory update {} must be shown", record.version_code);
            return Some(UpdatePrompt {
                record,
                is_mandatory: true,
            });
        }

        match markers.dismissed_version_code() {
            Ok(Some(dismissed)) if dismissed >= record.version_code.get() => {
                debug!(
                    "Update {} already dismissed (dismissed up to {})",
                    record.version_code, dismissed
                );
                None
            }
            Ok(_) => Some(UpdatePrompt {
                record,
                is_mandatory: false,
            }),
            Err(e) => {
                warn!("Unreadable dismissed update marker, showing prompt: {}", e);
                Some(UpdatePrompt {
                    record,
                    is_mandatory: false,
                })
            }
        }
    }

    pub fn dismiss(&self, prompt: &UpdatePrompt) -> Result<DismissOutcome> {
        if prompt.is_mandatory {
            return Ok(DismissOutcome::NotDismissible);
        }
        self.checker
            .markers()
            .dismiss_version(prompt.record.version_code.get())?;
        info!("Update {} dismissed", prompt.record.version_code);
        Ok(DismissOutcome::Dismissed)
    }
}
