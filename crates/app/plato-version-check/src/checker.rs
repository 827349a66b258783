use std::{sync::Arc, time::Duration};

use chrono::Utc;
use plato_storage::UpdateMarkers;
use tracing::{debug, info, instrument, warn};

use crate::{
    authority::{VersionAuthority, VersionQuery, VersionRow},
    error::Result,
    types::{AppVersionRecord, CheckResult, CheckStatus, CurrentVersion, Platform},
};

pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(3);

/// Asks the version authority whether the running build must update.
///
/// A check never fails: timeouts and errors both collapse into the
/// "no update" answer so a bad network can not keep the app from starting.
pub struct VersionChecker {
    authority: Arc<dyn VersionAuthority>,
    markers: UpdateMarkers,
    timeout: Duration,
}

impl VersionChecker {
    pub fn new(authority: Arc<dyn VersionAuthority>, markers: UpdateMarkers) -> Self {
        Self {
            authority,
            markers,
            timeout: DEFAULT_CHECK_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn markers(&self) -> &UpdateMarkers {
        &self.markers
    }

    #[instrument(skip_all, fields(current_code = %current.code, %platform))]
    pub async fn check_for_update(
        &self,
        current: &CurrentVersion,
        platform: Platform,
    ) -> CheckResult {
        let query = VersionQuery {
            current_version_code: current.code,
            platform,
        };

        let result = match tokio::time::timeout(self.timeout, self.authority.latest_version(query))
            .await
        {
            Err(_) => {
                warn!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Version check timed out, continuing without update"
                );
                CheckResult::no_update(current.clone(), CheckStatus::TimedOut)
            }
            Ok(Err(e)) => {
                warn!(
                    error_kind = e.kind(),
                    "Version check failed, continuing without update: {}", e
                );
                CheckResult::no_update(current.clone(), CheckStatus::Failed)
            }
            Ok(Ok(row)) => match classify(current, row) {
                Ok(result) => result,
                Err(e) => {
                    warn!(
                        error_kind = e.kind(),
                        "Version authority returned an unusable record: {}", e
                    );
                    CheckResult::no_update(current.clone(), CheckStatus::Failed)
                }
            },
        };

        if let Err(e) = self.markers.record_check(Utc::now()) {
            warn!("Failed to record update check time: {}", e);
        }

        result
    }
}

fn classify(current: &CurrentVersion, row: Option<VersionRow>) -> Result<CheckResult> {
    let Some(row) = row else {
        debug!("No release published for this platform");
        return Ok(CheckResult::no_update(current.clone(), CheckStatus::Completed));
    };

    let update_required = row.update_required;
    let record = AppVersionRecord::try_from(row)?;
    if !update_required {
        debug!(
            "Running build {} is current (latest {})",
            current.code, record.version_code
        );
        return Ok(CheckResult {
            update_required: false,
            is_mandatory: false,
            latest_version: Some(record),
            current_version: current.clone(),
            status: CheckStatus::Completed,
        });
    }

    info!(
        latest_code = %record.version_code,
        update_type = ?record.update_type,
        is_mandatory = record.is_mandatory,
        "Update {} available (running {})",
        record.version_name,
        current.name
    );
    Ok(CheckResult {
        update_required: true,
        is_mandatory: record.is_mandatory,
        latest_version: Some(record),
        current_version: current.clone(),
        status: CheckStatus::Completed,
    })
}
