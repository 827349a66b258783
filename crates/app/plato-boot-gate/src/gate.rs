use std::sync::Arc;

use plato_storage::UpdateMarkers;
use plato_version_check::{
    AppVersionRecord, CheckResult, CheckStatus, CurrentVersion, Platform, VersionAuthority,
    VersionChecker,
};
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    config::GateConfig,
    error::{GateError, GateResult},
    ota::OtaUpdates,
    phase::{GatePhase, PhaseCell, wait_settled},
    screen::{BackPressOutcome, BlockedScreen, UrlOpener},
};

/// Why the gate let the app through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyReason {
    DevelopmentBypass,
    NoUpdate,
    OtaFetchFailed,
    OtaReloadFailed,
    Failsafe,
}

/// Result of one [`BootGate::run`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Blocked(AppVersionRecord),
    /// An OTA patch was fetched and the runtime was asked to restart on it.
    Reloading,
    Ready(ReadyReason),
}

/// What the checks asked for, before anything is acted upon.
enum Plan {
    Block(AppVersionRecord),
    Reload,
    Proceed(ReadyReason),
}

/// Decides once per launch whether the app may render.
///
/// The native version check and the OTA probe run concurrently. Both are
/// awaited before deciding, so a fast OTA answer can never preempt a slower
/// mandatory native one. A mandatory native release blocks for the rest of
/// the process; otherwise an available OTA patch is fetched and applied,
/// and in every other case the gate opens.
pub struct BootGate {
    checker: Arc<VersionChecker>,
    ota: Arc<dyn OtaUpdates>,
    current: CurrentVersion,
    platform: Platform,
    config: GateConfig,
    phase: PhaseCell,
}

impl BootGate {
    pub fn new(
        authority: Arc<dyn VersionAuthority>,
        markers: UpdateMarkers,
        ota: Arc<dyn OtaUpdates>,
        current: CurrentVersion,
        platform: Platform,
        config: GateConfig,
    ) -> Self {
        let checker =
            VersionChecker::new(authority, markers).with_timeout(config.check_timeout);
        Self {
            checker: Arc::new(checker),
            ota,
            current,
            platform,
            config,
            phase: PhaseCell::new(),
        }
    }

    pub fn phase(&self) -> GatePhase {
        self.phase.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<GatePhase> {
        self.phase.subscribe()
    }

    /// The single "safe to render the app" signal.
    pub fn is_safe_to_render(&self) -> bool {
        self.phase.get().is_ready()
    }

    pub async fn wait_settled(&self) -> GatePhase {
        let mut rx = self.subscribe();
        wait_settled(&mut rx).await
    }

    /// The notice to show while blocked.
    pub fn blocked_screen(&self) -> Option<BlockedScreen> {
        self.phase
            .get()
            .blocking_version()
            .map(BlockedScreen::for_record)
    }

    /// Runs the blocked screen's download action.
    pub fn open_download(&self, opener: &dyn UrlOpener) -> GateResult<()> {
        self.blocked_screen()
            .ok_or(GateError::NotBlocked)?
            .open_download(opener)
    }

    /// Hardware back navigation. Swallowed for as long as the gate is blocked.
    pub fn handle_back_press(&self) -> BackPressOutcome {
        if self.phase.get().is_blocked() {
            debug!("Back navigation suppressed while update is required");
            BackPressOutcome::Suppressed
        } else {
            BackPressOutcome::PassThrough
        }
    }

    #[instrument(skip_all, fields(current_code = %self.current.code, platform = %self.platform))]
    pub async fn run(&self) -> GateOutcome {
        if let Some(outcome) = self.settled_outcome() {
            debug!("Boot gate already settled");
            return outcome;
        }

        if self.config.build_profile.is_development() {
            info!("Development build, skipping update checks");
            return self.open(ReadyReason::DevelopmentBypass);
        }

        // The failsafe covers the checks and the patch download. Reload is
        // issued outside of it so an expiring deadline can never race a
        // restart that is already under way.
        let plan = match tokio::time::timeout(self.config.failsafe_timeout, self.plan()).await {
            Ok(plan) => plan,
            Err(_) => {
                warn!(
                    failsafe_ms = self.config.failsafe_timeout.as_millis() as u64,
                    "Update checks did not settle in time, opening the app"
                );
                return self.open(ReadyReason::Failsafe);
            }
        };

        match plan {
            Plan::Block(record) => {
                warn!(
                    "Mandatory native update {} ({}) required, blocking app",
                    record.version_name, record.version_code
                );
                self.phase.settle(GatePhase::Blocked(record.clone()));
                GateOutcome::Blocked(record)
            }
            Plan::Proceed(reason) => self.open(reason),
            Plan::Reload => match self.ota.reload().await {
                Ok(()) => {
                    info!("OTA patch applied, runtime restarting");
                    self.phase.settle(GatePhase::Ready);
                    GateOutcome::Reloading
                }
                Err(e) => {
                    error!("Failed to reload onto OTA patch: {}", e);
                    self.open(ReadyReason::OtaReloadFailed)
                }
            },
        }
    }

    async fn plan(&self) -> Plan {
        let (native, ota_available) = self.run_checks().await;

        if let Some(record) = native.mandatory_native_block() {
            if ota_available {
                info!("Skipping OTA patch, a mandatory native update takes priority");
            }
            return Plan::Block(record.clone());
        }

        if !ota_available {
            return Plan::Proceed(ReadyReason::NoUpdate);
        }

        info!("OTA patch available, fetching");
        match self.ota.fetch_update().await {
            Ok(()) => Plan::Reload,
            Err(e) => {
                error!("Failed to fetch OTA patch: {}", e);
                Plan::Proceed(ReadyReason::OtaFetchFailed)
            }
        }
    }

    /// Runs both checks as independent tasks and waits for both to finish.
    /// A failure in one branch only empties that branch's answer.
    async fn run_checks(&self) -> (CheckResult, bool) {
        let native = tokio::spawn({
            let checker = self.checker.clone();
            let current = self.current.clone();
            let platform = self.platform;
            async move { checker.check_for_update(&current, platform).await }
        });
        // A probe that outlives the check timeout counts as "no patch".
        let ota = tokio::spawn({
            let ota = self.ota.clone();
            let timeout = self.config.check_timeout;
            async move { tokio::time::timeout(timeout, ota.check_for_update()).await }
        });

        let (native, ota) = tokio::join!(native, ota);

        let native = native.unwrap_or_else(|e| {
            warn!("Native version check task failed: {}", e);
            CheckResult::no_update(self.current.clone(), CheckStatus::Failed)
        });
        let ota_available = match ota {
            Ok(Ok(Ok(check))) => check.is_available,
            Ok(Ok(Err(e))) => {
                warn!("OTA availability check failed: {}", e);
                false
            }
            Ok(Err(_)) => {
                warn!(
                    timeout_ms = self.config.check_timeout.as_millis() as u64,
                    "OTA availability check timed out"
                );
                false
            }
            Err(e) => {
                warn!("OTA availability task failed: {}", e);
                false
            }
        };
        debug!(
            native_status = ?native.status,
            update_required = native.update_required,
            is_mandatory = native.is_mandatory,
            ota_available,
            "Update checks settled"
        );

        (native, ota_available)
    }

    fn open(&self, reason: ReadyReason) -> GateOutcome {
        self.phase.settle(GatePhase::Ready);
        debug!(?reason, "Boot gate open");
        GateOutcome::Ready(reason)
    }

    fn settled_outcome(&self) -> Option<GateOutcome> {
        match self.phase.get() {
            GatePhase::Checking => None,
            GatePhase::Blocked(record) => Some(GateOutcome::Blocked(record)),
            GatePhase::Ready => Some(GateOutcome::Ready(ReadyReason::NoUpdate)),
        }
    }
}
