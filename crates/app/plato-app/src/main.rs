use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use plato_boot_gate::{
    BackPressOutcome, BootGate, BuildProfile, GateOutcome, NoOtaUpdates, UrlOpener,
};
use plato_settings::AppSettings;
use plato_storage::{FileStore, KeyValueStore, MemoryStore, UpdateMarkers};
use plato_version_check::{
    CurrentVersion, HttpVersionAuthority, UpdateReminder, VersionChecker, VersionCode,
};
use tracing::{error, info, warn};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

/// Monotonic build number published alongside `CARGO_PKG_VERSION`.
const APP_VERSION_CODE: u32 = 1;

const REMINDER_TICK: Duration = Duration::from_secs(60);

/// Stands in for the platform's "open in store" intent.
struct LogOpener;

impl UrlOpener for LogOpener {
    fn open(&self, url: &Url) -> Result<(), String> {
        info!("Open {} to install the update", url);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // --- Tracing ---
    let global_filter = Targets::new()
        .with_default(LevelFilter::WARN)
        .with_target("plato_app", LevelFilter::DEBUG)
        .with_target("plato_boot_gate", LevelFilter::DEBUG)
        .with_target("plato_version_check", LevelFilter::INFO)
        .with_target("plato_settings", LevelFilter::INFO)
        .with_target("plato_storage", LevelFilter::INFO);

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(global_filter)
        .try_init()
        .context("failed to install tracing subscriber")?;

    // --- Settings ---
    let settings =
        AppSettings::load_from_default_path_creating().context("failed to load settings")?;

    // --- Collaborators ---
    let authority = Arc::new(
        HttpVersionAuthority::new(
            &settings.authority.endpoint,
            &settings.authority.function,
            settings.authority.api_key.clone(),
        )
        .context("failed to build release authority client")?,
    );
    let markers = UpdateMarkers::new(open_store(&settings));
    let current = CurrentVersion::new(
        env!("CARGO_PKG_VERSION"),
        VersionCode::new(APP_VERSION_CODE).context("invalid build version code")?,
    );
    let platform = settings.update.platform;
    let config = settings
        .update
        .gate_config(BuildProfile::current())
        .context("invalid gate configuration")?;

    // --- Boot gate ---
    let gate = BootGate::new(
        authority.clone(),
        markers.clone(),
        Arc::new(NoOtaUpdates),
        current.clone(),
        platform,
        config,
    );

    match gate.run().await {
        GateOutcome::Blocked(_) => stay_blocked(&gate).await,
        GateOutcome::Reloading => {
            info!("Restarting on the fetched patch");
            Ok(())
        }
        GateOutcome::Ready(reason) => {
            info!("Mounting app ({:?})", reason);
            let checker = VersionChecker::new(authority, markers)
                .with_timeout(settings.update.check_timeout);
            let reminder = UpdateReminder::new(Arc::new(checker))
                .with_interval(settings.update.reminder_interval);
            run_app(&gate, &reminder, &current, platform).await
        }
    }
}

/// Falls back to an in-memory store so an unreadable state file never
/// keeps the app from starting. Markers are then lost on exit.
fn open_store(settings: &AppSettings) -> Arc<dyn KeyValueStore> {
    let Some(path) = settings.storage.resolve_path() else {
        warn!("No data directory available, update markers will not persist");
        return Arc::new(MemoryStore::new());
    };
    match FileStore::open(&path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!("Failed to open update state at {}: {}", path.display(), e);
            Arc::new(MemoryStore::new())
        }
    }
}

async fn stay_blocked(gate: &BootGate) -> Result<()> {
    if let Some(screen) = gate.blocked_screen() {
        warn!("{}: {}", screen.title, screen.message);
        info!("Required version: {}", screen.version_name);
        if let Some(notes) = &screen.release_notes {
            info!("Release notes: {}", notes);
        }
    }
    if let Err(e) = gate.open_download(&LogOpener) {
        error!("Download action failed: {}", e);
    }

    loop {
        tokio::signal::ctrl_c()
            .await
            .context("failed to listen for interrupt")?;
        if gate.handle_back_press() == BackPressOutcome::PassThrough {
            return Ok(());
        }
        info!("An update is required to keep using Plato");
    }
}

async fn run_app(
    gate: &BootGate,
    reminder: &UpdateReminder,
    current: &CurrentVersion,
    platform: plato_version_check::Platform,
) -> Result<()> {
    let mut ticker = tokio::time::interval(REMINDER_TICK);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = chrono::Utc::now();
                let Some(prompt) = reminder.poll_if_due(now, current, platform).await else {
                    continue;
                };
                info!(
                    mandatory = prompt.is_mandatory,
                    "Version {} is available",
                    prompt.record.version_name
                );
                // Nobody answers the prompt in a headless run, so treat it as dismissed.
                if let Err(e) = reminder.dismiss(&prompt) {
                    warn!("Failed to remember dismissed update: {}", e);
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for interrupt")?;
                if gate.handle_back_press().is_suppressed() {
                    continue;
                }
                info!("Shutting down");
                return Ok(());
            }
        }
    }
}
