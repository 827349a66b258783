use plato_version_check::AppVersionRecord;
use tokio::sync::watch;
use tracing::{debug, info};

/// Where the gate is in its once-per-launch decision.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GatePhase {
    #[default]
    Checking,
    /// A mandatory native release must be installed. Terminal.
    Blocked(AppVersionRecord),
    /// The app may render. Terminal.
    Ready,
}

impl GatePhase {
    pub fn is_settled(&self) -> bool {
        !matches!(self, GatePhase::Checking)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, GatePhase::Ready)
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, GatePhase::Blocked(_))
    }

    pub fn blocking_version(&self) -> Option<&AppVersionRecord> {
        match self {
            GatePhase::Blocked(record) => Some(record),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            GatePhase::Checking => "checking",
            GatePhase::Blocked(_) => "blocked",
            GatePhase::Ready => "ready",
        }
    }
}

/// Write-once holder of the gate phase.
///
/// The only legal move is out of `Checking`; once settled the phase never
/// changes again for the lifetime of the process. Readers either poll
/// [`PhaseCell::get`] or subscribe to changes.
#[derive(Debug)]
pub struct PhaseCell {
    tx: watch::Sender<GatePhase>,
}

impl Default for PhaseCell {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseCell {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(GatePhase::Checking);
        Self { tx }
    }

    pub fn get(&self) -> GatePhase {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<GatePhase> {
        self.tx.subscribe()
    }

    /// Moves out of `Checking`. Returns `false` when the phase had already
    /// settled, in which case nothing changes.
    pub fn settle(&self, next: GatePhase) -> bool {
        if !next.is_settled() {
            return false;
        }
        let next_name = next.name();
        let changed = self.tx.send_if_modified(move |phase| {
            if phase.is_settled() {
                return false;
            }
            *phase = next;
            true
        });
        if changed {
            info!("Boot gate settled: {}", next_name);
        } else {
            debug!("Ignoring late transition to {}", next_name);
        }
        changed
    }
}

/// Waits until the phase leaves `Checking` and returns the settled value.
pub async fn wait_settled(rx: &mut watch::Receiver<GatePhase>) -> GatePhase {
    // A closed channel means the gate was dropped; report whatever it last held.
    if rx.wait_for(GatePhase::is_settled).await.is_err() {
        debug!("Boot gate dropped before settling");
    }
    rx.borrow().clone()
}
