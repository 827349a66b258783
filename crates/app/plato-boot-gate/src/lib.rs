//! Plato boot gate
//!
//! Runs before the rest of the app mounts and settles exactly once per
//! launch into one of two terminal phases:
//!
//! - `Blocked` when a mandatory native release exists; the app shows a
//!   non-dismissible update notice until the user installs the new build.
//! - `Ready` in every other case, possibly after fetching and reloading
//!   onto an OTA patch.
//!
//! Checks that fail or time out never block: the gate fails open.

mod config;
mod error;
mod gate;
mod ota;
mod phase;
mod screen;

pub use config::{BuildProfile, DEFAULT_FAILSAFE_TIMEOUT, GateConfig};
pub use error::{GateError, GateResult, OtaError};
pub use gate::{BootGate, GateOutcome, ReadyReason};
pub use ota::{NoOtaUpdates, OtaCheck, OtaUpdates};
pub use phase::{GatePhase, PhaseCell, wait_settled};
pub use screen::{BackPressOutcome, BlockedScreen, UrlOpener};
