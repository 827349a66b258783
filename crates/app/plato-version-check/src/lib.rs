//! Plato version checker
//!
//! Asks the release authority whether the running build is out of date and
//! classifies the answer as no update, optional update or mandatory update.
//! Also hosts the in-app reminder that re-runs the check while the app is
//! in use.

pub mod authority;
pub mod checker;
pub mod error;
pub mod http;
pub mod reminder;
pub mod types;

pub use authority::{VersionAuthority, VersionQuery, VersionRow};
pub use checker::{DEFAULT_CHECK_TIMEOUT, VersionChecker};
pub use error::{Result, VersionCheckError};
pub use http::HttpVersionAuthority;
pub use reminder::{DEFAULT_REMINDER_INTERVAL, DismissOutcome, UpdatePrompt, UpdateReminder};
pub use types::{
    AppVersionRecord, CheckResult, CheckStatus, CurrentVersion, Platform, UpdateType, VersionCode,
};
