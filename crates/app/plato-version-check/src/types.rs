//! Data types shared by the version checker and the boot gate

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::VersionCheckError;

/// Monotonically increasing build number. The only ordering key between releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct VersionCode(NonZeroU32);

impl VersionCode {
    pub fn new(code: u32) -> Result<Self, VersionCheckError> {
        NonZeroU32::new(code)
            .map(Self)
            .ok_or(VersionCheckError::InvalidVersionCode(i64::from(code)))
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for VersionCode {
    type Error = VersionCheckError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        Self::new(code)
    }
}

impl TryFrom<i64> for VersionCode {
    type Error = VersionCheckError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        u32::try_from(code)
            .ok()
            .and_then(NonZeroU32::new)
            .map(Self)
            .ok_or(VersionCheckError::InvalidVersionCode(code))
    }
}

impl From<VersionCode> for u32 {
    fn from(code: VersionCode) -> Self {
        code.get()
    }
}

impl std::fmt::Display for VersionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mobile platform the running build was packaged for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Android => "android",
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = VersionCheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ios" => Ok(Platform::Ios),
            "android" => Ok(Platform::Android),
            _ => Err(VersionCheckError::UnknownPlatform(s.to_owned())),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a published release reaches the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateType {
    /// A new binary must be installed from the store.
    Native,
    /// A patch applied in place by the OTA runtime.
    Ota,
}

/// A release as published by the version authority
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppVersionRecord {
    pub version_name: String,
    pub version_code: VersionCode,
    pub update_type: UpdateType,
    pub is_mandatory: bool,
    pub download_url: Option<Url>,
    pub update_message: Option<String>,
    pub release_notes: Option<String>,
}

impl AppVersionRecord {
    pub fn is_mandatory_native(&self) -> bool {
        self.is_mandatory && self.update_type == UpdateType::Native
    }
}

/// The build that is currently running
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentVersion {
    pub name: String,
    pub code: VersionCode,
}

impl CurrentVersion {
    pub fn new(name: impl Into<String>, code: VersionCode) -> Self {
        Self {
            name: name.into(),
            code,
        }
    }
}

/// How a check cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckStatus {
    /// The authority answered.
    Completed,
    /// The authority did not answer before the deadline.
    TimedOut,
    /// The lookup failed or the answer could not be understood.
    Failed,
}

/// Outcome of one check cycle. Built fresh every time and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub update_required: bool,
    pub is_mandatory: bool,
    pub latest_version: Option<AppVersionRecord>,
    pub current_version: CurrentVersion,
    pub status: CheckStatus,
}

impl CheckResult {
    /// The "proceed" answer used whenever nothing definitive came back.
    pub fn no_update(current_version: CurrentVersion, status: CheckStatus) -> Self {
        Self {
            update_required: false,
            is_mandatory: false,
            latest_version: None,
            current_version,
            status,
        }
    }

    /// The record that must block the app, if this result demands a native install.
    pub fn mandatory_native_block(&self) -> Option<&AppVersionRecord> {
        if !(self.update_required && self.is_mandatory) {
            return None;
        }
        self.latest_version
            .as_ref()
            .filter(|record| record.update_type == UpdateType::Native)
    }
}
