//! Test doubles shared by the boot gate integration tests

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use parking_lot::Mutex;
use plato_boot_gate::{BootGate, BuildProfile, GateConfig, OtaCheck, OtaError, OtaUpdates};
use plato_storage::{MemoryStore, UpdateMarkers};
use plato_version_check::{
    CurrentVersion, Platform, UpdateType, VersionAuthority, VersionCheckError, VersionCode,
    VersionQuery, VersionRow,
};

pub enum AuthorityScript {
    Answer(Option<VersionRow>),
    Delay(Duration, Option<VersionRow>),
    Fail,
    Hang,
}

pub struct ScriptedAuthority {
    script: AuthorityScript,
    calls: Mutex<usize>,
}

impl ScriptedAuthority {
    pub fn new(script: AuthorityScript) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: Mutex::new(0),
        })
    }

        pub fn calls(&self) -> usize {
        *self.calls.lock()
    }
}

#[async_trait]
impl VersionAuthority for ScriptedAuthority {
    async fn latest_version(
        &self,
        _query: VersionQuery,
    ) -> plato_version_check::Result<Option<VersionRow>> {
        *self.calls.lock() += 1;
        match &self.script {
            AuthorityScript::Answer(row) => Ok(row.clone()),
            AuthorityScript::Delay(delay, row) => {
                tokio::time::sleep(*delay).await;
                Ok(row.clone())
            }
            AuthorityScript::Fail => Err(VersionCheckError::InvalidEndpoint(
                "connection refused".into(),
            )),
            AuthorityScript::Hang => std::future::pending().await,
        }
    }
}

pub fn row(code: i64, update_type: UpdateType, is_mandatory: bool) -> VersionRow {
    VersionRow {
        update_required: true,
        is_mandatory,
        latest_version_name: format!("5.{}.0", code),
        latest_version_code: code,
        update_type,
        update_message: Some("Kitchen display protocol changed".into()),
        download_url: Some("https://play.google.com/store/apps/details?id=app.plato".into()),
        release_notes: None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtaCall {
    Check,
    Fetch,
    Reload,
}

#[derive(Clone, Copy)]
pub enum Probe {
    Available,
    Unavailable,
    Fail,
    Panic,
    Hang,
}

#[derive(Clone, Copy)]
pub enum Step {
    Succeed,
    Delay(Duration),
    Fail,
    Hang,
}

/// OTA runtime that follows a script and records every call in order.
pub struct RecordingOta {
    probe: Probe,
    fetch: Step,
    reload: Step,
    calls: Mutex<Vec<OtaCall>>,
}

impl RecordingOta {
    pub fn new(probe: Probe) -> Self {
        Self {
            probe,
            fetch: Step::Succeed,
            reload: Step::Succeed,
            calls: Mutex::new(Vec::new()),
        }
    }

        pub fn with_fetch(mut self, fetch: Step) -> Self {
        self.fetch = fetch;
        self
    }

        pub fn with_reload(mut self, reload: Step) -> Self {
        self.reload = reload;
        self
    }

    pub fn calls(&self) -> Vec<OtaCall> {
        self.calls.lock().clone()
    }

    async fn step(step: Step, what: &str) -> Result<(), OtaError> {
        match step {
            Step::Succeed => Ok(()),
            Step::Delay(delay) => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
            Step::Fail => Err(OtaError::new(format!("{} failed", what))),
            Step::Hang => std::future::pending().await,
        }
    }
}

#[async_trait]
impl OtaUpdates for RecordingOta {
    async fn check_for_update(&self) -> Result<OtaCheck, OtaError> {
        self.calls.lock().push(OtaCall::Check);
        match self.probe {
            Probe::Available => Ok(OtaCheck { is_available: true }),
            Probe::Unavailable => Ok(OtaCheck {
                is_available: false,
            }),
            Probe::Fail => Err(OtaError::new("update server unreachable")),
            Probe::Panic => panic!("OTA runtime crashed"),
            Probe::Hang => std::future::pending().await,
        }
    }

    async fn fetch_update(&self) -> Result<(), OtaError> {
        self.calls.lock().push(OtaCall::Fetch);
        Self::step(self.fetch, "fetch").await
    }

    async fn reload(&self) -> Result<(), OtaError> {
        self.calls.lock().push(OtaCall::Reload);
        Self::step(self.reload, "reload").await
    }
}

pub fn current() -> CurrentVersion {
    CurrentVersion::new("5.0.0", VersionCode::new(50).unwrap())
}

pub fn gate(authority: Arc<ScriptedAuthority>, ota: Arc<RecordingOta>) -> BootGate {
    gate_with_profile(authority, ota, BuildProfile::Release)
}

pub fn gate_with_profile(
    authority: Arc<ScriptedAuthority>,
    ota: Arc<RecordingOta>,
    build_profile: BuildProfile,
) -> BootGate {
    let config = GateConfig::builder()
        .build_profile(build_profile)
        .build()
        .unwrap();
    BootGate::new(
        authority,
        UpdateMarkers::new(Arc::new(MemoryStore::new())),
        ota,
        current(),
        Platform::Android,
        config,
    )
}
