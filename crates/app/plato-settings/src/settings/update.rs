use std::time::Duration;

use plato_boot_gate::{BuildProfile, GateConfig, GateResult};
use plato_version_check::Platform;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettings {
    #[serde(with = "humantime_serde")]
    pub check_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub failsafe_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub reminder_interval: Duration,
    pub platform: Platform,
}

impl UpdateSettings {
    pub fn gate_config(&self, build_profile: BuildProfile) -> GateResult<GateConfig> {
        GateConfig::builder()
            .check_timeout(self.check_timeout)
            .failsafe_timeout(self.failsafe_timeout)
            .build_profile(build_profile)
            .build()
    }
}
