use std::time::Duration;

use bon::bon;
use plato_version_check::DEFAULT_CHECK_TIMEOUT;

use crate::error::{GateError, GateResult};

pub const DEFAULT_FAILSAFE_TIMEOUT: Duration = Duration::from_secs(8);

/// Which kind of build is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildProfile {
    /// Local development build. The gate lets everything through.
    Development,
    #[default]
    Release,
}

impl BuildProfile {
    /// Profile of the binary being compiled.
    pub fn current() -> Self {
        if cfg!(debug_assertions) {
            BuildProfile::Development
        } else {
            BuildProfile::Release
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, BuildProfile::Development)
    }
}

fn validate_timeout(name: &str, timeout: Duration) -> GateResult<Duration> {
    if timeout.is_zero() {
        return Err(GateError::InvalidConfig {
            reason: format!("{} cannot be zero", name),
        });
    }
    Ok(timeout)
}

#[derive(Debug, Clone)]
pub struct GateConfig {
    pub check_timeout: Duration,
    pub failsafe_timeout: Duration,
    pub build_profile: BuildProfile,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            check_timeout: DEFAULT_CHECK_TIMEOUT,
            failsafe_timeout: DEFAULT_FAILSAFE_TIMEOUT,
            build_profile: BuildProfile::Release,
        }
    }
}

#[bon]
impl GateConfig {
    /// Creates a gate configuration using the builder pattern.
    ///
    /// The failsafe must leave room for the version check, so it has to be
    /// strictly longer than the check timeout.
    ///
    /// # Example
    ///
    /// ```
    /// use plato_boot_gate::{BuildProfile, GateConfig};
    /// use std::time::Duration;
    ///
    /// let config = GateConfig::builder()
    ///     .check_timeout(Duration::from_secs(2))
    ///     .failsafe_timeout(Duration::from_secs(6))
    ///     .build_profile(BuildProfile::Release)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(config.failsafe_timeout, Duration::from_secs(6));
    /// ```
    #[builder]
    pub fn new(
        #[builder(default = DEFAULT_CHECK_TIMEOUT)] check_timeout: Duration,
        #[builder(default = DEFAULT_FAILSAFE_TIMEOUT)] failsafe_timeout: Duration,
        #[builder(default)] build_profile: BuildProfile,
    ) -> GateResult<Self> {
        let check_timeout = validate_timeout("check timeout", check_timeout)?;
        let failsafe_timeout = validate_timeout("failsafe timeout", failsafe_timeout)?;
        if failsafe_timeout <= check_timeout {
            return Err(GateError::InvalidConfig {
                reason: format!(
                    "failsafe timeout ({:?}) must be longer than check timeout ({:?})",
                    failsafe_timeout, check_timeout
                ),
            });
        }
        Ok(Self {
            check_timeout,
            failsafe_timeout,
            build_profile,
        })
    }
}
