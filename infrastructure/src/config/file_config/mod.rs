//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Each section converts into the parameter type its consumer expects.

mod logging;
mod notifications;
mod realtime;
mod sms;
mod vote;

pub use logging::FileLoggingConfig;
pub use notifications::FileNotificationsConfig;
pub use realtime::FileRealtimeConfig;
pub use sms::FileSmsConfig;
pub use vote::FileVoteConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    #[error("sms.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("vote.min_duration_hours ({min}) is greater than vote.max_duration_hours ({max})")]
    InvertedDurationBounds { min: u32, max: u32 },

    #[error("vote.default_duration_hours ({hours}) is outside [{min}, {max}]")]
    DefaultDurationOutOfBounds { hours: u32, min: u32, max: u32 },

    #[error("vote.custom_quorum_ratio must be in (0, 1], got {0}")]
    InvalidQuorumRatio(f64),

    #[error("realtime.channel_capacity cannot be 0")]
    InvalidChannelCapacity,

    #[error("vote.sweep_interval_seconds cannot be 0")]
    InvalidSweepInterval,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub vote: FileVoteConfig,
    pub notifications: FileNotificationsConfig,
    pub sms: FileSmsConfig,
    pub realtime: FileRealtimeConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.sms.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        let (min, max) = (self.vote.min_duration_hours, self.vote.max_duration_hours);
        if min > max {
            return Err(ConfigValidationError::InvertedDurationBounds { min, max });
        }
        let hours = self.vote.default_duration_hours;
        if hours < min || hours > max {
            return Err(ConfigValidationError::DefaultDurationOutOfBounds { hours, min, max });
        }

        let ratio = self.vote.custom_quorum_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(ConfigValidationError::InvalidQuorumRatio(ratio));
        }

        if self.realtime.channel_capacity == 0 {
            return Err(ConfigValidationError::InvalidChannelCapacity);
        }
        if self.vote.sweep_interval_seconds == 0 {
            return Err(ConfigValidationError::InvalidSweepInterval);
        }

        Ok(())
    }

    /// Effective configuration as TOML, credentials masked
    pub fn to_display_toml(&self) -> String {
        let shown = Self {
            sms: self.sms.redacted(),
            ..self.clone()
        };
        toml::to_string_pretty(&shown).unwrap_or_else(|e| format!("# unprintable: {}", e))
    }
}
