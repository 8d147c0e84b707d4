//! Notification gateway parameters.

use combis_domain::notification::phone::DEFAULT_COUNTRY_CODE;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Push channel parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationParams {
    /// Unread notifications flushed to a session when it authenticates.
    pub pending_flush_limit: usize,
    /// Age after which notifications are purged.
    pub retention_days: u32,
}

impl Default for NotificationParams {
    fn default() -> Self {
        Self {
            pending_flush_limit: 10,
            retention_days: 30,
        }
    }
}

/// SMS channel parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsParams {
    /// Master switch; when off, sends fail with `Disabled` and leave no record.
    pub enabled: bool,
    /// Pause between two sends of a bulk batch.
    pub throttle: Duration,
    /// Country code stripped during phone normalization.
    pub country_code: String,
}

impl Default for SmsParams {
    fn default() -> Self {
        Self {
            enabled: false,
            throttle: Duration::from_millis(100),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
        }
    }
}

impl SmsParams {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }
}
