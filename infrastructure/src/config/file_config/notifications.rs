//! Push notification configuration from TOML (`[notifications]` section)

use combis_application::NotificationParams;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileNotificationsConfig {
    pub pending_flush_limit: usize,
    pub retention_days: u32,
}

impl Default for FileNotificationsConfig {
    fn default() -> Self {
        let params = NotificationParams::default();
        Self {
            pending_flush_limit: params.pending_flush_limit,
            retention_days: params.retention_days,
        }
    }
}

impl FileNotificationsConfig {
    pub fn to_params(&self) -> NotificationParams {
        NotificationParams {
            pending_flush_limit: self.pending_flush_limit,
            retention_days: self.retention_days,
        }
    }
}
