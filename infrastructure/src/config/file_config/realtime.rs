//! Real-time server configuration from TOML (`[realtime]` section)

use crate::realtime::RealtimeSettings;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRealtimeConfig {
    pub bind: String,
    pub port: u16,
    /// Outbox size of each live session
    pub channel_capacity: usize,
}

impl Default for FileRealtimeConfig {
    fn default() -> Self {
        let settings = RealtimeSettings::default();
        Self {
            bind: settings.bind,
            port: settings.port,
            channel_capacity: 64,
        }
    }
}

impl FileRealtimeConfig {
    pub fn to_settings(&self) -> RealtimeSettings {
        RealtimeSettings {
            bind: self.bind.clone(),
            port: self.port,
        }
    }
}
