//! SMS configuration from TOML (`[sms]` section)

use crate::sms::{ProviderKind, ProviderSettings};
use combis_application::SmsParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSmsConfig {
    pub enabled: bool,
    pub provider: ProviderKind,
    pub api_key: String,
    pub api_secret: String,
    pub sender_id: String,
    /// Pause between two messages of a bulk send
    pub throttle_ms: u64,
    pub timeout_seconds: u64,
    pub country_code: String,
}

impl Default for FileSmsConfig {
    fn default() -> Self {
        let settings = ProviderSettings::default();
        Self {
            enabled: false,
            provider: ProviderKind::default(),
            api_key: String::new(),
            api_secret: String::new(),
            sender_id: settings.sender_id,
            throttle_ms: 100,
            timeout_seconds: settings.timeout.as_secs(),
            country_code: settings.country_code,
        }
    }
}

impl FileSmsConfig {
    pub fn to_params(&self) -> SmsParams {
        SmsParams {
            enabled: self.enabled,
            throttle: Duration::from_millis(self.throttle_ms),
            country_code: self.country_code.clone(),
        }
    }

    pub fn provider_settings(&self) -> ProviderSettings {
        ProviderSettings {
            api_key: self.api_key.clone(),
            api_secret: self.api_secret.clone(),
            sender_id: self.sender_id.clone(),
            country_code: self.country_code.clone(),
            timeout: Duration::from_secs(self.timeout_seconds),
        }
    }

    /// Same section with credentials masked, for display
    pub fn redacted(&self) -> Self {
        let mask = |s: &str| if s.is_empty() { String::new() } else { "********".to_string() };
        Self {
            api_key: mask(&self.api_key),
            api_secret: mask(&self.api_secret),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_and_timing() {
        let config: FileSmsConfig = toml::from_str(
            r#"
enabled = true
provider = "nexmo"
api_key = "key"
throttle_ms = 250
timeout_seconds = 5
"#,
        )
        .unwrap();
        assert_eq!(config.provider, ProviderKind::Nexmo);
        assert_eq!(config.to_params().throttle, Duration::from_millis(250));
        assert_eq!(config.provider_settings().timeout, Duration::from_secs(5));
        assert_eq!(config.provider_settings().sender_id, "COMBIS");
        assert_eq!(config.redacted().api_key, "********");
        assert_eq!(config.redacted().api_secret, "");
    }
}
