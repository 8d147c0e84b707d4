//! SMS provider adapters
//!
//! Each adapter implements [`SmsProvider`] over one gateway's HTTP API.
//! The active one is chosen from configuration by [`build_provider`].

mod mtn;
mod nexmo;
mod orange;
mod recording;

pub use mtn::MtnSmsProvider;
pub use nexmo::NexmoSmsProvider;
pub use orange::OrangeSmsProvider;
pub use recording::{RecordedSms, RecordingSmsProvider};

use combis_application::ports::sms_provider::{DeliveryError, SmsProvider};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Supported SMS gateways
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    #[serde(rename = "orange_sms_api")]
    Orange,
    #[serde(rename = "mtn_api")]
    Mtn,
    Nexmo,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Orange => "orange_sms_api",
            ProviderKind::Mtn => "mtn_api",
            ProviderKind::Nexmo => "nexmo",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Credentials and transport settings shared by the gateways
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub api_key: String,
    pub api_secret: String,
    pub sender_id: String,
    pub country_code: String,
    pub timeout: Duration,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_secret: String::new(),
            sender_id: "COMBIS".to_string(),
            country_code: "237".to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

impl ProviderSettings {
    /// HTTP client honoring the configured timeout
    fn client(&self) -> Result<reqwest::Client, DeliveryError> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("combis/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DeliveryError::Transport(e.to_string()))
    }
}

/// Build the adapter for `kind`
pub fn build_provider(
    kind: ProviderKind,
    settings: ProviderSettings,
) -> Result<Arc<dyn SmsProvider>, DeliveryError> {
    Ok(match kind {
        ProviderKind::Orange => Arc::new(OrangeSmsProvider::new(settings)?),
        ProviderKind::Mtn => Arc::new(MtnSmsProvider::new(settings)?),
        ProviderKind::Nexmo => Arc::new(NexmoSmsProvider::new(settings)?),
    })
}

fn transport_error(e: reqwest::Error) -> DeliveryError {
    if e.is_timeout() {
        DeliveryError::Timeout
    } else {
        DeliveryError::Transport(e.to_string())
    }
}

/// Turn a non-2xx answer into a provider error, preferring the body's `error` field
async fn rejection(response: reqwest::Response) -> DeliveryError {
    let status = response.status();
    let detail = response
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|body| body.get("error").map(error_text));
    DeliveryError::Provider(detail.unwrap_or_else(|| {
        format!(
            "HTTP {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        )
    }))
}

fn error_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
