//! MTN SMS API (Cameroon)

use super::{ProviderSettings, rejection, transport_error};
use async_trait::async_trait;
use combis_application::ports::sms_provider::{DeliveryError, ProviderReceipt, SmsProvider};
use combis_domain::PhoneNumber;
use serde::{Deserialize, Serialize};
use tracing::debug;

const MTN_URL: &str = "https://api.mtn.cm/v1/sms/send";
const MTN_COST: u32 = 25;

#[derive(Debug, Serialize)]
struct MtnRequest<'a> {
    to: &'a str,
    from: &'a str,
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MtnResponse {
    message_id: Option<String>,
}

pub struct MtnSmsProvider {
    client: reqwest::Client,
    settings: ProviderSettings,
    url: String,
}

impl MtnSmsProvider {
    pub fn new(settings: ProviderSettings) -> Result<Self, DeliveryError> {
        Ok(Self {
            client: settings.client()?,
            settings,
            url: MTN_URL.to_string(),
        })
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[async_trait]
impl SmsProvider for MtnSmsProvider {
    fn name(&self) -> &str {
        "mtn_api"
    }

    async fn send(
        &self,
        to: &PhoneNumber,
        message: &str,
    ) -> Result<ProviderReceipt, DeliveryError> {
        debug!("MTN SMS to {}", to);
        let request = MtnRequest {
            to: to.as_str(),
            from: &self.settings.sender_id,
            text: message,
        };
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        let body: MtnResponse = response.json().await.unwrap_or_default();
        Ok(ProviderReceipt {
            reference: body.message_id,
            cost: MTN_COST,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_local_number() {
        let request = MtnRequest {
            to: "699123456",
            from: "COMBIS",
            text: "Bonjour",
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"to": "699123456", "from": "COMBIS", "text": "Bonjour"})
        );
    }

    #[test]
    fn test_response_message_id() {
        let body: MtnResponse = serde_json::from_str(r#"{"messageId": "mtn-42"}"#).unwrap();
        assert_eq!(body.message_id.as_deref(), Some("mtn-42"));
    }
}
