//! Nexmo (Vonage) SMS API

use super::{ProviderSettings, rejection, transport_error};
use async_trait::async_trait;
use combis_application::ports::sms_provider::{DeliveryError, ProviderReceipt, SmsProvider};
use combis_domain::PhoneNumber;
use serde::{Deserialize, Serialize};
use tracing::debug;

const NEXMO_URL: &str = "https://rest.nexmo.com/sms/json";
const NEXMO_COST: u32 = 50;

#[derive(Debug, Serialize)]
struct NexmoRequest<'a> {
    from: &'a str,
    to: String,
    text: &'a str,
    api_key: &'a str,
    api_secret: &'a str,
}

#[derive(Debug, Deserialize)]
struct NexmoResponse {
    #[serde(default)]
    messages: Vec<NexmoMessage>,
}

#[derive(Debug, Deserialize)]
struct NexmoMessage {
    status: String,
    #[serde(rename = "message-id")]
    message_id: Option<String>,
    #[serde(rename = "error-text")]
    error_text: Option<String>,
}

impl NexmoResponse {
    /// Only status "0" on the first message means accepted
    fn into_receipt(self) -> Result<ProviderReceipt, DeliveryError> {
        let Some(first) = self.messages.into_iter().next() else {
            return Err(DeliveryError::Provider("empty response".to_string()));
        };
        if first.status != "0" {
            return Err(DeliveryError::Provider(
                first
                    .error_text
                    .unwrap_or_else(|| format!("status {}", first.status)),
            ));
        }
        Ok(ProviderReceipt {
            reference: first.message_id,
            cost: NEXMO_COST,
        })
    }
}

pub struct NexmoSmsProvider {
    client: reqwest::Client,
    settings: ProviderSettings,
    url: String,
}

impl NexmoSmsProvider {
    pub fn new(settings: ProviderSettings) -> Result<Self, DeliveryError> {
        Ok(Self {
            client: settings.client()?,
            settings,
            url: NEXMO_URL.to_string(),
        })
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[async_trait]
impl SmsProvider for NexmoSmsProvider {
    fn name(&self) -> &str {
        "nexmo"
    }

    async fn send(
        &self,
        to: &PhoneNumber,
        message: &str,
    ) -> Result<ProviderReceipt, DeliveryError> {
        debug!("Nexmo SMS to {}", to);
        let request = NexmoRequest {
            from: &self.settings.sender_id,
            to: to.international(&self.settings.country_code),
            text: message,
            api_key: &self.settings.api_key,
            api_secret: &self.settings.api_secret,
        };
        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        let body: NexmoResponse = response
            .json()
            .await
            .map_err(|e| DeliveryError::Provider(format!("unreadable response: {}", e)))?;
        body.into_receipt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> NexmoResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_status_zero_is_success() {
        let receipt = parse(r#"{"messages": [{"status": "0", "message-id": "nx-1"}]}"#)
            .into_receipt()
            .unwrap();
        assert_eq!(receipt.reference.as_deref(), Some("nx-1"));
        assert_eq!(receipt.cost, 50);
    }

    #[test]
    fn test_non_zero_status_is_rejection() {
        let err = parse(r#"{"messages": [{"status": "4", "error-text": "Bad Credentials"}]}"#)
            .into_receipt()
            .unwrap_err();
        assert_eq!(err, DeliveryError::Provider("Bad Credentials".to_string()));

        let err = parse(r#"{"messages": []}"#).into_receipt().unwrap_err();
        assert!(matches!(err, DeliveryError::Provider(_)));
    }

    #[test]
    fn test_request_uses_international_number() {
        let phone = PhoneNumber::parse("699123456").unwrap();
        let request = NexmoRequest {
            from: "COMBIS",
            to: phone.international("237"),
            text: "Bonjour",
            api_key: "k",
            api_secret: "s",
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["to"], "237699123456");
        assert_eq!(value["api_secret"], "s");
    }
}
