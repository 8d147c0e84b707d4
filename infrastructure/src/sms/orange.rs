//! Orange SMS API (Cameroon)

use super::{ProviderSettings, rejection, transport_error};
use async_trait::async_trait;
use combis_application::ports::sms_provider::{DeliveryError, ProviderReceipt, SmsProvider};
use combis_domain::PhoneNumber;
use serde_json::{Value, json};
use tracing::debug;

const ORANGE_URL: &str = "https://api.orange.com/smsmessaging/v1/outbound/tel%3A%2B237/requests";

/// Estimated cost per message, in FCFA
const ORANGE_COST: u32 = 25;

pub struct OrangeSmsProvider {
    client: reqwest::Client,
    settings: ProviderSettings,
    url: String,
}

impl OrangeSmsProvider {
    pub fn new(settings: ProviderSettings) -> Result<Self, DeliveryError> {
        Ok(Self {
            client: settings.client()?,
            settings,
            url: ORANGE_URL.to_string(),
        })
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    fn body(&self, to: &PhoneNumber, message: &str) -> Value {
        let cc = &self.settings.country_code;
        json!({
            "outboundSMSMessageRequest": {
                "address": format!("tel:+{}{}", cc, to),
                "senderAddress": format!("tel:+{}{}", cc, self.settings.sender_id),
                "outboundSMSTextMessage": { "message": message }
            }
        })
    }

    fn receipt(body: &Value) -> ProviderReceipt {
        ProviderReceipt {
            reference: body
                .pointer("/outboundSMSMessageRequest/resourceURL")
                .and_then(Value::as_str)
                .map(str::to_string),
            cost: ORANGE_COST,
        }
    }
}

#[async_trait]
impl SmsProvider for OrangeSmsProvider {
    fn name(&self) -> &str {
        "orange_sms_api"
    }

    async fn send(
        &self,
        to: &PhoneNumber,
        message: &str,
    ) -> Result<ProviderReceipt, DeliveryError> {
        debug!("Orange SMS to {}", to);
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.settings.api_key)
            .json(&self.body(to, message))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        let body: Value = response.json().await.unwrap_or(Value::Null);
        Ok(Self::receipt(&body))
    }
}
