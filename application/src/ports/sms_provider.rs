//! SMS provider port
//!
//! Defines the interface for sending a text message through an external
//! SMS gateway. Adapters (Orange, MTN, Nexmo) live in the infrastructure
//! layer.

use async_trait::async_trait;
use combis_domain::PhoneNumber;
use thiserror::Error;

/// Errors that can occur while dispatching an SMS
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("SMS disabled")]
    Disabled,

    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    /// The provider answered but refused the message
    #[error("Provider rejected message: {0}")]
    Provider(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Timeout")]
    Timeout,
}

/// What the provider returned for an accepted message
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProviderReceipt {
    pub reference: Option<String>,
    /// Cost in FCFA
    pub cost: u32,
}

#[async_trait]
pub trait SmsProvider: Send + Sync {
    /// Provider name as used in configuration
    fn name(&self) -> &str;

    /// Send one message to a normalized local number
    async fn send(&self, to: &PhoneNumber, message: &str)
    -> Result<ProviderReceipt, DeliveryError>;
}
