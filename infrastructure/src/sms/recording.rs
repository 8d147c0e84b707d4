//! Offline SMS provider
//!
//! Keeps every message in memory instead of calling a gateway. Used by
//! `simulate` and by tests; numbers can be marked as failing to exercise
//! the error path.

use async_trait::async_trait;
use combis_application::ports::sms_provider::{DeliveryError, ProviderReceipt, SmsProvider};
use combis_domain::PhoneNumber;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// A message accepted by [`RecordingSmsProvider`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordedSms {
    pub to: String,
    pub message: String,
    pub reference: String,
}

#[derive(Debug, Default)]
pub struct RecordingSmsProvider {
    sent: Mutex<Vec<RecordedSms>>,
    failing: HashSet<String>,
    cost: u32,
}

impl RecordingSmsProvider {
    pub fn new() -> Self {
        Self {
            cost: 25,
            ..Self::default()
        }
    }

    /// Refuse messages to these local numbers
    pub fn failing_for<I, S>(mut self, numbers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.failing = numbers.into_iter().map(Into::into).collect();
        self
    }

    pub fn sent(&self) -> Vec<RecordedSms> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl SmsProvider for RecordingSmsProvider {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(
        &self,
        to: &PhoneNumber,
        message: &str,
    ) -> Result<ProviderReceipt, DeliveryError> {
        if self.failing.contains(to.as_str()) {
            return Err(DeliveryError::Provider(format!("number {} refused", to)));
        }
        let mut sent = self.sent.lock().unwrap_or_else(PoisonError::into_inner);
        let reference = format!("rec-{}", sent.len() + 1);
        sent.push(RecordedSms {
            to: to.as_str().to_string(),
            message: message.to_string(),
            reference: reference.clone(),
        });
        Ok(ProviderReceipt {
            reference: Some(reference),
            cost: self.cost,
        })
    }
}
