//! Errors of the notification gateway use cases

use crate::ports::session_authenticator::AuthError;
use crate::ports::sms_provider::DeliveryError;
use crate::ports::vote_repository::StorageError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NotificationError {
    #[error("SMS template not found or inactive: {0}")]
    TemplateNotFound(String),

    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("Authentication failed: {0}")]
    Unauthorized(#[from] AuthError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
