//! Real-time (push) notifications

use crate::core::ids::{MemberId, NotificationId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default type tag for push notifications
pub const DEFAULT_NOTIFICATION_TYPE: &str = "info";

/// What to tell a member (input to the gateway)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub titre: String,
    pub message: String,
    #[serde(rename = "type", default = "default_type")]
    pub type_notification: String,
    #[serde(default)]
    pub donnees_extra: Map<String, Value>,
    #[serde(default)]
    pub lien_action: Option<String>,
}

fn default_type() -> String {
    DEFAULT_NOTIFICATION_TYPE.to_string()
}

impl NotificationPayload {
    pub fn new(titre: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            titre: titre.into(),
            message: message.into(),
            type_notification: default_type(),
            donnees_extra: Map::new(),
            lien_action: None,
        }
    }

    pub fn with_type(mut self, type_notification: impl Into<String>) -> Self {
        self.type_notification = type_notification.into();
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.donnees_extra.insert(key.into(), value.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.lien_action = Some(link.into());
        self
    }
}

/// Persisted push notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushNotification {
    pub id: NotificationId,
    pub destinataire_id: MemberId,
    pub titre: String,
    pub message: String,
    pub type_notification: String,
    pub donnees_extra: Map<String, Value>,
    pub lien_action: Option<String>,
    pub lu: bool,
    pub created_at: DateTime<Utc>,
    pub date_lecture: Option<DateTime<Utc>>,
}

impl PushNotification {
    /// Mark as read; returns `false` if it already was
    pub fn mark_read(&mut self, at: DateTime<Utc>) -> bool {
        if self.lu {
            return false;
        }
        self.lu = true;
        self.date_lecture = Some(at);
        true
    }

    pub fn is_older_than(&self, cutoff: DateTime<Utc>) -> bool {
        self.created_at < cutoff
    }
}

/// A push notification about to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewPushNotification {
    pub destinataire_id: MemberId,
    pub payload: NotificationPayload,
    pub created_at: DateTime<Utc>,
}

/// Filters for a member's notification list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushFilter {
    pub type_notification: Option<String>,
    pub lu: Option<bool>,
}

impl PushFilter {
    pub fn matches(&self, notification: &PushNotification) -> bool {
        self.type_notification
            .as_ref()
            .is_none_or(|t| *t == notification.type_notification)
            && self.lu.is_none_or(|lu| lu == notification.lu)
    }
}
