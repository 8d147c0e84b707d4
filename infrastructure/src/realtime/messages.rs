//! WebSocket message formats
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}`.

use combis_application::ports::push_channel::PushEvent;
use combis_domain::{MemberId, NotificationId, NotificationPayload, PushNotification};
use serde::{Deserialize, Serialize};

/// Messages sent by clients
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    Authenticate { token: String },
    MarkNotificationRead { notification_id: NotificationId },
    GetUnreadCount,
    Ping,
}

/// Member shown to an authenticated session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionUser {
    pub id: MemberId,
    pub nom: String,
}

/// Messages sent by the server
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    Authenticated { success: bool, user: SessionUser },
    AuthenticationError { message: String },
    Notification(PushNotification),
    PendingNotifications(Vec<PushNotification>),
    UnreadCount { count: u64 },
    Broadcast(NotificationPayload),
    Pong,
    Error { message: String },
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                r#"{{"event":"error","data":{{"message":"serialization failed: {}"}}}}"#,
                e
            )
        })
    }
}

impl From<PushEvent> for ServerMessage {
    fn from(event: PushEvent) -> Self {
        match event {
            PushEvent::Notification(n) => ServerMessage::Notification(n),
            PushEvent::PendingNotifications(list) => ServerMessage::PendingNotifications(list),
            PushEvent::Broadcast(payload) => ServerMessage::Broadcast(payload),
        }
    }
}
