//! Real-time delivery port

use combis_domain::{MemberId, NotificationPayload, PushNotification};
use serde::Serialize;

/// Identifier of a live real-time session
pub type SessionId = u64;

/// Events pushed to connected sessions
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum PushEvent {
    /// A freshly stored notification
    Notification(PushNotification),
    /// Unread backlog flushed on authentication
    PendingNotifications(Vec<PushNotification>),
    /// Transient message to every live session
    Broadcast(NotificationPayload),
}

/// Live session registry seen from the application
///
/// At most one session is bound per member; binding a new one replaces the
/// previous mapping (last writer wins).
pub trait PushChannel: Send + Sync {
    /// Bind a connected session to an authenticated member
    fn bind(&self, session: SessionId, membre_id: MemberId);

    /// Forget a session; returns the member it was bound to, if it still was
    fn release(&self, session: SessionId) -> Option<MemberId>;

    /// Member bound to a session
    fn member_of(&self, session: SessionId) -> Option<MemberId>;

    /// Deliver to the member's live session; `false` when none is live
    fn deliver(&self, membre_id: MemberId, event: PushEvent) -> bool;

    /// Deliver to every live session; returns how many received it
    fn broadcast(&self, event: PushEvent) -> usize;

    fn connected_members(&self) -> Vec<MemberId>;
}

/// Channel with no live sessions
pub struct NoPushChannel;

impl PushChannel for NoPushChannel {
    fn bind(&self, _session: SessionId, _membre_id: MemberId) {}
    fn release(&self, _session: SessionId) -> Option<MemberId> {
        None
    }
    fn member_of(&self, _session: SessionId) -> Option<MemberId> {
        None
    }
    fn deliver(&self, _membre_id: MemberId, _event: PushEvent) -> bool {
        false
    }
    fn broadcast(&self, _event: PushEvent) -> usize {
        0
    }
    fn connected_members(&self) -> Vec<MemberId> {
        Vec::new()
    }
}
