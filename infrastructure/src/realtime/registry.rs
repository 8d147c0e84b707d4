//! Live session registry

use super::messages::ServerMessage;
use combis_application::ports::push_channel::{PushChannel, PushEvent, SessionId};
use combis_domain::MemberId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use tokio::sync::mpsc;
use tracing::{debug, warn};

struct Session {
    outbox: mpsc::Sender<ServerMessage>,
    member: Option<MemberId>,
}

#[derive(Default)]
struct Sessions {
    by_id: HashMap<SessionId, Session>,
    /// At most one session per member; the latest bind wins
    by_member: HashMap<MemberId, SessionId>,
}

/// Registry of connected WebSocket sessions
///
/// Each session owns a bounded outbox drained by its socket task. A full
/// outbox drops the message; the notification itself is already stored.
pub struct SessionRegistry {
    sessions: RwLock<Sessions>,
    next_id: AtomicU64,
    capacity: usize,
}

impl SessionRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            sessions: RwLock::new(Sessions::default()),
            next_id: AtomicU64::new(1),
            capacity: capacity.max(1),
        }
    }

    /// Register a new connection; the receiver feeds its socket
    pub fn attach(&self) -> (SessionId, mpsc::Receiver<ServerMessage>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (outbox, inbox) = mpsc::channel(self.capacity);
        self.write().by_id.insert(
            id,
            Session {
                outbox,
                member: None,
            },
        );
        debug!("Session {} attached", id);
        (id, inbox)
    }

    /// Send directly to one session
    pub fn send_to_session(&self, session: SessionId, message: ServerMessage) -> bool {
        let sessions = self.read();
        sessions
            .by_id
            .get(&session)
            .is_some_and(|s| Self::push(session, &s.outbox, message))
    }

    pub fn session_count(&self) -> usize {
        self.read().by_id.len()
    }

    fn push(
        session: SessionId,
        outbox: &mpsc::Sender<ServerMessage>,
        message: ServerMessage,
    ) -> bool {
        match outbox.try_send(message) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Session {} outbox full, message dropped", session);
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Sessions> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Sessions> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PushChannel for SessionRegistry {
    fn bind(&self, session: SessionId, membre_id: MemberId) {
        let mut sessions = self.write();
        let Some(entry) = sessions.by_id.get_mut(&session) else {
            debug!("Bind on unknown session {}", session);
            return;
        };
        if let Some(old) = entry.member.replace(membre_id)
            && old != membre_id
            && sessions.by_member.get(&old) == Some(&session)
        {
            sessions.by_member.remove(&old);
            debug!("Session {} rebound from member {} to {}", session, old, membre_id);
        }
        if let Some(previous) = sessions.by_member.insert(membre_id, session)
            && previous != session
        {
            debug!(
                "Member {} moved from session {} to {}",
                membre_id, previous, session
            );
        }
    }

    fn release(&self, session: SessionId) -> Option<MemberId> {
        let mut sessions = self.write();
        let member = sessions.by_id.remove(&session)?.member?;
        if sessions.by_member.get(&member) == Some(&session) {
            sessions.by_member.remove(&member);
            Some(member)
        } else {
            None
        }
    }

    fn member_of(&self, session: SessionId) -> Option<MemberId> {
        self.read().by_id.get(&session).and_then(|s| s.member)
    }

    fn deliver(&self, membre_id: MemberId, event: PushEvent) -> bool {
        let sessions = self.read();
        let Some(&session) = sessions.by_member.get(&membre_id) else {
            return false;
        };
        sessions
            .by_id
            .get(&session)
            .is_some_and(|s| Self::push(session, &s.outbox, event.into()))
    }

    fn broadcast(&self, event: PushEvent) -> usize {
        let message = ServerMessage::from(event);
        let sessions = self.read();
        sessions
            .by_id
            .iter()
            .filter(|(id, s)| Self::push(**id, &s.outbox, message.clone()))
            .count()
    }

    fn connected_members(&self) -> Vec<MemberId> {
        let mut members: Vec<_> = self.read().by_member.keys().copied().collect();
        members.sort();
        members
    }
}
