//! Push Notifications use case
//!
//! Real-time half of the notification gateway. A notification is always
//! stored before any delivery is attempted; live sessions get it right away,
//! other members receive their unread backlog when their next session
//! authenticates.

use crate::config::NotificationParams;
use crate::ports::clock::Clock;
use crate::ports::notification_store::NotificationStore;
use crate::ports::push_channel::{PushChannel, PushEvent, SessionId};
use crate::ports::session_authenticator::{SessionAuthenticator, SessionIdentity};
use crate::use_cases::notification_error::NotificationError;
use chrono::Duration;
use combis_domain::{
    MemberId, NewPushNotification, NotificationId, NotificationPayload, Page, PageInfo,
    Pagination, PushFilter, PushNotification,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of a successful session authentication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSession {
    pub identity: SessionIdentity,
    /// Unread notifications flushed to the session
    pub pending: usize,
}

/// Use case for the real-time notification channel
pub struct PushNotificationsUseCase<S: NotificationStore + 'static> {
    store: Arc<S>,
    channel: Arc<dyn PushChannel>,
    authenticator: Arc<dyn SessionAuthenticator>,
    clock: Arc<dyn Clock>,
    params: NotificationParams,
}

impl<S: NotificationStore + 'static> PushNotificationsUseCase<S> {
    pub fn new(
        store: Arc<S>,
        channel: Arc<dyn PushChannel>,
        authenticator: Arc<dyn SessionAuthenticator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            channel,
            authenticator,
            clock,
            params: NotificationParams::default(),
        }
    }

    pub fn with_params(mut self, params: NotificationParams) -> Self {
        self.params = params;
        self
    }

    /// Store a notification for a member and push it if they are connected
    pub async fn send(
        &self,
        membre_id: MemberId,
        payload: NotificationPayload,
    ) -> Result<PushNotification, NotificationError> {
        let stored = self
            .store
            .insert_notification(NewPushNotification {
                destinataire_id: membre_id,
                payload,
                created_at: self.clock.now(),
            })
            .await?;

        if self
            .channel
            .deliver(membre_id, PushEvent::Notification(stored.clone()))
        {
            debug!("Notification {} pushed to member {}", stored.id, membre_id);
        } else {
            debug!(
                "Member {} offline, notification {} kept for next session",
                membre_id, stored.id
            );
        }
        Ok(stored)
    }

    /// Send the same payload to several members
    ///
    /// Members are handled independently; a failure for one is logged and
    /// skipped.
    pub async fn send_to_many(
        &self,
        membres: &[MemberId],
        payload: &NotificationPayload,
    ) -> Vec<PushNotification> {
        let mut sent = Vec::with_capacity(membres.len());
        for membre_id in membres {
            match self.send(*membre_id, payload.clone()).await {
                Ok(notification) => sent.push(notification),
                Err(e) => warn!("Notification to member {} failed: {}", membre_id, e),
            }
        }
        sent
    }

    /// Push a transient message to every live session; nothing is stored
    pub fn broadcast(&self, payload: NotificationPayload) -> usize {
        let reached = self.channel.broadcast(PushEvent::Broadcast(payload));
        info!("Broadcast reached {} sessions", reached);
        reached
    }

    /// Authenticate a session and flush the member's unread backlog
    pub async fn authenticate(
        &self,
        session: SessionId,
        token: &str,
    ) -> Result<AuthenticatedSession, NotificationError> {
        let identity = self.authenticator.authenticate(token).await?;
        self.channel.bind(session, identity.membre_id);
        info!(
            "Session {} authenticated as member {} ({})",
            session, identity.membre_id, identity.nom_complet
        );

        let pending = match self
            .store
            .recent_unread(identity.membre_id, self.params.pending_flush_limit)
            .await
        {
            Ok(pending) => pending,
            Err(e) => {
                warn!(
                    "Could not load pending notifications for member {}: {}",
                    identity.membre_id, e
                );
                Vec::new()
            }
        };
        let count = pending.len();
        if count > 0 {
            self.channel
                .deliver(identity.membre_id, PushEvent::PendingNotifications(pending));
        }

        Ok(AuthenticatedSession {
            identity,
            pending: count,
        })
    }

    /// Forget a closed session
    ///
    /// Closing a session that was already replaced by a newer one is normal.
    pub fn disconnect(&self, session: SessionId) {
        match self.channel.release(session) {
            Some(membre_id) => info!("Member {} disconnected (session {})", membre_id, session),
            None => debug!("Session {} closed", session),
        }
    }

    /// Mark a notification read; only its recipient may do so
    pub async fn mark_read(
        &self,
        id: NotificationId,
        membre_id: MemberId,
    ) -> Result<bool, NotificationError> {
        Ok(self.store.mark_read(id, membre_id, self.clock.now()).await?)
    }

    pub async fn unread_count(&self, membre_id: MemberId) -> Result<u64, NotificationError> {
        Ok(self.store.unread_count(membre_id).await?)
    }

    pub async fn list_for_member(
        &self,
        membre_id: MemberId,
        filter: &PushFilter,
        page: Pagination,
    ) -> Result<Page<PushNotification>, NotificationError> {
        let (items, total) = self.store.list_for_member(membre_id, filter, page).await?;
        Ok(Page {
            items,
            pagination: PageInfo::new(page, total),
        })
    }

    /// Delete notifications older than `days`
    pub async fn purge_older_than(&self, days: u32) -> Result<u64, NotificationError> {
        let cutoff = self.clock.now() - Duration::days(i64::from(days));
        let deleted = self.store.purge_before(cutoff).await?;
        info!("Purged {} notifications older than {} days", deleted, days);
        Ok(deleted)
    }

    /// Purge with the configured retention
    pub async fn purge_expired(&self) -> Result<u64, NotificationError> {
        self.purge_older_than(self.params.retention_days).await
    }

    pub fn connected_members(&self) -> Vec<MemberId> {
        self.channel.connected_members()
    }
}
