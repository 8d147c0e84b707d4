//! Notification storage ports
//!
//! Push notifications, SMS records and SMS templates are owned by the
//! notification gateway. The vote engine never reads them.

use super::vote_repository::StorageError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use combis_domain::{
    DateRange, MemberId, NewPushNotification, NewSms, NotificationId, Pagination, PushFilter,
    PushNotification, SmsFilter, SmsRecord, SmsTemplate,
};

/// Persistence for push notifications
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn insert_notification(
        &self,
        notification: NewPushNotification,
    ) -> Result<PushNotification, StorageError>;

    /// Most recent unread notifications of a member, newest first
    async fn recent_unread(
        &self,
        membre_id: MemberId,
        limit: usize,
    ) -> Result<Vec<PushNotification>, StorageError>;

    /// Mark as read if `membre_id` is the recipient
    ///
    /// Returns `false` when nothing matched.
    async fn mark_read(
        &self,
        id: NotificationId,
        membre_id: MemberId,
        at: DateTime<Utc>,
    ) -> Result<bool, StorageError>;

    async fn unread_count(&self, membre_id: MemberId) -> Result<u64, StorageError>;

    /// A member's notifications, newest first, with the total count
    async fn list_for_member(
        &self,
        membre_id: MemberId,
        filter: &PushFilter,
        page: Pagination,
    ) -> Result<(Vec<PushNotification>, u64), StorageError>;

    /// Delete notifications created before `cutoff`; returns how many
    async fn purge_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StorageError>;
}

/// Persistence for SMS records and templates
#[async_trait]
pub trait SmsStore: Send + Sync {
    /// Store a new record with status `en_attente`
    async fn insert_sms(&self, sms: NewSms) -> Result<SmsRecord, StorageError>;

    async fn update_sms(&self, record: &SmsRecord) -> Result<(), StorageError>;

    /// Records matching `filter`, newest first, with the total count
    async fn list_sms(
        &self,
        filter: &SmsFilter,
        page: Pagination,
    ) -> Result<(Vec<SmsRecord>, u64), StorageError>;

    async fn sms_in_range(&self, range: Option<DateRange>) -> Result<Vec<SmsRecord>, StorageError>;

    /// Active template by name
    async fn find_active_template(&self, nom: &str) -> Result<Option<SmsTemplate>, StorageError>;

    /// Create or replace a template by name
    async fn upsert_template(&self, template: SmsTemplate) -> Result<(), StorageError>;

    async fn list_templates(&self) -> Result<Vec<SmsTemplate>, StorageError>;
}
