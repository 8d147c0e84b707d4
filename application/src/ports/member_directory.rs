//! Member directory port
//!
//! The directory is owned by another part of the system; the vote engine
//! and the notification gateway only read from it.

use super::vote_repository::StorageError;
use async_trait::async_trait;
use combis_domain::{Member, MemberContact, MemberId, Role};

#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// Active members, optionally restricted to `ids`
    async fn list_active_members(
        &self,
        ids: Option<&[MemberId]>,
    ) -> Result<Vec<MemberContact>, StorageError>;

    async fn find_member(&self, id: MemberId) -> Result<Option<Member>, StorageError>;

    /// Whether the member holds one of `roles`
    async fn has_role(&self, id: MemberId, roles: &[Role]) -> Result<bool, StorageError>;
}
