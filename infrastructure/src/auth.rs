//! Session authentication adapter
//!
//! Tokens are verified upstream by the authentication service, which hands
//! the socket a member id. This adapter only resolves that id against the
//! directory and refuses members who are not active.

use async_trait::async_trait;
use combis_application::ports::member_directory::MemberDirectory;
use combis_application::ports::session_authenticator::{
    AuthError, SessionAuthenticator, SessionIdentity,
};
use combis_domain::MemberId;
use std::sync::Arc;

pub struct MemberTokenAuthenticator<D: MemberDirectory> {
    directory: Arc<D>,
}

impl<D: MemberDirectory> MemberTokenAuthenticator<D> {
    pub fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }

    /// Accepts `"<id>"` or `"member-<id>"`
    fn parse(token: &str) -> Result<MemberId, AuthError> {
        let token = token.trim();
        let raw = token.strip_prefix("member-").unwrap_or(token);
        raw.parse::<i64>()
            .map(MemberId)
            .map_err(|_| AuthError::InvalidToken)
    }
}

#[async_trait]
impl<D: MemberDirectory> SessionAuthenticator for MemberTokenAuthenticator<D> {
    async fn authenticate(&self, token: &str) -> Result<SessionIdentity, AuthError> {
        let membre_id = Self::parse(token)?;
        let member = self
            .directory
            .find_member(membre_id)
            .await
            .map_err(|e| AuthError::Backend(e.to_string()))?
            .filter(|m| m.is_active())
            .ok_or(AuthError::UnknownMember)?;
        Ok(SessionIdentity {
            membre_id: member.id,
            nom_complet: member.nom_complet,
        })
    }
}
