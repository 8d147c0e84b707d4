//! Session authentication port
//!
//! Token verification (JWT) belongs to the authentication service; the
//! notification gateway only needs "which active member does this token
//! identify".

use async_trait::async_trait;
use combis_domain::MemberId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,

    #[error("Member not found or inactive")]
    UnknownMember,

    #[error("Authentication backend error: {0}")]
    Backend(String),
}

/// Authenticated identity behind a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub membre_id: MemberId,
    pub nom_complet: String,
}

#[async_trait]
pub trait SessionAuthenticator: Send + Sync {
    async fn authenticate(&self, token: &str) -> Result<SessionIdentity, AuthError>;
}
