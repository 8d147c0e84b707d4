//! Error taxonomy shared by the vote engine use cases

use crate::ports::vote_repository::StorageError;
use combis_domain::{DomainError, MemberId, VoteId};
use thiserror::Error;

/// Errors that can occur while creating, casting on or closing a vote
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VoteError {
    #[error("Validation error: {0}")]
    Validation(#[from] DomainError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Vote {0} is closed")]
    VoteClosed(VoteId),

    #[error("Member {membre_id} already responded to vote {vote_id}")]
    DuplicateVote { vote_id: VoteId, membre_id: MemberId },

    #[error("Storage error: {0}")]
    TransientStorage(#[from] StorageError),

    #[error("Applying the result of vote {vote_id} failed: {reason}")]
    ApplyFailed { vote_id: VoteId, reason: String },
}

impl VoteError {
    pub fn vote_not_found(id: VoteId) -> Self {
        VoteError::NotFound(format!("vote {}", id))
    }

    /// Message safe to show to end users
    ///
    /// Storage and side-effect details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            VoteError::Validation(_) => "Données invalides",
            VoteError::NotFound(_) => "Vote non trouvé",
            VoteError::VoteClosed(_) => "Ce vote est fermé",
            VoteError::DuplicateVote { .. } => "Vous avez déjà voté",
            VoteError::TransientStorage(_) | VoteError::ApplyFailed { .. } => {
                "Erreur serveur, veuillez réessayer"
            }
        }
    }

    /// Whether retrying the same call later may succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            VoteError::TransientStorage(_) | VoteError::ApplyFailed { .. }
        )
    }
}
