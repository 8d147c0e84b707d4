//! Vote storage port
//!
//! Votes and their responses are persisted by an external storage layer.
//! Closing a vote goes through a [`ClosingTransaction`] so that the status
//! write and the result side effect commit or roll back together.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use combis_domain::{
    DateRange, MemberId, NewResponse, NewVote, ObjetType, Pagination, Tally, Vote, VoteFilter,
    VoteId, VoteResponse, VoteStatus,
};
use thiserror::Error;

/// Errors raised by storage adapters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Unique constraint violation
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A conditional write found the row in an unexpected state
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Other(String),
}

/// Persistence for votes and responses
#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// Store a new vote with status `ouvert`
    async fn insert_vote(&self, vote: NewVote) -> Result<Vote, StorageError>;

    async fn find_vote(&self, id: VoteId) -> Result<Option<Vote>, StorageError>;

    /// Votes matching `filter`, newest `date_debut` first, with the total count
    async fn list_votes(
        &self,
        filter: &VoteFilter,
        page: Pagination,
    ) -> Result<(Vec<Vote>, u64), StorageError>;

    /// Every vote bound to one object, newest first
    async fn votes_for_object(
        &self,
        objet_type: &ObjetType,
        objet_id: i64,
    ) -> Result<Vec<Vote>, StorageError>;

    /// Votes whose `date_debut` falls in `range` (all when `None`)
    async fn votes_in_range(&self, range: Option<DateRange>) -> Result<Vec<Vote>, StorageError>;

    /// Open votes whose `date_fin` is before `now`
    async fn expired_open_votes(&self, now: DateTime<Utc>) -> Result<Vec<VoteId>, StorageError>;

    /// Record a response
    ///
    /// Fails with [`StorageError::Conflict`] when the member already responded
    /// and with [`StorageError::PreconditionFailed`] when the vote is no
    /// longer open.
    async fn insert_response(&self, response: NewResponse) -> Result<VoteResponse, StorageError>;

    async fn find_response(
        &self,
        vote_id: VoteId,
        membre_id: MemberId,
    ) -> Result<Option<VoteResponse>, StorageError>;

    /// Responses of one vote, newest first
    async fn responses_for_vote(&self, vote_id: VoteId) -> Result<Vec<VoteResponse>, StorageError>;

    /// Responses given by one member, newest first
    async fn responses_by_member(
        &self,
        membre_id: MemberId,
    ) -> Result<Vec<VoteResponse>, StorageError>;

    async fn tally(&self, vote_id: VoteId) -> Result<Tally, StorageError>;

    /// Start a closing transaction
    async fn begin(&self) -> Result<Box<dyn ClosingTransaction>, StorageError>;
}

/// A storage transaction used to close one vote
///
/// Reads inside the transaction observe the state as of acquisition; writes
/// become visible on [`commit`](Self::commit). Dropping the transaction
/// without committing rolls it back.
#[async_trait]
pub trait ClosingTransaction: Send {
    /// Load the vote if it is still `ouvert`
    async fn load_open_vote(&mut self, id: VoteId) -> Result<Option<Vote>, StorageError>;

    /// Re-read the tally under the transaction
    async fn tally(&mut self, id: VoteId) -> Result<Tally, StorageError>;

    /// Write a terminal status, conditioned on the vote still being `ouvert`
    ///
    /// Returns `false` when another evaluator closed it first.
    async fn close_if_open(
        &mut self,
        id: VoteId,
        statut: VoteStatus,
        at: DateTime<Utc>,
    ) -> Result<bool, StorageError>;

    /// Mark a claim approved by vote
    ///
    /// Returns `false` when no claim with this id exists.
    async fn approve_claim(&mut self, claim_id: i64, today: NaiveDate)
    -> Result<bool, StorageError>;

    async fn commit(self: Box<Self>) -> Result<(), StorageError>;

    async fn rollback(self: Box<Self>) -> Result<(), StorageError>;
}
