//! Close Vote use case
//!
//! Closing evaluation: decides whether a vote has reached a terminal state
//! and, if so, writes the new status and applies the result atomically.
//!
//! Every evaluation runs in its own [`ClosingTransaction`]. The tally is
//! re-read under the transaction and the status write is conditioned on the
//! vote still being `ouvert`, so a concurrent evaluator that loses the race
//! observes the closed vote and does nothing.

use crate::ports::audit_logger::{AuditEvent, AuditLogger, NoAuditLogger};
use crate::ports::clock::Clock;
use crate::ports::vote_repository::{ClosingTransaction, VoteRepository};
use crate::use_cases::apply_result::{AppliedEffect, ResultApplier};
use crate::use_cases::vote_error::VoteError;
use chrono::{DateTime, Utc};
use combis_domain::{Tally, Vote, VoteId, VoteOutcome, VoteStatus};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of one closing evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub vote_id: VoteId,
    /// Status after the evaluation
    pub statut: VoteStatus,
    pub tally: Tally,
    /// Whether this evaluation performed the transition
    pub closed_now: bool,
    pub effect: Option<AppliedEffect>,
}

impl Evaluation {
    fn unchanged(vote_id: VoteId, statut: VoteStatus, tally: Tally) -> Self {
        Self {
            vote_id,
            statut,
            tally,
            closed_now: false,
            effect: None,
        }
    }
}

/// Use case for evaluating and closing votes
pub struct CloseVoteUseCase<R: VoteRepository + 'static> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    applier: ResultApplier,
    audit: Arc<dyn AuditLogger>,
}

impl<R: VoteRepository + 'static> CloseVoteUseCase<R> {
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            applier: ResultApplier::new(),
            audit: Arc::new(NoAuditLogger),
        }
    }

    pub fn with_audit(mut self, audit: Arc<dyn AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    /// Evaluate a vote against its type rule
    ///
    /// Idempotent: on a vote that is already closed this reports the current
    /// status without writing anything.
    pub async fn execute(&self, vote_id: VoteId) -> Result<Evaluation, VoteError> {
        let mut tx = self.repository.begin().await?;
        let Some(vote) = tx.load_open_vote(vote_id).await? else {
            tx.rollback().await?;
            return self.current_state(vote_id).await;
        };

        let tally = tx.tally(vote_id).await?;
        let outcome = vote.type_vote.evaluate(&tally, vote.quorum_requis);
        debug!(
            "Vote {} ({}): {} pour / {} contre / {} abstention, quorum {} -> {}",
            vote.id,
            vote.type_vote,
            tally.pour,
            tally.contre,
            tally.abstention,
            vote.quorum_requis,
            outcome
        );
        self.finish(tx, vote, tally, outcome).await
    }

    /// Close a vote whose window ended before `now`, by plurality
    ///
    /// Returns `None` when the vote is not open, not yet expired, or was
    /// closed concurrently.
    pub async fn close_on_expiry(
        &self,
        vote_id: VoteId,
        now: DateTime<Utc>,
    ) -> Result<Option<Evaluation>, VoteError> {
        let mut tx = self.repository.begin().await?;
        let Some(vote) = tx.load_open_vote(vote_id).await? else {
            tx.rollback().await?;
            return Ok(None);
        };
        if !vote.is_expired(now) {
            tx.rollback().await?;
            return Ok(None);
        }

        let tally = tx.tally(vote_id).await?;
        let outcome = VoteOutcome::by_plurality(&tally);
        let evaluation = self.finish(tx, vote, tally, outcome).await?;
        Ok(evaluation.closed_now.then_some(evaluation))
    }

    async fn finish(
        &self,
        mut tx: Box<dyn ClosingTransaction>,
        vote: Vote,
        tally: Tally,
        outcome: VoteOutcome,
    ) -> Result<Evaluation, VoteError> {
        let Some(statut) = outcome.terminal_status() else {
            tx.rollback().await?;
            return Ok(Evaluation::unchanged(vote.id, VoteStatus::Ouvert, tally));
        };

        let now = self.clock.now();
        if !tx.close_if_open(vote.id, statut, now).await? {
            tx.rollback().await?;
            debug!("Vote {} was closed by a concurrent evaluation", vote.id);
            return self.current_state(vote.id).await;
        }

        let mut effect = None;
        if statut == VoteStatus::Approuve {
            match self
                .applier
                .apply_approval(tx.as_mut(), &vote, now.date_naive())
                .await
            {
                Ok(applied) => effect = Some(applied),
                Err(e) => {
                    warn!("Result of vote {} could not be applied: {}", vote.id, e);
                    if let Err(rollback_err) = tx.rollback().await {
                        warn!("Rollback of vote {} failed: {}", vote.id, rollback_err);
                    }
                    return Err(VoteError::ApplyFailed {
                        vote_id: vote.id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tx.commit().await?;
        info!("Vote {} closed: {}", vote.id, statut);

        self.audit.log(AuditEvent::new(
            "vote_closed",
            json!({
                "vote_id": vote.id,
                "statut": statut,
                "votes_pour": tally.pour,
                "votes_contre": tally.contre,
                "abstentions": tally.abstention,
                "quorum_requis": vote.quorum_requis,
            }),
        ));
        if let Some(applied) = &effect {
            self.audit.log(AuditEvent::new(
                "vote_result_applied",
                json!({
                    "vote_id": vote.id,
                    "objet_type": vote.objet_type,
                    "objet_id": vote.objet_id,
                    "effect": applied,
                }),
            ));
        }

        Ok(Evaluation {
            vote_id: vote.id,
            statut,
            tally,
            closed_now: true,
            effect,
        })
    }

    async fn current_state(&self, vote_id: VoteId) -> Result<Evaluation, VoteError> {
        let vote = self
            .repository
            .find_vote(vote_id)
            .await?
            .ok_or_else(|| VoteError::vote_not_found(vote_id))?;
        let tally = self.repository.tally(vote_id).await?;
        Ok(Evaluation::unchanged(vote_id, vote.statut, tally))
    }
}
