//! Close Expired Votes use case
//!
//! Administrative sweep over open votes whose window has ended. Once time is
//! up, type-specific thresholds no longer apply: each expired vote is
//! decided by plurality of whoever responded, ties rejected.

use crate::ports::clock::Clock;
use crate::ports::vote_repository::VoteRepository;
use crate::use_cases::close_vote::CloseVoteUseCase;
use crate::use_cases::vote_error::VoteError;
use combis_domain::ClosedVoteResult;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Use case for the expiry sweep
pub struct CloseExpiredVotesUseCase<R: VoteRepository + 'static> {
    repository: Arc<R>,
    closer: Arc<CloseVoteUseCase<R>>,
    clock: Arc<dyn Clock>,
}

impl<R: VoteRepository + 'static> CloseExpiredVotesUseCase<R> {
    pub fn new(
        repository: Arc<R>,
        closer: Arc<CloseVoteUseCase<R>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            closer,
            clock,
        }
    }

    /// Close every expired open vote
    ///
    /// Each vote closes in its own transaction. A vote that fails to close is
    /// logged and left open for the next sweep; the others still close.
    /// Running the sweep twice closes nothing the second time.
    pub async fn execute(&self) -> Result<Vec<ClosedVoteResult>, VoteError> {
        let now = self.clock.now();
        let expired = self.repository.expired_open_votes(now).await?;
        info!("Expiry sweep: {} open votes past their end date", expired.len());

        let mut closed = Vec::with_capacity(expired.len());
        for vote_id in expired {
            match self.closer.close_on_expiry(vote_id, now).await {
                Ok(Some(evaluation)) => closed.push(ClosedVoteResult {
                    vote_id,
                    statut: evaluation.statut,
                    votes_pour: evaluation.tally.pour,
                    votes_contre: evaluation.tally.contre,
                    total_votes: evaluation.tally.total(),
                }),
                Ok(None) => debug!("Vote {} no longer needs closing", vote_id),
                Err(e) => error!("Failed to close expired vote {}: {}", vote_id, e),
            }
        }

        info!("Expiry sweep closed {} votes", closed.len());
        Ok(closed)
    }

    /// Sweep every `period` until `cancel` fires
    ///
    /// The first sweep runs immediately. A failed sweep is logged and the
    /// loop carries on.
    pub async fn run_every(&self, period: Duration, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Expiry sweep stopped");
                    return;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.execute().await {
                        warn!("Expiry sweep failed: {}", e);
                    }
                }
            }
        }
    }
}
