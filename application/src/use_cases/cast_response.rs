//! Cast Response use case
//!
//! Records a member's response and immediately runs the closing evaluation
//! for the vote, so its status is never behind by more than the request in
//! flight.

use crate::ports::audit_logger::{AuditEvent, AuditLogger, NoAuditLogger};
use crate::ports::clock::Clock;
use crate::ports::vote_repository::{StorageError, VoteRepository};
use crate::use_cases::close_vote::CloseVoteUseCase;
use crate::use_cases::vote_error::VoteError;
use combis_domain::{
    MemberId, NewResponse, ResponseChoice, VoteId, VoteResponse, VoteStatus, validate_comment,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

/// Input for the CastResponse use case
#[derive(Debug, Clone)]
pub struct CastResponseInput {
    pub vote_id: VoteId,
    pub membre_id: MemberId,
    pub reponse: ResponseChoice,
    pub commentaire: Option<String>,
}

impl CastResponseInput {
    pub fn new(vote_id: VoteId, membre_id: MemberId, reponse: ResponseChoice) -> Self {
        Self {
            vote_id,
            membre_id,
            reponse,
            commentaire: None,
        }
    }

    pub fn with_comment(mut self, commentaire: impl Into<String>) -> Self {
        self.commentaire = Some(commentaire.into());
        self
    }
}

/// Output of the CastResponse use case
#[derive(Debug, Clone)]
pub struct CastResponseOutput {
    pub response: VoteResponse,
    /// Vote status once the evaluation triggered by this response ran
    pub statut: VoteStatus,
}

/// Use case for casting a response on a vote
pub struct CastResponseUseCase<R: VoteRepository + 'static> {
    repository: Arc<R>,
    closer: Arc<CloseVoteUseCase<R>>,
    clock: Arc<dyn Clock>,
    audit: Arc<dyn AuditLogger>,
}

impl<R: VoteRepository + 'static> CastResponseUseCase<R> {
    pub fn new(
        repository: Arc<R>,
        closer: Arc<CloseVoteUseCase<R>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            closer,
            clock,
            audit: Arc::new(NoAuditLogger),
        }
    }

    pub fn with_audit(mut self, audit: Arc<dyn AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    /// Record the response, then evaluate the vote
    ///
    /// Preconditions are checked in order: the vote must exist, be `ouvert`
    /// and not past `date_fin` (else [`VoteError::VoteClosed`]); the member
    /// must not have responded yet (else [`VoteError::DuplicateVote`]).
    ///
    /// The response stays stored even when the evaluation that follows
    /// fails; that error (e.g. [`VoteError::ApplyFailed`]) is returned and
    /// the vote stays `ouvert`.
    pub async fn execute(
        &self,
        input: CastResponseInput,
    ) -> Result<CastResponseOutput, VoteError> {
        validate_comment(input.commentaire.as_deref())?;

        let now = self.clock.now();
        let vote = self
            .repository
            .find_vote(input.vote_id)
            .await?
            .ok_or_else(|| VoteError::vote_not_found(input.vote_id))?;
        if !vote.accepts_responses(now) {
            return Err(VoteError::VoteClosed(vote.id));
        }

        if self
            .repository
            .find_response(input.vote_id, input.membre_id)
            .await?
            .is_some()
        {
            return Err(VoteError::DuplicateVote {
                vote_id: input.vote_id,
                membre_id: input.membre_id,
            });
        }

        let commentaire = input
            .commentaire
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        let response = self
            .repository
            .insert_response(NewResponse {
                vote_id: input.vote_id,
                membre_id: input.membre_id,
                reponse: input.reponse,
                commentaire,
                date_reponse: now,
            })
            .await
            .map_err(|e| match e {
                StorageError::Conflict(_) => VoteError::DuplicateVote {
                    vote_id: input.vote_id,
                    membre_id: input.membre_id,
                },
                StorageError::PreconditionFailed(_) => VoteError::VoteClosed(input.vote_id),
                other => VoteError::TransientStorage(other),
            })?;

        info!(
            "Member {} responded '{}' to vote {}",
            input.membre_id, input.reponse, input.vote_id
        );
        self.audit.log(AuditEvent::new(
            "response_cast",
            json!({
                "vote_id": input.vote_id,
                "membre_id": input.membre_id,
                "reponse": input.reponse,
            }),
        ));

        let evaluation = self.closer.execute(input.vote_id).await.map_err(|e| {
            warn!(
                "Evaluation after response on vote {} failed, vote stays open: {}",
                input.vote_id, e
            );
            e
        })?;

        Ok(CastResponseOutput {
            response,
            statut: evaluation.statut,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockVoteStore, TestClock, t0};
    use chrono::Duration;
    use combis_domain::{Claim, ClaimStatus, DomainError, NewVote, ObjetType, VoteType};
    use std::sync::atomic::Ordering;

    struct Fixture {
        store: Arc<MockVoteStore>,
        clock: Arc<TestClock>,
        use_case: CastResponseUseCase<MockVoteStore>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MockVoteStore::default());
        let clock = Arc::new(TestClock::new(t0()));
        let closer = Arc::new(CloseVoteUseCase::new(Arc::clone(&store), clock.clone()));
        let use_case = CastResponseUseCase::new(Arc::clone(&store), closer, clock.clone());
        Fixture {
            store,
            clock,
            use_case,
        }
    }

    async fn open_vote(store: &MockVoteStore, quorum: u32) -> VoteId {
        store
            .insert_vote(NewVote {
                objet_type: ObjetType::Decision,
                objet_id: 1,
                titre: "Achat de chaises".to_string(),
                description: String::new(),
                type_vote: VoteType::SimpleMajority,
                quorum_requis: quorum,
                date_debut: t0(),
                date_fin: t0() + Duration::hours(72),
                cree_par: MemberId(1),
            })
            .await
            .unwrap()
            .id
    }

    fn input(vote_id: VoteId, membre: i64, reponse: ResponseChoice) -> CastResponseInput {
        CastResponseInput::new(vote_id, MemberId(membre), reponse)
    }

    #[tokio::test]
    async fn test_response_is_recorded() {
        let f = fixture();
        let id = open_vote(&f.store, 5).await;

        let output = f
            .use_case
            .execute(input(id, 2, ResponseChoice::Pour).with_comment("  D'accord  "))
            .await
            .unwrap();

        assert_eq!(output.statut, VoteStatus::Ouvert);
        assert_eq!(output.response.commentaire.as_deref(), Some("D'accord"));
        assert_eq!(f.store.tally(id).await.unwrap().pour, 1);
    }

    #[tokio::test]
    async fn test_second_response_is_rejected() {
        let f = fixture();
        let id = open_vote(&f.store, 5).await;
        f.use_case
            .execute(input(id, 2, ResponseChoice::Pour))
            .await
            .unwrap();

        let result = f.use_case.execute(input(id, 2, ResponseChoice::Contre)).await;
        assert_eq!(
            result.unwrap_err(),
            VoteError::DuplicateVote {
                vote_id: id,
                membre_id: MemberId(2)
            }
        );
        let tally = f.store.tally(id).await.unwrap();
        assert_eq!((tally.pour, tally.contre), (1, 0));
    }

    #[tokio::test]
    async fn test_response_closing_the_vote() {
        let f = fixture();
        let id = open_vote(&f.store, 2).await;
        f.use_case
            .execute(input(id, 2, ResponseChoice::Pour))
            .await
            .unwrap();

        let output = f
            .use_case
            .execute(input(id, 3, ResponseChoice::Pour))
            .await
            .unwrap();
        assert_eq!(output.statut, VoteStatus::Approuve);
    }

    #[tokio::test]
    async fn test_failed_apply_is_returned_and_response_kept() {
        let f = fixture();
        f.store.add_claim(Claim::new(8, 2)).await;
        f.store.fail_claims.store(true, Ordering::SeqCst);
        let id = f
            .store
            .insert_vote(NewVote {
                objet_type: ObjetType::Sinistre,
                objet_id: 8,
                titre: "Prise en charge du sinistre".to_string(),
                description: String::new(),
                type_vote: VoteType::SimpleMajority,
                quorum_requis: 1,
                date_debut: t0(),
                date_fin: t0() + Duration::hours(72),
                cree_par: MemberId(1),
            })
            .await
            .unwrap()
            .id;

        let result = f.use_case.execute(input(id, 2, ResponseChoice::Pour)).await;

        assert!(matches!(result, Err(VoteError::ApplyFailed { .. })));
        assert_eq!(f.store.vote(id).await.unwrap().statut, VoteStatus::Ouvert);
        assert_eq!(f.store.tally(id).await.unwrap().pour, 1);
        assert_eq!(f.store.claim(8).await.unwrap().statut, ClaimStatus::EnAttente);
    }

    #[tokio::test]
    async fn test_closed_vote_rejects_and_keeps_tally() {
        let f = fixture();
        let id = open_vote(&f.store, 1).await;
        f.use_case
            .execute(input(id, 2, ResponseChoice::Contre))
            .await
            .unwrap();

        let result = f.use_case.execute(input(id, 3, ResponseChoice::Pour)).await;
        assert_eq!(result.unwrap_err(), VoteError::VoteClosed(id));
        assert_eq!(f.store.tally(id).await.unwrap().total(), 1);
    }

    #[tokio::test]
    async fn test_expired_vote_rejects() {
        let f = fixture();
        let id = open_vote(&f.store, 5).await;
        f.clock.advance(Duration::hours(72));
        // date_fin itself is still inside the window
        f.use_case
            .execute(input(id, 2, ResponseChoice::Pour))
            .await
            .unwrap();

        f.clock.advance(Duration::seconds(1));
        let result = f.use_case.execute(input(id, 3, ResponseChoice::Pour)).await;
        assert_eq!(result.unwrap_err(), VoteError::VoteClosed(id));
    }

    #[tokio::test]
    async fn test_comment_too_long() {
        let f = fixture();
        let id = open_vote(&f.store, 5).await;

        let result = f
            .use_case
            .execute(input(id, 2, ResponseChoice::Pour).with_comment("x".repeat(501)))
            .await;
        assert!(matches!(
            result,
            Err(VoteError::Validation(DomainError::CommentTooLong { .. }))
        ));
    }

    #[tokio::test]
    async fn test_unknown_vote() {
        let f = fixture();
        let result = f
            .use_case
            .execute(input(VoteId(99), 2, ResponseChoice::Pour))
            .await;
        assert!(matches!(result, Err(VoteError::NotFound(_))));
    }
}
