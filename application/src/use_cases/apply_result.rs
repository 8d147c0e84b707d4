//! Result application
//!
//! Runs the side effect of an approved vote on the object it was about,
//! inside the transaction that closes the vote.

use crate::ports::vote_repository::{ClosingTransaction, StorageError};
use chrono::NaiveDate;
use combis_domain::{ObjetType, Vote};
use serde::Serialize;
use tracing::{info, warn};

/// What approving a vote did to its object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum AppliedEffect {
    /// The claim was marked approved
    ClaimApproved { claim_id: i64 },
    /// The vote referenced a claim that does not exist
    ClaimMissing { claim_id: i64 },
    /// Member votes have no effect yet
    MemberUnchanged,
    /// The approved vote is itself the record of the decision
    DecisionRecorded,
    /// Object type without a registered effect
    Unhandled { objet_type: String },
}

/// Type-keyed dispatch of approval side effects
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultApplier;

impl ResultApplier {
    pub fn new() -> Self {
        Self
    }

    /// Apply the approval of `vote` within `tx`
    ///
    /// Storage failures propagate so the caller can roll back the closing.
    pub async fn apply_approval(
        &self,
        tx: &mut dyn ClosingTransaction,
        vote: &Vote,
        today: NaiveDate,
    ) -> Result<AppliedEffect, StorageError> {
        let effect = match &vote.objet_type {
            ObjetType::Sinistre => {
                if tx.approve_claim(vote.objet_id, today).await? {
                    info!("Claim {} approved by vote {}", vote.objet_id, vote.id);
                    AppliedEffect::ClaimApproved {
                        claim_id: vote.objet_id,
                    }
                } else {
                    warn!(
                        "Vote {} approved claim {} which does not exist",
                        vote.id, vote.objet_id
                    );
                    AppliedEffect::ClaimMissing {
                        claim_id: vote.objet_id,
                    }
                }
            }
            ObjetType::Membre => AppliedEffect::MemberUnchanged,
            ObjetType::Decision => AppliedEffect::DecisionRecorded,
            ObjetType::Other(other) => {
                warn!(
                    "No result handler for object type '{}' (vote {})",
                    other, vote.id
                );
                AppliedEffect::Unhandled {
                    objet_type: other.clone(),
                }
            }
        };
        Ok(effect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::vote_repository::VoteRepository;
    use crate::testing::{MockVoteStore, t0};
    use combis_domain::{Claim, ClaimStatus, MemberId, NewVote, VoteType};

    fn new_vote(objet_type: ObjetType, objet_id: i64) -> NewVote {
        NewVote {
            objet_type,
            objet_id,
            titre: "Remboursement".to_string(),
            description: String::new(),
            type_vote: VoteType::SimpleMajority,
            quorum_requis: 1,
            date_debut: t0(),
            date_fin: t0() + chrono::Duration::hours(72),
            cree_par: MemberId(1),
        }
    }

    #[tokio::test]
    async fn test_claim_is_approved() {
        let store = MockVoteStore::default();
        store.add_claim(Claim::new(12, 3)).await;
        let vote = store
            .insert_vote(new_vote(ObjetType::Sinistre, 12))
            .await
            .unwrap();
        let today = t0().date_naive();

        let mut tx = store.begin().await.unwrap();
        let effect = ResultApplier::new()
            .apply_approval(tx.as_mut(), &vote, today)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(effect, AppliedEffect::ClaimApproved { claim_id: 12 });
        let claim = store.claim(12).await.unwrap();
        assert_eq!(claim.statut, ClaimStatus::Approuve);
        assert_eq!(claim.date_approbation, Some(today));
    }

    #[tokio::test]
    async fn test_rolled_back_approval_leaves_claim_untouched() {
        let store = MockVoteStore::default();
        store.add_claim(Claim::new(12, 3)).await;
        let vote = store
            .insert_vote(new_vote(ObjetType::Sinistre, 12))
            .await
            .unwrap();

        let mut tx = store.begin().await.unwrap();
        ResultApplier::new()
            .apply_approval(tx.as_mut(), &vote, t0().date_naive())
            .await
            .unwrap();
        tx.rollback().await.unwrap();

        assert_eq!(store.claim(12).await.unwrap().statut, ClaimStatus::EnAttente);
    }

    #[tokio::test]
    async fn test_unknown_object_type_is_not_an_error() {
        let store = MockVoteStore::default();
        let vote = store
            .insert_vote(new_vote(ObjetType::from("reunion"), 5))
            .await
            .unwrap();

        let mut tx = store.begin().await.unwrap();
        let effect = ResultApplier::new()
            .apply_approval(tx.as_mut(), &vote, t0().date_naive())
            .await
            .unwrap();

        assert_eq!(
            effect,
            AppliedEffect::Unhandled {
                objet_type: "reunion".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_decision_and_member_have_no_stored_effect() {
        let store = MockVoteStore::default();
        let decision = store
            .insert_vote(new_vote(ObjetType::Decision, 1))
            .await
            .unwrap();
        let member = store
            .insert_vote(new_vote(ObjetType::Membre, 2))
            .await
            .unwrap();

        let mut tx = store.begin().await.unwrap();
        let applier = ResultApplier::new();
        let today = t0().date_naive();
        assert_eq!(
            applier.apply_approval(tx.as_mut(), &decision, today).await.unwrap(),
            AppliedEffect::DecisionRecorded
        );
        assert_eq!(
            applier.apply_approval(tx.as_mut(), &member, today).await.unwrap(),
            AppliedEffect::MemberUnchanged
        );
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let store = MockVoteStore::default();
        store
            .fail_claims
            .store(true, std::sync::atomic::Ordering::SeqCst);
        let vote = store
            .insert_vote(new_vote(ObjetType::Sinistre, 12))
            .await
            .unwrap();

        let mut tx = store.begin().await.unwrap();
        let result = ResultApplier::new()
            .apply_approval(tx.as_mut(), &vote, t0().date_naive())
            .await;
        assert!(matches!(result, Err(StorageError::Unavailable(_))));
    }
}
