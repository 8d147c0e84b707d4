//! Create Vote use case
//!
//! Opens a vote on an object for the eligible members, fixing its quorum
//! from the eligible count at creation time.

use crate::config::VoteParams;
use crate::ports::audit_logger::{AuditEvent, AuditLogger, NoAuditLogger};
use crate::ports::clock::Clock;
use crate::ports::member_directory::MemberDirectory;
use crate::ports::vote_announcer::{NoAnnouncement, VoteAnnouncer};
use crate::ports::vote_repository::VoteRepository;
use crate::use_cases::vote_error::VoteError;
use combis_domain::{DomainError, MemberId, NewVote, ObjetType, Vote, VoteType};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Input for the CreateVote use case
#[derive(Debug, Clone)]
pub struct CreateVoteInput {
    pub objet_type: ObjetType,
    pub objet_id: i64,
    pub titre: String,
    pub description: String,
    pub type_vote: VoteType,
    /// Voting window in hours; the configured default when `None`
    pub duree_heures: Option<u32>,
    /// Only honoured for [`VoteType::CustomQuorum`]
    pub quorum_personnalise: Option<u32>,
    pub cree_par: MemberId,
    /// Restrict eligibility to these members (intersected with active ones)
    pub membres_eligibles: Option<Vec<MemberId>>,
}

impl CreateVoteInput {
    pub fn new(
        objet_type: impl Into<ObjetType>,
        objet_id: i64,
        titre: impl Into<String>,
        cree_par: MemberId,
    ) -> Self {
        Self {
            objet_type: objet_type.into(),
            objet_id,
            titre: titre.into(),
            description: String::new(),
            type_vote: VoteType::default(),
            duree_heures: None,
            quorum_personnalise: None,
            cree_par,
            membres_eligibles: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_type(mut self, type_vote: VoteType) -> Self {
        self.type_vote = type_vote;
        self
    }

    pub fn with_duration_hours(mut self, hours: u32) -> Self {
        self.duree_heures = Some(hours);
        self
    }

    pub fn with_quorum(mut self, quorum: u32) -> Self {
        self.quorum_personnalise = Some(quorum);
        self
    }

    pub fn with_eligible(mut self, members: Vec<MemberId>) -> Self {
        self.membres_eligibles = Some(members);
        self
    }
}

/// Output of the CreateVote use case
#[derive(Debug, Clone)]
pub struct CreateVoteOutput {
    pub vote: Vote,
    pub nombre_eligibles: usize,
}

/// Use case for opening a vote
pub struct CreateVoteUseCase<R: VoteRepository + 'static, M: MemberDirectory + 'static> {
    repository: Arc<R>,
    directory: Arc<M>,
    clock: Arc<dyn Clock>,
    params: VoteParams,
    announcer: Arc<dyn VoteAnnouncer>,
    audit: Arc<dyn AuditLogger>,
}

impl<R: VoteRepository + 'static, M: MemberDirectory + 'static> CreateVoteUseCase<R, M> {
    pub fn new(repository: Arc<R>, directory: Arc<M>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            directory,
            clock,
            params: VoteParams::default(),
            announcer: Arc::new(NoAnnouncement),
            audit: Arc::new(NoAuditLogger),
        }
    }

    pub fn with_params(mut self, params: VoteParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_announcer(mut self, announcer: Arc<dyn VoteAnnouncer>) -> Self {
        self.announcer = announcer;
        self
    }

    pub fn with_audit(mut self, audit: Arc<dyn AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    /// Open a vote
    ///
    /// The announcement to eligible members is handed off before returning
    /// and never affects the outcome of this call.
    pub async fn execute(&self, input: CreateVoteInput) -> Result<CreateVoteOutput, VoteError> {
        let titre = input.titre.trim().to_string();
        if titre.is_empty() {
            return Err(DomainError::EmptyTitle.into());
        }
        if input.objet_id <= 0 {
            return Err(VoteError::NotFound(format!(
                "{} #{}",
                input.objet_type, input.objet_id
            )));
        }
        let hours = input
            .duree_heures
            .unwrap_or(self.params.default_duration_hours);
        let duration = self.params.bounds.check(hours)?;

        let eligible = self
            .directory
            .list_active_members(input.membres_eligibles.as_deref())
            .await?;
        let quorum_requis = input.type_vote.required_quorum(
            eligible.len(),
            input.quorum_personnalise,
            self.params.custom_quorum_ratio,
        );

        let now = self.clock.now();
        let vote = self
            .repository
            .insert_vote(NewVote {
                objet_type: input.objet_type,
                objet_id: input.objet_id,
                titre,
                description: input.description,
                type_vote: input.type_vote,
                quorum_requis,
                date_debut: now,
                date_fin: now + duration,
                cree_par: input.cree_par,
            })
            .await?;

        info!(
            "Vote {} created on {} #{} ({}, quorum {} of {} eligible)",
            vote.id,
            vote.objet_type,
            vote.objet_id,
            vote.type_vote,
            quorum_requis,
            eligible.len()
        );
        self.audit.log(AuditEvent::new(
            "vote_created",
            json!({
                "vote_id": vote.id,
                "objet_type": vote.objet_type,
                "objet_id": vote.objet_id,
                "type_vote": vote.type_vote,
                "quorum_requis": quorum_requis,
                "nombre_eligibles": eligible.len(),
                "date_fin": vote.date_fin,
                "cree_par": vote.cree_par,
            }),
        ));

        if !eligible.is_empty() {
            self.announcer.announce(&vote, &eligible);
        }

        Ok(CreateVoteOutput {
            vote,
            nombre_eligibles: eligible.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockDirectory, MockVoteStore, TestClock, t0};
    use chrono::Duration;
    use combis_domain::{MemberContact, MemberStatus, VoteStatus};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingAnnouncer(Mutex<Vec<(Vote, Vec<MemberContact>)>>);

    impl VoteAnnouncer for RecordingAnnouncer {
        fn announce(&self, vote: &Vote, eligible: &[MemberContact]) {
            self.0
                .lock()
                .unwrap()
                .push((vote.clone(), eligible.to_vec()));
        }
    }

    fn build(
        directory: MockDirectory,
    ) -> (
        CreateVoteUseCase<MockVoteStore, MockDirectory>,
        Arc<RecordingAnnouncer>,
    ) {
        let announcer = Arc::new(RecordingAnnouncer::default());
        let use_case = CreateVoteUseCase::new(
            Arc::new(MockVoteStore::default()),
            Arc::new(directory),
            Arc::new(TestClock::new(t0())),
        )
        .with_announcer(announcer.clone());
        (use_case, announcer)
    }

    fn input(type_vote: VoteType) -> CreateVoteInput {
        CreateVoteInput::new(ObjetType::Decision, 1, "Fête annuelle", MemberId(1))
            .with_type(type_vote)
    }

    #[tokio::test]
    async fn test_quorum_by_type_for_ten_members() {
        let cases = [
            (VoteType::SimpleMajority, 5),
            (VoteType::QualifiedMajority, 7),
            (VoteType::Unanimity, 10),
            (VoteType::CustomQuorum, 6),
        ];
        for (type_vote, expected) in cases {
            let (use_case, _) = build(MockDirectory::with_active(10));
            let output = use_case.execute(input(type_vote)).await.unwrap();
            assert_eq!(output.vote.quorum_requis, expected, "{}", type_vote);
            assert_eq!(output.nombre_eligibles, 10);
        }
    }

    #[tokio::test]
    async fn test_explicit_custom_quorum() {
        let (use_case, _) = build(MockDirectory::with_active(10));
        let output = use_case
            .execute(input(VoteType::CustomQuorum).with_quorum(4))
            .await
            .unwrap();
        assert_eq!(output.vote.quorum_requis, 4);

        let (use_case, _) = build(MockDirectory::with_active(10));
        let output = use_case
            .execute(input(VoteType::SimpleMajority).with_quorum(4))
            .await
            .unwrap();
        assert_eq!(output.vote.quorum_requis, 5);
    }

    #[tokio::test]
    async fn test_vote_is_open_with_default_window() {
        let (use_case, announcer) = build(MockDirectory::with_active(3));
        let output = use_case
            .execute(input(VoteType::SimpleMajority))
            .await
            .unwrap();

        assert_eq!(output.vote.statut, VoteStatus::Ouvert);
        assert_eq!(output.vote.date_debut, t0());
        assert_eq!(output.vote.date_fin, t0() + Duration::hours(72));

        let announced = announcer.0.lock().unwrap();
        assert_eq!(announced.len(), 1);
        assert_eq!(announced[0].1.len(), 3);
    }

    #[tokio::test]
    async fn test_explicit_eligible_list_is_intersected_with_active() {
        let mut directory = MockDirectory::with_active(5);
        directory.members[1].statut = MemberStatus::Suspendu;
        let (use_case, _) = build(directory);

        let output = use_case
            .execute(input(VoteType::Unanimity).with_eligible(vec![
                MemberId(1),
                MemberId(2),
                MemberId(9),
            ]))
            .await
            .unwrap();
        assert_eq!(output.nombre_eligibles, 1);
        assert_eq!(output.vote.quorum_requis, 1);
    }

    #[tokio::test]
    async fn test_validation() {
        let (use_case, announcer) = build(MockDirectory::with_active(3));

        let empty = CreateVoteInput::new(ObjetType::Decision, 1, "   ", MemberId(1));
        assert_eq!(
            use_case.execute(empty).await.unwrap_err(),
            VoteError::Validation(DomainError::EmptyTitle)
        );

        for hours in [0, 169] {
            let result = use_case
                .execute(input(VoteType::SimpleMajority).with_duration_hours(hours))
                .await;
            assert!(matches!(
                result,
                Err(VoteError::Validation(DomainError::InvalidDuration { .. }))
            ));
        }

        let bad_ref = CreateVoteInput::new(ObjetType::Sinistre, 0, "Sinistre", MemberId(1));
        assert!(matches!(
            use_case.execute(bad_ref).await,
            Err(VoteError::NotFound(_))
        ));

        assert!(announcer.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_eligible_members_skips_announcement() {
        let (use_case, announcer) = build(MockDirectory::default());
        let output = use_case
            .execute(input(VoteType::SimpleMajority))
            .await
            .unwrap();
        assert_eq!(output.nombre_eligibles, 0);
        assert_eq!(output.vote.quorum_requis, 0);
        assert!(announcer.0.lock().unwrap().is_empty());
    }
}
