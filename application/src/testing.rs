//! In-memory doubles of the application ports, shared by the use case tests.

use crate::ports::clock::Clock;
use crate::ports::member_directory::MemberDirectory;
use crate::ports::notification_store::{NotificationStore, SmsStore};
use crate::ports::push_channel::{PushChannel, PushEvent, SessionId};
use crate::ports::sms_provider::{DeliveryError, ProviderReceipt, SmsProvider};
use crate::ports::vote_repository::{ClosingTransaction, StorageError, VoteRepository};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use combis_domain::{
    Claim, DateRange, Member, MemberContact, MemberId, MemberStatus, NewPushNotification,
    NewResponse, NewSms, NewVote, NotificationId, ObjetType, Pagination, PhoneNumber, PushFilter,
    PushNotification, ResponseId, Role, SmsFilter, SmsId, SmsRecord, SmsStatus, SmsTemplate,
    Tally, Vote, VoteFilter, VoteId, VoteResponse, VoteStatus,
};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;

pub(crate) fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
}

// ==================== Clock ====================

pub(crate) struct TestClock(Mutex<DateTime<Utc>>);

impl TestClock {
    pub(crate) fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub(crate) fn advance(&self, by: Duration) {
        let mut now = self.0.lock().unwrap();
        *now += by;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

// ==================== Vote store ====================

#[derive(Default, Clone)]
pub(crate) struct VoteState {
    pub(crate) votes: BTreeMap<VoteId, Vote>,
    pub(crate) responses: Vec<VoteResponse>,
    pub(crate) claims: BTreeMap<i64, Claim>,
    next_id: i64,
}

impl VoteState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn tally(&self, vote_id: VoteId) -> Tally {
        self.responses
            .iter()
            .filter(|r| r.vote_id == vote_id)
            .map(|r| r.reponse)
            .collect()
    }
}

#[derive(Default)]
pub(crate) struct MockVoteStore {
    pub(crate) state: Arc<tokio::sync::Mutex<VoteState>>,
    pub(crate) fail_claims: AtomicBool,
}

impl MockVoteStore {
    pub(crate) async fn add_claim(&self, claim: Claim) {
        self.state.lock().await.claims.insert(claim.id, claim);
    }

    pub(crate) async fn claim(&self, id: i64) -> Option<Claim> {
        self.state.lock().await.claims.get(&id).cloned()
    }

    pub(crate) async fn vote(&self, id: VoteId) -> Option<Vote> {
        self.state.lock().await.votes.get(&id).cloned()
    }
}

#[async_trait]
impl VoteRepository for MockVoteStore {
    async fn insert_vote(&self, vote: NewVote) -> Result<Vote, StorageError> {
        let mut state = self.state.lock().await;
        let id = VoteId(state.next_id());
        let stored = Vote {
            id,
            objet_type: vote.objet_type,
            objet_id: vote.objet_id,
            titre: vote.titre,
            description: vote.description,
            type_vote: vote.type_vote,
            quorum_requis: vote.quorum_requis,
            date_debut: vote.date_debut,
            date_fin: vote.date_fin,
            statut: VoteStatus::Ouvert,
            cree_par: vote.cree_par,
            updated_at: None,
        };
        state.votes.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_vote(&self, id: VoteId) -> Result<Option<Vote>, StorageError> {
        Ok(self.state.lock().await.votes.get(&id).cloned())
    }

    async fn list_votes(
        &self,
        filter: &VoteFilter,
        page: Pagination,
    ) -> Result<(Vec<Vote>, u64), StorageError> {
        let state = self.state.lock().await;
        let mut votes: Vec<_> = state
            .votes
            .values()
            .filter(|v| filter.matches(v))
            .cloned()
            .collect();
        votes.sort_by(|a, b| b.date_debut.cmp(&a.date_debut));
        let total = votes.len() as u64;
        let items = votes
            .into_iter()
            .skip(page.offset())
            .take(page.limit as usize)
            .collect();
        Ok((items, total))
    }

    async fn votes_for_object(
        &self,
        objet_type: &ObjetType,
        objet_id: i64,
    ) -> Result<Vec<Vote>, StorageError> {
        let state = self.state.lock().await;
        Ok(state
            .votes
            .values()
            .rev()
            .filter(|v| v.objet_type == *objet_type && v.objet_id == objet_id)
            .cloned()
            .collect())
    }

    async fn votes_in_range(&self, range: Option<DateRange>) -> Result<Vec<Vote>, StorageError> {
        let state = self.state.lock().await;
        Ok(state
            .votes
            .values()
            .filter(|v| range.is_none_or(|r| r.contains(v.date_debut)))
            .cloned()
            .collect())
    }

    async fn expired_open_votes(&self, now: DateTime<Utc>) -> Result<Vec<VoteId>, StorageError> {
        let state = self.state.lock().await;
        Ok(state
            .votes
            .values()
            .filter(|v| v.statut.is_open() && v.date_fin < now)
            .map(|v| v.id)
            .collect())
    }

    async fn insert_response(&self, response: NewResponse) -> Result<VoteResponse, StorageError> {
        let mut state = self.state.lock().await;
        if state
            .responses
            .iter()
            .any(|r| r.vote_id == response.vote_id && r.membre_id == response.membre_id)
        {
            return Err(StorageError::Conflict("duplicate response".to_string()));
        }
        if !state
            .votes
            .get(&response.vote_id)
            .is_some_and(|v| v.statut.is_open())
        {
            return Err(StorageError::PreconditionFailed("vote not open".to_string()));
        }
        let stored = VoteResponse {
            id: ResponseId(state.next_id()),
            vote_id: response.vote_id,
            membre_id: response.membre_id,
            reponse: response.reponse,
            commentaire: response.commentaire,
            date_reponse: response.date_reponse,
        };
        state.responses.push(stored.clone());
        Ok(stored)
    }

    async fn find_response(
        &self,
        vote_id: VoteId,
        membre_id: MemberId,
    ) -> Result<Option<VoteResponse>, StorageError> {
        let state = self.state.lock().await;
        Ok(state
            .responses
            .iter()
            .find(|r| r.vote_id == vote_id && r.membre_id == membre_id)
            .cloned())
    }

    async fn responses_for_vote(&self, vote_id: VoteId) -> Result<Vec<VoteResponse>, StorageError> {
        let state = self.state.lock().await;
        Ok(state
            .responses
            .iter()
            .rev()
            .filter(|r| r.vote_id == vote_id)
            .cloned()
            .collect())
    }

    async fn responses_by_member(
        &self,
        membre_id: MemberId,
    ) -> Result<Vec<VoteResponse>, StorageError> {
        let state = self.state.lock().await;
        Ok(state
            .responses
            .iter()
            .rev()
            .filter(|r| r.membre_id == membre_id)
            .cloned()
            .collect())
    }

    async fn tally(&self, vote_id: VoteId) -> Result<Tally, StorageError> {
        Ok(self.state.lock().await.tally(vote_id))
    }

    async fn begin(&self) -> Result<Box<dyn ClosingTransaction>, StorageError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let backup = guard.clone();
        Ok(Box::new(MockTransaction {
            guard,
            backup: Some(backup),
            fail_claims: self.fail_claims.load(Ordering::SeqCst),
        }))
    }
}

pub(crate) struct MockTransaction {
    guard: OwnedMutexGuard<VoteState>,
    backup: Option<VoteState>,
    fail_claims: bool,
}

impl Drop for MockTransaction {
    fn drop(&mut self) {
        if let Some(backup) = self.backup.take() {
            *self.guard = backup;
        }
    }
}

#[async_trait]
impl ClosingTransaction for MockTransaction {
    async fn load_open_vote(&mut self, id: VoteId) -> Result<Option<Vote>, StorageError> {
        Ok(self.guard.votes.get(&id).filter(|v| v.statut.is_open()).cloned())
    }

    async fn tally(&mut self, id: VoteId) -> Result<Tally, StorageError> {
        Ok(self.guard.tally(id))
    }

    async fn close_if_open(
        &mut self,
        id: VoteId,
        statut: VoteStatus,
        at: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        match self.guard.votes.get_mut(&id) {
            Some(vote) if vote.statut.is_open() => {
                vote.statut = statut;
                vote.updated_at = Some(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn approve_claim(
        &mut self,
        claim_id: i64,
        today: NaiveDate,
    ) -> Result<bool, StorageError> {
        if self.fail_claims {
            return Err(StorageError::Unavailable("claims table locked".to_string()));
        }
        match self.guard.claims.get_mut(&claim_id) {
            Some(claim) => {
                claim.approve_by_vote(today);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn commit(mut self: Box<Self>) -> Result<(), StorageError> {
        self.backup = None;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StorageError> {
        Ok(())
    }
}

// ==================== Member directory ====================

#[derive(Default)]
pub(crate) struct MockDirectory {
    pub(crate) members: Vec<Member>,
}

impl MockDirectory {
    pub(crate) fn with_active(count: i64) -> Self {
        Self {
            members: (1..=count)
                .map(|id| Member {
                    id: MemberId(id),
                    nom_complet: format!("Membre {}", id),
                    telephone: format!("69900{:04}", id),
                    statut: MemberStatus::Actif,
                    role: Role::Membre,
                })
                .collect(),
        }
    }
}

#[async_trait]
impl MemberDirectory for MockDirectory {
    async fn list_active_members(
        &self,
        ids: Option<&[MemberId]>,
    ) -> Result<Vec<MemberContact>, StorageError> {
        Ok(self
            .members
            .iter()
            .filter(|m| m.is_active())
            .filter(|m| ids.is_none_or(|ids| ids.contains(&m.id)))
            .map(Member::contact)
            .collect())
    }

    async fn find_member(&self, id: MemberId) -> Result<Option<Member>, StorageError> {
        Ok(self.members.iter().find(|m| m.id == id).cloned())
    }

    async fn has_role(&self, id: MemberId, roles: &[Role]) -> Result<bool, StorageError> {
        Ok(self
            .members
            .iter()
            .any(|m| m.id == id && roles.contains(&m.role)))
    }
}

// ==================== Notification store ====================

#[derive(Default)]
pub(crate) struct MockNotificationStore {
    pub(crate) push: Mutex<Vec<PushNotification>>,
    pub(crate) sms: Mutex<Vec<SmsRecord>>,
    pub(crate) templates: Mutex<HashMap<String, SmsTemplate>>,
    pub(crate) fail_for: Mutex<Vec<MemberId>>,
}

#[async_trait]
impl NotificationStore for MockNotificationStore {
    async fn insert_notification(
        &self,
        notification: NewPushNotification,
    ) -> Result<PushNotification, StorageError> {
        if self.fail_for.lock().unwrap().contains(&notification.destinataire_id) {
            return Err(StorageError::Unavailable("insert failed".to_string()));
        }
        let mut push = self.push.lock().unwrap();
        let stored = PushNotification {
            id: NotificationId(push.len() as i64 + 1),
            destinataire_id: notification.destinataire_id,
            titre: notification.payload.titre,
            message: notification.payload.message,
            type_notification: notification.payload.type_notification,
            donnees_extra: notification.payload.donnees_extra,
            lien_action: notification.payload.lien_action,
            lu: false,
            created_at: notification.created_at,
            date_lecture: None,
        };
        push.push(stored.clone());
        Ok(stored)
    }

    async fn recent_unread(
        &self,
        membre_id: MemberId,
        limit: usize,
    ) -> Result<Vec<PushNotification>, StorageError> {
        let push = self.push.lock().unwrap();
        Ok(push
            .iter()
            .rev()
            .filter(|n| n.destinataire_id == membre_id && !n.lu)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn mark_read(
        &self,
        id: NotificationId,
        membre_id: MemberId,
        at: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        let mut push = self.push.lock().unwrap();
        Ok(push
            .iter_mut()
            .find(|n| n.id == id && n.destinataire_id == membre_id)
            .is_some_and(|n| n.mark_read(at)))
    }

    async fn unread_count(&self, membre_id: MemberId) -> Result<u64, StorageError> {
        let push = self.push.lock().unwrap();
        Ok(push
            .iter()
            .filter(|n| n.destinataire_id == membre_id && !n.lu)
            .count() as u64)
    }

    async fn list_for_member(
        &self,
        membre_id: MemberId,
        filter: &PushFilter,
        page: Pagination,
    ) -> Result<(Vec<PushNotification>, u64), StorageError> {
        let push = self.push.lock().unwrap();
        let matching: Vec<_> = push
            .iter()
            .rev()
            .filter(|n| n.destinataire_id == membre_id && filter.matches(n))
            .cloned()
            .collect();
        let total = matching.len() as u64;
        Ok((
            matching
                .into_iter()
                .skip(page.offset())
                .take(page.limit as usize)
                .collect(),
            total,
        ))
    }

    async fn purge_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StorageError> {
        let mut push = self.push.lock().unwrap();
        let before = push.len();
        push.retain(|n| !n.is_older_than(cutoff));
        Ok((before - push.len()) as u64)
    }
}

#[async_trait]
impl SmsStore for MockNotificationStore {
    async fn insert_sms(&self, sms: NewSms) -> Result<SmsRecord, StorageError> {
        let mut records = self.sms.lock().unwrap();
        let stored = SmsRecord {
            id: SmsId(records.len() as i64 + 1),
            destinataire_id: sms.destinataire_id,
            telephone: sms.telephone,
            message: sms.message,
            type_notification: sms.type_notification,
            expediteur_id: sms.expediteur_id,
            statut: SmsStatus::EnAttente,
            reference_externe: None,
            cout: 0,
            erreur: None,
            tentatives: 0,
            created_at: sms.created_at,
            date_envoi: None,
        };
        records.push(stored.clone());
        Ok(stored)
    }

    async fn update_sms(&self, record: &SmsRecord) -> Result<(), StorageError> {
        let mut records = self.sms.lock().unwrap();
        let slot = records
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or_else(|| StorageError::NotFound(format!("sms {}", record.id)))?;
        *slot = record.clone();
        Ok(())
    }

    async fn list_sms(
        &self,
        filter: &SmsFilter,
        page: Pagination,
    ) -> Result<(Vec<SmsRecord>, u64), StorageError> {
        let records = self.sms.lock().unwrap();
        let matching: Vec<_> = records
            .iter()
            .rev()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        let total = matching.len() as u64;
        Ok((
            matching
                .into_iter()
                .skip(page.offset())
                .take(page.limit as usize)
                .collect(),
            total,
        ))
    }

    async fn sms_in_range(&self, range: Option<DateRange>) -> Result<Vec<SmsRecord>, StorageError> {
        let records = self.sms.lock().unwrap();
        Ok(records
            .iter()
            .filter(|r| range.is_none_or(|range| range.contains(r.created_at)))
            .cloned()
            .collect())
    }

    async fn find_active_template(&self, nom: &str) -> Result<Option<SmsTemplate>, StorageError> {
        let templates = self.templates.lock().unwrap();
        Ok(templates.get(nom).filter(|t| t.actif).cloned())
    }

    async fn upsert_template(&self, template: SmsTemplate) -> Result<(), StorageError> {
        self.templates
            .lock()
            .unwrap()
            .insert(template.nom.clone(), template);
        Ok(())
    }

    async fn list_templates(&self) -> Result<Vec<SmsTemplate>, StorageError> {
        let mut templates: Vec<_> = self.templates.lock().unwrap().values().cloned().collect();
        templates.sort_by(|a, b| a.nom.cmp(&b.nom));
        Ok(templates)
    }
}

// ==================== Push channel ====================

#[derive(Default)]
pub(crate) struct RecordingChannel {
    pub(crate) sessions: Mutex<HashMap<SessionId, MemberId>>,
    pub(crate) delivered: Mutex<Vec<(MemberId, PushEvent)>>,
}

impl PushChannel for RecordingChannel {
    fn bind(&self, session: SessionId, membre_id: MemberId) {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.retain(|_, m| *m != membre_id);
        sessions.insert(session, membre_id);
    }

    fn release(&self, session: SessionId) -> Option<MemberId> {
        self.sessions.lock().unwrap().remove(&session)
    }

    fn member_of(&self, session: SessionId) -> Option<MemberId> {
        self.sessions.lock().unwrap().get(&session).copied()
    }

    fn deliver(&self, membre_id: MemberId, event: PushEvent) -> bool {
        let live = self.sessions.lock().unwrap().values().any(|m| *m == membre_id);
        if live {
            self.delivered.lock().unwrap().push((membre_id, event));
        }
        live
    }

    fn broadcast(&self, event: PushEvent) -> usize {
        let members: Vec<_> = self.sessions.lock().unwrap().values().copied().collect();
        let mut delivered = self.delivered.lock().unwrap();
        for member in &members {
            delivered.push((*member, event.clone()));
        }
        members.len()
    }

    fn connected_members(&self) -> Vec<MemberId> {
        let mut members: Vec<_> = self.sessions.lock().unwrap().values().copied().collect();
        members.sort();
        members
    }
}

// ==================== SMS provider ====================

pub(crate) struct ScriptedProvider {
    pub(crate) sent: Mutex<Vec<(String, String)>>,
    pub(crate) script: Mutex<VecDeque<Result<ProviderReceipt, DeliveryError>>>,
    pub(crate) called: AtomicBool,
}

impl ScriptedProvider {
    pub(crate) fn always_ok() -> Self {
        Self::scripted(Vec::new())
    }

    /// Outcomes returned in order; once exhausted every send succeeds.
    pub(crate) fn scripted(script: Vec<Result<ProviderReceipt, DeliveryError>>) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            script: Mutex::new(script.into()),
            called: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl SmsProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn send(
        &self,
        to: &PhoneNumber,
        message: &str,
    ) -> Result<ProviderReceipt, DeliveryError> {
        self.called.store(true, Ordering::SeqCst);
        self.sent
            .lock()
            .unwrap()
            .push((to.as_str().to_string(), message.to_string()));
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(ProviderReceipt {
                reference: Some("ok".to_string()),
                cost: 25,
            }))
    }
}
