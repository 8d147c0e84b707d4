//! In-memory transactional store

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use combis_application::ports::member_directory::MemberDirectory;
use combis_application::ports::notification_store::{NotificationStore, SmsStore};
use combis_application::ports::vote_repository::{
    ClosingTransaction, StorageError, VoteRepository,
};
use combis_domain::{
    Claim, DateRange, Member, MemberContact, MemberId, NewPushNotification, NewResponse, NewSms,
    NewVote, NotificationId, ObjetType, Pagination, PushFilter, PushNotification, ResponseId,
    Role, SmsFilter, SmsId, SmsRecord, SmsStatus, SmsTemplate, Tally, Vote, VoteFilter, VoteId,
    VoteResponse, VoteStatus,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::{debug, trace};

/// Vote-side tables; closing transactions lock and snapshot them as a unit
#[derive(Debug, Default, Clone)]
struct VoteTables {
    votes: BTreeMap<VoteId, Vote>,
    /// Unique on (vote, member)
    responses: BTreeMap<(VoteId, MemberId), VoteResponse>,
    claims: BTreeMap<i64, Claim>,
    last_vote_id: i64,
    last_response_id: i64,
}

impl VoteTables {
    fn tally(&self, vote_id: VoteId) -> Tally {
        self.responses
            .range((vote_id, MemberId(i64::MIN))..=(vote_id, MemberId(i64::MAX)))
            .map(|(_, r)| r.reponse)
            .collect()
    }

    fn newest_first(mut responses: Vec<VoteResponse>) -> Vec<VoteResponse> {
        responses.sort_by(|a, b| {
            b.date_reponse
                .cmp(&a.date_reponse)
                .then_with(|| b.id.cmp(&a.id))
        });
        responses
    }
}

#[derive(Debug, Default)]
struct NotificationTables {
    push: BTreeMap<NotificationId, PushNotification>,
    sms: BTreeMap<SmsId, SmsRecord>,
    templates: BTreeMap<String, SmsTemplate>,
    last_push_id: i64,
    last_sms_id: i64,
}

/// In-memory implementation of every storage port
///
/// Cloning shares the underlying tables.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    votes: Arc<Mutex<VoteTables>>,
    members: Arc<RwLock<BTreeMap<MemberId, Member>>>,
    notifications: Arc<Mutex<NotificationTables>>,
}

fn page_of<T>(items: Vec<T>, page: Pagination) -> (Vec<T>, u64) {
    let total = items.len() as u64;
    let items = items
        .into_iter()
        .skip(page.offset())
        .take(page.limit as usize)
        .collect();
    (items, total)
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a member
    pub async fn upsert_member(&self, member: Member) {
        self.members.write().await.insert(member.id, member);
    }

    /// Add or replace a claim
    pub async fn upsert_claim(&self, claim: Claim) {
        self.votes.lock().await.claims.insert(claim.id, claim);
    }

    pub async fn claim(&self, id: i64) -> Option<Claim> {
        self.votes.lock().await.claims.get(&id).cloned()
    }

    pub async fn member_count(&self) -> usize {
        self.members.read().await.len()
    }
}

#[async_trait]
impl VoteRepository for MemoryStore {
    async fn insert_vote(&self, vote: NewVote) -> Result<Vote, StorageError> {
        let mut tables = self.votes.lock().await;
        tables.last_vote_id += 1;
        let stored = Vote {
            id: VoteId(tables.last_vote_id),
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
        tables.votes.insert(stored.id, stored.clone());
        debug!("Stored vote {}", stored.id);
        Ok(stored)
    }

    async fn find_vote(&self, id: VoteId) -> Result<Option<Vote>, StorageError> {
        Ok(self.votes.lock().await.votes.get(&id).cloned())
    }

    async fn list_votes(
        &self,
        filter: &VoteFilter,
        page: Pagination,
    ) -> Result<(Vec<Vote>, u64), StorageError> {
        let tables = self.votes.lock().await;
        let mut votes: Vec<Vote> = tables
            .votes
            .values()
            .filter(|v| filter.matches(v))
            .cloned()
            .collect();
        votes.sort_by(|a, b| b.date_debut.cmp(&a.date_debut).then_with(|| b.id.cmp(&a.id)));
        Ok(page_of(votes, page))
    }

    async fn votes_for_object(
        &self,
        objet_type: &ObjetType,
        objet_id: i64,
    ) -> Result<Vec<Vote>, StorageError> {
        let tables = self.votes.lock().await;
        let mut votes: Vec<Vote> = tables
            .votes
            .values()
            .filter(|v| &v.objet_type == objet_type && v.objet_id == objet_id)
            .cloned()
            .collect();
        votes.sort_by(|a, b| b.date_debut.cmp(&a.date_debut).then_with(|| b.id.cmp(&a.id)));
        Ok(votes)
    }

    async fn votes_in_range(&self, range: Option<DateRange>) -> Result<Vec<Vote>, StorageError> {
        let tables = self.votes.lock().await;
        Ok(tables
            .votes
            .values()
            .filter(|v| range.is_none_or(|r| r.contains(v.date_debut)))
            .cloned()
            .collect())
    }

    async fn expired_open_votes(&self, now: DateTime<Utc>) -> Result<Vec<VoteId>, StorageError> {
        let tables = self.votes.lock().await;
        Ok(tables
            .votes
            .values()
            .filter(|v| v.statut.is_open() && v.date_fin < now)
            .map(|v| v.id)
            .collect())
    }

    async fn insert_response(&self, response: NewResponse) -> Result<VoteResponse, StorageError> {
        let mut tables = self.votes.lock().await;
        let key = (response.vote_id, response.membre_id);
        if tables.responses.contains_key(&key) {
            return Err(StorageError::Conflict(format!(
                "response of member {} to vote {}",
                response.membre_id, response.vote_id
            )));
        }
        match tables.votes.get(&response.vote_id) {
            Some(vote) if vote.statut.is_open() => {}
            Some(_) => {
                return Err(StorageError::PreconditionFailed(format!(
                    "vote {} is closed",
                    response.vote_id
                )));
            }
            None => return Err(StorageError::NotFound(format!("vote {}", response.vote_id))),
        }

        tables.last_response_id += 1;
        let stored = VoteResponse {
            id: ResponseId(tables.last_response_id),
            vote_id: response.vote_id,
            membre_id: response.membre_id,
            reponse: response.reponse,
            commentaire: response.commentaire,
            date_reponse: response.date_reponse,
        };
        tables.responses.insert(key, stored.clone());
        trace!("Stored response {} on vote {}", stored.id, stored.vote_id);
        Ok(stored)
    }

    async fn find_response(
        &self,
        vote_id: VoteId,
        membre_id: MemberId,
    ) -> Result<Option<VoteResponse>, StorageError> {
        let tables = self.votes.lock().await;
        Ok(tables.responses.get(&(vote_id, membre_id)).cloned())
    }

    async fn responses_for_vote(&self, vote_id: VoteId) -> Result<Vec<VoteResponse>, StorageError> {
        let tables = self.votes.lock().await;
        let responses = tables
            .responses
            .values()
            .filter(|r| r.vote_id == vote_id)
            .cloned()
            .collect();
        Ok(VoteTables::newest_first(responses))
    }

    async fn responses_by_member(
        &self,
        membre_id: MemberId,
    ) -> Result<Vec<VoteResponse>, StorageError> {
        let tables = self.votes.lock().await;
        let responses = tables
            .responses
            .values()
            .filter(|r| r.membre_id == membre_id)
            .cloned()
            .collect();
        Ok(VoteTables::newest_first(responses))
    }

    async fn tally(&self, vote_id: VoteId) -> Result<Tally, StorageError> {
        Ok(self.votes.lock().await.tally(vote_id))
    }

    async fn begin(&self) -> Result<Box<dyn ClosingTransaction>, StorageError> {
        let guard = Arc::clone(&self.votes).lock_owned().await;
        let snapshot = guard.clone();
        Ok(Box::new(MemoryTransaction {
            guard,
            snapshot: Some(snapshot),
        }))
    }
}

/// Closing transaction over the vote tables
///
/// Holds the table lock for its whole life, which serializes evaluators.
/// The snapshot taken at `begin` is restored unless the transaction commits.
pub struct MemoryTransaction {
    guard: OwnedMutexGuard<VoteTables>,
    snapshot: Option<VoteTables>,
}

impl Drop for MemoryTransaction {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            *self.guard = snapshot;
            debug!("Closing transaction rolled back");
        }
    }
}

#[async_trait]
impl ClosingTransaction for MemoryTransaction {
    async fn load_open_vote(&mut self, id: VoteId) -> Result<Option<Vote>, StorageError> {
        Ok(self
            .guard
            .votes
            .get(&id)
            .filter(|v| v.statut.is_open())
            .cloned())
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
        match self.guard.claims.get_mut(&claim_id) {
            Some(claim) => {
                claim.approve_by_vote(today);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn commit(mut self: Box<Self>) -> Result<(), StorageError> {
        self.snapshot = None;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StorageError> {
        Ok(())
    }
}

#[async_trait]
impl MemberDirectory for MemoryStore {
    async fn list_active_members(
        &self,
        ids: Option<&[MemberId]>,
    ) -> Result<Vec<MemberContact>, StorageError> {
        let members = self.members.read().await;
        Ok(members
            .values()
            .filter(|m| m.is_active())
            .filter(|m| ids.is_none_or(|ids| ids.contains(&m.id)))
            .map(Member::contact)
            .collect())
    }

    async fn find_member(&self, id: MemberId) -> Result<Option<Member>, StorageError> {
        Ok(self.members.read().await.get(&id).cloned())
    }

    async fn has_role(&self, id: MemberId, roles: &[Role]) -> Result<bool, StorageError> {
        let members = self.members.read().await;
        Ok(members.get(&id).is_some_and(|m| roles.contains(&m.role)))
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn insert_notification(
        &self,
        notification: NewPushNotification,
    ) -> Result<PushNotification, StorageError> {
        let mut tables = self.notifications.lock().await;
        tables.last_push_id += 1;
        let payload = notification.payload;
        let stored = PushNotification {
            id: NotificationId(tables.last_push_id),
            destinataire_id: notification.destinataire_id,
            titre: payload.titre,
            message: payload.message,
            type_notification: payload.type_notification,
            donnees_extra: payload.donnees_extra,
            lien_action: payload.lien_action,
            lu: false,
            created_at: notification.created_at,
            date_lecture: None,
        };
        tables.push.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn recent_unread(
        &self,
        membre_id: MemberId,
        limit: usize,
    ) -> Result<Vec<PushNotification>, StorageError> {
        let tables = self.notifications.lock().await;
        Ok(tables
            .push
            .values()
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
        let mut tables = self.notifications.lock().await;
        Ok(match tables.push.get_mut(&id) {
            Some(n) if n.destinataire_id == membre_id => {
                n.mark_read(at);
                true
            }
            _ => false,
        })
    }

    async fn unread_count(&self, membre_id: MemberId) -> Result<u64, StorageError> {
        let tables = self.notifications.lock().await;
        Ok(tables
            .push
            .values()
            .filter(|n| n.destinataire_id == membre_id && !n.lu)
            .count() as u64)
    }

    async fn list_for_member(
        &self,
        membre_id: MemberId,
        filter: &PushFilter,
        page: Pagination,
    ) -> Result<(Vec<PushNotification>, u64), StorageError> {
        let tables = self.notifications.lock().await;
        let items = tables
            .push
            .values()
            .rev()
            .filter(|n| n.destinataire_id == membre_id && filter.matches(n))
            .cloned()
            .collect();
        Ok(page_of(items, page))
    }

    async fn purge_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StorageError> {
        let mut tables = self.notifications.lock().await;
        let before = tables.push.len();
        tables.push.retain(|_, n| !n.is_older_than(cutoff));
        Ok((before - tables.push.len()) as u64)
    }
}

#[async_trait]
impl SmsStore for MemoryStore {
    async fn insert_sms(&self, sms: NewSms) -> Result<SmsRecord, StorageError> {
        let mut tables = self.notifications.lock().await;
        tables.last_sms_id += 1;
        let stored = SmsRecord {
            id: SmsId(tables.last_sms_id),
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
        tables.sms.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_sms(&self, record: &SmsRecord) -> Result<(), StorageError> {
        let mut tables = self.notifications.lock().await;
        match tables.sms.get_mut(&record.id) {
            Some(stored) => {
                *stored = record.clone();
                Ok(())
            }
            None => Err(StorageError::NotFound(format!("sms {}", record.id))),
        }
    }

    async fn list_sms(
        &self,
        filter: &SmsFilter,
        page: Pagination,
    ) -> Result<(Vec<SmsRecord>, u64), StorageError> {
        let tables = self.notifications.lock().await;
        let items = tables
            .sms
            .values()
            .rev()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        Ok(page_of(items, page))
    }

    async fn sms_in_range(&self, range: Option<DateRange>) -> Result<Vec<SmsRecord>, StorageError> {
        let tables = self.notifications.lock().await;
        Ok(tables
            .sms
            .values()
            .filter(|r| range.is_none_or(|range| range.contains(r.created_at)))
            .cloned()
            .collect())
    }

    async fn find_active_template(&self, nom: &str) -> Result<Option<SmsTemplate>, StorageError> {
        let tables = self.notifications.lock().await;
        Ok(tables.templates.get(nom).filter(|t| t.actif).cloned())
    }

    async fn upsert_template(&self, template: SmsTemplate) -> Result<(), StorageError> {
        let mut tables = self.notifications.lock().await;
        tables.templates.insert(template.nom.clone(), template);
        Ok(())
    }

    async fn list_templates(&self) -> Result<Vec<SmsTemplate>, StorageError> {
        Ok(self
            .notifications
            .lock()
            .await
            .templates
            .values()
            .cloned()
            .collect())
    }
}
