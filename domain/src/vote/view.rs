//! Read models returned by vote queries

use super::entities::Vote;
use super::objet::ObjetType;
use super::outcome::VoteStatus;
use super::response::ResponseChoice;
use super::tally::{Percentages, Tally};
use crate::core::ids::{MemberId, VoteId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default page size for listings
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Page request (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl Pagination {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    pub fn offset(&self) -> usize {
        (self.page.max(1) as usize - 1) * self.limit as usize
    }
}

/// Pagination metadata returned with a page of results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

impl PageInfo {
    pub fn new(request: Pagination, total: u64) -> Self {
        let limit = u64::from(request.limit.max(1));
        Self {
            page: request.page,
            limit: request.limit,
            total,
            pages: total.div_ceil(limit),
        }
    }
}

/// A page of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: PageInfo,
}

/// Filters for vote listings. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteFilter {
    pub statut: Option<VoteStatus>,
    pub objet_type: Option<ObjetType>,
}

impl VoteFilter {
    pub fn matches(&self, vote: &Vote) -> bool {
        self.statut.is_none_or(|s| s == vote.statut)
            && self.objet_type.as_ref().is_none_or(|t| *t == vote.objet_type)
    }
}

/// The requesting member's own response, if any
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnResponse {
    pub reponse: ResponseChoice,
    pub commentaire: Option<String>,
    pub date_reponse: DateTime<Utc>,
}

/// Full view of one vote, with tallies and requester context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteView {
    pub vote: Vote,
    pub tally: Tally,
    pub total_votes: u32,
    pub pourcentages: Percentages,
    pub quorum_atteint: bool,
    pub pourcentage_quorum: u32,
    pub a_vote: bool,
    pub mon_vote: Option<OwnResponse>,
    pub est_expire: bool,
    pub peut_voter: bool,
}

impl VoteView {
    pub fn build(
        vote: Vote,
        tally: Tally,
        mon_vote: Option<OwnResponse>,
        now: DateTime<Utc>,
    ) -> Self {
        let a_vote = mon_vote.is_some();
        let est_expire = vote.is_expired(now);
        let peut_voter = !a_vote && vote.accepts_responses(now);
        Self {
            total_votes: tally.total(),
            pourcentages: tally.percentages(),
            quorum_atteint: tally.quorum_reached(vote.quorum_requis),
            pourcentage_quorum: tally.quorum_percentage(vote.quorum_requis),
            vote,
            tally,
            a_vote,
            mon_vote,
            est_expire,
            peut_voter,
        }
    }
}

/// Listing entry for a vote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteSummary {
    pub vote: Vote,
    pub tally: Tally,
    pub a_vote: bool,
    pub est_expire: bool,
    pub peut_voter: bool,
}

impl VoteSummary {
    pub fn build(vote: Vote, tally: Tally, a_vote: bool, now: DateTime<Utc>) -> Self {
        let est_expire = vote.is_expired(now);
        let peut_voter = !a_vote && vote.accepts_responses(now);
        Self {
            vote,
            tally,
            a_vote,
            est_expire,
            peut_voter,
        }
    }
}

/// A vote the member took part in, with their own response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipationEntry {
    pub vote: Vote,
    pub tally: Tally,
    pub ma_reponse: OwnResponse,
}

/// One vote closed by the expiry sweep
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosedVoteResult {
    pub vote_id: VoteId,
    pub statut: VoteStatus,
    pub votes_pour: u32,
    pub votes_contre: u32,
    pub total_votes: u32,
}

/// Per object type breakdown in [`VoteStatistics`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjetTypeStats {
    pub objet_type: ObjetType,
    pub nombre: u64,
    pub approuves: u64,
}

/// Aggregate statistics over votes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct VoteStatistics {
    pub total_votes: u64,
    pub votes_ouverts: u64,
    pub votes_approuves: u64,
    pub votes_rejetes: u64,
    /// Average number of responses over closed votes
    pub participation_moyenne: Option<f64>,
    pub par_type: Vec<ObjetTypeStats>,
}

/// Inclusive time range used by statistics queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub debut: DateTime<Utc>,
    pub fin: DateTime<Utc>,
}

impl DateRange {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.debut && at <= self.fin
    }
}

/// A response together with the responder's name, for admin listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEntry {
    pub membre_id: MemberId,
    pub nom_complet: Option<String>,
    pub reponse: ResponseChoice,
    pub commentaire: Option<String>,
    pub date_reponse: DateTime<Utc>,
}
