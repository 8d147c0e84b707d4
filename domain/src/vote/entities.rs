//! Vote entity

use super::objet::ObjetType;
use super::outcome::VoteStatus;
use super::vote_type::VoteType;
use crate::core::error::DomainError;
use crate::core::ids::{MemberId, VoteId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Default voting window, in hours
pub const DEFAULT_DURATION_HOURS: u32 = 72;
/// Shortest allowed voting window, in hours
pub const MIN_DURATION_HOURS: u32 = 1;
/// Longest allowed voting window (one week), in hours
pub const MAX_DURATION_HOURS: u32 = 168;

/// A governance proposal bound to an external object
///
/// `quorum_requis` and `date_fin` are fixed at creation. Only the closing
/// evaluation changes `statut`, and only once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub id: VoteId,
    pub objet_type: ObjetType,
    pub objet_id: i64,
    pub titre: String,
    pub description: String,
    pub type_vote: VoteType,
    pub quorum_requis: u32,
    pub date_debut: DateTime<Utc>,
    pub date_fin: DateTime<Utc>,
    pub statut: VoteStatus,
    pub cree_par: MemberId,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Vote {
    /// Whether the voting window has passed
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.date_fin
    }

    /// Whether a new response may be recorded at `now`
    pub fn accepts_responses(&self, now: DateTime<Utc>) -> bool {
        self.statut.is_open() && !self.is_expired(now)
    }
}

/// A vote about to be stored; identifier assigned by storage
#[derive(Debug, Clone, PartialEq)]
pub struct NewVote {
    pub objet_type: ObjetType,
    pub objet_id: i64,
    pub titre: String,
    pub description: String,
    pub type_vote: VoteType,
    pub quorum_requis: u32,
    pub date_debut: DateTime<Utc>,
    pub date_fin: DateTime<Utc>,
    pub cree_par: MemberId,
}

/// Bounds on the voting window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationBounds {
    pub min_hours: u32,
    pub max_hours: u32,
}

impl Default for DurationBounds {
    fn default() -> Self {
        Self {
            min_hours: MIN_DURATION_HOURS,
            max_hours: MAX_DURATION_HOURS,
        }
    }
}

impl DurationBounds {
    /// Validate `hours` and turn it into a [`Duration`]
    pub fn check(&self, hours: u32) -> Result<Duration, DomainError> {
        if hours < self.min_hours || hours > self.max_hours {
            return Err(DomainError::InvalidDuration {
                hours,
                min: self.min_hours,
                max: self.max_hours,
            });
        }
        Ok(Duration::hours(i64::from(hours)))
    }
}
