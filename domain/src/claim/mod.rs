//! Claims (sinistres) as touched by vote approval
//!
//! Claims are owned by another part of the association's system. The vote
//! engine only ever flips an approved claim's status and stamps it.

use crate::core::error::DomainError;
use crate::core::ids::MemberId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Note appended to a claim's remarks when a vote approves it
pub const VOTE_APPROVAL_NOTE: &str = " [Approuvé par vote]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    #[default]
    EnAttente,
    Approuve,
    Rejete,
    Paye,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::EnAttente => "en_attente",
            ClaimStatus::Approuve => "approuve",
            ClaimStatus::Rejete => "rejete",
            ClaimStatus::Paye => "paye",
        }
    }
}

impl std::fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ClaimStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "en_attente" => Ok(ClaimStatus::EnAttente),
            "approuve" => Ok(ClaimStatus::Approuve),
            "rejete" => Ok(ClaimStatus::Rejete),
            "paye" => Ok(ClaimStatus::Paye),
            other => Err(DomainError::UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub id: i64,
    pub membre_id: MemberId,
    #[serde(default)]
    pub statut: ClaimStatus,
    #[serde(default)]
    pub date_approbation: Option<NaiveDate>,
    #[serde(default)]
    pub remarques: Option<String>,
}

impl Claim {
    pub fn new(id: i64, membre_id: impl Into<MemberId>) -> Self {
        Self {
            id,
            membre_id: membre_id.into(),
            statut: ClaimStatus::EnAttente,
            date_approbation: None,
            remarques: None,
        }
    }

    /// Apply an approving vote: status, approval date and remark note
    pub fn approve_by_vote(&mut self, today: NaiveDate) {
        self.statut = ClaimStatus::Approuve;
        self.date_approbation = Some(today);
        let mut remarques = self.remarques.take().unwrap_or_default();
        remarques.push_str(VOTE_APPROVAL_NOTE);
        self.remarques = Some(remarques);
    }
}
