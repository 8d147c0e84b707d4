//! Vote outcomes and the vote status state machine

use super::tally::Tally;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Result of evaluating a tally against a vote's rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteOutcome {
    /// Terminal: the proposal is approved
    Approved,
    /// Terminal: the proposal is rejected
    Rejected,
    /// Not enough responses yet
    Pending,
}

impl VoteOutcome {
    pub fn from_approval(approved: bool) -> Self {
        if approved {
            VoteOutcome::Approved
        } else {
            VoteOutcome::Rejected
        }
    }

    /// Plurality decision used when a vote runs out of time
    ///
    /// Quorum and type-specific thresholds are ignored: strictly more "pour"
    /// than "contre" approves, anything else (ties included) rejects.
    pub fn by_plurality(tally: &Tally) -> Self {
        Self::from_approval(tally.pour > tally.contre)
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, VoteOutcome::Approved)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, VoteOutcome::Pending)
    }

    /// Terminal status this outcome moves a vote to, if any
    pub fn terminal_status(&self) -> Option<VoteStatus> {
        match self {
            VoteOutcome::Approved => Some(VoteStatus::Approuve),
            VoteOutcome::Rejected => Some(VoteStatus::Rejete),
            VoteOutcome::Pending => None,
        }
    }
}

impl std::fmt::Display for VoteOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoteOutcome::Approved => write!(f, "Approved"),
            VoteOutcome::Rejected => write!(f, "Rejected"),
            VoteOutcome::Pending => write!(f, "Pending"),
        }
    }
}

/// Lifecycle status of a vote
///
/// `Ouvert` is the only non-terminal state. A vote leaves it exactly once and
/// never reopens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VoteStatus {
    #[default]
    Ouvert,
    Approuve,
    Rejete,
}

impl VoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteStatus::Ouvert => "ouvert",
            VoteStatus::Approuve => "approuve",
            VoteStatus::Rejete => "rejete",
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, VoteStatus::Ouvert)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_open()
    }

    /// Whether the state machine allows moving from `self` to `next`
    pub fn can_transition_to(&self, next: VoteStatus) -> bool {
        self.is_open() && next.is_terminal()
    }
}

impl std::fmt::Display for VoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VoteStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ouvert" | "open" => Ok(VoteStatus::Ouvert),
            "approuve" | "approved" => Ok(VoteStatus::Approuve),
            "rejete" | "rejected" => Ok(VoteStatus::Rejete),
            other => Err(DomainError::UnknownStatus(other.to_string())),
        }
    }
}
