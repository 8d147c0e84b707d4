//! Vote types and their quorum/threshold rules
//!
//! A vote type decides two things: how many responses are needed before a
//! vote may close (the quorum, fixed at creation), and how the tally is
//! turned into an outcome once that many responses are in.

use super::outcome::VoteOutcome;
use super::tally::Tally;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Fallback quorum ratio for custom-quorum votes created without an explicit quorum
pub const DEFAULT_CUSTOM_QUORUM_RATIO: f64 = 0.6;

/// Rule used to close and decide a vote
///
/// - `SimpleMajority`: strictly more "pour" than "contre" (default)
/// - `QualifiedMajority`: at least two thirds of respondents voted "pour"
/// - `Unanimity`: every respondent voted "pour"
/// - `CustomQuorum`: caller-chosen quorum, decided like a simple majority
///
/// # Example
///
/// ```
/// use combis_domain::vote::{Tally, VoteOutcome, VoteType};
///
/// let quorum = VoteType::SimpleMajority.required_quorum(10, None, 0.6);
/// assert_eq!(quorum, 5);
///
/// let tally = Tally::new(3, 2, 0);
/// assert_eq!(VoteType::SimpleMajority.evaluate(&tally, quorum), VoteOutcome::Approved);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VoteType {
    #[default]
    #[serde(rename = "simple_majorite")]
    SimpleMajority,

    #[serde(rename = "majorite_qualifiee")]
    QualifiedMajority,

    #[serde(rename = "unanimite")]
    Unanimity,

    #[serde(rename = "quorum")]
    CustomQuorum,
}

/// Catalogue entry describing a selectable option
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogueEntry {
    pub value: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

impl VoteType {
    pub const ALL: [VoteType; 4] = [
        VoteType::SimpleMajority,
        VoteType::QualifiedMajority,
        VoteType::Unanimity,
        VoteType::CustomQuorum,
    ];

    /// Stored identifier of this vote type
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteType::SimpleMajority => "simple_majorite",
            VoteType::QualifiedMajority => "majorite_qualifiee",
            VoteType::Unanimity => "unanimite",
            VoteType::CustomQuorum => "quorum",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            VoteType::SimpleMajority => "Majorité simple (>50%)",
            VoteType::QualifiedMajority => "Majorité qualifiée (≥2/3)",
            VoteType::Unanimity => "Unanimité (100%)",
            VoteType::CustomQuorum => "Quorum personnalisé",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            VoteType::SimpleMajority => "Plus de la moitié des votes",
            VoteType::QualifiedMajority => "Au moins 2/3 des votes",
            VoteType::Unanimity => "Tous les votes doivent être pour",
            VoteType::CustomQuorum => "Nombre de votes minimum défini",
        }
    }

    /// All vote types with label and description, for selection menus
    pub fn catalogue() -> Vec<CatalogueEntry> {
        Self::ALL
            .iter()
            .map(|t| CatalogueEntry {
                value: t.as_str(),
                label: t.label(),
                description: t.description(),
            })
            .collect()
    }

    /// Compute the quorum for a vote with `eligible` members
    ///
    /// `explicit` is only honoured for [`VoteType::CustomQuorum`]; a missing
    /// or zero value falls back to `ceil(eligible * custom_ratio)`.
    pub fn required_quorum(
        &self,
        eligible: usize,
        explicit: Option<u32>,
        custom_ratio: f64,
    ) -> u32 {
        let eligible = eligible as u64;
        let quorum = match self {
            VoteType::SimpleMajority => eligible.div_ceil(2),
            VoteType::QualifiedMajority => (eligible * 2).div_ceil(3),
            VoteType::Unanimity => eligible,
            VoteType::CustomQuorum => match explicit.filter(|q| *q > 0) {
                Some(q) => return q,
                None => (eligible as f64 * custom_ratio).ceil() as u64,
            },
        };
        u32::try_from(quorum).unwrap_or(u32::MAX)
    }

    /// Decide a vote from its current tally
    ///
    /// Returns [`VoteOutcome::Pending`] while fewer than `quorum` responses
    /// have been recorded. Abstentions count towards the quorum but not in the
    /// pour/contre comparison.
    pub fn evaluate(&self, tally: &Tally, quorum: u32) -> VoteOutcome {
        let total = tally.total();
        if total < quorum {
            return VoteOutcome::Pending;
        }

        let approved = match self {
            VoteType::SimpleMajority | VoteType::CustomQuorum => tally.pour > tally.contre,
            VoteType::QualifiedMajority => tally.pour >= (total * 2).div_ceil(3),
            VoteType::Unanimity => tally.contre == 0 && tally.pour == total,
        };

        VoteOutcome::from_approval(approved)
    }
}

impl std::fmt::Display for VoteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VoteType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple_majorite" | "simple" | "majority" => Ok(VoteType::SimpleMajority),
            "majorite_qualifiee" | "qualified" => Ok(VoteType::QualifiedMajority),
            "unanimite" | "unanimous" => Ok(VoteType::Unanimity),
            "quorum" | "custom" => Ok(VoteType::CustomQuorum),
            other => Err(DomainError::UnknownVoteType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quorum_for_ten_eligible() {
        assert_eq!(VoteType::SimpleMajority.required_quorum(10, None, 0.6), 5);
        assert_eq!(VoteType::QualifiedMajority.required_quorum(10, None, 0.6), 7);
        assert_eq!(VoteType::Unanimity.required_quorum(10, None, 0.6), 10);
        assert_eq!(VoteType::CustomQuorum.required_quorum(10, None, 0.6), 6);
    }

    #[test]
    fn test_quorum_rounds_up() {
        assert_eq!(VoteType::SimpleMajority.required_quorum(7, None, 0.6), 4);
        assert_eq!(VoteType::QualifiedMajority.required_quorum(4, None, 0.6), 3);
        assert_eq!(VoteType::CustomQuorum.required_quorum(3, None, 0.6), 2);
        assert_eq!(VoteType::SimpleMajority.required_quorum(0, None, 0.6), 0);
    }

    #[test]
    fn test_explicit_quorum_only_for_custom() {
        assert_eq!(VoteType::CustomQuorum.required_quorum(10, Some(3), 0.6), 3);
        assert_eq!(VoteType::CustomQuorum.required_quorum(10, Some(0), 0.6), 6);
        assert_eq!(VoteType::SimpleMajority.required_quorum(10, Some(3), 0.6), 5);
        assert_eq!(VoteType::Unanimity.required_quorum(10, Some(3), 0.6), 10);
    }

    #[test]
    fn test_simple_majority_outcomes() {
        let rule = VoteType::SimpleMajority;
        assert_eq!(rule.evaluate(&Tally::new(3, 2, 0), 5), VoteOutcome::Approved);
        assert_eq!(rule.evaluate(&Tally::new(2, 3, 0), 5), VoteOutcome::Rejected);
        assert_eq!(rule.evaluate(&Tally::new(3, 0, 0), 5), VoteOutcome::Pending);
    }

    #[test]
    fn test_tie_is_rejected() {
        let outcome = VoteType::SimpleMajority.evaluate(&Tally::new(4, 4, 0), 5);
        assert_eq!(outcome, VoteOutcome::Rejected);
        let outcome = VoteType::CustomQuorum.evaluate(&Tally::new(2, 2, 1), 5);
        assert_eq!(outcome, VoteOutcome::Rejected);
    }

    #[test]
    fn test_qualified_majority_uses_actual_turnout() {
        let rule = VoteType::QualifiedMajority;
        // 9 responses: threshold ceil(18/3) = 6
        assert_eq!(rule.evaluate(&Tally::new(6, 3, 0), 7), VoteOutcome::Approved);
        assert_eq!(rule.evaluate(&Tally::new(5, 2, 2), 7), VoteOutcome::Rejected);
        // 7 responses: threshold ceil(14/3) = 5
        assert_eq!(rule.evaluate(&Tally::new(5, 2, 0), 7), VoteOutcome::Approved);
    }

    #[test]
    fn test_abstention_blocks_unanimity() {
        let rule = VoteType::Unanimity;
        assert_eq!(rule.evaluate(&Tally::new(2, 0, 1), 3), VoteOutcome::Rejected);
        assert_eq!(rule.evaluate(&Tally::new(3, 0, 0), 3), VoteOutcome::Approved);
        assert_eq!(rule.evaluate(&Tally::new(2, 0, 0), 3), VoteOutcome::Pending);
    }

    #[test]
    fn test_parse_vote_type() {
        assert_eq!(
            "simple_majorite".parse::<VoteType>().ok(),
            Some(VoteType::SimpleMajority)
        );
        assert_eq!(
            "majorite_qualifiee".parse::<VoteType>().ok(),
            Some(VoteType::QualifiedMajority)
        );
        assert_eq!("unanimite".parse::<VoteType>().ok(), Some(VoteType::Unanimity));
        assert_eq!("quorum".parse::<VoteType>().ok(), Some(VoteType::CustomQuorum));
        assert!("plurality".parse::<VoteType>().is_err());
    }

    #[test]
    fn test_serde_uses_stored_names() {
        let json = serde_json::to_string(&VoteType::QualifiedMajority).unwrap();
        assert_eq!(json, "\"majorite_qualifiee\"");
        let back: VoteType = serde_json::from_str("\"quorum\"").unwrap();
        assert_eq!(back, VoteType::CustomQuorum);
    }

    #[test]
    fn test_catalogue_lists_every_type() {
        let catalogue = VoteType::catalogue();
        assert_eq!(catalogue.len(), 4);
        assert_eq!(catalogue[0].value, "simple_majorite");
    }

    #[test]
    fn test_default() {
        assert_eq!(VoteType::default(), VoteType::SimpleMajority);
    }
}
