//! Member responses to a vote

use crate::core::error::DomainError;
use crate::core::ids::{MemberId, ResponseId, VoteId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of a response comment, in characters
pub const MAX_COMMENT_CHARS: usize = 500;

/// A member's choice on a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseChoice {
    Pour,
    Contre,
    Abstention,
}

impl ResponseChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseChoice::Pour => "pour",
            ResponseChoice::Contre => "contre",
            ResponseChoice::Abstention => "abstention",
        }
    }
}

impl std::fmt::Display for ResponseChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ResponseChoice {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pour" | "for" => Ok(ResponseChoice::Pour),
            "contre" | "against" => Ok(ResponseChoice::Contre),
            "abstention" | "abstain" => Ok(ResponseChoice::Abstention),
            other => Err(DomainError::UnknownResponse(other.to_string())),
        }
    }
}

/// A recorded response. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteResponse {
    pub id: ResponseId,
    pub vote_id: VoteId,
    pub membre_id: MemberId,
    pub reponse: ResponseChoice,
    pub commentaire: Option<String>,
    pub date_reponse: DateTime<Utc>,
}

/// A response about to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewResponse {
    pub vote_id: VoteId,
    pub membre_id: MemberId,
    pub reponse: ResponseChoice,
    pub commentaire: Option<String>,
    pub date_reponse: DateTime<Utc>,
}

/// Reject comments longer than [`MAX_COMMENT_CHARS`]
pub fn validate_comment(comment: Option<&str>) -> Result<(), DomainError> {
    if let Some(text) = comment {
        let len = text.chars().count();
        if len > MAX_COMMENT_CHARS {
            return Err(DomainError::CommentTooLong {
                len,
                max: MAX_COMMENT_CHARS,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_choice() {
        assert_eq!("pour".parse::<ResponseChoice>().ok(), Some(ResponseChoice::Pour));
        assert_eq!("CONTRE".parse::<ResponseChoice>().ok(), Some(ResponseChoice::Contre));
        assert_eq!(
            "abstention".parse::<ResponseChoice>().ok(),
            Some(ResponseChoice::Abstention)
        );
        assert!("peut-etre".parse::<ResponseChoice>().is_err());
    }

    #[test]
    fn test_comment_limit_counts_characters() {
        let ok = "é".repeat(MAX_COMMENT_CHARS);
        assert!(validate_comment(Some(&ok)).is_ok());

        let too_long = "a".repeat(MAX_COMMENT_CHARS + 1);
        assert_eq!(
            validate_comment(Some(&too_long)),
            Err(DomainError::CommentTooLong { len: 501, max: 500 })
        );
        assert!(validate_comment(None).is_ok());
    }
}
