//! Domain error types

use thiserror::Error;

/// Domain-level validation errors
///
/// These are raised by value objects and entities when input cannot be
/// represented in the domain (e.g. a phone number that does not reduce to a
/// local number). They never carry storage or transport concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    #[error("Comment too long: {len} characters (max {max})")]
    CommentTooLong { len: usize, max: usize },

    #[error("Vote duration must be between {min} and {max} hours, got {hours}")]
    InvalidDuration { hours: u32, min: u32, max: u32 },

    #[error("Vote title cannot be empty")]
    EmptyTitle,

    #[error("Unknown vote type: {0}")]
    UnknownVoteType(String),

    #[error("Unknown response: {0}")]
    UnknownResponse(String),

    #[error("Unknown vote status: {0}")]
    UnknownStatus(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),
}

impl DomainError {
    /// Check if this error comes from a malformed phone number
    pub fn is_invalid_phone(&self) -> bool {
        matches!(self, DomainError::InvalidPhone(_))
    }
}
