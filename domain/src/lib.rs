//! Domain layer for combis
//!
//! This crate contains the core business logic, entities, and value objects
//! of the association's governance engine. It has no dependencies on
//! storage, transport or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Votes
//!
//! A vote is opened on an object (claim, member, general decision) for a
//! fixed window. Its [`VoteType`] fixes the quorum at creation and decides
//! the outcome once enough members have responded:
//!
//! - **Majorité simple**: strictly more "pour" than "contre"
//! - **Majorité qualifiée**: at least 2/3 of respondents "pour"
//! - **Unanimité**: every respondent "pour"
//! - **Quorum personnalisé**: caller-chosen quorum, simple majority decision
//!
//! ## Notifications
//!
//! Push notifications and SMS records, phone normalization and SMS templates.

pub mod claim;
pub mod core;
pub mod member;
pub mod notification;
pub mod vote;

// Re-export commonly used types
pub use claim::{Claim, ClaimStatus};
pub use core::{
    error::DomainError,
    ids::{MemberId, NotificationId, ResponseId, SmsId, VoteId},
};
pub use member::{Member, MemberContact, MemberStatus, Role};
pub use notification::{
    DispatchOutcome, NewPushNotification, NewSms, NotificationPayload, PhoneNumber, PushFilter,
    PushNotification, SmsFilter, SmsRecord, SmsStatistics, SmsStatus, SmsTemplate, TemplateVars,
};
pub use vote::{
    CatalogueEntry, ClosedVoteResult, DateRange, DurationBounds, NewResponse, NewVote, ObjetType,
    ObjetTypeStats, OwnResponse, Page, PageInfo, Pagination, ParticipationEntry, Percentages,
    ResponseChoice, ResponseEntry, Tally, Vote, VoteFilter, VoteOutcome, VoteResponse,
    VoteStatistics, VoteStatus, VoteSummary, VoteType, VoteView, validate_comment,
};
