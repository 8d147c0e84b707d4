//! Application layer for combis
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::{NotificationParams, SmsParams, VoteParams};
pub use ports::{
    audit_logger::{AuditEvent, AuditLogger, NoAuditLogger},
    clock::Clock,
    member_directory::MemberDirectory,
    notification_store::{NotificationStore, SmsStore},
    push_channel::{NoPushChannel, PushChannel, PushEvent, SessionId},
    session_authenticator::{AuthError, SessionAuthenticator, SessionIdentity},
    sms_provider::{DeliveryError, ProviderReceipt, SmsProvider},
    vote_announcer::{NoAnnouncement, VoteAnnouncer},
    vote_repository::{ClosingTransaction, StorageError, VoteRepository},
};
pub use use_cases::apply_result::{AppliedEffect, ResultApplier};
pub use use_cases::cast_response::{CastResponseInput, CastResponseOutput, CastResponseUseCase};
pub use use_cases::close_expired_votes::CloseExpiredVotesUseCase;
pub use use_cases::close_vote::{CloseVoteUseCase, Evaluation};
pub use use_cases::create_vote::{CreateVoteInput, CreateVoteOutput, CreateVoteUseCase};
pub use use_cases::notification_error::NotificationError;
pub use use_cases::notify_new_vote::NotifyNewVoteUseCase;
pub use use_cases::push_notifications::{AuthenticatedSession, PushNotificationsUseCase};
pub use use_cases::send_sms::{RecipientResult, SendSmsUseCase, SmsRecipient, SmsRequest};
pub use use_cases::vote_error::VoteError;
pub use use_cases::vote_queries::VoteQueriesUseCase;
