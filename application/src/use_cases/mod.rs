//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod apply_result;
pub mod cast_response;
pub mod close_expired_votes;
pub mod close_vote;
pub mod create_vote;
pub mod notification_error;
pub mod notify_new_vote;
pub mod push_notifications;
pub mod send_sms;
pub mod vote_error;
pub mod vote_queries;
