//! Application-level configuration.
//!
//! Parameter types that control how use cases behave:
//!
//! - [`VoteParams`] — voting window bounds, custom quorum fallback, links
//! - [`NotificationParams`] — pending flush size and retention
//! - [`SmsParams`] — SMS switch, bulk throttle, country code

pub mod notification_params;
pub mod vote_params;

pub use notification_params::{NotificationParams, SmsParams};
pub use vote_params::VoteParams;
