//! Port definitions
//!
//! Interfaces the application layer needs from the outside world: storage,
//! the member directory, real-time delivery, SMS providers, time and the
//! audit trail. Adapters live in the infrastructure layer.

pub mod audit_logger;
pub mod clock;
pub mod member_directory;
pub mod notification_store;
pub mod push_channel;
pub mod session_authenticator;
pub mod sms_provider;
pub mod vote_announcer;
pub mod vote_repository;
