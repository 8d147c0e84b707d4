//! Infrastructure layer for combis
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod auth;
pub mod clock;
pub mod config;
pub mod logging;
pub mod realtime;
pub mod sms;
pub mod storage;

// Re-export commonly used types
pub use auth::MemberTokenAuthenticator;
pub use clock::{FixedClock, SystemClock};
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileLoggingConfig, FileNotificationsConfig,
    FileRealtimeConfig, FileSmsConfig, FileVoteConfig,
};
pub use logging::JsonlAuditLogger;
pub use realtime::{RealtimeServer, RealtimeSettings, SessionRegistry};
pub use sms::{ProviderKind, ProviderSettings, RecordingSmsProvider, build_provider};
pub use storage::{MemoryStore, SeedData, SeedError};
