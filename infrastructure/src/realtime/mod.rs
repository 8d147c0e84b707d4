//! Real-time notification transport
//!
//! - [`SessionRegistry`]: live sessions and their member bindings, seen by
//!   the application as a [`PushChannel`](combis_application::PushChannel)
//! - [`RealtimeServer`]: WebSocket endpoint speaking [`ClientMessage`] /
//!   [`ServerMessage`]

mod messages;
mod registry;
mod server;

pub use messages::{ClientMessage, ServerMessage, SessionUser};
pub use registry::SessionRegistry;
pub use server::{RealtimeServer, RealtimeSettings};
