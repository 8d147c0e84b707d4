//! Members as seen by the vote engine and notification gateway.
//!
//! The member directory itself lives outside this system; only the
//! projections needed here are modelled.

pub mod entities;

pub use entities::{Member, MemberContact, MemberStatus, Role};
