//! Core domain concepts shared across all subdomains.
//!
//! - [`ids`] — strongly typed identifiers (votes, members, notifications)
//! - [`error::DomainError`] — domain-level validation errors

pub mod error;
pub mod ids;
