//! Storage adapters
//!
//! [`MemoryStore`] keeps every table in process memory. It implements the
//! vote, member and notification ports, including the closing transaction.

mod memory;
mod seed;

pub use memory::{MemoryStore, MemoryTransaction};
pub use seed::{SeedData, SeedError};
