//! Port for announcing a newly created vote to its eligible members

use combis_domain::{MemberContact, Vote};

/// Fire-and-forget announcement of a new vote
///
/// Implementations must return immediately; delivery happens detached from
/// the caller and its failures are only logged.
pub trait VoteAnnouncer: Send + Sync {
    fn announce(&self, vote: &Vote, eligible: &[MemberContact]);
}

/// Announcer that does nothing
pub struct NoAnnouncement;

impl VoteAnnouncer for NoAnnouncement {
    fn announce(&self, _vote: &Vote, _eligible: &[MemberContact]) {}
}
