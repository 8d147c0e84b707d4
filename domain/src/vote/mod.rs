//! Governance votes
//!
//! A vote is opened on an object (a claim, a member, a general decision),
//! collects at most one response per eligible member, and closes exactly once
//! when its rule is satisfied or its window runs out.
//!
//! ```text
//!            response cast / manual close          expiry sweep
//!                     │                                 │
//!                     ▼                                 ▼
//!   ┌────────┐  VoteType::evaluate   ┌──────────┐  VoteOutcome::by_plurality
//!   │ ouvert │ ─────────────────────▶│ approuve │◀────────────────────────┐
//!   └────────┘ ─────────────────────▶│  rejete  │◀────────────────────────┘
//!                                    └──────────┘
//! ```

pub mod entities;
pub mod objet;
pub mod outcome;
pub mod response;
pub mod tally;
pub mod view;
pub mod vote_type;

pub use entities::{DurationBounds, NewVote, Vote};
pub use objet::ObjetType;
pub use outcome::{VoteOutcome, VoteStatus};
pub use response::{NewResponse, ResponseChoice, VoteResponse, validate_comment};
pub use tally::{Percentages, Tally};
pub use view::{
    ClosedVoteResult, DateRange, ObjetTypeStats, OwnResponse, Page, PageInfo, Pagination,
    ParticipationEntry, ResponseEntry, VoteFilter, VoteStatistics, VoteSummary, VoteView,
};
pub use vote_type::{CatalogueEntry, VoteType};
