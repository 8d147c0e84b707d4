//! Vote engine parameters.

use combis_domain::vote::entities::{DEFAULT_DURATION_HOURS, DurationBounds};
use combis_domain::vote::vote_type::DEFAULT_CUSTOM_QUORUM_RATIO;
use combis_domain::VoteId;
use serde::{Deserialize, Serialize};

/// Static parameters for vote creation and announcement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteParams {
    /// Voting window used when the caller gives none.
    pub default_duration_hours: u32,
    /// Allowed voting window.
    pub bounds: DurationBounds,
    /// Fraction of eligible members used as quorum for a custom-quorum vote
    /// created without an explicit quorum.
    pub custom_quorum_ratio: f64,
    /// Base URL of the web front end, used to build vote links.
    pub frontend_url: String,
}

impl Default for VoteParams {
    fn default() -> Self {
        Self {
            default_duration_hours: DEFAULT_DURATION_HOURS,
            bounds: DurationBounds::default(),
            custom_quorum_ratio: DEFAULT_CUSTOM_QUORUM_RATIO,
            frontend_url: "http://localhost:3000".to_string(),
        }
    }
}

impl VoteParams {
    pub fn with_default_duration(mut self, hours: u32) -> Self {
        self.default_duration_hours = hours;
        self
    }

    pub fn with_bounds(mut self, min_hours: u32, max_hours: u32) -> Self {
        self.bounds = DurationBounds {
            min_hours,
            max_hours,
        };
        self
    }

    pub fn with_custom_quorum_ratio(mut self, ratio: f64) -> Self {
        self.custom_quorum_ratio = ratio;
        self
    }

    pub fn with_frontend_url(mut self, url: impl Into<String>) -> Self {
        self.frontend_url = url.into();
        self
    }

    /// Absolute link to a vote page
    pub fn vote_link(&self, id: VoteId) -> String {
        format!("{}/votes/{}", self.frontend_url.trim_end_matches('/'), id)
    }
}
