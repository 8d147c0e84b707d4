//! Vote engine configuration from TOML (`[vote]` section)

use combis_application::VoteParams;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileVoteConfig {
    pub default_duration_hours: u32,
    pub min_duration_hours: u32,
    pub max_duration_hours: u32,
    /// Quorum ratio for custom-quorum votes created without an explicit quorum
    pub custom_quorum_ratio: f64,
    /// Front end base URL used in vote links
    pub frontend_url: String,
    /// Period of the expiry sweep run by `serve`
    pub sweep_interval_seconds: u64,
}

impl Default for FileVoteConfig {
    fn default() -> Self {
        let params = VoteParams::default();
        Self {
            default_duration_hours: params.default_duration_hours,
            min_duration_hours: params.bounds.min_hours,
            max_duration_hours: params.bounds.max_hours,
            custom_quorum_ratio: params.custom_quorum_ratio,
            frontend_url: params.frontend_url,
            sweep_interval_seconds: 60,
        }
    }
}

impl FileVoteConfig {
    pub fn to_params(&self) -> VoteParams {
        VoteParams::default()
            .with_default_duration(self.default_duration_hours)
            .with_bounds(self.min_duration_hours, self.max_duration_hours)
            .with_custom_quorum_ratio(self.custom_quorum_ratio)
            .with_frontend_url(&self.frontend_url)
    }
}
