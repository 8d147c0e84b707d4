//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL audit trail of vote events; none when unset
    pub audit_log: Option<PathBuf>,
    /// Directory for daily rolling log files; stderr only when unset
    pub log_dir: Option<PathBuf>,
}
