//! Configuration file loading for combis
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./combis.toml` or `./.combis.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/combis/config.toml`
//! 4. Environment: `COMBIS_<SECTION>__<KEY>`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileLoggingConfig, FileNotificationsConfig,
    FileRealtimeConfig, FileSmsConfig, FileVoteConfig,
};
pub use loader::ConfigLoader;
