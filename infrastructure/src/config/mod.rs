//! Configuration file loading for doxa
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `DOXA_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./doxa.toml` or `./.doxa.toml`
//! 4. Global: `~/.config/doxa/config.toml` (platform config directory)
//! 5. Default values

mod file_config;
mod loader;
mod validation;

pub use file_config::{
    ConfigValidationError, FileAgentConfig, FileBiasConfig, FileConfig, FileFrameConfig,
    FileLoggingConfig, FileResolutionConfig, FileScorerConfig,
};
pub use loader::{ConfigLoader, ConfigSource};
pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
