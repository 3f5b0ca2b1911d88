//! Merge rules: built-in defaults that every later source overrides.

use crate::scope::LoaderSettings;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("agents.max_file_bytes", LoaderSettings::DEFAULT_MAX_FILE_BYTES)?
        .set_default("agents.follow_links", true)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")
}
