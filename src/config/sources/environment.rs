//! Environment variable source: `AGENTSCOPE__SECTION__KEY`

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

pub const ENV_PREFIX: &str = "AGENTSCOPE";

/// Add environment variable overlay to builder.
///
/// `__` separates the prefix and nested keys, so
/// `AGENTSCOPE__AGENTS__MAX_FILE_BYTES` sets `agents.max_file_bytes`.
/// The single-underscore `AGENTSCOPE_LOG*` variables belong to logging and
/// are not picked up here.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    ))
}
