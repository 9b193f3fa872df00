//! Configuration file loader for the `.miru/` directory.
//!
//! Only `.miru/config.toml` is read. Every setting has a default, so a
//! missing directory, a missing file or an empty file are all valid.

use crate::config::error::ConfigError;
use crate::config::error::ConfigResult;
use miru_protocol::config_models::GlobalConfig;
use std::path::Path;

/// Name of the configuration directory under the project root.
pub const CONFIG_DIR: &str = ".miru";

/// Loads store and bus settings from `<root>/.miru/config.toml`.
///
/// # Arguments
///
/// * `root` - Directory containing the `.miru/` folder
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - The file exists but cannot be read
/// - The file is not valid TOML or has fields of the wrong type
/// - `bus.channel_capacity` is zero
///
/// # Example
///
/// ```rust,no_run
/// use miru_core::config::loader::load_config;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("."))?;
/// println!("Bus channel capacity: {}", config.bus.channel_capacity);
/// # Ok(())
/// # }
/// ```
pub fn load_config(root: &Path) -> ConfigResult<GlobalConfig> {
    let config_path = root.join(CONFIG_DIR).join("config.toml");

    // No config file means defaults
    if !config_path.exists() {
        return Ok(GlobalConfig::default());
    }

    let content =
        std::fs::read_to_string(&config_path).map_err(|source| ConfigError::FileRead {
            path: config_path.clone(),
            source,
        })?;

    let config: GlobalConfig =
        toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
            path: config_path.clone(),
            source,
        })?;

    if config.bus.channel_capacity == 0 {
        return Err(ConfigError::InvalidConfig {
            path: config_path,
            reason: "bus.channel_capacity must be greater than zero".to_string(),
        });
    }

    Ok(config)
}
