//! Arena configuration loader.

use std::path::Path;

use arena_core::ArenaConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for arena rules from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load an [`ArenaConfig`] from a TOML file. Missing keys keep their
    /// defaults.
    pub fn load(path: &Path) -> LoadResult<ArenaConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ArenaConfig> {
        let config: ArenaConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse arena config TOML: {}", e))?;

        if config.engage_range <= config.retreat_range {
            anyhow::bail!(
                "engage_range ({}) must be greater than retreat_range ({})",
                config.engage_range,
                config.retreat_range
            );
        }
        if config.width <= 2.0 * config.wall_margin || config.height <= 2.0 * config.wall_margin {
            anyhow::bail!(
                "arena {}x{} leaves no room inside a wall margin of {}",
                config.width,
                config.height,
                config.wall_margin
            );
        }
        if config.knockback_divisor <= 0.0 {
            anyhow::bail!("knockback_divisor must be positive");
        }

        Ok(config)
    }
}
