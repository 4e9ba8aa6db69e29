//! Settings loader.

use std::path::Path;

use obituary_core::ObituaryConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`ObituaryConfig`] from TOML files.
///
/// Missing keys take their defaults; values are validated before returning.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    pub fn load(path: &Path) -> LoadResult<ObituaryConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse config data from a TOML string.
    pub fn parse(content: &str) -> LoadResult<ObituaryConfig> {
        let config: ObituaryConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid config: {}", e))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = ConfigLoader::parse("").expect("defaults");
        assert_eq!(config, ObituaryConfig::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config = ConfigLoader::parse(
            r#"
            enabled = false
            minimum_damage = 1.5
            tracking_window_ms = 8000
            "#,
        )
        .expect("config");
        assert!(!config.enabled);
        assert_eq!(config.minimum_damage, 1.5);
        assert_eq!(config.tracking_window_ms, 8000);
        assert_eq!(config.performance_budget_ms, 100);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = ConfigLoader::parse("tracking_window_ms = 0").unwrap_err();
        assert!(err.to_string().contains("tracking_window_ms"));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("obituary.toml");
        std::fs::write(&path, "debug = true\n").expect("write");

        let config = ConfigLoader::load(&path).expect("config");
        assert!(config.debug);

        assert!(ConfigLoader::load(&dir.path().join("missing.toml")).is_err());
    }
}
