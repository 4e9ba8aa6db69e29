//! Content factory for loading everything from one data directory.

use std::path::{Path, PathBuf};

use obituary_core::ObituaryConfig;

use crate::loaders::{CatalogLoader, ConfigLoader, LoadResult, LoadedCatalog};

/// Content factory that loads all content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── obituary.toml
/// └── messages.toml
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const CONFIG_FILE: &'static str = "obituary.toml";
    pub const MESSAGES_FILE: &'static str = "messages.toml";

    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load settings from `obituary.toml`, or defaults if the file is absent.
    pub fn load_config(&self) -> LoadResult<ObituaryConfig> {
        let path = self.config_path();
        if !path.exists() {
            return Ok(ObituaryConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the message catalog from `messages.toml`.
    pub fn load_catalog(&self) -> LoadResult<LoadedCatalog> {
        CatalogLoader::load(&self.messages_path())
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(Self::CONFIG_FILE)
    }

    pub fn messages_path(&self) -> PathBuf {
        self.data_dir.join(Self::MESSAGES_FILE)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
        assert_eq!(factory.messages_path(), Path::new("/tmp/data/messages.toml"));
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let factory = ContentFactory::new(dir.path());

        assert_eq!(factory.load_config().expect("defaults"), ObituaryConfig::default());
        assert!(factory.load_catalog().is_err());

        std::fs::write(factory.messages_path(), "VOID = [\"{player} fell out of the world\"]")
            .expect("write");
        let loaded = factory.load_catalog().expect("catalog");
        assert_eq!(loaded.catalog.variant_count(), 1);
    }
}
