//! Live message catalog with atomic replacement.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use obituary_content::{CatalogLoader, LoadedCatalog};
use obituary_core::MessageCatalog;
use tracing::info;

use crate::api::{Result, RuntimeError};
use crate::events::CatalogStats;

/// Holds the catalog deaths are composed against.
///
/// Readers take an [`Arc`] snapshot, so a reload never changes the catalog
/// seen by a death already in progress.
#[derive(Debug, Default)]
pub struct CatalogStore {
    current: RwLock<Arc<MessageCatalog>>,
}

impl CatalogStore {
    pub fn new(catalog: MessageCatalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    pub fn snapshot(&self) -> Arc<MessageCatalog> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Installs `catalog` and returns its counts.
    pub fn replace(&self, catalog: MessageCatalog) -> CatalogStats {
        let stats = CatalogStats {
            variants: catalog.variant_count(),
            causes: catalog.cause_count(),
            skipped: 0,
        };
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(catalog);
        stats
    }

    /// Installs a freshly loaded catalog, counting what the loader skipped.
    pub fn install(&self, loaded: LoadedCatalog) -> CatalogStats {
        let skipped = loaded.report.skipped.len();
        CatalogStats {
            skipped,
            ..self.replace(loaded.catalog)
        }
    }

    /// Loads `path` and swaps it in.
    ///
    /// On failure the current catalog stays live.
    pub fn reload_from(&self, path: &Path) -> Result<CatalogStats> {
        let loaded = CatalogLoader::load(path).map_err(RuntimeError::CatalogLoad)?;
        let stats = self.install(loaded);
        info!(
            target: "obituary::catalog",
            path = %path.display(),
            variants = stats.variants,
            causes = stats.causes,
            skipped = stats.skipped,
            "Loaded message catalog"
        );
        Ok(stats)
    }
}
