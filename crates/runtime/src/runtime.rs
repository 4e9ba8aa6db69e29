//! High-level facade the host talks to.
//!
//! [`Obituary`] owns the shared state (configuration snapshot, attribution
//! tracker, live catalog, outcome bus) and routes each host notification to
//! the matching hook or handler.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use obituary_content::{ConfigLoader, ContentFactory};
use obituary_core::{
    AttributionTracker, Clock, DamageEvent, DeathEvent, EntityId, MessageCatalog, ObituaryConfig,
    SystemClock,
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::api::{EntityOracle, NoopPlaceholders, PlaceholderService, Result, RuntimeError};
use crate::catalog::CatalogStore;
use crate::events::{CatalogStats, EventBus, ObituaryEvent, Topic};
use crate::handlers::{DeathMessageEngine, DeathOutcome, EventContext};
use crate::hooks::{DamageObserver, HookContext, Observation, PlayerLifecycleHook};

/// Death message service.
///
/// Every entry point is synchronous and infallible except reloads, which
/// report failure and leave the previous state live.
pub struct Obituary {
    config: RwLock<Arc<ObituaryConfig>>,
    tracker: Arc<AttributionTracker>,
    catalog: CatalogStore,
    oracle: Arc<dyn EntityOracle>,
    placeholders: Arc<dyn PlaceholderService>,
    bus: EventBus,

    observer: DamageObserver,
    lifecycle: PlayerLifecycleHook,
    engine: DeathMessageEngine,
}

impl Obituary {
    /// Create a new builder
    pub fn builder() -> ObituaryBuilder {
        ObituaryBuilder::new()
    }

    /// Damage notification, after the host has finalized the damage value.
    pub fn on_damage(&self, event: &DamageEvent) -> Observation {
        let config = self.config();
        let ctx = HookContext::new(&config, &self.tracker, self.oracle.as_ref());
        self.observer.observe(&ctx, event)
    }

    /// Death notification. The outcome is also published on [`Topic::Death`].
    pub fn on_death(&self, event: &DeathEvent) -> DeathOutcome {
        let config = self.config();
        let catalog = self.catalog.snapshot();
        let ctx = EventContext {
            config: &config,
            tracker: &self.tracker,
            catalog: &catalog,
            oracle: self.oracle.as_ref(),
            placeholders: self.placeholders.as_ref(),
        };

        let outcome = self.engine.handle_death(&ctx, event);
        let published = match &outcome {
            DeathOutcome::Message(message) => ObituaryEvent::DeathAnnounced(message.clone()),
            DeathOutcome::Defer(reason) => ObituaryEvent::DeathDeferred {
                victim: event.victim,
                reason: *reason,
            },
        };
        self.bus.publish(published);
        outcome
    }

    /// Disconnect notification. Returns whether any history was released.
    pub fn on_disconnect(&self, entity: EntityId) -> bool {
        let config = self.config();
        let ctx = HookContext::new(&config, &self.tracker, self.oracle.as_ref());
        self.lifecycle.on_disconnect(&ctx, entity)
    }

    /// Sweeps expired records from every victim. Meant for a periodic task.
    pub fn prune(&self) -> usize {
        let released = self.tracker.prune_expired();
        if released > 0 {
            debug!(
                target: "obituary::tracker",
                released,
                remaining = self.tracker.tracked_victims(),
                "Pruned expired damage history"
            );
        }
        released
    }

    /// Swaps in an already-built catalog.
    pub fn reload_catalog(&self, catalog: MessageCatalog) -> CatalogStats {
        let stats = self.catalog.replace(catalog);
        self.bus.publish(ObituaryEvent::CatalogReloaded(stats));
        stats
    }

    /// Loads a catalog file and swaps it in.
    ///
    /// On failure the previous catalog stays live and the error is both
    /// returned and published on [`Topic::Catalog`].
    pub fn reload_catalog_from(&self, path: impl AsRef<Path>) -> Result<CatalogStats> {
        let path = path.as_ref();
        match self.catalog.reload_from(path) {
            Ok(stats) => {
                self.bus.publish(ObituaryEvent::CatalogReloaded(stats));
                Ok(stats)
            }
            Err(e) => {
                warn!(
                    target: "obituary::catalog",
                    path = %path.display(),
                    error = %e,
                    "Catalog reload failed, keeping previous catalog"
                );
                self.bus.publish(ObituaryEvent::CatalogReloadFailed {
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Replaces the configuration snapshot and applies the new tracking
    /// window to the tracker.
    pub fn reload_config(&self, config: ObituaryConfig) -> Result<()> {
        config.validate()?;
        self.tracker.set_tracking_window(config.tracking_window());
        info!(
            target: "obituary::tracker",
            enabled = config.enabled,
            tracking_window_ms = config.tracking_window_ms,
            minimum_damage = config.minimum_damage,
            "Applied configuration"
        );
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(config);
        Ok(())
    }

    /// Loads a configuration file and applies it.
    pub fn reload_config_from(&self, path: impl AsRef<Path>) -> Result<()> {
        let config = ConfigLoader::load(path.as_ref()).map_err(RuntimeError::ConfigLoad)?;
        self.reload_config(config)
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<ObituaryEvent> {
        self.bus.subscribe(topic)
    }

    /// Current configuration snapshot.
    pub fn config(&self) -> Arc<ObituaryConfig> {
        Arc::clone(&self.config.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Current catalog snapshot.
    pub fn catalog(&self) -> Arc<MessageCatalog> {
        self.catalog.snapshot()
    }

    pub fn tracker(&self) -> &AttributionTracker {
        &self.tracker
    }
}

/// Builder for [`Obituary`].
pub struct ObituaryBuilder {
    config: Option<ObituaryConfig>,
    catalog: Option<MessageCatalog>,
    data_dir: Option<PathBuf>,
    oracle: Option<Arc<dyn EntityOracle>>,
    placeholders: Option<Arc<dyn PlaceholderService>>,
    clock: Option<Arc<dyn Clock>>,
    event_buffer_size: usize,
}

impl ObituaryBuilder {
    fn new() -> Self {
        Self {
            config: None,
            catalog: None,
            data_dir: None,
            oracle: None,
            placeholders: None,
            clock: None,
            event_buffer_size: 100,
        }
    }

    /// Override configuration. Takes precedence over a data directory's
    /// `obituary.toml`.
    pub fn config(mut self, config: ObituaryConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Provide the initial catalog. Takes precedence over a data
    /// directory's `messages.toml`.
    pub fn catalog(mut self, catalog: MessageCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Load whatever was not given explicitly from a data directory.
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Set required entity oracle
    pub fn oracle(mut self, oracle: Arc<dyn EntityOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Set placeholder service (optional, defaults to no-op)
    pub fn placeholders(mut self, placeholders: Arc<dyn PlaceholderService>) -> Self {
        self.placeholders = Some(placeholders);
        self
    }

    /// Set tracker clock (optional, defaults to system time)
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = size;
        self
    }

    /// Build the service
    pub fn build(self) -> Result<Obituary> {
        let oracle = self.oracle.ok_or(RuntimeError::MissingOracle)?;
        let factory = self.data_dir.map(ContentFactory::new);

        let config = match (self.config, &factory) {
            (Some(config), _) => config,
            (None, Some(factory)) => factory.load_config().map_err(RuntimeError::ConfigLoad)?,
            (None, None) => ObituaryConfig::default(),
        };
        config.validate()?;

        let catalog = CatalogStore::default();
        match (self.catalog, &factory) {
            (Some(initial), _) => {
                catalog.replace(initial);
            }
            (None, Some(factory)) => {
                catalog.reload_from(&factory.messages_path())?;
            }
            (None, None) => {
                warn!(
                    target: "obituary::catalog",
                    "No message catalog provided, every death defers to the host"
                );
            }
        }

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let tracker = Arc::new(AttributionTracker::new(config.tracking_window(), clock));

        Ok(Obituary {
            config: RwLock::new(Arc::new(config)),
            tracker,
            catalog,
            oracle,
            placeholders: self
                .placeholders
                .unwrap_or_else(|| Arc::new(NoopPlaceholders)),
            bus: EventBus::with_capacity(self.event_buffer_size.max(1)),
            observer: DamageObserver,
            lifecycle: PlayerLifecycleHook,
            engine: DeathMessageEngine,
        })
    }
}
