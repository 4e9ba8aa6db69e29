use obituary_core::EntityId;

use crate::handlers::{DeathMessage, DeferReason};

/// Aggregate numbers for a loaded catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CatalogStats {
    /// Message definitions across all causes.
    pub variants: usize,
    /// Causes with at least one definition.
    pub causes: usize,
    /// Entries skipped while loading.
    pub skipped: usize,
}

/// Runtime outcomes published on the [`EventBus`](super::EventBus).
#[derive(Clone, Debug, PartialEq)]
pub enum ObituaryEvent {
    /// A custom death message was produced.
    DeathAnnounced(DeathMessage),
    /// The host should show its own default message.
    DeathDeferred { victim: EntityId, reason: DeferReason },
    /// A new catalog is live.
    CatalogReloaded(CatalogStats),
    /// A reload was attempted and rejected; the previous catalog is still live.
    CatalogReloadFailed { error: String },
}
