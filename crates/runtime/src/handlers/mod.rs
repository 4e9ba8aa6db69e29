//! Handlers that react to deaths and produce the message shown to players.
//!
//! The death engine is the read path: it consults the attribution tracker
//! and the message catalog, never writes to either, and never fails. Every
//! problem ends as a [`DeferReason`] so the host can fall back to its own
//! message.

mod death;
mod format;

pub use death::{DeathMessage, DeathMessageEngine, DeathOutcome, DeferReason};
pub use format::{MessageTokens, render};

use obituary_core::{AttributionTracker, MessageCatalog, ObituaryConfig};

use crate::api::{EntityOracle, PlaceholderService};

/// Context provided to handlers for death message composition.
pub struct EventContext<'a> {
    /// Settings snapshot in effect for this death
    pub config: &'a ObituaryConfig,
    /// Shared attribution store, read only here
    pub tracker: &'a AttributionTracker,
    /// Catalog snapshot in effect for this death
    pub catalog: &'a MessageCatalog,
    /// Host view of live entities
    pub oracle: &'a dyn EntityOracle,
    /// Host-provided token substitution
    pub placeholders: &'a dyn PlaceholderService,
}
