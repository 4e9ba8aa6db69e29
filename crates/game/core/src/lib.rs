//! Indirect-kill attribution and death message selection.
//!
//! `obituary-core` holds the pure, synchronous half of the system: the damage
//! taxonomy, the classifier, the per-victim attribution tracker, and the
//! message catalog. It performs no I/O and never logs. The runtime crate
//! wires these to host events, logging, and reload.
//!
//! - [`combat`] names damage and deaths and classifies player hits
//! - [`attribution`] remembers recent player hits per victim
//! - [`message`] holds the per-cause message pools
//! - [`config`] is the immutable settings snapshot
pub mod attribution;
pub mod clock;
pub mod combat;
pub mod config;
pub mod entity;
pub mod message;

pub use attribution::{Attribution, AttributionTracker, DamageRecord};
pub use clock::{Clock, ManualClock, SystemClock};
pub use combat::{
    DamageCause, DamageClassifier, DamageEvent, DamageSource, DamageType, DeathEvent, KillKind,
    SourceKind,
};
pub use config::{ConfigError, ObituaryConfig};
pub use entity::{EntityId, Location};
pub use message::{MessageCatalog, MessageDefinition};
