//! Damage taxonomy and classification.
//!
//! Everything here is pure: the host describes what happened, these types
//! name it, and [`DamageClassifier`] decides which [`DamageType`] a
//! player-caused hit counts as for attribution.
//!
//! # Core Items
//!
//! - [`DamageCause`]: host cause tag, also the key of message pools
//! - [`DamageSource`]: tagged variant over the immediate damage source
//! - [`DamageClassifier`]: priority cascade from source and cause to type
//! - [`DeathEvent`] / [`KillKind`]: what the death engine consumes and decides

pub mod classify;
pub mod damage;
pub mod death;

pub use classify::{DamageClassifier, SourceKind};
pub use damage::{DamageCause, DamageEvent, DamageSource, DamageType};
pub use death::{DeathEvent, KillKind};
