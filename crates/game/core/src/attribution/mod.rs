//! Per-victim damage history and kill attribution.
//!
//! The tracker is the only mutable shared state in the crate. Writers
//! (the damage observer) append records; the death engine reads the most
//! recent valid one; disconnects drop a victim's slot entirely.
//!
//! Records older than the tracking window are invalid. They are pruned
//! lazily on every read and write of the victim they belong to, and in bulk
//! by [`AttributionTracker::prune_expired`].

mod record;
mod tracker;

pub use record::{Attribution, DamageRecord};
pub use tracker::AttributionTracker;
