//! Hooks that observe host events and write to the attribution tracker.
//!
//! # Architecture
//!
//! - [`DamageObserver`] runs on every damage notification, after the host has
//!   finalized the damage value, and records player-caused hits
//! - [`PlayerLifecycleHook`] runs on disconnect and releases the victim's slot
//!
//! Both are stateless; everything they need arrives in a [`HookContext`].

mod context;
mod damage;
mod lifecycle;

pub use context::HookContext;
pub use damage::{DamageObserver, DropReason, Observation};
pub use lifecycle::PlayerLifecycleHook;
