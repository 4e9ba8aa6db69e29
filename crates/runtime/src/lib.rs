//! Event-facing layer of the death message service.
//!
//! This crate wires the attribution tracker, the message catalog, and the
//! host's collaborators into one service. Hosts embed [`Obituary`], forward
//! damage, death, and disconnect notifications to it, and display whatever
//! [`DeathOutcome`] comes back.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the facade and builder
//! - [`api`] exposes the collaborator traits and error types
//! - [`hooks`] observe host events and write to the tracker
//! - [`handlers`] compose death messages from tracker and catalog
//! - [`events`] provides topic-based event bus for outcome routing
//! - [`catalog`] keeps the live catalog and swaps it atomically on reload
pub mod api;
pub mod catalog;
pub mod events;
pub mod handlers;
pub mod hooks;
pub mod runtime;

pub use api::{
    DeathError, EntityOracle, NoopPlaceholders, PlaceholderService, PlayerRoster, Result,
    RuntimeError,
};
pub use catalog::CatalogStore;
pub use events::{CatalogStats, EventBus, ObituaryEvent, Topic};
pub use handlers::{
    DeathMessage, DeathMessageEngine, DeathOutcome, DeferReason, EventContext, MessageTokens,
    render,
};
pub use hooks::{DamageObserver, DropReason, HookContext, Observation, PlayerLifecycleHook};
pub use runtime::{Obituary, ObituaryBuilder};
