//! Public runtime API surface.
//!
//! This module gathers the types exposed to hosts embedding the runtime:
//! the error type and the collaborator traits the host implements.

pub mod errors;
pub mod providers;

pub use errors::{DeathError, Result, RuntimeError};
pub use providers::{EntityOracle, NoopPlaceholders, PlaceholderService, PlayerRoster};
