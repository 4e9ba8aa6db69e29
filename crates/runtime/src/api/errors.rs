//! Unified error types surfaced by the runtime API.
//!
//! Only reload and construction can fail from the host's point of view.
//! Damage, death, and disconnect handling never return errors.
use obituary_core::{ConfigError, EntityId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("runtime requires an entity oracle to be configured before building")]
    MissingOracle,

    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),

    #[error("failed to load configuration: {0:#}")]
    ConfigLoad(anyhow::Error),

    #[error("failed to load message catalog: {0:#}")]
    CatalogLoad(anyhow::Error),
}

/// Failures inside death message composition.
///
/// Never leaves the death engine: every variant ends as a deferral.
#[derive(Debug, Error)]
pub enum DeathError {
    #[error("victim {0} is unknown to the entity oracle")]
    UnknownVictim(EntityId),

    #[error("collaborator panicked: {0}")]
    CollaboratorPanic(String),
}
