//! Death notifications and the kill classification derived from them.

use super::damage::{DamageCause, DamageType};
use crate::entity::EntityId;

/// Death as reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeathEvent {
    pub victim: EntityId,
    /// Cause of the last damage taken, when the host knows it.
    pub cause: Option<DamageCause>,
    /// Entity the host credits with the kill, player or not.
    pub direct_killer: Option<EntityId>,
}

impl DeathEvent {
    pub fn new(victim: EntityId, cause: Option<DamageCause>, direct_killer: Option<EntityId>) -> Self {
        Self {
            victim,
            cause,
            direct_killer,
        }
    }
}

/// How a death relates to player action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KillKind {
    /// The proximate cause was a player.
    Direct,
    /// The proximate cause was the environment, preceded by a player hit
    /// of the given type inside the tracking window.
    Indirect(DamageType),
    /// No player involved.
    Environmental,
}

impl KillKind {
    pub const fn has_killer(&self) -> bool {
        !matches!(self, Self::Environmental)
    }

    pub const fn damage_type(&self) -> Option<DamageType> {
        match self {
            Self::Indirect(kind) => Some(*kind),
            _ => None,
        }
    }
}
