//! Damage events as reported by the host.

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::entity::EntityId;

// ============================================================================
// Damage Type
// ============================================================================

/// How a player-caused hit is remembered for attribution.
///
/// This is a tag, not a severity ranking: classification is a priority
/// cascade (see [`DamageClassifier`](super::DamageClassifier)).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum DamageType {
    Melee,
    Projectile,
    Explosion,
    Knockback,
    Unknown,
}

// ============================================================================
// Damage Cause
// ============================================================================

/// Cause tag attached to damage and death notifications.
///
/// The same tag keys the message catalog: a death's cause is the cause of the
/// last damage the victim took.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum DamageCause {
    EntityAttack,
    EntitySweepAttack,
    Projectile,
    EntityExplosion,
    BlockExplosion,
    Fall,
    Fire,
    FireTick,
    Lava,
    HotFloor,
    Drowning,
    Suffocation,
    Void,
    Starvation,
    Poison,
    Magic,
    Wither,
    Lightning,
    Contact,
    Cramming,
    FlyIntoWall,
    Freeze,
    Thorns,
    SonicBoom,
    FallingBlock,
    DragonBreath,
    Suicide,
    Custom,
}

impl DamageCause {
    /// Explosion tags (entity-caused and block-caused).
    pub const fn is_explosion(self) -> bool {
        matches!(self, Self::EntityExplosion | Self::BlockExplosion)
    }

    /// Melee tags (direct swing and sweep).
    pub const fn is_melee(self) -> bool {
        matches!(self, Self::EntityAttack | Self::EntitySweepAttack)
    }
}

// ============================================================================
// Damage Source
// ============================================================================

/// Immediate source of a damage event.
///
/// Carries only the identifiers needed to find the real aggressor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageSource {
    /// An entity hit the victim itself.
    DirectEntity(EntityId),
    /// A projectile hit the victim; the shooter may be unknown.
    Projectile { shooter: Option<EntityId> },
    /// An explosive (primed TNT, crystal, ...) went off; the placer may be unknown.
    Explosive { placer: Option<EntityId> },
    /// Block, environment, or anything without an entity behind it.
    Other,
}

impl DamageSource {
    /// The entity ultimately responsible, if the source names one.
    pub fn responsible_entity(&self) -> Option<EntityId> {
        match *self {
            Self::DirectEntity(id) => Some(id),
            Self::Projectile { shooter } => shooter,
            Self::Explosive { placer } => placer,
            Self::Other => None,
        }
    }
}

/// Final damage dealt to a victim, after every modifier has run.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageEvent {
    pub victim: EntityId,
    /// Raw damage points (two points per heart).
    pub final_damage: f64,
    pub cause: DamageCause,
    pub source: DamageSource,
}

impl DamageEvent {
    pub fn new(victim: EntityId, final_damage: f64, cause: DamageCause, source: DamageSource) -> Self {
        Self {
            victim,
            final_damage,
            cause,
            source,
        }
    }

    /// Damage in hearts, the unit configuration thresholds use.
    pub fn hearts(&self) -> f64 {
        self.final_damage / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cause_tags_parse_case_insensitively() {
        assert_eq!("FALL".parse::<DamageCause>().ok(), Some(DamageCause::Fall));
        assert_eq!(
            "entity_sweep_attack".parse::<DamageCause>().ok(),
            Some(DamageCause::EntitySweepAttack)
        );
        assert!("NOT_A_CAUSE".parse::<DamageCause>().is_err());
        assert_eq!(DamageCause::FlyIntoWall.to_string(), "FLY_INTO_WALL");
    }

    #[test]
    fn responsible_entity_follows_indirection() {
        let shooter = EntityId(7);
        assert_eq!(
            DamageSource::Projectile {
                shooter: Some(shooter)
            }
            .responsible_entity(),
            Some(shooter)
        );
        assert_eq!(DamageSource::Explosive { placer: None }.responsible_entity(), None);
        assert_eq!(DamageSource::Other.responsible_entity(), None);
    }
}
