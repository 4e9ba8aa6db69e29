//! Damage classification for attribution.

use super::damage::{DamageCause, DamageType};

/// Kind of the immediate damage source, as far as classification cares.
///
/// The observer resolves entity ids against the host before building this,
/// so "direct player" already means the direct attacker is a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    DirectPlayer,
    Projectile,
    Explosive,
    Other,
}

/// Priority cascade from (source kind, cause tag, damage) to [`DamageType`].
///
/// # Precedence
///
/// ```text
/// projectile source                     → Projectile
/// explosion cause or explosive source   → Explosion
/// direct player + melee/sweep cause     → Melee
/// direct player + damage < threshold    → Knockback
/// direct player                         → Melee
/// anything else                         → Unknown
/// ```
///
/// Low-damage player hits are assumed to be knockback-oriented (a shove off
/// a ledge rather than an attempt to kill).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageClassifier {
    knockback_threshold: f64,
}

impl DamageClassifier {
    /// Two hearts.
    pub const DEFAULT_KNOCKBACK_THRESHOLD: f64 = 4.0;

    pub fn new(knockback_threshold: f64) -> Self {
        Self {
            knockback_threshold,
        }
    }

    pub fn knockback_threshold(&self) -> f64 {
        self.knockback_threshold
    }

    pub fn classify(&self, source: SourceKind, cause: DamageCause, damage: f64) -> DamageType {
        match source {
            SourceKind::Projectile => DamageType::Projectile,
            _ if cause.is_explosion() => DamageType::Explosion,
            SourceKind::Explosive => DamageType::Explosion,
            SourceKind::DirectPlayer if cause.is_melee() => DamageType::Melee,
            // NaN compares false and falls through to Melee.
            SourceKind::DirectPlayer if damage < self.knockback_threshold => DamageType::Knockback,
            SourceKind::DirectPlayer => DamageType::Melee,
            SourceKind::Other => DamageType::Unknown,
        }
    }
}

impl Default for DamageClassifier {
    fn default() -> Self {
        Self::new(Self::DEFAULT_KNOCKBACK_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(source: SourceKind, cause: DamageCause, damage: f64) -> DamageType {
        DamageClassifier::default().classify(source, cause, damage)
    }

    #[test]
    fn projectile_source_wins_over_explosion_cause() {
        assert_eq!(
            classify(SourceKind::Projectile, DamageCause::EntityExplosion, 20.0),
            DamageType::Projectile
        );
    }

    #[test]
    fn explosion_cause_or_explosive_source() {
        assert_eq!(
            classify(SourceKind::DirectPlayer, DamageCause::BlockExplosion, 1.0),
            DamageType::Explosion
        );
        assert_eq!(
            classify(SourceKind::Explosive, DamageCause::Custom, 1.0),
            DamageType::Explosion
        );
    }

    #[test]
    fn melee_cause_beats_knockback_heuristic() {
        assert_eq!(
            classify(SourceKind::DirectPlayer, DamageCause::EntityAttack, 1.0),
            DamageType::Melee
        );
        assert_eq!(
            classify(SourceKind::DirectPlayer, DamageCause::EntitySweepAttack, 1.0),
            DamageType::Melee
        );
    }

    #[test]
    fn low_damage_player_hit_is_knockback() {
        assert_eq!(
            classify(SourceKind::DirectPlayer, DamageCause::Thorns, 3.9),
            DamageType::Knockback
        );
        assert_eq!(
            classify(SourceKind::DirectPlayer, DamageCause::Thorns, 4.0),
            DamageType::Melee
        );
    }

    #[test]
    fn everything_else_is_unknown() {
        assert_eq!(
            classify(SourceKind::Other, DamageCause::Fall, 10.0),
            DamageType::Unknown
        );
        assert_eq!(
            classify(SourceKind::Other, DamageCause::EntityAttack, 10.0),
            DamageType::Unknown
        );
    }

    #[test]
    fn custom_threshold_is_respected() {
        let classifier = DamageClassifier::new(1.0);
        assert_eq!(
            classifier.classify(SourceKind::DirectPlayer, DamageCause::Magic, 2.0),
            DamageType::Melee
        );
    }
}
