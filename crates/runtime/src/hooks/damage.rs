//! Hook that records player-caused damage for later attribution.

use obituary_core::{DamageEvent, DamageSource, DamageType, EntityId, SourceKind};
use tracing::debug;

use super::HookContext;

/// Why a damage event was not recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    Disabled,
    VictimNotPlayer,
    BelowMinimum,
    NoPlayerAggressor,
    SelfInflicted,
    /// The tracker declined the record (history full of newer hits).
    Rejected,
}

/// Result of observing one damage event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    Recorded {
        aggressor: EntityId,
        damage_type: DamageType,
    },
    Dropped(DropReason),
}

impl Observation {
    pub fn is_recorded(&self) -> bool {
        matches!(self, Self::Recorded { .. })
    }
}

/// Entry point for the write path.
///
/// Must see final damage: the host calls it after every other listener has
/// had the chance to reduce or cancel the hit, so recorded amounts are the
/// ones actually dealt.
///
/// # Filters (in order)
///
/// ```text
/// disabled                         → drop
/// victim is not a player           → drop
/// damage below minimum (hearts)    → drop
/// no player behind the source      → drop
/// aggressor is the victim          → drop
/// otherwise                        → classify and record
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DamageObserver;

impl DamageObserver {
    pub fn name(&self) -> &'static str {
        "damage_observer"
    }

    pub fn observe(&self, ctx: &HookContext<'_>, event: &DamageEvent) -> Observation {
        let config = ctx.config;

        if !config.enabled {
            return Observation::Dropped(DropReason::Disabled);
        }

        if !ctx.oracle.is_player(event.victim) {
            return Observation::Dropped(DropReason::VictimNotPlayer);
        }

        // Written as a negated comparison so NaN damage is dropped too.
        if !(event.hearts() >= config.minimum_damage) {
            if config.debug {
                debug!(
                    target: "obituary::observer",
                    victim = %event.victim,
                    hearts = event.hearts(),
                    minimum = config.minimum_damage,
                    "Damage below minimum, not tracked"
                );
            }
            return Observation::Dropped(DropReason::BelowMinimum);
        }

        let Some((aggressor, source_kind)) = player_aggressor(ctx, &event.source) else {
            if config.debug {
                debug!(
                    target: "obituary::observer",
                    victim = %event.victim,
                    cause = %event.cause,
                    source = ?event.source,
                    "No player aggressor behind damage source"
                );
            }
            return Observation::Dropped(DropReason::NoPlayerAggressor);
        };

        if aggressor == event.victim {
            return Observation::Dropped(DropReason::SelfInflicted);
        }

        let damage_type = config
            .classifier()
            .classify(source_kind, event.cause, event.final_damage);
        let aggressor_name = ctx
            .oracle
            .display_name(aggressor)
            .unwrap_or_else(|| aggressor.to_string());

        if !ctx
            .tracker
            .record(event.victim, aggressor, aggressor_name, damage_type)
        {
            return Observation::Dropped(DropReason::Rejected);
        }

        if config.debug {
            debug!(
                target: "obituary::observer",
                victim = %event.victim,
                aggressor = %aggressor,
                damage_type = %damage_type,
                damage = event.final_damage,
                "Recorded damage"
            );
        }

        Observation::Recorded {
            aggressor,
            damage_type,
        }
    }
}

/// Finds the player behind a damage source: the attacker itself, the shooter
/// of a projectile, or the placer of an explosive.
fn player_aggressor(ctx: &HookContext<'_>, source: &DamageSource) -> Option<(EntityId, SourceKind)> {
    let kind = match source {
        DamageSource::DirectEntity(_) => SourceKind::DirectPlayer,
        DamageSource::Projectile { .. } => SourceKind::Projectile,
        DamageSource::Explosive { .. } => SourceKind::Explosive,
        DamageSource::Other => return None,
    };

    source
        .responsible_entity()
        .filter(|id| ctx.oracle.is_player(*id))
        .map(|id| (id, kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PlayerRoster;
    use obituary_core::{AttributionTracker, DamageCause, ObituaryConfig};
    use std::time::Duration;

    const VICTIM: EntityId = EntityId(1);
    const ALICE: EntityId = EntityId(2);
    const ZOMBIE: EntityId = EntityId(50);

    struct Fixture {
        config: ObituaryConfig,
        tracker: AttributionTracker,
        roster: PlayerRoster,
    }

    impl Fixture {
        fn new() -> Self {
            let roster = PlayerRoster::new();
            roster.join(VICTIM, "Victim");
            roster.join(ALICE, "Alice");
            Self {
                config: ObituaryConfig::default(),
                tracker: AttributionTracker::with_window(Duration::from_secs(5)),
                roster,
            }
        }

        fn observe(&self, event: DamageEvent) -> Observation {
            let ctx = HookContext::new(&self.config, &self.tracker, &self.roster);
            DamageObserver.observe(&ctx, &event)
        }
    }

    #[test]
    fn records_direct_melee_hit() {
        let fx = Fixture::new();
        let outcome = fx.observe(DamageEvent::new(
            VICTIM,
            6.0,
            DamageCause::EntityAttack,
            DamageSource::DirectEntity(ALICE),
        ));
        assert_eq!(
            outcome,
            Observation::Recorded {
                aggressor: ALICE,
                damage_type: DamageType::Melee
            }
        );
        let found = fx.tracker.find_attributed_killer(VICTIM).expect("record");
        assert_eq!(found.aggressor_name, "Alice");
    }

    #[test]
    fn extracts_shooter_and_placer() {
        let fx = Fixture::new();
        let arrow = fx.observe(DamageEvent::new(
            VICTIM,
            5.0,
            DamageCause::Projectile,
            DamageSource::Projectile {
                shooter: Some(ALICE),
            },
        ));
        assert!(matches!(
            arrow,
            Observation::Recorded {
                damage_type: DamageType::Projectile,
                ..
            }
        ));

        let tnt = fx.observe(DamageEvent::new(
            VICTIM,
            12.0,
            DamageCause::BlockExplosion,
            DamageSource::Explosive {
                placer: Some(ALICE),
            },
        ));
        assert!(matches!(
            tnt,
            Observation::Recorded {
                damage_type: DamageType::Explosion,
                ..
            }
        ));
    }

    #[test]
    fn drops_in_filter_order() {
        let mut fx = Fixture::new();

        let hit = DamageEvent::new(
            VICTIM,
            6.0,
            DamageCause::EntityAttack,
            DamageSource::DirectEntity(ALICE),
        );

        let on_mob = DamageEvent { victim: ZOMBIE, ..hit };
        assert_eq!(fx.observe(on_mob), Observation::Dropped(DropReason::VictimNotPlayer));

        let weak = DamageEvent { final_damage: 0.5, ..hit };
        assert_eq!(fx.observe(weak), Observation::Dropped(DropReason::BelowMinimum));

        let nan = DamageEvent { final_damage: f64::NAN, ..hit };
        assert_eq!(fx.observe(nan), Observation::Dropped(DropReason::BelowMinimum));

        let by_mob = DamageEvent {
            source: DamageSource::DirectEntity(ZOMBIE),
            ..hit
        };
        assert_eq!(fx.observe(by_mob), Observation::Dropped(DropReason::NoPlayerAggressor));

        let stray = DamageEvent {
            source: DamageSource::Projectile { shooter: None },
            ..hit
        };
        assert_eq!(fx.observe(stray), Observation::Dropped(DropReason::NoPlayerAggressor));

        let own_arrow = DamageEvent {
            source: DamageSource::Projectile {
                shooter: Some(VICTIM),
            },
            ..hit
        };
        assert_eq!(fx.observe(own_arrow), Observation::Dropped(DropReason::SelfInflicted));

        assert_eq!(fx.tracker.tracked_victims(), 0);

        fx.config.enabled = false;
        assert_eq!(fx.observe(hit), Observation::Dropped(DropReason::Disabled));
        assert_eq!(fx.tracker.tracked_victims(), 0);
    }

    #[test]
    fn minimum_is_measured_in_hearts() {
        let mut fx = Fixture::new();
        fx.config.minimum_damage = 2.0;

        let hit = DamageEvent::new(
            VICTIM,
            3.9,
            DamageCause::EntityAttack,
            DamageSource::DirectEntity(ALICE),
        );
        assert_eq!(fx.observe(hit), Observation::Dropped(DropReason::BelowMinimum));

        let hit = DamageEvent { final_damage: 4.0, ..hit };
        assert!(fx.observe(hit).is_recorded());
    }
}
