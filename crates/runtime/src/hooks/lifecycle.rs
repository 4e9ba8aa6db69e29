//! Hook that releases tracker memory when a player leaves.

use obituary_core::EntityId;
use tracing::debug;

use super::HookContext;

/// Clears a departing player's damage history.
///
/// Records where the departing player is the *aggressor* are left alone and
/// age out with the tracking window.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerLifecycleHook;

impl PlayerLifecycleHook {
    pub fn name(&self) -> &'static str {
        "player_lifecycle"
    }

    /// Returns whether the player had any history.
    pub fn on_disconnect(&self, ctx: &HookContext<'_>, entity: EntityId) -> bool {
        let released = ctx.tracker.clear_player(entity);
        if released && ctx.config.debug {
            debug!(
                target: "obituary::observer",
                entity = %entity,
                "Released damage history on disconnect"
            );
        }
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PlayerRoster;
    use obituary_core::{AttributionTracker, DamageType, ObituaryConfig};
    use std::time::Duration;

    #[test]
    fn disconnect_clears_victim_history_only() {
        let config = ObituaryConfig::default();
        let tracker = AttributionTracker::with_window(Duration::from_secs(5));
        let roster = PlayerRoster::new();
        let ctx = HookContext::new(&config, &tracker, &roster);

        let (victim, aggressor) = (EntityId(1), EntityId(2));
        tracker.record(victim, aggressor, "Alice", DamageType::Melee);
        tracker.record(aggressor, victim, "Bob", DamageType::Melee);

        assert!(PlayerLifecycleHook.on_disconnect(&ctx, victim));
        assert!(tracker.find_attributed_killer(victim).is_none());
        assert!(tracker.find_attributed_killer(aggressor).is_some());

        assert!(!PlayerLifecycleHook.on_disconnect(&ctx, EntityId(99)));
    }
}
