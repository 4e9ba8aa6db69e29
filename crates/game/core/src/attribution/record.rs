use std::time::{Duration, Instant};

use crate::combat::DamageType;
use crate::entity::EntityId;

/// One player-caused hit on a victim. Immutable once created.
#[derive(Clone, Debug, PartialEq)]
pub struct DamageRecord {
    pub aggressor: EntityId,
    /// Name captured at hit time, in case the aggressor is gone by the
    /// time the victim dies.
    pub aggressor_name: String,
    pub damage_type: DamageType,
    pub recorded_at: Instant,
}

impl DamageRecord {
    /// Age relative to `now`. Records from the future have age zero.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.recorded_at)
    }

    pub fn is_valid(&self, now: Instant, window: Duration) -> bool {
        self.age(now) <= window
    }
}

/// Result of an attribution lookup.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribution {
    pub aggressor: EntityId,
    pub aggressor_name: String,
    pub damage_type: DamageType,
    pub recorded_at: Instant,
}

impl From<&DamageRecord> for Attribution {
    fn from(record: &DamageRecord) -> Self {
        Self {
            aggressor: record.aggressor,
            aggressor_name: record.aggressor_name.clone(),
            damage_type: record.damage_type,
            recorded_at: record.recorded_at,
        }
    }
}
