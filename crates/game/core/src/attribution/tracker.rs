use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use arrayvec::ArrayVec;

use super::record::{Attribution, DamageRecord};
use crate::clock::{Clock, SystemClock};
use crate::combat::DamageType;
use crate::config::ObituaryConfig;
use crate::entity::EntityId;

const SHARD_COUNT: usize = 16;

type Shard = HashMap<EntityId, DamageHistory>;

/// Fixed-capacity history for one victim.
///
/// Insertion order is not trusted; every query goes by `recorded_at`.
#[derive(Debug, Default)]
struct DamageHistory {
    records: ArrayVec<DamageRecord, { ObituaryConfig::HISTORY_CAPACITY }>,
}

impl DamageHistory {
    fn prune(&mut self, now: Instant, window: Duration) {
        self.records.retain(|record| record.is_valid(now, window));
    }

    /// Appends `record`, evicting the oldest entry when full.
    ///
    /// Returns false when the history is full and `record` is older than
    /// everything already kept.
    fn push(&mut self, record: DamageRecord) -> bool {
        if self.records.is_full() {
            let Some((oldest, oldest_at)) = self
                .records
                .iter()
                .enumerate()
                .min_by_key(|(_, r)| r.recorded_at)
                .map(|(idx, r)| (idx, r.recorded_at))
            else {
                return false;
            };
            if record.recorded_at < oldest_at {
                return false;
            }
            self.records.remove(oldest);
        }
        self.records.push(record);
        true
    }

    /// Latest record; on equal timestamps the one inserted last.
    fn latest(&self) -> Option<&DamageRecord> {
        self.records.iter().max_by_key(|r| r.recorded_at)
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Concurrent store of recent player-caused damage, keyed by victim.
///
/// The map is split into mutex-guarded shards so that unrelated victims do
/// not contend. Each victim holds at most
/// [`ObituaryConfig::HISTORY_CAPACITY`] records regardless of how far
/// pruning lags.
pub struct AttributionTracker {
    shards: Box<[Mutex<Shard>]>,
    window_ms: AtomicU64,
    clock: Arc<dyn Clock>,
}

impl AttributionTracker {
    pub fn new(window: Duration, clock: Arc<dyn Clock>) -> Self {
        let shards = (0..SHARD_COUNT)
            .map(|_| Mutex::new(HashMap::new()))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self {
            shards,
            window_ms: AtomicU64::new(duration_to_ms(window)),
            clock,
        }
    }

    /// Tracker driven by [`SystemClock`].
    pub fn with_window(window: Duration) -> Self {
        Self::new(window, Arc::new(SystemClock))
    }

    pub fn tracking_window(&self) -> Duration {
        Duration::from_millis(self.window_ms.load(Ordering::Relaxed))
    }

    /// Applies a new window to all future reads and writes.
    pub fn set_tracking_window(&self, window: Duration) {
        self.window_ms
            .store(duration_to_ms(window), Ordering::Relaxed);
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Records a hit on `victim` timestamped now.
    ///
    /// Self-damage is rejected. Returns whether a record was stored.
    pub fn record(
        &self,
        victim: EntityId,
        aggressor: EntityId,
        aggressor_name: impl Into<String>,
        damage_type: DamageType,
    ) -> bool {
        let now = self.clock.now();
        self.record_at(victim, aggressor, aggressor_name, damage_type, now)
    }

    /// Records a hit with an explicit timestamp, for replayed or
    /// late-delivered events.
    pub fn record_at(
        &self,
        victim: EntityId,
        aggressor: EntityId,
        aggressor_name: impl Into<String>,
        damage_type: DamageType,
        recorded_at: Instant,
    ) -> bool {
        if victim == aggressor {
            return false;
        }

        let now = self.clock.now();
        let window = self.tracking_window();
        let record = DamageRecord {
            aggressor,
            aggressor_name: aggressor_name.into(),
            damage_type,
            recorded_at,
        };
        if !record.is_valid(now, window) {
            return false;
        }

        let mut shard = self.shard(victim);
        let history = shard.entry(victim).or_default();
        history.prune(now, window);
        history.push(record)
    }

    /// Most recent valid hit on `victim`, if any.
    ///
    /// Ties on `recorded_at` go to the record inserted last. Damage type
    /// plays no part in the choice.
    pub fn find_attributed_killer(&self, victim: EntityId) -> Option<Attribution> {
        let now = self.clock.now();
        let window = self.tracking_window();

        let mut shard = self.shard(victim);
        let history = shard.get_mut(&victim)?;
        history.prune(now, window);

        let latest = history.latest().map(Attribution::from);
        if latest.is_none() {
            shard.remove(&victim);
        }
        latest
    }

    /// Drops every record for `victim`. Returns whether anything was held.
    pub fn clear_player(&self, victim: EntityId) -> bool {
        self.shard(victim).remove(&victim).is_some()
    }

    /// Sweeps all shards, dropping stale records and releasing victims left
    /// empty. Returns the number of victims released.
    pub fn prune_expired(&self) -> usize {
        let now = self.clock.now();
        let window = self.tracking_window();

        self.shards
            .iter()
            .map(|shard| {
                let mut shard = lock(shard);
                let before = shard.len();
                shard.retain(|_, history| {
                    history.prune(now, window);
                    !history.is_empty()
                });
                before - shard.len()
            })
            .sum()
    }

    /// Number of victims currently holding a slot.
    pub fn tracked_victims(&self) -> usize {
        self.shards.iter().map(|shard| lock(shard).len()).sum()
    }

    /// Number of records held for `victim`, stale ones included.
    pub fn history_len(&self, victim: EntityId) -> usize {
        self.shard(victim)
            .get(&victim)
            .map_or(0, DamageHistory::len)
    }

    fn shard(&self, victim: EntityId) -> MutexGuard<'_, Shard> {
        let mut hasher = DefaultHasher::new();
        victim.hash(&mut hasher);
        let idx = (hasher.finish() as usize) % self.shards.len();
        lock(&self.shards[idx])
    }
}

impl std::fmt::Debug for AttributionTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributionTracker")
            .field("tracking_window", &self.tracking_window())
            .field("tracked_victims", &self.tracked_victims())
            .finish()
    }
}

// A panic while holding a shard cannot leave a history half-written
// (every mutation is a single ArrayVec call), so poisoned data is usable.
fn lock(shard: &Mutex<Shard>) -> MutexGuard<'_, Shard> {
    shard.lock().unwrap_or_else(PoisonError::into_inner)
}

fn duration_to_ms(window: Duration) -> u64 {
    window.as_millis().min(u64::MAX as u128) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const VICTIM: EntityId = EntityId(1);
    const ALICE: EntityId = EntityId(2);
    const BOB: EntityId = EntityId(3);

    fn tracker(window_secs: u64) -> (AttributionTracker, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let tracker = AttributionTracker::new(Duration::from_secs(window_secs), clock.clone());
        (tracker, clock)
    }

    #[test]
    fn self_damage_is_never_stored() {
        let (tracker, _) = tracker(5);
        assert!(!tracker.record(VICTIM, VICTIM, "self", DamageType::Melee));
        assert_eq!(tracker.history_len(VICTIM), 0);
        assert_eq!(tracker.tracked_victims(), 0);
    }

    #[test]
    fn latest_valid_record_wins() {
        let (tracker, clock) = tracker(5);
        tracker.record(VICTIM, ALICE, "Alice", DamageType::Melee);
        clock.advance(Duration::from_millis(500));
        tracker.record(VICTIM, BOB, "Bob", DamageType::Explosion);

        let found = tracker.find_attributed_killer(VICTIM).expect("attribution");
        assert_eq!(found.aggressor, BOB);
        assert_eq!(found.aggressor_name, "Bob");
        assert_eq!(found.damage_type, DamageType::Explosion);
    }

    #[test]
    fn out_of_order_inserts_resolve_by_timestamp() {
        let (tracker, clock) = tracker(10);
        let origin = clock.now();
        clock.advance(Duration::from_secs(3));

        tracker.record_at(VICTIM, ALICE, "Alice", DamageType::Melee, origin + Duration::from_secs(2));
        tracker.record_at(VICTIM, BOB, "Bob", DamageType::Projectile, origin + Duration::from_secs(1));

        let found = tracker.find_attributed_killer(VICTIM).expect("attribution");
        assert_eq!(found.aggressor, ALICE);
    }

    #[test]
    fn equal_timestamps_go_to_last_inserted() {
        let (tracker, clock) = tracker(5);
        let at = clock.now();

        tracker.record_at(VICTIM, ALICE, "Alice", DamageType::Melee, at);
        tracker.record_at(VICTIM, BOB, "Bob", DamageType::Knockback, at);

        let found = tracker.find_attributed_killer(VICTIM).expect("attribution");
        assert_eq!(found.aggressor, BOB);
        assert_eq!(found.damage_type, DamageType::Knockback);
    }

    #[test]
    fn concurrent_writers_and_readers() {
        const WORKERS: u64 = 4;
        const ROUNDS: u64 = 64;
        let victims = [EntityId(10), EntityId(11), EntityId(12), EntityId(13)];

        let (tracker, clock) = tracker(60);

        std::thread::scope(|scope| {
            for worker in 0..WORKERS {
                let tracker = &tracker;
                let victims = &victims;
                scope.spawn(move || {
                    let aggressor = EntityId(100 + worker);
                    for round in 0..ROUNDS {
                        let victim = victims[((worker + round) % victims.len() as u64) as usize];
                        tracker.record(victim, aggressor, format!("w{worker}"), DamageType::Melee);

                        let found = tracker.find_attributed_killer(victim).expect("attribution");
                        assert!((100..100 + WORKERS).contains(&found.aggressor.0));
                    }
                });
            }
        });

        for victim in victims {
            assert!(tracker.history_len(victim) <= ObituaryConfig::HISTORY_CAPACITY);
            assert!(tracker.history_len(victim) > 0);
        }
        assert_eq!(tracker.tracked_victims(), victims.len());

        clock.advance(Duration::from_millis(1));
        for victim in victims {
            tracker.record(victim, ALICE, "Alice", DamageType::Projectile);
            let found = tracker.find_attributed_killer(victim).expect("attribution");
            assert_eq!(found.aggressor, ALICE);
        }
    }

    #[test]
    fn records_expire_after_window() {
        let (tracker, clock) = tracker(5);
        tracker.record(VICTIM, ALICE, "Alice", DamageType::Knockback);

        clock.advance(Duration::from_secs(5));
        assert!(tracker.find_attributed_killer(VICTIM).is_some());

        clock.advance(Duration::from_millis(1));
        assert!(tracker.find_attributed_killer(VICTIM).is_none());
        assert_eq!(tracker.tracked_victims(), 0);
    }

    #[test]
    fn expired_records_are_pruned_on_read() {
        let (tracker, clock) = tracker(5);
        tracker.record(VICTIM, ALICE, "Alice", DamageType::Melee);
        clock.advance(Duration::from_secs(4));
        tracker.record(VICTIM, BOB, "Bob", DamageType::Melee);
        clock.advance(Duration::from_secs(2));

        // Alice's hit is 6s old, Bob's 2s old.
        let found = tracker.find_attributed_killer(VICTIM).expect("attribution");
        assert_eq!(found.aggressor, BOB);
        assert_eq!(tracker.history_len(VICTIM), 1);
    }

    #[test]
    fn already_expired_records_are_rejected() {
        let (tracker, clock) = tracker(5);
        let origin = clock.now();
        clock.advance(Duration::from_secs(10));
        assert!(!tracker.record_at(VICTIM, ALICE, "Alice", DamageType::Melee, origin));
        assert_eq!(tracker.tracked_victims(), 0);
    }

    #[test]
    fn clear_player_removes_everything() {
        let (tracker, _) = tracker(5);
        tracker.record(VICTIM, ALICE, "Alice", DamageType::Melee);
        tracker.record(VICTIM, BOB, "Bob", DamageType::Melee);

        assert!(tracker.clear_player(VICTIM));
        assert!(tracker.find_attributed_killer(VICTIM).is_none());
        assert!(!tracker.clear_player(VICTIM));
    }

    #[test]
    fn history_is_bounded() {
        let (tracker, clock) = tracker(60);
        for i in 0..(ObituaryConfig::HISTORY_CAPACITY as u64 + 8) {
            tracker.record(VICTIM, EntityId(100 + i), format!("p{i}"), DamageType::Melee);
            clock.advance(Duration::from_millis(10));
        }
        assert_eq!(tracker.history_len(VICTIM), ObituaryConfig::HISTORY_CAPACITY);

        let found = tracker.find_attributed_killer(VICTIM).expect("attribution");
        assert_eq!(
            found.aggressor,
            EntityId(100 + ObituaryConfig::HISTORY_CAPACITY as u64 + 7)
        );
    }

    #[test]
    fn full_history_drops_older_late_arrival() {
        let (tracker, clock) = tracker(60);
        let origin = clock.now();
        clock.advance(Duration::from_secs(1));
        for i in 0..ObituaryConfig::HISTORY_CAPACITY as u64 {
            tracker.record(VICTIM, EntityId(100 + i), "p", DamageType::Melee);
        }
        assert!(!tracker.record_at(VICTIM, ALICE, "Alice", DamageType::Melee, origin));
    }

    #[test]
    fn prune_expired_releases_idle_victims() {
        let (tracker, clock) = tracker(5);
        tracker.record(VICTIM, ALICE, "Alice", DamageType::Melee);
        tracker.record(EntityId(9), BOB, "Bob", DamageType::Melee);
        clock.advance(Duration::from_secs(3));
        tracker.record(EntityId(10), BOB, "Bob", DamageType::Melee);
        clock.advance(Duration::from_secs(3));

        assert_eq!(tracker.prune_expired(), 2);
        assert_eq!(tracker.tracked_victims(), 1);
    }

    #[test]
    fn shrinking_window_applies_immediately() {
        let (tracker, clock) = tracker(10);
        tracker.record(VICTIM, ALICE, "Alice", DamageType::Melee);
        clock.advance(Duration::from_secs(3));
        assert!(tracker.find_attributed_killer(VICTIM).is_some());

        tracker.set_tracking_window(Duration::from_secs(2));
        assert!(tracker.find_attributed_killer(VICTIM).is_none());
    }
}
