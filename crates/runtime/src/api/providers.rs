//! Host-side collaborators.
//!
//! The host plugs in an [`EntityOracle`] so the runtime can tell players from
//! other entities and render names, and optionally a [`PlaceholderService`]
//! for provider-specific tokens left in a message after built-in
//! substitution.
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use obituary_core::{EntityId, Location};

/// Read-only view of live entities.
///
/// Implementations can be backed by:
/// - The host's player list
/// - A fixed roster (tests, replay)
pub trait EntityOracle: Send + Sync {
    /// Whether `entity` is a player (the only kind we track or credit).
    fn is_player(&self, entity: EntityId) -> bool;

    /// Name shown in messages, if the entity is known.
    fn display_name(&self, entity: EntityId) -> Option<String>;

    /// Current position, used for the world and coordinate tokens.
    fn location(&self, _entity: EntityId) -> Option<Location> {
        None
    }
}

/// Rewrites provider-specific tokens in a message that has already been
/// selected and formatted.
///
/// Expected to be best-effort. A panic inside `substitute` is caught by the
/// death engine and turns into a deferral.
pub trait PlaceholderService: Send + Sync {
    fn substitute(&self, player: EntityId, text: &str) -> String;
}

/// Placeholder service that leaves text unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPlaceholders;

impl PlaceholderService for NoopPlaceholders {
    fn substitute(&self, _player: EntityId, text: &str) -> String {
        text.to_string()
    }
}

#[derive(Debug, Clone)]
struct RosterEntry {
    name: String,
    location: Option<Location>,
}

/// In-memory [`EntityOracle`] holding the online players.
///
/// Every entity not in the roster is treated as a non-player.
#[derive(Debug, Default)]
pub struct PlayerRoster {
    players: RwLock<HashMap<EntityId, RosterEntry>>,
}

impl PlayerRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join(&self, id: EntityId, name: impl Into<String>) {
        let entry = RosterEntry {
            name: name.into(),
            location: None,
        };
        self.players
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, entry);
    }

    pub fn leave(&self, id: EntityId) -> bool {
        self.players
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some()
    }

    /// Updates a player's position. Ignored for unknown ids.
    pub fn move_to(&self, id: EntityId, location: Location) {
        if let Some(entry) = self
            .players
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&id)
        {
            entry.location = Some(location);
        }
    }

    pub fn len(&self) -> usize {
        self.players
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_entry<T>(&self, id: EntityId, f: impl FnOnce(&RosterEntry) -> T) -> Option<T> {
        self.players
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .map(f)
    }
}

impl EntityOracle for PlayerRoster {
    fn is_player(&self, entity: EntityId) -> bool {
        self.with_entry(entity, |_| ()).is_some()
    }

    fn display_name(&self, entity: EntityId) -> Option<String> {
        self.with_entry(entity, |entry| entry.name.clone())
    }

    fn location(&self, entity: EntityId) -> Option<Location> {
        self.with_entry(entity, |entry| entry.location.clone()).flatten()
    }
}
