use std::collections::HashMap;

use rand::Rng;
use rand::seq::IteratorRandom;

use super::definition::MessageDefinition;
use crate::combat::DamageCause;

/// Message pools keyed by death cause.
///
/// Built once and never mutated afterwards; reload swaps in a new catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MessageCatalog {
    pools: HashMap<DamageCause, Vec<MessageDefinition>>,
}

impl MessageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `definition` to the pool for its cause.
    pub fn insert(&mut self, definition: MessageDefinition) {
        self.pools
            .entry(definition.cause)
            .or_default()
            .push(definition);
    }

    /// Whether any definition, enabled or not, exists for `cause`.
    pub fn has_messages(&self, cause: DamageCause) -> bool {
        self.pools.get(&cause).is_some_and(|pool| !pool.is_empty())
    }

    /// All definitions for `cause`, in load order.
    pub fn pool(&self, cause: DamageCause) -> &[MessageDefinition] {
        self.pools.get(&cause).map_or(&[], Vec::as_slice)
    }

    /// Uniform choice among the enabled definitions for `cause`.
    pub fn select_random(&self, cause: DamageCause) -> Option<&MessageDefinition> {
        self.select_random_with(cause, &mut rand::rng())
    }

    pub fn select_random_with<R: Rng + ?Sized>(
        &self,
        cause: DamageCause,
        rng: &mut R,
    ) -> Option<&MessageDefinition> {
        self.pool(cause)
            .iter()
            .filter(|definition| definition.enabled)
            .choose(rng)
    }

    /// Number of causes with at least one definition.
    pub fn cause_count(&self) -> usize {
        self.pools.values().filter(|pool| !pool.is_empty()).count()
    }

    /// Number of definitions across all causes.
    pub fn variant_count(&self) -> usize {
        self.pools.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.variant_count() == 0
    }

    pub fn causes(&self) -> impl Iterator<Item = DamageCause> + '_ {
        self.pools
            .iter()
            .filter(|(_, pool)| !pool.is_empty())
            .map(|(cause, _)| *cause)
    }
}

impl FromIterator<MessageDefinition> for MessageCatalog {
    fn from_iter<I: IntoIterator<Item = MessageDefinition>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for definition in iter {
            catalog.insert(definition);
        }
        catalog
    }
}
