use obituary_core::{AttributionTracker, ObituaryConfig};

use crate::api::EntityOracle;

/// Context passed to hooks.
pub struct HookContext<'a> {
    /// Settings snapshot in effect for this event
    pub config: &'a ObituaryConfig,
    /// Shared attribution store
    pub tracker: &'a AttributionTracker,
    /// Host view of live entities
    pub oracle: &'a dyn EntityOracle,
}

impl<'a> HookContext<'a> {
    pub fn new(
        config: &'a ObituaryConfig,
        tracker: &'a AttributionTracker,
        oracle: &'a dyn EntityOracle,
    ) -> Self {
        Self {
            config,
            tracker,
            oracle,
        }
    }
}
