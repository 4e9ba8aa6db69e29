//! Topic-based event bus for runtime outcomes.
//!
//! Every death the runtime handles and every catalog reload is published
//! here, so hosts can route announcements without polling.

mod bus;
mod types;

pub use bus::{EventBus, Topic};
pub use types::{CatalogStats, ObituaryEvent};
