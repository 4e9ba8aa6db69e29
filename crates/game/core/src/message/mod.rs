//! Death message definitions and the per-cause message catalog.

mod catalog;
mod definition;

pub use catalog::MessageCatalog;
pub use definition::MessageDefinition;
