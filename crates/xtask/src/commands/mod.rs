//! Command implementations for xtask
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod check_catalog;
mod replay;

pub use check_catalog::CheckCatalog;
pub use replay::Replay;
