//! Data-driven content loaders.
//!
//! This crate reads the files an operator edits and turns them into
//! `obituary-core` values:
//! - Message pools per death cause (TOML)
//! - Settings snapshot (TOML)
//!
//! Loading is tolerant at the entry level (malformed messages are skipped
//! and reported) and strict at the file level (unreadable or unparsable
//! files fail the whole load).

pub mod loaders;

pub use loaders::{
    CatalogLoader, ConfigLoader, ContentFactory, LoadReport, LoadResult, LoadedCatalog,
    SkippedEntry,
};
