//! Message catalog loader.
//!
//! File format: top-level keys are death-cause tags, each holding an array of
//! entries. An entry is either a plain string (standard text only) or a table:
//!
//! ```toml
//! FALL = [
//!     "{player} hit the ground too hard",
//!     { standard = "{player} fell from a high place", generic_indirect = "{player} fell while fighting {killer}", indirect = { KNOCKBACK = "{player} was knocked off a ledge by {killer}" } },
//! ]
//! LAVA = [{ standard = "{player} tried to swim in lava", enabled = false }]
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use obituary_core::{DamageCause, DamageType, MessageCatalog, MessageDefinition};
use serde::Deserialize;
use tracing::warn;

use crate::loaders::{LoadResult, read_file};

/// One message entry in table form.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMessage {
    #[serde(alias = "text")]
    standard: String,
    #[serde(default = "enabled_by_default")]
    enabled: bool,
    #[serde(default)]
    indirect: BTreeMap<String, String>,
    #[serde(default)]
    generic_indirect: Option<String>,
}

fn enabled_by_default() -> bool {
    true
}

/// An entry (or part of one) left out of the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Where in the file, e.g. `FALL[2]` or `FALL[2].indirect.SHOVE`.
    pub location: String,
    pub reason: String,
}

impl fmt::Display for SkippedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.reason)
    }
}

/// Entry-level problems found while loading.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub skipped: Vec<SkippedEntry>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    fn skip(&mut self, location: impl Into<String>, reason: impl Into<String>) {
        let entry = SkippedEntry {
            location: location.into(),
            reason: reason.into(),
        };
        warn!(
            target: "obituary::catalog",
            entry = %entry.location,
            reason = %entry.reason,
            "Skipping malformed message entry"
        );
        self.skipped.push(entry);
    }
}

/// A catalog together with what was skipped to build it.
#[derive(Clone, Debug)]
pub struct LoadedCatalog {
    pub catalog: MessageCatalog,
    pub report: LoadReport,
}

/// Loader for the message catalog from TOML files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load the message catalog from a TOML file.
    ///
    /// Fails only if the file cannot be read or is not valid TOML.
    pub fn load(path: &Path) -> LoadResult<LoadedCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load message catalog {}: {}", path.display(), e))
    }

    /// Parse the message catalog from a TOML string.
    pub fn parse(content: &str) -> LoadResult<LoadedCatalog> {
        let table: toml::Table = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse message catalog TOML: {}", e))?;

        let mut catalog = MessageCatalog::new();
        let mut report = LoadReport::default();

        for (key, value) in table {
            let Ok(cause) = key.parse::<DamageCause>() else {
                report.skip(key, "unknown death cause");
                continue;
            };

            let entries = match value {
                toml::Value::Array(items) => items,
                single @ (toml::Value::String(_) | toml::Value::Table(_)) => vec![single],
                other => {
                    report.skip(
                        key,
                        format!("expected an array of messages, found {}", other.type_str()),
                    );
                    continue;
                }
            };

            for (idx, entry) in entries.into_iter().enumerate() {
                let location = format!("{key}[{idx}]");
                if let Some(definition) = parse_entry(cause, entry, &location, &mut report) {
                    catalog.insert(definition);
                }
            }
        }

        Ok(LoadedCatalog { catalog, report })
    }
}

fn parse_entry(
    cause: DamageCause,
    entry: toml::Value,
    location: &str,
    report: &mut LoadReport,
) -> Option<MessageDefinition> {
    let raw = match entry {
        toml::Value::String(standard) => RawMessage {
            standard,
            enabled: true,
            indirect: BTreeMap::new(),
            generic_indirect: None,
        },
        table @ toml::Value::Table(_) => match table.try_into::<RawMessage>() {
            Ok(raw) => raw,
            Err(e) => {
                report.skip(location, e.to_string().trim().to_string());
                return None;
            }
        },
        other => {
            report.skip(
                location,
                format!("expected a string or table, found {}", other.type_str()),
            );
            return None;
        }
    };

    if raw.standard.trim().is_empty() {
        report.skip(location, "standard text is empty");
        return None;
    }

    let mut definition = MessageDefinition::new(cause, raw.standard).with_enabled(raw.enabled);

    for (tag, text) in raw.indirect {
        match tag.parse::<DamageType>() {
            Ok(damage_type) => definition = definition.with_indirect(damage_type, text),
            Err(_) => report.skip(format!("{location}.indirect.{tag}"), "unknown damage type"),
        }
    }

    if let Some(text) = raw.generic_indirect.filter(|text| !text.trim().is_empty()) {
        definition = definition.with_generic_indirect(text);
    }

    Some(definition)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
FALL = [
    "{player} hit the ground too hard",
    { standard = "{player} fell from a high place", generic_indirect = "{player} fell while fighting {killer}", indirect = { KNOCKBACK = "{player} was knocked off a ledge by {killer}" } },
]
LAVA = [{ standard = "{player} tried to swim in lava", enabled = false }]
entity_attack = "{player} was slain by {killer}"
"#;

    #[test]
    fn parses_strings_tables_and_single_values() {
        let loaded = CatalogLoader::parse(SAMPLE).expect("catalog");
        assert!(loaded.report.is_clean(), "{:?}", loaded.report);

        let catalog = &loaded.catalog;
        assert_eq!(catalog.cause_count(), 3);
        assert_eq!(catalog.variant_count(), 4);

        let fall = catalog.pool(DamageCause::Fall);
        assert_eq!(fall[0].standard_text, "{player} hit the ground too hard");
        assert_eq!(
            fall[1].indirect_variants.get(&DamageType::Knockback).map(String::as_str),
            Some("{player} was knocked off a ledge by {killer}")
        );
        assert_eq!(
            fall[1].generic_indirect_text.as_deref(),
            Some("{player} fell while fighting {killer}")
        );

        assert!(!catalog.pool(DamageCause::Lava)[0].enabled);
        assert!(catalog.has_messages(DamageCause::EntityAttack));
    }

    #[test]
    fn malformed_entries_are_skipped_not_fatal() {
        let loaded = CatalogLoader::parse(
            r#"
NOT_A_CAUSE = ["ignored"]
VOID = 42
FALL = [
    "",
    { standard = "ok", colour = "red" },
    { standard = "{player} fell", indirect = { SHOVE = "x", MELEE = "{player} was hit down by {killer}" } },
    7,
]
"#,
        )
        .expect("catalog");

        let skipped: Vec<_> = loaded
            .report
            .skipped
            .iter()
            .map(|entry| entry.location.as_str())
            .collect();
        assert!(skipped.contains(&"NOT_A_CAUSE"));
        assert!(skipped.contains(&"VOID"));
        assert!(skipped.contains(&"FALL[0]"));
        assert!(skipped.contains(&"FALL[1]"));
        assert!(skipped.contains(&"FALL[2].indirect.SHOVE"));
        assert!(skipped.contains(&"FALL[3]"));

        let fall = loaded.catalog.pool(DamageCause::Fall);
        assert_eq!(fall.len(), 1);
        assert_eq!(fall[0].indirect_variants.len(), 1);
        assert!(!loaded.catalog.has_messages(DamageCause::Void));
    }

    #[test]
    fn bundled_catalog_is_clean() {
        let loaded =
            CatalogLoader::parse(include_str!("../../../../../data/messages.toml")).expect("catalog");
        assert!(loaded.report.is_clean(), "{:?}", loaded.report);
        assert!(loaded.catalog.has_messages(DamageCause::Fall));
        assert!(loaded.catalog.select_random(DamageCause::Lava).is_some());
    }

    #[test]
    fn syntax_errors_fail_the_whole_load() {
        assert!(CatalogLoader::parse("FALL = [\"unterminated").is_err());
    }

    #[test]
    fn load_reports_path_on_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("messages.toml");
        std::fs::write(&path, "FALL = [").expect("write");

        let err = CatalogLoader::load(&path).unwrap_err();
        assert!(err.to_string().contains("messages.toml"));

        std::fs::write(&path, SAMPLE).expect("write");
        let loaded = CatalogLoader::load(&path).expect("catalog");
        assert_eq!(loaded.catalog.variant_count(), 4);
    }
}
