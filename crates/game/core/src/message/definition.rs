use std::collections::BTreeMap;

use crate::combat::{DamageCause, DamageType, KillKind};

/// One configured death message variant. Immutable after load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageDefinition {
    pub cause: DamageCause,
    pub standard_text: String,
    pub enabled: bool,
    /// Texts used when the kill is indirect and was set up by a hit of the
    /// given type.
    pub indirect_variants: BTreeMap<DamageType, String>,
    /// Text for indirect kills with no type-specific entry.
    pub generic_indirect_text: Option<String>,
}

impl MessageDefinition {
    pub fn new(cause: DamageCause, standard_text: impl Into<String>) -> Self {
        Self {
            cause,
            standard_text: standard_text.into(),
            enabled: true,
            indirect_variants: BTreeMap::new(),
            generic_indirect_text: None,
        }
    }

    pub fn with_indirect(mut self, damage_type: DamageType, text: impl Into<String>) -> Self {
        self.indirect_variants.insert(damage_type, text.into());
        self
    }

    pub fn with_generic_indirect(mut self, text: impl Into<String>) -> Self {
        self.generic_indirect_text = Some(text.into());
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Picks the text for a kill.
    ///
    /// # Priority
    ///
    /// ```text
    /// direct kill                          → standard_text
    /// indirect kill, type-specific entry   → that entry
    /// indirect kill, generic text present  → generic_indirect_text
    /// otherwise                            → standard_text
    /// ```
    pub fn text_for(&self, kill: KillKind) -> &str {
        match kill {
            KillKind::Indirect(damage_type) => self
                .indirect_variants
                .get(&damage_type)
                .or(self.generic_indirect_text.as_ref())
                .unwrap_or(&self.standard_text)
                .as_str(),
            KillKind::Direct | KillKind::Environmental => self.standard_text.as_str(),
        }
    }

    /// Number of distinct texts this definition can produce.
    pub fn text_count(&self) -> usize {
        1 + self.indirect_variants.len() + usize::from(self.generic_indirect_text.is_some())
    }
}
