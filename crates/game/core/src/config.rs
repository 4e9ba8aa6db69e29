use std::time::Duration;

use crate::combat::DamageClassifier;

/// Tunable parameters shared by the observer, tracker, and death engine.
///
/// Handed around as an immutable snapshot; a reload replaces the whole value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ObituaryConfig {
    /// Global toggle. When false nothing is recorded and every death is
    /// deferred to the host.
    pub enabled: bool,
    /// Emit debug traces for dropped damage events.
    pub debug: bool,
    /// Hits below this many hearts are not recorded.
    pub minimum_damage: f64,
    /// Maximum age of a hit that can still be credited with a kill.
    pub tracking_window_ms: u64,
    /// Raw damage below which a player hit counts as knockback.
    pub knockback_threshold: f64,
    /// Advisory time budget for producing one death message.
    pub performance_budget_ms: u64,
}

impl ObituaryConfig {
    // ===== compile-time constants =====
    /// Records kept per victim; the oldest is evicted beyond this.
    pub const HISTORY_CAPACITY: usize = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MINIMUM_DAMAGE: f64 = 0.5;
    pub const DEFAULT_TRACKING_WINDOW_MS: u64 = 5_000;
    pub const DEFAULT_PERFORMANCE_BUDGET_MS: u64 = 100;

    pub fn new() -> Self {
        Self {
            enabled: true,
            debug: false,
            minimum_damage: Self::DEFAULT_MINIMUM_DAMAGE,
            tracking_window_ms: Self::DEFAULT_TRACKING_WINDOW_MS,
            knockback_threshold: DamageClassifier::DEFAULT_KNOCKBACK_THRESHOLD,
            performance_budget_ms: Self::DEFAULT_PERFORMANCE_BUDGET_MS,
        }
    }

    pub fn with_tracking_window(mut self, window: Duration) -> Self {
        self.tracking_window_ms = window.as_millis().min(u64::MAX as u128) as u64;
        self
    }

    pub fn with_minimum_damage(mut self, hearts: f64) -> Self {
        self.minimum_damage = hearts;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn tracking_window(&self) -> Duration {
        Duration::from_millis(self.tracking_window_ms)
    }

    pub fn performance_budget(&self) -> Duration {
        Duration::from_millis(self.performance_budget_ms)
    }

    pub fn classifier(&self) -> DamageClassifier {
        DamageClassifier::new(self.knockback_threshold)
    }

    /// Rejects values that would silently disable or break attribution.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.minimum_damage.is_finite() || self.minimum_damage < 0.0 {
            return Err(ConfigError::InvalidMinimumDamage(self.minimum_damage));
        }
        if !self.knockback_threshold.is_finite() || self.knockback_threshold < 0.0 {
            return Err(ConfigError::InvalidKnockbackThreshold(
                self.knockback_threshold,
            ));
        }
        if self.tracking_window_ms == 0 {
            return Err(ConfigError::ZeroTrackingWindow);
        }
        Ok(())
    }
}

impl Default for ObituaryConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Invalid configuration values.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("minimum_damage must be a finite, non-negative number of hearts (got {0})")]
    InvalidMinimumDamage(f64),

    #[error("knockback_threshold must be a finite, non-negative damage value (got {0})")]
    InvalidKnockbackThreshold(f64),

    #[error("tracking_window_ms must be greater than zero")]
    ZeroTrackingWindow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ObituaryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tracking_window(), Duration::from_secs(5));
        assert_eq!(config.performance_budget(), Duration::from_millis(100));
        assert_eq!(config.classifier().knockback_threshold(), 4.0);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let config = ObituaryConfig::default().with_minimum_damage(-1.0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidMinimumDamage(-1.0))
        );

        let config = ObituaryConfig::default().with_tracking_window(Duration::ZERO);
        assert_eq!(config.validate(), Err(ConfigError::ZeroTrackingWindow));

        let mut config = ObituaryConfig::default();
        config.knockback_threshold = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidKnockbackThreshold(_))
        ));
    }
}
