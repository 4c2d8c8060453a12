use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::HeatmapError;

/// Daily escalation policy for report weights.
///
/// An unattended site grows more critical every full day until it hits the
/// ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct DecayConfig {
    pub daily_increment: f64,
    pub max_weight: f64,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            daily_increment: 0.05,
            max_weight: 1.0,
        }
    }
}

impl DecayConfig {
    pub fn new(daily_increment: f64, max_weight: f64) -> Result<Self, HeatmapError> {
        if !daily_increment.is_finite() || daily_increment < 0.0 {
            return Err(HeatmapError::InvalidDecayConfig(format!(
                "daily increment must be a finite non-negative number, got {}",
                daily_increment
            )));
        }
        if !max_weight.is_finite() || max_weight <= 0.0 {
            return Err(HeatmapError::InvalidDecayConfig(format!(
                "max weight must be a finite positive number, got {}",
                max_weight
            )));
        }

        Ok(Self {
            daily_increment,
            max_weight,
        })
    }

    /// `min(base + days * increment, ceiling)`. The ceiling wins even when
    /// `base` already exceeds it.
    pub fn effective_weight(&self, base: f64, days: i64) -> f64 {
        (base + days.max(0) as f64 * self.daily_increment).min(self.max_weight)
    }
}

/// Whole days between `created_at` and `now`; future timestamps count as 0
pub fn days_elapsed(created_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - created_at).num_days().max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_default_policy() {
        let config = DecayConfig::default();
        assert_eq!(config.daily_increment, 0.05);
        assert_eq!(config.max_weight, 1.0);
    }

    #[test]
    fn test_rejects_invalid_policies() {
        assert!(DecayConfig::new(-0.01, 1.0).is_err());
        assert!(DecayConfig::new(f64::NAN, 1.0).is_err());
        assert!(DecayConfig::new(0.05, 0.0).is_err());
        assert!(DecayConfig::new(0.05, f64::INFINITY).is_err());
        assert!(DecayConfig::new(0.0, 0.5).is_ok());
    }

    #[test]
    fn test_days_elapsed_floors_partial_days() {
        let created = base_time();
        assert_eq!(days_elapsed(created, created + Duration::hours(23)), 0);
        assert_eq!(days_elapsed(created, created + Duration::hours(49)), 2);
    }

    #[test]
    fn test_days_elapsed_clamps_clock_skew() {
        let created = base_time();
        assert_eq!(days_elapsed(created, created - Duration::days(3)), 0);
    }

    #[test]
    fn test_escalation_scenarios() {
        let config = DecayConfig::default();
        assert_eq!(config.effective_weight(0.3, 14), 1.0);
        assert!((config.effective_weight(0.3, 3) - 0.45).abs() < 1e-9);
        assert_eq!(config.effective_weight(0.6, 0), 0.6);
    }

    #[test]
    fn test_ceiling_wins_over_base() {
        let config = DecayConfig::new(0.05, 0.8).unwrap();
        assert_eq!(config.effective_weight(1.0, 0), 0.8);
    }

    proptest! {
        #[test]
        fn prop_weight_is_monotonic_in_days(
            base in 0.0f64..=1.0,
            increment in 0.0f64..0.5,
            d1 in 0i64..3650,
            d2 in 0i64..3650,
        ) {
            let config = DecayConfig::new(increment, 1.0).unwrap();
            let (early, late) = if d1 <= d2 { (d1, d2) } else { (d2, d1) };
            prop_assert!(config.effective_weight(base, early) <= config.effective_weight(base, late));
        }

        #[test]
        fn prop_weight_never_exceeds_ceiling(
            base in 0.0f64..=1.0,
            increment in 0.0f64..1.0,
            ceiling in 0.01f64..=1.0,
            days in 0i64..100_000,
        ) {
            let config = DecayConfig::new(increment, ceiling).unwrap();
            prop_assert!(config.effective_weight(base, days) <= ceiling);
        }

        #[test]
        fn prop_zero_days_keeps_base(base in 0.0f64..=1.0) {
            let config = DecayConfig::default();
            prop_assert_eq!(config.effective_weight(base, 0), base);
        }

        #[test]
        fn prop_future_reports_have_zero_days(skew_secs in 1i64..10_000_000) {
            let now = base_time();
            let created = now + Duration::seconds(skew_secs);
            prop_assert_eq!(days_elapsed(created, now), 0);
        }
    }
}
