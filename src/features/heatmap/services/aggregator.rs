use chrono::{DateTime, Utc};

use crate::features::heatmap::models::{
    days_elapsed, DecayConfig, HeatField, HeatPoint, MalformedReason, MalformedReport,
};
use crate::features::reports::models::Report;
use crate::shared::validation::validate_coordinates;

/// Base weight of a stored report, or why it cannot be used
fn base_weight(report: &Report) -> Result<f64, MalformedReason> {
    let weight = report
        .criticality_weight
        .ok_or(MalformedReason::MissingWeight)?;

    if !weight.is_finite() {
        return Err(MalformedReason::NonFiniteWeight(weight));
    }
    if !(0.0..=1.0).contains(&weight) {
        return Err(MalformedReason::WeightOutOfRange(weight));
    }
    if validate_coordinates(report.latitude, report.longitude).is_err() {
        return Err(MalformedReason::InvalidCoordinates {
            latitude: report.latitude,
            longitude: report.longitude,
        });
    }

    Ok(weight)
}

/// Turn reports into weighted heat points as of `now`.
///
/// Pure and re-entrant. One point per valid report, in input order; coincident
/// reports are not merged. Invalid reports are skipped and listed, never
/// defaulted.
pub fn compute_heat_points(reports: &[Report], now: DateTime<Utc>, config: &DecayConfig) -> HeatField {
    let mut field = HeatField {
        points: Vec::with_capacity(reports.len()),
        skipped: Vec::new(),
    };

    for report in reports {
        match base_weight(report) {
            Ok(base) => {
                let days = days_elapsed(report.created_at, now);
                field.points.push(HeatPoint {
                    latitude: report.latitude,
                    longitude: report.longitude,
                    weight: config.effective_weight(base, days),
                });
            }
            Err(reason) => {
                let malformed = MalformedReport {
                    report_id: report.id,
                    reason,
                };
                tracing::warn!("{}", malformed);
                field.skipped.push(malformed);
            }
        }
    }

    field
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{fake_report, report_at};
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_input_gives_empty_field() {
        let field = compute_heat_points(&[], now(), &DecayConfig::default());

        assert!(field.points.is_empty());
        assert!(field.skipped.is_empty());
    }

    #[test]
    fn test_two_week_old_low_report_reaches_ceiling() {
        let report = report_at("BAJA", Some(0.3), now() - Duration::days(14));

        let field = compute_heat_points(&[report.clone()], now(), &DecayConfig::default());

        assert_eq!(
            field.points,
            vec![HeatPoint {
                latitude: report.latitude,
                longitude: report.longitude,
                weight: 1.0,
            }]
        );
    }

    #[test]
    fn test_three_day_old_low_report() {
        let report = report_at("BAJA", Some(0.3), now() - Duration::days(3) - Duration::hours(5));

        let field = compute_heat_points(&[report], now(), &DecayConfig::default());

        assert!((field.points[0].weight - 0.45).abs() < 1e-9);
    }

    #[test]
    fn test_uses_frozen_weight_not_label() {
        // Label says CRITICA but the stored weight wins
        let report = report_at("CRITICA", Some(0.6), now());

        let field = compute_heat_points(&[report], now(), &DecayConfig::default());

        assert_eq!(field.points[0].weight, 0.6);
    }

    #[test]
    fn test_malformed_reports_are_skipped_and_reported() {
        let good = report_at("ALTA", Some(0.9), now());
        let nan = report_at("MEDIA", Some(f64::NAN), now());
        let missing = report_at("MEDIA", None, now());
        let too_heavy = report_at("CRITICA", Some(1.5), now());
        let mut off_map = report_at("BAJA", Some(0.3), now());
        off_map.latitude = 95.0;

        let field = compute_heat_points(
            &[good, nan.clone(), missing.clone(), too_heavy.clone(), off_map.clone()],
            now(),
            &DecayConfig::default(),
        );

        assert_eq!(field.points.len(), 1);
        assert_eq!(field.points[0].weight, 0.9);

        let skipped_ids: Vec<_> = field.skipped.iter().map(|s| s.report_id).collect();
        assert_eq!(skipped_ids, vec![nan.id, missing.id, too_heavy.id, off_map.id]);
        assert!(matches!(field.skipped[0].reason, MalformedReason::NonFiniteWeight(_)));
        assert_eq!(field.skipped[1].reason, MalformedReason::MissingWeight);
        assert_eq!(field.skipped[2].reason, MalformedReason::WeightOutOfRange(1.5));
        assert!(matches!(
            field.skipped[3].reason,
            MalformedReason::InvalidCoordinates { .. }
        ));
    }

    #[test]
    fn test_coincident_reports_are_not_merged() {
        let first = report_at("ALTA", Some(0.9), now());
        let mut second = report_at("BAJA", Some(0.3), now());
        second.latitude = first.latitude;
        second.longitude = first.longitude;

        let field = compute_heat_points(&[first, second], now(), &DecayConfig::default());

        assert_eq!(field.points.len(), 2);
    }

    #[test]
    fn test_future_report_keeps_base_weight() {
        let report = report_at("MEDIA", Some(0.6), now() + Duration::days(2));

        let field = compute_heat_points(&[report], now(), &DecayConfig::default());

        assert_eq!(field.points[0].weight, 0.6);
    }

    proptest! {
        #[test]
        fn prop_cardinality_is_preserved(count in 0usize..40, broken_every in 2usize..6) {
            let reports: Vec<Report> = (0..count)
                .map(|i| {
                    let mut report = fake_report();
                    if i % broken_every == 0 {
                        report.criticality_weight = None;
                    }
                    report
                })
                .collect();

            let field = compute_heat_points(&reports, now(), &DecayConfig::default());

            prop_assert_eq!(field.points.len() + field.skipped.len(), reports.len());
        }

        #[test]
        fn prop_later_now_never_lowers_weights(extra_hours in 0i64..24 * 60) {
            let reports: Vec<Report> = (0..10).map(|_| fake_report()).collect();
            let config = DecayConfig::default();

            let before = compute_heat_points(&reports, now(), &config);
            let after = compute_heat_points(&reports, now() + Duration::hours(extra_hours), &config);

            for (a, b) in before.points.iter().zip(after.points.iter()) {
                prop_assert!(a.weight <= b.weight);
            }
        }
    }
}
