use serde::Serialize;
use utoipa::ToSchema;

use crate::features::criticality::Criticality;
use crate::features::reports::models::Report;

/// Counts shown in the map legend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct CriticalitySummary {
    pub total: usize,
    pub critical: usize,
    pub high: usize,
    /// BAJA and MEDIA together
    pub controllable: usize,
    /// Stored labels outside the known set
    pub unclassified: usize,
}

impl CriticalitySummary {
    pub fn from_reports(reports: &[Report]) -> Self {
        reports.iter().fold(Self::default(), |mut summary, report| {
            summary.total += 1;
            match report.initial_criticality.parse::<Criticality>() {
                Ok(Criticality::Critica) => summary.critical += 1,
                Ok(Criticality::Alta) => summary.high += 1,
                Ok(Criticality::Media | Criticality::Baja) => summary.controllable += 1,
                Err(_) => summary.unclassified += 1,
            }
            summary
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::report_with_label;

    #[test]
    fn test_summary_counts() {
        let reports = vec![
            report_with_label("CRITICA"),
            report_with_label("ALTA"),
            report_with_label("ALTA"),
            report_with_label("MEDIA"),
            report_with_label("baja"),
            report_with_label("GRAVE"),
        ];

        assert_eq!(
            CriticalitySummary::from_reports(&reports),
            CriticalitySummary {
                total: 6,
                critical: 1,
                high: 2,
                controllable: 2,
                unclassified: 1,
            }
        );
    }

    #[test]
    fn test_summary_of_nothing() {
        assert_eq!(CriticalitySummary::from_reports(&[]), CriticalitySummary::default());
    }
}
