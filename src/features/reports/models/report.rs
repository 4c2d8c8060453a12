use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::criticality::{weight_of, Criticality, CriticalityError};
use crate::shared::types::Coordinates;

/// Stored breeding-site report.
///
/// `criticality_weight` is nullable because rows may come from writers that
/// never froze a weight; the heat aggregator rejects those instead of
/// defaulting them.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub description: String,
    pub photo_url: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub initial_criticality: String,
    pub criticality_weight: Option<f64>,
}

impl Report {
    /// Label for display, falling back to the lowest tier when unknown
    pub fn display_criticality(&self) -> Criticality {
        Criticality::from_label_lenient(&self.initial_criticality)
    }
}

/// Validated data handed to a report store for insertion
#[derive(Debug, Clone)]
pub struct CreateReport {
    pub description: String,
    pub photo_url: Option<String>,
    pub coordinates: Coordinates,
    pub criticality: Criticality,
    pub criticality_weight: f64,
}

impl CreateReport {
    /// Strictly parse the label and freeze its base weight at creation time
    pub fn from_label(
        coordinates: Coordinates,
        label: &str,
        description: String,
        photo_url: Option<String>,
    ) -> Result<Self, CriticalityError> {
        let criticality_weight = weight_of(label)?;
        Ok(Self {
            description,
            photo_url,
            coordinates,
            criticality: label.parse()?,
            criticality_weight,
        })
    }

    /// Materialize the stored row once the store has assigned identity and time
    pub fn into_report(self, id: Uuid, created_at: DateTime<Utc>) -> Report {
        Report {
            id,
            created_at,
            description: self.description,
            photo_url: self.photo_url,
            latitude: self.coordinates.latitude,
            longitude: self.coordinates.longitude,
            initial_criticality: self.criticality.label().to_string(),
            criticality_weight: Some(self.criticality_weight),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_report_freezes_weight_from_label() {
        let create = CreateReport::from_label(
            Coordinates::new(-27.3671, -55.8961),
            " alta ",
            "Neumático con agua".to_string(),
            None,
        )
        .unwrap();
        assert_eq!(create.criticality, Criticality::Alta);
        assert_eq!(create.criticality_weight, 0.9);

        let report = create.into_report(Uuid::now_v7(), Utc::now());
        assert_eq!(report.initial_criticality, "ALTA");
        assert_eq!(report.criticality_weight, Some(0.9));
    }

    #[test]
    fn test_row_json_from_notify_payload() {
        // Shape produced by row_to_json(NEW) in the insert trigger
        let payload = r#"{
            "id": "0190b6a4-8c4e-7d2a-9f1e-3b5c7d9e1f20",
            "created_at": "2024-01-01T12:30:00.123456+00:00",
            "description": "Balde",
            "photo_url": null,
            "latitude": -27.37,
            "longitude": -55.9,
            "initial_criticality": "MEDIA",
            "criticality_weight": 0.6
        }"#;

        let report: Report = serde_json::from_str(payload).unwrap();
        assert_eq!(report.display_criticality(), Criticality::Media);
        assert_eq!(report.criticality_weight, Some(0.6));
        assert!(report.photo_url.is_none());
    }

    #[test]
    fn test_create_report_rejects_unknown_label() {
        let result = CreateReport::from_label(
            Coordinates::new(-27.3671, -55.8961),
            "URGENTE",
            String::new(),
            None,
        );
        assert!(matches!(
            result,
            Err(CriticalityError::InvalidSeverityLabel(_))
        ));
    }
}
