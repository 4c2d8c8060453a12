use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::criticality::Criticality;
use crate::features::reports::models::Report;
use crate::modules::storage::{BlobStore, StoredBlob};
use crate::modules::vision::{
    ImageInput, RefinedLocation, SiteClassification, VisionAssistant, VisionError,
};
use crate::shared::types::Coordinates;

/// Somewhere in Posadas, Misiones
pub fn fake_coordinates() -> Coordinates {
    Coordinates::new((-27.42..-27.33).fake(), (-55.98..-55.86).fake())
}

/// Valid stored report with a random label, age and location
pub fn fake_report() -> Report {
    let criticality = Criticality::ALL[(0..Criticality::ALL.len()).fake::<usize>()];
    let age_hours: i64 = (0..24 * 30).fake();
    let mut report = report_at(
        criticality.label(),
        Some(criticality.weight()),
        Utc::now() - Duration::hours(age_hours),
    );
    report.description = Sentence(3..8).fake();
    report
}

pub fn report_with_label(label: &str) -> Report {
    report_at(label, Some(Criticality::from_label_lenient(label).weight()), Utc::now())
}

/// Stored report with exact label, weight and creation time
pub fn report_at(label: &str, weight: Option<f64>, created_at: DateTime<Utc>) -> Report {
    let location = fake_coordinates();
    Report {
        id: Uuid::now_v7(),
        created_at,
        description: String::new(),
        photo_url: None,
        latitude: location.latitude,
        longitude: location.longitude,
        initial_criticality: label.to_string(),
        criticality_weight: weight,
    }
}

/// JPEG magic bytes followed by padding
pub fn fake_jpeg(len: usize) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0];
    data.resize(len.max(4), 0);
    data
}

/// Blob store that keeps uploads in memory
#[derive(Default)]
pub struct InMemoryBlobStore {
    pub uploads: Mutex<Vec<(String, String, usize)>>,
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    fn public_prefix(&self) -> &str {
        "public"
    }

    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<StoredBlob> {
        if let Ok(mut uploads) = self.uploads.lock() {
            uploads.push((key.to_string(), content_type.to_string(), data.len()));
        }
        Ok(StoredBlob {
            key: key.to_string(),
            public_url: format!("http://minio.test/reports/{}", key),
        })
    }
}

/// Vision assistant with canned answers
pub struct StubVision {
    pub refinement: std::result::Result<RefinedLocation, String>,
    pub classification: std::result::Result<SiteClassification, String>,
}

impl StubVision {
    pub fn refining_to(coordinates: Coordinates, confidence: f64) -> Self {
        Self {
            refinement: Ok(RefinedLocation {
                coordinates,
                confidence,
            }),
            classification: Err("not scripted".to_string()),
        }
    }

    pub fn classifying_as(classification: SiteClassification) -> Self {
        Self {
            refinement: Err("not scripted".to_string()),
            classification: Ok(classification),
        }
    }

    pub fn failing() -> Self {
        Self {
            refinement: Err("model unavailable".to_string()),
            classification: Err("model unavailable".to_string()),
        }
    }
}

#[async_trait]
impl VisionAssistant for StubVision {
    async fn refine_location(
        &self,
        _image: &ImageInput,
        _marked: Coordinates,
    ) -> std::result::Result<RefinedLocation, VisionError> {
        self.refinement.clone().map_err(VisionError::Request)
    }

    async fn classify_site(
        &self,
        _image: &ImageInput,
    ) -> std::result::Result<SiteClassification, VisionError> {
        self.classification.clone().map_err(VisionError::Request)
    }
}
