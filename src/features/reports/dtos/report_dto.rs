use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::criticality::dtos::CriticalityLevelDto;
use crate::features::criticality::weight_of_or_lowest;
use crate::features::reports::models::{NewReport, Report};
use crate::shared::types::Coordinates;

/// Response DTO for report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub description: String,
    pub photo_url: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// Label as stored
    pub initial_criticality: String,
    /// Base weight frozen at creation
    pub criticality_weight: Option<f64>,
    /// Weight used by legends, the label's weight when none was frozen
    pub display_weight: f64,
    /// Display metadata; unknown stored labels show as the lowest tier
    pub criticality: CriticalityLevelDto,
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        let criticality = r.display_criticality().into();
        let display_weight = r
            .criticality_weight
            .unwrap_or_else(|| weight_of_or_lowest(&r.initial_criticality));
        Self {
            id: r.id,
            created_at: r.created_at,
            description: r.description,
            photo_url: r.photo_url,
            latitude: r.latitude,
            longitude: r.longitude,
            initial_criticality: r.initial_criticality,
            criticality_weight: r.criticality_weight,
            display_weight,
            criticality,
        }
    }
}

/// Request DTO for creating a report whose photo is already uploaded
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateReportDto {
    #[validate(range(min = -90.0, max = 90.0))]
    #[schema(example = -27.3671)]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    #[schema(example = -55.8961)]
    pub longitude: f64,
    /// One of BAJA, MEDIA, ALTA, CRITICA
    #[schema(example = "ALTA")]
    pub criticality: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(max = 2048))]
    pub photo_url: Option<String>,
}

impl From<CreateReportDto> for NewReport {
    fn from(dto: CreateReportDto) -> Self {
        Self {
            coordinates: Coordinates::new(dto.latitude, dto.longitude),
            criticality: dto.criticality,
            description: dto.description,
            photo_url: dto.photo_url,
        }
    }
}

/// Report submission form (multipart/form-data)
///
/// Documentation only. The handler reads the fields with axum's Multipart extractor.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct SubmitReportFormDto {
    /// Photo of the breeding site (image/*, max 10MB)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub photo: String,
    #[schema(example = -27.3671)]
    pub latitude: f64,
    #[schema(example = -55.8961)]
    pub longitude: f64,
    #[schema(example = "MEDIA")]
    pub criticality: String,
    #[schema(example = "Av. Mitre 1500")]
    pub street_address: String,
    pub zone: Option<String>,
    #[schema(example = "Neumático")]
    pub site_type: Option<String>,
    pub proximity: Option<String>,
    pub access_info: Option<String>,
    pub observations: Option<String>,
    /// Let the vision assistant adjust the location (default true)
    pub refine_location: Option<bool>,
}

/// Photo classification form (multipart/form-data)
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct ClassifyPhotoFormDto {
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub photo: String,
}
