use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    Json,
};
use tracing::debug;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::reports::dtos::{
    ClassifyPhotoFormDto, CreateReportDto, ReportResponseDto, SubmitReportFormDto,
};
use crate::features::reports::models::{PhotoUpload, ReportDetails, ReportSubmission};
use crate::features::reports::services::ReportService;
use crate::modules::vision::SiteClassification;
use crate::shared::types::{ApiResponse, Coordinates, Meta, PaginationQuery};

/// State for report handlers
#[derive(Clone)]
pub struct ReportState {
    pub report_service: Arc<ReportService>,
}

/// Multipart form split into the photo and its text fields
#[derive(Debug, Default)]
struct ReportForm {
    photo: Option<PhotoUpload>,
    fields: HashMap<String, String>,
}

impl ReportForm {
    async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            debug!("Failed to read multipart field: {}", e);
            AppError::BadRequest(format!("Failed to read multipart data: {}", e))
        })? {
            let name = field.name().unwrap_or("").to_string();

            if name == "photo" {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let file_name = field.file_name().unwrap_or("photo").to_string();
                let data = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read photo data: {}", e))
                })?;

                form.photo = Some(PhotoUpload {
                    data: data.to_vec(),
                    file_name,
                    content_type,
                });
            } else {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read field '{}': {}", name, e))
                })?;
                form.fields.insert(name, text);
            }
        }

        Ok(form)
    }

    fn take_photo(&mut self) -> Result<PhotoUpload> {
        self.photo
            .take()
            .ok_or_else(|| AppError::BadRequest("Photo is required".to_string()))
    }

    /// Trimmed, non-empty text field
    fn text(&mut self, name: &str) -> Option<String> {
        self.fields
            .remove(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&mut self, name: &str) -> Result<String> {
        self.text(name)
            .ok_or_else(|| AppError::BadRequest(format!("Field '{}' is required", name)))
    }

    fn number(&mut self, name: &str) -> Result<f64> {
        self.required(name)?
            .parse::<f64>()
            .map_err(|_| AppError::BadRequest(format!("Field '{}' must be a number", name)))
    }

    fn flag(&mut self, name: &str, default: bool) -> bool {
        match self.text(name).map(|v| v.to_ascii_lowercase()) {
            Some(v) => matches!(v.as_str(), "true" | "1" | "on" | "yes"),
            None => default,
        }
    }

    fn into_submission(mut self) -> Result<ReportSubmission> {
        let photo = self.take_photo()?;
        let coordinates = Coordinates::new(self.number("latitude")?, self.number("longitude")?);
        let criticality = self.required("criticality")?;
        let refine_location = self.flag("refine_location", true);

        let details = ReportDetails {
            street_address: self.required("street_address")?,
            zone: self.text("zone"),
            site_type: self.text("site_type"),
            proximity: self.text("proximity"),
            access_info: self.text("access_info"),
            observations: self.text("observations"),
        };

        Ok(ReportSubmission {
            photo,
            coordinates,
            criticality,
            details,
            refine_location,
        })
    }
}

/// List reports, most recent first
#[utoipa::path(
    get,
    path = "/api/reports",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Page of reports", body = ApiResponse<Vec<ReportResponseDto>>)
    ),
    tag = "reports"
)]
pub async fn list_reports(
    State(state): State<ReportState>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let (reports, total) = state.report_service.list(&pagination).await?;
    let dtos: Vec<ReportResponseDto> = reports.into_iter().map(|r| r.into()).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Create a report whose photo was uploaded separately
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = CreateReportDto,
    responses(
        (status = 201, description = "Report created", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Invalid coordinates or severity label")
    ),
    tag = "reports"
)]
pub async fn create_report(
    State(state): State<ReportState>,
    AppJson(dto): AppJson<CreateReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(format!("Invalid request: {}", e)))?;

    let report = state.report_service.create(dto.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(report.into()),
            Some("Report created".to_string()),
            None,
        )),
    ))
}

/// Submit a photo report
///
/// Uploads the photo, optionally lets the vision assistant adjust the
/// location, and stores the report.
#[utoipa::path(
    post,
    path = "/api/reports/submit",
    request_body(
        content = SubmitReportFormDto,
        content_type = "multipart/form-data",
        description = "Photo plus location, severity label and site details",
    ),
    responses(
        (status = 201, description = "Report created", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Invalid form, photo or severity label"),
        (status = 413, description = "Photo too large"),
        (status = 502, description = "Photo storage failed")
    ),
    tag = "reports"
)]
pub async fn submit_report(
    State(state): State<ReportState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponseDto>>)> {
    let submission = ReportForm::read(multipart).await?.into_submission()?;

    let report = state.report_service.submit(submission).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(report.into()),
            Some("Report created".to_string()),
            None,
        )),
    ))
}

/// Classify a breeding-site photo with the vision assistant
#[utoipa::path(
    post,
    path = "/api/reports/classify",
    request_body(
        content = ClassifyPhotoFormDto,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 200, description = "Suggested site type and severity", body = ApiResponse<SiteClassification>),
        (status = 400, description = "Invalid photo"),
        (status = 502, description = "Vision service error"),
        (status = 503, description = "Vision assistant not configured")
    ),
    tag = "reports"
)]
pub async fn classify_photo(
    State(state): State<ReportState>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<SiteClassification>>> {
    let photo = ReportForm::read(multipart).await?.take_photo()?;

    let classification = state.report_service.classify_photo(photo).await?;

    Ok(Json(ApiResponse::success(Some(classification), None, None)))
}
