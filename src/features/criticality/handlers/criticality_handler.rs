use axum::Json;

use crate::core::error::Result;
use crate::features::criticality::dtos::CriticalityLevelDto;
use crate::features::criticality::models::Criticality;
use crate::shared::types::ApiResponse;

/// List the severity labels with their weights and display metadata
#[utoipa::path(
    get,
    path = "/api/criticality-levels",
    responses(
        (status = 200, description = "Severity vocabulary", body = ApiResponse<Vec<CriticalityLevelDto>>)
    ),
    tag = "criticality"
)]
pub async fn list_levels() -> Result<Json<ApiResponse<Vec<CriticalityLevelDto>>>> {
    let levels: Vec<CriticalityLevelDto> = Criticality::ALL.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(Some(levels), None, None)))
}
