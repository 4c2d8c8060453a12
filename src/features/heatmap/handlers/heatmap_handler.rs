use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    response::{
        sse::{Event, KeepAlive},
        IntoResponse, Response, Sse,
    },
    Json,
};
use tokio_stream::wrappers::WatchStream;
use tokio_stream::StreamExt;

use crate::core::error::Result;
use crate::features::heatmap::dtos::HeatmapResponseDto;
use crate::features::heatmap::models::CriticalitySummary;
use crate::features::heatmap::services::HeatmapService;
use crate::shared::types::ApiResponse;

/// State for heatmap handlers
#[derive(Clone)]
pub struct HeatmapState {
    pub heatmap_service: Arc<HeatmapService>,
}

/// Current weighted heat points and layer options
#[utoipa::path(
    get,
    path = "/api/heatmap",
    responses(
        (status = 200, description = "Current heat field", body = ApiResponse<HeatmapResponseDto>),
        (status = 500, description = "Report store unavailable")
    ),
    tag = "heatmap"
)]
pub async fn get_heatmap(
    State(state): State<HeatmapState>,
) -> Result<Json<ApiResponse<HeatmapResponseDto>>> {
    let snapshot = state.heatmap_service.current().await?;
    Ok(Json(ApiResponse::success(
        Some(snapshot.as_ref().into()),
        None,
        None,
    )))
}

/// Recompute the heat field now instead of waiting for the next refresh
#[utoipa::path(
    post,
    path = "/api/heatmap/refresh",
    responses(
        (status = 200, description = "Freshly computed heat field", body = ApiResponse<HeatmapResponseDto>),
        (status = 500, description = "Report store unavailable")
    ),
    tag = "heatmap"
)]
pub async fn refresh_heatmap(
    State(state): State<HeatmapState>,
) -> Result<Json<ApiResponse<HeatmapResponseDto>>> {
    let snapshot = state.heatmap_service.recompute().await?;
    Ok(Json(ApiResponse::success(
        Some(snapshot.as_ref().into()),
        Some("Heatmap recomputed".to_string()),
        None,
    )))
}

/// Report counts per criticality for the map legend
#[utoipa::path(
    get,
    path = "/api/heatmap/summary",
    responses(
        (status = 200, description = "Criticality counts", body = ApiResponse<CriticalitySummary>)
    ),
    tag = "heatmap"
)]
pub async fn get_summary(
    State(state): State<HeatmapState>,
) -> Result<Json<ApiResponse<CriticalitySummary>>> {
    let snapshot = state.heatmap_service.current().await?;
    Ok(Json(ApiResponse::success(Some(snapshot.summary), None, None)))
}

/// Stream every published heat field as a `heatmap` Server-Sent Event
#[utoipa::path(
    get,
    path = "/api/heatmap/stream",
    responses(
        (status = 200, description = "SSE stream of HeatmapResponseDto payloads", body = String, content_type = "text/event-stream")
    ),
    tag = "heatmap"
)]
pub async fn stream_heatmap(State(state): State<HeatmapState>) -> Response {
    let stream = WatchStream::new(state.heatmap_service.subscribe()).filter_map(|snapshot| {
        let dto = HeatmapResponseDto::from(snapshot?.as_ref());
        match Event::default().event("heatmap").json_data(&dto) {
            Ok(event) => Some(Ok::<_, Infallible>(event)),
            Err(e) => {
                tracing::error!("Failed to encode heatmap event: {:?}", e);
                None
            }
        }
    });

    Sse::new(stream)
        .keep_alive(
            KeepAlive::new()
                .interval(Duration::from_secs(15))
                .text("ping"),
        )
        .into_response()
}
