use utoipa::{Modify, OpenApi};

use crate::features::criticality::{dtos as criticality_dtos, handlers as criticality_handlers};
use crate::features::heatmap::{
    dtos as heatmap_dtos, handlers as heatmap_handlers, models as heatmap_models,
};
use crate::features::reports::{dtos as reports_dtos, handlers as reports_handlers};
use crate::modules::vision::SiteClassification;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Criticality
        criticality_handlers::list_levels,
        // Reports
        reports_handlers::list_reports,
        reports_handlers::create_report,
        reports_handlers::submit_report,
        reports_handlers::classify_photo,
        // Heatmap
        heatmap_handlers::get_heatmap,
        heatmap_handlers::refresh_heatmap,
        heatmap_handlers::get_summary,
        heatmap_handlers::stream_heatmap,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Criticality
            criticality_dtos::CriticalityLevelDto,
            ApiResponse<Vec<criticality_dtos::CriticalityLevelDto>>,
            // Reports
            reports_dtos::ReportResponseDto,
            reports_dtos::CreateReportDto,
            reports_dtos::SubmitReportFormDto,
            reports_dtos::ClassifyPhotoFormDto,
            SiteClassification,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            ApiResponse<SiteClassification>,
            // Heatmap
            heatmap_dtos::HeatmapResponseDto,
            heatmap_dtos::HeatLayerOptionsDto,
            heatmap_models::DecayConfig,
            heatmap_models::CriticalitySummary,
            ApiResponse<heatmap_dtos::HeatmapResponseDto>,
            ApiResponse<heatmap_models::CriticalitySummary>,
        )
    ),
    tags(
        (name = "criticality", description = "Severity labels, weights and legend metadata"),
        (name = "reports", description = "Breeding-site reports and photo intake"),
        (name = "heatmap", description = "Time-escalating criticality heat field"),
    ),
    info(
        title = "Vigilantes del Aedes API",
        version = "0.1.0",
        description = "Breeding-site reports and criticality heatmap",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
