use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::reports::handlers::{self, ReportState};
use crate::features::reports::services::ReportService;

/// Create public routes for the reports feature
pub fn routes(report_service: Arc<ReportService>) -> Router {
    let state = ReportState { report_service };

    Router::new()
        .route(
            "/api/reports",
            get(handlers::list_reports).post(handlers::create_report),
        )
        .route("/api/reports/submit", post(handlers::submit_report))
        .route("/api/reports/classify", post(handlers::classify_photo))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::stores::InMemoryReportStore;
    use crate::modules::vision::VisionAssistant;
    use crate::shared::test_helpers::{fake_jpeg, InMemoryBlobStore, StubVision};
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    fn server(vision: Option<StubVision>) -> TestServer {
        let vision = vision.map(|v| Arc::new(v) as Arc<dyn VisionAssistant>);
        let service = Arc::new(ReportService::new(
            Arc::new(InMemoryReportStore::new()),
            Arc::new(InMemoryBlobStore::default()),
            vision,
            250.0,
        ));
        TestServer::new(routes(service)).unwrap()
    }

    fn photo_part() -> Part {
        Part::bytes(fake_jpeg(1024))
            .file_name("balde.jpg")
            .mime_type("image/jpeg")
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let server = server(None);

        let created = server
            .post("/api/reports")
            .json(&json!({
                "latitude": -27.3671,
                "longitude": -55.8961,
                "criticality": "CRITICA",
                "description": "Piscina abandonada"
            }))
            .await;
        created.assert_status(StatusCode::CREATED);
        let body: Value = created.json();
        assert_eq!(body["data"]["criticality_weight"], 1.0);
        assert_eq!(body["data"]["display_weight"], 1.0);
        assert_eq!(body["data"]["criticality"]["icon"], "🔴");

        let listed = server.get("/api/reports").await;
        listed.assert_status_ok();
        let body: Value = listed.json();
        assert_eq!(body["meta"]["total"], 1);
        assert_eq!(body["data"][0]["initial_criticality"], "CRITICA");
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_label() {
        let server = server(None);

        let response = server
            .post("/api/reports")
            .json(&json!({
                "latitude": -27.3671,
                "longitude": -55.8961,
                "criticality": "MUY ALTA"
            }))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_create_rejects_malformed_json() {
        let server = server(None);

        let response = server
            .post("/api/reports")
            .json(&json!({"latitude": "north"}))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_submit_multipart_report() {
        let server = server(None);

        let form = MultipartForm::new()
            .add_part("photo", photo_part())
            .add_text("latitude", "-27.3671")
            .add_text("longitude", "-55.8961")
            .add_text("criticality", "alta")
            .add_text("street_address", "Av. Mitre 1500")
            .add_text("zone", "Centro")
            .add_text("refine_location", "false");

        let response = server.post("/api/reports/submit").multipart(form).await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["data"]["initial_criticality"], "ALTA");
        assert_eq!(body["data"]["description"], "Av. Mitre 1500 - Centro");
        assert!(body["data"]["photo_url"]
            .as_str()
            .unwrap()
            .ends_with("-balde.jpg"));
    }

    #[tokio::test]
    async fn test_submit_without_photo_is_rejected() {
        let server = server(None);

        let form = MultipartForm::new()
            .add_text("latitude", "-27.3671")
            .add_text("longitude", "-55.8961")
            .add_text("criticality", "BAJA");

        let response = server.post("/api/reports/submit").multipart(form).await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_submit_without_street_address_is_rejected() {
        let server = server(None);

        let form = MultipartForm::new()
            .add_part("photo", photo_part())
            .add_text("latitude", "-27.3671")
            .add_text("longitude", "-55.8961")
            .add_text("criticality", "MEDIA")
            .add_text("street_address", "  ")
            .add_text("zone", "Centro");

        let response = server.post("/api/reports/submit").multipart(form).await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["success"], false);

        let listed: Value = server.get("/api/reports").await.json();
        assert_eq!(listed["meta"]["total"], 0);
    }

    #[tokio::test]
    async fn test_classify_without_vision_is_unavailable() {
        let server = server(None);

        let form = MultipartForm::new().add_part("photo", photo_part());
        let response = server.post("/api/reports/classify").multipart(form).await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_classify_upstream_failure_is_bad_gateway() {
        let server = server(Some(StubVision::failing()));

        let form = MultipartForm::new().add_part("photo", photo_part());
        let response = server.post("/api/reports/classify").multipart(form).await;

        response.assert_status(StatusCode::BAD_GATEWAY);
    }
}
