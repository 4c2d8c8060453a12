use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::heatmap::handlers::{self, HeatmapState};
use crate::features::heatmap::services::HeatmapService;

/// Create public routes for the heatmap
pub fn routes(heatmap_service: Arc<HeatmapService>) -> Router {
    let state = HeatmapState { heatmap_service };

    Router::new()
        .route("/api/heatmap", get(handlers::get_heatmap))
        .route("/api/heatmap/refresh", post(handlers::refresh_heatmap))
        .route("/api/heatmap/summary", get(handlers::get_summary))
        .route("/api/heatmap/stream", get(handlers::stream_heatmap))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::heatmap::models::{DecayConfig, HeatLayerOptions};
    use crate::features::reports::models::Report;
    use crate::features::reports::stores::InMemoryReportStore;
    use crate::shared::test_helpers::report_at;
    use axum::extract::State;
    use axum::http::header::CONTENT_TYPE;
    use axum_test::TestServer;
    use chrono::{Duration, Utc};
    use serde_json::{json, Value};
    use tokio_stream::StreamExt;

    fn server(reports: Vec<Report>) -> TestServer {
        let service = Arc::new(HeatmapService::new(
            Arc::new(InMemoryReportStore::with_reports(reports)),
            DecayConfig::default(),
            HeatLayerOptions::default(),
        ));
        TestServer::new(routes(service)).unwrap()
    }

    #[tokio::test]
    async fn test_get_heatmap_returns_points_and_layer() {
        let old = report_at("BAJA", Some(0.3), Utc::now() - Duration::days(20));
        let server = server(vec![old.clone(), report_at("MEDIA", None, Utc::now())]);

        let response = server.get("/api/heatmap").await;
        response.assert_status_ok();

        let body: Value = response.json();
        let data = &body["data"];
        assert_eq!(data["points"].as_array().unwrap().len(), 1);
        assert_eq!(data["points"][0][0], old.latitude);
        assert_eq!(data["points"][0][2], 1.0);
        assert_eq!(data["layer"]["radius"], 25);
        assert_eq!(data["layer"]["gradient"]["0.6"], "#ff8000");
        assert_eq!(data["skipped"].as_array().unwrap().len(), 1);
        assert_eq!(data["decay"]["daily_increment"], 0.05);
    }

    #[tokio::test]
    async fn test_summary_counts_labels() {
        let now = Utc::now();
        let server = server(vec![
            report_at("CRITICA", Some(1.0), now),
            report_at("ALTA", Some(0.9), now),
            report_at("BAJA", Some(0.3), now),
        ]);

        let response = server.get("/api/heatmap/summary").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["data"]["total"], 3);
        assert_eq!(body["data"]["critical"], 1);
        assert_eq!(body["data"]["high"], 1);
        assert_eq!(body["data"]["controllable"], 1);
    }

    #[tokio::test]
    async fn test_refresh_recomputes() {
        let server = server(Vec::new());

        let response = server.post("/api/heatmap/refresh").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["message"], "Heatmap recomputed");
        assert!(body["data"]["points"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stream_pushes_published_snapshot() {
        let report = report_at("ALTA", Some(0.9), Utc::now() - Duration::days(2));
        let service = Arc::new(HeatmapService::new(
            Arc::new(InMemoryReportStore::with_reports(vec![report])),
            DecayConfig::default(),
            HeatLayerOptions::default(),
        ));

        let response = handlers::stream_heatmap(State(HeatmapState {
            heatmap_service: service.clone(),
        }))
        .await;
        assert_eq!(response.headers()[CONTENT_TYPE], "text/event-stream");
        let mut body = response.into_body().into_data_stream();

        let snapshot = service.recompute_at(Utc::now()).await.unwrap();

        let chunk = tokio::time::timeout(std::time::Duration::from_secs(5), body.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        let frame = String::from_utf8(chunk.to_vec()).unwrap();
        assert!(frame.lines().any(|line| line == "event: heatmap"));

        let data = frame
            .lines()
            .find_map(|line| line.strip_prefix("data: "))
            .unwrap();
        let payload: Value = serde_json::from_str(data).unwrap();
        let expected: Vec<[f64; 3]> = snapshot
            .field
            .points
            .iter()
            .map(|p| p.as_triple())
            .collect();
        assert_eq!(expected.len(), 1);
        assert_eq!(payload["points"], json!(expected));
    }
}
