use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};

use super::compute_heat_points;
use crate::core::error::Result;
use crate::features::heatmap::models::{
    CriticalitySummary, DecayConfig, HeatLayerOptions, HeatmapSnapshot,
};
use crate::features::reports::models::Report;
use crate::features::reports::stores::ReportStore;

pub type SnapshotReceiver = watch::Receiver<Option<Arc<HeatmapSnapshot>>>;

/// Owns the most recent heat field snapshot
pub struct HeatmapService {
    store: Arc<dyn ReportStore>,
    decay: DecayConfig,
    layer: HeatLayerOptions,
    latest: watch::Sender<Option<Arc<HeatmapSnapshot>>>,
}

impl HeatmapService {
    pub fn new(store: Arc<dyn ReportStore>, decay: DecayConfig, layer: HeatLayerOptions) -> Self {
        let (latest, _) = watch::channel(None);
        Self {
            store,
            decay,
            layer,
            latest,
        }
    }

    /// Rebuild the snapshot against an explicit `now` and publish it
    pub async fn recompute_at(&self, now: DateTime<Utc>) -> Result<Arc<HeatmapSnapshot>> {
        let reports = self.store.list().await?;
        let field = compute_heat_points(&reports, now, &self.decay);
        let summary = CriticalitySummary::from_reports(&reports);

        tracing::info!(
            "Heatmap recomputed: {} points, {} skipped, {} reports",
            field.points.len(),
            field.skipped.len(),
            summary.total
        );

        let snapshot = Arc::new(HeatmapSnapshot {
            field,
            summary,
            layer: self.layer.clone(),
            decay: self.decay,
            generated_at: now,
        });

        // Last write wins
        self.latest.send_replace(Some(snapshot.clone()));

        Ok(snapshot)
    }

    pub async fn recompute(&self) -> Result<Arc<HeatmapSnapshot>> {
        self.recompute_at(Utc::now()).await
    }

    /// Latest snapshot, computing one only if none has been published yet
    pub async fn current(&self) -> Result<Arc<HeatmapSnapshot>> {
        let published = self.latest.borrow().clone();
        match published {
            Some(snapshot) => Ok(snapshot),
            None => self.recompute().await,
        }
    }

    /// Receiver that sees every published snapshot
    pub fn subscribe(&self) -> SnapshotReceiver {
        self.latest.subscribe()
    }

    /// Insert notifications from the underlying report store
    pub fn report_inserts(&self) -> broadcast::Receiver<Report> {
        self.store.subscribe()
    }
}
