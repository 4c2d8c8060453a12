use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgListener;
use sqlx::PgPool;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::{ReportStore, INSERT_CHANNEL_CAPACITY};
use crate::core::error::{AppError, Result};
use crate::features::reports::models::{CreateReport, Report};

/// Channel the insert trigger notifies with the new row as JSON
const REPORT_INSERTED_CHANNEL: &str = "report_inserted";

const LISTENER_RETRY_DELAY: Duration = Duration::from_secs(5);

const REPORT_COLUMNS: &str = "id, created_at, description, photo_url, latitude, longitude, \
                              initial_criticality, criticality_weight";

pub struct PgReportStore {
    pool: PgPool,
    inserted: broadcast::Sender<Report>,
}

impl PgReportStore {
    pub fn new(pool: PgPool) -> Self {
        let (inserted, _) = broadcast::channel(INSERT_CHANNEL_CAPACITY);
        Self { pool, inserted }
    }

    /// Forward `report_inserted` notifications to subscribers.
    ///
    /// Runs until the process exits, reconnecting after failures. Inserts made
    /// by other writers of the same database are picked up too.
    pub async fn run_insert_listener(&self) {
        loop {
            if let Err(e) = self.listen_once().await {
                tracing::error!(
                    "Report insert listener failed, retrying in {:?}: {:?}",
                    LISTENER_RETRY_DELAY,
                    e
                );
            }
            tokio::time::sleep(LISTENER_RETRY_DELAY).await;
        }
    }

    async fn listen_once(&self) -> std::result::Result<(), sqlx::Error> {
        let mut listener = PgListener::connect_with(&self.pool).await?;
        listener.listen(REPORT_INSERTED_CHANNEL).await?;
        tracing::info!("Listening for '{}' notifications", REPORT_INSERTED_CHANNEL);

        loop {
            let notification = listener.recv().await?;
            match serde_json::from_str::<Report>(notification.payload()) {
                Ok(report) => {
                    tracing::debug!("Report inserted: {}", report.id);
                    let _ = self.inserted.send(report);
                }
                Err(e) => {
                    tracing::warn!("Ignoring unparseable insert notification: {}", e);
                }
            }
        }
    }
}

#[async_trait]
impl ReportStore for PgReportStore {
    async fn save(&self, report: CreateReport) -> Result<Report> {
        let query = format!(
            r#"
            INSERT INTO reports (id, description, photo_url, latitude, longitude,
                                 initial_criticality, criticality_weight)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            REPORT_COLUMNS
        );

        let saved = sqlx::query_as::<_, Report>(&query)
            .bind(Uuid::now_v7())
            .bind(&report.description)
            .bind(&report.photo_url)
            .bind(report.coordinates.latitude)
            .bind(report.coordinates.longitude)
            .bind(report.criticality.label())
            .bind(report.criticality_weight)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create report: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!(
            "Created report: {} ({} at {:.5}, {:.5})",
            saved.id,
            saved.initial_criticality,
            saved.latitude,
            saved.longitude
        );

        Ok(saved)
    }

    async fn list(&self) -> Result<Vec<Report>> {
        let query = format!(
            "SELECT {} FROM reports ORDER BY created_at DESC",
            REPORT_COLUMNS
        );

        sqlx::query_as::<_, Report>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list reports: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn list_page(&self, offset: i64, limit: i64) -> Result<(Vec<Report>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reports")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count reports: {:?}", e);
                AppError::Database(e)
            })?;

        let query = format!(
            "SELECT {} FROM reports ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            REPORT_COLUMNS
        );

        let reports = sqlx::query_as::<_, Report>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list reports: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((reports, total))
    }

    fn subscribe(&self) -> broadcast::Receiver<Report> {
        self.inserted.subscribe()
    }
}
