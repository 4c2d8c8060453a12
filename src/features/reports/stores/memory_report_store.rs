use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use super::{ReportStore, INSERT_CHANNEL_CAPACITY};
use crate::core::error::Result;
use crate::features::reports::models::{CreateReport, Report};

/// Process-local report store for running without Postgres
pub struct InMemoryReportStore {
    reports: RwLock<Vec<Report>>,
    inserted: broadcast::Sender<Report>,
}

impl InMemoryReportStore {
    pub fn new() -> Self {
        Self::with_reports(Vec::new())
    }

    /// Start from existing rows without announcing them
    pub fn with_reports(reports: Vec<Report>) -> Self {
        let (inserted, _) = broadcast::channel(INSERT_CHANNEL_CAPACITY);
        Self {
            reports: RwLock::new(reports),
            inserted,
        }
    }
}

impl Default for InMemoryReportStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReportStore for InMemoryReportStore {
    async fn save(&self, report: CreateReport) -> Result<Report> {
        let report = report.into_report(Uuid::now_v7(), Utc::now());
        self.reports.write().await.push(report.clone());

        // No subscribers is fine
        let _ = self.inserted.send(report.clone());

        Ok(report)
    }

    async fn list(&self) -> Result<Vec<Report>> {
        let mut reports = self.reports.read().await.clone();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reports)
    }

    async fn list_page(&self, offset: i64, limit: i64) -> Result<(Vec<Report>, i64)> {
        let reports = self.list().await?;
        let total = reports.len() as i64;
        let page = reports
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    fn subscribe(&self) -> broadcast::Receiver<Report> {
        self.inserted.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::report_at;
    use crate::shared::types::Coordinates;
    use chrono::Duration;

    fn create(label: &str) -> CreateReport {
        CreateReport::from_label(
            Coordinates::new(-27.3671, -55.8961),
            label,
            "Balde con agua".to_string(),
            None,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_save_assigns_identity_and_announces() {
        let store = InMemoryReportStore::new();
        let mut inserted = store.subscribe();

        let saved = store.save(create("MEDIA")).await.unwrap();

        assert_eq!(saved.criticality_weight, Some(0.6));
        assert_eq!(inserted.recv().await.unwrap(), saved);
    }

    #[tokio::test]
    async fn test_list_is_most_recent_first() {
        let now = Utc::now();
        let old = report_at("BAJA", Some(0.3), now - Duration::days(5));
        let older = report_at("ALTA", Some(0.9), now - Duration::days(9));
        let store = InMemoryReportStore::with_reports(vec![older.clone(), old.clone()]);

        let fresh = store.save(create("CRITICA")).await.unwrap();
        let listed = store.list().await.unwrap();

        let ids: Vec<_> = listed.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![fresh.id, old.id, older.id]);
    }

    #[tokio::test]
    async fn test_list_page_slices_and_counts() {
        let now = Utc::now();
        let reports: Vec<Report> = (0..5)
            .map(|days| report_at("MEDIA", Some(0.6), now - Duration::days(days)))
            .collect();
        let store = InMemoryReportStore::with_reports(reports.clone());

        let (page, total) = store.list_page(2, 2).await.unwrap();

        assert_eq!(total, 5);
        let ids: Vec<_> = page.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![reports[2].id, reports[3].id]);

        let (past_end, total) = store.list_page(10, 2).await.unwrap();
        assert!(past_end.is_empty());
        assert_eq!(total, 5);
    }
}
