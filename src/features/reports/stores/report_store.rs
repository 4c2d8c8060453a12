use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::core::error::Result;
use crate::features::reports::models::{CreateReport, Report};

/// Buffered insert notifications per subscriber before it lags
pub const INSERT_CHANNEL_CAPACITY: usize = 256;

/// Persistence for reports. Reports are immutable once saved.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Insert a report, assigning its id and creation time
    async fn save(&self, report: CreateReport) -> Result<Report>;

    /// All reports, most recent first
    async fn list(&self) -> Result<Vec<Report>>;

    /// One page of reports, most recent first, with the total count
    async fn list_page(&self, offset: i64, limit: i64) -> Result<(Vec<Report>, i64)>;

    /// Stream of reports inserted from now on
    fn subscribe(&self) -> broadcast::Receiver<Report>;
}
