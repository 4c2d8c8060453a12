use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use tokio::time::{interval, MissedTickBehavior};

use crate::features::heatmap::services::HeatmapService;
use crate::features::reports::models::Report;

#[derive(Debug, PartialEq, Eq)]
enum InsertSignal {
    /// Number of inserts folded into one recompute
    Batch(u64),
    Closed,
}

/// Wait for the next insert, then drain whatever queued up behind it.
///
/// Never resolves once the subscription is gone, leaving the timer in charge.
async fn next_insert_signal(receiver: &mut Option<broadcast::Receiver<Report>>) -> InsertSignal {
    let Some(rx) = receiver.as_mut() else {
        return std::future::pending().await;
    };

    let mut count = match rx.recv().await {
        Ok(_) => 1,
        Err(RecvError::Lagged(missed)) => missed,
        Err(RecvError::Closed) => return InsertSignal::Closed,
    };

    loop {
        match rx.try_recv() {
            Ok(_) => count += 1,
            Err(TryRecvError::Lagged(missed)) => count += missed,
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }

    InsertSignal::Batch(count)
}

/// Keeps the published heatmap current.
///
/// Recomputes on every report insert and on a fixed period, so weights keep
/// escalating even when nothing new arrives.
pub struct HeatmapRefresher {
    service: Arc<HeatmapService>,
    period: Duration,
}

impl HeatmapRefresher {
    pub fn new(service: Arc<HeatmapService>, period: Duration) -> Self {
        Self { service, period }
    }

    /// Run the refresher in a background loop. The first tick fires immediately.
    pub async fn run(&self) {
        tracing::info!(
            "Starting heatmap refresher worker (period: {:?})",
            self.period
        );

        let mut inserts = Some(self.service.report_inserts());
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.refresh("timer").await;
                }
                signal = next_insert_signal(&mut inserts) => match signal {
                    InsertSignal::Batch(count) => {
                        tracing::debug!("{} report insert(s) pending", count);
                        self.refresh("insert").await;
                    }
                    InsertSignal::Closed => {
                        tracing::warn!("Report insert stream closed, refreshing on timer only");
                        inserts = None;
                    }
                },
            }
        }
    }

    async fn refresh(&self, trigger: &str) {
        if let Err(e) = self.service.recompute().await {
            tracing::error!("Heatmap refresh ({}) failed: {:?}", trigger, e);
        }
    }
}
