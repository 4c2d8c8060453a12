use chrono::{DateTime, Utc};

use super::{CriticalitySummary, DecayConfig, HeatField, HeatLayerOptions};

/// One published heat field together with what produced it
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapSnapshot {
    pub field: HeatField,
    pub summary: CriticalitySummary,
    pub layer: HeatLayerOptions,
    pub decay: DecayConfig,
    /// The `now` the weights were computed against
    pub generated_at: DateTime<Utc>,
}
