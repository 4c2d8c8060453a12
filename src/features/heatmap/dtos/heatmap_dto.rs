use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::features::heatmap::models::{
    CriticalitySummary, DecayConfig, GradientStop, HeatLayerOptions, HeatmapSnapshot,
};

/// Keyed by the shortest exact threshold text (0.0, 0.3, 0.25, 1.0), so
/// distinct thresholds never share a key
fn gradient_entry(stop: &GradientStop) -> (String, String) {
    (format!("{:?}", stop.threshold), stop.color.clone())
}

/// Heat layer rendering options
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HeatLayerOptionsDto {
    pub radius: u32,
    pub blur: u32,
    pub max_zoom: u32,
    /// Threshold ("0.0", "0.3", ...) to hex color
    pub gradient: BTreeMap<String, String>,
}

impl From<&HeatLayerOptions> for HeatLayerOptionsDto {
    fn from(options: &HeatLayerOptions) -> Self {
        Self {
            radius: options.radius,
            blur: options.blur,
            max_zoom: options.max_zoom,
            gradient: options
                .gradient
                .iter()
                .map(gradient_entry)
                .collect(),
        }
    }
}

/// Current heat field
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HeatmapResponseDto {
    /// `[latitude, longitude, weight]` per report
    #[schema(value_type = Vec<Vec<f64>>)]
    pub points: Vec<[f64; 3]>,
    pub layer: HeatLayerOptionsDto,
    pub decay: DecayConfig,
    pub summary: CriticalitySummary,
    /// Reasons reports were left out, one per skipped report
    pub skipped: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl From<&HeatmapSnapshot> for HeatmapResponseDto {
    fn from(snapshot: &HeatmapSnapshot) -> Self {
        Self {
            points: snapshot.field.points.iter().map(|p| p.as_triple()).collect(),
            layer: (&snapshot.layer).into(),
            decay: snapshot.decay,
            summary: snapshot.summary,
            skipped: snapshot.field.skipped.iter().map(|s| s.to_string()).collect(),
            generated_at: snapshot.generated_at,
        }
    }
}
