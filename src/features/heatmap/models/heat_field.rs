use serde::Serialize;

use super::MalformedReport;
use crate::features::criticality::Criticality;

/// Color at the bottom of the gradient, below the lowest label weight
const BASE_GRADIENT_COLOR: &str = "#00ff00";

/// Weighted point handed to the heat layer. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub weight: f64,
}

impl HeatPoint {
    /// `[lat, lng, weight]` as the map layer expects
    pub fn as_triple(&self) -> [f64; 3] {
        [self.latitude, self.longitude, self.weight]
    }
}

/// Result of one aggregation pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeatField {
    pub points: Vec<HeatPoint>,
    pub skipped: Vec<MalformedReport>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradientStop {
    pub threshold: f64,
    pub color: String,
}

/// Rendering options for the heat layer
#[derive(Debug, Clone, PartialEq)]
pub struct HeatLayerOptions {
    pub radius: u32,
    pub blur: u32,
    pub max_zoom: u32,
    pub gradient: Vec<GradientStop>,
}

impl Default for HeatLayerOptions {
    fn default() -> Self {
        Self {
            radius: 25,
            blur: 15,
            max_zoom: 17,
            gradient: Self::criticality_gradient(),
        }
    }
}

impl HeatLayerOptions {
    /// One stop per label at its base weight, so thresholds track the weight table
    pub fn criticality_gradient() -> Vec<GradientStop> {
        std::iter::once(GradientStop {
            threshold: 0.0,
            color: BASE_GRADIENT_COLOR.to_string(),
        })
        .chain(Criticality::ALL.iter().map(|c| GradientStop {
            threshold: c.weight(),
            color: c.heat_color().to_string(),
        }))
        .collect()
    }
}
