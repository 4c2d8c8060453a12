use schemars::JsonSchema;
use serde::Deserialize;

use super::{RefinedLocation, SiteClassification, VisionError};
use crate::features::criticality::Criticality;
use crate::shared::constants::DEFAULT_REFINEMENT_CONFIDENCE;
use crate::shared::llm::LlmResponse;
use crate::shared::types::Coordinates;

fn default_true() -> bool {
    true
}

/// Reply shape for the location refinement prompt
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct RefinementResponse {
    /// Adjusted latitude, up to 6 decimals
    pub latitude: Option<f64>,
    /// Adjusted longitude, up to 6 decimals
    pub longitude: Option<f64>,
    /// Confidence between 0 and 1
    pub confidence: Option<f64>,

    #[serde(default = "default_true")]
    #[schemars(skip)]
    pub ok: bool,

    #[serde(default)]
    #[schemars(skip)]
    pub error: Option<String>,
}

impl LlmResponse for RefinementResponse {
    fn mark_as_fallback(&mut self, error_message: String) {
        self.ok = false;
        self.error = Some(error_message);
    }

    fn is_success(&self) -> bool {
        self.ok
    }
}

impl RefinementResponse {
    pub fn into_refined(self) -> Result<RefinedLocation, VisionError> {
        if !self.is_success() {
            return Err(VisionError::Unparseable(self.error.unwrap_or_default()));
        }

        let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) else {
            return Err(VisionError::Unparseable(
                "Reply is missing latitude or longitude".to_string(),
            ));
        };

        let coordinates = Coordinates::new(latitude, longitude);
        coordinates.validate().map_err(VisionError::Unparseable)?;

        let confidence = self
            .confidence
            .filter(|c| c.is_finite())
            .unwrap_or(DEFAULT_REFINEMENT_CONFIDENCE)
            .clamp(0.0, 1.0);

        Ok(RefinedLocation {
            coordinates,
            confidence,
        })
    }
}

/// Reply shape for the site classification prompt
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ClassificationResponse {
    /// Container type (balde, neumático, maceta, ...)
    #[serde(rename = "type")]
    pub site_type: Option<String>,
    /// One of BAJA, MEDIA, ALTA, CRITICA
    pub criticality: Option<String>,
    /// What the photo shows
    pub description: Option<String>,
    /// How to eliminate the breeding site
    pub recommendations: Option<String>,

    #[serde(default = "default_true")]
    #[schemars(skip)]
    pub ok: bool,

    #[serde(default)]
    #[schemars(skip)]
    pub error: Option<String>,
}

impl LlmResponse for ClassificationResponse {
    fn mark_as_fallback(&mut self, error_message: String) {
        self.ok = false;
        self.error = Some(error_message);
    }

    fn is_success(&self) -> bool {
        self.ok
    }
}

impl ClassificationResponse {
    pub fn into_classification(self) -> Result<SiteClassification, VisionError> {
        if !self.is_success() {
            return Err(VisionError::Unparseable(self.error.unwrap_or_default()));
        }

        let criticality = self.criticality.as_deref().and_then(|label| {
            label
                .parse::<Criticality>()
                .map_err(|e| tracing::warn!("Ignoring model criticality: {}", e))
                .ok()
        });

        Ok(SiteClassification {
            site_type: self.site_type.filter(|s| !s.trim().is_empty()),
            criticality,
            description: self.description,
            recommendations: self.recommendations,
        })
    }
}
