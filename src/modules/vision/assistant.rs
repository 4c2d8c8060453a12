use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::features::criticality::Criticality;
use crate::shared::types::Coordinates;

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("Vision request failed: {0}")]
    Request(String),

    #[error("Vision service returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Vision reply had no text content")]
    EmptyReply,

    #[error("Vision reply could not be parsed: {0}")]
    Unparseable(String),

    #[error("Prompt rendering failed: {0}")]
    Prompt(String),
}

/// Photo bytes sent to the model
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub data: Vec<u8>,
    pub mime_type: String,
}

/// Model-suggested coordinates for the photographed site
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefinedLocation {
    pub coordinates: Coordinates,
    /// In [0, 1]
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SiteClassification {
    /// Container kind, e.g. "neumático" or "balde"
    pub site_type: Option<String>,
    /// `None` when the model answered with an unknown label
    pub criticality: Option<Criticality>,
    pub description: Option<String>,
    pub recommendations: Option<String>,
}

#[async_trait]
pub trait VisionAssistant: Send + Sync {
    async fn refine_location(
        &self,
        image: &ImageInput,
        marked: Coordinates,
    ) -> Result<RefinedLocation, VisionError>;

    async fn classify_site(&self, image: &ImageInput) -> Result<SiteClassification, VisionError>;
}
