//! Vision assistant for report photos
//!
//! Refines the user-marked location of a breeding site and classifies the
//! container shown in the photo. Model replies are parsed tolerantly and
//! every failure is reported as a [`VisionError`] so callers can fall back.

mod assistant;
mod gemini_client;
mod responses;

pub use assistant::{ImageInput, RefinedLocation, SiteClassification, VisionAssistant, VisionError};
pub use gemini_client::GeminiVisionClient;
pub use responses::{ClassificationResponse, RefinementResponse};
