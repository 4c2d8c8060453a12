//! Prompt templates for the vision assistant.
//!
//! Templates use Jinja2 syntax and are rendered through [`render_template`].

pub mod engine;

pub use engine::{render_template, TemplateError};

use minijinja::context;

use crate::features::criticality::Criticality;
use crate::shared::types::Coordinates;

/// Prompt asking the model to pinpoint the breeding site near a user-marked point
pub fn render_refine_location_prompt(
    location: Coordinates,
    json_schema: &str,
) -> Result<String, TemplateError> {
    render_template(
        "vision/refine_location.jinja",
        context! {
            latitude => format!("{:.6}", location.latitude),
            longitude => format!("{:.6}", location.longitude),
            json_schema => json_schema,
        },
    )
}

/// Prompt asking the model to classify the container and its severity
pub fn render_classify_site_prompt(json_schema: &str) -> Result<String, TemplateError> {
    let levels = Criticality::ALL
        .iter()
        .map(|c| c.label())
        .collect::<Vec<_>>()
        .join(", ");

    render_template(
        "vision/classify_site.jinja",
        context! {
            criticality_levels => levels,
            json_schema => json_schema,
        },
    )
}
