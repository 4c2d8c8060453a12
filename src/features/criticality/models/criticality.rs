use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Errors raised by the criticality weight table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CriticalityError {
    #[error("Invalid severity label: '{0}' (expected one of BAJA, MEDIA, ALTA, CRITICA)")]
    InvalidSeverityLabel(String),
}

/// Severity tier assigned to a breeding-site report.
///
/// Variants are declared in ascending weight order, so the derived `Ord`
/// matches the weight table.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    JsonSchema,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Criticality {
    Baja,
    Media,
    Alta,
    Critica,
}

impl Criticality {
    /// The closed label set, ascending by weight
    pub const ALL: [Criticality; 4] = [
        Criticality::Baja,
        Criticality::Media,
        Criticality::Alta,
        Criticality::Critica,
    ];

    /// Lowest weight, used as the lenient fallback
    pub const LOWEST: Criticality = Criticality::Baja;

    /// Base weight frozen onto a report at creation
    pub fn weight(self) -> f64 {
        match self {
            Criticality::Baja => 0.3,
            Criticality::Media => 0.6,
            Criticality::Alta => 0.9,
            Criticality::Critica => 1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Criticality::Baja => "BAJA",
            Criticality::Media => "MEDIA",
            Criticality::Alta => "ALTA",
            Criticality::Critica => "CRITICA",
        }
    }

    /// Legend text shown next to the color swatch
    pub fn display_name(self) -> &'static str {
        match self {
            Criticality::Baja => "Baja criticidad",
            Criticality::Media => "Media criticidad",
            Criticality::Alta => "Alta criticidad",
            Criticality::Critica => "Crítica",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Criticality::Baja => "green",
            Criticality::Media => "yellow",
            Criticality::Alta => "orange",
            Criticality::Critica => "red",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Criticality::Baja => "🟢",
            Criticality::Media => "🟡",
            Criticality::Alta => "🟠",
            Criticality::Critica => "🔴",
        }
    }

    /// Heat gradient color at this label's weight threshold
    pub fn heat_color(self) -> &'static str {
        match self {
            Criticality::Baja => "#ffff00",
            Criticality::Media => "#ff8000",
            Criticality::Alta => "#ff0000",
            Criticality::Critica => "#800080",
        }
    }

    /// Parse a label, falling back to the lowest tier for unknown input.
    ///
    /// Only for display contexts; report creation goes through `FromStr`.
    pub fn from_label_lenient(label: &str) -> Criticality {
        label.parse().unwrap_or_else(|_| {
            tracing::warn!(
                "Unknown severity label '{}', displaying as {}",
                label,
                Criticality::LOWEST
            );
            Criticality::LOWEST
        })
    }
}

impl FromStr for Criticality {
    type Err = CriticalityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Criticality::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CriticalityError::InvalidSeverityLabel(s.to_string()))
    }
}

impl std::fmt::Display for Criticality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Strict weight lookup for a raw label
pub fn weight_of(label: &str) -> Result<f64, CriticalityError> {
    label.parse::<Criticality>().map(Criticality::weight)
}

/// Lenient weight lookup: unknown labels weigh as the lowest tier
pub fn weight_of_or_lowest(label: &str) -> f64 {
    Criticality::from_label_lenient(label).weight()
}
