use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::criticality::models::Criticality;

/// One entry of the severity vocabulary shown in report forms and the map legend
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CriticalityLevelDto {
    pub label: Criticality,
    pub weight: f64,
    pub display_name: String,
    pub color: String,
    pub icon: String,
    pub heat_color: String,
}

impl From<Criticality> for CriticalityLevelDto {
    fn from(c: Criticality) -> Self {
        Self {
            label: c,
            weight: c.weight(),
            display_name: c.display_name().to_string(),
            color: c.color().to_string(),
            icon: c.icon().to_string(),
            heat_color: c.heat_color().to_string(),
        }
    }
}
