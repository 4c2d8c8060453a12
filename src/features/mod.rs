pub mod criticality;
pub mod heatmap;
pub mod reports;
