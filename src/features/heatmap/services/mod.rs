pub mod aggregator;
pub mod heatmap_service;

pub use aggregator::compute_heat_points;
pub use heatmap_service::HeatmapService;
