mod heatmap_refresher;

pub use heatmap_refresher::HeatmapRefresher;
