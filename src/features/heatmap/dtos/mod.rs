mod heatmap_dto;

pub use heatmap_dto::*;
