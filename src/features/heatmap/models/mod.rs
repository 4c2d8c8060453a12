mod decay;
mod error;
mod heat_field;
mod snapshot;
mod summary;

pub use decay::{days_elapsed, DecayConfig};
pub use error::{HeatmapError, MalformedReason, MalformedReport};
pub use heat_field::{GradientStop, HeatField, HeatLayerOptions, HeatPoint};
pub use snapshot::HeatmapSnapshot;
pub use summary::CriticalitySummary;
