mod criticality_handler;

pub use criticality_handler::*;
