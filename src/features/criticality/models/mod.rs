mod criticality;

pub use criticality::{weight_of, weight_of_or_lowest, Criticality, CriticalityError};
