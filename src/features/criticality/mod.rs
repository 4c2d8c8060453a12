pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;

pub use models::{weight_of, weight_of_or_lowest, Criticality, CriticalityError};
pub use routes::routes;
