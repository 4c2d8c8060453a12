//! Breeding-site reports: strict creation, photo intake and listing.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod stores;

pub use routes::routes;
pub use services::ReportService;
