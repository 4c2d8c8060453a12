use axum::{routing::get, Router};

use crate::features::criticality::handlers;

/// Create public routes for the severity vocabulary
pub fn routes() -> Router {
    Router::new().route("/api/criticality-levels", get(handlers::list_levels))
}
