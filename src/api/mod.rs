//! HTTP API server

use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::storage::EmployeeStore;

pub mod handlers;
pub mod state;

pub use state::AppState;

/// Build the API router using the provided application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/employee",
            get(handlers::list_employees).post(handlers::create_employee),
        )
        .route(
            "/employee/:id",
            put(handlers::update_employee).delete(handlers::delete_employee),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Convenience helper wrapping a store directly
pub fn create_store_router(store: Arc<dyn EmployeeStore>) -> Router {
    create_router(AppState::new(store))
}
