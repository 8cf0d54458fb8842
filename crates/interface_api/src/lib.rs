//! HTTP API Layer
//!
//! This crate provides the REST API for commercial insurance quotes using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for quotes and health
//! - **Middleware**: Request ids, tracing, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent JSON error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(AppState::new(service, health, config));
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use core_kernel::HealthCheckable;
use domain_quote::QuoteService;

use crate::config::ApiConfig;
use crate::handlers::{health, quote};
use crate::middleware::audit_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub quotes: Arc<QuoteService>,
    /// Store probed by the readiness check
    pub health: Arc<dyn HealthCheckable>,
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(quotes: QuoteService, health: Arc<dyn HealthCheckable>, config: ApiConfig) -> Self {
        Self {
            quotes: Arc::new(quotes),
            health,
            config,
        }
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Quote service, health probe and configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Quote routes; static segments take priority over `/:id`
    let quote_routes = Router::new()
        .route("/", post(quote::create_quote).get(quote::list_quotes))
        .route("/statistics", get(quote::get_statistics))
        .route("/expired", get(quote::list_expired))
        .route("/search", get(quote::search_quotes))
        .route("/date-range", get(quote::list_by_date_range))
        .route("/premium-above", get(quote::list_premium_above))
        .route("/stale", get(quote::list_stale_drafts))
        .route("/number/:quote_number", get(quote::get_quote_by_number))
        .route("/check-number/:quote_number", get(quote::check_quote_number))
        .route("/status/:status", get(quote::list_by_status))
        .route("/state/:state", get(quote::list_by_state))
        .route("/business-type/:business_type", get(quote::list_by_business_type))
        .route("/industry/:industry", get(quote::list_by_industry))
        .route(
            "/:id",
            get(quote::get_quote)
                .put(quote::update_quote)
                .delete(quote::delete_quote),
        )
        .route("/:id/premium", get(quote::calculate_premium))
        .route("/:id/submit", post(quote::submit_quote))
        .route("/:id/approve", post(quote::approve_quote))
        .route("/:id/reject", post(quote::reject_quote))
        .layer(axum_middleware::from_fn(audit_middleware));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/quotes", quote_routes)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}
