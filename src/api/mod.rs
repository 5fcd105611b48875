// ============================================================================
// HTTP API
// ============================================================================
//
//   PATCH /v1/transport-orders/{id}   {"target": "..."}        → 204 / 4xx / 503
//   PATCH /v1/transport-orders        {"pKey": "...", "target": "..."}
//   GET   /v1/transport-orders/{id}                            → 200 / 404
//   GET   /health
//   GET   /metrics
//
// ============================================================================

mod errors;
mod handlers;

use std::sync::Arc;

use actix_web::web;

use crate::domain::transport_order::TransportOrderCommandHandler;
use crate::metrics::Metrics;
use crate::store::TransportOrderRepository;

pub use errors::{redirect_status, ApiError, ErrorBody};
pub use handlers::RedirectRequest;

pub struct AppState {
    pub handler: TransportOrderCommandHandler,
    pub repository: Arc<dyn TransportOrderRepository>,
    pub metrics: Arc<Metrics>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    let json = web::JsonConfig::default().error_handler(|err, _req| ApiError::InvalidBody(err.to_string()).into());

    cfg.app_data(json)
        .route("/v1/transport-orders", web::patch().to(handlers::redirect_by_body))
        .route("/v1/transport-orders/{id}", web::patch().to(handlers::redirect_transport_order))
        .route("/v1/transport-orders/{id}", web::get().to(handlers::get_transport_order))
        .route("/health", web::get().to(handlers::health))
        .route("/metrics", web::get().to(handlers::metrics));
}
