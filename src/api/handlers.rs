use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use super::{ApiError, AppState};
use crate::domain::transport_order::RedirectError;

#[derive(Debug, Deserialize)]
pub struct RedirectRequest {
    /// Order id; only read by the collection-level PATCH
    #[serde(rename = "pKey", default)]
    pub p_key: Option<String>,
    pub target: String,
}

fn parse_order_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::InvalidOrderId(raw.to_string()))
}

async fn redirect(state: &AppState, order_id: Uuid, target: &str) -> Result<HttpResponse, ApiError> {
    state.handler.redirect(order_id, target).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn redirect_transport_order(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<RedirectRequest>,
) -> Result<HttpResponse, ApiError> {
    let order_id = parse_order_id(&path.into_inner())?;
    redirect(&state, order_id, &body.target).await
}

pub async fn redirect_by_body(
    state: web::Data<AppState>,
    body: web::Json<RedirectRequest>,
) -> Result<HttpResponse, ApiError> {
    let raw_id = body
        .p_key
        .as_deref()
        .ok_or_else(|| ApiError::InvalidOrderId("missing pKey".to_string()))?;
    let order_id = parse_order_id(raw_id)?;
    redirect(&state, order_id, &body.target).await
}

pub async fn get_transport_order(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let order_id = parse_order_id(&path.into_inner())?;

    let order = state
        .repository
        .find(order_id)
        .await
        .map_err(RedirectError::from)?
        .ok_or(RedirectError::OrderNotFound(order_id))?;

    Ok(HttpResponse::Ok().json(order))
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "tms-redirect"
    }))
}

pub async fn metrics(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let buffer = state
        .metrics
        .encode()
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(buffer))
}
