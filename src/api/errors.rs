use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

use crate::domain::transport_order::RedirectError;

/// Seconds a client should wait before retrying after a directory outage
const RETRY_AFTER_SECS: &str = "5";

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Redirect(#[from] RedirectError),

    #[error("Invalid transport order id: {0}")]
    InvalidOrderId(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Redirect(e) => e.code(),
            ApiError::InvalidOrderId(_) => "INVALID_ORDER_ID",
            ApiError::InvalidBody(_) => "INVALID_BODY",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// HTTP status for each redirect failure
pub fn redirect_status(err: &RedirectError) -> StatusCode {
    match err {
        RedirectError::InvalidTarget => StatusCode::BAD_REQUEST,
        RedirectError::UnknownTarget(_)
        | RedirectError::BlockedTarget { .. }
        | RedirectError::OrderNotRedirectable { .. }
        | RedirectError::ConcurrencyConflict { .. } => StatusCode::CONFLICT,
        RedirectError::OrderNotFound(_) => StatusCode::NOT_FOUND,
        RedirectError::GatewayUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        RedirectError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Redirect(e) => redirect_status(e),
            ApiError::InvalidOrderId(_) | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        if self.status_code() == StatusCode::SERVICE_UNAVAILABLE {
            response.insert_header(("Retry-After", RETRY_AFTER_SECS));
        }

        response.json(ErrorBody {
            code: self.code(),
            message: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::location::{TargetId, TargetKind};
    use crate::domain::transport_order::TransportOrderState;
    use crate::gateway::GatewayError;
    use crate::store::StoreError;
    use uuid::Uuid;

    #[test]
    fn test_status_mapping() {
        let target = || TargetId::parse("ZILE").unwrap();
        let cases = vec![
            (RedirectError::InvalidTarget, StatusCode::BAD_REQUEST),
            (RedirectError::UnknownTarget(target()), StatusCode::CONFLICT),
            (
                RedirectError::BlockedTarget { target: target(), kind: TargetKind::Location },
                StatusCode::CONFLICT,
            ),
            (
                RedirectError::OrderNotRedirectable { id: Uuid::new_v4(), state: TransportOrderState::Canceled },
                StatusCode::CONFLICT,
            ),
            (
                RedirectError::ConcurrencyConflict { id: Uuid::new_v4(), attempts: 4 },
                StatusCode::CONFLICT,
            ),
            (RedirectError::OrderNotFound(Uuid::new_v4()), StatusCode::NOT_FOUND),
            (
                RedirectError::GatewayUnavailable(GatewayError::CircuitOpen),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                RedirectError::Store(StoreError::Backend("down".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(redirect_status(&err), status, "{}", err);
        }
    }

    #[test]
    fn test_unavailable_response_has_retry_after() {
        let err = ApiError::from(RedirectError::GatewayUnavailable(GatewayError::CircuitOpen));
        let response = err.error_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers().get("Retry-After").unwrap(), RETRY_AFTER_SECS);
    }
}
