use uuid::Uuid;

use super::value_objects::TransportOrderState;
use crate::domain::location::{TargetId, TargetKind};
use crate::gateway::GatewayError;
use crate::store::StoreError;

// ============================================================================
// Transport Order Business Rule Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportOrderError {
    #[error("Transport order {id} is {state} and cannot be redirected")]
    NotRedirectable { id: Uuid, state: TransportOrderState },
}

// ============================================================================
// Redirect Errors - everything a redirect request can fail with
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RedirectError {
    #[error("Target must not be blank")]
    InvalidTarget,

    #[error("Target {0} is neither a known location nor a known location group")]
    UnknownTarget(TargetId),

    #[error("Target {target} ({kind}) does not accept incoming transport orders")]
    BlockedTarget { target: TargetId, kind: TargetKind },

    #[error("Transport order {0} not found")]
    OrderNotFound(Uuid),

    #[error("Transport order {id} is {state} and cannot be redirected")]
    OrderNotRedirectable { id: Uuid, state: TransportOrderState },

    #[error("Transport order {id} was modified concurrently, gave up after {attempts} attempts")]
    ConcurrencyConflict { id: Uuid, attempts: u32 },

    #[error("Location directory unavailable: {0}")]
    GatewayUnavailable(#[from] GatewayError),

    #[error("Transport order storage failed: {0}")]
    Store(#[from] StoreError),
}

impl From<TransportOrderError> for RedirectError {
    fn from(err: TransportOrderError) -> Self {
        match err {
            TransportOrderError::NotRedirectable { id, state } => RedirectError::OrderNotRedirectable { id, state },
        }
    }
}

impl RedirectError {
    /// Stable machine-readable code, used in API bodies and metric labels
    pub fn code(&self) -> &'static str {
        match self {
            RedirectError::InvalidTarget => "INVALID_TARGET",
            RedirectError::UnknownTarget(_) => "UNKNOWN_TARGET",
            RedirectError::BlockedTarget { .. } => "BLOCKED_TARGET",
            RedirectError::OrderNotFound(_) => "ORDER_NOT_FOUND",
            RedirectError::OrderNotRedirectable { .. } => "ORDER_NOT_REDIRECTABLE",
            RedirectError::ConcurrencyConflict { .. } => "CONCURRENCY_CONFLICT",
            RedirectError::GatewayUnavailable(_) => "GATEWAY_UNAVAILABLE",
            RedirectError::Store(_) => "STORE_FAILURE",
        }
    }

    /// Whether sending the same request again later may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RedirectError::BlockedTarget { .. }
                | RedirectError::ConcurrencyConflict { .. }
                | RedirectError::GatewayUnavailable(_)
        )
    }
}
