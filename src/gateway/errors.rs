use crate::utils::IsTransient;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GatewayError {
    #[error("Directory call {operation} timed out after {timeout_ms} ms")]
    Timeout { operation: &'static str, timeout_ms: u64 },

    #[error("Directory transport error: {0}")]
    Transport(String),

    #[error("Directory circuit breaker is open")]
    CircuitOpen,

    #[error("Directory answered with unexpected status {status}")]
    UnexpectedStatus { status: u16 },

    #[error("Cannot decode directory response: {0}")]
    Decode(String),
}

impl IsTransient for GatewayError {
    fn is_transient(&self) -> bool {
        match self {
            GatewayError::Timeout { .. } | GatewayError::Transport(_) => true,
            GatewayError::UnexpectedStatus { status } => *status >= 500 || *status == 429,
            // An open circuit fails fast; retrying inside the same request defeats it.
            GatewayError::CircuitOpen | GatewayError::Decode(_) => false,
        }
    }
}
