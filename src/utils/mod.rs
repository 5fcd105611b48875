pub mod circuit_breaker;
pub mod logger;
pub mod retry;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerError, CircuitState};
pub use logger::init_tracing;
pub use retry::{retry_on_transient, IsTransient, RetryPolicy};
