use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::{DirectoryGateway, GatewayError, GET_LOCATION, GET_LOCATION_GROUP};
use crate::domain::location::{Location, LocationGroup, TargetId};
use crate::metrics::Metrics;
use crate::utils::{
    retry_on_transient, CircuitBreaker, CircuitBreakerConfig, CircuitBreakerError, IsTransient, RetryPolicy,
};

/// Decorates a gateway with a per-attempt timeout, bounded retries of
/// transient failures and a circuit breaker shared by both lookups.
pub struct ResilientDirectoryGateway {
    inner: Arc<dyn DirectoryGateway>,
    timeout: Duration,
    retry: RetryPolicy,
    breaker: CircuitBreaker,
    metrics: Option<Arc<Metrics>>,
}

impl ResilientDirectoryGateway {
    pub fn new(
        inner: Arc<dyn DirectoryGateway>,
        timeout: Duration,
        retry: RetryPolicy,
        breaker: CircuitBreakerConfig,
    ) -> Self {
        Self {
            inner,
            timeout,
            retry,
            breaker: CircuitBreaker::new("location_directory", breaker),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    async fn guarded<T, F, Fut>(&self, operation: &'static str, call: F) -> Result<T, GatewayError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, GatewayError>>,
    {
        let timeout_ms = self.timeout.as_millis() as u64;

        let result = retry_on_transient(&self.retry, operation, |_attempt| {
            let lookup = call();
            async move {
                let bounded = async {
                    tokio::time::timeout(self.timeout, lookup)
                        .await
                        .unwrap_or(Err(GatewayError::Timeout { operation, timeout_ms }))
                };

                // Only transient errors say the directory is unhealthy
                match self.breaker.call_with(bounded, GatewayError::is_transient).await {
                    Ok(found) => Ok(found),
                    Err(CircuitBreakerError::CircuitOpen) => Err(GatewayError::CircuitOpen),
                    Err(CircuitBreakerError::OperationFailed(e)) => Err(e),
                }
            }
        })
        .await;

        if let Some(metrics) = &self.metrics {
            metrics.update_circuit_breaker_state(self.breaker.state().await.as_gauge());
            if result.is_err() {
                metrics.record_gateway_failure(operation);
            }
        }

        result
    }
}

#[async_trait]
impl DirectoryGateway for ResilientDirectoryGateway {
    async fn get_location_group(&self, target: &TargetId) -> Result<Option<LocationGroup>, GatewayError> {
        self.guarded(GET_LOCATION_GROUP, || self.inner.get_location_group(target))
            .await
    }

    async fn get_location(&self, target: &TargetId) -> Result<Option<Location>, GatewayError> {
        self.guarded(GET_LOCATION, || self.inner.get_location(target)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::CircuitState;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails the first `failures` calls, then answers with an active location
    struct FlakyDirectory {
        calls: AtomicU32,
        failures: u32,
    }

    #[async_trait]
    impl DirectoryGateway for FlakyDirectory {
        async fn get_location_group(&self, _target: &TargetId) -> Result<Option<LocationGroup>, GatewayError> {
            Ok(None)
        }

        async fn get_location(&self, target: &TargetId) -> Result<Option<Location>, GatewayError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(GatewayError::Transport("connection reset".into()))
            } else {
                Ok(Some(Location::new(target.as_str(), true)))
            }
        }
    }

    /// Never answers within any sensible timeout
    struct HangingDirectory;

    #[async_trait]
    impl DirectoryGateway for HangingDirectory {
        async fn get_location_group(&self, _target: &TargetId) -> Result<Option<LocationGroup>, GatewayError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(None)
        }

        async fn get_location(&self, _target: &TargetId) -> Result<Option<Location>, GatewayError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(None)
        }
    }

    /// Answers every location except `BROKEN`, whose record cannot be decoded
    struct MalformedRecordDirectory {
        calls: AtomicU32,
    }

    #[async_trait]
    impl DirectoryGateway for MalformedRecordDirectory {
        async fn get_location_group(&self, _target: &TargetId) -> Result<Option<LocationGroup>, GatewayError> {
            Ok(None)
        }

        async fn get_location(&self, target: &TargetId) -> Result<Option<Location>, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if target.as_str() == "BROKEN" {
                Err(GatewayError::Decode("missing field `locationId`".into()))
            } else {
                Ok(Some(Location::new(target.as_str(), true)))
            }
        }
    }

    fn fast_retry(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_delay_ms: 1,
            max_delay_ms: 5,
            multiplier: 2.0,
        }
    }

    fn target() -> TargetId {
        TargetId::parse("FGIN0001").unwrap()
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried() {
        let inner = Arc::new(FlakyDirectory { calls: AtomicU32::new(0), failures: 2 });
        let gateway = ResilientDirectoryGateway::new(
            inner.clone(),
            Duration::from_millis(500),
            fast_retry(3),
            CircuitBreakerConfig::default(),
        );

        let location = gateway.get_location(&target()).await.unwrap();

        assert!(location.is_some());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let inner = Arc::new(FlakyDirectory { calls: AtomicU32::new(0), failures: u32::MAX });
        let metrics = Arc::new(Metrics::new().unwrap());
        let gateway = ResilientDirectoryGateway::new(
            inner.clone(),
            Duration::from_millis(500),
            fast_retry(2),
            CircuitBreakerConfig::default(),
        )
        .with_metrics(metrics.clone());

        let err = gateway.get_location(&target()).await.unwrap_err();

        assert!(matches!(err, GatewayError::Transport(_)));
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(metrics.gateway_failures.with_label_values(&[GET_LOCATION]).get(), 1);
    }

    #[tokio::test]
    async fn test_slow_directory_times_out() {
        let gateway = ResilientDirectoryGateway::new(
            Arc::new(HangingDirectory),
            Duration::from_millis(20),
            fast_retry(2),
            CircuitBreakerConfig::default(),
        );

        let err = gateway.get_location_group(&target()).await.unwrap_err();

        assert_eq!(
            err,
            GatewayError::Timeout { operation: GET_LOCATION_GROUP, timeout_ms: 20 }
        );
    }

    #[tokio::test]
    async fn test_open_circuit_fails_fast() {
        let inner = Arc::new(FlakyDirectory { calls: AtomicU32::new(0), failures: u32::MAX });
        let gateway = ResilientDirectoryGateway::new(
            inner.clone(),
            Duration::from_millis(500),
            fast_retry(1),
            CircuitBreakerConfig {
                failure_threshold: 2,
                open_timeout_ms: 60_000,
                success_threshold: 1,
            },
        );

        for _ in 0..2 {
            let _ = gateway.get_location(&target()).await;
        }
        let err = gateway.get_location(&target()).await.unwrap_err();

        assert_eq!(err, GatewayError::CircuitOpen);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_permanent_errors_do_not_open_circuit() {
        let inner = Arc::new(MalformedRecordDirectory { calls: AtomicU32::new(0) });
        let gateway = ResilientDirectoryGateway::new(
            inner.clone(),
            Duration::from_millis(500),
            fast_retry(3),
            CircuitBreakerConfig {
                failure_threshold: 2,
                open_timeout_ms: 60_000,
                success_threshold: 1,
            },
        );
        let broken = TargetId::parse("BROKEN").unwrap();

        for _ in 0..5 {
            let err = gateway.get_location(&broken).await.unwrap_err();
            assert!(matches!(err, GatewayError::Decode(_)));
        }
        // Not transient, so each lookup was tried exactly once
        assert_eq!(inner.calls.load(Ordering::SeqCst), 5);

        let location = gateway.get_location(&target()).await.unwrap();
        assert_eq!(location, Some(Location::new("FGIN0001", true)));
        assert_eq!(gateway.breaker.state().await, CircuitState::Closed);
    }
}
