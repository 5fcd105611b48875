use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

// ============================================================================
// Metrics - Prometheus metrics for the redirect service
// ============================================================================
//
// - Redirect outcomes (accepted, unknown_target, blocked_target, ...)
// - Redirect latency, gateway included
// - Directory gateway failures per operation
// - Optimistic concurrency conflicts
// - Directory circuit breaker state
//
// Served as text on /metrics by the API.
// ============================================================================

pub struct Metrics {
    registry: Registry,

    pub redirect_outcomes: IntCounterVec,
    pub redirect_duration: Histogram,
    pub gateway_failures: IntCounterVec,
    pub version_conflicts: IntCounter,
    pub circuit_breaker_state: IntGauge,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let redirect_outcomes = IntCounterVec::new(
            Opts::new("redirect_outcomes_total", "Transport order redirect requests by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(redirect_outcomes.clone()))?;

        let redirect_duration = Histogram::with_opts(
            HistogramOpts::new("redirect_duration_seconds", "Time to handle a redirect request")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        )?;
        registry.register(Box::new(redirect_duration.clone()))?;

        let gateway_failures = IntCounterVec::new(
            Opts::new("gateway_failures_total", "Failed location directory lookups after retries"),
            &["operation"],
        )?;
        registry.register(Box::new(gateway_failures.clone()))?;

        let version_conflicts = IntCounter::new(
            "version_conflicts_total",
            "Optimistic concurrency conflicts while saving transport orders",
        )?;
        registry.register(Box::new(version_conflicts.clone()))?;

        let circuit_breaker_state = IntGauge::new(
            "directory_circuit_breaker_state",
            "Directory circuit breaker state (0=Closed, 1=Open, 2=HalfOpen)",
        )?;
        registry.register(Box::new(circuit_breaker_state.clone()))?;

        Ok(Self {
            registry,
            redirect_outcomes,
            redirect_duration,
            gateway_failures,
            version_conflicts,
            circuit_breaker_state,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_redirect(&self, outcome: &str, duration_secs: f64) {
        self.redirect_outcomes.with_label_values(&[outcome]).inc();
        self.redirect_duration.observe(duration_secs);
    }

    pub fn record_gateway_failure(&self, operation: &str) {
        self.gateway_failures.with_label_values(&[operation]).inc();
    }

    pub fn record_version_conflict(&self) {
        self.version_conflicts.inc();
    }

    pub fn update_circuit_breaker_state(&self, state: i64) {
        self.circuit_breaker_state.set(state);
    }

    /// Prometheus text exposition of every registered metric
    pub fn encode(&self) -> anyhow::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(buffer)
    }
}
