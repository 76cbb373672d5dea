use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - Unit of work outcomes (commits, rollbacks)
// - Domain and integration event dispatch, per event name
// - Repository search latency, per aggregate
// - Broker circuit breaker state transitions
//
// Components take an optional `Arc<Metrics>`; nothing is recorded without one.
// ============================================================================

/// Central metrics registry for the catalog core
pub struct Metrics {
    registry: Registry,

    // Unit of Work Metrics
    pub unit_of_work_commits: IntCounter,
    pub unit_of_work_rollbacks: IntCounter,

    // Event Metrics
    pub domain_events_dispatched: IntCounterVec,
    pub integration_events_dispatched: IntCounterVec,

    // Repository Metrics
    pub repository_search_duration: HistogramVec,

    // Circuit Breaker Metrics
    pub circuit_breaker_state: IntGauge,
    pub circuit_breaker_transitions: IntCounterVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        // Unit of Work Metrics
        let unit_of_work_commits = IntCounter::new(
            "unit_of_work_commits_total",
            "Total committed units of work",
        )?;
        registry.register(Box::new(unit_of_work_commits.clone()))?;

        let unit_of_work_rollbacks = IntCounter::new(
            "unit_of_work_rollbacks_total",
            "Total rolled back units of work",
        )?;
        registry.register(Box::new(unit_of_work_rollbacks.clone()))?;

        // Event Metrics
        let domain_events_dispatched = IntCounterVec::new(
            Opts::new("domain_events_dispatched_total", "Total domain events dispatched by the mediator"),
            &["event"],
        )?;
        registry.register(Box::new(domain_events_dispatched.clone()))?;

        let integration_events_dispatched = IntCounterVec::new(
            Opts::new("integration_events_dispatched_total", "Total integration events dispatched by the mediator"),
            &["event"],
        )?;
        registry.register(Box::new(integration_events_dispatched.clone()))?;

        // Repository Metrics
        let repository_search_duration = HistogramVec::new(
            HistogramOpts::new("repository_search_duration_seconds", "Repository search duration")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["aggregate"],
        )?;
        registry.register(Box::new(repository_search_duration.clone()))?;

        // Circuit Breaker Metrics
        let circuit_breaker_state = IntGauge::new(
            "circuit_breaker_state",
            "Circuit breaker state (0=Closed, 1=Open, 2=HalfOpen)",
        )?;
        registry.register(Box::new(circuit_breaker_state.clone()))?;

        let circuit_breaker_transitions = IntCounterVec::new(
            Opts::new("circuit_breaker_transitions_total", "Circuit breaker state transitions"),
            &["from_state", "to_state"],
        )?;
        registry.register(Box::new(circuit_breaker_transitions.clone()))?;

        Ok(Self {
            registry,
            unit_of_work_commits,
            unit_of_work_rollbacks,
            domain_events_dispatched,
            integration_events_dispatched,
            repository_search_duration,
            circuit_breaker_state,
            circuit_breaker_transitions,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Prometheus text exposition of every registered metric
    pub fn render(&self) -> anyhow::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Helper to record a unit of work outcome
    pub fn record_unit_of_work(&self, committed: bool) {
        if committed {
            self.unit_of_work_commits.inc();
        } else {
            self.unit_of_work_rollbacks.inc();
        }
    }

    pub fn record_domain_event(&self, event: &str) {
        self.domain_events_dispatched.with_label_values(&[event]).inc();
    }

    pub fn record_integration_event(&self, event: &str) {
        self.integration_events_dispatched.with_label_values(&[event]).inc();
    }

    pub fn record_search(&self, aggregate: &str, duration_secs: f64) {
        self.repository_search_duration.with_label_values(&[aggregate]).observe(duration_secs);
    }

    /// Helper to update circuit breaker state
    pub fn update_circuit_breaker_state(&self, state: u8) {
        self.circuit_breaker_state.set(state as i64);
    }

    /// Helper to record circuit breaker transition
    pub fn record_circuit_breaker_transition(&self, from_state: &str, to_state: &str) {
        self.circuit_breaker_transitions.with_label_values(&[from_state, to_state]).inc();
    }
}
