use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::config::Settings;
use crate::metrics::Metrics;

// ============================================================================
// Circuit Breaker - guards the message broker
// ============================================================================
//
// Closed   --failure_threshold failures-->        Open
// Open     --reset_timeout elapsed, next call-->  HalfOpen
// HalfOpen --success_threshold successes-->       Closed
// HalfOpen --any failure-->                       Open
//
// While open, calls fail fast with `CircuitBreakerError::Open` and the
// operation is never polled.
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

impl CircuitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitState::Closed => "closed",
            CircuitState::Open => "open",
            CircuitState::HalfOpen => "half_open",
        }
    }

    /// Gauge encoding: 0 closed, 1 open, 2 half-open.
    pub fn as_gauge(&self) -> u8 {
        match self {
            CircuitState::Closed => 0,
            CircuitState::Open => 1,
            CircuitState::HalfOpen => 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    pub failure_threshold: u32,
    pub reset_timeout: Duration,
    pub success_threshold: u32,
}

impl CircuitBreakerConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            failure_threshold: settings.broker_failure_threshold,
            reset_timeout: settings.broker_reset_timeout,
            ..Self::default()
        }
    }
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            reset_timeout: Duration::from_secs(30),
            success_threshold: 2,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CircuitBreakerError<E> {
    #[error("circuit breaker is open")]
    Open,

    #[error("operation failed: {0}")]
    OperationFailed(E),
}

#[derive(Debug)]
struct BreakerState {
    state: CircuitState,
    failures: u32,
    successes: u32,
    opened_at: Option<Instant>,
}

#[derive(Clone)]
pub struct CircuitBreaker {
    name: &'static str,
    inner: Arc<Mutex<BreakerState>>,
    config: CircuitBreakerConfig,
    metrics: Option<Arc<Metrics>>,
}

impl CircuitBreaker {
    pub fn new(name: &'static str, config: CircuitBreakerConfig) -> Self {
        Self {
            name,
            inner: Arc::new(Mutex::new(BreakerState {
                state: CircuitState::Closed,
                failures: 0,
                successes: 0,
                opened_at: None,
            })),
            config,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        metrics.update_circuit_breaker_state(CircuitState::Closed.as_gauge());
        self.metrics = Some(metrics);
        self
    }

    pub async fn call<Fut, T, E>(&self, operation: Fut) -> Result<T, CircuitBreakerError<E>>
    where
        Fut: Future<Output = Result<T, E>>,
    {
        {
            let mut inner = self.inner.lock().await;
            if inner.state == CircuitState::Open {
                let elapsed = inner.opened_at.map_or(true, |at| at.elapsed() >= self.config.reset_timeout);
                if !elapsed {
                    return Err(CircuitBreakerError::Open);
                }
                self.transition(&mut inner, CircuitState::HalfOpen);
            }
        }

        match operation.await {
            Ok(value) => {
                self.on_success().await;
                Ok(value)
            }
            Err(error) => {
                self.on_failure().await;
                Err(CircuitBreakerError::OperationFailed(error))
            }
        }
    }

    async fn on_success(&self) {
        let mut inner = self.inner.lock().await;
        match inner.state {
            CircuitState::HalfOpen => {
                inner.successes += 1;
                if inner.successes >= self.config.success_threshold {
                    self.transition(&mut inner, CircuitState::Closed);
                }
            }
            CircuitState::Closed => inner.failures = 0,
            // Another caller reopened the circuit while this one was in flight
            CircuitState::Open => {}
        }
    }

    async fn on_failure(&self) {
        let mut inner = self.inner.lock().await;
        inner.failures += 1;

        match inner.state {
            CircuitState::Closed if inner.failures >= self.config.failure_threshold => {
                self.transition(&mut inner, CircuitState::Open);
            }
            CircuitState::HalfOpen => self.transition(&mut inner, CircuitState::Open),
            _ => {}
        }
    }

    fn transition(&self, inner: &mut BreakerState, to: CircuitState) {
        let from = inner.state;
        inner.state = to;
        inner.successes = 0;
        match to {
            CircuitState::Open => inner.opened_at = Some(Instant::now()),
            CircuitState::Closed => {
                inner.failures = 0;
                inner.opened_at = None;
            }
            CircuitState::HalfOpen => {}
        }

        if let Some(metrics) = &self.metrics {
            metrics.update_circuit_breaker_state(to.as_gauge());
            metrics.record_circuit_breaker_transition(from.as_str(), to.as_str());
        }

        if to == CircuitState::Open {
            tracing::warn!(breaker = self.name, from = from.as_str(), failures = inner.failures, "Circuit opened");
        } else {
            tracing::info!(breaker = self.name, from = from.as_str(), to = to.as_str(), "Circuit state changed");
        }
    }

    pub async fn state(&self) -> CircuitState {
        self.inner.lock().await.state
    }

    pub async fn reset(&self) {
        let mut inner = self.inner.lock().await;
        if inner.state != CircuitState::Closed {
            self.transition(&mut inner, CircuitState::Closed);
        }
        inner.failures = 0;
    }
}
