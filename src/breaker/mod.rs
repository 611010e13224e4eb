//! Per-service circuit breaker.
//!
//! Gates proxy forwards with a failure counter and a cooldown timer per
//! service name. Three consecutive transport failures open the circuit for
//! 30 seconds; the breaker does not probe — calls simply flow again once the
//! timer expires, and the next failure re-opens it immediately.

use crate::config::BreakerConfig;
use dashmap::DashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default)]
struct BreakerState {
    failures: u32,
    open_until: Option<Instant>,
}

/// Failure-count circuit breaker, one state cell per service name.
///
/// State is lazily initialized on first reference and lives only in memory;
/// a restart starts every circuit closed.
///
/// # Examples
///
/// ```
/// use compras_gateway::breaker::CircuitBreaker;
///
/// let breaker = CircuitBreaker::new();
/// breaker.record_failure("item-service");
/// breaker.record_failure("item-service");
/// assert!(!breaker.is_open("item-service"));
/// breaker.record_failure("item-service");
/// assert!(breaker.is_open("item-service"));
/// ```
pub struct CircuitBreaker {
    states: DashMap<String, BreakerState>,
    failure_threshold: u32,
    cooldown: Duration,
}

impl CircuitBreaker {
    /// Breaker with the default policy: open at 3 failures for 30 seconds.
    pub fn new() -> Self {
        Self::with_config(&BreakerConfig::default())
    }

    pub fn with_config(config: &BreakerConfig) -> Self {
        Self {
            states: DashMap::new(),
            failure_threshold: config.failure_threshold,
            cooldown: Duration::from_secs(config.cooldown_seconds),
        }
    }

    /// Count a transport failure against a service.
    ///
    /// At the threshold the circuit opens; every further failure re-arms the
    /// cooldown, so a service that keeps failing stays open.
    pub fn record_failure(&self, name: &str) {
        let mut state = self.states.entry(name.to_string()).or_default();
        state.failures += 1;
        if state.failures >= self.failure_threshold {
            state.open_until = Some(Instant::now() + self.cooldown);
            tracing::warn!(
                service = name,
                failures = state.failures,
                cooldown_seconds = self.cooldown.as_secs(),
                "Circuit opened"
            );
        }
    }

    /// A successful call closes the circuit and zeroes the counter.
    pub fn record_success(&self, name: &str) {
        self.states.insert(name.to_string(), BreakerState::default());
    }

    /// True while the cooldown for this service has not elapsed.
    pub fn is_open(&self, name: &str) -> bool {
        self.states
            .get(name)
            .and_then(|s| s.open_until)
            .is_some_and(|until| Instant::now() < until)
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new()
    }
}
