//! Circuit breaker configuration

use serde::{Deserialize, Serialize};

/// Circuit breaker policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakerConfig {
    /// Consecutive transport failures before the circuit opens
    pub failure_threshold: u32,
    /// How long an open circuit rejects calls
    pub cooldown_seconds: u64,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            cooldown_seconds: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breaker_config_defaults() {
        let config = BreakerConfig::default();
        assert_eq!(config.failure_threshold, 3);
        assert_eq!(config.cooldown_seconds, 30);
    }
}
