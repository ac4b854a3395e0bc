use std::time::Duration;

use crate::InputError;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);
pub const DEFAULT_MAX_RUNS: usize = 10;

/// Timing and search bounds for one wait. Validated once at the invocation
/// boundary; the poll loop itself never re-parses anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between poll ticks. Fixed for the lifetime of the wait; no
    /// backoff, no jitter.
    pub interval: Duration,
    /// Wall-clock limit for the entire wait, searching included.
    pub timeout: Duration,
    /// How many of the most recent run records one resolution attempt may
    /// inspect.
    pub max_runs: usize,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
            max_runs: DEFAULT_MAX_RUNS,
        }
    }
}

impl PollConfig {
    /// Build a config from optional string overrides, as supplied by the
    /// invocation environment. Absent values keep their defaults.
    pub fn from_overrides(
        interval: Option<&str>,
        timeout: Option<&str>,
        max_runs: Option<&str>,
    ) -> Result<Self, InputError> {
        let mut config = Self::default();
        if let Some(value) = interval {
            config.interval = Duration::from_secs(parse_number("poll-interval", value)?);
        }
        if let Some(value) = timeout {
            config.timeout = Duration::from_secs(parse_number("timeout", value)?);
        }
        if let Some(value) = max_runs {
            config.max_runs = parse_number("max-runs", value)? as usize;
        }
        Ok(config)
    }
}

fn parse_number(name: &'static str, value: &str) -> Result<u64, InputError> {
    value
        .trim()
        .parse()
        .map_err(|_| InputError::InvalidNumber { name, value: value.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = PollConfig::from_overrides(None, None, None).unwrap();
        assert_eq!(config, PollConfig::default());
        assert_eq!(config.interval, Duration::from_secs(10));
        assert_eq!(config.timeout, Duration::from_secs(600));
        assert_eq!(config.max_runs, 10);
    }

    #[test]
    fn overrides() {
        let config = PollConfig::from_overrides(Some("5"), Some("120"), Some("25")).unwrap();
        assert_eq!(config.interval, Duration::from_secs(5));
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert_eq!(config.max_runs, 25);
    }

    #[test]
    fn rejects_non_integer_overrides() {
        for value in ["ten", "1.5", "-3", ""] {
            let result = PollConfig::from_overrides(None, Some(value), None);
            assert!(matches!(
                result,
                Err(InputError::InvalidNumber { name: "timeout", .. })
            ));
        }
    }
}
