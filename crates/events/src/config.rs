//! Relay configuration.

use tokio::runtime::Handle;
use tracing::warn;

/// Environment variable selecting the [`FailurePolicy`].
pub const LISTENER_FAILURES_ENV: &str = "TENANTRELAY_LISTENER_FAILURES";

/// Environment variable turning listener latency profiling on or off.
pub const PROFILING_ENV: &str = "TENANTRELAY_PROFILING";

/// What dispatch does when a listener fails synchronously.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop delivering the occurrence and return the error to the event source.
    #[default]
    Propagate,
    /// Log the failure and keep delivering to the remaining listeners.
    Isolate,
}

impl FailurePolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "propagate" => Some(Self::Propagate),
            "isolate" => Some(Self::Isolate),
            _ => None,
        }
    }
}

/// Relay configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Handling of synchronous listener failures.
    pub failure_policy: FailurePolicy,
    /// Record one latency sample per listener invocation.
    pub profiling: bool,
    /// Runtime on which deferred listener results are awaited.
    /// Defaults to the runtime the relay is created on, if any.
    pub runtime: Option<Handle>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::default(),
            profiling: true,
            runtime: None,
        }
    }
}

impl RelayConfig {
    /// Build a config from `TENANTRELAY_*` environment variables.
    ///
    /// Unset variables keep their defaults; unparsable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(value) = lookup(LISTENER_FAILURES_ENV) {
            match FailurePolicy::parse(&value) {
                Some(policy) => config.failure_policy = policy,
                None => warn!(
                    variable = LISTENER_FAILURES_ENV,
                    value = %value,
                    "unrecognised failure policy; using default"
                ),
            }
        }

        if let Some(value) = lookup(PROFILING_ENV) {
            match parse_switch(&value) {
                Some(enabled) => config.profiling = enabled,
                None => warn!(
                    variable = PROFILING_ENV,
                    value = %value,
                    "unrecognised profiling switch; using default"
                ),
            }
        }

        config
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_profiling(mut self, enabled: bool) -> Self {
        self.profiling = enabled;
        self
    }

    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "on" | "true" | "yes" => Some(true),
        "0" | "off" | "false" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = RelayConfig::from_lookup(lookup(&[]));
        assert_eq!(config.failure_policy, FailurePolicy::Propagate);
        assert!(config.profiling);
        assert!(config.runtime.is_none());
    }

    #[test]
    fn reads_known_values() {
        let config = RelayConfig::from_lookup(lookup(&[
            (LISTENER_FAILURES_ENV, "Isolate"),
            (PROFILING_ENV, "off"),
        ]));
        assert_eq!(config.failure_policy, FailurePolicy::Isolate);
        assert!(!config.profiling);
    }

    #[test]
    fn ignores_unparsable_values() {
        let config = RelayConfig::from_lookup(lookup(&[
            (LISTENER_FAILURES_ENV, "retry"),
            (PROFILING_ENV, "maybe"),
        ]));
        assert_eq!(config.failure_policy, FailurePolicy::Propagate);
        assert!(config.profiling);
    }

    #[test]
    fn builder_overrides() {
        let config = RelayConfig::default()
            .with_failure_policy(FailurePolicy::Isolate)
            .with_profiling(false);
        assert_eq!(config.failure_policy, FailurePolicy::Isolate);
        assert!(!config.profiling);
    }
}
