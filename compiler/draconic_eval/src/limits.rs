//! Per-run resource limits and the attribute policy.
//!
//! Every limit has a finite default; there is no "unlimited" setting.
//! `Limits` deserializes from any serde format with every field optional,
//! so hosts can keep limits in their own configuration files:
//!
//! ```text
//! { "max_steps": 50000, "timeout": 2.5 }
//! ```

use std::time::Duration;

use draconic_ir::is_dunder;
use draconic_value::SizeLimits;
use serde::{Deserialize, Deserializer};

pub const DEFAULT_MAX_STEPS: usize = 100_000;
pub const DEFAULT_MAX_CALL_DEPTH: usize = 50;
pub const DEFAULT_MAX_LOOP_ITERATIONS: usize = 10_000;
pub const DEFAULT_MAX_STRING_LENGTH: usize = 100_000;
pub const DEFAULT_MAX_CONTAINER_SIZE: usize = 100_000;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_POWER_BASE: u64 = 1_000_000;
pub const DEFAULT_MAX_POWER: u64 = 1_000;

/// Quotas enforced by the resource guard during one run.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Limits {
    /// Statement and expression visits.
    pub max_steps: usize,
    /// Nested script function calls.
    pub max_call_depth: usize,
    /// Iterations across all loops, comprehensions and unpackings.
    pub max_loop_iterations: usize,
    /// Length in bytes of any string an operation produces.
    pub max_string_length: usize,
    /// Element count of any container an operation produces.
    pub max_container_size: usize,
    /// Wall-clock budget, given in seconds when deserialized.
    #[serde(deserialize_with = "deserialize_seconds")]
    pub timeout: Duration,
    /// Largest absolute base accepted by `**`.
    pub max_power_base: u64,
    /// Largest absolute exponent accepted by `**`.
    pub max_power: u64,
    pub attribute_policy: AttributePolicy,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_steps: DEFAULT_MAX_STEPS,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            max_loop_iterations: DEFAULT_MAX_LOOP_ITERATIONS,
            max_string_length: DEFAULT_MAX_STRING_LENGTH,
            max_container_size: DEFAULT_MAX_CONTAINER_SIZE,
            timeout: DEFAULT_TIMEOUT,
            max_power_base: DEFAULT_MAX_POWER_BASE,
            max_power: DEFAULT_MAX_POWER,
            attribute_policy: AttributePolicy::default(),
        }
    }
}

impl Limits {
    #[must_use]
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    #[must_use]
    pub fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }

    #[must_use]
    pub fn with_max_loop_iterations(mut self, max_loop_iterations: usize) -> Self {
        self.max_loop_iterations = max_loop_iterations;
        self
    }

    #[must_use]
    pub fn with_max_string_length(mut self, max_string_length: usize) -> Self {
        self.max_string_length = max_string_length;
        self
    }

    #[must_use]
    pub fn with_max_container_size(mut self, max_container_size: usize) -> Self {
        self.max_container_size = max_container_size;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_max_power(mut self, max_power_base: u64, max_power: u64) -> Self {
        self.max_power_base = max_power_base;
        self.max_power = max_power;
        self
    }

    #[must_use]
    pub fn with_attribute_policy(mut self, attribute_policy: AttributePolicy) -> Self {
        self.attribute_policy = attribute_policy;
        self
    }

    /// The size quotas handed to operators and native capabilities.
    pub fn size_limits(&self) -> SizeLimits {
        SizeLimits {
            max_string_length: self.max_string_length,
            max_container_size: self.max_container_size,
            max_power_base: self.max_power_base,
            max_power: self.max_power,
        }
    }
}

fn deserialize_seconds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let seconds = f64::deserialize(deserializer)?;
    Duration::try_from_secs_f64(seconds).map_err(serde::de::Error::custom)
}

/// Which attribute names scripts may read.
///
/// Dunder-shaped names are rejected regardless of this policy.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AttributePolicy {
    /// Names starting with any of these prefixes are rejected.
    pub denied_prefixes: Vec<String>,
    /// Names rejected outright.
    pub denied_names: Vec<String>,
}

impl Default for AttributePolicy {
    fn default() -> Self {
        AttributePolicy {
            denied_prefixes: vec!["_".to_string(), "func_".to_string()],
            denied_names: vec![
                "format".to_string(),
                "format_map".to_string(),
                "mro".to_string(),
            ],
        }
    }
}

impl AttributePolicy {
    pub fn allows(&self, attr: &str) -> bool {
        !is_dunder(attr)
            && !self
                .denied_prefixes
                .iter()
                .any(|prefix| attr.starts_with(prefix.as_str()))
            && !self.denied_names.iter().any(|name| name == attr)
    }
}
