//! Context handed to native capabilities.
//!
//! A native call cannot be interrupted by the resource guard. The context
//! tells the capability how much of the run's time budget is left and lets
//! it apply the run's size limits to anything it builds.

use std::time::{Duration, Instant};

use crate::errors::{limit_exceeded, DraconicError, LimitKind};
use crate::Value;

/// Size quotas applied to the result of any single operation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SizeLimits {
    pub max_string_length: usize,
    pub max_container_size: usize,
    pub max_power_base: u64,
    pub max_power: u64,
}

impl SizeLimits {
    /// Strings are measured in bytes, an upper bound on their length in
    /// characters.
    #[inline]
    pub fn check_string_len(&self, len: usize) -> Result<(), DraconicError> {
        if len > self.max_string_length {
            return Err(limit_exceeded(
                LimitKind::StringLength,
                self.max_string_length as u64,
            ));
        }
        Ok(())
    }

    #[inline]
    pub fn check_container_len(&self, len: usize) -> Result<(), DraconicError> {
        if len > self.max_container_size {
            return Err(limit_exceeded(
                LimitKind::ContainerSize,
                self.max_container_size as u64,
            ));
        }
        Ok(())
    }

    /// Ranges iterate lazily, so one too long to materialise is rejected
    /// before anything walks it.
    pub fn check_iterable(&self, iterable: &Value) -> Result<(), DraconicError> {
        if let Value::Range(range) = iterable {
            self.check_container_len(range.len())?;
        }
        Ok(())
    }
}

/// Long-running natives read the clock once every this many items.
pub const DEADLINE_CHECK_INTERVAL: usize = 64;

/// What a native capability may know about the run calling it.
#[derive(Clone, Debug)]
pub struct NativeContext {
    deadline: Instant,
    timeout: Duration,
    limits: SizeLimits,
}

impl NativeContext {
    /// `timeout` is the run's configured budget, reported when the
    /// deadline passes.
    pub fn new(deadline: Instant, timeout: Duration, limits: SizeLimits) -> Self {
        NativeContext {
            deadline,
            timeout,
            limits,
        }
    }

    /// Time left before the run is aborted with a timeout.
    pub fn remaining_time(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn limits(&self) -> &SizeLimits {
        &self.limits
    }

    /// Fails with a `Timeout` once the run's deadline has passed.
    pub fn check_deadline(&self) -> Result<(), DraconicError> {
        if Instant::now() >= self.deadline {
            let millis = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
            return Err(limit_exceeded(LimitKind::Timeout, millis));
        }
        Ok(())
    }

    /// [`check_deadline`](Self::check_deadline) for the `count`th item of a
    /// loop, reading the clock only every [`DEADLINE_CHECK_INTERVAL`] items.
    #[inline]
    pub fn poll_deadline(&self, count: usize) -> Result<(), DraconicError> {
        if count % DEADLINE_CHECK_INTERVAL == 0 {
            self.check_deadline()?;
        }
        Ok(())
    }

    pub fn check_string_len(&self, len: usize) -> Result<(), DraconicError> {
        self.limits.check_string_len(len)
    }

    pub fn check_container_len(&self, len: usize) -> Result<(), DraconicError> {
        self.limits.check_container_len(len)
    }

    pub fn check_iterable(&self, iterable: &Value) -> Result<(), DraconicError> {
        self.limits.check_iterable(iterable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> SizeLimits {
        SizeLimits {
            max_string_length: 10,
            max_container_size: 3,
            max_power_base: 100,
            max_power: 10,
        }
    }

    #[test]
    fn size_checks_allow_the_limit_itself() {
        let limits = limits();
        assert!(limits.check_string_len(10).is_ok());
        assert!(limits.check_container_len(3).is_ok());
    }

    #[test]
    fn size_checks_reject_past_the_limit() {
        let limits = limits();
        let err = limits.check_string_len(11).unwrap_err();
        assert_eq!(err.limit(), Some(LimitKind::StringLength));
        let err = limits.check_container_len(4).unwrap_err();
        assert_eq!(err.limit(), Some(LimitKind::ContainerSize));
    }

    #[test]
    fn long_ranges_are_not_iterable_within_limits() {
        let limits = limits();
        let short = Value::Range(crate::RangeValue::new(0, 3, 1));
        let long = Value::Range(crate::RangeValue::new(0, 1_000_000_000_000, 1));
        assert!(limits.check_iterable(&short).is_ok());
        assert!(limits.check_iterable(&Value::str("longer than three")).is_ok());
        let err = limits.check_iterable(&long).unwrap_err();
        assert_eq!(err.limit(), Some(LimitKind::ContainerSize));
    }

    #[test]
    fn remaining_time_saturates_at_zero() {
        let past = Instant::now();
        let ctx = NativeContext::new(past, Duration::from_millis(5), limits());
        std::thread::sleep(Duration::from_millis(1));
        assert_eq!(ctx.remaining_time(), Duration::ZERO);
    }

    #[test]
    fn passed_deadline_reports_the_configured_timeout() {
        let ctx = NativeContext::new(Instant::now(), Duration::from_millis(5), limits());
        let err = ctx.check_deadline().unwrap_err();
        assert_eq!(err.limit(), Some(LimitKind::Timeout));
        assert!(matches!(
            err.kind(),
            crate::ErrorKind::LimitExceeded { max: 5, .. }
        ));
        assert!(ctx.poll_deadline(1).is_ok());
        assert!(ctx.poll_deadline(DEADLINE_CHECK_INTERVAL).is_err());
    }
}
