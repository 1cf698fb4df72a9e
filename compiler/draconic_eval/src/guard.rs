//! Resource guard: per-run quota enforcement.
//!
//! The evaluator polls the guard at fixed boundaries: every statement and
//! expression visit (`tick`), every script function call (`enter_call`),
//! and every loop iteration (`tick_loop`). A breach aborts the run with
//! `LimitExceeded`, which scripts cannot catch.
//!
//! Native calls cannot be interrupted. Their time still counts: the
//! deadline is checked before and after every native call.

use std::time::Instant;

use draconic_value::errors::limit_exceeded;
use draconic_value::{
    DraconicError, LimitKind, NativeContext, SizeLimits, DEADLINE_CHECK_INTERVAL,
};

use crate::limits::Limits;

/// Mutable counters for one run.
#[derive(Debug)]
pub struct ResourceGuard {
    limits: Limits,
    size_limits: SizeLimits,
    deadline: Instant,
    steps: usize,
    loop_iterations: usize,
    depth: usize,
}

impl ResourceGuard {
    /// Start the clock.
    pub fn new(limits: Limits) -> Self {
        let now = Instant::now();
        // An absurd timeout that overflows `Instant` clamps to a year.
        let deadline = now
            .checked_add(limits.timeout)
            .or_else(|| now.checked_add(std::time::Duration::from_secs(365 * 24 * 3600)))
            .unwrap_or(now);
        ResourceGuard {
            size_limits: limits.size_limits(),
            limits,
            deadline,
            steps: 0,
            loop_iterations: 0,
            depth: 0,
        }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn size_limits(&self) -> &SizeLimits {
        &self.size_limits
    }

    /// Steps consumed so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Loop iterations consumed so far.
    pub fn loop_iterations(&self) -> usize {
        self.loop_iterations
    }

    /// Current script call depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Count one node visit.
    #[inline]
    pub fn tick(&mut self) -> Result<(), DraconicError> {
        self.steps += 1;
        if self.steps > self.limits.max_steps {
            return Err(self.breach(LimitKind::Steps, self.limits.max_steps as u64));
        }
        if self.steps % DEADLINE_CHECK_INTERVAL == 0 {
            self.check_deadline()?;
        }
        Ok(())
    }

    /// Count one loop iteration (cumulative across all loops).
    #[inline]
    pub fn tick_loop(&mut self) -> Result<(), DraconicError> {
        self.loop_iterations += 1;
        if self.loop_iterations > self.limits.max_loop_iterations {
            return Err(self.breach(
                LimitKind::LoopIterations,
                self.limits.max_loop_iterations as u64,
            ));
        }
        self.check_deadline()
    }

    /// Enter a script function call. Pair with `exit_call`.
    pub fn enter_call(&mut self) -> Result<(), DraconicError> {
        if self.depth >= self.limits.max_call_depth {
            return Err(self.breach(LimitKind::CallDepth, self.limits.max_call_depth as u64));
        }
        self.check_deadline()?;
        self.depth += 1;
        Ok(())
    }

    pub fn exit_call(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn check_deadline(&self) -> Result<(), DraconicError> {
        if Instant::now() >= self.deadline {
            let millis = u64::try_from(self.limits.timeout.as_millis()).unwrap_or(u64::MAX);
            return Err(self.breach(LimitKind::Timeout, millis));
        }
        Ok(())
    }

    pub fn check_string_len(&self, len: usize) -> Result<(), DraconicError> {
        self.size_limits.check_string_len(len)
    }

    pub fn check_container_len(&self, len: usize) -> Result<(), DraconicError> {
        self.size_limits.check_container_len(len)
    }

    /// Context for a native call, exposing the remaining time.
    pub fn native_context(&self) -> NativeContext {
        NativeContext::new(self.deadline, self.limits.timeout, self.size_limits)
    }

    #[cold]
    fn breach(&self, limit: LimitKind, max: u64) -> DraconicError {
        tracing::debug!(
            limit = limit.config_key(),
            max,
            steps = self.steps,
            loop_iterations = self.loop_iterations,
            depth = self.depth,
            "resource limit exceeded"
        );
        limit_exceeded(limit, max)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn steps_up_to_the_limit_pass() {
        let mut guard = ResourceGuard::new(Limits::default().with_max_steps(3));
        for _ in 0..3 {
            guard.tick().unwrap();
        }
        let err = guard.tick().unwrap_err();
        assert_eq!(err.limit(), Some(LimitKind::Steps));
    }

    #[test]
    fn loop_iterations_are_cumulative() {
        let mut guard = ResourceGuard::new(Limits::default().with_max_loop_iterations(4));
        for _ in 0..2 {
            guard.tick_loop().unwrap();
        }
        for _ in 0..2 {
            guard.tick_loop().unwrap();
        }
        assert_eq!(guard.loop_iterations(), 4);
        assert_eq!(
            guard.tick_loop().unwrap_err().limit(),
            Some(LimitKind::LoopIterations)
        );
    }

    #[test]
    fn call_depth_is_restored_on_exit() {
        let mut guard = ResourceGuard::new(Limits::default().with_max_call_depth(2));
        guard.enter_call().unwrap();
        guard.enter_call().unwrap();
        assert_eq!(
            guard.enter_call().unwrap_err().limit(),
            Some(LimitKind::CallDepth)
        );
        guard.exit_call();
        guard.enter_call().unwrap();
        assert_eq!(guard.depth(), 2);
    }

    #[test]
    fn expired_deadline_is_reported() {
        let guard = ResourceGuard::new(Limits::default().with_timeout(Duration::ZERO));
        assert_eq!(
            guard.check_deadline().unwrap_err().limit(),
            Some(LimitKind::Timeout)
        );
    }

    #[test]
    fn native_context_reports_remaining_time() {
        let guard = ResourceGuard::new(Limits::default().with_timeout(Duration::from_secs(60)));
        let ctx = guard.native_context();
        assert!(ctx.remaining_time() > Duration::from_secs(50));
        assert_eq!(ctx.limits(), guard.size_limits());
    }
}
