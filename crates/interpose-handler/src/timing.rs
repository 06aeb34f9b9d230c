//! Call timing interceptor

use crate::interceptor::Interceptor;
use interpose_core::{Invocation, InvocationError, InvocationResult, Value};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Measures delegation time and logs it
///
/// The start mark is handler-scoped, not per call: overlapping calls through
/// the same handler overwrite each other's mark.
#[derive(Debug, Default)]
pub struct TimingInterceptor {
    operations: Option<HashSet<String>>,
    slow_threshold: Option<Duration>,
    started: Mutex<Option<Instant>>,
    last_elapsed: Mutex<Option<Duration>>,
    slow_calls: AtomicUsize,
}

impl TimingInterceptor {
    /// Time every operation
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict timing to the named operations
    #[must_use]
    pub fn only<I, S>(mut self, operations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.operations = Some(operations.into_iter().map(Into::into).collect());
        self
    }

    /// Warn when a call takes longer than `threshold`
    #[inline]
    #[must_use]
    pub fn with_slow_threshold(mut self, threshold: Duration) -> Self {
        self.slow_threshold = Some(threshold);
        self
    }

    /// Elapsed time of the last timed call
    #[inline]
    #[must_use]
    pub fn last_elapsed(&self) -> Option<Duration> {
        *self.last_elapsed.lock()
    }

    /// Number of calls that exceeded the slow threshold
    #[inline]
    #[must_use]
    pub fn slow_calls(&self) -> usize {
        self.slow_calls.load(Ordering::Relaxed)
    }

    fn tracks(&self, operation: &str) -> bool {
        self.operations
            .as_ref()
            .map_or(true, |ops| ops.contains(operation))
    }
}

impl Interceptor for TimingInterceptor {
    fn before(&self, invocation: &Invocation) -> InvocationResult<()> {
        if self.tracks(invocation.operation()) {
            *self.started.lock() = Some(Instant::now());
        }
        Ok(())
    }

    fn after(&self, invocation: &Invocation, _result: &Value) {
        let Some(started) = self.started.lock().take() else {
            return;
        };
        if !self.tracks(invocation.operation()) {
            return;
        }

        let elapsed = started.elapsed();
        *self.last_elapsed.lock() = Some(elapsed);
        tracing::info!(
            "Executing {} finished in {} ns",
            invocation.operation(),
            elapsed.as_nanos()
        );

        if let Some(threshold) = self.slow_threshold {
            if elapsed > threshold {
                self.slow_calls.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    operation = invocation.operation(),
                    elapsed_ns = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX),
                    threshold_ns = u64::try_from(threshold.as_nanos()).unwrap_or(u64::MAX),
                    "slow call"
                );
            }
        }
    }

    fn on_failure(
        &self,
        _invocation: &Invocation,
        error: InvocationError,
    ) -> InvocationResult<Value> {
        self.started.lock().take();
        Err(error)
    }
}
