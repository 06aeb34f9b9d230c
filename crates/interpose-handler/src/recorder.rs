//! Call recording interceptor
//!
//! [`CallRecorder`] keeps a bounded history of invocations passing through
//! it, with the phase each reached and the outcome it observed.

use crate::interceptor::{Interceptor, Next};
use interpose_core::{FailureKind, Invocation, InvocationPhase, InvocationResult, Value};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Observed result of a recorded invocation
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Inner pipeline returned a value
    Returned(Value),

    /// Inner pipeline failed
    Failed {
        /// Failure classification
        kind: FailureKind,
        /// Rendered error
        message: String,
    },
}

/// History entry for one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRecord {
    /// Monotonic sequence number within the recorder
    pub sequence: u64,
    /// Invoked operation
    pub operation: String,
    /// Arguments as supplied
    pub arguments: Vec<Value>,
    /// Furthest phase reached
    pub phase: InvocationPhase,
    /// Outcome, once completed
    pub outcome: Option<Outcome>,
}

impl InvocationRecord {
    /// Check if the invocation completed successfully
    #[inline]
    #[must_use]
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, Some(Outcome::Returned(_)))
    }
}

#[derive(Debug, Default)]
struct History {
    next_sequence: u64,
    records: VecDeque<InvocationRecord>,
}

/// Records invocations and their outcomes
///
/// Sees the outcome produced by interceptors inside it. Place a fallback
/// outside the recorder to record the original failure, inside to record
/// the substitute.
#[derive(Debug)]
pub struct CallRecorder {
    capacity: usize,
    history: Mutex<History>,
}

impl CallRecorder {
    /// Default number of retained records
    pub const DEFAULT_CAPACITY: usize = 1024;

    /// Create recorder with default capacity
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create recorder retaining at most `capacity` records (minimum 1)
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            history: Mutex::new(History::default()),
        }
    }

    /// Operation of the most recent invocation
    #[must_use]
    pub fn last_operation(&self) -> Option<String> {
        self.history
            .lock()
            .records
            .back()
            .map(|record| record.operation.clone())
    }

    /// Whether the most recent invocation succeeded
    #[must_use]
    pub fn last_succeeded(&self) -> bool {
        self.history
            .lock()
            .records
            .back()
            .is_some_and(InvocationRecord::succeeded)
    }

    /// Most recent record
    #[must_use]
    pub fn last(&self) -> Option<InvocationRecord> {
        self.history.lock().records.back().cloned()
    }

    /// Snapshot of retained records, oldest first
    #[must_use]
    pub fn records(&self) -> Vec<InvocationRecord> {
        self.history.lock().records.iter().cloned().collect()
    }

    /// Number of retained records for `operation`
    #[must_use]
    pub fn count(&self, operation: &str) -> usize {
        self.history
            .lock()
            .records
            .iter()
            .filter(|record| record.operation == operation)
            .count()
    }

    /// Number of retained records
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.history.lock().records.len()
    }

    /// Check if nothing is retained
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.lock().records.is_empty()
    }

    /// Drop all retained records
    pub fn clear(&self) {
        self.history.lock().records.clear();
    }

    fn begin(&self, invocation: &Invocation) -> u64 {
        let mut history = self.history.lock();
        let sequence = history.next_sequence;
        history.next_sequence += 1;

        if history.records.len() == self.capacity {
            history.records.pop_front();
        }
        history.records.push_back(InvocationRecord {
            sequence,
            operation: invocation.operation().to_string(),
            arguments: invocation.arguments().to_vec(),
            phase: InvocationPhase::Delegating,
            outcome: None,
        });
        sequence
    }

    fn complete(&self, sequence: u64, result: &InvocationResult<Value>) {
        let mut history = self.history.lock();
        let Some(record) = history
            .records
            .iter_mut()
            .rev()
            .find(|record| record.sequence == sequence)
        else {
            return;
        };

        record.phase = InvocationPhase::Completed;
        record.outcome = Some(match result {
            Ok(value) => Outcome::Returned(value.clone()),
            Err(error) => Outcome::Failed {
                kind: error.kind(),
                message: error.to_string(),
            },
        });
    }
}

impl Default for CallRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Interceptor for CallRecorder {
    fn intercept(&self, invocation: &Invocation, next: Next<'_>) -> InvocationResult<Value> {
        let sequence = self.begin(invocation);
        let result = next(invocation);
        self.complete(sequence, &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interpose_core::InvocationError;
    use pretty_assertions::assert_eq;

    fn call(operation: &'static str) -> Invocation {
        Invocation::new(operation, vec![Value::from("arg")])
    }

    #[test]
    fn records_success() {
        let recorder = CallRecorder::new();
        assert!(recorder.is_empty());
        assert!(!recorder.last_succeeded());

        recorder.intercept(&call("get_data"), &|_| Ok(Value::from("x"))).unwrap();

        assert_eq!(recorder.last_operation().as_deref(), Some("get_data"));
        assert!(recorder.last_succeeded());
        assert_eq!(
            recorder.last().unwrap(),
            InvocationRecord {
                sequence: 0,
                operation: "get_data".to_string(),
                arguments: vec![Value::from("arg")],
                phase: InvocationPhase::Completed,
                outcome: Some(Outcome::Returned(Value::from("x"))),
            }
        );
    }

    #[test]
    fn records_failure() {
        let recorder = CallRecorder::new();
        let result = recorder.intercept(&call("set_data"), &|inv| {
            Err(InvocationError::validation(inv.operation(), "bad"))
        });

        assert!(result.is_err());
        assert!(!recorder.last_succeeded());
        let record = recorder.last().unwrap();
        assert_eq!(record.phase, InvocationPhase::Completed);
        assert!(matches!(
            record.outcome,
            Some(Outcome::Failed { kind: FailureKind::Validation, .. })
        ));
    }

    #[test]
    fn delegating_phase_visible_inside_call() {
        let recorder = CallRecorder::new();
        recorder
            .intercept(&call("get_data"), &|_| {
                assert_eq!(recorder.last().unwrap().phase, InvocationPhase::Delegating);
                Ok(Value::Unit)
            })
            .unwrap();
    }

    #[test]
    fn capacity_evicts_oldest() {
        let recorder = CallRecorder::with_capacity(2);
        for op in ["a", "b", "c"] {
            recorder.intercept(&call(op), &|_| Ok(Value::Unit)).unwrap();
        }

        let ops: Vec<String> = recorder.records().into_iter().map(|r| r.operation).collect();
        assert_eq!(ops, vec!["b", "c"]);
        assert_eq!(recorder.count("a"), 0);
        assert_eq!(recorder.last().unwrap().sequence, 2);
    }

    #[test]
    fn clear_resets_history() {
        let recorder = CallRecorder::new();
        recorder.intercept(&call("a"), &|_| Ok(Value::Unit)).unwrap();
        recorder.clear();
        assert_eq!(recorder.len(), 0);
        assert!(recorder.last_operation().is_none());
    }
}
