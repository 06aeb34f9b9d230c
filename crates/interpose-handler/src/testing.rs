//! Hand-routed counter contract shared by unit tests

use interpose_core::{Invocation, InvocationError, InvocationResult, Route, Value};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug)]
pub(crate) struct Counter {
    value: Mutex<i64>,
    calls: AtomicUsize,
}

impl Counter {
    pub(crate) fn new(value: i64) -> Self {
        Self {
            value: Mutex::new(value),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn value(&self) -> i64 {
        *self.value.lock()
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn get(&self) -> i64 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.value()
    }

    fn add(&self, amount: i64) -> InvocationResult<i64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut value = self.value.lock();
        let next = *value + amount;
        if next < 0 {
            return Err(InvocationError::delegation(anyhow::anyhow!(
                "counter would drop below zero"
            )));
        }
        *value = next;
        Ok(next)
    }
}

pub(crate) struct CounterContract;

impl Route<Counter> for CounterContract {
    fn route(target: &Counter, invocation: &Invocation) -> InvocationResult<Value> {
        let mut args = invocation.reader();
        match invocation.operation() {
            "get" => Ok(Value::Int(target.get())),
            "add" => target.add(args.read("amount")?).map(Value::Int),
            other => Err(InvocationError::unknown_operation("Counter", other)),
        }
    }
}
