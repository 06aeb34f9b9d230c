//! Testing utilities for the interpose workspace
//!
//! Shared fixtures: the two-operation data bean contract, targets
//! implementing it, a counting handler, and tracing setup.

#![allow(missing_docs)]

use interpose_proxy::{
    contract, Invocation, InvocationError, InvocationHandler, InvocationResult,
    ValidationInterceptor, Value,
};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;
use tracing_subscriber::EnvFilter;

pub const SOME_VALID_DATA: &str = "some valid data";
pub const OTHER_VALID_DATA: &str = "other valid data";
pub const INVALID_DATA: &str = "invalid data";

contract! {
    /// Marker for [`DataBean`]
    pub struct DataBeanContract;

    /// Single string field behind a getter and a setter
    pub trait DataBean: Send + Sync {
        fn get_data(&self) -> String;
        fn set_data(&self, data: String);
    }
}

/// In-memory [`DataBean`] counting how often it is entered
#[derive(Debug)]
pub struct Bean {
    data: RwLock<String>,
    calls: AtomicUsize,
}

impl Bean {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: RwLock::new(data.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Stored value, read without going through the contract
    pub fn data(&self) -> String {
        self.data.read().clone()
    }

    /// Number of contract calls that reached this target
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for Bean {
    fn default() -> Self {
        Self::new(SOME_VALID_DATA)
    }
}

impl DataBean for Bean {
    fn get_data(&self) -> InvocationResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.data.read().clone())
    }

    fn set_data(&self, data: String) -> InvocationResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.data.write() = data;
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("disk full")]
pub struct DiskFull;

/// [`DataBean`] whose writes always fail
#[derive(Debug, Default)]
pub struct ReadOnlyBean {
    inner: Bean,
}

impl ReadOnlyBean {
    pub fn data(&self) -> String {
        self.inner.data()
    }

    pub fn calls(&self) -> usize {
        self.inner.calls()
    }
}

impl DataBean for ReadOnlyBean {
    fn get_data(&self) -> InvocationResult<String> {
        self.inner.get_data()
    }

    fn set_data(&self, _data: String) -> InvocationResult<()> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        Err(InvocationError::delegation(DiskFull))
    }
}

/// Accepts `set_data` only with one of the two known-good literals
pub fn known_good_data() -> ValidationInterceptor {
    ValidationInterceptor::new().with_allowed_values(
        "set_data",
        0,
        [SOME_VALID_DATA, OTHER_VALID_DATA],
    )
}

/// Handler wrapper counting dispatches and the operations seen
#[derive(Debug)]
pub struct CountingHandler<H> {
    inner: H,
    dispatches: AtomicUsize,
    operations: Mutex<Vec<String>>,
}

impl<H> CountingHandler<H> {
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            dispatches: AtomicUsize::new(0),
            operations: Mutex::new(Vec::new()),
        }
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }

    pub fn dispatches(&self) -> usize {
        self.dispatches.load(Ordering::SeqCst)
    }

    pub fn operations(&self) -> Vec<String> {
        self.operations.lock().clone()
    }
}

impl<H: InvocationHandler> InvocationHandler for CountingHandler<H> {
    fn dispatch(&self, invocation: &Invocation) -> InvocationResult<Value> {
        self.dispatches.fetch_add(1, Ordering::SeqCst);
        self.operations.lock().push(invocation.operation().to_string());
        self.inner.dispatch(invocation)
    }
}

/// Install a test subscriber once; filter from `RUST_LOG`, default `warn`
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
