//! Interception hooks and ordered pipelines
//!
//! An [`Interceptor`] contributes before/after/failure behavior around the
//! default delegation. Several interceptors compose through an
//! [`InterceptorChain`]; one-off policies can be written as closures with
//! [`Hooks`].

use interpose_core::{Invocation, InvocationError, InvocationResult, Value};
use std::fmt;
use std::sync::Arc;

/// Continuation of the pipeline: inner interceptors, then the target
pub type Next<'a> = &'a dyn Fn(&Invocation) -> InvocationResult<Value>;

/// Interception policy around one delegation
///
/// All methods are provided. Override the hooks for simple policies, or
/// [`intercept`](Self::intercept) for full around-control.
pub trait Interceptor {
    /// Runs before delegation; an error aborts the call before the target is entered
    ///
    /// # Errors
    /// Any error rejects the invocation.
    fn before(&self, _invocation: &Invocation) -> InvocationResult<()> {
        Ok(())
    }

    /// Runs after successful delegation with the value about to be returned
    fn after(&self, _invocation: &Invocation, _result: &Value) {}

    /// Runs when `before` or delegation failed; may substitute a fallback value
    ///
    /// # Errors
    /// Returns the error to keep propagating it.
    fn on_failure(
        &self,
        _invocation: &Invocation,
        error: InvocationError,
    ) -> InvocationResult<Value> {
        Err(error)
    }

    /// Run this interceptor around `next`
    ///
    /// # Errors
    /// Whatever the hooks decide to propagate.
    fn intercept(&self, invocation: &Invocation, next: Next<'_>) -> InvocationResult<Value> {
        match self.before(invocation).and_then(|()| next(invocation)) {
            Ok(value) => {
                self.after(invocation, &value);
                Ok(value)
            }
            Err(error) => self.on_failure(invocation, error),
        }
    }
}

impl<I: Interceptor + ?Sized> Interceptor for Arc<I> {
    fn before(&self, invocation: &Invocation) -> InvocationResult<()> {
        (**self).before(invocation)
    }

    fn after(&self, invocation: &Invocation, result: &Value) {
        (**self).after(invocation, result);
    }

    fn on_failure(
        &self,
        invocation: &Invocation,
        error: InvocationError,
    ) -> InvocationResult<Value> {
        (**self).on_failure(invocation, error)
    }

    fn intercept(&self, invocation: &Invocation, next: Next<'_>) -> InvocationResult<Value> {
        (**self).intercept(invocation, next)
    }
}

impl<I: Interceptor + ?Sized> Interceptor for Box<I> {
    fn before(&self, invocation: &Invocation) -> InvocationResult<()> {
        (**self).before(invocation)
    }

    fn after(&self, invocation: &Invocation, result: &Value) {
        (**self).after(invocation, result);
    }

    fn on_failure(
        &self,
        invocation: &Invocation,
        error: InvocationError,
    ) -> InvocationResult<Value> {
        (**self).on_failure(invocation, error)
    }

    fn intercept(&self, invocation: &Invocation, next: Next<'_>) -> InvocationResult<Value> {
        (**self).intercept(invocation, next)
    }
}

/// Ordered pipeline of interceptors
///
/// The first interceptor pushed is outermost: its `before` runs first, its
/// `after`/`on_failure` runs last. A fallback substituted by an inner
/// interceptor reaches outer interceptors as a success.
#[derive(Default)]
pub struct InterceptorChain {
    links: Vec<Box<dyn Interceptor + Send + Sync>>,
}

impl InterceptorChain {
    /// Create empty chain
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { links: Vec::new() }
    }

    /// Append innermost interceptor
    pub fn push<I>(&mut self, interceptor: I)
    where
        I: Interceptor + Send + Sync + 'static,
    {
        self.links.push(Box::new(interceptor));
    }

    /// Append innermost interceptor (builder form)
    #[inline]
    #[must_use]
    pub fn with<I>(mut self, interceptor: I) -> Self
    where
        I: Interceptor + Send + Sync + 'static,
    {
        self.push(interceptor);
        self
    }

    /// Number of interceptors
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Check if chain is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    fn run(
        &self,
        index: usize,
        invocation: &Invocation,
        next: Next<'_>,
    ) -> InvocationResult<Value> {
        match self.links.get(index) {
            Some(link) => link.intercept(invocation, &|inv| self.run(index + 1, inv, next)),
            None => next(invocation),
        }
    }
}

impl Interceptor for InterceptorChain {
    fn intercept(&self, invocation: &Invocation, next: Next<'_>) -> InvocationResult<Value> {
        self.run(0, invocation, next)
    }
}

impl fmt::Debug for InterceptorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorChain")
            .field("len", &self.links.len())
            .finish()
    }
}

type BeforeFn = Box<dyn Fn(&Invocation) -> InvocationResult<()> + Send + Sync>;
type AfterFn = Box<dyn Fn(&Invocation, &Value) + Send + Sync>;
type FailureFn = Box<dyn Fn(&Invocation, InvocationError) -> InvocationResult<Value> + Send + Sync>;

/// Interceptor assembled from closures
#[derive(Default)]
pub struct Hooks {
    before: Option<BeforeFn>,
    after: Option<AfterFn>,
    failure: Option<FailureFn>,
}

impl Hooks {
    /// Create hooks that pass everything through
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With before hook
    #[must_use]
    pub fn with_before<F>(mut self, f: F) -> Self
    where
        F: Fn(&Invocation) -> InvocationResult<()> + Send + Sync + 'static,
    {
        self.before = Some(Box::new(f));
        self
    }

    /// With after hook
    #[must_use]
    pub fn with_after<F>(mut self, f: F) -> Self
    where
        F: Fn(&Invocation, &Value) + Send + Sync + 'static,
    {
        self.after = Some(Box::new(f));
        self
    }

    /// With failure hook
    #[must_use]
    pub fn with_failure<F>(mut self, f: F) -> Self
    where
        F: Fn(&Invocation, InvocationError) -> InvocationResult<Value> + Send + Sync + 'static,
    {
        self.failure = Some(Box::new(f));
        self
    }
}

impl Interceptor for Hooks {
    fn before(&self, invocation: &Invocation) -> InvocationResult<()> {
        self.before.as_ref().map_or(Ok(()), |f| f(invocation))
    }

    fn after(&self, invocation: &Invocation, result: &Value) {
        if let Some(f) = &self.after {
            f(invocation, result);
        }
    }

    fn on_failure(
        &self,
        invocation: &Invocation,
        error: InvocationError,
    ) -> InvocationResult<Value> {
        match &self.failure {
            Some(f) => f(invocation, error),
            None => Err(error),
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .field("failure", &self.failure.is_some())
            .finish()
    }
}
