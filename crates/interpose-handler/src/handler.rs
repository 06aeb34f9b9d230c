//! Invocation handlers
//!
//! Provides the [`InvocationHandler`] dispatch trait, the base delegating
//! [`TargetHandler`], and [`InterceptingHandler`] which runs an
//! [`Interceptor`] around the default delegation.

use crate::interceptor::{Interceptor, InterceptorChain};
use interpose_core::{
    ConfigurationError, Invocation, InvocationPhase, InvocationResult, Route, Value,
};
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, Weak};

/// Single dispatch entry point for every proxied call
///
/// Handlers may keep mutable state across calls. State shared between
/// concurrent calls through the same handler needs the implementer's own
/// synchronization; the type system enforces this through `Sync`.
pub trait InvocationHandler {
    /// Handle one invocation
    ///
    /// # Errors
    /// Whatever the handler's policy decides to propagate.
    fn dispatch(&self, invocation: &Invocation) -> InvocationResult<Value>;
}

impl<H: InvocationHandler + ?Sized> InvocationHandler for &H {
    #[inline]
    fn dispatch(&self, invocation: &Invocation) -> InvocationResult<Value> {
        (**self).dispatch(invocation)
    }
}

impl<H: InvocationHandler + ?Sized> InvocationHandler for Box<H> {
    #[inline]
    fn dispatch(&self, invocation: &Invocation) -> InvocationResult<Value> {
        (**self).dispatch(invocation)
    }
}

impl<H: InvocationHandler + ?Sized> InvocationHandler for Arc<H> {
    #[inline]
    fn dispatch(&self, invocation: &Invocation) -> InvocationResult<Value> {
        (**self).dispatch(invocation)
    }
}

/// Base handler bound to exactly one target
///
/// `dispatch` delegates immediately to the target's matching operation.
/// Custom handlers embed a `TargetHandler` and call [`proceed`](Self::proceed)
/// to wrap the default delegation.
///
/// The target stays owned by the caller; the handler only shares it.
pub struct TargetHandler<C, T: ?Sized> {
    target: Arc<T>,
    contract: PhantomData<fn() -> C>,
}

impl<C, T: ?Sized> TargetHandler<C, T> {
    /// Bind handler to target
    #[inline]
    #[must_use]
    pub fn new(target: Arc<T>) -> Self {
        Self {
            target,
            contract: PhantomData,
        }
    }

    /// Bind handler to a target only referenced weakly by the caller
    ///
    /// # Errors
    /// Returns [`ConfigurationError::TargetReleased`] if the target is gone.
    pub fn from_weak(target: &Weak<T>) -> Result<Self, ConfigurationError> {
        target
            .upgrade()
            .map(Self::new)
            .ok_or(ConfigurationError::TargetReleased)
    }

    /// Bound target
    #[inline]
    #[must_use]
    pub fn target(&self) -> &Arc<T> {
        &self.target
    }
}

impl<C: Route<T>, T: ?Sized> TargetHandler<C, T> {
    /// Default delegation: call the target's matching operation once
    ///
    /// # Errors
    /// Propagates the target's failure unchanged.
    #[inline]
    pub fn proceed(&self, invocation: &Invocation) -> InvocationResult<Value> {
        C::route(&self.target, invocation)
    }
}

impl<C: Route<T>, T: ?Sized> InvocationHandler for TargetHandler<C, T> {
    fn dispatch(&self, invocation: &Invocation) -> InvocationResult<Value> {
        tracing::trace!(operation = invocation.operation(), "delegating to target");
        self.proceed(invocation)
    }
}

impl<C, T: ?Sized> Clone for TargetHandler<C, T> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.target))
    }
}

impl<C, T: ?Sized> fmt::Debug for TargetHandler<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetHandler")
            .field("contract", &std::any::type_name::<C>())
            .field("target_refs", &Arc::strong_count(&self.target))
            .finish()
    }
}

/// Handler running an interceptor around the default delegation
///
/// A failing `before` hook is routed to `on_failure` the same way a failing
/// delegation is, and the target is never entered.
pub struct InterceptingHandler<C, T: ?Sized, I> {
    delegate: TargetHandler<C, T>,
    interceptor: I,
}

impl<C, T: ?Sized, I> InterceptingHandler<C, T, I> {
    /// Wrap delegate with interceptor
    #[inline]
    #[must_use]
    pub fn new(delegate: TargetHandler<C, T>, interceptor: I) -> Self {
        Self {
            delegate,
            interceptor,
        }
    }

    /// Installed interceptor
    #[inline]
    #[must_use]
    pub fn interceptor(&self) -> &I {
        &self.interceptor
    }

    /// Underlying delegating handler
    #[inline]
    #[must_use]
    pub fn delegate(&self) -> &TargetHandler<C, T> {
        &self.delegate
    }

    /// Bound target
    #[inline]
    #[must_use]
    pub fn target(&self) -> &Arc<T> {
        self.delegate.target()
    }
}

impl<C, T: ?Sized> InterceptingHandler<C, T, InterceptorChain> {
    /// Start building a handler with an interceptor pipeline
    #[inline]
    #[must_use]
    pub fn builder() -> HandlerBuilder<C, T> {
        HandlerBuilder::new()
    }
}

impl<C: Route<T>, T: ?Sized, I: Interceptor> InvocationHandler for InterceptingHandler<C, T, I> {
    fn dispatch(&self, invocation: &Invocation) -> InvocationResult<Value> {
        tracing::trace!(
            operation = invocation.operation(),
            phase = %InvocationPhase::Delegating,
            "dispatch entered"
        );

        let result = self
            .interceptor
            .intercept(invocation, &|inv| self.delegate.proceed(inv));

        tracing::trace!(
            operation = invocation.operation(),
            phase = %InvocationPhase::Completed,
            ok = result.is_ok(),
            "dispatch finished"
        );
        result
    }
}

impl<C, T: ?Sized, I: fmt::Debug> fmt::Debug for InterceptingHandler<C, T, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptingHandler")
            .field("delegate", &self.delegate)
            .field("interceptor", &self.interceptor)
            .finish()
    }
}

/// Builder for [`InterceptingHandler`] over an [`InterceptorChain`]
///
/// Interceptors run in insertion order: the first added is outermost.
pub struct HandlerBuilder<C, T: ?Sized> {
    target: Option<Arc<T>>,
    chain: InterceptorChain,
    contract: PhantomData<fn() -> C>,
}

impl<C, T: ?Sized> HandlerBuilder<C, T> {
    /// Create empty builder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            target: None,
            chain: InterceptorChain::new(),
            contract: PhantomData,
        }
    }

    /// Set target
    #[inline]
    #[must_use]
    pub fn target(mut self, target: Arc<T>) -> Self {
        self.target = Some(target);
        self
    }

    /// Append interceptor to the pipeline
    #[inline]
    #[must_use]
    pub fn intercept<I>(mut self, interceptor: I) -> Self
    where
        I: Interceptor + Send + Sync + 'static,
    {
        self.chain.push(interceptor);
        self
    }

    /// Build the handler
    ///
    /// # Errors
    /// Returns [`ConfigurationError::MissingTarget`] when no target was set.
    pub fn build(self) -> Result<InterceptingHandler<C, T, InterceptorChain>, ConfigurationError> {
        let target = self.target.ok_or(ConfigurationError::MissingTarget)?;
        Ok(InterceptingHandler::new(TargetHandler::new(target), self.chain))
    }
}

impl<C, T: ?Sized> Default for HandlerBuilder<C, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, T: ?Sized> fmt::Debug for HandlerBuilder<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerBuilder")
            .field("has_target", &self.target.is_some())
            .field("chain", &self.chain)
            .finish()
    }
}
