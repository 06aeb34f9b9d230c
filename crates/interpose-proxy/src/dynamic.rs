//! Run-time contracts
//!
//! For contracts only known at run time: the descriptor is data, targets
//! implement [`DynamicTarget`], and callers go through
//! [`DynamicProxy::invoke`] with untyped [`Value`] arguments.

use interpose_core::{
    ContractDescriptor, Invocation, InvocationError, InvocationResult, Route, Value,
};
use interpose_handler::InvocationHandler;
use std::fmt;
use std::sync::Arc;

/// Marker contract routing to [`DynamicTarget`]s
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DynamicContract;

/// Target handling invocations by name
pub trait DynamicTarget {
    /// Perform the named operation
    ///
    /// # Errors
    /// Whatever the operation fails with.
    fn invoke(&self, invocation: &Invocation) -> InvocationResult<Value>;
}

impl<T: DynamicTarget + ?Sized> Route<T> for DynamicContract {
    #[inline]
    fn route(target: &T, invocation: &Invocation) -> InvocationResult<Value> {
        target.invoke(invocation)
    }
}

/// Closure adaptor implementing [`DynamicTarget`]
pub struct FnTarget<F>(F);

impl<F> FnTarget<F>
where
    F: Fn(&Invocation) -> InvocationResult<Value>,
{
    /// Wrap closure
    #[inline]
    #[must_use]
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> DynamicTarget for FnTarget<F>
where
    F: Fn(&Invocation) -> InvocationResult<Value>,
{
    fn invoke(&self, invocation: &Invocation) -> InvocationResult<Value> {
        (self.0)(invocation)
    }
}

impl<F> fmt::Debug for FnTarget<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTarget").finish_non_exhaustive()
    }
}

/// Proxy for a run-time described contract
///
/// Operations not declared by the descriptor are rejected before dispatch;
/// everything else is forwarded to the handler exactly once.
pub struct DynamicProxy<H: ?Sized> {
    descriptor: Arc<ContractDescriptor>,
    handler: Arc<H>,
}

impl<H: ?Sized> DynamicProxy<H> {
    pub(crate) fn new(descriptor: Arc<ContractDescriptor>, handler: Arc<H>) -> Self {
        Self {
            descriptor,
            handler,
        }
    }

    /// Implemented contract
    #[inline]
    #[must_use]
    pub fn descriptor(&self) -> &ContractDescriptor {
        &self.descriptor
    }

    /// Bound handler
    #[inline]
    #[must_use]
    pub fn handler(&self) -> &Arc<H> {
        &self.handler
    }
}

impl<H: InvocationHandler + ?Sized> DynamicProxy<H> {
    /// Invoke a declared operation
    ///
    /// # Errors
    /// - [`InvocationError::UnknownOperation`] if the descriptor does not
    ///   declare `operation`
    /// - whatever the handler returns
    pub fn invoke(&self, operation: &str, arguments: Vec<Value>) -> InvocationResult<Value> {
        let Some(signature) = self.descriptor.find(operation) else {
            return Err(InvocationError::unknown_operation(
                self.descriptor.name(),
                operation,
            ));
        };

        let invocation = Invocation::new(signature.name().to_string(), arguments);
        tracing::trace!(
            contract = self.descriptor.name(),
            operation = invocation.operation(),
            "dynamic proxy forwarding"
        );
        self.handler.dispatch(&invocation)
    }
}

impl<H: ?Sized> Clone for DynamicProxy<H> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.descriptor), Arc::clone(&self.handler))
    }
}

impl<H: ?Sized> fmt::Debug for DynamicProxy<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicProxy")
            .field("contract", &self.descriptor.name())
            .finish_non_exhaustive()
    }
}
