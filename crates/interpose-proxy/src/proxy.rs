//! Generic forwarding type for build-time contracts

use interpose_core::{
    Contract, ContractDescriptor, ContractValue, Invocation, InvocationError, InvocationResult,
    Value,
};
use interpose_handler::InvocationHandler;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Synthesized stand-in for contract `C`, forwarding every call to `H`
///
/// The `contract!` macro implements the contract's trait for
/// `Proxy<Marker, H>`. A proxy holds nothing but its handler: each call
/// builds one [`Invocation`], calls [`InvocationHandler::dispatch`] exactly
/// once and returns what dispatch returns. It is `Send`/`Sync` exactly when
/// the handler is.
pub struct Proxy<C, H: ?Sized> {
    handler: Arc<H>,
    contract: PhantomData<fn() -> C>,
}

impl<C, H: ?Sized> Proxy<C, H> {
    pub(crate) fn new(handler: Arc<H>) -> Self {
        Self {
            handler,
            contract: PhantomData,
        }
    }

    /// Bound handler
    #[inline]
    #[must_use]
    pub fn handler(&self) -> &Arc<H> {
        &self.handler
    }
}

impl<C: Contract, H: ?Sized> Proxy<C, H> {
    /// Descriptor of the implemented contract
    #[inline]
    #[must_use]
    pub fn descriptor(&self) -> &'static ContractDescriptor {
        C::descriptor()
    }
}

impl<C, H: InvocationHandler + ?Sized> Proxy<C, H> {
    /// Forward an invocation to the handler untouched
    ///
    /// # Errors
    /// Propagates exactly what the handler returns.
    #[inline]
    pub fn dispatch(&self, invocation: &Invocation) -> InvocationResult<Value> {
        tracing::trace!(operation = invocation.operation(), "proxy forwarding");
        self.handler.dispatch(invocation)
    }

    /// Forward an invocation and convert the result to the declared return type
    ///
    /// A unit return discards the handler's value.
    ///
    /// # Errors
    /// - whatever the handler returns
    /// - [`InvocationError::ReturnMismatch`] when the handler's value does
    ///   not fit `R`
    pub fn call<R: ContractValue>(&self, invocation: Invocation) -> InvocationResult<R> {
        let value = self.dispatch(&invocation)?;
        R::from_value(value)
            .map_err(|mismatch| InvocationError::return_mismatch(invocation.operation(), mismatch))
    }
}

impl<C, H: ?Sized> Clone for Proxy<C, H> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.handler))
    }
}

impl<C, H: ?Sized> fmt::Debug for Proxy<C, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("contract", &std::any::type_name::<C>())
            .finish_non_exhaustive()
    }
}
