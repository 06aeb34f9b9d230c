//! Proxy factory

use crate::dynamic::DynamicProxy;
use crate::proxy::Proxy;
use interpose_core::{
    ConfigurationError, Contract, ContractDescriptor, FactoryConfig, UnsupportedContractError,
};
use interpose_handler::InvocationHandler;
use std::sync::Arc;

/// Synthesizes proxies pairing a contract with a handler
///
/// Holds only its immutable [`FactoryConfig`]; every `create` call is
/// independent and produces an independent proxy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProxyFactory {
    config: FactoryConfig,
}

impl ProxyFactory {
    /// Create factory with default limits
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create factory with custom limits
    ///
    /// # Errors
    /// Returns [`ConfigurationError::InvalidConfig`] for unusable limits.
    pub fn with_config(config: FactoryConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active limits
    #[inline]
    #[must_use]
    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Synthesize a proxy for build-time contract `C`
    ///
    /// The handler's target is not checked against the contract here; a
    /// mismatch surfaces when the unsupported operation is invoked.
    ///
    /// # Errors
    /// Returns [`UnsupportedContractError`] when the contract's shape
    /// exceeds this factory's limits.
    pub fn create<C, H>(&self, handler: Arc<H>) -> Result<Proxy<C, H>, UnsupportedContractError>
    where
        C: Contract,
        H: InvocationHandler + ?Sized,
    {
        let descriptor = C::descriptor();
        descriptor.validate(&self.config)?;

        tracing::debug!(
            contract = descriptor.name(),
            operations = descriptor.len(),
            "proxy synthesized"
        );
        Ok(Proxy::new(handler))
    }

    /// Synthesize a proxy for a contract described only at run time
    ///
    /// # Errors
    /// Returns [`UnsupportedContractError`] when the descriptor is malformed
    /// or exceeds this factory's limits.
    pub fn create_dynamic<H>(
        &self,
        descriptor: ContractDescriptor,
        handler: Arc<H>,
    ) -> Result<DynamicProxy<H>, UnsupportedContractError>
    where
        H: InvocationHandler + ?Sized,
    {
        descriptor.validate(&self.config)?;

        tracing::debug!(
            contract = descriptor.name(),
            operations = descriptor.len(),
            "dynamic proxy synthesized"
        );
        Ok(DynamicProxy::new(Arc::new(descriptor), handler))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interpose_core::{Invocation, InvocationResult, OperationSignature, Value, ValueType};

    struct Echo;

    impl InvocationHandler for Echo {
        fn dispatch(&self, invocation: &Invocation) -> InvocationResult<Value> {
            Ok(invocation.argument(0).cloned().unwrap_or(Value::Unit))
        }
    }

    fn wide(operations: usize) -> ContractDescriptor {
        (0..operations).fold(ContractDescriptor::new("Wide"), |descriptor, i| {
            descriptor.operation(OperationSignature::new(format!("op_{i}")))
        })
    }

    #[test]
    fn rejects_unusable_config() {
        let config = FactoryConfig::new().with_max_operations(0);
        let err = ProxyFactory::with_config(config).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidConfig(_)));
    }

    #[test]
    fn dynamic_contract_over_operation_limit() {
        let config = FactoryConfig::new().with_max_operations(2);
        let factory = ProxyFactory::with_config(config).unwrap();

        assert!(factory.create_dynamic(wide(2), Arc::new(Echo)).is_ok());
        let err = factory.create_dynamic(wide(3), Arc::new(Echo)).unwrap_err();
        assert!(matches!(
            err,
            UnsupportedContractError::TooManyOperations { count: 3, max: 2, .. }
        ));
    }

    #[test]
    fn dynamic_contract_over_arity_limit() {
        let factory = ProxyFactory::with_config(FactoryConfig::new().with_max_arity(1)).unwrap();
        let descriptor = ContractDescriptor::new("Pair").operation(
            OperationSignature::new("put")
                .param("key", ValueType::Str)
                .param("value", ValueType::Int),
        );

        let err = factory.create_dynamic(descriptor, Arc::new(Echo)).unwrap_err();
        assert!(matches!(err, UnsupportedContractError::ArityExceeded { arity: 2, max: 1, .. }));
    }

    #[test]
    fn malformed_descriptor_is_unsupported() {
        let descriptor = ContractDescriptor::new("Bad")
            .operation(OperationSignature::new("dup"))
            .operation(OperationSignature::new("dup"));

        let err = ProxyFactory::new()
            .create_dynamic(descriptor, Arc::new(Echo))
            .unwrap_err();
        assert!(matches!(err, UnsupportedContractError::DuplicateOperation { .. }));
    }

    #[test]
    fn independent_proxies_share_handler() {
        let factory = ProxyFactory::new();
        let handler = Arc::new(Echo);
        let first = factory.create_dynamic(wide(1), Arc::clone(&handler)).unwrap();
        let second = factory.create_dynamic(wide(1), Arc::clone(&handler)).unwrap();

        assert!(Arc::ptr_eq(first.handler(), second.handler()));
        assert_eq!(first.invoke("op_0", vec![Value::Int(4)]).unwrap(), Value::Int(4));
        assert_eq!(Arc::strong_count(&handler), 3);
    }
}
