//! Interpose Proxy
//!
//! Synthesizes implementations of a contract that forward every call to an
//! [`InvocationHandler`].
//!
//! # Core Concepts
//!
//! - [`contract!`]: Declares a contract trait with its marker, descriptor
//!   and proxy support
//! - [`ProxyFactory`]: Pairs a contract with a handler, applying the
//!   configured limits
//! - [`Proxy`]: The synthesized implementation; each call dispatches once
//! - [`DynamicProxy`]: Same forwarding for contracts described at run time
//!
//! # Example
//!
//! ```rust,ignore
//! use interpose_proxy::prelude::*;
//! use std::sync::Arc;
//!
//! contract! {
//!     pub struct DataBeanContract;
//!
//!     pub trait DataBean: Send + Sync {
//!         fn get_data(&self) -> String;
//!         fn set_data(&self, data: String);
//!     }
//! }
//!
//! let handler = HandlerBuilder::<DataBeanContract, Bean>::new()
//!     .target(Arc::new(Bean::default()))
//!     .intercept(ValidationInterceptor::new().with_rule("set_data", reject_unknown))
//!     .build()?;
//!
//! let proxy = ProxyFactory::new().create::<DataBeanContract, _>(Arc::new(handler))?;
//! proxy.set_data("some valid data".to_string())?;
//! assert_eq!(proxy.get_data()?, "some valid data");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod dynamic;
mod factory;
mod macros;
mod proxy;

// Re-exports
pub use dynamic::{DynamicContract, DynamicProxy, DynamicTarget, FnTarget};
pub use factory::ProxyFactory;
pub use proxy::Proxy;

pub use interpose_core::{
    Arguments, Bytes, ConfigurationError, Contract, ContractDescriptor, ContractValue,
    DelegationFailure, FactoryConfig, FailureKind, Invocation, InvocationError, InvocationPhase,
    InvocationResult, OperationSignature, Parameter, Route, UnsupportedContractError,
    ValidationFailure, Value, ValueMismatch, ValueType,
};
pub use interpose_handler::{
    CallRecorder, FallbackInterceptor, HandlerBuilder, Hooks, InterceptingHandler, Interceptor,
    InterceptorChain, InvocationHandler, InvocationRecord, Next, Outcome, TargetHandler,
    TimingInterceptor, ValidationInterceptor,
};

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::OnceCell;
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::contract;
    pub use crate::{DynamicProxy, DynamicTarget, Proxy, ProxyFactory};
    pub use interpose_core::{
        ContractDescriptor, ContractValue, FactoryConfig, Invocation, InvocationError,
        InvocationResult, OperationSignature, Value, ValueType,
    };
    pub use interpose_handler::{
        CallRecorder, FallbackInterceptor, HandlerBuilder, Hooks, InterceptingHandler, Interceptor,
        InvocationHandler, TargetHandler, TimingInterceptor, ValidationInterceptor,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    contract! {
        /// Marker for [`Store`]
        struct StoreContract;

        /// Keyed store
        trait Store: Send + Sync {
            /// Read one key
            fn fetch(&self, key: String) -> Option<i64>;
            fn put(&self, key: String, value: i64,);
            fn size(&self) -> u32;
        }
    }

    contract! {
        struct EmptyContract;
        #[allow(dead_code)]
        trait Empty {}
    }

    #[test]
    fn descriptor_reflects_declaration() {
        let descriptor = StoreContract::descriptor();
        assert_eq!(descriptor.name(), "Store");
        assert_eq!(descriptor.len(), 3);

        let fetch = descriptor.find("fetch").unwrap();
        assert_eq!(fetch.arity(), 1);
        assert_eq!(fetch.parameters()[0].name, "key");
        assert_eq!(fetch.parameters()[0].ty, ValueType::Str);
        assert_eq!(
            *fetch.return_type(),
            ValueType::Optional(Box::new(ValueType::Int))
        );

        let put = descriptor.find("put").unwrap();
        assert_eq!(put.arity(), 2);
        assert_eq!(*put.return_type(), ValueType::Unit);
    }

    #[test]
    fn descriptor_is_built_once() {
        assert!(std::ptr::eq(StoreContract::descriptor(), StoreContract::descriptor()));
    }

    #[test]
    fn empty_contract_is_supported() {
        let descriptor = EmptyContract::descriptor();
        assert!(descriptor.is_empty());
        assert_eq!(descriptor.name(), "Empty");
        assert!(descriptor.validate(&FactoryConfig::default()).is_ok());
    }

    #[test]
    fn proxy_is_dyn_compatible() {
        struct Fixed;
        impl InvocationHandler for Fixed {
            fn dispatch(&self, invocation: &Invocation) -> InvocationResult<Value> {
                Ok(match invocation.operation() {
                    "fetch" => Value::Int(1),
                    "size" => Value::UInt(7),
                    _ => Value::Unit,
                })
            }
        }

        let proxy = ProxyFactory::new()
            .create::<StoreContract, _>(Arc::new(Fixed))
            .unwrap();
        let store: Box<dyn Store> = Box::new(proxy);

        assert_eq!(store.fetch("a".to_string()).unwrap(), Some(1));
        assert_eq!(store.size().unwrap(), 7);
        store.put("a".to_string(), 2).unwrap();
    }
}
