//! Interpose Core
//!
//! Foundation types for run-time interception proxies.
//!
//! # Core Concepts
//!
//! - [`Value`] / [`ValueType`]: Tagged union carried across the dispatch point
//! - [`ContractValue`]: Mapping between Rust types and [`Value`]
//! - [`Invocation`]: Ephemeral record of one proxied call
//! - [`ContractDescriptor`]: Run-time description of a contract's operations
//! - [`Contract`] / [`Route`]: Seams implemented per contract (usually by the
//!   `contract!` macro in `interpose-proxy`)
//! - [`FactoryConfig`]: Limits applied when synthesizing proxies
//!
//! # Example
//!
//! ```rust
//! use interpose_core::{ContractDescriptor, FactoryConfig, OperationSignature, ValueType};
//!
//! let descriptor = ContractDescriptor::new("DataBean")
//!     .operation(OperationSignature::new("get_data").returns(ValueType::Str))
//!     .operation(OperationSignature::new("set_data").param("data", ValueType::Str));
//!
//! assert!(descriptor.validate(&FactoryConfig::default()).is_ok());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod config;
mod contract;
mod error;
mod invocation;
mod value;

// Re-exports
pub use config::FactoryConfig;
pub use contract::{Contract, ContractDescriptor, OperationSignature, Parameter, Route};
pub use error::{
    ConfigurationError, DelegationFailure, FailureKind, InvocationError, InvocationResult,
    UnsupportedContractError, ValidationFailure,
};
pub use invocation::{Arguments, Invocation, InvocationPhase};
pub use value::{Bytes, ContractValue, Value, ValueMismatch, ValueType};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
