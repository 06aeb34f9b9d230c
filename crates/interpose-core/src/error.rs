//! Error types for interpose
//!
//! Provides the error taxonomy shared by handlers, proxies and the factory:
//! - Construction-time: [`ConfigurationError`], [`UnsupportedContractError`]
//! - Call-time: [`InvocationError`], wrapping [`DelegationFailure`] and
//!   [`ValidationFailure`]

use crate::value::ValueMismatch;
use std::fmt;

/// Handler or factory constructed with invalid inputs
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// No target was supplied to the handler
    #[error("handler constructed without a target")]
    MissingTarget,

    /// The target was dropped before the handler could bind to it
    #[error("target was released before the handler was bound")]
    TargetReleased,

    /// Configuration values are out of range or unparsable
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Contract shape that cannot be synthesized into a proxy
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnsupportedContractError {
    /// Contract name is empty or not an identifier
    #[error("invalid contract name: '{0}'")]
    InvalidContractName(String),

    /// Operation name is empty or not an identifier
    #[error("invalid operation name in {contract}: '{operation}'")]
    InvalidOperationName { contract: String, operation: String },

    /// Two operations share a name (overloads cannot be dispatched by name)
    #[error("operation {contract}::{operation} is declared more than once")]
    DuplicateOperation { contract: String, operation: String },

    /// Parameter name is empty or not an identifier
    #[error("invalid parameter name '{parameter}' in {contract}::{operation}")]
    InvalidParameterName {
        contract: String,
        operation: String,
        parameter: String,
    },

    /// Two parameters of one operation share a name
    #[error("parameter '{parameter}' is declared more than once in {contract}::{operation}")]
    DuplicateParameter {
        contract: String,
        operation: String,
        parameter: String,
    },

    /// Contract declares more operations than the factory supports
    #[error("{contract} declares {count} operations, limit is {max}")]
    TooManyOperations {
        contract: String,
        count: usize,
        max: usize,
    },

    /// Operation declares more parameters than the factory supports
    #[error("{contract}::{operation} takes {arity} parameters, limit is {max}")]
    ArityExceeded {
        contract: String,
        operation: String,
        arity: usize,
        max: usize,
    },
}

/// The target's operation failed during delegation
///
/// Carries the original condition unchanged so callers can downcast it.
pub struct DelegationFailure {
    source: anyhow::Error,
}

impl DelegationFailure {
    /// Wrap the condition raised by a target
    #[inline]
    pub fn new(source: impl Into<anyhow::Error>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Create failure from a plain message
    #[inline]
    pub fn msg<M>(message: M) -> Self
    where
        M: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        Self {
            source: anyhow::Error::msg(message),
        }
    }

    /// The original condition
    #[inline]
    #[must_use]
    pub fn cause(&self) -> &anyhow::Error {
        &self.source
    }

    /// Downcast the original condition
    #[inline]
    #[must_use]
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        self.source.downcast_ref::<E>()
    }

    /// Unwrap into the original condition
    #[inline]
    #[must_use]
    pub fn into_cause(self) -> anyhow::Error {
        self.source
    }
}

impl fmt::Debug for DelegationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegationFailure")
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for DelegationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "delegation failed: {}", self.source)
    }
}

impl std::error::Error for DelegationFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

/// A before-hook rejected the arguments of an invocation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation failed for {operation}: {reason}")]
pub struct ValidationFailure {
    /// Rejected operation
    pub operation: String,

    /// Human-readable rejection reason
    pub reason: String,
}

impl ValidationFailure {
    /// Create validation failure
    #[inline]
    pub fn new(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}

/// Call-time failure returned through a proxy
#[derive(Debug, thiserror::Error)]
pub enum InvocationError {
    /// Target operation failed
    #[error(transparent)]
    Delegation(#[from] DelegationFailure),

    /// Arguments rejected before delegation
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    /// Contract has no operation with this name
    #[error("{contract} has no operation '{operation}'")]
    UnknownOperation { contract: String, operation: String },

    /// Fewer arguments supplied than the operation declares
    #[error("{operation}: missing argument '{parameter}' at position {index}")]
    MissingArgument {
        operation: String,
        parameter: String,
        index: usize,
    },

    /// Argument value does not fit the declared parameter type
    #[error("{operation}: argument '{parameter}' at position {index}: {mismatch}")]
    ArgumentMismatch {
        operation: String,
        parameter: String,
        index: usize,
        mismatch: ValueMismatch,
    },

    /// Handler produced a value that does not fit the declared return type
    #[error("{operation}: handler returned a mismatched value: {mismatch}")]
    ReturnMismatch {
        operation: String,
        mismatch: ValueMismatch,
    },
}

/// Coarse classification of an [`InvocationError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Target operation failed
    Delegation,

    /// Arguments rejected before delegation
    Validation,

    /// No such operation
    UnknownOperation,

    /// Missing or mismatched argument
    Argument,

    /// Mismatched return value
    Return,
}

impl InvocationError {
    /// Create delegation failure from a target's condition
    #[inline]
    pub fn delegation(source: impl Into<anyhow::Error>) -> Self {
        Self::Delegation(DelegationFailure::new(source))
    }

    /// Create validation failure
    #[inline]
    pub fn validation(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation(ValidationFailure::new(operation, reason))
    }

    /// Create unknown operation error
    #[inline]
    pub fn unknown_operation(contract: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::UnknownOperation {
            contract: contract.into(),
            operation: operation.into(),
        }
    }

    /// Create return mismatch error
    #[inline]
    pub fn return_mismatch(operation: impl Into<String>, mismatch: ValueMismatch) -> Self {
        Self::ReturnMismatch {
            operation: operation.into(),
            mismatch,
        }
    }

    /// Classify this error
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Delegation(_) => FailureKind::Delegation,
            Self::Validation(_) => FailureKind::Validation,
            Self::UnknownOperation { .. } => FailureKind::UnknownOperation,
            Self::MissingArgument { .. } | Self::ArgumentMismatch { .. } => FailureKind::Argument,
            Self::ReturnMismatch { .. } => FailureKind::Return,
        }
    }

    /// Check if a before-hook rejected the call
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if the target itself failed
    #[inline]
    #[must_use]
    pub fn is_delegation(&self) -> bool {
        matches!(self, Self::Delegation(_))
    }
}

/// Result type alias for proxied operations
pub type InvocationResult<T> = Result<T, InvocationError>;
