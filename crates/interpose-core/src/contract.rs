//! Contract descriptors and the contract seam traits
//!
//! A [`ContractDescriptor`] is the run-time description of a contract: a
//! name and a set of [`OperationSignature`]s. Contracts known at build time
//! are declared with the `contract!` macro, which implements [`Contract`]
//! and [`Route`] for a marker type; fully dynamic contracts build a
//! descriptor by hand or load one from JSON.

use crate::config::FactoryConfig;
use crate::error::{InvocationResult, UnsupportedContractError};
use crate::invocation::Invocation;
use crate::value::{Value, ValueType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A contract known at build time
pub trait Contract: 'static {
    /// Static description of the contract's operations
    fn descriptor() -> &'static ContractDescriptor;
}

/// Default delegation from an [`Invocation`] to a target implementing the contract
///
/// Implemented by a contract marker for every target type satisfying it.
/// `route` must enter the matching target operation exactly once.
pub trait Route<T: ?Sized> {
    /// Call the target operation named by the invocation
    ///
    /// # Errors
    /// - [`InvocationError::UnknownOperation`](crate::InvocationError::UnknownOperation)
    ///   when the contract has no such operation
    /// - argument errors when the values do not fit the declared parameters
    /// - whatever the target operation returns
    fn route(target: &T, invocation: &Invocation) -> InvocationResult<Value>;
}

/// Named, typed parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,

    /// Declared type
    #[serde(rename = "type")]
    pub ty: ValueType,
}

impl Parameter {
    /// Create parameter
    #[inline]
    pub fn new(name: impl Into<String>, ty: ValueType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

fn unit_type() -> ValueType {
    ValueType::Unit
}

/// Signature of one contract operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationSignature {
    name: String,

    #[serde(default)]
    parameters: Vec<Parameter>,

    #[serde(default = "unit_type")]
    returns: ValueType,
}

impl OperationSignature {
    /// Create nullary operation returning unit
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            returns: ValueType::Unit,
        }
    }

    /// Append parameter
    #[inline]
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, ty: ValueType) -> Self {
        self.parameters.push(Parameter::new(name, ty));
        self
    }

    /// Set return type
    #[inline]
    #[must_use]
    pub fn returns(mut self, ty: ValueType) -> Self {
        self.returns = ty;
        self
    }

    /// Operation name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameters in declaration order
    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Declared return type
    #[inline]
    #[must_use]
    pub fn return_type(&self) -> &ValueType {
        &self.returns
    }

    /// Number of declared parameters
    #[inline]
    #[must_use]
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

/// Run-time description of a contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractDescriptor {
    name: String,

    #[serde(default)]
    operations: Vec<OperationSignature>,
}

impl ContractDescriptor {
    /// Create descriptor with no operations
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operations: Vec::new(),
        }
    }

    /// Append operation
    #[inline]
    #[must_use]
    pub fn operation(mut self, signature: OperationSignature) -> Self {
        self.operations.push(signature);
        self
    }

    /// Parse descriptor from JSON
    ///
    /// # Errors
    /// Returns the parse error for malformed documents. Shape checks happen
    /// in [`validate`](Self::validate).
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    /// Contract name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Operations in declaration order
    #[inline]
    #[must_use]
    pub fn operations(&self) -> &[OperationSignature] {
        &self.operations
    }

    /// Look up an operation by name
    #[must_use]
    pub fn find(&self, operation: &str) -> Option<&OperationSignature> {
        self.operations.iter().find(|op| op.name == operation)
    }

    /// Check if an operation is declared
    #[inline]
    #[must_use]
    pub fn declares(&self, operation: &str) -> bool {
        self.find(operation).is_some()
    }

    /// Number of operations
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if contract declares no operations
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Check the contract can be synthesized under `config`
    ///
    /// # Errors
    /// Returns the first [`UnsupportedContractError`] found.
    pub fn validate(&self, config: &FactoryConfig) -> Result<(), UnsupportedContractError> {
        if !is_identifier(&self.name) {
            return Err(UnsupportedContractError::InvalidContractName(
                self.name.clone(),
            ));
        }

        if self.operations.len() > config.max_operations {
            return Err(UnsupportedContractError::TooManyOperations {
                contract: self.name.clone(),
                count: self.operations.len(),
                max: config.max_operations,
            });
        }

        let mut seen = HashSet::with_capacity(self.operations.len());
        for op in &self.operations {
            if !is_identifier(&op.name) {
                return Err(UnsupportedContractError::InvalidOperationName {
                    contract: self.name.clone(),
                    operation: op.name.clone(),
                });
            }
            if !seen.insert(op.name.as_str()) {
                return Err(UnsupportedContractError::DuplicateOperation {
                    contract: self.name.clone(),
                    operation: op.name.clone(),
                });
            }
            self.validate_parameters(op, config)?;
        }

        Ok(())
    }

    fn validate_parameters(
        &self,
        op: &OperationSignature,
        config: &FactoryConfig,
    ) -> Result<(), UnsupportedContractError> {
        if op.arity() > config.max_arity {
            return Err(UnsupportedContractError::ArityExceeded {
                contract: self.name.clone(),
                operation: op.name.clone(),
                arity: op.arity(),
                max: config.max_arity,
            });
        }

        let mut seen = HashSet::with_capacity(op.arity());
        for param in &op.parameters {
            if !is_identifier(&param.name) {
                return Err(UnsupportedContractError::InvalidParameterName {
                    contract: self.name.clone(),
                    operation: op.name.clone(),
                    parameter: param.name.clone(),
                });
            }
            if !seen.insert(param.name.as_str()) {
                return Err(UnsupportedContractError::DuplicateParameter {
                    contract: self.name.clone(),
                    operation: op.name.clone(),
                    parameter: param.name.clone(),
                });
            }
        }

        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
