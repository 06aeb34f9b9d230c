//! Argument validation interceptor

use crate::interceptor::Interceptor;
use interpose_core::{Invocation, InvocationError, InvocationResult, Value};
use std::collections::HashMap;
use std::fmt;

type Rule = Box<dyn Fn(&Invocation) -> Result<(), String> + Send + Sync>;

/// Rejects invocations whose arguments break per-operation rules
///
/// A rejection surfaces as [`InvocationError::Validation`] from the before
/// hook, so the target is never entered.
#[derive(Default)]
pub struct ValidationInterceptor {
    rules: HashMap<String, Vec<Rule>>,
}

impl ValidationInterceptor {
    /// Create interceptor with no rules
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule for an operation; `Err(reason)` rejects the call
    #[must_use]
    pub fn with_rule<F>(mut self, operation: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&Invocation) -> Result<(), String> + Send + Sync + 'static,
    {
        self.rules
            .entry(operation.into())
            .or_default()
            .push(Box::new(rule));
        self
    }

    /// Require the argument at `index` to equal one of `allowed`
    #[must_use]
    pub fn with_allowed_values<I>(
        self,
        operation: impl Into<String>,
        index: usize,
        allowed: I,
    ) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let allowed: Vec<Value> = allowed.into_iter().map(Into::into).collect();
        self.with_rule(operation, move |invocation| match invocation.argument(index) {
            None => Err(format!("missing argument at position {index}")),
            Some(value) if allowed.contains(value) => Ok(()),
            Some(value) => Err(format!("{value} is not an accepted value")),
        })
    }

    /// Number of operations with rules
    #[inline]
    #[must_use]
    pub fn guarded_operations(&self) -> usize {
        self.rules.len()
    }
}

impl Interceptor for ValidationInterceptor {
    fn before(&self, invocation: &Invocation) -> InvocationResult<()> {
        let Some(rules) = self.rules.get(invocation.operation()) else {
            return Ok(());
        };

        tracing::info!(
            "Executing {} with args {:?}",
            invocation.operation(),
            invocation.arguments()
        );

        for rule in rules {
            if let Err(reason) = rule(invocation) {
                tracing::warn!(operation = invocation.operation(), %reason, "arguments rejected");
                return Err(InvocationError::validation(invocation.operation(), reason));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ValidationInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut operations: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        operations.sort_unstable();
        f.debug_struct("ValidationInterceptor")
            .field("operations", &operations)
            .finish()
    }
}
