//! Fallback substitution interceptor

use crate::interceptor::Interceptor;
use interpose_core::{FailureKind, Invocation, InvocationError, InvocationResult, Value};
use std::fmt;

type FallbackFn = Box<dyn Fn(&Invocation, &InvocationError) -> Option<Value> + Send + Sync>;

/// Replaces selected failures with a substitute value
///
/// The policy closure sees every failure reaching this interceptor and
/// returns `Some(value)` to substitute or `None` to propagate unchanged.
pub struct FallbackInterceptor {
    policy: FallbackFn,
}

impl FallbackInterceptor {
    /// Create from a policy closure
    #[must_use]
    pub fn new<F>(policy: F) -> Self
    where
        F: Fn(&Invocation, &InvocationError) -> Option<Value> + Send + Sync + 'static,
    {
        Self {
            policy: Box::new(policy),
        }
    }

    /// Substitute only failures of `kind`
    #[must_use]
    pub fn for_kind<F>(kind: FailureKind, fallback: F) -> Self
    where
        F: Fn(&Invocation) -> Value + Send + Sync + 'static,
    {
        Self::new(move |invocation, error| (error.kind() == kind).then(|| fallback(invocation)))
    }
}

impl Interceptor for FallbackInterceptor {
    fn on_failure(
        &self,
        invocation: &Invocation,
        error: InvocationError,
    ) -> InvocationResult<Value> {
        match (self.policy)(invocation, &error) {
            Some(value) => {
                tracing::error!(
                    operation = invocation.operation(),
                    %error,
                    substitute = %value,
                    "failure replaced by fallback"
                );
                Ok(value)
            }
            None => Err(error),
        }
    }
}

impl fmt::Debug for FallbackInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallbackInterceptor").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fail_validation(inv: &Invocation) -> InvocationResult<Value> {
        Err(InvocationError::validation(inv.operation(), "bad"))
    }

    #[test]
    fn substitutes_matching_kind() {
        let fallback =
            FallbackInterceptor::for_kind(FailureKind::Validation, |_| Value::from("current"));
        let value = fallback
            .intercept(&Invocation::new("set_data", vec![]), &fail_validation)
            .unwrap();
        assert_eq!(value, Value::from("current"));
    }

    #[test]
    fn propagates_other_kinds() {
        let fallback = FallbackInterceptor::for_kind(FailureKind::Validation, |_| Value::Unit);
        let err = fallback
            .intercept(&Invocation::new("get_data", vec![]), &|_| {
                Err(InvocationError::delegation(anyhow::anyhow!("down")))
            })
            .unwrap_err();
        assert!(err.is_delegation());
    }

    #[test]
    fn leaves_successes_alone() {
        let fallback = FallbackInterceptor::new(|_, _| Some(Value::Null));
        let value = fallback
            .intercept(&Invocation::new("get_data", vec![]), &|_| Ok(Value::Int(1)))
            .unwrap();
        assert_eq!(value, Value::Int(1));
    }

    #[test]
    fn policy_sees_operation() {
        let fallback = FallbackInterceptor::new(|inv, _| inv.is("get_data").then_some(Value::Null));

        let get = fallback.intercept(&Invocation::new("get_data", vec![]), &fail_validation);
        let set = fallback.intercept(&Invocation::new("set_data", vec![]), &fail_validation);

        assert_eq!(get.unwrap(), Value::Null);
        assert!(set.is_err());
    }
}
