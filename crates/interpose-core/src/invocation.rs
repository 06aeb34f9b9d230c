//! Invocation records
//!
//! An [`Invocation`] is the ephemeral record of one proxied call: the
//! operation name and the ordered arguments exactly as the caller supplied
//! them. It lives only for the duration of one dispatch.

use crate::error::{InvocationError, InvocationResult};
use crate::value::{ContractValue, Value};
use std::borrow::Cow;
use std::fmt;

/// One proxied call
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    operation: Cow<'static, str>,
    arguments: Vec<Value>,
}

impl Invocation {
    /// Create invocation record
    #[inline]
    pub fn new(operation: impl Into<Cow<'static, str>>, arguments: Vec<Value>) -> Self {
        Self {
            operation: operation.into(),
            arguments,
        }
    }

    /// Invoked operation name
    #[inline]
    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Arguments in call order
    #[inline]
    #[must_use]
    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    /// Argument at position
    #[inline]
    #[must_use]
    pub fn argument(&self, index: usize) -> Option<&Value> {
        self.arguments.get(index)
    }

    /// Number of supplied arguments
    #[inline]
    #[must_use]
    pub fn arity(&self) -> usize {
        self.arguments.len()
    }

    /// Check operation name
    #[inline]
    #[must_use]
    pub fn is(&self, operation: &str) -> bool {
        self.operation == operation
    }

    /// Positional typed reader over the arguments
    #[inline]
    #[must_use]
    pub fn reader(&self) -> Arguments<'_> {
        Arguments {
            invocation: self,
            position: 0,
        }
    }

    /// Take ownership of the arguments
    #[inline]
    #[must_use]
    pub fn into_arguments(self) -> Vec<Value> {
        self.arguments
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.operation)?;
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}

/// Positional reader used by routing code
///
/// Surplus arguments are left unread; arity is the caller's responsibility.
#[derive(Debug)]
pub struct Arguments<'a> {
    invocation: &'a Invocation,
    position: usize,
}

impl Arguments<'_> {
    /// Read the next argument as `T`
    ///
    /// # Errors
    /// - [`InvocationError::MissingArgument`] past the last argument
    /// - [`InvocationError::ArgumentMismatch`] when the value does not fit `T`
    pub fn read<T: ContractValue>(&mut self, parameter: &str) -> InvocationResult<T> {
        let index = self.position;
        self.position += 1;

        let value = self.invocation.argument(index).ok_or_else(|| {
            InvocationError::MissingArgument {
                operation: self.invocation.operation().to_string(),
                parameter: parameter.to_string(),
                index,
            }
        })?;

        T::from_value(value.clone()).map_err(|mismatch| InvocationError::ArgumentMismatch {
            operation: self.invocation.operation().to_string(),
            parameter: parameter.to_string(),
            index,
            mismatch,
        })
    }

    /// Arguments not yet read
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.invocation.arity().saturating_sub(self.position)
    }
}

/// Lifecycle of a single call
///
/// Phases are per-call and never persist past the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InvocationPhase {
    /// Built by the proxy, dispatch not yet entered
    #[default]
    Pending,

    /// Handler entered, result not yet finalized
    Delegating,

    /// Result or failure finalized
    Completed,
}

impl fmt::Display for InvocationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Delegating => f.write_str("delegating"),
            Self::Completed => f.write_str("completed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueType;

    fn set_data(arguments: Vec<Value>) -> Invocation {
        Invocation::new("set_data", arguments)
    }

    #[test]
    fn invocation_accessors() {
        let inv = set_data(vec![Value::from("other valid data")]);
        assert_eq!(inv.operation(), "set_data");
        assert!(inv.is("set_data"));
        assert_eq!(inv.arity(), 1);
        assert_eq!(inv.argument(0).and_then(Value::as_str), Some("other valid data"));
        assert!(inv.argument(1).is_none());
    }

    #[test]
    fn invocation_display() {
        let inv = Invocation::new("put", vec![Value::from("k"), Value::Int(3)]);
        assert_eq!(inv.to_string(), r#"put("k", 3)"#);
    }

    #[test]
    fn reader_reads_in_order() {
        let inv = Invocation::new("put", vec![Value::from("k"), Value::Int(3)]);
        let mut args = inv.reader();

        let key: String = args.read("key").unwrap();
        let count: u32 = args.read("count").unwrap();

        assert_eq!(key, "k");
        assert_eq!(count, 3);
        assert_eq!(args.remaining(), 0);
    }

    #[test]
    fn reader_reports_missing_argument() {
        let inv = set_data(vec![]);
        let err = inv.reader().read::<String>("data").unwrap_err();

        assert!(matches!(
            err,
            InvocationError::MissingArgument { index: 0, ref parameter, .. } if parameter == "data"
        ));
    }

    #[test]
    fn reader_reports_mismatch() {
        let inv = set_data(vec![Value::Int(1)]);
        let err = inv.reader().read::<String>("data").unwrap_err();

        let InvocationError::ArgumentMismatch { mismatch, .. } = err else {
            panic!("expected argument mismatch");
        };
        assert_eq!(mismatch.expected, ValueType::Str);
        assert_eq!(mismatch.found, "int");
    }

    #[test]
    fn phase_defaults_to_pending() {
        assert_eq!(InvocationPhase::default(), InvocationPhase::Pending);
        assert_eq!(InvocationPhase::Completed.to_string(), "completed");
    }
}
