//! Runtime error types.
//!
//! Every value operation and native function returns `Result<_, Error>`.
//! `ErrorKind` carries the structured category; its `Display` output is the
//! message a generated program prints before exiting, and native-function
//! wording in particular is relied on by compatibility tests.
//!
//! Factory functions (e.g. `division_by_zero()`) are the public API for
//! building errors.

use crate::value::Value;

/// Result of a runtime operation.
pub type RtResult = Result<Value, Error>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    // Arithmetic
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow in {operation}")]
    IntegerOverflow { operation: &'static str },
    #[error("cannot multiply {type_name} by negative number")]
    NegativeRepeat { type_name: &'static str },

    // Type/Operator
    #[error("cannot {verb} {left} and {right}")]
    BinaryTypeMismatch {
        verb: &'static str,
        left: &'static str,
        right: &'static str,
    },
    #[error("cannot compare {left} and {right}")]
    NotComparable {
        left: &'static str,
        right: &'static str,
    },
    #[error("cannot perform {op} on {type_name}")]
    InvalidLogicalOp {
        op: &'static str,
        type_name: &'static str,
    },

    // Access
    #[error("{type_name} does not support iteration")]
    NotIterable { type_name: &'static str },
    #[error("{type_name} is not indexable")]
    NotIndexable { type_name: &'static str },
    #[error("list indices must be integers, got {got}")]
    InvalidIndexType { got: &'static str },
    #[error("index {index} out of range")]
    IndexOutOfRange { index: i64 },
    #[error("key not found: {key}")]
    KeyNotFound { key: String },
    #[error("{type_name} has no attribute '{name}'")]
    UndefinedAttribute {
        type_name: &'static str,
        name: String,
    },
    #[error("module '{module}' has no attribute '{name}'")]
    UndefinedMember { module: String, name: String },

    // Function
    #[error("{repr} is not callable")]
    NotCallable { repr: String },
    /// Wrong number of arguments; the message is the callee's own wording.
    #[error("{message}")]
    ArityMismatch { message: String },
    /// Argument of the wrong type or out of its domain.
    #[error("{message}")]
    InvalidArgument { message: String },

    /// Host facility failure (environment, process information).
    #[error("{message}")]
    Host { message: String },
}

/// A runtime error surfaced to generated code.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The user-facing message.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

// Factory functions

#[cold]
pub fn division_by_zero() -> Error {
    ErrorKind::DivisionByZero.into()
}

#[cold]
pub fn integer_overflow(operation: &'static str) -> Error {
    ErrorKind::IntegerOverflow { operation }.into()
}

#[cold]
pub fn negative_repeat(value: &Value) -> Error {
    ErrorKind::NegativeRepeat {
        type_name: value.type_name(),
    }
    .into()
}

#[cold]
pub fn binary_type_mismatch(verb: &'static str, left: &Value, right: &Value) -> Error {
    ErrorKind::BinaryTypeMismatch {
        verb,
        left: left.type_name(),
        right: right.type_name(),
    }
    .into()
}

#[cold]
pub fn not_comparable(left: &Value, right: &Value) -> Error {
    ErrorKind::NotComparable {
        left: left.type_name(),
        right: right.type_name(),
    }
    .into()
}

#[cold]
pub fn invalid_logical_op(op: &'static str, value: &Value) -> Error {
    ErrorKind::InvalidLogicalOp {
        op,
        type_name: value.type_name(),
    }
    .into()
}

#[cold]
pub fn not_iterable(value: &Value) -> Error {
    ErrorKind::NotIterable {
        type_name: value.type_name(),
    }
    .into()
}

#[cold]
pub fn not_indexable(value: &Value) -> Error {
    ErrorKind::NotIndexable {
        type_name: value.type_name(),
    }
    .into()
}

#[cold]
pub fn invalid_index_type(index: &Value) -> Error {
    ErrorKind::InvalidIndexType {
        got: index.type_name(),
    }
    .into()
}

#[cold]
pub fn index_out_of_range(index: i64) -> Error {
    ErrorKind::IndexOutOfRange { index }.into()
}

#[cold]
pub fn key_not_found(key: &Value) -> Error {
    ErrorKind::KeyNotFound {
        key: key.to_string(),
    }
    .into()
}

#[cold]
pub fn undefined_attribute(value: &Value, name: &str) -> Error {
    ErrorKind::UndefinedAttribute {
        type_name: value.type_name(),
        name: name.to_string(),
    }
    .into()
}

#[cold]
pub fn undefined_member(module: &str, name: &str) -> Error {
    ErrorKind::UndefinedMember {
        module: module.to_string(),
        name: name.to_string(),
    }
    .into()
}

#[cold]
pub fn not_callable(value: &Value) -> Error {
    ErrorKind::NotCallable {
        repr: format!("{value:?}"),
    }
    .into()
}

#[cold]
pub fn arity_mismatch(message: impl Into<String>) -> Error {
    ErrorKind::ArityMismatch {
        message: message.into(),
    }
    .into()
}

#[cold]
pub fn invalid_argument(message: impl Into<String>) -> Error {
    ErrorKind::InvalidArgument {
        message: message.into(),
    }
    .into()
}

#[cold]
pub fn host_error(message: impl Into<String>) -> Error {
    ErrorKind::Host {
        message: message.into(),
    }
    .into()
}

/// `<name>() takes exactly <n> argument(s), got <m>`
///
/// The wording used by methods and user-defined functions.
#[cold]
pub fn wrong_argument_count(name: &str, expected: usize, got: usize) -> Error {
    let arg_word = if expected == 1 {
        "argument"
    } else {
        "arguments"
    };
    arity_mismatch(format!(
        "{name}() takes exactly {expected} {arg_word}, got {got}"
    ))
}
