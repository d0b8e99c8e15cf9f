//! Goblin runtime.
//!
//! Programs generated from Goblin sources link against this crate. It
//! provides:
//!
//! - [`Value`]: the dynamic value type and its operation contract
//!   (arithmetic, comparison, logical ops, iteration, indexing, attribute
//!   access, calls);
//! - [`Binding`]: the shared variable cell generated code declares variables
//!   with;
//! - [`Registry`]: the memoizing module cache;
//! - [`stdlib`]: the native functions (`print`, `range`, `max`, `min`, and the
//!   `os` and `random` namespaces).
//!
//! Every fallible operation returns `Result<Value, Error>`. Nothing here
//! panics on bad operands; only [`fatal`] and `os.exit` end the process.

mod access;
mod binding;
mod errors;
mod methods;
mod operators;
mod registry;
pub mod stdlib;
mod value;

pub use binding::Binding;
pub use errors::{
    arity_mismatch, binary_type_mismatch, division_by_zero, host_error, index_out_of_range,
    integer_overflow, invalid_argument, key_not_found, not_callable, undefined_attribute,
    undefined_member, wrong_argument_count, Error, ErrorKind, RtResult,
};
pub use registry::Registry;
pub use stdlib::{check_arity, fatal};
pub use value::{Dict, Function, KwArgs, Members, Namespace, NativeFn, Value};
