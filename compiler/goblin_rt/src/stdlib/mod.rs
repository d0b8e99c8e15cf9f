//! Native function library.
//!
//! Three fixed, name-addressed groups of native functions:
//!
//! - builtins (`print`, `range`, `max`, `min`), callable unqualified;
//! - the `os` namespace;
//! - the `random` namespace.
//!
//! Names and error wording are observable behavior of generated programs.
//! Each native checks its argument count and types before doing any work.

mod builtins;
mod os;
mod random;

use crate::errors::{undefined_member, wrong_argument_count, Error, RtResult};
use crate::value::{KwArgs, Members, Value};

/// Signature shared by every native function.
pub type NativeFnPtr = fn(&[Value], &KwArgs) -> RtResult;

/// Names callable without qualification.
pub const BUILTIN_NAMES: &[&str] = &["print", "range", "max", "min"];

/// Names accepted by `import` without a path.
pub const NAMESPACE_NAMES: &[&str] = &["os", "random"];

const BUILTINS: &[(&str, NativeFnPtr)] = &[
    ("print", builtins::print),
    ("range", builtins::range),
    ("max", builtins::max),
    ("min", builtins::min),
];

const OS: &[(&str, NativeFnPtr)] = &[
    ("exit", os::exit),
    ("getenv", os::getenv),
    ("getpid", os::getpid),
    ("getppid", os::getppid),
    ("getuid", os::getuid),
];

const RANDOM: &[(&str, NativeFnPtr)] = &[
    ("int", random::int),
    ("intn", random::intn),
    ("float", random::float),
];

pub fn is_builtin(name: &str) -> bool {
    BUILTIN_NAMES.contains(&name)
}

pub fn is_namespace(name: &str) -> bool {
    NAMESPACE_NAMES.contains(&name)
}

fn table_namespace(name: &str, table: &[(&str, NativeFnPtr)]) -> Value {
    let members: Members = table
        .iter()
        .map(|&(member, f)| (member.to_string(), Value::function(member, f)))
        .collect();
    Value::namespace(name, members)
}

/// Look up a builtin by name.
pub fn builtin(name: &str) -> RtResult {
    BUILTINS
        .iter()
        .find(|(builtin, _)| *builtin == name)
        .map(|&(builtin, f)| Value::function(builtin, f))
        .ok_or_else(|| undefined_member("builtins", name))
}

/// A native namespace (`os` or `random`) by import name.
pub fn namespace(name: &str) -> RtResult {
    match name {
        "os" => Ok(table_namespace("os", OS)),
        "random" => Ok(table_namespace("random", RANDOM)),
        _ => Err(undefined_member("builtins", name)),
    }
}

/// Arity check for user-defined functions.
#[inline]
pub fn check_arity(name: &str, args: &[Value], expected: usize) -> Result<(), Error> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(wrong_argument_count(name, expected, args.len()))
    }
}

/// Report an unhandled error and terminate the process.
///
/// Used only by a generated program's entry point.
#[cold]
pub fn fatal(err: Error) -> ! {
    eprintln!("error: {err}");
    std::process::exit(1)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
