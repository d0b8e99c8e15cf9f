//! The `os` namespace.

use crate::errors::{arity_mismatch, host_error, invalid_argument, RtResult};
use crate::value::{KwArgs, Value};

fn no_args(name: &str, args: &[Value]) -> Result<(), crate::Error> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(arity_mismatch(format!("{name}() requires no arguments")))
    }
}

fn one_arg(name: &str, args: &[Value]) -> Result<(), crate::Error> {
    if args.len() == 1 {
        Ok(())
    } else {
        Err(arity_mismatch(format!("{name}() requires exactly 1 argument")))
    }
}

/// `os.exit(code)`. Does not return on success.
pub(super) fn exit(args: &[Value], _kwargs: &KwArgs) -> RtResult {
    one_arg("exit", args)?;
    let Value::Integer(code) = args[0] else {
        return Err(invalid_argument("exit() argument must be an integer"));
    };
    tracing::debug!(code, "os.exit");
    // Statuses wider than i32 are truncated, as the OS would.
    #[expect(clippy::cast_possible_truncation, reason = "exit status truncation")]
    let status = code as i32;
    std::process::exit(status)
}

/// `os.getenv(name)`. An unset variable reads as the empty string.
pub(super) fn getenv(args: &[Value], _kwargs: &KwArgs) -> RtResult {
    one_arg("getenv", args)?;
    let key = args[0]
        .as_str()
        .ok_or_else(|| invalid_argument("getenv() argument must be a string"))?;
    let value = std::env::var_os(key)
        .map(|v| v.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Value::string(value))
}

pub(super) fn getpid(args: &[Value], _kwargs: &KwArgs) -> RtResult {
    no_args("getpid", args)?;
    Ok(Value::Integer(i64::from(std::process::id())))
}

pub(super) fn getppid(args: &[Value], _kwargs: &KwArgs) -> RtResult {
    no_args("getppid", args)?;
    parent_pid().map(Value::Integer)
}

pub(super) fn getuid(args: &[Value], _kwargs: &KwArgs) -> RtResult {
    no_args("getuid", args)?;
    real_uid().map(Value::Integer)
}

#[cfg(unix)]
fn parent_pid() -> Result<i64, crate::Error> {
    Ok(i64::from(std::os::unix::process::parent_id()))
}

#[cfg(not(unix))]
fn parent_pid() -> Result<i64, crate::Error> {
    Err(host_error("getppid() is not supported on this platform"))
}

/// Real user id, from the `Uid:` line of `/proc/self/status`.
#[cfg(target_os = "linux")]
fn real_uid() -> Result<i64, crate::Error> {
    let status = std::fs::read_to_string("/proc/self/status")
        .map_err(|e| host_error(format!("getuid(): {e}")))?;
    status
        .lines()
        .find_map(|line| line.strip_prefix("Uid:"))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|uid| uid.parse::<i64>().ok())
        .ok_or_else(|| host_error("getuid(): malformed /proc/self/status"))
}

#[cfg(not(target_os = "linux"))]
fn real_uid() -> Result<i64, crate::Error> {
    Err(host_error("getuid() is not supported on this platform"))
}
