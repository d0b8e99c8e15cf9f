//! Unqualified builtins: `print`, `range`, `max`, `min`.

use std::cmp::Ordering;
use std::io::Write;

use crate::errors::{arity_mismatch, host_error, invalid_argument, wrong_argument_count, RtResult};
use crate::value::{KwArgs, Value};

/// Write the display form of each argument, space separated, then a newline.
pub(super) fn print(args: &[Value], _kwargs: &KwArgs) -> RtResult {
    let line: Vec<String> = args.iter().map(Value::display).collect();
    let mut out = std::io::stdout().lock();
    writeln!(out, "{}", line.join(" ")).map_err(|e| host_error(format!("print(): {e}")))?;
    Ok(Value::Unit)
}

/// `range(start, end)`: the integers in `[start, end)`.
pub(super) fn range(args: &[Value], _kwargs: &KwArgs) -> RtResult {
    if args.len() != 2 {
        return Err(wrong_argument_count("range", 2, args.len()));
    }
    let start = args[0].as_int().ok_or_else(|| {
        invalid_argument(format!(
            "range() first argument must be an integer, got {}",
            args[0].type_name()
        ))
    })?;
    let end = args[1].as_int().ok_or_else(|| {
        invalid_argument(format!(
            "range() second argument must be an integer, got {}",
            args[1].type_name()
        ))
    })?;
    if end <= start {
        return Ok(Value::list(Vec::new()));
    }
    let too_large = || invalid_argument(format!("range({start}, {end}) is too large"));
    let len = end
        .checked_sub(start)
        .and_then(|len| usize::try_from(len).ok())
        .ok_or_else(too_large)?;
    let mut items = Vec::new();
    items.try_reserve_exact(len).map_err(|_| too_large())?;
    items.extend((start..end).map(Value::Integer));
    Ok(Value::list(items))
}

pub(super) fn max(args: &[Value], _kwargs: &KwArgs) -> RtResult {
    extremum("max", args, Ordering::Greater)
}

pub(super) fn min(args: &[Value], _kwargs: &KwArgs) -> RtResult {
    extremum("min", args, Ordering::Less)
}

/// Shared body of `max` and `min`: keeps the argument that orders `want`
/// against the best so far.
///
/// Any Float argument switches the whole computation to `f64` and the
/// result is a Float; otherwise the result is an Integer.
fn extremum(name: &str, args: &[Value], want: Ordering) -> RtResult {
    if args.is_empty() {
        return Err(arity_mismatch(format!(
            "{name}() requires at least 1 argument"
        )));
    }

    let invalid = |i: usize, arg: &Value| {
        invalid_argument(format!(
            "{name}() argument {i}: invalid type {}",
            arg.type_name()
        ))
    };

    if args.iter().any(|arg| matches!(arg, Value::Float(_))) {
        let mut best = 0.0_f64;
        for (i, arg) in args.iter().enumerate() {
            #[expect(clippy::cast_precision_loss, reason = "Integer to Float promotion")]
            let x = match arg {
                Value::Float(f) => *f,
                Value::Integer(n) => *n as f64,
                _ => return Err(invalid(i, arg)),
            };
            if i == 0 || x.partial_cmp(&best) == Some(want) {
                best = x;
            }
        }
        return Ok(Value::Float(best));
    }

    let mut best = 0_i64;
    for (i, arg) in args.iter().enumerate() {
        let Value::Integer(n) = arg else {
            return Err(invalid(i, arg));
        };
        if i == 0 || n.cmp(&best) == want {
            best = *n;
        }
    }
    Ok(Value::Integer(best))
}
