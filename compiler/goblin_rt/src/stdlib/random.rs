//! The `random` namespace.
//!
//! One generator per thread, seeded from the system clock the first time
//! any `random` function runs.

use std::cell::RefCell;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::errors::{arity_mismatch, invalid_argument, RtResult};
use crate::value::{KwArgs, Value};

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| {
            d.as_secs()
                .wrapping_mul(1_000_000_000)
                .wrapping_add(u64::from(d.subsec_nanos()))
        })
        .unwrap_or_default()
}

thread_local! {
    static RNG: RefCell<StdRng> = RefCell::new(StdRng::seed_from_u64(clock_seed()));
}

fn with_rng<T>(f: impl FnOnce(&mut StdRng) -> T) -> T {
    RNG.with(|rng| f(&mut rng.borrow_mut()))
}

/// `random.int()`: any Integer.
pub(super) fn int(args: &[Value], _kwargs: &KwArgs) -> RtResult {
    if !args.is_empty() {
        return Err(arity_mismatch("int() requires no arguments"));
    }
    Ok(Value::Integer(with_rng(|rng| rng.gen::<i64>())))
}

/// `random.intn(n)`: an Integer in `[0, n)`.
pub(super) fn intn(args: &[Value], _kwargs: &KwArgs) -> RtResult {
    if args.len() != 1 {
        return Err(arity_mismatch("intn() requires exactly 1 argument"));
    }
    let Value::Integer(n) = args[0] else {
        return Err(invalid_argument(format!(
            "intn() argument must be an integer, got {}",
            args[0].type_name()
        )));
    };
    if n <= 0 {
        return Err(invalid_argument(format!(
            "intn() argument must be positive, got {n}"
        )));
    }
    Ok(Value::Integer(with_rng(|rng| rng.gen_range(0..n))))
}

/// `random.float()`: a Float in `[0, 1)`.
pub(super) fn float(args: &[Value], _kwargs: &KwArgs) -> RtResult {
    if !args.is_empty() {
        return Err(arity_mismatch("float() requires no arguments"));
    }
    Ok(Value::Float(with_rng(|rng| rng.gen::<f64>())))
}
