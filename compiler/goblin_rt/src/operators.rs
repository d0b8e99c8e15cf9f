//! Arithmetic, logical and comparison operations on values.
//!
//! Direct enum dispatch: the type set is closed, so each operation is one
//! match over the operand pair. Integer arithmetic is checked; a Float on
//! either side promotes the whole operation to Float.

use std::cmp::Ordering;

use crate::errors::{
    binary_type_mismatch, division_by_zero, integer_overflow, invalid_logical_op,
    negative_repeat, not_comparable, Error, RtResult,
};
use crate::value::Value;

/// Checked arithmetic operation with overflow handling.
#[inline]
fn checked_arith(result: Option<i64>, op_name: &'static str) -> RtResult {
    result.map(Value::Integer).ok_or_else(|| integer_overflow(op_name))
}

/// Both operands as `f64`, when both are numeric.
#[inline]
fn as_float_pair(left: &Value, right: &Value) -> Option<(f64, f64)> {
    #[expect(clippy::cast_precision_loss, reason = "Integer to Float promotion")]
    fn to_f64(v: &Value) -> Option<f64> {
        match v {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
    Some((to_f64(left)?, to_f64(right)?))
}

/// `count` copies of `items`, for `List * Integer`.
///
/// A result too large to allocate is an overflow error rather than an
/// abort.
fn repeat_list(items: &[Value], count: usize) -> Result<Vec<Value>, Error> {
    if items.is_empty() {
        return Ok(Vec::new());
    }
    let total = items
        .len()
        .checked_mul(count)
        .ok_or_else(|| integer_overflow("multiplication"))?;
    let mut out = Vec::new();
    out.try_reserve_exact(total)
        .map_err(|_| integer_overflow("multiplication"))?;
    for _ in 0..count {
        out.extend_from_slice(items);
    }
    Ok(out)
}

/// `count` copies of `s`, for `String * Integer`.
fn repeat_str(s: &str, count: usize) -> Result<String, Error> {
    if s.is_empty() {
        return Ok(String::new());
    }
    let total = s
        .len()
        .checked_mul(count)
        .ok_or_else(|| integer_overflow("multiplication"))?;
    let mut out = String::new();
    out.try_reserve_exact(total)
        .map_err(|_| integer_overflow("multiplication"))?;
    for _ in 0..count {
        out.push_str(s);
    }
    Ok(out)
}

impl Value {
    pub fn add(&self, other: &Value) -> RtResult {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => checked_arith(a.checked_add(*b), "addition"),
            (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
                let (a, b) = float_pair(self, other, "add")?;
                Ok(Value::Float(a + b))
            }
            (Value::String(a), Value::String(_) | Value::Integer(_) | Value::Bool(_)) => {
                Ok(Value::string(format!("{a}{other}")))
            }
            (Value::Bool(_), Value::String(b)) => Ok(Value::string(format!("{self}{b}"))),
            (Value::List(a), Value::List(b)) => {
                let mut items = a.borrow().clone();
                items.extend(b.borrow().iter().cloned());
                Ok(Value::list(items))
            }
            _ => Err(binary_type_mismatch("add", self, other)),
        }
    }

    pub fn sub(&self, other: &Value) -> RtResult {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => {
                checked_arith(a.checked_sub(*b), "subtraction")
            }
            (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
                let (a, b) = float_pair(self, other, "subtract")?;
                Ok(Value::Float(a - b))
            }
            _ => Err(binary_type_mismatch("subtract", self, other)),
        }
    }

    pub fn mul(&self, other: &Value) -> RtResult {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => {
                checked_arith(a.checked_mul(*b), "multiplication")
            }
            (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
                let (a, b) = float_pair(self, other, "multiply")?;
                Ok(Value::Float(a * b))
            }
            (Value::String(s), Value::Integer(n)) => {
                if *n < 0 {
                    return Err(negative_repeat(self));
                }
                let count = usize::try_from(*n).map_err(|_| integer_overflow("multiplication"))?;
                Ok(Value::string(repeat_str(s, count)?))
            }
            (Value::List(items), Value::Integer(n)) => {
                if *n < 0 {
                    return Err(negative_repeat(self));
                }
                let count = usize::try_from(*n).map_err(|_| integer_overflow("multiplication"))?;
                let repeated = repeat_list(&items.borrow(), count)?;
                Ok(Value::list(repeated))
            }
            _ => Err(binary_type_mismatch("multiply", self, other)),
        }
    }

    /// Division. Integer division truncates toward zero; a zero divisor is
    /// an error for Integer and Float alike.
    pub fn div(&self, other: &Value) -> RtResult {
        match (self, other) {
            (Value::Integer(_), Value::Integer(0)) => Err(division_by_zero()),
            (Value::Integer(a), Value::Integer(b)) => checked_arith(a.checked_div(*b), "division"),
            (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
                let (a, b) = float_pair(self, other, "divide")?;
                if b == 0.0 {
                    return Err(division_by_zero());
                }
                Ok(Value::Float(a / b))
            }
            _ => Err(binary_type_mismatch("divide", self, other)),
        }
    }

    /// Logical and. Both operands are already evaluated.
    pub fn and(&self, other: &Value) -> RtResult {
        self.check_logical("AND")?;
        Ok(Value::Bool(self.truthy() && other.truthy()))
    }

    /// Logical or. Both operands are already evaluated.
    pub fn or(&self, other: &Value) -> RtResult {
        self.check_logical("OR")?;
        Ok(Value::Bool(self.truthy() || other.truthy()))
    }

    pub fn not(&self) -> RtResult {
        self.check_logical("NOT")?;
        Ok(Value::Bool(!self.truthy()))
    }

    fn check_logical(&self, op: &'static str) -> Result<(), Error> {
        match self {
            Value::Function(_) | Value::Namespace(_) => Err(invalid_logical_op(op, self)),
            _ => Ok(()),
        }
    }

    /// Three-way comparison within a type family.
    ///
    /// Numbers compare with numbers (mixed pairs as `f64`), strings with
    /// strings. Any other pairing, and any comparison involving NaN, is an
    /// error.
    pub fn compare(&self, other: &Value) -> Result<Ordering, Error> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Ok(a.cmp(b)),
            (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
                let (a, b) = as_float_pair(self, other).ok_or_else(|| not_comparable(self, other))?;
                a.partial_cmp(&b).ok_or_else(|| not_comparable(self, other))
            }
            (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
            _ => Err(not_comparable(self, other)),
        }
    }
}

#[inline]
fn float_pair(left: &Value, right: &Value, verb: &'static str) -> Result<(f64, f64), Error> {
    as_float_pair(left, right).ok_or_else(|| binary_type_mismatch(verb, left, right))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
