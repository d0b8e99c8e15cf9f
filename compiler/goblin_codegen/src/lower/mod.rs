//! Lowering Goblin syntax trees to Rust source text.
//!
//! Expressions lower to a [`Lowered`] pair: the statements that must run
//! first, and a Rust expression for the final value. Every fallible runtime
//! call becomes its own statement,
//!
//! ```text
//! let _t3 = match _t1.add(&_t2) { Ok(value) => value, Err(err) => return Err(err) };
//! ```
//!
//! so errors are checked immediately after the step that produced them and
//! evaluation order follows source order. What happens on error is the
//! [`ErrorHandler`] of the body being lowered.
//!
//! Statements write straight into the context's output buffer.

mod expr;
mod stmt;

pub use expr::lower_expr;
pub use stmt::{lower_block, lower_module_body};

/// What generated code does with a runtime error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorHandler {
    /// Return the error to the caller. Used in module executors and
    /// function closures.
    Propagate,
    /// Report and exit. Used only at the process entry point.
    Fatal,
}

impl ErrorHandler {
    /// The Rust expression run with `err` in scope.
    pub fn on_error(self) -> &'static str {
        match self {
            ErrorHandler::Propagate => "return Err(err)",
            ErrorHandler::Fatal => "goblin_rt::fatal(err)",
        }
    }

    /// `let <binding> = match <call> { ... };`
    pub fn bind(self, binding: &str, call: &str) -> String {
        format!(
            "let {binding} = match {call} {{ Ok(value) => value, Err(err) => {} }};",
            self.on_error()
        )
    }
}

/// A lowered expression.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Lowered {
    /// Statements to emit, in order, before `value` is used.
    pub stmts: Vec<String>,
    /// Rust expression of type `Value`. Side-effect free: every call has
    /// already been hoisted into `stmts`.
    pub value: String,
}

impl Lowered {
    pub fn pure(value: impl Into<String>) -> Self {
        Self {
            stmts: Vec::new(),
            value: value.into(),
        }
    }

    /// Append `other`'s statements and hand back its value.
    fn absorb(&mut self, other: Lowered) -> String {
        self.stmts.extend(other.stmts);
        other.value
    }
}

/// A Rust string literal with the same contents as `s`.
pub fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:x}}}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// A Rust `f64` expression for `f`.
pub fn float_literal(f: f64) -> String {
    if f.is_nan() {
        "f64::NAN".to_string()
    } else if f.is_infinite() {
        let name = if f > 0.0 { "f64::INFINITY" } else { "f64::NEG_INFINITY" };
        name.to_string()
    } else {
        // Debug formatting always keeps a decimal point or exponent.
        format!("{f:?}")
    }
}

/// A Rust `i64` expression for `n`.
pub fn integer_literal(n: i64) -> String {
    if n == i64::MIN {
        "i64::MIN".to_string()
    } else {
        n.to_string()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
