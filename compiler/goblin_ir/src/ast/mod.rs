//! Syntax tree for one Goblin source file.
//!
//! # Module Structure
//!
//! - `operators`: Binary and unary operators
//! - `expr`: Expressions and literals
//! - `stmt`: Statements, function definitions and the `Program` root

mod expr;
mod operators;
mod stmt;

pub use expr::{Expression, Literal};
pub use operators::{BinaryOp, UnaryOp};
pub use stmt::{block_guarantees_return, FunctionDefine, Program, Statement};
