//! Goblin IR - syntax tree types
//!
//! The parser produces a [`Program`] per source file; the code generator
//! consumes it. Every node kind is a closed enum so that adding a variant
//! forces a compile error at each lowering site until it is handled.
//!
//! Nodes are plain owned trees (`Box` for recursion). Goblin programs are
//! small, and the generator walks each tree exactly once.

pub mod ast;

pub use ast::{
    BinaryOp, Expression, FunctionDefine, Literal, Program, Statement, UnaryOp,
};
