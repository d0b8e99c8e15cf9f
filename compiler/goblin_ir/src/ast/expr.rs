//! Expressions and literals.

use super::operators::{BinaryOp, UnaryOp};

/// A literal value written directly in source.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    String(String),
    Bool(bool),
    /// The `nil` literal.
    Nil,
}

/// Expression node.
///
/// Every expression may also appear in statement position (see
/// [`Statement::Expression`](super::Statement::Expression)).
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Literal(Literal),

    /// Variable reference: `x`
    Identifier { name: String },

    /// Call by name: `print(x)`
    FunctionCall { name: String, args: Vec<Expression> },

    /// Call through an arbitrary expression: `util.square(4)`
    CallExpression {
        callee: Box<Expression>,
        args: Vec<Expression>,
    },

    BinaryOperation {
        lhs: Box<Expression>,
        op: BinaryOp,
        rhs: Box<Expression>,
    },

    UnaryOperation {
        op: UnaryOp,
        operand: Box<Expression>,
    },

    /// `[a, b, c]`
    ListLiteral { elements: Vec<Expression> },

    /// `{k: v, ...}`, entries kept in source order.
    DictLiteral {
        entries: Vec<(Expression, Expression)>,
    },

    /// `object[index]`
    IndexExpression {
        object: Box<Expression>,
        index: Box<Expression>,
    },

    /// `object.property`
    MemberExpression {
        object: Box<Expression>,
        property: String,
    },
}

// Builders. The parser and tests construct trees through these.

impl Expression {
    pub fn int(value: i64) -> Self {
        Self::Literal(Literal::Integer(value))
    }

    pub fn float(value: f64) -> Self {
        Self::Literal(Literal::Float(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(Literal::String(value.into()))
    }

    pub fn bool(value: bool) -> Self {
        Self::Literal(Literal::Bool(value))
    }

    pub fn nil() -> Self {
        Self::Literal(Literal::Nil)
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Self::Identifier { name: name.into() }
    }

    pub fn call(name: impl Into<String>, args: Vec<Expression>) -> Self {
        Self::FunctionCall {
            name: name.into(),
            args,
        }
    }

    pub fn call_expr(callee: Expression, args: Vec<Expression>) -> Self {
        Self::CallExpression {
            callee: Box::new(callee),
            args,
        }
    }

    /// `object.method(args)`, the shape the parser gives member calls.
    pub fn method_call(
        object: Expression,
        property: impl Into<String>,
        args: Vec<Expression>,
    ) -> Self {
        Self::call_expr(Self::member(object, property), args)
    }

    pub fn binary(lhs: Expression, op: BinaryOp, rhs: Expression) -> Self {
        Self::BinaryOperation {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        }
    }

    pub fn not(operand: Expression) -> Self {
        Self::UnaryOperation {
            op: UnaryOp::Not,
            operand: Box::new(operand),
        }
    }

    pub fn list(elements: Vec<Expression>) -> Self {
        Self::ListLiteral { elements }
    }

    pub fn dict(entries: Vec<(Expression, Expression)>) -> Self {
        Self::DictLiteral { entries }
    }

    pub fn index(object: Expression, index: Expression) -> Self {
        Self::IndexExpression {
            object: Box::new(object),
            index: Box::new(index),
        }
    }

    pub fn member(object: Expression, property: impl Into<String>) -> Self {
        Self::MemberExpression {
            object: Box::new(object),
            property: property.into(),
        }
    }
}
