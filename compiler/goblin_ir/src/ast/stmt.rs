//! Statements, function definitions and the program root.

use super::expr::{Expression, Literal};

/// Root of one parsed source file.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    /// Module name, usually the file stem.
    pub name: String,
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new(name: impl Into<String>, statements: Vec<Statement>) -> Self {
        Self {
            name: name.into(),
            statements,
        }
    }
}

/// Statement node.
#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    /// `var name = expr`
    Declare { name: String, expr: Expression },

    /// `target = expr`
    Assign { target: String, expr: Expression },

    IfElse {
        cond: Expression,
        then_body: Vec<Statement>,
        else_body: Vec<Statement>,
    },

    While {
        cond: Expression,
        body: Vec<Statement>,
    },

    /// `for variable in iterable { body }`
    For {
        variable: String,
        iterable: Expression,
        body: Vec<Statement>,
    },

    Break,

    Return { expr: Expression },

    FunctionDefine(FunctionDefine),

    /// `export name`
    Export { name: String },

    /// `import local_name "path"`
    Import { local_name: String, path: String },

    /// An expression evaluated for its side effects.
    Expression(Expression),
}

impl From<Expression> for Statement {
    fn from(expr: Expression) -> Self {
        Self::Expression(expr)
    }
}

impl From<FunctionDefine> for Statement {
    fn from(def: FunctionDefine) -> Self {
        Self::FunctionDefine(def)
    }
}

impl Statement {
    pub fn declare(name: impl Into<String>, expr: Expression) -> Self {
        Self::Declare {
            name: name.into(),
            expr,
        }
    }

    pub fn assign(target: impl Into<String>, expr: Expression) -> Self {
        Self::Assign {
            target: target.into(),
            expr,
        }
    }

    pub fn ret(expr: Expression) -> Self {
        Self::Return { expr }
    }

    pub fn export(name: impl Into<String>) -> Self {
        Self::Export { name: name.into() }
    }

    pub fn import(local_name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Import {
            local_name: local_name.into(),
            path: path.into(),
        }
    }

    /// Whether executing this statement always ends in a `return`.
    ///
    /// Only a `return` itself, or an `if` whose branches both guarantee a
    /// return, qualifies. Loops never do: their body may run zero times.
    pub fn guarantees_return(&self) -> bool {
        match self {
            Self::Return { .. } => true,
            Self::IfElse {
                then_body,
                else_body,
                ..
            } => block_guarantees_return(then_body) && block_guarantees_return(else_body),
            _ => false,
        }
    }
}

/// A block guarantees a return when its last statement does.
pub fn block_guarantees_return(body: &[Statement]) -> bool {
    body.last().is_some_and(Statement::guarantees_return)
}

/// A named function definition.
///
/// The body always ends on a guaranteed return: [`FunctionDefine::new`]
/// appends `return nil` when the parsed body does not already guarantee one.
/// Fields are private so that no other constructor can skip this.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDefine {
    name: String,
    params: Vec<String>,
    body: Vec<Statement>,
}

impl FunctionDefine {
    pub fn new(name: impl Into<String>, params: Vec<String>, mut body: Vec<Statement>) -> Self {
        if !block_guarantees_return(&body) {
            body.push(Statement::Return {
                expr: Expression::Literal(Literal::Nil),
            });
        }
        Self {
            name: name.into(),
            params,
            body,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn body(&self) -> &[Statement] {
        &self.body
    }
}
