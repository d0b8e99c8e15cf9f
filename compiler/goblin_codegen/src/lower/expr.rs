//! Expression lowering.

use goblin_ir::{BinaryOp, Expression, Literal, UnaryOp};
use goblin_rt::stdlib;

use super::{float_literal, integer_literal, string_literal, Lowered};
use crate::context::CodegenContext;
use crate::error::CodegenError;
use crate::stack::ensure_sufficient_stack;

/// Lower `expr`, returning its preparatory statements and value.
pub fn lower_expr(ctx: &mut CodegenContext, expr: &Expression) -> Result<Lowered, CodegenError> {
    ensure_sufficient_stack(|| {
        let mut out = Lowered::default();
        let value = lower_into(ctx, &mut out, expr)?;
        out.value = value;
        Ok(out)
    })
}

fn lower_into(
    ctx: &mut CodegenContext,
    out: &mut Lowered,
    expr: &Expression,
) -> Result<String, CodegenError> {
    match expr {
        Expression::Literal(lit) => Ok(literal(lit)),

        Expression::Identifier { name } => read_name(ctx, out, name),

        Expression::FunctionCall { name, args } => {
            let callee = if stdlib::is_builtin(name) {
                builtin(ctx, out, name)
            } else {
                read_binding(ctx, out, name)?
            };
            call(ctx, out, &callee, args)
        }

        Expression::CallExpression { callee, args } => {
            let callee = out.absorb(lower_expr(ctx, callee)?);
            call(ctx, out, &callee, args)
        }

        Expression::BinaryOperation { lhs, op, rhs } => {
            let lhs = out.absorb(lower_expr(ctx, lhs)?);
            let rhs = out.absorb(lower_expr(ctx, rhs)?);
            Ok(binary(ctx, out, &lhs, *op, &rhs))
        }

        Expression::UnaryOperation {
            op: UnaryOp::Not,
            operand,
        } => {
            let operand = out.absorb(lower_expr(ctx, operand)?);
            Ok(checked(ctx, out, &format!("{operand}.not()")))
        }

        Expression::ListLiteral { elements } => {
            let values = lower_all(ctx, out, elements)?;
            Ok(format!("Value::list(vec![{}])", values.join(", ")))
        }

        Expression::DictLiteral { entries } => {
            if entries.is_empty() {
                return Ok("Value::dict(goblin_rt::Dict::new())".to_string());
            }
            let mut pairs = Vec::with_capacity(entries.len());
            for (key, value) in entries {
                let key = out.absorb(lower_expr(ctx, key)?);
                let value = out.absorb(lower_expr(ctx, value)?);
                pairs.push(format!("({key}, {value})"));
            }
            Ok(format!("Value::dict_from([{}])", pairs.join(", ")))
        }

        Expression::IndexExpression { object, index } => {
            let object = out.absorb(lower_expr(ctx, object)?);
            let index = out.absorb(lower_expr(ctx, index)?);
            Ok(checked(ctx, out, &format!("{object}.index(&{index})")))
        }

        Expression::MemberExpression { object, property } => {
            let object = out.absorb(lower_expr(ctx, object)?);
            Ok(checked(
                ctx,
                out,
                &format!("{object}.get_attr({})", string_literal(property)),
            ))
        }
    }
}

fn literal(lit: &Literal) -> String {
    match lit {
        Literal::Integer(n) => format!("Value::Integer({})", integer_literal(*n)),
        Literal::Float(f) => format!("Value::Float({})", float_literal(*f)),
        Literal::String(s) => format!("Value::string({})", string_literal(s)),
        Literal::Bool(b) => format!("Value::Bool({b})"),
        Literal::Nil => "Value::Unit".to_string(),
    }
}

/// Emit a fallible call into a fresh temp and return the temp.
pub(super) fn checked(ctx: &mut CodegenContext, out: &mut Lowered, call: &str) -> String {
    let temp = ctx.fresh_temp();
    out.stmts.push(ctx.handler().bind(&temp, call));
    temp
}

/// A variable read. Bound names shadow builtins.
fn read_name(
    ctx: &mut CodegenContext,
    out: &mut Lowered,
    name: &str,
) -> Result<String, CodegenError> {
    if !ctx.is_declared(name) && stdlib::is_builtin(name) {
        return Ok(builtin(ctx, out, name));
    }
    read_binding(ctx, out, name)
}

/// Snapshot a binding into a temp, so later operands cannot change what
/// this one read.
fn read_binding(
    ctx: &mut CodegenContext,
    out: &mut Lowered,
    name: &str,
) -> Result<String, CodegenError> {
    if !ctx.is_declared(name) {
        return Err(CodegenError::UndefinedName {
            module: ctx.module().to_string(),
            name: name.to_string(),
        });
    }
    let temp = ctx.fresh_temp();
    out.stmts.push(format!(
        "let {temp} = {}.get();",
        CodegenContext::mangle(name)
    ));
    Ok(temp)
}

fn builtin(ctx: &mut CodegenContext, out: &mut Lowered, name: &str) -> String {
    checked(
        ctx,
        out,
        &format!("goblin_rt::stdlib::builtin({})", string_literal(name)),
    )
}

fn lower_all(
    ctx: &mut CodegenContext,
    out: &mut Lowered,
    exprs: &[Expression],
) -> Result<Vec<String>, CodegenError> {
    let mut values = Vec::with_capacity(exprs.len());
    for expr in exprs {
        values.push(out.absorb(lower_expr(ctx, expr)?));
    }
    Ok(values)
}

fn call(
    ctx: &mut CodegenContext,
    out: &mut Lowered,
    callee: &str,
    args: &[Expression],
) -> Result<String, CodegenError> {
    let args = lower_all(ctx, out, args)?;
    Ok(checked(
        ctx,
        out,
        &format!("{callee}.call(&[{}], &KwArgs::default())", args.join(", ")),
    ))
}

fn binary(
    ctx: &mut CodegenContext,
    out: &mut Lowered,
    lhs: &str,
    op: BinaryOp,
    rhs: &str,
) -> String {
    let method = match op {
        BinaryOp::Add => "add",
        BinaryOp::Sub => "sub",
        BinaryOp::Mul => "mul",
        BinaryOp::Div => "div",
        BinaryOp::And => "and",
        BinaryOp::Or => "or",
        BinaryOp::Eq
        | BinaryOp::NotEq
        | BinaryOp::Lt
        | BinaryOp::Gt
        | BinaryOp::LtEq
        | BinaryOp::GtEq => {
            // Ordering is repr(i8): Less = -1, Equal = 0, Greater = 1.
            let ordering = checked(ctx, out, &format!("{lhs}.compare(&{rhs})"));
            return format!("Value::Bool(({ordering} as i8) {} 0)", op.as_symbol());
        }
    };
    checked(ctx, out, &format!("{lhs}.{method}(&{rhs})"))
}
