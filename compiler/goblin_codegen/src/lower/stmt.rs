//! Statement, function and module body lowering.

use goblin_ir::{FunctionDefine, Program, Statement};
use goblin_rt::stdlib;
use tracing::trace;

use super::expr::checked;
use super::{lower_expr, string_literal, ErrorHandler, Lowered};
use crate::context::{CodegenContext, FrameKind};
use crate::error::CodegenError;
use crate::resolve::is_path_import;
use crate::stack::ensure_sufficient_stack;

/// Lower a module's top-level statements into the body of its executor.
///
/// The returned text is indented one level and ends with the expression
/// building the module's namespace from its export table.
#[tracing::instrument(level = "debug", skip_all, fields(module = %ctx.module()))]
pub fn lower_module_body(
    ctx: &mut CodegenContext,
    program: &Program,
    name: &str,
) -> Result<String, CodegenError> {
    ctx.enter_frame(FrameKind::Module, ErrorHandler::Propagate);
    ctx.push_scope();
    ctx.indent();

    // Closures and imports below take owned handles to the same cache.
    ctx.writeln("let registry = registry.clone();");
    ctx.writeln("let mut exports = goblin_rt::Members::default();");
    lower_block(ctx, &program.statements)?;
    ctx.writeln(&format!(
        "Ok(Value::namespace({}, exports))",
        string_literal(name)
    ));

    ctx.dedent();
    ctx.pop_scope();
    ctx.exit_frame();
    Ok(ctx.take_output())
}

/// Lower `stmts` into the current scope.
///
/// Function names are bound before anything else in the block runs, so
/// functions in one block may call each other regardless of order.
pub fn lower_block(ctx: &mut CodegenContext, stmts: &[Statement]) -> Result<(), CodegenError> {
    for stmt in stmts {
        if let Statement::FunctionDefine(def) = stmt {
            ctx.writeln(&format!(
                "let {} = Binding::new(Value::Unit);",
                CodegenContext::mangle(def.name())
            ));
            ctx.declare(def.name());
        }
    }
    for stmt in stmts {
        lower_stmt(ctx, stmt)?;
    }
    Ok(())
}

/// Lower `stmts` as a nested block with its own scope.
fn lower_scoped(ctx: &mut CodegenContext, stmts: &[Statement]) -> Result<(), CodegenError> {
    ctx.indent();
    ctx.push_scope();
    lower_block(ctx, stmts)?;
    ctx.pop_scope();
    ctx.dedent();
    Ok(())
}

/// Write an expression's preparatory statements and return its value.
fn emit(ctx: &mut CodegenContext, lowered: Lowered) -> String {
    for stmt in &lowered.stmts {
        ctx.writeln(stmt);
    }
    lowered.value
}

fn lower_stmt(ctx: &mut CodegenContext, stmt: &Statement) -> Result<(), CodegenError> {
    ensure_sufficient_stack(|| match stmt {
        Statement::Declare { name, expr } => {
            let lowered = lower_expr(ctx, expr)?;
            let value = emit(ctx, lowered);
            ctx.writeln(&format!(
                "let {} = Binding::new({value});",
                CodegenContext::mangle(name)
            ));
            ctx.declare(name);
            Ok(())
        }

        Statement::Assign { target, expr } => {
            require_declared(ctx, target)?;
            let lowered = lower_expr(ctx, expr)?;
            let value = emit(ctx, lowered);
            ctx.writeln(&format!("{}.set({value});", CodegenContext::mangle(target)));
            Ok(())
        }

        Statement::IfElse {
            cond,
            then_body,
            else_body,
        } => {
            let lowered = lower_expr(ctx, cond)?;
            let cond = emit(ctx, lowered);
            ctx.writeln(&format!("if {cond}.truthy() {{"));
            lower_scoped(ctx, then_body)?;
            if !else_body.is_empty() {
                ctx.writeln("} else {");
                lower_scoped(ctx, else_body)?;
            }
            ctx.writeln("}");
            Ok(())
        }

        Statement::While { cond, body } => {
            let lowered = lower_expr(ctx, cond)?;
            if lowered.stmts.is_empty() {
                ctx.writeln(&format!("while {}.truthy() {{", lowered.value));
            } else {
                // The condition's statements must rerun on every pass.
                ctx.writeln("loop {");
                ctx.indent();
                let cond = emit(ctx, lowered);
                ctx.writeln(&format!("if !{cond}.truthy() {{"));
                ctx.indent();
                ctx.writeln("break;");
                ctx.dedent();
                ctx.writeln("}");
                ctx.dedent();
            }
            ctx.enter_loop();
            lower_scoped(ctx, body)?;
            ctx.exit_loop();
            ctx.writeln("}");
            Ok(())
        }

        Statement::For {
            variable,
            iterable,
            body,
        } => {
            let mut lowered = lower_expr(ctx, iterable)?;
            let call = format!("{}.iterate()", lowered.value);
            let items = checked(ctx, &mut lowered, &call);
            emit(ctx, lowered);

            let item = ctx.fresh_temp();
            ctx.writeln(&format!("for {item} in {items} {{"));
            ctx.indent();
            ctx.push_scope();
            ctx.writeln(&format!(
                "let {} = Binding::new({item});",
                CodegenContext::mangle(variable)
            ));
            ctx.declare(variable);
            ctx.enter_loop();
            lower_block(ctx, body)?;
            ctx.exit_loop();
            ctx.pop_scope();
            ctx.dedent();
            ctx.writeln("}");
            Ok(())
        }

        Statement::Break => {
            if !ctx.in_loop() {
                return Err(misplaced(ctx, "break", "inside a loop"));
            }
            ctx.writeln("break;");
            Ok(())
        }

        Statement::Return { expr } => {
            if !ctx.in_function() {
                return Err(misplaced(ctx, "return", "inside a function body"));
            }
            let lowered = lower_expr(ctx, expr)?;
            let value = emit(ctx, lowered);
            ctx.writeln(&format!("return Ok({value});"));
            Ok(())
        }

        Statement::FunctionDefine(def) => lower_function(ctx, def),

        Statement::Export { name } => {
            if ctx.in_function() {
                return Err(misplaced(ctx, "export", "at module level"));
            }
            require_declared(ctx, name)?;
            ctx.writeln(&format!(
                "exports.insert({}.to_string(), {}.get());",
                string_literal(name),
                CodegenContext::mangle(name)
            ));
            Ok(())
        }

        Statement::Import { local_name, path } => lower_import(ctx, local_name, path),

        Statement::Expression(expr) => {
            // The value is side-effect free; only the statements matter.
            let lowered = lower_expr(ctx, expr)?;
            emit(ctx, lowered);
            Ok(())
        }
    })
}

/// A function definition becomes a closure stored into the binding that
/// [`lower_block`] created for it.
///
/// ```text
/// let _t4 = {
///     let gob_x = gob_x.clone();
///     let registry = registry.clone();
///     Value::function("f", move |args: &[Value], kwargs: &KwArgs| -> Result<Value, Error> {
///         ...
///     })
/// };
/// gob_f.set(_t4);
/// ```
///
/// Every visible binding is cloned into the closure. Bindings are shared
/// cells, so the closure sees later assignments, including its own
/// definition.
fn lower_function(ctx: &mut CodegenContext, def: &FunctionDefine) -> Result<(), CodegenError> {
    trace!(module = %ctx.module(), function = def.name(), "lowering function");
    let name = string_literal(def.name());
    let closure = ctx.fresh_temp();

    ctx.writeln(&format!("let {closure} = {{"));
    ctx.indent();
    for captured in ctx.visible_names() {
        let binding = CodegenContext::mangle(&captured);
        ctx.writeln(&format!("let {binding} = {binding}.clone();"));
    }
    ctx.writeln("let registry = registry.clone();");
    ctx.writeln(&format!(
        "Value::function({name}, move |args: &[Value], kwargs: &KwArgs| -> Result<Value, Error> {{"
    ));
    ctx.indent();
    ctx.enter_frame(FrameKind::Function, ErrorHandler::Propagate);
    ctx.push_scope();

    ctx.writeln(&format!(
        "if let Err(err) = goblin_rt::check_arity({name}, args, {}) {{ {}; }}",
        def.params().len(),
        ctx.handler().on_error()
    ));
    for (i, param) in def.params().iter().enumerate() {
        ctx.writeln(&format!(
            "let {} = Binding::new(args[{i}].clone());",
            CodegenContext::mangle(param)
        ));
        ctx.declare(param);
    }
    lower_block(ctx, def.body())?;

    ctx.pop_scope();
    ctx.exit_frame();
    ctx.dedent();
    ctx.writeln("})");
    ctx.dedent();
    ctx.writeln("};");
    ctx.writeln(&format!(
        "{}.set({closure});",
        CodegenContext::mangle(def.name())
    ));
    Ok(())
}

fn lower_import(ctx: &mut CodegenContext, local_name: &str, path: &str) -> Result<(), CodegenError> {
    if ctx.in_function() || ctx.scope_depth() > 1 {
        return Err(CodegenError::NotImplemented {
            module: ctx.module().to_string(),
            construct: "import inside a function or block",
        });
    }

    let mut lowered = Lowered::default();
    let module = if is_path_import(path) {
        let Some(target) = ctx.import(path) else {
            return Err(unknown_import(ctx, path));
        };
        let call = format!(
            "registry.load({}, || {}(&registry))",
            string_literal(&target.key),
            ctx.executor_path(target)
        );
        checked(ctx, &mut lowered, &call)
    } else if stdlib::is_namespace(path) {
        checked(
            ctx,
            &mut lowered,
            &format!("goblin_rt::stdlib::namespace({})", string_literal(path)),
        )
    } else {
        return Err(unknown_import(ctx, path));
    };

    emit(ctx, lowered);
    ctx.writeln(&format!(
        "let {} = Binding::new({module});",
        CodegenContext::mangle(local_name)
    ));
    ctx.declare(local_name);
    Ok(())
}

fn require_declared(ctx: &CodegenContext, name: &str) -> Result<(), CodegenError> {
    if ctx.is_declared(name) {
        Ok(())
    } else {
        Err(CodegenError::UndefinedName {
            module: ctx.module().to_string(),
            name: name.to_string(),
        })
    }
}

#[cold]
fn misplaced(ctx: &CodegenContext, statement: &'static str, allowed: &'static str) -> CodegenError {
    CodegenError::Misplaced {
        module: ctx.module().to_string(),
        statement,
        allowed,
    }
}

#[cold]
fn unknown_import(ctx: &CodegenContext, name: &str) -> CodegenError {
    CodegenError::UnknownImport {
        module: ctx.module().to_string(),
        name: name.to_string(),
    }
}
