use std::path::PathBuf;

use goblin_ir::{BinaryOp, Expression, FunctionDefine, Program, Statement};
use pretty_assertions::assert_eq;
use rustc_hash::FxHashMap;

use super::*;
use crate::context::CodegenContext;
use crate::error::CodegenError;
use crate::options::OutputLayout;
use crate::resolve::ModuleRef;

const PROPAGATE: &str = "{ Ok(value) => value, Err(err) => return Err(err) }";

fn context() -> CodegenContext {
    let mut ctx = CodegenContext::new(OutputLayout::SingleFile, PathBuf::from("/p"));
    ctx.begin_module("main.goblin".to_string(), FxHashMap::default());
    ctx
}

fn lower_program(stmts: Vec<Statement>) -> Result<String, CodegenError> {
    let mut ctx = context();
    lower_module_body(&mut ctx, &Program::new("main", stmts), "main")
}

/// The body lines between the executor prologue and epilogue, unindented
/// by one level.
fn body_lines(stmts: Vec<Statement>) -> Vec<String> {
    let body = lower_program(stmts).unwrap();
    let lines: Vec<String> = body
        .lines()
        .map(|line| line.strip_prefix("    ").unwrap_or(line).to_string())
        .collect();
    assert_eq!(lines[0], "let registry = registry.clone();");
    assert_eq!(lines[1], "let mut exports = goblin_rt::Members::default();");
    lines[2..lines.len() - 1].to_vec()
}

fn bind(temp: &str, call: &str) -> String {
    format!("let {temp} = match {call} {PROPAGATE};")
}

mod literals {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_string_literal_escapes() {
        assert_eq!(string_literal("plain"), "\"plain\"");
        assert_eq!(string_literal("a\"b\\c"), "\"a\\\"b\\\\c\"");
        assert_eq!(string_literal("line\nnext\ttab\0"), "\"line\\nnext\\ttab\\0\"");
        assert_eq!(string_literal("\u{1b}"), "\"\\u{1b}\"");
        assert_eq!(string_literal("héllo"), "\"héllo\"");
    }

    #[test]
    fn test_float_literal() {
        assert_eq!(float_literal(1.0), "1.0");
        assert_eq!(float_literal(-2.5), "-2.5");
        assert_eq!(float_literal(1e300), "1e300");
        assert_eq!(float_literal(f64::NAN), "f64::NAN");
        assert_eq!(float_literal(f64::INFINITY), "f64::INFINITY");
        assert_eq!(float_literal(f64::NEG_INFINITY), "f64::NEG_INFINITY");
    }

    #[test]
    fn test_integer_literal() {
        assert_eq!(integer_literal(42), "42");
        assert_eq!(integer_literal(-7), "-7");
        assert_eq!(integer_literal(i64::MIN), "i64::MIN");
    }

    #[test]
    fn test_literal_values() {
        let mut ctx = context();
        let cases = [
            (Expression::int(3), "Value::Integer(3)"),
            (Expression::float(0.5), "Value::Float(0.5)"),
            (Expression::string("hi"), "Value::string(\"hi\")"),
            (Expression::bool(true), "Value::Bool(true)"),
            (Expression::nil(), "Value::Unit"),
        ];
        for (expr, expected) in cases {
            assert_eq!(lower_expr(&mut ctx, &expr).unwrap(), Lowered::pure(expected));
        }
    }
}

mod expressions {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_arithmetic_is_checked() {
        let mut ctx = context();
        let expr = Expression::binary(Expression::int(1), BinaryOp::Add, Expression::int(2));
        assert_eq!(
            lower_expr(&mut ctx, &expr).unwrap(),
            Lowered {
                stmts: vec![bind("_t0", "Value::Integer(1).add(&Value::Integer(2))")],
                value: "_t0".to_string(),
            }
        );
    }

    #[test]
    fn test_comparison_goes_through_compare() {
        let mut ctx = context();
        for (op, symbol) in [
            (BinaryOp::Eq, "=="),
            (BinaryOp::NotEq, "!="),
            (BinaryOp::Lt, "<"),
            (BinaryOp::Gt, ">"),
            (BinaryOp::LtEq, "<="),
            (BinaryOp::GtEq, ">="),
        ] {
            let expr = Expression::binary(Expression::int(1), op, Expression::float(2.0));
            let lowered = lower_expr(&mut ctx, &expr).unwrap();
            let temp = lowered.stmts[0]
                .split_whitespace()
                .nth(1)
                .unwrap()
                .to_string();
            assert_eq!(
                lowered.stmts,
                vec![bind(&temp, "Value::Integer(1).compare(&Value::Float(2.0))")]
            );
            assert_eq!(lowered.value, format!("Value::Bool(({temp} as i8) {symbol} 0)"));
        }
    }

    #[test]
    fn test_operands_evaluate_left_to_right() {
        let mut ctx = context();
        ctx.push_scope();
        ctx.declare("a");
        ctx.declare("f");
        let expr = Expression::binary(
            Expression::ident("a"),
            BinaryOp::Mul,
            Expression::call("f", vec![]),
        );
        assert_eq!(
            lower_expr(&mut ctx, &expr).unwrap().stmts,
            vec![
                "let _t0 = gob_a.get();".to_string(),
                "let _t1 = gob_f.get();".to_string(),
                bind("_t2", "_t1.call(&[], &KwArgs::default())"),
                bind("_t3", "_t0.mul(&_t2)"),
            ]
        );
    }

    #[test]
    fn test_builtin_call() {
        let mut ctx = context();
        let expr = Expression::call("range", vec![Expression::int(0), Expression::int(3)]);
        assert_eq!(
            lower_expr(&mut ctx, &expr).unwrap().stmts,
            vec![
                bind("_t0", "goblin_rt::stdlib::builtin(\"range\")"),
                bind(
                    "_t1",
                    "_t0.call(&[Value::Integer(0), Value::Integer(3)], &KwArgs::default())"
                ),
            ]
        );
    }

    #[test]
    fn test_member_call() {
        let mut ctx = context();
        ctx.push_scope();
        ctx.declare("util");
        let expr = Expression::method_call(Expression::ident("util"), "square", vec![Expression::int(4)]);
        assert_eq!(
            lower_expr(&mut ctx, &expr).unwrap().stmts,
            vec![
                "let _t0 = gob_util.get();".to_string(),
                bind("_t1", "_t0.get_attr(\"square\")"),
                bind("_t2", "_t1.call(&[Value::Integer(4)], &KwArgs::default())"),
            ]
        );
    }

    #[test]
    fn test_collections() {
        let mut ctx = context();
        let list = Expression::list(vec![Expression::int(1), Expression::string("a")]);
        assert_eq!(
            lower_expr(&mut ctx, &list).unwrap(),
            Lowered::pure("Value::list(vec![Value::Integer(1), Value::string(\"a\")])")
        );

        let dict = Expression::dict(vec![(Expression::string("k"), Expression::nil())]);
        assert_eq!(
            lower_expr(&mut ctx, &dict).unwrap(),
            Lowered::pure("Value::dict_from([(Value::string(\"k\"), Value::Unit)])")
        );

        assert_eq!(
            lower_expr(&mut ctx, &Expression::dict(vec![])).unwrap(),
            Lowered::pure("Value::dict(goblin_rt::Dict::new())")
        );
    }

    #[test]
    fn test_index_and_not() {
        let mut ctx = context();
        let expr = Expression::not(Expression::index(
            Expression::list(vec![Expression::bool(true)]),
            Expression::int(0),
        ));
        assert_eq!(
            lower_expr(&mut ctx, &expr).unwrap(),
            Lowered {
                stmts: vec![
                    bind("_t0", "Value::list(vec![Value::Bool(true)]).index(&Value::Integer(0))"),
                    bind("_t1", "_t0.not()"),
                ],
                value: "_t1".to_string(),
            }
        );
    }

    #[test]
    fn test_builtin_as_value() {
        let mut ctx = context();
        assert_eq!(
            lower_expr(&mut ctx, &Expression::ident("max")).unwrap().stmts,
            vec![bind("_t0", "goblin_rt::stdlib::builtin(\"max\")")]
        );

        // A binding with the same name wins for plain reads.
        ctx.push_scope();
        ctx.declare("max");
        assert_eq!(
            lower_expr(&mut ctx, &Expression::ident("max")).unwrap().stmts,
            vec!["let _t1 = gob_max.get();".to_string()]
        );
    }

    #[test]
    fn test_undefined_name() {
        let mut ctx = context();
        let err = lower_expr(&mut ctx, &Expression::ident("nope")).unwrap_err();
        assert_eq!(err.to_string(), "main.goblin: undefined name 'nope'");
    }
}

mod statements {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_declare_and_print() {
        let lines = body_lines(vec![
            Statement::declare(
                "x",
                Expression::binary(Expression::int(1), BinaryOp::Add, Expression::int(2)),
            ),
            Expression::call("print", vec![Expression::ident("x")]).into(),
        ]);
        assert_eq!(
            lines,
            vec![
                bind("_t0", "Value::Integer(1).add(&Value::Integer(2))"),
                "let gob_x = Binding::new(_t0);".to_string(),
                bind("_t1", "goblin_rt::stdlib::builtin(\"print\")"),
                "let _t2 = gob_x.get();".to_string(),
                bind("_t3", "_t1.call(&[_t2], &KwArgs::default())"),
            ]
        );
    }

    #[test]
    fn test_module_epilogue() {
        let body = lower_program(vec![]).unwrap();
        assert_eq!(
            body,
            "    let registry = registry.clone();\n    \
             let mut exports = goblin_rt::Members::default();\n    \
             Ok(Value::namespace(\"main\", exports))\n"
        );
    }

    #[test]
    fn test_assign() {
        let lines = body_lines(vec![
            Statement::declare("x", Expression::int(1)),
            Statement::assign("x", Expression::int(2)),
        ]);
        assert_eq!(
            lines,
            vec![
                "let gob_x = Binding::new(Value::Integer(1));",
                "gob_x.set(Value::Integer(2));",
            ]
        );
    }

    #[test]
    fn test_assign_requires_declaration() {
        let err = lower_program(vec![Statement::assign("y", Expression::int(1))]).unwrap_err();
        assert!(matches!(err, CodegenError::UndefinedName { ref name, .. } if name == "y"));
    }

    #[test]
    fn test_if_else() {
        let lines = body_lines(vec![Statement::IfElse {
            cond: Expression::bool(true),
            then_body: vec![Statement::declare("a", Expression::int(1))],
            else_body: vec![Statement::declare("b", Expression::int(2))],
        }]);
        assert_eq!(
            lines,
            vec![
                "if Value::Bool(true).truthy() {",
                "    let gob_a = Binding::new(Value::Integer(1));",
                "} else {",
                "    let gob_b = Binding::new(Value::Integer(2));",
                "}",
            ]
        );
    }

    #[test]
    fn test_block_scope_ends_with_block() {
        let err = lower_program(vec![
            Statement::IfElse {
                cond: Expression::bool(true),
                then_body: vec![Statement::declare("inner", Expression::int(1))],
                else_body: vec![],
            },
            Statement::assign("inner", Expression::int(2)),
        ])
        .unwrap_err();
        assert!(matches!(err, CodegenError::UndefinedName { .. }));
    }

    #[test]
    fn test_while_with_plain_condition() {
        let lines = body_lines(vec![Statement::While {
            cond: Expression::bool(false),
            body: vec![Statement::Break],
        }]);
        assert_eq!(
            lines,
            vec!["while Value::Bool(false).truthy() {", "    break;", "}"]
        );
    }

    #[test]
    fn test_while_reevaluates_condition_statements() {
        let lines = body_lines(vec![
            Statement::declare("i", Expression::int(0)),
            Statement::While {
                cond: Expression::binary(Expression::ident("i"), BinaryOp::Lt, Expression::int(3)),
                body: vec![Statement::assign(
                    "i",
                    Expression::binary(Expression::ident("i"), BinaryOp::Add, Expression::int(1)),
                )],
            },
        ]);
        assert_eq!(
            lines,
            vec![
                "let gob_i = Binding::new(Value::Integer(0));".to_string(),
                "loop {".to_string(),
                "    let _t0 = gob_i.get();".to_string(),
                format!("    {}", bind("_t1", "_t0.compare(&Value::Integer(3))")),
                "    if !Value::Bool((_t1 as i8) < 0).truthy() {".to_string(),
                "        break;".to_string(),
                "    }".to_string(),
                "    let _t2 = gob_i.get();".to_string(),
                format!("    {}", bind("_t3", "_t2.add(&Value::Integer(1))")),
                "    gob_i.set(_t3);".to_string(),
                "}".to_string(),
            ]
        );
    }

    #[test]
    fn test_for_loop() {
        let lines = body_lines(vec![Statement::For {
            variable: "i".to_string(),
            iterable: Expression::call("range", vec![Expression::int(0), Expression::int(3)]),
            body: vec![Expression::call("print", vec![Expression::ident("i")]).into()],
        }]);
        assert_eq!(
            lines,
            vec![
                bind("_t0", "goblin_rt::stdlib::builtin(\"range\")"),
                bind(
                    "_t1",
                    "_t0.call(&[Value::Integer(0), Value::Integer(3)], &KwArgs::default())"
                ),
                bind("_t2", "_t1.iterate()"),
                "for _t3 in _t2 {".to_string(),
                "    let gob_i = Binding::new(_t3);".to_string(),
                format!("    {}", bind("_t4", "goblin_rt::stdlib::builtin(\"print\")")),
                "    let _t5 = gob_i.get();".to_string(),
                format!("    {}", bind("_t6", "_t4.call(&[_t5], &KwArgs::default())")),
                "}".to_string(),
            ]
        );
    }

    #[test]
    fn test_function_definition() {
        let square = FunctionDefine::new(
            "square",
            vec!["n".to_string()],
            vec![Statement::ret(Expression::binary(
                Expression::ident("n"),
                BinaryOp::Mul,
                Expression::ident("n"),
            ))],
        );
        let lines = body_lines(vec![square.into(), Statement::export("square")]);
        assert_eq!(
            lines,
            vec![
                "let gob_square = Binding::new(Value::Unit);".to_string(),
                "let _t0 = {".to_string(),
                "    let gob_square = gob_square.clone();".to_string(),
                "    let registry = registry.clone();".to_string(),
                "    Value::function(\"square\", move |args: &[Value], kwargs: &KwArgs| -> Result<Value, Error> {".to_string(),
                "        if let Err(err) = goblin_rt::check_arity(\"square\", args, 1) { return Err(err); }".to_string(),
                "        let gob_n = Binding::new(args[0].clone());".to_string(),
                "        let _t1 = gob_n.get();".to_string(),
                "        let _t2 = gob_n.get();".to_string(),
                format!("        {}", bind("_t3", "_t1.mul(&_t2)")),
                "        return Ok(_t3);".to_string(),
                "    })".to_string(),
                "};".to_string(),
                "gob_square.set(_t0);".to_string(),
                "exports.insert(\"square\".to_string(), gob_square.get());".to_string(),
            ]
        );
    }

    #[test]
    fn test_function_gets_implicit_return() {
        let body = lower_program(vec![FunctionDefine::new("noop", vec![], vec![]).into()]).unwrap();
        assert!(body.contains("return Ok(Value::Unit);"));
    }

    #[test]
    fn test_functions_in_a_block_see_each_other() {
        let is_even = FunctionDefine::new(
            "is_even",
            vec!["n".to_string()],
            vec![Statement::ret(Expression::call("is_odd", vec![Expression::ident("n")]))],
        );
        let is_odd = FunctionDefine::new(
            "is_odd",
            vec!["n".to_string()],
            vec![Statement::ret(Expression::call("is_even", vec![Expression::ident("n")]))],
        );
        let body = lower_program(vec![is_even.into(), is_odd.into()]).unwrap();

        let hoisted: Vec<&str> = body.lines().take(4).collect();
        assert_eq!(hoisted[2], "    let gob_is_even = Binding::new(Value::Unit);");
        assert_eq!(hoisted[3], "    let gob_is_odd = Binding::new(Value::Unit);");
        assert!(body.contains("let gob_is_odd = gob_is_odd.clone();"));
    }

    #[test]
    fn test_closure_captures_visible_bindings() {
        let body = lower_program(vec![
            Statement::declare("count", Expression::int(0)),
            FunctionDefine::new(
                "bump",
                vec![],
                vec![Statement::assign(
                    "count",
                    Expression::binary(Expression::ident("count"), BinaryOp::Add, Expression::int(1)),
                )],
            )
            .into(),
        ])
        .unwrap();
        assert!(body.contains("let gob_count = gob_count.clone();"));
        assert!(body.contains("gob_count.set("));
    }

    #[test]
    fn test_native_import() {
        let lines = body_lines(vec![Statement::import("os", "os")]);
        assert_eq!(
            lines,
            vec![
                bind("_t0", "goblin_rt::stdlib::namespace(\"os\")"),
                "let gob_os = Binding::new(_t0);".to_string(),
            ]
        );
    }

    #[test]
    fn test_path_import_goes_through_registry() {
        let mut ctx = CodegenContext::new(OutputLayout::SingleFile, PathBuf::from("/p"));
        let mut imports = FxHashMap::default();
        imports.insert(
            "./util".to_string(),
            ModuleRef {
                key: "util.goblin".to_string(),
                ident: "util".to_string(),
                stem: "util".to_string(),
            },
        );
        ctx.begin_module("main.goblin".to_string(), imports);
        let body = lower_module_body(
            &mut ctx,
            &Program::new("main", vec![Statement::import("util", "./util")]),
            "main",
        )
        .unwrap();
        assert!(body.contains(&bind(
            "_t0",
            "registry.load(\"util.goblin\", || module_util(&registry))"
        )));
        assert!(body.contains("let gob_util = Binding::new(_t0);"));
    }

    #[test]
    fn test_unknown_import() {
        let err = lower_program(vec![Statement::import("net", "net")]).unwrap_err();
        assert_eq!(err.to_string(), "main.goblin: unknown import 'net'");
    }

    #[test]
    fn test_nested_import_not_supported() {
        let err = lower_program(vec![Statement::IfElse {
            cond: Expression::bool(true),
            then_body: vec![Statement::import("os", "os")],
            else_body: vec![],
        }])
        .unwrap_err();
        assert!(matches!(err, CodegenError::NotImplemented { .. }));
    }
}

mod placement {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_return_outside_function() {
        let err = lower_program(vec![Statement::ret(Expression::nil())]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "main.goblin: 'return' is only valid inside a function body"
        );
    }

    #[test]
    fn test_break_outside_loop() {
        let err = lower_program(vec![Statement::Break]).unwrap_err();
        assert_eq!(err.to_string(), "main.goblin: 'break' is only valid inside a loop");
    }

    #[test]
    fn test_break_does_not_cross_function_boundary() {
        let inner = FunctionDefine::new("f", vec![], vec![Statement::Break]);
        let err = lower_program(vec![Statement::While {
            cond: Expression::bool(true),
            body: vec![inner.into()],
        }])
        .unwrap_err();
        assert!(matches!(err, CodegenError::Misplaced { statement: "break", .. }));
    }

    #[test]
    fn test_export_inside_function() {
        let inner = FunctionDefine::new(
            "f",
            vec!["x".to_string()],
            vec![Statement::export("x")],
        );
        let err = lower_program(vec![inner.into()]).unwrap_err();
        assert!(matches!(err, CodegenError::Misplaced { statement: "export", .. }));
    }

    #[test]
    fn test_export_requires_declaration() {
        let err = lower_program(vec![Statement::export("ghost")]).unwrap_err();
        assert!(matches!(err, CodegenError::UndefinedName { .. }));
    }
}
