//! Loops, `try`/`except`/`finally` and `raise`.

use draconic_ir::build::{
    assign, aug_assign, binop, boolean, break_stmt, call, compare, continue_stmt, def, except,
    expr_stmt, for_else, for_loop, if_stmt, int, list, method, name, pass, raise, return_stmt,
    string, try_stmt, tuple, while_loop,
};
use draconic_ir::{BinaryOp, CmpOp, Stmt};
use draconic_value::{ErrorKind, Value};

use super::{eval, eval_with};
use crate::{buffer_handler, Bindings, Limits};

fn range(n: i64) -> draconic_ir::Expr {
    call(name("range"), vec![int(n)])
}

/// `log.append(value)`
fn log(value: draconic_ir::Expr) -> Stmt {
    expr_stmt(method(name("log"), "append", vec![value]))
}

fn with_log(mut body: Vec<Stmt>) -> Vec<Stmt> {
    body.insert(0, assign("log", list(vec![])));
    body.push(expr_stmt(name("log")));
    body
}

fn strs(items: &[&str]) -> Value {
    Value::list(items.iter().copied().map(Value::str).collect())
}

mod loops {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn for_accumulates() {
        let body = vec![
            assign("total", int(0)),
            for_loop(
                name("i"),
                range(5),
                vec![aug_assign("total", BinaryOp::Add, name("i"))],
            ),
            expr_stmt(name("total")),
        ];
        assert_eq!(eval(body).unwrap(), Value::Int(10));
    }

    #[test]
    fn break_skips_else() {
        let body = with_log(vec![for_else(
            name("i"),
            range(5),
            vec![if_stmt(
                compare(name("i"), CmpOp::Eq, int(2)),
                vec![break_stmt()],
                vec![log(name("i"))],
            )],
            vec![log(string("else"))],
        )]);
        assert_eq!(
            eval(body).unwrap(),
            Value::list(vec![Value::Int(0), Value::Int(1)])
        );
    }

    #[test]
    fn exhausted_loop_runs_else() {
        let body = with_log(vec![for_else(
            name("i"),
            range(2),
            vec![pass()],
            vec![log(string("else"))],
        )]);
        assert_eq!(eval(body).unwrap(), strs(&["else"]));
    }

    #[test]
    fn continue_skips_the_rest_of_the_body() {
        let body = with_log(vec![for_loop(
            name("i"),
            range(4),
            vec![
                if_stmt(
                    compare(
                        binop(name("i"), BinaryOp::Mod, int(2)),
                        CmpOp::Eq,
                        int(0),
                    ),
                    vec![continue_stmt()],
                    vec![],
                ),
                log(name("i")),
            ],
        )]);
        assert_eq!(
            eval(body).unwrap(),
            Value::list(vec![Value::Int(1), Value::Int(3)])
        );
    }

    #[test]
    fn while_with_counter() {
        let body = vec![
            assign("n", int(0)),
            while_loop(
                compare(name("n"), CmpOp::Lt, int(10)),
                vec![aug_assign("n", BinaryOp::Add, int(3))],
            ),
            expr_stmt(name("n")),
        ];
        assert_eq!(eval(body).unwrap(), Value::Int(12));
    }

    #[test]
    fn return_from_inside_a_loop() {
        let body = vec![
            def(
                "first_even",
                &["xs"],
                vec![
                    for_loop(
                        name("x"),
                        name("xs"),
                        vec![if_stmt(
                            compare(
                                binop(name("x"), BinaryOp::Mod, int(2)),
                                CmpOp::Eq,
                                int(0),
                            ),
                            vec![return_stmt(Some(name("x")))],
                            vec![],
                        )],
                    ),
                    return_stmt(None),
                ],
            ),
            expr_stmt(call(
                name("first_even"),
                vec![list(vec![int(3), int(8), int(4)])],
            )),
        ];
        assert_eq!(eval(body).unwrap(), Value::Int(8));
    }

    #[test]
    fn loops_iterate_over_a_snapshot() {
        let body = vec![
            assign("xs", list(vec![int(1), int(2)])),
            for_loop(
                name("x"),
                name("xs"),
                vec![expr_stmt(method(name("xs"), "append", vec![name("x")]))],
            ),
            expr_stmt(call(name("len"), vec![name("xs")])),
        ];
        assert_eq!(eval(body).unwrap(), Value::Int(4));
    }

    #[test]
    fn break_outside_a_loop_is_structural() {
        let err = eval(vec![break_stmt()]).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Structural { .. }));
        let err = eval(vec![return_stmt(Some(int(1)))]).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Structural { .. }));
    }

    #[test]
    fn iterating_a_number_is_a_type_mismatch() {
        let err = eval(vec![for_loop(name("x"), int(3), vec![pass()])]).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::TypeMismatch { .. }));
    }
}

mod exceptions {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bare_except_catches_raised_values() {
        let body = with_log(vec![try_stmt(
            vec![raise(Some(string("boom"))), log(string("unreachable"))],
            vec![except(None, vec![log(string("caught"))])],
            vec![],
            vec![],
        )]);
        assert_eq!(eval(body).unwrap(), strs(&["caught"]));
    }

    #[test]
    fn handlers_match_by_exception_name() {
        let body = with_log(vec![try_stmt(
            vec![expr_stmt(binop(int(1), BinaryOp::Div, int(0)))],
            vec![
                except(Some(string("KeyError")), vec![log(string("key"))]),
                except(
                    Some(tuple(vec![string("ValueError"), string("ZeroDivisionError")])),
                    vec![log(string("math"))],
                ),
            ],
            vec![],
            vec![],
        )]);
        assert_eq!(eval(body).unwrap(), strs(&["math"]));
    }

    #[test]
    fn raised_values_are_named_exception() {
        let body = with_log(vec![try_stmt(
            vec![raise(Some(int(3)))],
            vec![except(Some(string("Exception")), vec![log(string("ok"))])],
            vec![],
            vec![],
        )]);
        assert_eq!(eval(body).unwrap(), strs(&["ok"]));
    }

    #[test]
    fn unmatched_errors_propagate_after_finally() {
        let print = buffer_handler();
        let bindings = Bindings::with_print_handler(print.clone());
        let body = vec![try_stmt(
            vec![expr_stmt(binop(int(1), BinaryOp::FloorDiv, int(0)))],
            vec![except(Some(string("KeyError")), vec![pass()])],
            vec![],
            vec![expr_stmt(call(name("print"), vec![string("finally")]))],
        )];
        let err = eval_with(body, &bindings, Limits::default()).unwrap_err();
        assert_eq!(err.exception_name(), Some("ZeroDivisionError"));
        assert_eq!(print.output(), "finally\n");
    }

    #[test]
    fn else_runs_only_without_an_error() {
        let body = with_log(vec![
            try_stmt(
                vec![log(string("body"))],
                vec![except(None, vec![log(string("handler"))])],
                vec![log(string("else"))],
                vec![log(string("finally"))],
            ),
            try_stmt(
                vec![raise(Some(string("x")))],
                vec![except(None, vec![log(string("handler"))])],
                vec![log(string("else"))],
                vec![log(string("finally"))],
            ),
        ]);
        assert_eq!(
            eval(body).unwrap(),
            strs(&["body", "else", "finally", "handler", "finally"])
        );
    }

    #[test]
    fn return_in_finally_replaces_the_error() {
        let body = vec![
            def(
                "f",
                &[],
                vec![try_stmt(
                    vec![raise(Some(string("lost")))],
                    vec![],
                    vec![],
                    vec![return_stmt(Some(string("finally wins")))],
                )],
            ),
            expr_stmt(call(name("f"), vec![])),
        ];
        assert_eq!(eval(body).unwrap(), Value::str("finally wins"));
    }

    #[test]
    fn bare_raise_reraises_the_handled_error() {
        let body = vec![try_stmt(
            vec![expr_stmt(binop(int(1), BinaryOp::Mod, int(0)))],
            vec![except(None, vec![raise(None)])],
            vec![],
            vec![],
        )];
        let err = eval(body).unwrap_err();
        assert_eq!(err.exception_name(), Some("ZeroDivisionError"));
    }

    #[test]
    fn bare_raise_without_an_active_error() {
        let err = eval(vec![raise(None)]).unwrap_err();
        assert_eq!(err.exception_name(), Some("RuntimeError"));
    }

    #[test]
    fn errors_in_functions_carry_a_trace() {
        let body = vec![
            def("inner", &[], vec![raise(Some(string("deep")))]),
            def(
                "outer",
                &[],
                vec![expr_stmt(call(name("inner"), vec![]))],
            ),
            expr_stmt(call(name("outer"), vec![])),
        ];
        let err = eval(body).unwrap_err();
        let names: Vec<&str> = err
            .trace()
            .frames()
            .iter()
            .map(|frame| frame.name.as_str())
            .collect();
        assert_eq!(names, vec!["inner", "outer"]);
    }

    #[test]
    fn type_mismatches_are_not_catchable() {
        let body = vec![try_stmt(
            vec![expr_stmt(binop(int(1), BinaryOp::Add, string("a")))],
            vec![except(None, vec![pass()])],
            vec![],
            vec![],
        )];
        let err = eval(body).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::TypeMismatch { .. }));
    }

    #[test]
    fn while_true_with_break() {
        let body = vec![
            assign("n", int(0)),
            while_loop(
                boolean(true),
                vec![
                    aug_assign("n", BinaryOp::Add, int(1)),
                    if_stmt(
                        compare(name("n"), CmpOp::GtE, int(3)),
                        vec![break_stmt()],
                        vec![],
                    ),
                ],
            ),
            expr_stmt(name("n")),
        ];
        assert_eq!(eval(body).unwrap(), Value::Int(3));
    }
}
