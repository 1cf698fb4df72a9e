//! Name resolution and the scope chain.

use draconic_ir::build::{
    assign, aug_assign, aug_assign_to, call, comprehension, def, dict, expr_stmt, int, list,
    list_comp, method, name, named, return_stmt, set, string, subscript, tuple,
};
use draconic_ir::BinaryOp;
use draconic_value::{ErrorKind, HostValue, Value};
use pretty_assertions::assert_eq;

use super::{eval, eval_with};
use crate::{Bindings, Limits};

fn ints(items: &[i64]) -> Value {
    Value::list(items.iter().copied().map(Value::Int).collect())
}

#[test]
fn augmented_assignment_writes_to_the_owning_scope() {
    let body = vec![
        assign("total", int(0)),
        def(
            "add",
            &["n"],
            vec![aug_assign("total", BinaryOp::Add, name("n"))],
        ),
        expr_stmt(call(name("add"), vec![int(5)])),
        expr_stmt(call(name("add"), vec![int(7)])),
        expr_stmt(name("total")),
    ];
    assert_eq!(eval(body).unwrap(), Value::Int(12));
}

#[test]
fn augmented_assignment_reaches_through_nested_functions() {
    let body = vec![
        def(
            "outer",
            &[],
            vec![
                assign("count", int(1)),
                def(
                    "bump",
                    &[],
                    vec![aug_assign("count", BinaryOp::Mul, int(10))],
                ),
                expr_stmt(call(name("bump"), vec![])),
                expr_stmt(call(name("bump"), vec![])),
                return_stmt(Some(name("count"))),
            ],
        ),
        expr_stmt(call(name("outer"), vec![])),
    ];
    assert_eq!(eval(body).unwrap(), Value::Int(100));
}

#[test]
fn augmented_assignment_of_an_undefined_name_fails() {
    let err = eval(vec![aug_assign("missing", BinaryOp::Add, int(1))]).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::NameNotFound { .. }));
}

#[test]
fn augmented_assignment_of_a_binding_stays_local_to_the_run() {
    let mut bindings = Bindings::new();
    bindings.register_value("limit", 10_i64).unwrap();
    let body = vec![
        aug_assign("limit", BinaryOp::Add, int(5)),
        expr_stmt(name("limit")),
    ];
    assert_eq!(
        eval_with(body.clone(), &bindings, Limits::default()).unwrap(),
        Value::Int(15)
    );
    // The registry is untouched, so the next run starts over.
    assert_eq!(
        eval_with(body, &bindings, Limits::default()).unwrap(),
        Value::Int(15)
    );
}

#[test]
fn dict_union_assignment_leaves_aliases_alone() {
    let body = vec![
        assign("a", dict(vec![(string("x"), int(1))])),
        assign("b", name("a")),
        aug_assign("a", BinaryOp::BitOr, dict(vec![(string("y"), int(2))])),
        expr_stmt(tuple(vec![
            call(name("len"), vec![name("a")]),
            call(name("len"), vec![name("b")]),
        ])),
    ];
    assert_eq!(
        eval(body).unwrap(),
        Value::tuple(vec![Value::Int(2), Value::Int(1)])
    );
}

#[test]
fn set_union_assignment_leaves_aliases_alone() {
    let body = vec![
        assign("a", set(vec![int(1)])),
        assign("b", name("a")),
        aug_assign("a", BinaryOp::BitOr, set(vec![int(2), int(3)])),
        expr_stmt(tuple(vec![
            call(name("len"), vec![name("a")]),
            call(name("len"), vec![name("b")]),
        ])),
    ];
    assert_eq!(
        eval(body).unwrap(),
        Value::tuple(vec![Value::Int(3), Value::Int(1)])
    );
}

#[test]
fn list_plus_assignment_rebinds_too() {
    let body = vec![
        assign("a", list(vec![int(1)])),
        assign("b", name("a")),
        aug_assign("a", BinaryOp::Add, list(vec![int(2)])),
        expr_stmt(list(vec![name("a"), name("b")])),
    ];
    assert_eq!(
        eval(body).unwrap(),
        Value::list(vec![ints(&[1, 2]), ints(&[1])])
    );
}

#[test]
fn subscript_augmented_assignment() {
    let body = vec![
        assign("counts", dict(vec![(string("a"), int(1))])),
        aug_assign_to(
            subscript(name("counts"), string("a")),
            BinaryOp::Add,
            int(41),
        ),
        expr_stmt(subscript(name("counts"), string("a"))),
    ];
    assert_eq!(eval(body).unwrap(), Value::Int(42));
}

#[test]
fn plain_assignment_in_a_function_is_local() {
    let body = vec![
        assign("x", int(1)),
        def("f", &[], vec![assign("x", int(2)), return_stmt(Some(name("x")))]),
        expr_stmt(list(vec![call(name("f"), vec![]), name("x")])),
    ];
    assert_eq!(eval(body).unwrap(), ints(&[2, 1]));
}

#[test]
fn closures_capture_their_defining_scope() {
    let body = vec![
        def(
            "make_adder",
            &["n"],
            vec![
                def("add", &["x"], vec![return_stmt(Some(draconic_ir::build::binop(
                    name("x"),
                    BinaryOp::Add,
                    name("n"),
                )))]),
                return_stmt(Some(name("add"))),
            ],
        ),
        assign("add3", call(name("make_adder"), vec![int(3)])),
        expr_stmt(call(name("add3"), vec![int(4)])),
    ];
    assert_eq!(eval(body).unwrap(), Value::Int(7));
}

#[test]
fn comprehension_targets_do_not_leak() {
    let body = vec![
        assign("x", string("outer")),
        assign(
            "squares",
            list_comp(
                draconic_ir::build::binop(name("x"), BinaryOp::Mul, name("x")),
                vec![comprehension(
                    name("x"),
                    call(name("range"), vec![int(4)]),
                    vec![],
                )],
            ),
        ),
        expr_stmt(list(vec![name("squares"), name("x")])),
    ];
    assert_eq!(
        eval(body).unwrap(),
        Value::list(vec![ints(&[0, 1, 4, 9]), Value::str("outer")])
    );
}

#[test]
fn walrus_in_a_comprehension_binds_in_the_enclosing_scope() {
    let body = vec![
        expr_stmt(list_comp(
            named("last", name("i")),
            vec![comprehension(
                name("i"),
                call(name("range"), vec![int(3)]),
                vec![],
            )],
        )),
        expr_stmt(name("last")),
    ];
    assert_eq!(eval(body).unwrap(), Value::Int(2));
}

#[test]
fn host_containers_are_copied_per_run() {
    let mut bindings = Bindings::with_defaults();
    bindings
        .register_value("queue", HostValue::list([HostValue::Int(1)]))
        .unwrap();
    let body = vec![
        expr_stmt(method(name("queue"), "append", vec![int(2)])),
        expr_stmt(call(name("len"), vec![name("queue")])),
    ];
    assert_eq!(
        eval_with(body.clone(), &bindings, Limits::default()).unwrap(),
        Value::Int(2)
    );
    assert_eq!(
        eval_with(body, &bindings, Limits::default()).unwrap(),
        Value::Int(2)
    );
}

#[test]
fn script_definitions_shadow_builtins() {
    let body = vec![
        def("len", &["x"], vec![return_stmt(Some(int(-1)))]),
        expr_stmt(call(name("len"), vec![list(vec![])])),
    ];
    assert_eq!(eval(body).unwrap(), Value::Int(-1));
}
