//! `match` statements.

use draconic_ir::build::{
    assign, case, compare, dict, expr_stmt, int, list, match_stmt, name, none, p_as, p_capture,
    p_mapping, p_none, p_or, p_seq, p_star, p_value, p_wildcard, string, tuple,
};
use draconic_ir::{CmpOp, Expr, MatchCase};
use draconic_value::{Dict, ErrorKind, Value};
use pretty_assertions::assert_eq;

use super::eval;

/// `match subject: cases`, storing each case's verdict in `result`.
fn run_match(subject: Expr, cases: Vec<MatchCase>) -> Result<Value, crate::DraconicError> {
    eval(vec![
        assign("result", none()),
        match_stmt(subject, cases),
        expr_stmt(name("result")),
    ])
}

fn set_result(value: Expr) -> Vec<draconic_ir::Stmt> {
    vec![assign("result", value)]
}

#[test]
fn literal_and_wildcard_cases() {
    let cases = || {
        vec![
            case(p_value(int(1)), None, set_result(string("one"))),
            case(p_value(string("two")), None, set_result(string("two"))),
            case(p_wildcard(), None, set_result(string("other"))),
        ]
    };
    assert_eq!(run_match(int(1), cases()).unwrap(), Value::str("one"));
    assert_eq!(run_match(string("two"), cases()).unwrap(), Value::str("two"));
    assert_eq!(run_match(list(vec![]), cases()).unwrap(), Value::str("other"));
}

#[test]
fn no_matching_case_is_a_no_op() {
    let cases = vec![case(p_value(int(1)), None, set_result(string("one")))];
    assert_eq!(run_match(int(2), cases).unwrap(), Value::None);
}

#[test]
fn none_pattern_is_a_singleton() {
    let cases = || {
        vec![
            case(p_none(), None, set_result(string("none"))),
            case(p_wildcard(), None, set_result(string("some"))),
        ]
    };
    assert_eq!(run_match(none(), cases()).unwrap(), Value::str("none"));
    assert_eq!(run_match(int(0), cases()).unwrap(), Value::str("some"));
}

#[test]
fn sequence_patterns_destructure() {
    let cases = vec![case(
        p_seq(vec![p_capture("x"), p_capture("y")]),
        None,
        set_result(tuple(vec![name("y"), name("x")])),
    )];
    assert_eq!(
        run_match(list(vec![int(1), int(2)]), cases).unwrap(),
        Value::tuple(vec![Value::Int(2), Value::Int(1)])
    );
}

#[test]
fn sequence_patterns_check_length() {
    let cases = || {
        vec![
            case(
                p_seq(vec![p_capture("x"), p_capture("y")]),
                None,
                set_result(string("pair")),
            ),
            case(p_wildcard(), None, set_result(string("other"))),
        ]
    };
    assert_eq!(
        run_match(tuple(vec![int(1), int(2), int(3)]), cases()).unwrap(),
        Value::str("other")
    );
    // Strings are not sequences for matching purposes.
    assert_eq!(run_match(string("ab"), cases()).unwrap(), Value::str("other"));
}

#[test]
fn star_pattern_collects_the_middle() {
    let cases = vec![case(
        p_seq(vec![p_capture("first"), p_star(Some("middle")), p_capture("last")]),
        None,
        set_result(name("middle")),
    )];
    assert_eq!(
        run_match(list(vec![int(1), int(2), int(3), int(4)]), cases).unwrap(),
        Value::list(vec![Value::Int(2), Value::Int(3)])
    );
}

#[test]
fn or_alternatives_may_bind_different_names() {
    let cases = || {
        vec![case(
            p_or(vec![
                p_seq(vec![p_capture("x"), p_value(int(2))]),
                p_seq(vec![p_value(int(2)), p_capture("y")]),
            ]),
            None,
            set_result(string("matched")),
        )]
    };

    let first = eval(vec![
        match_stmt(list(vec![int(1), int(2)]), cases()),
        expr_stmt(name("x")),
    ]);
    assert_eq!(first.unwrap(), Value::Int(1));

    let second = eval(vec![
        match_stmt(list(vec![int(2), int(5)]), cases()),
        expr_stmt(name("y")),
    ]);
    assert_eq!(second.unwrap(), Value::Int(5));

    // The failed first alternative bound nothing.
    let unbound = eval(vec![
        match_stmt(list(vec![int(2), int(5)]), cases()),
        expr_stmt(name("x")),
    ]);
    let err = unbound.unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::NameNotFound { name } if name == "x"));
}

#[test]
fn guards_filter_cases() {
    let cases = || {
        vec![
            case(
                p_capture("n"),
                Some(compare(name("n"), CmpOp::Gt, int(10))),
                set_result(string("big")),
            ),
            case(p_capture("n"), None, set_result(string("small"))),
        ]
    };
    assert_eq!(run_match(int(50), cases()).unwrap(), Value::str("big"));
    assert_eq!(run_match(int(5), cases()).unwrap(), Value::str("small"));
}

#[test]
fn mapping_patterns_and_rest() {
    let subject = dict(vec![
        (string("kind"), string("move")),
        (string("x"), int(3)),
        (string("y"), int(4)),
    ]);
    let cases = vec![case(
        p_mapping(
            vec![(string("kind"), p_value(string("move")))],
            Some("coords"),
        ),
        None,
        set_result(name("coords")),
    )];
    let expected = Dict::from_pairs([
        (Value::str("x"), Value::Int(3)),
        (Value::str("y"), Value::Int(4)),
    ])
    .unwrap();
    assert_eq!(run_match(subject, cases).unwrap(), Value::dict(expected));
}

#[test]
fn mapping_pattern_requires_the_keys() {
    let cases = vec![
        case(
            p_mapping(vec![(string("id"), p_capture("id"))], None),
            None,
            set_result(name("id")),
        ),
        case(p_wildcard(), None, set_result(string("no id"))),
    ];
    let subject = dict(vec![(string("name"), string("x"))]);
    assert_eq!(run_match(subject, cases).unwrap(), Value::str("no id"));
}

#[test]
fn as_pattern_binds_the_whole_subject() {
    let cases = vec![case(
        p_as(p_seq(vec![p_value(int(1)), p_wildcard()]), "pair"),
        None,
        set_result(name("pair")),
    )];
    assert_eq!(
        run_match(list(vec![int(1), int(9)]), cases).unwrap(),
        Value::list(vec![Value::Int(1), Value::Int(9)])
    );
}

#[test]
fn binding_a_name_twice_is_structural() {
    let cases = vec![case(
        p_seq(vec![p_capture("x"), p_capture("x")]),
        None,
        set_result(name("x")),
    )];
    let err = run_match(list(vec![int(1), int(2)]), cases).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Structural { .. }));
}
