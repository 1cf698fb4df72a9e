use pretty_assertions::assert_eq;

use super::*;
use crate::build::*;
use crate::Name;

fn function_def(stmt: &Stmt) -> &FunctionDef {
    match &stmt.kind {
        StmtKind::FunctionDef(def) => def,
        other => panic!("expected a function definition, got {other:?}"),
    }
}

#[test]
fn docstring_is_leading_string_constant() {
    let stmt = def("f", &[], vec![expr_stmt(string("Adds things.")), pass()]);
    assert_eq!(function_def(&stmt).docstring(), Some("Adds things."));
}

#[test]
fn no_docstring_when_first_statement_is_not_a_string() {
    let stmt = def("f", &[], vec![expr_stmt(int(1)), expr_stmt(string("late"))]);
    assert_eq!(function_def(&stmt).docstring(), None);

    let empty = def("g", &[], vec![]);
    assert_eq!(function_def(&empty).docstring(), None);
}

#[test]
fn positional_parameters_include_positional_only() {
    let params = Parameters {
        posonly: vec![param("a", None)],
        args: vec![param("b", Some(int(2)))],
        vararg: Some(Name::new("rest")),
        kwonly: vec![param("c", None)],
        kwarg: None,
    };
    let names: Vec<&str> = params.positional().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(params.positional_count(), 2);
}

#[test]
fn operator_symbols() {
    assert_eq!(BinaryOp::FloorDiv.as_symbol(), "//");
    assert_eq!(BinaryOp::BitOr.as_symbol(), "|");
    assert_eq!(CmpOp::NotIn.as_symbol(), "not in");
    assert_eq!(UnaryOp::Not.as_symbol(), "not");
}

#[cfg(feature = "serde")]
mod serde_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn module_deserializes_from_json() {
        let json = r#"{
            "body": [
                {"kind": {"Assign": {
                    "targets": [{"kind": {"Name": "a"}}],
                    "value": {"kind": {"Constant": {"Int": 1}}}
                }}, "span": {"line": 1, "col": 0}},
                {"kind": {"AugAssign": {
                    "target": {"kind": {"Name": "a"}},
                    "op": "Add",
                    "value": {"kind": {"Constant": {"Int": 2}}}
                }}}
            ]
        }"#;
        let parsed: Module = serde_json::from_str(json).unwrap();
        let expected = module(vec![
            Stmt::new(
                StmtKind::Assign {
                    targets: vec![name("a")],
                    value: int(1),
                },
                crate::Span::new(1, 0),
            ),
            aug_assign("a", BinaryOp::Add, int(2)),
        ]);
        assert_eq!(parsed, expected);
    }

    #[test]
    fn tree_survives_json_round_trip() {
        let tree = module(vec![match_stmt(
            name("a"),
            vec![case(
                p_or(vec![p_as(p_value(int(1)), "one"), p_as(p_value(int(2)), "two")]),
                None,
                vec![expr_stmt(call(name("print"), vec![name("one")]))],
            )],
        )]);
        let json = serde_json::to_string(&tree).unwrap();
        let back: Module = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
    }
}
