//! Terse tree constructors.
//!
//! Every node gets `Span::DUMMY`. Used by tests and by hosts that assemble
//! small trees programmatically instead of running a parser.
//!
//! ```text
//! use draconic_ir::build::*;
//! let tree = module(vec![
//!     assign("a", int(1)),
//!     aug_assign("a", BinaryOp::Add, int(2)),
//!     expr_stmt(name("a")),
//! ]);
//! ```

use std::sync::Arc;

pub use crate::ast::{BinaryOp, BoolOp, CmpOp, UnaryOp};
use crate::ast::{
    Comprehension, Constant, ExceptHandler, Expr, ExprKind, FunctionDef, Keyword, LambdaDef,
    MatchCase, Module, Param, Parameters, Pattern, Stmt, StmtKind,
};
use crate::{Name, Span};

pub fn module(body: Vec<Stmt>) -> Module {
    Module { body }
}

pub fn stmt(kind: StmtKind) -> Stmt {
    Stmt::new(kind, Span::DUMMY)
}

pub fn expr(kind: ExprKind) -> Expr {
    Expr::new(kind, Span::DUMMY)
}

// Literals and names

pub fn name(id: &str) -> Expr {
    expr(ExprKind::Name(Name::new(id)))
}

pub fn int(value: i64) -> Expr {
    expr(ExprKind::Constant(Constant::Int(value)))
}

pub fn float(value: f64) -> Expr {
    expr(ExprKind::Constant(Constant::Float(value)))
}

pub fn string(value: &str) -> Expr {
    expr(ExprKind::Constant(Constant::Str(Arc::from(value))))
}

pub fn boolean(value: bool) -> Expr {
    expr(ExprKind::Constant(Constant::Bool(value)))
}

pub fn none() -> Expr {
    expr(ExprKind::Constant(Constant::None))
}

// Operators

pub fn binop(left: Expr, op: BinaryOp, right: Expr) -> Expr {
    expr(ExprKind::BinOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
    })
}

pub fn unary(op: UnaryOp, operand: Expr) -> Expr {
    expr(ExprKind::UnaryOp {
        op,
        operand: Box::new(operand),
    })
}

pub fn bool_op(op: BoolOp, values: Vec<Expr>) -> Expr {
    expr(ExprKind::BoolOp { op, values })
}

pub fn compare(left: Expr, op: CmpOp, right: Expr) -> Expr {
    compare_chain(left, vec![(op, right)])
}

pub fn compare_chain(left: Expr, links: Vec<(CmpOp, Expr)>) -> Expr {
    let (ops, comparators) = links.into_iter().unzip();
    expr(ExprKind::Compare {
        left: Box::new(left),
        ops,
        comparators,
    })
}

pub fn if_exp(test: Expr, body: Expr, orelse: Expr) -> Expr {
    expr(ExprKind::IfExp {
        test: Box::new(test),
        body: Box::new(body),
        orelse: Box::new(orelse),
    })
}

// Calls and access

pub fn call(func: Expr, args: Vec<Expr>) -> Expr {
    call_kw(func, args, Vec::new())
}

pub fn call_kw(func: Expr, args: Vec<Expr>, keywords: Vec<(&str, Expr)>) -> Expr {
    let keywords = keywords
        .into_iter()
        .map(|(arg, value)| Keyword {
            arg: Some(Name::new(arg)),
            value,
        })
        .collect();
    expr(ExprKind::Call {
        func: Box::new(func),
        args,
        keywords,
    })
}

pub fn attr(value: Expr, attr: &str) -> Expr {
    expr(ExprKind::Attribute {
        value: Box::new(value),
        attr: Name::new(attr),
    })
}

/// `value.method(args)`
pub fn method(value: Expr, method: &str, args: Vec<Expr>) -> Expr {
    call(attr(value, method), args)
}

pub fn subscript(value: Expr, index: Expr) -> Expr {
    expr(ExprKind::Subscript {
        value: Box::new(value),
        slice: Box::new(index),
    })
}

pub fn slice(lower: Option<Expr>, upper: Option<Expr>, step: Option<Expr>) -> Expr {
    expr(ExprKind::Slice {
        lower: lower.map(Box::new),
        upper: upper.map(Box::new),
        step: step.map(Box::new),
    })
}

// Displays

pub fn list(elts: Vec<Expr>) -> Expr {
    expr(ExprKind::List(elts))
}

pub fn tuple(elts: Vec<Expr>) -> Expr {
    expr(ExprKind::Tuple(elts))
}

pub fn set(elts: Vec<Expr>) -> Expr {
    expr(ExprKind::Set(elts))
}

pub fn dict(pairs: Vec<(Expr, Expr)>) -> Expr {
    let (keys, values): (Vec<_>, Vec<_>) = pairs.into_iter().map(|(k, v)| (Some(k), v)).unzip();
    expr(ExprKind::Dict { keys, values })
}

pub fn starred(value: Expr) -> Expr {
    expr(ExprKind::Starred(Box::new(value)))
}

// Comprehensions

pub fn comprehension(target: Expr, iter: Expr, ifs: Vec<Expr>) -> Comprehension {
    Comprehension { target, iter, ifs }
}

pub fn list_comp(elt: Expr, generators: Vec<Comprehension>) -> Expr {
    expr(ExprKind::ListComp {
        elt: Box::new(elt),
        generators,
    })
}

pub fn set_comp(elt: Expr, generators: Vec<Comprehension>) -> Expr {
    expr(ExprKind::SetComp {
        elt: Box::new(elt),
        generators,
    })
}

pub fn dict_comp(key: Expr, value: Expr, generators: Vec<Comprehension>) -> Expr {
    expr(ExprKind::DictComp {
        key: Box::new(key),
        value: Box::new(value),
        generators,
    })
}

pub fn generator_exp(elt: Expr, generators: Vec<Comprehension>) -> Expr {
    expr(ExprKind::GeneratorExp {
        elt: Box::new(elt),
        generators,
    })
}

// Functions

pub fn param(name: &str, default: Option<Expr>) -> Param {
    Param {
        name: Name::new(name),
        default,
    }
}

/// Plain positional-or-keyword parameters without defaults.
pub fn params(names: &[&str]) -> Parameters {
    Parameters {
        args: names.iter().map(|n| param(n, None)).collect(),
        ..Parameters::default()
    }
}

pub fn lambda(names: &[&str], body: Expr) -> Expr {
    expr(ExprKind::Lambda(Arc::new(LambdaDef {
        params: params(names),
        body,
    })))
}

pub fn named(target: &str, value: Expr) -> Expr {
    expr(ExprKind::NamedExpr {
        target: Name::new(target),
        value: Box::new(value),
    })
}

pub fn def(name: &str, names: &[&str], body: Vec<Stmt>) -> Stmt {
    def_with(name, params(names), body)
}

pub fn def_with(name: &str, params: Parameters, body: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::FunctionDef(Arc::new(FunctionDef {
        name: Name::new(name),
        params,
        body,
        span: Span::DUMMY,
    })))
}

// f-strings

pub fn fstring(parts: Vec<Expr>) -> Expr {
    expr(ExprKind::JoinedStr(parts))
}

pub fn formatted(value: Expr, conversion: Option<char>, spec: Option<&str>) -> Expr {
    expr(ExprKind::FormattedValue {
        value: Box::new(value),
        conversion,
        format_spec: spec.map(|s| Box::new(fstring(vec![string(s)]))),
    })
}

// Statements

pub fn expr_stmt(value: Expr) -> Stmt {
    stmt(StmtKind::Expr(value))
}

pub fn assign(target: &str, value: Expr) -> Stmt {
    assign_to(vec![name(target)], value)
}

pub fn assign_to(targets: Vec<Expr>, value: Expr) -> Stmt {
    stmt(StmtKind::Assign { targets, value })
}

pub fn aug_assign(target: &str, op: BinaryOp, value: Expr) -> Stmt {
    aug_assign_to(name(target), op, value)
}

pub fn aug_assign_to(target: Expr, op: BinaryOp, value: Expr) -> Stmt {
    stmt(StmtKind::AugAssign { target, op, value })
}

pub fn return_stmt(value: Option<Expr>) -> Stmt {
    stmt(StmtKind::Return(value))
}

pub fn if_stmt(test: Expr, body: Vec<Stmt>, orelse: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::If { test, body, orelse })
}

pub fn while_loop(test: Expr, body: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::While {
        test,
        body,
        orelse: Vec::new(),
    })
}

pub fn for_loop(target: Expr, iter: Expr, body: Vec<Stmt>) -> Stmt {
    for_else(target, iter, body, Vec::new())
}

pub fn for_else(target: Expr, iter: Expr, body: Vec<Stmt>, orelse: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::For {
        target,
        iter,
        body,
        orelse,
    })
}

pub fn break_stmt() -> Stmt {
    stmt(StmtKind::Break)
}

pub fn continue_stmt() -> Stmt {
    stmt(StmtKind::Continue)
}

pub fn pass() -> Stmt {
    stmt(StmtKind::Pass)
}

pub fn except(types: Option<Expr>, body: Vec<Stmt>) -> ExceptHandler {
    ExceptHandler {
        types,
        name: None,
        body,
        span: Span::DUMMY,
    }
}

pub fn try_stmt(
    body: Vec<Stmt>,
    handlers: Vec<ExceptHandler>,
    orelse: Vec<Stmt>,
    finalbody: Vec<Stmt>,
) -> Stmt {
    stmt(StmtKind::Try {
        body,
        handlers,
        orelse,
        finalbody,
    })
}

pub fn raise(value: Option<Expr>) -> Stmt {
    stmt(StmtKind::Raise(value))
}

pub fn match_stmt(subject: Expr, cases: Vec<MatchCase>) -> Stmt {
    stmt(StmtKind::Match { subject, cases })
}

pub fn case(pattern: Pattern, guard: Option<Expr>, body: Vec<Stmt>) -> MatchCase {
    MatchCase {
        pattern,
        guard,
        body,
    }
}

// Patterns

pub fn p_value(value: Expr) -> Pattern {
    Pattern::Value(value)
}

pub fn p_none() -> Pattern {
    Pattern::Singleton(Constant::None)
}

pub fn p_capture(name: &str) -> Pattern {
    Pattern::As {
        pattern: None,
        name: Some(Name::new(name)),
    }
}

pub fn p_wildcard() -> Pattern {
    Pattern::As {
        pattern: None,
        name: None,
    }
}

pub fn p_as(pattern: Pattern, name: &str) -> Pattern {
    Pattern::As {
        pattern: Some(Box::new(pattern)),
        name: Some(Name::new(name)),
    }
}

pub fn p_or(alternatives: Vec<Pattern>) -> Pattern {
    Pattern::Or(alternatives)
}

pub fn p_seq(patterns: Vec<Pattern>) -> Pattern {
    Pattern::Sequence(patterns)
}

pub fn p_star(name: Option<&str>) -> Pattern {
    Pattern::Star(name.map(Name::new))
}

pub fn p_mapping(entries: Vec<(Expr, Pattern)>, rest: Option<&str>) -> Pattern {
    let (keys, patterns) = entries.into_iter().unzip();
    Pattern::Mapping {
        keys,
        patterns,
        rest: rest.map(Name::new),
    }
}
