use blaze_datashape::parse_type;

use crate::aterm::{ATerm, Annotation, Meta, TermArena};
use crate::graph::{AccessOp, ExprGraph, NodeId};
use crate::vartable::{Constant, Operand, VariableTable};

fn node() -> NodeId {
    ExprGraph::new().array("a", parse_type("3, int32").unwrap())
}

fn sample() -> (TermArena, crate::TermId) {
    let mut terms = TermArena::new();
    let array = terms.alloc(ATerm::appl(
        "Array",
        vec![],
        Some(Annotation::new(node(), "3, int32")),
    ));
    let scale = terms.alloc(ATerm::Float {
        value: 2.0,
        annotation: None,
    });
    let label = terms.alloc(ATerm::Str {
        value: "x\"y".into(),
        annotation: None,
    });
    let op = terms.alloc(ATerm::term("Mul"));
    let root = terms.alloc(ATerm::appl(
        "Arithmetic",
        vec![op, array, scale, label],
        Some(Annotation::new(node(), "3, float64").with_meta(Meta::Access(AccessOp::Set))),
    ));
    (terms, root)
}

#[test]
fn printer_without_annotations() {
    let (terms, root) = sample();
    insta::assert_snapshot!(terms.printer(root).render(), @r#"Arithmetic(Mul, Array(), 2.0, "x\"y")"#);
}

#[test]
fn printer_with_annotations() {
    let (terms, root) = sample();
    insta::assert_snapshot!(
        terms.printer(root).annotations(true).render(),
        @r#"Arithmetic(Mul, Array(){dshape("3, int32"), n0}, 2.0, "x\"y"){dshape("3, float64"), n0, set}"#
    );
}

#[test]
fn executor_meta_display() {
    let meta = Meta::Executor {
        id: "e0".into(),
        backend: "numba".into(),
        has_output: true,
    };
    insta::assert_snapshot!(meta, @"executor(e0, numba, true)");
}

#[test]
fn arena_ids_are_dense() {
    let (terms, root) = sample();
    assert_eq!(terms.len(), 5);
    assert_eq!(root.as_u32(), 4);
    assert_eq!(root.to_string(), "t4");

    let ids: Vec<_> = terms.iter().map(|(id, _)| id.as_u32()).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);
}

#[test]
fn accessors() {
    let (terms, root) = sample();
    let term = terms.get(root).unwrap();
    assert_eq!(term.label(), Some("Arithmetic"));
    assert_eq!(term.args().len(), 4);

    let op = terms.get(term.args()[0]).unwrap();
    assert_eq!(op.label(), Some("Mul"));
    assert!(op.args().is_empty());
    assert!(op.annotation().is_none());

    let scale = terms.get(term.args()[2]).unwrap();
    assert_eq!(scale.label(), None);
}

#[test]
#[should_panic]
fn alloc_rejects_unknown_arguments() {
    let (other, root) = sample();
    let mut terms = TermArena::new();
    assert!(!other.is_empty());
    terms.alloc(ATerm::appl("Neg", vec![root], None));
}

#[test]
fn variables_are_numbered_in_allocation_order() {
    let (terms, _) = sample();
    let ids: Vec<_> = terms.iter().map(|(id, _)| id).collect();

    let mut vars = VariableTable::new();
    let first = vars.fresh(ids[1]);
    vars.bind_const(ids[2], Constant::Float(2.0));
    let second = vars.fresh(ids[4]);

    assert_eq!(first.to_string(), "%0");
    assert_eq!(second.to_string(), "%1");
    assert_eq!(vars.var_count(), 2);
    assert_eq!(vars.len(), 3);
    assert_eq!(vars.term_of(second), Some(ids[4]));
    assert_eq!(vars.get(ids[1]), Some(&Operand::Var(first)));
    assert_eq!(vars.get(ids[0]), None);

    let rendered: Vec<_> = vars
        .iter()
        .map(|(term, binding)| format!("{term} -> {binding}"))
        .collect();
    insta::assert_snapshot!(rendered.join("\n"), @r"
    t1 -> %0
    t2 -> const(2.0)
    t4 -> %1
    ");
}

#[test]
fn constant_display() {
    let rendered = [
        Constant::Int(-3),
        Constant::Float(0.25),
        Constant::Str("utf-8".into()),
    ]
    .map(|c| c.to_string());
    assert_eq!(rendered, ["const(-3)", "const(0.25)", r#"const("utf-8")"#]);
}
