use blaze_datashape::{Type, parse_type};

use crate::annotate::{Annotated, annotate, annotate_with_limit};
use crate::aterm::{ATerm, Meta};
use crate::graph::{AccessOp, ExprGraph, LiteralValue, NodeKind, OpClass};
use crate::{Error, NodeId};

fn ty(source: &str) -> Type {
    parse_type(source).unwrap()
}

fn dump(annotated: &Annotated, annotations: bool) -> String {
    annotated
        .roots
        .iter()
        .map(|root| {
            let term = annotated.terms.printer(*root).annotations(annotations).render();
            format!("{term}\n")
        })
        .collect()
}

#[test]
fn arithmetic_gets_classifier_head() {
    let mut graph = ExprGraph::new();
    let a = graph.array("a", ty("2, int32"));
    let b = graph.array("b", ty("2, int32"));
    let sum = graph.arithmetic("Add", vec![a, b], ty("2, int32"));

    let annotated = annotate(&graph, sum).unwrap();
    insta::assert_snapshot!(dump(&annotated, false), @"Arithmetic(Add, Array(), Array())");
    insta::assert_snapshot!(dump(&annotated, true), @r#"Arithmetic(Add, Array(){dshape("2, int32"), n0}, Array(){dshape("2, int32"), n1}){dshape("2, int32"), n3}"#);
    assert_eq!(annotated.operands, vec![a, b]);
}

#[test]
fn other_classes_and_unclassified_ops() {
    let mut graph = ExprGraph::new();
    let a = graph.array("a", ty("3, float64"));
    let sqrt = graph.op("Sqrt", Some(OpClass::Math), vec![a], ty("3, float64"));
    let sum = graph.op("Sum", Some(OpClass::Reduction), vec![sqrt], ty("float64"));
    let neg = graph.op("Neg", None, vec![sum], ty("float64"));

    let annotated = annotate(&graph, neg).unwrap();
    insta::assert_snapshot!(dump(&annotated, false), @"Neg(Reduction(Sum, Math(Sqrt, Array())))");
}

#[test]
fn literals() {
    let mut graph = ExprGraph::new();
    let i = graph.literal(LiteralValue::Int(3), ty("int64"));
    let x = graph.literal(LiteralValue::Float(2.5), ty("float64"));
    let s = graph.literal(LiteralValue::Text("abc".into()), ty("string"));
    let fun = graph.add(NodeKind::Fun { children: vec![i, x, s] }, ty("int64"));
    let op = graph.op("Pack", None, vec![fun], ty("3, object"));

    let annotated = annotate(&graph, op).unwrap();
    insta::assert_snapshot!(dump(&annotated, true), @r#"Pack(3{dshape("int64"), n0}, 2.5{dshape("float64"), n1}, "abc"{dshape("string"), n2}){dshape("3, object"), n4}"#);
    assert!(annotated.operands.is_empty());
}

#[test]
fn slice_always_has_four_arguments() {
    let mut graph = ExprGraph::new();
    let a = graph.array("a", ty("10, float64"));
    let start = graph.literal(LiteralValue::Int(1), ty("int64"));
    let slice = graph.add(
        NodeKind::Slice {
            array: a,
            start: Some(start),
            stop: None,
            step: None,
            access: AccessOp::Get,
        },
        ty("9, float64"),
    );

    let annotated = annotate(&graph, slice).unwrap();
    insta::assert_snapshot!(dump(&annotated, true), @r#"Slice(Array(){dshape("10, float64"), n0}, 1{dshape("int64"), n1}, None, None){dshape("9, float64"), n2, get}"#);

    let root = annotated.terms.get(annotated.roots[0]).unwrap();
    assert_eq!(root.args().len(), 4);
    assert_eq!(
        root.annotation().unwrap().meta,
        Some(Meta::Access(AccessOp::Get))
    );
}

#[test]
fn fun_children_are_spliced() {
    let mut graph = ExprGraph::new();
    let a = graph.array("a", ty("4, 4, int8"));
    let i = graph.literal(LiteralValue::Int(1), ty("int64"));
    let j = graph.literal(LiteralValue::Int(2), ty("int64"));
    let idx = graph.add(NodeKind::Fun { children: vec![i, j] }, ty("int64"));
    let index = graph.add(
        NodeKind::Index {
            operands: vec![a, idx],
            access: AccessOp::Set,
        },
        ty("int8"),
    );

    let annotated = annotate(&graph, index).unwrap();
    insta::assert_snapshot!(dump(&annotated, true), @r#"Index(Array(){dshape("4, 4, int8"), n0}, 1{dshape("int64"), n1}, 2{dshape("int64"), n2}){dshape("int8"), n4, set}"#);
}

#[test]
fn fun_root_yields_several_terms() {
    let mut graph = ExprGraph::new();
    let a = graph.array("a", ty("int32"));
    let b = graph.array("b", ty("int32"));
    let fun = graph.add(NodeKind::Fun { children: vec![a, b] }, ty("int32"));

    let annotated = annotate(&graph, fun).unwrap();
    insta::assert_snapshot!(dump(&annotated, false), @r"
    Array()
    Array()
    ");
}

#[test]
fn assign() {
    let mut graph = ExprGraph::new();
    let a = graph.array("a", ty("2, int32"));
    let b = graph.array("b", ty("2, int32"));
    let assign = graph.add(NodeKind::Assign { operands: vec![a, b] }, ty("2, int32"));

    let annotated = annotate(&graph, assign).unwrap();
    insta::assert_snapshot!(dump(&annotated, false), @"Assign(Array(), Array())");
}

#[test]
fn shared_nodes_become_shared_terms() {
    let mut graph = ExprGraph::new();
    let a = graph.array("a", ty("2, int32"));
    let b = graph.array("b", ty("2, int32"));
    let sum = graph.arithmetic("Add", vec![a, b], ty("2, int32"));
    let square = graph.arithmetic("Mul", vec![sum, sum], ty("2, int32"));

    let annotated = annotate(&graph, square).unwrap();
    insta::assert_snapshot!(dump(&annotated, false), @"Arithmetic(Mul, Arithmetic(Add, Array(), Array()), Arithmetic(Add, Array(), Array()))");

    let root = annotated.terms.get(annotated.roots[0]).unwrap();
    let args = root.args();
    assert_eq!(args[1], args[2]);
    assert_eq!(annotated.terms.len(), 6);
    assert_eq!(annotated.operands, vec![a, b]);
}

#[test]
fn opaque_node_is_unhandled() {
    let mut graph = ExprGraph::new();
    let a = graph.array("a", ty("int32"));
    let window = graph.add(NodeKind::Opaque { kind: "Window".into() }, ty("int32"));
    let fun = graph.add(NodeKind::Fun { children: vec![a, window] }, ty("int32"));

    assert_eq!(
        annotate(&graph, fun).unwrap_err(),
        Error::UnhandledNodeKind {
            label: "Window".into()
        }
    );
}

#[test]
fn slice_bound_must_be_one_term() {
    let mut graph = ExprGraph::new();
    let a = graph.array("a", ty("10, int32"));
    let i = graph.literal(LiteralValue::Int(1), ty("int64"));
    let j = graph.literal(LiteralValue::Int(2), ty("int64"));
    let pair = graph.add(NodeKind::Fun { children: vec![i, j] }, ty("int64"));
    let slice = graph.add(
        NodeKind::Slice {
            array: a,
            start: None,
            stop: Some(pair),
            step: None,
            access: AccessOp::Get,
        },
        ty("int32"),
    );

    assert_eq!(
        annotate(&graph, slice).unwrap_err(),
        Error::ExpectedSingleTerm {
            node: pair,
            found: 2
        }
    );
}

#[test]
fn dangling_root() {
    let mut other = ExprGraph::new();
    other.array("x", ty("int32"));
    let foreign: NodeId = other.array("y", ty("int32"));

    let graph = ExprGraph::new();
    assert_eq!(
        annotate(&graph, foreign).unwrap_err(),
        Error::DanglingNode { node: foreign }
    );
}

#[test]
fn operator_term_has_no_annotation() {
    let mut graph = ExprGraph::new();
    let a = graph.array("a", ty("int32"));
    let neg = graph.op("Neg", Some(OpClass::Arithmetic), vec![a], ty("int32"));

    let annotated = annotate(&graph, neg).unwrap();
    let root = annotated.terms.get(annotated.roots[0]).unwrap();
    let op = annotated.terms.get(root.args()[0]).unwrap();
    assert!(matches!(op, ATerm::Term { label, annotation: None } if label == "Neg"));
}

#[test]
fn depth_limit_bounds_the_graph_walk() {
    let mut graph = ExprGraph::new();
    let mut root = graph.array("a", ty("int32"));
    for _ in 0..8 {
        root = graph.op("Neg", None, vec![root], ty("int32"));
    }

    assert_eq!(
        annotate_with_limit(&graph, root, Some(8)).unwrap_err(),
        Error::DepthLimitExceeded { limit: 8 }
    );
    assert_eq!(annotate_with_limit(&graph, root, Some(9)).unwrap().terms.len(), 9);
    assert!(annotate_with_limit(&graph, root, None).is_ok());
}
