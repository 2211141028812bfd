use blaze_datashape::{Type, parse_type};

use crate::graph::{AccessOp, ExprGraph, LiteralValue, NodeKind, OpClass};

fn ty(source: &str) -> Type {
    parse_type(source).unwrap()
}

#[test]
fn arithmetic_is_app_of_op_of_fun() {
    let mut graph = ExprGraph::new();
    let a = graph.array("a", ty("2, int32"));
    let b = graph.array("b", ty("2, int32"));
    let sum = graph.arithmetic("Add", vec![a, b], ty("2, int32"));

    assert_eq!(graph.len(), 5);
    assert_eq!(sum.as_u32(), 4);

    let kinds: Vec<_> = graph
        .iter()
        .map(|(id, node)| format!("{id} {} : {}", node.kind.name(), node.dshape))
        .collect();
    insta::assert_snapshot!(kinds.join("\n"), @r"
    n0 Array : 2, int32
    n1 Array : 2, int32
    n2 Fun : 2, int32
    n3 Add : 2, int32
    n4 App : 2, int32
    ");

    let NodeKind::App { operator } = &graph.get(sum).unwrap().kind else {
        panic!("expected App");
    };
    assert!(matches!(
        &graph.get(*operator).unwrap().kind,
        NodeKind::Op { class: Some(OpClass::Arithmetic), children, .. } if children.len() == 1
    ));
}

#[test]
fn node_names() {
    let mut graph = ExprGraph::new();
    let a = graph.array("a", ty("int32"));
    let one = graph.literal(LiteralValue::Int(1), ty("int64"));
    let slice = graph.add(
        NodeKind::Slice {
            array: a,
            start: Some(one),
            stop: None,
            step: None,
            access: AccessOp::Set,
        },
        ty("int32"),
    );
    let opaque = graph.add(NodeKind::Opaque { kind: "Window".into() }, ty("int32"));

    let names: Vec<_> = [a, one, slice, opaque]
        .into_iter()
        .map(|id| graph.get(id).unwrap().kind.name().to_owned())
        .collect();
    assert_eq!(names, ["Array", "Literal", "Slice", "Window"]);
    assert_eq!(AccessOp::Set.to_string(), "set");
    assert_eq!(OpClass::Reduction.label(), "Reduction");
}

#[test]
#[should_panic(expected = "must be added before its parent")]
fn children_must_exist() {
    let mut other = ExprGraph::new();
    other.array("x", ty("int32"));
    let foreign = other.array("y", ty("int32"));

    let mut graph = ExprGraph::new();
    assert!(graph.is_empty());
    graph.add(
        NodeKind::Assign {
            operands: vec![foreign],
        },
        ty("int32"),
    );
}
