//! Arena model of the expression graph consumed by the annotator.
//!
//! Nodes are appended and never removed, so a [`NodeId`] stays valid for the
//! lifetime of its graph. Children must exist before their parents, which keeps
//! every graph acyclic by construction.

use std::fmt;

use blaze_datashape::Type;
use serde::Serialize;

/// Handle to a node in an [`ExprGraph`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Operator family. Drives the classifier head of the produced term.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
pub enum OpClass {
    Arithmetic,
    Math,
    Reduction,
}

impl OpClass {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Arithmetic => "Arithmetic",
            Self::Math => "Math",
            Self::Reduction => "Reduction",
        }
    }
}

/// Whether a slice or index reads from or writes into its array.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessOp {
    Get,
    Set,
}

impl fmt::Display for AccessOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "get",
            Self::Set => "set",
        })
    }
}

#[derive(Clone, PartialEq, Debug, Serialize)]
pub enum LiteralValue {
    Int(i64),
    Float(f64),
    Text(String),
}

#[derive(Clone, PartialEq, Debug, Serialize)]
pub enum NodeKind {
    /// Function application; only its operator is lowered.
    App { operator: NodeId },
    /// Argument list. Its children are spliced into the enclosing operand list.
    Fun { children: Vec<NodeId> },
    Op {
        name: String,
        class: Option<OpClass>,
        children: Vec<NodeId>,
    },
    Literal(LiteralValue),
    /// Indexable data source.
    Array { name: String },
    Slice {
        array: NodeId,
        start: Option<NodeId>,
        stop: Option<NodeId>,
        step: Option<NodeId>,
        access: AccessOp,
    },
    Index {
        operands: Vec<NodeId>,
        access: AccessOp,
    },
    Assign { operands: Vec<NodeId> },
    /// Node kind the annotator has no lowering for.
    Opaque { kind: String },
}

impl NodeKind {
    /// Short name used in logs and errors.
    pub fn name(&self) -> &str {
        match self {
            Self::App { .. } => "App",
            Self::Fun { .. } => "Fun",
            Self::Op { name, .. } => name,
            Self::Literal(_) => "Literal",
            Self::Array { .. } => "Array",
            Self::Slice { .. } => "Slice",
            Self::Index { .. } => "Index",
            Self::Assign { .. } => "Assign",
            Self::Opaque { kind } => kind,
        }
    }

    fn children(&self) -> Vec<NodeId> {
        match self {
            Self::App { operator } => vec![*operator],
            Self::Fun { children } | Self::Op { children, .. } => children.clone(),
            Self::Slice {
                array,
                start,
                stop,
                step,
                ..
            } => std::iter::once(*array)
                .chain([*start, *stop, *step].into_iter().flatten())
                .collect(),
            Self::Index { operands, .. } | Self::Assign { operands } => operands.clone(),
            Self::Literal(_) | Self::Array { .. } | Self::Opaque { .. } => Vec::new(),
        }
    }
}

/// Graph node: what it computes and the datashape of its result.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    pub dshape: Type,
}

#[derive(Clone, Debug, Default)]
pub struct ExprGraph {
    nodes: Vec<Node>,
}

impl ExprGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node.
    ///
    /// # Panics
    /// Panics if a child id does not belong to this graph yet.
    pub fn add(&mut self, kind: NodeKind, dshape: Type) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        for child in kind.children() {
            assert!(
                child.index() < self.nodes.len(),
                "child {child} must be added before its parent"
            );
        }
        self.nodes.push(Node { kind, dshape });
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i as u32), node))
    }

    pub fn array(&mut self, name: impl Into<String>, dshape: Type) -> NodeId {
        self.add(NodeKind::Array { name: name.into() }, dshape)
    }

    pub fn literal(&mut self, value: LiteralValue, dshape: Type) -> NodeId {
        self.add(NodeKind::Literal(value), dshape)
    }

    pub fn op(
        &mut self,
        name: impl Into<String>,
        class: Option<OpClass>,
        children: Vec<NodeId>,
        dshape: Type,
    ) -> NodeId {
        self.add(
            NodeKind::Op {
                name: name.into(),
                class,
                children,
            },
            dshape,
        )
    }

    /// Arithmetic operator applied to an argument list, the shape producers emit
    /// for `a + b`: `App(Op(Fun(a, b)))`.
    pub fn arithmetic(
        &mut self,
        name: impl Into<String>,
        args: Vec<NodeId>,
        dshape: Type,
    ) -> NodeId {
        let fun = self.add(NodeKind::Fun { children: args }, dshape.clone());
        let op = self.op(name, Some(OpClass::Arithmetic), vec![fun], dshape.clone());
        self.add(NodeKind::App { operator: op }, dshape)
    }
}
