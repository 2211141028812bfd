//! Expression graph to annotated terms.
//!
//! Every graph node is visited at most once. A node reached through several
//! parents maps to the same term ids, so sharing in the graph survives as
//! sharing in the term arena.
//!
//! A visit yields a list of terms rather than one: `Fun` nodes stand for an
//! argument list and splice their children into the parent.

use std::collections::HashMap;

use crate::aterm::{ATerm, Annotation, Meta, TermArena, TermId};
use crate::graph::{ExprGraph, LiteralValue, Node, NodeId, NodeKind};
use crate::{Error, Result};

/// Placeholder label for an absent slice bound.
pub const NONE_LABEL: &str = "None";

/// Default bound on how deep the graph and term walks may recurse.
pub const DEFAULT_DEPTH_LIMIT: u32 = 1024;

/// Output of [`annotate`].
#[derive(Clone, Debug, Default)]
pub struct Annotated {
    pub terms: TermArena,
    /// Terms produced for the root node.
    pub roots: Vec<TermId>,
    /// Array leaves in first-visit order.
    pub operands: Vec<NodeId>,
}

/// Lowers the graph reachable from `root` into a term arena.
pub fn annotate(graph: &ExprGraph, root: NodeId) -> Result<Annotated> {
    annotate_with_limit(graph, root, Some(DEFAULT_DEPTH_LIMIT))
}

/// Like [`annotate`], failing with `DepthLimitExceeded` once a path from `root`
/// is longer than `depth_limit` nodes. `None` disables the check.
pub fn annotate_with_limit(
    graph: &ExprGraph,
    root: NodeId,
    depth_limit: Option<u32>,
) -> Result<Annotated> {
    let mut annotator = TermAnnotator::new(graph, depth_limit);
    let roots = annotator.visit(root)?;
    tracing::debug!(
        terms = annotator.terms.len(),
        operands = annotator.operands.len(),
        "graph annotated"
    );
    Ok(Annotated {
        terms: annotator.terms,
        roots,
        operands: annotator.operands,
    })
}

struct TermAnnotator<'g> {
    graph: &'g ExprGraph,
    terms: TermArena,
    operands: Vec<NodeId>,
    memo: HashMap<NodeId, Vec<TermId>>,
    depth: u32,
    depth_limit: Option<u32>,
}

impl<'g> TermAnnotator<'g> {
    fn new(graph: &'g ExprGraph, depth_limit: Option<u32>) -> Self {
        Self {
            graph,
            terms: TermArena::new(),
            operands: Vec::new(),
            memo: HashMap::new(),
            depth: 0,
            depth_limit,
        }
    }

    fn visit(&mut self, id: NodeId) -> Result<Vec<TermId>> {
        if let Some(terms) = self.memo.get(&id) {
            return Ok(terms.clone());
        }
        let graph = self.graph;
        let node = graph.get(id).ok_or(Error::DanglingNode { node: id })?;
        tracing::trace!(node = %id, kind = node.kind.name(), "annotating");
        if let Some(limit) = self.depth_limit
            && self.depth >= limit
        {
            return Err(Error::DepthLimitExceeded { limit });
        }
        self.depth += 1;
        let lowered = self.lower(id, node);
        self.depth -= 1;
        let terms = lowered?;
        self.memo.insert(id, terms.clone());
        Ok(terms)
    }

    fn visit_all(&mut self, ids: &[NodeId]) -> Result<Vec<TermId>> {
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            out.extend(self.visit(*id)?);
        }
        Ok(out)
    }

    /// Visits a node that must stand for exactly one term.
    fn visit_one(&mut self, id: NodeId) -> Result<TermId> {
        match self.visit(id)?.as_slice() {
            [term] => Ok(*term),
            terms => Err(Error::ExpectedSingleTerm {
                node: id,
                found: terms.len(),
            }),
        }
    }

    fn lower(&mut self, id: NodeId, node: &Node) -> Result<Vec<TermId>> {
        let annotation = || Annotation::new(id, node.dshape.to_string());

        let term = match &node.kind {
            NodeKind::App { operator } => return self.visit(*operator),
            NodeKind::Fun { children } => return self.visit_all(children),
            NodeKind::Op {
                name,
                class,
                children,
            } => {
                let children = self.visit_all(children)?;
                match class {
                    Some(class) => {
                        let op = self.terms.alloc(ATerm::term(name.clone()));
                        let args = std::iter::once(op).chain(children).collect();
                        ATerm::appl(class.label(), args, Some(annotation()))
                    }
                    None => ATerm::appl(name.clone(), children, Some(annotation())),
                }
            }
            NodeKind::Literal(value) => {
                let annotation = Some(annotation());
                match value {
                    LiteralValue::Int(value) => ATerm::Int {
                        value: *value,
                        annotation,
                    },
                    LiteralValue::Float(value) => ATerm::Float {
                        value: *value,
                        annotation,
                    },
                    LiteralValue::Text(value) => ATerm::Str {
                        value: value.clone(),
                        annotation,
                    },
                }
            }
            NodeKind::Array { .. } => {
                self.operands.push(id);
                ATerm::appl("Array", Vec::new(), Some(annotation()))
            }
            NodeKind::Slice {
                array,
                start,
                stop,
                step,
                access,
            } => {
                let array = self.visit_one(*array)?;
                let mut args = vec![array];
                for bound in [start, stop, step] {
                    let term = match bound {
                        Some(bound) => self.visit_one(*bound)?,
                        None => self.terms.alloc(ATerm::term(NONE_LABEL)),
                    };
                    args.push(term);
                }
                let annotation = annotation().with_meta(Meta::Access(*access));
                ATerm::appl("Slice", args, Some(annotation))
            }
            NodeKind::Index { operands, access } => {
                let args = self.visit_all(operands)?;
                let annotation = annotation().with_meta(Meta::Access(*access));
                ATerm::appl("Index", args, Some(annotation))
            }
            NodeKind::Assign { operands } => {
                let args = self.visit_all(operands)?;
                ATerm::appl("Assign", args, Some(annotation()))
            }
            NodeKind::Opaque { kind } => {
                return Err(Error::UnhandledNodeKind {
                    label: kind.clone(),
                });
            }
        };

        Ok(vec![self.terms.alloc(term)])
    }
}
