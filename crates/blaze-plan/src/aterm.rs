//! Annotated terms: the tree form between the expression graph and instructions.
//!
//! Terms live in a [`TermArena`] and refer to each other by [`TermId`]. Identity
//! is the id, not structural equality: two equal-looking `Array()` terms for
//! different graph nodes are different terms, while a shared sub-expression is
//! one id referenced from several parents.

use std::fmt::{self, Write};

use serde::Serialize;

use crate::graph::{AccessOp, NodeId};

/// Handle to a term in a [`TermArena`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
pub struct TermId(u32);

impl TermId {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Extra data attached to a term's annotation.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub enum Meta {
    /// Read or write access for `Slice` and `Index`.
    Access(AccessOp),
    /// Marks a subtree handed off to an executor.
    Executor {
        id: String,
        backend: String,
        /// The last argument receives the executor's result.
        has_output: bool,
    },
}

impl fmt::Display for Meta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Meta::Access(access) => write!(f, "{access}"),
            Meta::Executor {
                id,
                backend,
                has_output,
            } => write!(f, "executor({id}, {backend}, {has_output})"),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct Annotation {
    /// Graph node the term was produced from.
    pub node: NodeId,
    /// Rendered datashape of the node's result.
    pub dshape: String,
    pub meta: Option<Meta>,
}

impl Annotation {
    pub fn new(node: NodeId, dshape: impl Into<String>) -> Self {
        Self {
            node,
            dshape: dshape.into(),
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }
}

#[derive(Clone, PartialEq, Debug, Serialize)]
pub enum ATerm {
    /// Bare label: operator names, placeholders, text literals.
    Term {
        label: String,
        annotation: Option<Annotation>,
    },
    Appl {
        head: String,
        args: Vec<TermId>,
        annotation: Option<Annotation>,
    },
    Int {
        value: i64,
        annotation: Option<Annotation>,
    },
    Float {
        value: f64,
        annotation: Option<Annotation>,
    },
    Str {
        value: String,
        annotation: Option<Annotation>,
    },
}

impl ATerm {
    pub fn term(label: impl Into<String>) -> Self {
        ATerm::Term {
            label: label.into(),
            annotation: None,
        }
    }

    pub fn appl(
        head: impl Into<String>,
        args: Vec<TermId>,
        annotation: Option<Annotation>,
    ) -> Self {
        ATerm::Appl {
            head: head.into(),
            args,
            annotation,
        }
    }

    pub fn annotation(&self) -> Option<&Annotation> {
        match self {
            ATerm::Term { annotation, .. }
            | ATerm::Appl { annotation, .. }
            | ATerm::Int { annotation, .. }
            | ATerm::Float { annotation, .. }
            | ATerm::Str { annotation, .. } => annotation.as_ref(),
        }
    }

    /// Head of an application or label of a bare term.
    pub fn label(&self) -> Option<&str> {
        match self {
            ATerm::Term { label, .. } => Some(label),
            ATerm::Appl { head, .. } => Some(head),
            ATerm::Int { .. } | ATerm::Float { .. } | ATerm::Str { .. } => None,
        }
    }

    pub fn args(&self) -> &[TermId] {
        match self {
            ATerm::Appl { args, .. } => args,
            _ => &[],
        }
    }
}

/// Append-only term storage.
#[derive(Clone, Debug, Default, Serialize)]
pub struct TermArena {
    terms: Vec<ATerm>,
}

impl TermArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a term.
    ///
    /// # Panics
    /// Panics if an argument id does not belong to this arena yet.
    pub fn alloc(&mut self, term: ATerm) -> TermId {
        for arg in term.args() {
            assert!(
                arg.index() < self.terms.len(),
                "argument {arg} must be allocated before its parent"
            );
        }
        let id = TermId(self.terms.len() as u32);
        self.terms.push(term);
        id
    }

    pub fn get(&self, id: TermId) -> Option<&ATerm> {
        self.terms.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TermId, &ATerm)> {
        self.terms
            .iter()
            .enumerate()
            .map(|(i, term)| (TermId(i as u32), term))
    }

    pub fn printer(&self, root: TermId) -> TermPrinter<'_> {
        TermPrinter::new(self, root)
    }
}

/// Builder-pattern printer for a term tree.
///
/// Renders `Arithmetic(Add, Array(), Array())`; with annotations enabled every
/// annotated term gets a `{dshape("..."), n3}` suffix.
pub struct TermPrinter<'a> {
    arena: &'a TermArena,
    root: TermId,
    annotations: bool,
}

impl<'a> TermPrinter<'a> {
    pub fn new(arena: &'a TermArena, root: TermId) -> Self {
        Self {
            arena,
            root,
            annotations: false,
        }
    }

    pub fn annotations(mut self, value: bool) -> Self {
        self.annotations = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> fmt::Result {
        self.format_term(w, self.root)
    }

    fn format_term(&self, w: &mut impl Write, id: TermId) -> fmt::Result {
        let Some(term) = self.arena.get(id) else {
            return write!(w, "<{id}?>");
        };

        match term {
            ATerm::Term { label, .. } => w.write_str(label)?,
            ATerm::Appl { head, args, .. } => {
                write!(w, "{head}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        w.write_str(", ")?;
                    }
                    self.format_term(w, *arg)?;
                }
                w.write_char(')')?;
            }
            ATerm::Int { value, .. } => write!(w, "{value}")?,
            ATerm::Float { value, .. } => write!(w, "{value:?}")?,
            ATerm::Str { value, .. } => write!(w, "{value:?}")?,
        }

        if self.annotations
            && let Some(annotation) = term.annotation()
        {
            write!(w, "{{dshape({:?}), {}", annotation.dshape, annotation.node)?;
            if let Some(meta) = &annotation.meta {
                write!(w, ", {meta}")?;
            }
            w.write_char('}')?;
        }

        Ok(())
    }
}
