//! Planning for array expressions: expression graph to annotated terms to
//! linear instructions.
//!
//! # Example
//!
//! ```
//! use blaze_datashape::parse_type;
//! use blaze_plan::{ExecutorTable, ExprGraph, OperatorTable, compile_graph};
//!
//! let ty = parse_type("2, 2, int32").unwrap();
//! let mut graph = ExprGraph::new();
//! let a = graph.array("a", ty.clone());
//! let b = graph.array("b", ty.clone());
//! let sum = graph.arithmetic("Add", vec![a, b], ty);
//!
//! let executors: ExecutorTable<()> = ExecutorTable::new();
//! let plan = compile_graph(&graph, sum, &executors, &OperatorTable::arithmetic()).unwrap();
//! assert_eq!(plan.to_string(), "%2 = add(%0, %1)");
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod annotate;
pub mod aterm;
pub mod generate;
pub mod graph;
pub mod instructions;
pub mod operators;
pub mod vartable;

#[cfg(test)]
mod annotate_tests;
#[cfg(test)]
mod aterm_tests;
#[cfg(test)]
mod graph_tests;
#[cfg(test)]
mod operators_tests;

use std::fmt;

use blaze_datashape::DatashapeParser;

pub use annotate::{Annotated, DEFAULT_DEPTH_LIMIT, annotate, annotate_with_limit};
pub use aterm::{ATerm, Annotation, Meta, TermArena, TermId};
pub use generate::InstructionGen;
pub use graph::{AccessOp, ExprGraph, LiteralValue, Node, NodeId, NodeKind, OpClass};
pub use instructions::{Callee, Instruction};
pub use operators::{
    ExecutorTable, OperatorCall, OperatorLookup, OperatorRef, OperatorTable, ResolvedOperator,
};
pub use vartable::{Binding, Constant, Operand, VarName, VariableTable};

/// Errors that can occur while planning.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A graph node or term head with no lowering.
    #[error("unhandled node kind `{label}`")]
    UnhandledNodeKind { label: String },

    #[error("no operator implementation for `{call}`")]
    UnresolvedOperator { call: String },

    #[error("unknown executor `{id}`")]
    UnknownExecutor { id: String },

    #[error("executor term {term} has no executor metadata")]
    MissingExecutorMeta { term: TermId },

    /// Executor declared an output but its last operand is not a variable.
    #[error("executor `{id}` has no variable to write its output to")]
    InvalidExecutorOutput { id: String },

    #[error("term {term} has no datashape annotation")]
    MissingAnnotation { term: TermId },

    /// Operand term was never bound to a variable or constant.
    #[error("operand term {term} is not bound")]
    UnboundOperand { term: TermId },

    #[error("malformed term {term}: {reason}")]
    MalformedTerm { term: TermId, reason: &'static str },

    /// Node used where one term is required lowered to a different number of terms.
    #[error("node {node} lowered to {found} terms where one is required")]
    ExpectedSingleTerm { node: NodeId, found: usize },

    #[error("node {node} does not belong to the graph")]
    DanglingNode { node: NodeId },

    #[error("term {term} does not belong to the arena")]
    DanglingTerm { term: TermId },

    /// Graph or term nesting is deeper than the configured depth limit.
    #[error("expression nesting exceeds the depth limit of {limit}")]
    DepthLimitExceeded { limit: u32 },

    #[error("invalid datashape annotation: {0}")]
    Datashape(#[from] blaze_datashape::Error),
}

/// Result type for planning operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything produced for one graph.
#[derive(Clone, Debug)]
pub struct Plan {
    pub terms: TermArena,
    /// Terms produced for the graph root.
    pub roots: Vec<TermId>,
    /// Array leaves in visit order; their variables are the plan's inputs.
    pub operands: Vec<NodeId>,
    pub instructions: Vec<Instruction>,
    pub vars: VariableTable,
}

impl Plan {
    /// Instructions, one per line.
    pub fn dump(&self) -> String {
        self.instructions
            .iter()
            .map(|inst| format!("{inst}\n"))
            .collect()
    }

    /// Root terms, one per line, annotations included when `annotations` is set.
    pub fn dump_terms(&self, annotations: bool) -> String {
        self.roots
            .iter()
            .map(|root| {
                let term = self.terms.printer(*root).annotations(annotations).render();
                format!("{term}\n")
            })
            .collect()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, inst) in self.instructions.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{inst}")?;
        }
        Ok(())
    }
}

/// Configured planner: annotates a graph and generates its instructions.
pub struct Planner<'a, E> {
    executors: &'a ExecutorTable<E>,
    operators: &'a dyn OperatorLookup,
    parser: DatashapeParser,
    depth_limit: Option<u32>,
}

pub struct PlannerBuilder<'a, E> {
    executors: &'a ExecutorTable<E>,
    operators: &'a dyn OperatorLookup,
    parser: DatashapeParser,
    depth_limit: Option<u32>,
}

impl<'a, E> PlannerBuilder<'a, E> {
    /// Nesting limit used when reading annotation datashapes.
    pub fn recursion_limit(mut self, limit: Option<u32>) -> Self {
        self.parser = self.parser.recursion_limit(limit);
        self
    }

    /// Bound on graph and term nesting during annotation and lowering.
    pub fn depth_limit(mut self, limit: Option<u32>) -> Self {
        self.depth_limit = limit;
        self
    }

    pub fn build(self) -> Planner<'a, E> {
        Planner {
            executors: self.executors,
            operators: self.operators,
            parser: self.parser,
            depth_limit: self.depth_limit,
        }
    }
}

impl<'a, E> Planner<'a, E> {
    pub fn builder(
        executors: &'a ExecutorTable<E>,
        operators: &'a dyn OperatorLookup,
    ) -> PlannerBuilder<'a, E> {
        PlannerBuilder {
            executors,
            operators,
            parser: DatashapeParser::new(),
            depth_limit: Some(DEFAULT_DEPTH_LIMIT),
        }
    }

    #[tracing::instrument(skip_all, fields(root = %root))]
    pub fn compile(&self, graph: &ExprGraph, root: NodeId) -> Result<Plan> {
        let Annotated {
            terms,
            roots,
            operands,
        } = annotate_with_limit(graph, root, self.depth_limit)?;

        let mut generator = InstructionGen::new(&terms, self.executors, self.operators)
            .with_parser(self.parser)
            .with_depth_limit(self.depth_limit);
        for term in &roots {
            generator.visit(*term)?;
        }
        let (instructions, vars) = generator.finish();

        tracing::debug!(
            terms = terms.len(),
            instructions = instructions.len(),
            vars = vars.var_count(),
            "plan compiled"
        );
        Ok(Plan {
            terms,
            roots,
            operands,
            instructions,
            vars,
        })
    }
}

/// Annotates `graph` from `root` and lowers it to instructions with default settings.
pub fn compile_graph<E>(
    graph: &ExprGraph,
    root: NodeId,
    executors: &ExecutorTable<E>,
    operators: &dyn OperatorLookup,
) -> Result<Plan> {
    Planner::builder(executors, operators).build().compile(graph, root)
}
