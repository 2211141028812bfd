//! Annotated terms to linear instructions.
//!
//! Lowering is bottom-up: a term's arguments are lowered before the term itself,
//! so every variable an instruction reads was written by an earlier instruction
//! or bound to an array leaf. A term is lowered at most once; a sub-expression
//! shared by several parents is computed once and its variable reused.

use std::collections::HashSet;

use blaze_datashape::{DatashapeParser, Type};

use crate::annotate::DEFAULT_DEPTH_LIMIT;
use crate::aterm::{ATerm, Annotation, Meta, TermArena, TermId};
use crate::instructions::{Callee, Instruction};
use crate::operators::{ExecutorTable, OperatorCall, OperatorLookup};
use crate::vartable::{Constant, Operand, VariableTable};
use crate::{Error, Result};

/// Instruction generator state for one term arena.
pub struct InstructionGen<'a, E> {
    terms: &'a TermArena,
    executors: &'a ExecutorTable<E>,
    operators: &'a dyn OperatorLookup,
    parser: DatashapeParser,
    vars: VariableTable,
    instructions: Vec<Instruction>,
    lowered: HashSet<TermId>,
    depth: u32,
    depth_limit: Option<u32>,
}

impl<'a, E> InstructionGen<'a, E> {
    pub fn new(
        terms: &'a TermArena,
        executors: &'a ExecutorTable<E>,
        operators: &'a dyn OperatorLookup,
    ) -> Self {
        Self {
            terms,
            executors,
            operators,
            parser: DatashapeParser::new(),
            vars: VariableTable::new(),
            instructions: Vec::new(),
            lowered: HashSet::new(),
            depth: 0,
            depth_limit: Some(DEFAULT_DEPTH_LIMIT),
        }
    }

    /// Parser used to read annotation datashapes back into types.
    pub fn with_parser(mut self, parser: DatashapeParser) -> Self {
        self.parser = parser;
        self
    }

    /// Bound on term nesting. `None` disables the check.
    pub fn with_depth_limit(mut self, limit: Option<u32>) -> Self {
        self.depth_limit = limit;
        self
    }

    pub fn finish(self) -> (Vec<Instruction>, VariableTable) {
        (self.instructions, self.vars)
    }

    pub fn visit(&mut self, id: TermId) -> Result<()> {
        if self.lowered.contains(&id) {
            return Ok(());
        }
        if let Some(limit) = self.depth_limit
            && self.depth >= limit
        {
            return Err(Error::DepthLimitExceeded { limit });
        }

        self.depth += 1;
        let lowered = self.lower(id);
        self.depth -= 1;
        lowered?;

        self.lowered.insert(id);
        Ok(())
    }

    fn lower(&mut self, id: TermId) -> Result<()> {
        match self.term(id)? {
            ATerm::Appl {
                head,
                args,
                annotation,
            } => match head.as_str() {
                "Arithmetic" => self.arithmetic(id, args, annotation.as_ref())?,
                "Array" => {
                    self.vars.fresh(id);
                }
                "Assign" | "Slice" => {}
                "Executor" => self.executor(id, args, annotation.as_ref())?,
                _ => {
                    return Err(Error::UnhandledNodeKind {
                        label: head.clone(),
                    });
                }
            },
            ATerm::Int { value, .. } => self.vars.bind_const(id, Constant::Int(*value)),
            ATerm::Float { value, .. } => self.vars.bind_const(id, Constant::Float(*value)),
            ATerm::Str { value, .. } => self.vars.bind_const(id, Constant::Str(value.clone())),
            ATerm::Term { .. } => {}
        }
        Ok(())
    }

    fn term(&self, id: TermId) -> Result<&'a ATerm> {
        let terms = self.terms;
        terms.get(id).ok_or(Error::DanglingTerm { term: id })
    }

    /// `Arithmetic(Op, children...)` is looked up as `Op(children...)`.
    fn arithmetic(
        &mut self,
        id: TermId,
        args: &'a [TermId],
        annotation: Option<&'a Annotation>,
    ) -> Result<()> {
        let [op, children @ ..] = args else {
            return Err(Error::MalformedTerm {
                term: id,
                reason: "arithmetic term has no operator",
            });
        };
        let ATerm::Term { label, .. } = self.term(*op)? else {
            return Err(Error::MalformedTerm {
                term: id,
                reason: "arithmetic operator is not a bare term",
            });
        };
        let annotation = annotation.ok_or(Error::MissingAnnotation { term: id })?;

        let call = OperatorCall {
            name: label.clone(),
            operands: children
                .iter()
                .map(|child| self.annotated_type(*child))
                .collect::<Result<_>>()?,
        };
        let resolved = self
            .operators
            .lookup(&call)
            .ok_or_else(|| Error::UnresolvedOperator {
                call: call.to_string(),
            })?;

        for child in children {
            self.visit(*child)?;
        }
        let operands = self.operands(children)?;
        let dshape = self.parser.parse_type(&annotation.dshape)?;
        let result = self.vars.fresh(id);

        self.emit(Instruction {
            callee: Callee::Operator(resolved.operator),
            operands,
            result: Some(result),
            fill_value: None,
            dshape,
            cost: resolved.cost,
        });
        Ok(())
    }

    fn executor(
        &mut self,
        id: TermId,
        args: &'a [TermId],
        annotation: Option<&'a Annotation>,
    ) -> Result<()> {
        let Some(annotation) = annotation else {
            return Err(Error::MissingExecutorMeta { term: id });
        };
        let Some(Meta::Executor {
            id: executor,
            backend,
            has_output,
        }) = &annotation.meta
        else {
            return Err(Error::MissingExecutorMeta { term: id });
        };
        if !self.executors.contains(executor) {
            return Err(Error::UnknownExecutor {
                id: executor.clone(),
            });
        }

        for arg in args {
            self.visit(*arg)?;
        }
        let mut operands = self.operands(args)?;
        let result = if *has_output {
            match operands.pop() {
                Some(Operand::Var(var)) => Some(var),
                _ => {
                    return Err(Error::InvalidExecutorOutput {
                        id: executor.clone(),
                    });
                }
            }
        } else {
            None
        };
        let dshape = self.parser.parse_type(&annotation.dshape)?;

        self.emit(Instruction {
            callee: Callee::Executor {
                id: executor.clone(),
                backend: backend.clone(),
            },
            operands,
            result,
            fill_value: None,
            dshape,
            cost: 0,
        });
        Ok(())
    }

    fn annotated_type(&self, id: TermId) -> Result<Type> {
        let annotation = self
            .term(id)?
            .annotation()
            .ok_or(Error::MissingAnnotation { term: id })?;
        Ok(self.parser.parse_type(&annotation.dshape)?)
    }

    /// Bindings of already-lowered terms, left to right.
    fn operands(&self, terms: &[TermId]) -> Result<Vec<Operand>> {
        terms
            .iter()
            .map(|term| {
                self.vars
                    .get(*term)
                    .cloned()
                    .ok_or(Error::UnboundOperand { term: *term })
            })
            .collect()
    }

    fn emit(&mut self, instruction: Instruction) {
        tracing::trace!(%instruction, "instruction emitted");
        self.instructions.push(instruction);
    }
}
