//! Linear single-assignment instructions.

use std::fmt;

use blaze_datashape::Type;
use serde::Serialize;

use crate::operators::OperatorRef;
use crate::vartable::{Constant, Operand, VarName};

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub enum Callee {
    Operator(OperatorRef),
    Executor { id: String, backend: String },
}

impl fmt::Display for Callee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callee::Operator(op) => write!(f, "{op}"),
            Callee::Executor { id, backend } => write!(f, "{id}@{backend}"),
        }
    }
}

/// `%result = callee(operands...)`, or a bare call when there is no result.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct Instruction {
    pub callee: Callee,
    pub operands: Vec<Operand>,
    pub result: Option<VarName>,
    /// Initial value of the result, for accumulating operators.
    pub fill_value: Option<Constant>,
    /// Datashape of the value the instruction produces.
    pub dshape: Type,
    pub cost: u32,
}

impl Instruction {
    /// Variables read by this instruction.
    pub fn reads(&self) -> impl Iterator<Item = VarName> + '_ {
        self.operands.iter().filter_map(|op| match op {
            Operand::Var(var) => Some(*var),
            Operand::Const(_) => None,
        })
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(result) = self.result {
            write!(f, "{result} = ")?;
        }
        write!(f, "{}(", self.callee)?;
        for (i, op) in self.operands.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{op}")?;
        }
        f.write_str(")")
    }
}
