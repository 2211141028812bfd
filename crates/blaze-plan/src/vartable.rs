//! Term to variable/constant bindings produced during instruction generation.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::aterm::TermId;

/// Single-assignment variable, rendered `%n`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
pub struct VarName(u32);

impl VarName {
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for VarName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

#[derive(Clone, PartialEq, Debug, Serialize)]
pub enum Constant {
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Int(n) => write!(f, "const({n})"),
            Constant::Float(x) => write!(f, "const({x:?})"),
            Constant::Str(s) => write!(f, "const({s:?})"),
        }
    }
}

/// Instruction argument: a variable or an inline constant.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub enum Operand {
    Var(VarName),
    Const(Constant),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Var(var) => write!(f, "{var}"),
            Operand::Const(c) => write!(f, "{c}"),
        }
    }
}

/// What a term is bound to in the variable table.
pub type Binding = Operand;

/// Insertion-ordered map from terms to bindings. Never shrinks.
#[derive(Clone, Debug, Default, Serialize)]
pub struct VariableTable {
    bindings: IndexMap<TermId, Binding>,
    #[serde(skip)]
    names: IndexMap<VarName, TermId>,
    next: u32,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `term` to the next variable name.
    pub fn fresh(&mut self, term: TermId) -> VarName {
        let name = VarName(self.next);
        self.next += 1;
        self.bindings.insert(term, Binding::Var(name));
        self.names.insert(name, term);
        tracing::trace!(%term, var = %name, "variable allocated");
        name
    }

    pub fn bind_const(&mut self, term: TermId, value: Constant) {
        self.bindings.insert(term, Binding::Const(value));
    }

    pub fn get(&self, term: TermId) -> Option<&Binding> {
        self.bindings.get(&term)
    }

    /// Reverse lookup: the term a variable was allocated for.
    pub fn term_of(&self, name: VarName) -> Option<TermId> {
        self.names.get(&name).copied()
    }

    /// Number of variables allocated so far.
    pub fn var_count(&self) -> u32 {
        self.next
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TermId, &Binding)> {
        self.bindings.iter().map(|(term, binding)| (*term, binding))
    }
}
