//! Operator resolution and executor registry.
//!
//! The generator never calls an operator or an executor. It only needs a
//! reference to put into the instruction and, for operators, a cost.

use std::fmt;

use blaze_datashape::Type;
use indexmap::IndexMap;
use serde::Serialize;

/// Opaque reference to an operator implementation.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize)]
pub struct OperatorRef(String);

impl OperatorRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperatorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The normalized call `Op(operands...)` handed to an [`OperatorLookup`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct OperatorCall {
    pub name: String,
    /// Datashape of each operand, in argument order.
    pub operands: Vec<Type>,
}

impl fmt::Display for OperatorCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, ty) in self.operands.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{ty}")?;
        }
        f.write_str(")")
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ResolvedOperator {
    pub operator: OperatorRef,
    pub cost: u32,
}

/// Finds an implementation for an operator call.
pub trait OperatorLookup {
    fn lookup(&self, call: &OperatorCall) -> Option<ResolvedOperator>;
}

impl<F> OperatorLookup for F
where
    F: Fn(&OperatorCall) -> Option<ResolvedOperator>,
{
    fn lookup(&self, call: &OperatorCall) -> Option<ResolvedOperator> {
        self(call)
    }
}

#[derive(Clone, Debug)]
struct TableEntry {
    resolved: ResolvedOperator,
    arity: Option<usize>,
}

/// Name-keyed operator table.
#[derive(Clone, Debug, Default)]
pub struct OperatorTable {
    entries: IndexMap<String, TableEntry>,
}

impl OperatorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elementwise binary arithmetic with unit cost.
    pub fn arithmetic() -> Self {
        [
            ("Add", "add"),
            ("Sub", "subtract"),
            ("Mul", "multiply"),
            ("Div", "divide"),
            ("Mod", "mod"),
            ("Pow", "power"),
        ]
        .into_iter()
        .fold(Self::new(), |table, (name, operator)| {
            table.with_arity(name, operator, 1, 2)
        })
    }

    /// Registers `name` for any number of operands.
    pub fn with(
        mut self,
        name: impl Into<String>,
        operator: impl Into<String>,
        cost: u32,
    ) -> Self {
        self.insert(name.into(), operator.into(), cost, None);
        self
    }

    /// Registers `name` for exactly `arity` operands.
    pub fn with_arity(
        mut self,
        name: impl Into<String>,
        operator: impl Into<String>,
        cost: u32,
        arity: usize,
    ) -> Self {
        self.insert(name.into(), operator.into(), cost, Some(arity));
        self
    }

    fn insert(&mut self, name: String, operator: String, cost: u32, arity: Option<usize>) {
        let resolved = ResolvedOperator {
            operator: OperatorRef(operator),
            cost,
        };
        self.entries.insert(name, TableEntry { resolved, arity });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl OperatorLookup for OperatorTable {
    fn lookup(&self, call: &OperatorCall) -> Option<ResolvedOperator> {
        let entry = self.entries.get(&call.name)?;
        match entry.arity {
            Some(arity) if arity != call.operands.len() => None,
            _ => Some(entry.resolved.clone()),
        }
    }
}

/// Executors by id, in registration order.
#[derive(Clone, Debug)]
pub struct ExecutorTable<E> {
    executors: IndexMap<String, E>,
}

impl<E> Default for ExecutorTable<E> {
    fn default() -> Self {
        Self {
            executors: IndexMap::new(),
        }
    }
}

impl<E> ExecutorTable<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an executor, returning the one it replaced.
    pub fn insert(&mut self, id: impl Into<String>, executor: E) -> Option<E> {
        self.executors.insert(id.into(), executor)
    }

    pub fn get(&self, id: &str) -> Option<&E> {
        self.executors.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.executors.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.executors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.executors.is_empty()
    }
}

impl<E, K: Into<String>> FromIterator<(K, E)> for ExecutorTable<E> {
    fn from_iter<I: IntoIterator<Item = (K, E)>>(iter: I) -> Self {
        Self {
            executors: iter.into_iter().map(|(k, e)| (k.into(), e)).collect(),
        }
    }
}
