//! Structural type model produced by the builder.
//!
//! A [`Type`] is immutable once built. Rendering (`Display`) produces datashape
//! source that parses back to an equal value.

mod primitives;
mod render;

#[cfg(test)]
mod types_tests;

use serde::Serialize;

pub use primitives::PrimitiveKind;

/// Datashape type.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize)]
pub enum Type {
    /// Fixed-size dimension.
    Fixed(u64),
    /// Free type variable.
    TypeVar(String),
    Primitive(PrimitiveKind),
    /// Named fields in declaration order. Duplicate names are kept.
    Record(Vec<(String, Type)>),
    /// Dimensions followed by the unit type. Always has at least two components.
    DataShape(Vec<Type>),
    Option(Box<Type>),
    Union(Vec<Type>),
    Either(Box<Type>, Box<Type>),
    /// Inclusive integer range.
    Range(u64, u64),
    Varchar(u64),
    /// `string(...)` with an explicit fixed length and/or encoding.
    String {
        length: Option<u64>,
        encoding: Option<String>,
    },
}

impl Type {
    /// Components of a datashape; any other type is its own single component.
    pub fn components(&self) -> &[Type] {
        match self {
            Type::DataShape(parts) => parts,
            other => std::slice::from_ref(other),
        }
    }

    /// Everything but the unit type.
    pub fn dims(&self) -> &[Type] {
        self.components()
            .split_last()
            .map(|(_, dims)| dims)
            .unwrap_or_default()
    }

    /// The trailing unit (element) type. `None` only for an empty hand-built
    /// `DataShape`, which the builder never produces.
    pub fn unit(&self) -> Option<&Type> {
        self.components().last()
    }

    /// Applies the single/multiple component rule: one component stands for itself.
    pub(crate) fn from_components(parts: Vec<Type>) -> Type {
        match <[Type; 1]>::try_from(parts) {
            Ok([single]) => single,
            Err(parts) => Type::DataShape(parts),
        }
    }
}

/// Reserved names usable as the head of a type application.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
pub enum Constructor {
    Record,
    Range,
    Either,
    Varchar,
    Union,
    Option,
    String,
}

impl Constructor {
    pub const ALL: [Constructor; 7] = [
        Self::Record,
        Self::Range,
        Self::Either,
        Self::Varchar,
        Self::Union,
        Self::Option,
        Self::String,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Record" => Some(Self::Record),
            "Range" => Some(Self::Range),
            "Either" => Some(Self::Either),
            "Varchar" => Some(Self::Varchar),
            "Union" => Some(Self::Union),
            "Option" => Some(Self::Option),
            "string" => Some(Self::String),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Record => "Record",
            Self::Range => "Range",
            Self::Either => "Either",
            Self::Varchar => "Varchar",
            Self::Union => "Union",
            Self::Option => "Option",
            Self::String => "string",
        }
    }
}

impl std::fmt::Display for Constructor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Left-hand side of `type Name a b = ...`.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize)]
pub struct ConstructorSignature {
    /// Constructor name first, then parameters in declaration order.
    names: Vec<String>,
}

impl ConstructorSignature {
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        Self {
            names: names.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        self.names.first().map_or("", String::as_str)
    }

    pub fn params(&self) -> &[String] {
        self.names.get(1..).unwrap_or_default()
    }

    pub fn is_parametrized(&self) -> bool {
        !self.params().is_empty()
    }
}
