//! Primitive (unit) kinds and the process-wide name registry.
//!
//! The registry is built once on first use and never mutated afterwards.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Serialize;

/// Element type at the end of a datashape.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float16,
    Float32,
    Float64,
    Float128,
    Complex64,
    Complex128,
    Complex256,
    String,
    Object,
    Datetime64,
    Timedelta64,
    /// Deprecated untyped byte blob.
    Blob,
}

/// Spellings that resolve to a canonical kind but never render back.
const ALIASES: &[(&str, PrimitiveKind)] = &[
    ("int", PrimitiveKind::Int32),
    ("float", PrimitiveKind::Float64),
];

static REGISTRY: LazyLock<HashMap<&'static str, PrimitiveKind>> = LazyLock::new(|| {
    PrimitiveKind::ALL
        .iter()
        .map(|kind| (kind.name(), *kind))
        .chain(ALIASES.iter().copied())
        .collect()
});

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 21] = [
        Self::Bool,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::Uint8,
        Self::Uint16,
        Self::Uint32,
        Self::Uint64,
        Self::Float16,
        Self::Float32,
        Self::Float64,
        Self::Float128,
        Self::Complex64,
        Self::Complex128,
        Self::Complex256,
        Self::String,
        Self::Object,
        Self::Datetime64,
        Self::Timedelta64,
        Self::Blob,
    ];

    /// Look up a primitive by its source spelling, aliases included.
    pub fn from_name(name: &str) -> Option<Self> {
        REGISTRY.get(name).copied()
    }

    /// Whether `name` lexes as a primitive (BIT) token.
    #[inline]
    pub fn is_primitive_name(name: &str) -> bool {
        REGISTRY.contains_key(name)
    }

    /// Canonical spelling, used when rendering.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Float16 => "float16",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Float128 => "float128",
            Self::Complex64 => "complex64",
            Self::Complex128 => "complex128",
            Self::Complex256 => "complex256",
            Self::String => "string",
            Self::Object => "object",
            Self::Datetime64 => "datetime64",
            Self::Timedelta64 => "timedelta64",
            Self::Blob => "blob",
        }
    }
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
