//! Datashape: a type language for describing the shape and element type of arrays.
//!
//! # Example
//!
//! ```
//! use blaze_datashape::{PrimitiveKind, Type, parse_type};
//!
//! let ty = parse_type("2, 3, int32").expect("valid datashape");
//! assert_eq!(
//!     ty,
//!     Type::DataShape(vec![
//!         Type::Fixed(2),
//!         Type::Fixed(3),
//!         Type::Primitive(PrimitiveKind::Int32),
//!     ])
//! );
//! assert_eq!(ty.to_string(), "2, 3, int32");
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod build;
pub mod diagnostics;
pub mod parser;
pub mod types;


use rowan::TextRange;

pub use build::DatashapeParser;
pub use parser::{Parse, SyntaxKind, parse};
pub use types::{Constructor, ConstructorSignature, PrimitiveKind, Type};

/// Errors produced while turning datashape text into a [`Type`].
///
/// The first problem aborts the whole parse; there is no recovery.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("{error}")]
    Lex {
        error: parser::LexError,
        input: String,
    },

    #[error("syntax error at offset {offset}: found {found:?}, expected {expected}")]
    Syntax {
        offset: usize,
        found: String,
        expected: String,
        input: String,
    },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String, input: String },

    /// Input nested deeper than the configured limit.
    #[error("recursion limit of {limit} exceeded")]
    RecursionLimitExceeded { limit: u32 },

    #[error("unknown type constructor `{name}`")]
    UnknownConstructor { name: String, span: TextRange },

    #[error("parametrized type `{name}` with parameters ({}) is not supported", .params.join(", "))]
    ParametrizedTypeUnsupported {
        name: String,
        params: Vec<String>,
        span: TextRange,
    },

    /// A syntax node the builder cannot lower in its position.
    #[error("cannot build a type from {kind:?} node")]
    InvalidNode { kind: SyntaxKind, span: TextRange },

    #[error("invalid arguments to `{constructor}`: {reason}")]
    InvalidConstructorArguments {
        constructor: Constructor,
        reason: String,
        span: TextRange,
    },
}

impl Error {
    /// Lexical and grammar failures, as opposed to semantic ones raised by the builder.
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            Error::Lex { .. }
                | Error::Syntax { .. }
                | Error::UnexpectedEof { .. }
                | Error::RecursionLimitExceeded { .. }
        )
    }

    /// Byte range in the source the error points at, when it has one.
    pub fn span(&self) -> Option<TextRange> {
        match self {
            Error::Lex { error, .. } => {
                let start = error.offset as u32;
                Some(TextRange::at(start.into(), (error.found.len_utf8() as u32).into()))
            }
            Error::Syntax { offset, found, .. } => Some(TextRange::at(
                (*offset as u32).into(),
                (found.len() as u32).into(),
            )),
            Error::UnexpectedEof { input, .. } => {
                Some(TextRange::empty((input.len() as u32).into()))
            }
            Error::RecursionLimitExceeded { .. } => None,
            Error::UnknownConstructor { span, .. }
            | Error::ParametrizedTypeUnsupported { span, .. }
            | Error::InvalidNode { span, .. }
            | Error::InvalidConstructorArguments { span, .. } => Some(*span),
        }
    }
}

/// Result type for datashape operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Parses exactly one statement into a [`Type`].
///
/// Input holding several juxtaposed statements fails with [`Error::InvalidNode`] on `Root`.
pub fn parse_type(source: &str) -> Result<Type> {
    DatashapeParser::new().parse_type(source)
}

/// Parses every statement in `source`, one [`Type`] per statement in source order.
pub fn parse_all(source: &str) -> Result<Vec<Type>> {
    DatashapeParser::new().parse_all(source)
}
