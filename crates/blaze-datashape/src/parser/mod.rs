//! Parser infrastructure for the datashape language.
//!
//! # Architecture
//!
//! This parser produces a lossless concrete syntax tree (CST) via Rowan's green tree builder:
//!
//! - Zero-copy parsing: tokens carry spans, text sliced only when building tree nodes
//! - Trivia buffering: whitespace/comments collected, then attached as leading trivia
//! - Fail-fast: the first lexical or syntactic problem aborts the whole parse
//!
//! Typed wrappers in [`ast`] sit on top of the CST; the type builder only ever
//! sees those.

pub mod ast;
pub mod cst;
pub mod lexer;

mod core;
mod grammar;

#[cfg(test)]
mod lexer_tests;

pub use cst::{SyntaxKind, SyntaxNode, SyntaxToken};
pub use lexer::{LexError, Lexer, Token, lex, tokens};

pub(crate) use core::{DEFAULT_RECURSION_LIMIT, Parser};

use crate::Result;
use crate::types::ConstructorSignature;

/// Parse result containing the green tree.
///
/// Only produced for input that parsed completely.
#[derive(Debug, Clone)]
pub struct Parse {
    cst: rowan::GreenNode,
}

impl Parse {
    pub(crate) fn new(cst: rowan::GreenNode) -> Self {
        Self { cst }
    }

    pub fn as_cst(&self) -> &rowan::GreenNode {
        &self.cst
    }

    /// Creates a typed view over the immutable green tree.
    /// Cheap: `SyntaxNode` is a thin wrapper with parent pointers.
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.cst.clone())
    }

    pub fn root(&self) -> ast::Root {
        ast::Root::cast(self.syntax()).expect("parser always produces Root")
    }

    /// Signatures of every `type` declaration, in source order.
    pub fn declarations(&self) -> Vec<ConstructorSignature> {
        self.root()
            .stmts()
            .filter_map(|stmt| match stmt {
                ast::Stmt::Decl(decl) => decl.head(),
                ast::Stmt::Instance(_) => None,
            })
            .map(|head| ConstructorSignature::new(head.names().map(|t| t.text().to_string())))
            .collect()
    }

    /// Indented CST dump. Trivia is included only when `trivia` is set.
    pub fn dump(&self, trivia: bool) -> String {
        let mut out = String::new();
        dump_node(&self.syntax(), 0, trivia, &mut out);
        out
    }
}

fn dump_node(node: &SyntaxNode, indent: usize, trivia: bool, out: &mut String) {
    use std::fmt::Write;

    let prefix = "  ".repeat(indent);
    writeln!(out, "{}{:?}", prefix, node.kind()).expect("String write never fails");

    for child in node.children_with_tokens() {
        match child {
            rowan::NodeOrToken::Node(n) => dump_node(&n, indent + 1, trivia, out),
            rowan::NodeOrToken::Token(t) => {
                if trivia || !t.kind().is_trivia() {
                    let child_prefix = "  ".repeat(indent + 1);
                    writeln!(out, "{}{:?} {:?}", child_prefix, t.kind(), t.text())
                        .expect("String write never fails");
                }
            }
        }
    }
}

/// Main entry point with the default recursion limit.
pub fn parse(source: &str) -> Result<Parse> {
    parse_with_limit(source, Some(DEFAULT_RECURSION_LIMIT))
}

pub(crate) fn parse_with_limit(source: &str, recursion_limit: Option<u32>) -> Result<Parse> {
    let tokens = lex(source).map_err(|error| crate::Error::Lex {
        error,
        input: source.to_string(),
    })?;
    let cst = Parser::new(source, tokens)
        .with_recursion_limit(recursion_limit)
        .parse()?;
    tracing::trace!(len = source.len(), "parsed datashape source");
    Ok(Parse::new(cst))
}
