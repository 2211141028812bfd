//! Typed AST wrappers over CST nodes.
//!
//! Each struct wraps a `SyntaxNode` and provides typed accessors.
//! Cast is infallible for correct `SyntaxKind` - validation happens in the builder.

use super::cst::{SyntaxKind, SyntaxNode, SyntaxToken};
use super::lexer::unescape;

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl $name {
            pub fn cast(node: SyntaxNode) -> Option<Self> {
                (node.kind() == SyntaxKind::$kind).then(|| Self(node))
            }

            pub fn as_cst(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

ast_node!(Root, Root);
ast_node!(Decl, Decl);
ast_node!(DeclHead, DeclHead);
ast_node!(Instance, Instance);
ast_node!(Appl, Appl);
ast_node!(Group, Group);
ast_node!(Record, Record);
ast_node!(Field, Field);
ast_node!(Prim, Prim);
ast_node!(Var, Var);
ast_node!(Dim, Dim);
ast_node!(Str, Str);

/// Top-level statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Stmt {
    Decl(Decl),
    Instance(Instance),
}

impl Stmt {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::Decl => Decl::cast(node).map(Stmt::Decl),
            SyntaxKind::Instance => Instance::cast(node).map(Stmt::Instance),
            _ => None,
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Stmt::Decl(n) => n.as_cst(),
            Stmt::Instance(n) => n.as_cst(),
        }
    }
}

/// Shape component or application argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Appl(Appl),
    Group(Group),
    Record(Record),
    Prim(Prim),
    Var(Var),
    Dim(Dim),
    Str(Str),
}

impl Expr {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::Appl => Appl::cast(node).map(Expr::Appl),
            SyntaxKind::Group => Group::cast(node).map(Expr::Group),
            SyntaxKind::Record => Record::cast(node).map(Expr::Record),
            SyntaxKind::Prim => Prim::cast(node).map(Expr::Prim),
            SyntaxKind::Var => Var::cast(node).map(Expr::Var),
            SyntaxKind::Dim => Dim::cast(node).map(Expr::Dim),
            SyntaxKind::Str => Str::cast(node).map(Expr::Str),
            _ => None,
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Expr::Appl(n) => n.as_cst(),
            Expr::Group(n) => n.as_cst(),
            Expr::Record(n) => n.as_cst(),
            Expr::Prim(n) => n.as_cst(),
            Expr::Var(n) => n.as_cst(),
            Expr::Dim(n) => n.as_cst(),
            Expr::Str(n) => n.as_cst(),
        }
    }
}

fn first_token(node: &SyntaxNode, pred: impl Fn(SyntaxKind) -> bool) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|t| pred(t.kind()))
}

impl Root {
    pub fn stmts(&self) -> impl Iterator<Item = Stmt> + '_ {
        self.0.children().filter_map(Stmt::cast)
    }
}

impl Decl {
    pub fn head(&self) -> Option<DeclHead> {
        self.0.children().find_map(DeclHead::cast)
    }

    pub fn components(&self) -> impl Iterator<Item = Expr> + '_ {
        self.0.children().filter_map(Expr::cast)
    }
}

impl DeclHead {
    /// All names in order: the constructor first, then its parameters.
    pub fn names(&self) -> impl Iterator<Item = SyntaxToken> + '_ {
        self.0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| t.kind() == SyntaxKind::Name)
    }

    pub fn name(&self) -> Option<SyntaxToken> {
        self.names().next()
    }

    pub fn params(&self) -> impl Iterator<Item = SyntaxToken> + '_ {
        self.names().skip(1)
    }
}

impl Instance {
    pub fn components(&self) -> impl Iterator<Item = Expr> + '_ {
        self.0.children().filter_map(Expr::cast)
    }
}

impl Appl {
    pub fn head(&self) -> Option<SyntaxToken> {
        first_token(&self.0, |k| matches!(k, SyntaxKind::Name | SyntaxKind::Bit))
    }

    pub fn args(&self) -> impl Iterator<Item = Expr> + '_ {
        self.0
            .children()
            .filter(|n| n.kind() == SyntaxKind::Args)
            .flat_map(|args| args.children().filter_map(Expr::cast))
    }
}

impl Group {
    pub fn components(&self) -> impl Iterator<Item = Expr> + '_ {
        self.0.children().filter_map(Expr::cast)
    }
}

impl Record {
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.children().filter_map(Field::cast)
    }
}

impl Field {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_token(&self.0, |k| {
            matches!(k, SyntaxKind::Name | SyntaxKind::Bit | SyntaxKind::KwType)
        })
    }

    /// The field's right-hand side; a parenthesized value appears as one `Group`.
    pub fn components(&self) -> impl Iterator<Item = Expr> + '_ {
        self.0.children().filter_map(Expr::cast)
    }
}

impl Prim {
    pub fn token(&self) -> Option<SyntaxToken> {
        first_token(&self.0, |k| k == SyntaxKind::Bit)
    }
}

impl Var {
    pub fn token(&self) -> Option<SyntaxToken> {
        first_token(&self.0, |k| k == SyntaxKind::Name)
    }
}

impl Dim {
    pub fn token(&self) -> Option<SyntaxToken> {
        first_token(&self.0, |k| k == SyntaxKind::Number)
    }

    /// Parsed value; `None` when the literal overflows `u64`.
    pub fn value(&self) -> Option<u64> {
        self.token()?.text().parse().ok()
    }
}

impl Str {
    pub fn token(&self) -> Option<SyntaxToken> {
        first_token(&self.0, |k| k == SyntaxKind::StringLit)
    }

    /// Decoded contents without quotes.
    pub fn value(&self) -> Option<String> {
        self.token().map(|t| unescape(t.text()))
    }
}
