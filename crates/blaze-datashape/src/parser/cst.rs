//! Syntax kinds for the datashape language.
//!
//! `SyntaxKind` serves dual roles: token kinds (from lexer) and node kinds (from parser).
//! Logos derives token recognition; node kinds lack token/regex attributes.
//! `DLang` implements Rowan's `Language` trait for tree construction.

use logos::Logos;
use rowan::Language;

/// All token and node kinds. Tokens first, then nodes, then `__LAST` sentinel.
/// `#[repr(u16)]` enables safe transmute in `kind_from_raw`.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    #[token("(")]
    ParenOpen = 0,

    #[token(")")]
    ParenClose,

    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,

    #[token(":")]
    Colon,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,

    #[token("=")]
    Equals,

    /// `type` keyword. Literal tokens outrank the `Name` regex, longest match
    /// still wins so `typed` lexes as a name.
    #[token("type")]
    KwType,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Name,

    /// Primitive kind name (`int32`, `float64`, ...). Never produced by Logos
    /// directly: the lexer reclassifies `Name` tokens found in the registry.
    Bit,

    #[regex(r"[0-9]+")]
    Number,

    #[regex(r#""(?:[^"\n\r\\]|\\.)*""#)]
    #[regex(r"'(?:[^'\n\r\\]|\\.)*'")]
    StringLit,

    #[regex(r"[ \t\r]+")]
    Whitespace,

    #[token("\n")]
    Newline,

    #[regex(r"#[^\n]*", allow_greedy = true)]
    Comment,

    /// Placeholder kind for lookahead past end of input.
    Error,

    // --- Node kinds (non-terminals) ---
    Root,
    /// `type Name params... = rhs`
    Decl,
    /// Left-hand side of a declaration: constructor name and parameters.
    DeclHead,
    /// Bare statement without a `type` prefix.
    Instance,
    /// `Head(args...)`
    Appl,
    Args,
    /// Parenthesized sub-expression inside arguments or record fields.
    Group,
    Record,
    Field,
    Prim,
    Var,
    Dim,
    Str,

    // Must be last - used for bounds checking in `kind_from_raw`
    #[doc(hidden)]
    __LAST,
}

use SyntaxKind::*;

impl SyntaxKind {
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, Whitespace | Newline | Comment)
    }

    /// Human-readable description used in syntax error messages.
    pub fn describe(self) -> &'static str {
        match self {
            ParenOpen => "`(`",
            ParenClose => "`)`",
            BraceOpen => "`{`",
            BraceClose => "`}`",
            Colon => "`:`",
            Semicolon => "`;`",
            Comma => "`,`",
            Equals => "`=`",
            KwType => "`type`",
            Name => "name",
            Bit => "primitive type",
            Number => "number",
            StringLit => "string",
            Whitespace | Newline => "whitespace",
            Comment => "comment",
            _ => "syntax node",
        }
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    #[inline]
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language tag for Rowan's tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DLang {}

impl Language for DLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 < __LAST as u16);
        // SAFETY: We've verified the value is in bounds, and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for Rowan types parameterized by our language.
pub type SyntaxNode = rowan::SyntaxNode<DLang>;
pub type SyntaxToken = rowan::SyntaxToken<DLang>;
pub type SyntaxElement = rowan::NodeOrToken<SyntaxNode, SyntaxToken>;

/// 64-bit bitset of `SyntaxKind`s for O(1) membership testing.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TokenSet(u64);

impl TokenSet {
    /// Panics at compile time if any kind's discriminant >= 64.
    #[inline]
    pub const fn new(kinds: &[SyntaxKind]) -> Self {
        let mut bits = 0u64;
        let mut i = 0;
        while i < kinds.len() {
            let kind = kinds[i] as u16;
            assert!(kind < 64, "SyntaxKind value exceeds TokenSet capacity");
            bits |= 1 << kind;
            i += 1;
        }
        TokenSet(bits)
    }

    #[inline]
    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let kind = kind as u16;
        if kind >= 64 {
            return false;
        }
        self.0 & (1 << kind) != 0
    }

    #[inline]
    pub const fn union(self, other: TokenSet) -> TokenSet {
        TokenSet(self.0 | other.0)
    }

    /// Human-readable `a, b or c` listing for diagnostics.
    pub fn describe(&self) -> String {
        let names: Vec<&str> = (0..64u16)
            .filter(|i| self.0 & (1 << i) != 0 && *i < __LAST as u16)
            .map(|i| {
                // SAFETY: bounds checked against __LAST above
                let kind: SyntaxKind = unsafe { std::mem::transmute(i) };
                kind.describe()
            })
            .collect();
        match names.split_last() {
            None => String::new(),
            Some((last, [])) => (*last).to_string(),
            Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
        }
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_set();
        for i in 0..64u16 {
            if self.0 & (1 << i) != 0 && i < __LAST as u16 {
                let kind: SyntaxKind = unsafe { std::mem::transmute(i) };
                list.entry(&kind);
            }
        }
        list.finish()
    }
}

/// Pre-defined token sets for the parser.
pub mod token_sets {
    use super::*;

    /// FIRST set of a shape component on the right-hand side.
    pub const COMPONENT_FIRST: TokenSet = TokenSet::new(&[Name, Bit, Number, BraceOpen]);

    /// FIRST set of an application argument.
    pub const ARG_FIRST: TokenSet =
        TokenSet::new(&[Name, Bit, Number, StringLit, BraceOpen, ParenOpen]);

    /// FIRST set of a statement.
    pub const STMT_FIRST: TokenSet = COMPONENT_FIRST.union(TokenSet::new(&[KwType]));

    /// Tokens accepted as record field names.
    pub const FIELD_NAME: TokenSet = TokenSet::new(&[Name, Bit, KwType]);

    /// Tokens that may head an application.
    pub const APPL_HEAD: TokenSet = TokenSet::new(&[Name, Bit]);

    pub const TRIVIA: TokenSet = TokenSet::new(&[Whitespace, Newline, Comment]);
}
