//! Grammar productions for the datashape language.
//!
//! ```text
//! root      := stmt+
//! stmt      := 'type' NAME NAME* '=' rhs | rhs
//! rhs       := component (',' component)*
//! component := appl | record | BIT | NAME | NUMBER
//! appl      := (NAME | BIT) '(' arg (',' arg)* ')'
//! arg       := appl | record | '(' rhs ')' | BIT | NAME | NUMBER | STRING
//! record    := '{' field? (';' field?)* '}'
//! field     := (NAME | BIT | 'type') ':' ('(' rhs ')' | rhs)
//! ```
//!
//! Statements are juxtaposed: a statement ends as soon as its `rhs` is not
//! followed by a comma.

use super::core::Parser;
use super::cst::SyntaxKind;
use super::cst::TokenSet;
use super::cst::token_sets::{APPL_HEAD, ARG_FIRST, COMPONENT_FIRST, FIELD_NAME, STMT_FIRST};

const FIELD_END: TokenSet = TokenSet::new(&[SyntaxKind::Semicolon, SyntaxKind::BraceClose]);
const RECORD_BODY: TokenSet = FIELD_NAME.union(FIELD_END);
const ARGS_END: TokenSet = TokenSet::new(&[SyntaxKind::Comma, SyntaxKind::ParenClose]);

impl Parser<'_> {
    pub fn parse_root(&mut self) {
        self.start_node(SyntaxKind::Root);

        if self.eof() {
            self.error_expected(STMT_FIRST);
        }

        while !self.should_stop() {
            self.parse_stmt();
        }

        self.drain_trivia();
        self.finish_node();
    }

    fn parse_stmt(&mut self) {
        match self.current() {
            SyntaxKind::KwType => self.parse_decl(),
            kind if COMPONENT_FIRST.contains(kind) => {
                self.start_node(SyntaxKind::Instance);
                self.parse_rhs();
                self.finish_node();
            }
            _ => self.error_expected(STMT_FIRST),
        }
    }

    /// `type Name params... = rhs`
    fn parse_decl(&mut self) {
        self.start_node(SyntaxKind::Decl);
        self.bump(); // 'type'

        self.start_node(SyntaxKind::DeclHead);
        if self.expect(SyntaxKind::Name) {
            while self.eat_token(SyntaxKind::Name) {}
        }
        self.finish_node();

        if self.expect(SyntaxKind::Equals) {
            self.parse_rhs();
        }

        self.finish_node();
    }

    /// Comma-separated components. The comma tokens stay in the parent node.
    fn parse_rhs(&mut self) {
        self.parse_component();
        while self.eat_token(SyntaxKind::Comma) {
            self.parse_component();
        }
    }

    fn parse_component(&mut self) {
        match self.current() {
            kind if APPL_HEAD.contains(kind) && self.next_is(SyntaxKind::ParenOpen) => {
                self.parse_appl()
            }
            SyntaxKind::Name => self.parse_leaf(SyntaxKind::Var),
            SyntaxKind::Bit => self.parse_leaf(SyntaxKind::Prim),
            SyntaxKind::Number => self.parse_leaf(SyntaxKind::Dim),
            SyntaxKind::BraceOpen => self.parse_record(),
            _ => self.error_expected(COMPONENT_FIRST),
        }
    }

    fn parse_arg(&mut self) {
        match self.current() {
            kind if APPL_HEAD.contains(kind) && self.next_is(SyntaxKind::ParenOpen) => {
                self.parse_appl()
            }
            SyntaxKind::Name => self.parse_leaf(SyntaxKind::Var),
            SyntaxKind::Bit => self.parse_leaf(SyntaxKind::Prim),
            SyntaxKind::Number => self.parse_leaf(SyntaxKind::Dim),
            SyntaxKind::StringLit => self.parse_leaf(SyntaxKind::Str),
            SyntaxKind::BraceOpen => self.parse_record(),
            SyntaxKind::ParenOpen => self.parse_group(),
            _ => self.error_expected(ARG_FIRST),
        }
    }

    fn parse_leaf(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.finish_node();
    }

    /// `Head(arg, ...)`. The caller has verified the `(` lookahead.
    fn parse_appl(&mut self) {
        if !self.enter_recursion() {
            return;
        }
        self.start_node(SyntaxKind::Appl);
        self.bump(); // head

        self.start_node(SyntaxKind::Args);
        self.bump(); // '('
        self.parse_arg();
        while self.eat_token(SyntaxKind::Comma) {
            self.parse_arg();
        }
        if !self.has_fatal_error() && !self.currently_is(SyntaxKind::ParenClose) {
            self.error_expected(ARGS_END);
        }
        self.eat_token(SyntaxKind::ParenClose);
        self.finish_node();

        self.finish_node();
        self.exit_recursion();
    }

    /// `( rhs )` inside arguments and record fields.
    fn parse_group(&mut self) {
        if !self.enter_recursion() {
            return;
        }
        self.start_node(SyntaxKind::Group);
        self.bump(); // '('
        self.parse_rhs();
        if !self.has_fatal_error() && !self.currently_is(SyntaxKind::ParenClose) {
            self.error_expected(ARGS_END);
        }
        self.eat_token(SyntaxKind::ParenClose);
        self.finish_node();
        self.exit_recursion();
    }

    /// `{ name: rhs; ... }`. Empty fields between semicolons are allowed.
    fn parse_record(&mut self) {
        if !self.enter_recursion() {
            return;
        }
        self.start_node(SyntaxKind::Record);
        self.bump(); // '{'

        while !self.has_fatal_error() {
            match self.current() {
                SyntaxKind::BraceClose => break,
                SyntaxKind::Semicolon => self.bump(),
                kind if FIELD_NAME.contains(kind) => {
                    self.parse_field();
                    if !self.has_fatal_error() && !self.currently_is_one_of(FIELD_END) {
                        self.error_expected(FIELD_END);
                    }
                }
                _ => self.error_expected(RECORD_BODY),
            }
        }

        self.eat_token(SyntaxKind::BraceClose);
        self.finish_node();
        self.exit_recursion();
    }

    fn parse_field(&mut self) {
        self.start_node(SyntaxKind::Field);
        self.bump(); // field name

        if self.expect(SyntaxKind::Colon) {
            if self.currently_is(SyntaxKind::ParenOpen) {
                self.parse_group();
            } else {
                self.parse_rhs();
            }
        }

        self.finish_node();
    }
}
