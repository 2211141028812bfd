use super::cst::SyntaxKind::{self, *};
use super::lexer::{LexError, Lexer, lex, token_text, tokens, unescape};

fn kinds(source: &str) -> Vec<SyntaxKind> {
    tokens(source).map(|t| t.unwrap().kind).collect()
}

fn dump(source: &str) -> String {
    lex(source)
        .unwrap()
        .iter()
        .map(|t| format!("{:?} {:?}\n", t.kind, token_text(source, t)))
        .collect()
}

#[test]
fn datashape_with_dimensions() {
    assert_eq!(
        kinds("2, 3, int32"),
        vec![Number, Comma, Number, Comma, Bit]
    );
}

#[test]
fn trivia_is_lexed_but_filtered() {
    let source = "a, # dims\n\tint32";
    insta::assert_snapshot!(dump(source), @r##"
    Name "a"
    Comma ","
    Whitespace " "
    Comment "# dims"
    Newline "\n"
    Whitespace "\t"
    Bit "int32"
    "##);
    assert_eq!(kinds(source), vec![Name, Comma, Bit]);
}

#[test]
fn carriage_return_is_whitespace() {
    assert_eq!(kinds("a,\r\nb"), vec![Name, Comma, Name]);
}

#[test]
fn punctuation() {
    assert_eq!(
        kinds("= , ( ) : { } ;"),
        vec![
            Equals, Comma, ParenOpen, ParenClose, Colon, BraceOpen, BraceClose, Semicolon
        ]
    );
}

#[test]
fn type_keyword_needs_longest_match() {
    assert_eq!(kinds("type"), vec![KwType]);
    assert_eq!(kinds("typed"), vec![Name]);
    assert_eq!(kinds("types_"), vec![Name]);
}

#[test]
fn primitive_names_become_bits() {
    assert_eq!(kinds("int32 float64 string blob"), vec![Bit, Bit, Bit, Bit]);
    assert_eq!(kinds("int float"), vec![Bit, Bit]);
    assert_eq!(kinds("int33 Int32 T"), vec![Name, Name, Name]);
}

#[test]
fn constructor_names_stay_names() {
    assert_eq!(kinds("Option Union Record"), vec![Name, Name, Name]);
}

#[test]
fn string_literals() {
    assert_eq!(kinds(r#"'utf-8' "ascii""#), vec![StringLit, StringLit]);
    assert_eq!(kinds(r"'it\'s'"), vec![StringLit]);
}

#[test]
fn unterminated_string_is_an_error() {
    let err = lex("string('utf-8)").unwrap_err();
    assert_eq!(
        err,
        LexError {
            offset: 7,
            found: '\''
        }
    );
}

#[test]
fn unexpected_character() {
    let err = lex("2, $").unwrap_err();
    assert_eq!(err.offset, 3);
    assert_eq!(err.found, '$');
    assert_eq!(err.to_string(), "unexpected character '$' at offset 3");
}

#[test]
fn iterator_is_fused_after_error() {
    let items: Vec<_> = Lexer::new("a @ b").collect();
    assert_eq!(items.len(), 3);
    assert!(items[2].is_err());
}

#[test]
fn spans_are_byte_offsets() {
    let source = "{ x: int32 }";
    let spans: Vec<(usize, &str)> = tokens(source)
        .map(|t| t.unwrap())
        .map(|t| (t.offset(), token_text(source, &t)))
        .collect();
    assert_eq!(
        spans,
        vec![(0, "{"), (2, "x"), (3, ":"), (5, "int32"), (11, "}")]
    );
}

#[test]
fn empty_input_has_no_tokens() {
    assert!(lex("").unwrap().is_empty());
    assert!(kinds("  # only a comment").is_empty());
}

#[test]
fn unescape_known_escapes() {
    assert_eq!(unescape(r"'a\nb'"), "a\nb");
    assert_eq!(unescape(r#""q\"uote""#), "q\"uote");
    assert_eq!(unescape(r"'it\'s'"), "it's");
    assert_eq!(unescape(r"'back\\slash'"), "back\\slash");
    assert_eq!(unescape(r"'\x41\t\0'"), "A\t\0");
}

#[test]
fn unescape_keeps_unknown_escapes() {
    assert_eq!(unescape(r"'\q'"), "\\q");
    assert_eq!(unescape(r"'\xZZ'"), "\\xZZ");
}
