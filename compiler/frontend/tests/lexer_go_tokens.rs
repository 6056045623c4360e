use goiface_frontend::{lexer::lex_source, FrontendError, TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    let output = lex_source(source);
    assert!(
        output.errors.is_empty(),
        "`{source}` で字句エラーが発生しました: {:?}",
        output.errors
    );
    output.tokens.iter().map(|token| token.kind).collect()
}

#[test]
fn literals_keep_their_lexeme() {
    let cases = [
        ("42", TokenKind::NumberLiteral),
        ("0x1F", TokenKind::NumberLiteral),
        ("1.5e-3", TokenKind::NumberLiteral),
        ("'\\n'", TokenKind::RuneLiteral),
        ("\"gtk \\\"quoted\\\"\"", TokenKind::StringLiteral),
        ("`raw\nstring`", TokenKind::RawStringLiteral),
        ("ウィジェット", TokenKind::Identifier),
    ];

    for (source, expected) in cases {
        let output = lex_source(source);
        assert!(output.errors.is_empty(), "{source}: {:?}", output.errors);
        let token = &output.tokens[0];
        assert_eq!(token.kind, expected, "{source}");
        assert_eq!(token.lexeme.as_deref(), Some(source), "{source}");
    }
}

#[test]
fn keywords_are_not_identifiers() {
    assert_eq!(
        kinds("func interface map chan struct"),
        vec![
            TokenKind::KeywordFunc,
            TokenKind::KeywordInterface,
            TokenKind::KeywordMap,
            TokenKind::KeywordChan,
            TokenKind::KeywordStruct,
        ]
    );
    assert_eq!(kinds("funcs"), vec![TokenKind::Identifier, TokenKind::Semicolon]);
}

#[test]
fn declaration_punctuation_is_split_from_operators() {
    assert_eq!(
        kinds("x := <-ch... * y"),
        vec![
            TokenKind::Identifier,
            TokenKind::Operator,
            TokenKind::Arrow,
            TokenKind::Identifier,
            TokenKind::Ellipsis,
            TokenKind::Star,
            TokenKind::Identifier,
            TokenKind::Semicolon,
        ]
    );
}

#[test]
fn semicolon_follows_statement_enders_at_newline() {
    let cases = [
        ("return\n", true),
        ("i++\n", true),
        ("f()\n", true),
        ("x[0]\n", true),
        ("}\n", true),
        ("a +\n", false),
        ("(\n", false),
    ];

    for (source, expected) in cases {
        let output = lex_source(source);
        let inserted = output
            .tokens
            .iter()
            .any(|token| token.kind == TokenKind::Semicolon && token.implicit);
        assert_eq!(inserted, expected, "{source:?}");
    }
}

#[test]
fn line_comment_before_newline_still_inserts_semicolon() {
    assert_eq!(
        kinds("type A int // コメント\ntype B int"),
        vec![
            TokenKind::KeywordType,
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Semicolon,
            TokenKind::KeywordType,
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Semicolon,
        ]
    );
}

#[test]
fn single_line_block_comment_does_not_insert_semicolon() {
    assert_eq!(
        kinds("a /* x */ b"),
        vec![
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Semicolon
        ]
    );
}

#[test]
fn unterminated_string_is_reported() {
    let output = lex_source("var s = \"abc\n");
    assert!(matches!(
        output.errors.first(),
        Some(FrontendError::Unterminated { .. })
    ));
}
