//! Go ソースの字句解析器。
//!
//! `logos` で 1 トークンずつ切り出し、空白とコメントは手動でまとめて読み飛ばす。
//! 読み飛ばした範囲に改行が含まれていれば、Go の規則に従って暗黙のセミコロンを挿入する。

use logos::{Lexer as LogosLexer, Logos};

use crate::error::FrontendError;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// 字句解析結果。エラーがあってもトークン列は最後まで作る。
#[derive(Debug, Default)]
pub struct LexOutput {
    pub tokens: Vec<Token>,
    pub errors: Vec<FrontendError>,
}

/// `logos` が生成する内部トークン列挙。
#[derive(Debug, Clone, Copy, Logos, PartialEq, Eq)]
enum RawToken {
    #[token("break")]
    KeywordBreak,
    #[token("case")]
    KeywordCase,
    #[token("chan")]
    KeywordChan,
    #[token("const")]
    KeywordConst,
    #[token("continue")]
    KeywordContinue,
    #[token("default")]
    KeywordDefault,
    #[token("defer")]
    KeywordDefer,
    #[token("else")]
    KeywordElse,
    #[token("fallthrough")]
    KeywordFallthrough,
    #[token("for")]
    KeywordFor,
    #[token("func")]
    KeywordFunc,
    #[token("go")]
    KeywordGo,
    #[token("goto")]
    KeywordGoto,
    #[token("if")]
    KeywordIf,
    #[token("import")]
    KeywordImport,
    #[token("interface")]
    KeywordInterface,
    #[token("map")]
    KeywordMap,
    #[token("package")]
    KeywordPackage,
    #[token("range")]
    KeywordRange,
    #[token("return")]
    KeywordReturn,
    #[token("select")]
    KeywordSelect,
    #[token("struct")]
    KeywordStruct,
    #[token("switch")]
    KeywordSwitch,
    #[token("type")]
    KeywordType,
    #[token("var")]
    KeywordVar,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("...")]
    Ellipsis,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
    #[token("*")]
    Star,
    #[token("=")]
    Assign,
    #[token("<-")]
    Arrow,
    #[token("++")]
    Increment,
    #[token("--")]
    Decrement,

    #[token("+")]
    #[token("-")]
    #[token("/")]
    #[token("%")]
    #[token("&")]
    #[token("|")]
    #[token("^")]
    #[token("<<")]
    #[token(">>")]
    #[token("&^")]
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token("%=")]
    #[token("&=")]
    #[token("|=")]
    #[token("^=")]
    #[token("<<=")]
    #[token(">>=")]
    #[token("&^=")]
    #[token("&&")]
    #[token("||")]
    #[token("==")]
    #[token("!=")]
    #[token("<")]
    #[token("<=")]
    #[token(">")]
    #[token(">=")]
    #[token("!")]
    #[token("~")]
    #[token(":=")]
    Operator,

    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9_]+)?i?")]
    #[regex(r"0[xXbBoO][0-9a-fA-F_]+(\.[0-9a-fA-F_]*)?([pP][+-]?[0-9_]+)?i?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?i?")]
    NumberLiteral,

    #[token("'", lex_rune_literal)]
    RuneLiteral,
    #[token("\"", lex_string_literal)]
    StringLiteral,
    #[regex(r"`[^`]*`")]
    RawStringLiteral,

    #[regex(r"[\p{L}_][\p{L}\p{Nd}_]*")]
    Identifier,
}

impl RawToken {
    fn kind(self) -> TokenKind {
        match self {
            RawToken::KeywordBreak => TokenKind::KeywordBreak,
            RawToken::KeywordCase => TokenKind::KeywordCase,
            RawToken::KeywordChan => TokenKind::KeywordChan,
            RawToken::KeywordConst => TokenKind::KeywordConst,
            RawToken::KeywordContinue => TokenKind::KeywordContinue,
            RawToken::KeywordDefault => TokenKind::KeywordDefault,
            RawToken::KeywordDefer => TokenKind::KeywordDefer,
            RawToken::KeywordElse => TokenKind::KeywordElse,
            RawToken::KeywordFallthrough => TokenKind::KeywordFallthrough,
            RawToken::KeywordFor => TokenKind::KeywordFor,
            RawToken::KeywordFunc => TokenKind::KeywordFunc,
            RawToken::KeywordGo => TokenKind::KeywordGo,
            RawToken::KeywordGoto => TokenKind::KeywordGoto,
            RawToken::KeywordIf => TokenKind::KeywordIf,
            RawToken::KeywordImport => TokenKind::KeywordImport,
            RawToken::KeywordInterface => TokenKind::KeywordInterface,
            RawToken::KeywordMap => TokenKind::KeywordMap,
            RawToken::KeywordPackage => TokenKind::KeywordPackage,
            RawToken::KeywordRange => TokenKind::KeywordRange,
            RawToken::KeywordReturn => TokenKind::KeywordReturn,
            RawToken::KeywordSelect => TokenKind::KeywordSelect,
            RawToken::KeywordStruct => TokenKind::KeywordStruct,
            RawToken::KeywordSwitch => TokenKind::KeywordSwitch,
            RawToken::KeywordType => TokenKind::KeywordType,
            RawToken::KeywordVar => TokenKind::KeywordVar,
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::LBracket => TokenKind::LBracket,
            RawToken::RBracket => TokenKind::RBracket,
            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Semicolon => TokenKind::Semicolon,
            RawToken::Ellipsis => TokenKind::Ellipsis,
            RawToken::Dot => TokenKind::Dot,
            RawToken::Colon => TokenKind::Colon,
            RawToken::Star => TokenKind::Star,
            RawToken::Assign => TokenKind::Assign,
            RawToken::Arrow => TokenKind::Arrow,
            RawToken::Increment => TokenKind::Increment,
            RawToken::Decrement => TokenKind::Decrement,
            RawToken::Operator => TokenKind::Operator,
            RawToken::NumberLiteral => TokenKind::NumberLiteral,
            RawToken::RuneLiteral => TokenKind::RuneLiteral,
            RawToken::StringLiteral => TokenKind::StringLiteral,
            RawToken::RawStringLiteral => TokenKind::RawStringLiteral,
            RawToken::Identifier => TokenKind::Identifier,
        }
    }
}

fn lex_quoted(lex: &mut LogosLexer<RawToken>, quote: char) -> Option<()> {
    let mut escaped = false;
    for (idx, ch) in lex.remainder().char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '\n' => return None,
            _ if ch == quote => {
                lex.bump(idx + ch.len_utf8());
                return Some(());
            }
            _ => {}
        }
    }
    None
}

fn lex_string_literal(lex: &mut LogosLexer<RawToken>) -> Option<()> {
    lex_quoted(lex, '"')
}

fn lex_rune_literal(lex: &mut LogosLexer<RawToken>) -> Option<()> {
    lex_quoted(lex, '\'')
}

/// 空白・コメントの読み飛ばし結果。
struct Skipped {
    consumed: usize,
    /// 読み飛ばした範囲で最初に現れた改行のオフセット。
    newline: Option<usize>,
}

/// 先頭の空白とコメントを読み飛ばす。閉じられていないブロックコメントは `Err` で
/// その開始オフセットを返す。
fn consume_skippable(src: &str) -> Result<Skipped, usize> {
    let bytes = src.as_bytes();
    let mut i = 0usize;
    let mut newline = None;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                newline.get_or_insert(i);
                i += 1;
            }
            b' ' | b'\t' | b'\r' => i += 1,
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i += 2;
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let start = i;
                let body = &src[i + 2..];
                let close = body.find("*/").ok_or(start)?;
                if let Some(inner) = body[..close].find('\n') {
                    newline.get_or_insert(i + 2 + inner);
                }
                i += 2 + close + 2;
            }
            _ => break,
        }
    }
    Ok(Skipped {
        consumed: i,
        newline,
    })
}

fn needs_semicolon(tokens: &[Token]) -> bool {
    tokens
        .last()
        .map(|token| token.kind.ends_statement())
        .unwrap_or(false)
}

fn carries_lexeme(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier
            | TokenKind::NumberLiteral
            | TokenKind::RuneLiteral
            | TokenKind::StringLiteral
            | TokenKind::RawStringLiteral
    )
}

/// Go ソースを解析し、暗黙のセミコロンを含む `Token` 列を生成する。
pub fn lex_source(text: &str) -> LexOutput {
    let mut offset = 0usize;
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    while offset < text.len() {
        let skipped = match consume_skippable(&text[offset..]) {
            Ok(skipped) => skipped,
            Err(start) => {
                let start = offset + start;
                errors.push(FrontendError::Unterminated {
                    what: "ブロックコメント",
                    span: Span::new(start as u32, text.len() as u32),
                });
                offset = text.len();
                break;
            }
        };
        if let Some(newline) = skipped.newline {
            if needs_semicolon(&tokens) {
                tokens.push(Token::implicit_semicolon((offset + newline) as u32));
            }
        }
        if skipped.consumed > 0 {
            offset += skipped.consumed;
            continue;
        }

        let mut lexer = RawToken::lexer(&text[offset..]);
        let result = match lexer.next() {
            Some(result) => result,
            None => break,
        };
        let range = lexer.span();
        let span = Span::new((offset + range.start) as u32, (offset + range.end) as u32);
        let slice = lexer.slice();

        match result {
            Ok(raw) => {
                let kind = raw.kind();
                if carries_lexeme(kind) {
                    tokens.push(Token::with_lexeme(kind, span, slice));
                } else {
                    tokens.push(Token::new(kind, span));
                }
            }
            Err(()) => {
                let error = match slice.chars().next() {
                    Some('"') => FrontendError::Unterminated {
                        what: "文字列リテラル",
                        span,
                    },
                    Some('\'') => FrontendError::Unterminated {
                        what: "rune リテラル",
                        span,
                    },
                    Some('`') => FrontendError::Unterminated {
                        what: "raw 文字列リテラル",
                        span,
                    },
                    _ => FrontendError::UnknownToken {
                        lexeme: slice.to_string(),
                        span,
                    },
                };
                errors.push(error);
                tokens.push(Token::with_lexeme(TokenKind::Unknown, span, slice));
            }
        }

        let mut next = offset + range.end.max(1);
        while next < text.len() && !text.is_char_boundary(next) {
            next += 1;
        }
        offset = next;
    }

    if needs_semicolon(&tokens) {
        tokens.push(Token::implicit_semicolon(offset.min(text.len()) as u32));
    }

    LexOutput { tokens, errors }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex_source(source)
            .tokens
            .iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn semicolon_is_inserted_after_identifier_at_line_end() {
        assert_eq!(
            kinds("package gtk\n"),
            vec![
                TokenKind::KeywordPackage,
                TokenKind::Identifier,
                TokenKind::Semicolon
            ]
        );
    }

    #[test]
    fn no_semicolon_after_open_brace_or_comma() {
        let source = "type A struct {\n\tx,\n\ty int\n}\n";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::KeywordType,
                TokenKind::Identifier,
                TokenKind::KeywordStruct,
                TokenKind::LBrace,
                TokenKind::Identifier,
                TokenKind::Comma,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Semicolon,
                TokenKind::RBrace,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn block_comment_spanning_lines_acts_as_newline() {
        let output = lex_source("return /* a\nb */ x");
        assert!(output.errors.is_empty(), "{:?}", output.errors);
        let implicit: Vec<_> = output.tokens.iter().filter(|t| t.implicit).collect();
        assert_eq!(implicit.len(), 2);
    }

    #[test]
    fn unterminated_block_comment_is_reported() {
        let output = lex_source("func F() /* never closed");
        assert!(matches!(
            output.errors.as_slice(),
            [FrontendError::Unterminated { .. }]
        ));
    }

    #[test]
    fn unknown_character_produces_unknown_token() {
        let output = lex_source("x @ y");
        assert_eq!(output.errors.len(), 1);
        assert!(output
            .tokens
            .iter()
            .any(|token| token.kind == TokenKind::Unknown));
    }
}
