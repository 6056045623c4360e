//! Go ソースコードのトークン定義。

use crate::span::Span;
use serde::Serialize;

/// 字句解析で得られるトークン種別。
/// 宣言の形だけを読むため、宣言構文に現れない演算子は `Operator` にまとめる。
#[allow(clippy::enum_variant_names)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Identifier,
    NumberLiteral,
    RuneLiteral,
    StringLiteral,
    RawStringLiteral,

    KeywordBreak,
    KeywordCase,
    KeywordChan,
    KeywordConst,
    KeywordContinue,
    KeywordDefault,
    KeywordDefer,
    KeywordElse,
    KeywordFallthrough,
    KeywordFor,
    KeywordFunc,
    KeywordGo,
    KeywordGoto,
    KeywordIf,
    KeywordImport,
    KeywordInterface,
    KeywordMap,
    KeywordPackage,
    KeywordRange,
    KeywordReturn,
    KeywordSelect,
    KeywordStruct,
    KeywordSwitch,
    KeywordType,
    KeywordVar,

    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Dot,
    Ellipsis,
    Colon,
    Star,
    Assign,
    Arrow,
    Increment,
    Decrement,
    /// 宣言構文では意味を持たない演算子一般。
    Operator,

    /// 未定義のトークン。字句エラーと同時に生成される。
    Unknown,
}

impl TokenKind {
    /// キーワードの場合は対応する文字列表現を返す。
    pub fn keyword_literal(&self) -> Option<&'static str> {
        use TokenKind::*;
        let keyword = match self {
            KeywordBreak => "break",
            KeywordCase => "case",
            KeywordChan => "chan",
            KeywordConst => "const",
            KeywordContinue => "continue",
            KeywordDefault => "default",
            KeywordDefer => "defer",
            KeywordElse => "else",
            KeywordFallthrough => "fallthrough",
            KeywordFor => "for",
            KeywordFunc => "func",
            KeywordGo => "go",
            KeywordGoto => "goto",
            KeywordIf => "if",
            KeywordImport => "import",
            KeywordInterface => "interface",
            KeywordMap => "map",
            KeywordPackage => "package",
            KeywordRange => "range",
            KeywordReturn => "return",
            KeywordSelect => "select",
            KeywordStruct => "struct",
            KeywordSwitch => "switch",
            KeywordType => "type",
            KeywordVar => "var",
            _ => return None,
        };
        Some(keyword)
    }

    /// 直後に改行が来たとき暗黙のセミコロンを挿入すべきトークンかどうか。
    pub fn ends_statement(&self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Identifier
                | NumberLiteral
                | RuneLiteral
                | StringLiteral
                | RawStringLiteral
                | KeywordBreak
                | KeywordContinue
                | KeywordFallthrough
                | KeywordReturn
                | Increment
                | Decrement
                | RParen
                | RBracket
                | RBrace
        )
    }

    /// 括弧類の開きトークンであれば対応する閉じトークンを返す。
    pub fn closing_delimiter(&self) -> Option<TokenKind> {
        match self {
            TokenKind::LParen => Some(TokenKind::RParen),
            TokenKind::LBracket => Some(TokenKind::RBracket),
            TokenKind::LBrace => Some(TokenKind::RBrace),
            _ => None,
        }
    }

    /// 診断表示用の短い名前。
    pub fn describe(&self) -> &'static str {
        if let Some(keyword) = self.keyword_literal() {
            return keyword;
        }
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::NumberLiteral => "number",
            TokenKind::RuneLiteral => "rune",
            TokenKind::StringLiteral | TokenKind::RawStringLiteral => "string",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Dot => ".",
            TokenKind::Ellipsis => "...",
            TokenKind::Colon => ":",
            TokenKind::Star => "*",
            TokenKind::Assign => "=",
            TokenKind::Arrow => "<-",
            TokenKind::Increment => "++",
            TokenKind::Decrement => "--",
            TokenKind::Operator => "operator",
            _ => "unknown",
        }
    }
}

/// `TokenKind` に位置情報と字句を付けたもの。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lexeme: Option<String>,
    /// 改行によって挿入されたセミコロンであれば `true`。
    #[serde(skip_serializing_if = "is_false")]
    pub implicit: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            span,
            lexeme: None,
            implicit: false,
        }
    }

    pub fn with_lexeme(kind: TokenKind, span: Span, lexeme: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            lexeme: Some(lexeme.into()),
            implicit: false,
        }
    }

    /// 改行位置に挿入される暗黙のセミコロン。
    pub fn implicit_semicolon(at: u32) -> Self {
        Self {
            kind: TokenKind::Semicolon,
            span: Span::new(at, at),
            lexeme: None,
            implicit: true,
        }
    }
}
