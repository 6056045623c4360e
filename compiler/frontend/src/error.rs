//! フロントエンドで発生するエラー種別。

use crate::span::Span;
use thiserror::Error;

/// 字句解析・構文解析のエラー。どちらも生成処理にとっては回復不能として扱う。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrontendError {
    /// 字句解析フェーズでの未知トークン。
    #[error("未定義のトークンを検出しました: `{lexeme}`")]
    UnknownToken { lexeme: String, span: Span },
    /// 文字列・rune リテラルやブロックコメントが閉じられていない。
    #[error("{what} が閉じられていません")]
    Unterminated { what: &'static str, span: Span },
    /// パーサが期待した入力と異なるトークンを検出した。
    #[error("{}", describe_unexpected(.expected, .found.as_deref()))]
    UnexpectedToken {
        expected: Vec<String>,
        found: Option<String>,
        span: Span,
    },
    /// トークン列としては読めたが宣言として成立しない（名前付き・名前なし引数の混在など）。
    #[error("構文エラー: {message}")]
    InvalidDeclaration { message: String, span: Span },
}

impl FrontendError {
    pub fn span(&self) -> Span {
        match self {
            FrontendError::UnknownToken { span, .. }
            | FrontendError::Unterminated { span, .. }
            | FrontendError::UnexpectedToken { span, .. }
            | FrontendError::InvalidDeclaration { span, .. } => *span,
        }
    }

    /// 行・列付きのメッセージを組み立てる。
    pub fn render_with_source(&self, source: &str) -> String {
        let (line, column) = self.span().line_col(source);
        format!("{line}:{column}: {self}")
    }
}

fn describe_unexpected(expected: &[String], found: Option<&str>) -> String {
    let found = match found {
        Some(token) => format!("`{token}`"),
        None => "入力の終端".to_string(),
    };
    if expected.is_empty() {
        format!("構文エラー: {found} を解釈できません")
    } else {
        format!(
            "構文エラー: {} のいずれかが必要ですが {found} が見つかりました",
            expected.join(", ")
        )
    }
}
