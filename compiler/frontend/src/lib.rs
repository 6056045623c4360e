//! Go パッケージの宣言を読むフロントエンド。
//!
//! 字句解析（暗黙のセミコロン挿入を含む）と、型・関数宣言の構文解析、
//! パッケージディレクトリ単位の読み込みを提供する。

pub mod error;
pub mod lexer;
pub mod parser;
pub mod source;
pub mod span;
pub mod token;

pub use error::FrontendError;
pub use parser::ast;
pub use parser::parse_source;
pub use source::{load_dir, FileFilter, LoadError, ParsedFile};
pub use span::Span;
pub use token::{Token, TokenKind};
