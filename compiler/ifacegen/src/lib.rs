//! Go パッケージから interface 契約と転送実装を生成する。

use serde::Serialize;
use std::io;
use thiserror::Error;

pub mod config;
pub mod contract;
pub mod driver;
pub mod forwarding;
pub mod naming;
pub mod namespace;
pub mod render;
pub mod signature;
pub mod symbols;
pub mod testers;

pub use config::{load_config, GenConfig, NamespaceConfig};
pub use driver::{generate, plan, GenerateOptions, GenerateReport, GeneratedFile};
pub use goiface_frontend::LoadError;
pub use namespace::{NamespaceEntry, NamespaceRef, NamespaceTable};
pub use render::{RenderContext, RenderError, RenderMode, Rendered, Renderer};
pub use symbols::{SymbolTable, TypeEntry, GLOBAL};

/// 構造化ログに載せる診断。
#[derive(Debug, Serialize, Clone)]
pub struct DiagnosticEntry {
  pub code: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub file: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub type_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub reason: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub hint: Option<String>,
}

#[derive(Debug, Error)]
pub enum GenError {
  #[error("設定ファイルが不正です: {0}")]
  ConfigInvalid(String),
  #[error("ソースの読み込みに失敗しました: {0}")]
  Load(#[from] LoadError),
  #[error("{type_name} の生成に失敗しました: {source}")]
  Render {
    type_name: String,
    #[source]
    source: RenderError,
  },
  #[error("{path} に書き込めません: {source}")]
  Write {
    path: String,
    #[source]
    source: io::Error,
  },
}

impl GenError {
  pub fn to_diagnostic(&self) -> DiagnosticEntry {
    let (code, file, type_name, hint) = match self {
      GenError::ConfigInvalid(_) => (
        "goiface.config_invalid",
        None,
        None,
        "--config の内容と引数を確認",
      ),
      GenError::Load(err) => (
        "goiface.parse_failed",
        Some(err.path().to_string()),
        None,
        "入力ディレクトリの Go ソースを確認",
      ),
      GenError::Render { type_name, .. } => (
        "goiface.render_failed",
        None,
        Some(type_name.clone()),
        "未対応の型式（chan・無名構造体・固定長配列）を確認",
      ),
      GenError::Write { path, .. } => (
        "goiface.write_failed",
        Some(path.clone()),
        None,
        "出力ディレクトリの権限を確認",
      ),
    };
    DiagnosticEntry {
      code: code.to_string(),
      file,
      type_name,
      reason: Some(self.to_string()),
      hint: Some(hint.to_string()),
    }
  }
}
