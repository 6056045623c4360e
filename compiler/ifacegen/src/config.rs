//! `--config` で渡す TOML 設定。

use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::GenError;

#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct GenConfig {
  /// ファイル名に対する追加の除外パターン（正規表現）。
  pub exclude: Vec<String>,
  /// 既定の名前空間表への追加・上書き。
  pub namespaces: Vec<NamespaceConfig>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct NamespaceConfig {
  pub name: String,
  pub import: String,
  pub contract_import: String,
}

impl GenConfig {
  /// コマンドラインの `--exclude` を設定に足し込む。
  pub fn apply_overrides(&mut self, exclude: &[String]) {
    self.exclude.extend(exclude.iter().cloned());
  }

  pub fn compile_excludes(&self) -> Result<Vec<Regex>, GenError> {
    self
      .exclude
      .iter()
      .map(|pattern| {
        Regex::new(pattern)
          .map_err(|err| GenError::ConfigInvalid(format!("exclude `{pattern}`: {err}")))
      })
      .collect()
  }

  fn validate(&self) -> Result<(), GenError> {
    for namespace in &self.namespaces {
      if namespace.name.trim().is_empty() {
        return Err(GenError::ConfigInvalid("namespaces.name が空です".to_string()));
      }
      if namespace.import.trim().is_empty() || namespace.contract_import.trim().is_empty() {
        return Err(GenError::ConfigInvalid(format!(
          "namespaces `{}` の import が空です",
          namespace.name
        )));
      }
    }
    self.compile_excludes().map(|_| ())
  }
}

pub fn load_config(config_path: &Path) -> Result<GenConfig, GenError> {
  let content = fs::read_to_string(config_path)
    .map_err(|err| GenError::ConfigInvalid(format!("{}: {err}", config_path.display())))?;
  let config: GenConfig =
    toml::from_str(&content).map_err(|err| GenError::ConfigInvalid(err.to_string()))?;
  config.validate()?;
  Ok(config)
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn parses_excludes_and_namespaces() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("goiface.toml");
    fs::write(
      &path,
      r#"
exclude = ["_gen\\.go$"]

[[namespaces]]
name = "gio"
import = "example.com/gio"
contract_import = "example.com/gio/iface"
"#,
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.exclude, vec!["_gen\\.go$".to_string()]);
    assert_eq!(config.namespaces.len(), 1);
    assert_eq!(config.namespaces[0].name, "gio");
    assert_eq!(config.compile_excludes().unwrap().len(), 1);
  }

  #[test]
  fn invalid_regex_is_config_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("goiface.toml");
    fs::write(&path, "exclude = [\"(unclosed\"]\n").unwrap();

    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, GenError::ConfigInvalid(_)));
  }

  #[test]
  fn unknown_key_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("goiface.toml");
    fs::write(&path, "headers = [\"a.h\"]\n").unwrap();

    assert!(matches!(load_config(&path), Err(GenError::ConfigInvalid(_))));
  }

  #[test]
  fn missing_file_is_config_error() {
    let dir = tempdir().unwrap();
    let err = load_config(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, GenError::ConfigInvalid(_)));
  }
}
