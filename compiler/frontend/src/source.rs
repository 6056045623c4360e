//! パッケージディレクトリから Go ソースを読み込む。

use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::parser::ast::SourceFile;
use crate::parser::parse_source;

/// 読み込み対象から外すファイルの条件。
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    /// ファイル名に対して評価する追加の除外パターン。
    pub exclude: Vec<Regex>,
}

impl FileFilter {
    pub fn new(exclude: Vec<Regex>) -> Self {
        Self { exclude }
    }

    /// `.go` で終わり、テストファイルでもバージョン別ファイルでもなく、
    /// 追加パターンにも一致しない場合に `true`。
    pub fn accepts(&self, file_name: &str) -> bool {
        if !file_name.ends_with(".go") {
            return false;
        }
        if file_name.ends_with("_test.go") || file_name.contains("_since_") {
            return false;
        }
        !self
            .exclude
            .iter()
            .any(|pattern| pattern.is_match(file_name))
    }
}

/// 解析済みのソースファイル。
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub source: String,
    pub file: SourceFile,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{path} を読み込めません: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("{path}:{message}")]
    Parse { path: String, message: String },
}

impl LoadError {
    pub fn path(&self) -> &str {
        match self {
            LoadError::Io { path, .. } | LoadError::Parse { path, .. } => path,
        }
    }
}

/// `dir` 直下の対象ファイルをファイル名順に読み込んで解析する。サブディレクトリは辿らない。
pub fn load_dir(dir: &Path, filter: &FileFilter) -> Result<Vec<ParsedFile>, LoadError> {
    let io_error = |path: &Path, source: io::Error| LoadError::Io {
        path: path.display().to_string(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(|err| io_error(dir, err))? {
        let entry = entry.map_err(|err| io_error(dir, err))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let accepted = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| filter.accepts(name))
            .unwrap_or(false);
        if accepted {
            paths.push(path);
        }
    }
    paths.sort();

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let source = fs::read_to_string(&path).map_err(|err| io_error(&path, err))?;
        let file = parse_source(&source).map_err(|err| LoadError::Parse {
            path: path.display().to_string(),
            message: err.render_with_source(&source),
        })?;
        files.push(ParsedFile { path, source, file });
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_skips_tests_and_versioned_files() {
        let filter = FileFilter::default();
        assert!(filter.accepts("window.go"));
        assert!(!filter.accepts("window_test.go"));
        assert!(!filter.accepts("window_since_3_10.go"));
        assert!(!filter.accepts("README.md"));
    }

    #[test]
    fn extra_patterns_are_applied_to_file_names() {
        let filter = FileFilter::new(vec![Regex::new("^deprecated").unwrap()]);
        assert!(!filter.accepts("deprecated_widget.go"));
        assert!(filter.accepts("widget.go"));
    }
}
