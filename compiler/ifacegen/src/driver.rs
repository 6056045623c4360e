//! 読み込みから書き出しまでの一連の処理。

use goiface_frontend::source::{load_dir, FileFilter, ParsedFile};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::GenConfig;
use crate::contract::render_contract;
use crate::forwarding::render_forwarding;
use crate::naming::go_file_name;
use crate::namespace::NamespaceTable;
use crate::render::Renderer;
use crate::symbols::SymbolTable;
use crate::testers::render_testers;
use crate::GenError;

#[derive(Debug, Clone)]
pub struct GenerateOptions {
  pub source_dir: PathBuf,
  /// `<global>` の契約名。転送実装は `Real<contract_name>` になる。
  pub contract_name: String,
  pub package_root: String,
  pub package_name: String,
  pub output_dir: PathBuf,
  pub config: GenConfig,
}

impl GenerateOptions {
  /// 生成物を置くディレクトリ `<output_dir>/<package_name>`。
  pub fn package_dir(&self) -> PathBuf {
    self.output_dir.join(&self.package_name)
  }
}

/// 書き出し前の 1 ファイル。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
  pub path: PathBuf,
  pub contents: String,
}

#[derive(Debug, Clone)]
pub struct GenerateReport {
  pub source_files: Vec<PathBuf>,
  pub types: usize,
  pub operations: usize,
  pub input_hash: String,
  pub files: Vec<GeneratedFile>,
}

/// 全ファイルをメモリ上で組み立てる。何も書き込まない。
pub fn plan(options: &GenerateOptions) -> Result<GenerateReport, GenError> {
  let filter = FileFilter::new(options.config.compile_excludes()?);
  let parsed = load_dir(&options.source_dir, &filter)?;
  let table = SymbolTable::from_files(parsed.iter().map(|file| &file.file));
  let namespaces = NamespaceTable::with_overrides(&options.config.namespaces);
  let renderer = Renderer::new(table.known_types(), &namespaces);

  if table.global().is_some() {
    check_contract_name(&table, &options.contract_name)?;
  }

  let package_dir = options.package_dir();
  let iface_dir = package_dir.join("iface");
  let mut files = Vec::new();

  for entry in table.sorted_entries() {
    if entry.is_global() {
      continue;
    }
    let contents = render_contract(&renderer, &entry.name, entry).map_err(|source| {
      GenError::Render {
        type_name: entry.name.clone(),
        source,
      }
    })?;
    files.push(GeneratedFile {
      path: iface_dir.join(go_file_name(&entry.name)),
      contents,
    });
  }

  if let Some(global) = table.global() {
    let render_error = |source| GenError::Render {
      type_name: options.contract_name.clone(),
      source,
    };
    let contents =
      render_contract(&renderer, &options.contract_name, global).map_err(render_error)?;
    files.push(GeneratedFile {
      path: iface_dir.join(go_file_name(&options.contract_name)),
      contents,
    });

    let contents = render_forwarding(
      &renderer,
      global,
      &options.contract_name,
      &options.package_root,
      &options.package_name,
    )
    .map_err(render_error)?;
    files.push(GeneratedFile {
      path: package_dir.join(format!("real_{}.go", options.package_name)),
      contents,
    });
  }

  files.push(GeneratedFile {
    path: package_dir.join(format!("{}_iface_testers.go", options.package_name)),
    contents: render_testers(
      &table,
      &options.contract_name,
      &options.package_root,
      &options.package_name,
    ),
  });

  Ok(GenerateReport {
    source_files: parsed.iter().map(|file| file.path.clone()).collect(),
    types: table.len(),
    operations: table.operation_count(),
    input_hash: calculate_input_hash(options, &parsed),
    files,
  })
}

/// `<global>` の契約ファイルが既存の型の契約ファイルと重ならないことを確かめる。
fn check_contract_name(table: &SymbolTable, contract_name: &str) -> Result<(), GenError> {
  let contract_file = go_file_name(contract_name);
  let clash = table
    .sorted_entries()
    .into_iter()
    .filter(|entry| !entry.is_global())
    .find(|entry| go_file_name(&entry.name) == contract_file);
  match clash {
    Some(entry) => Err(GenError::ConfigInvalid(format!(
      "契約名 `{contract_name}` が型 `{}` と同じ iface/{contract_file} を生成します",
      entry.name
    ))),
    None => Ok(()),
  }
}

/// [`plan`] で組み立てたファイルをすべて書き出す。
pub fn generate(options: &GenerateOptions) -> Result<GenerateReport, GenError> {
  let report = plan(options)?;
  for file in &report.files {
    write_file(&file.path, &file.contents)?;
  }
  Ok(report)
}

fn write_file(path: &Path, contents: &str) -> Result<(), GenError> {
  let write_error = |source| GenError::Write {
    path: path.display().to_string(),
    source,
  };
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).map_err(write_error)?;
  }
  fs::write(path, contents).map_err(write_error)
}

fn calculate_input_hash(options: &GenerateOptions, parsed: &[ParsedFile]) -> String {
  let mut hasher = Sha256::new();
  hasher.update(env!("CARGO_PKG_VERSION").as_bytes());
  hasher.update(b"\n");
  for value in [
    &options.contract_name,
    &options.package_root,
    &options.package_name,
  ] {
    hasher.update(value.as_bytes());
    hasher.update(b"\n");
  }
  for namespace in &options.config.namespaces {
    hasher.update(namespace.name.as_bytes());
    hasher.update(b"=");
    hasher.update(namespace.import.as_bytes());
    hasher.update(b",");
    hasher.update(namespace.contract_import.as_bytes());
    hasher.update(b"\n");
  }
  for file in parsed {
    if let Some(name) = file.path.file_name() {
      hasher.update(name.to_string_lossy().as_bytes());
    }
    hasher.update(b"\n");
    hasher.update(file.source.as_bytes());
    hasher.update(b"\n");
  }
  let digest = hasher.finalize();
  let mut hex = String::new();
  for byte in digest.iter().take(8) {
    hex.push_str(&format!("{:02x}", byte));
  }
  hex
}
