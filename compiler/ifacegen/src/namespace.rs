//! 既知の外部名前空間と、その契約専用パッケージの対応表。

use once_cell::sync::Lazy;
use std::collections::BTreeMap;

use crate::config::NamespaceConfig;

const GOTK3_ROOT: &str = "github.com/gotk3/gotk3";

static DEFAULT_NAMESPACES: Lazy<Vec<NamespaceEntry>> = Lazy::new(|| {
  ["cairo", "gdk", "gtk", "glib", "pango"]
    .iter()
    .map(|name| NamespaceEntry {
      name: (*name).to_string(),
      import: format!("{GOTK3_ROOT}/{name}"),
      contract_import: format!("{GOTK3_ROOT}/{name}/iface"),
    })
    .collect()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceEntry {
  pub name: String,
  pub import: String,
  pub contract_import: String,
}

/// 描画中に参照された名前空間。`contract` は契約側へ書き換えたかどうか。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NamespaceRef {
  pub name: String,
  pub contract: bool,
}

impl NamespaceRef {
  pub fn concrete(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      contract: false,
    }
  }

  pub fn contract(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      contract: true,
    }
  }

  /// ソース上に現れる修飾子。契約側は `<ns>_iface`。
  pub fn qualifier(&self) -> String {
    if self.contract {
      format!("{}_iface", self.name)
    } else {
      self.name.clone()
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceTable {
  entries: BTreeMap<String, NamespaceEntry>,
}

impl Default for NamespaceTable {
  fn default() -> Self {
    Self::from_entries(DEFAULT_NAMESPACES.iter().cloned())
  }
}

impl NamespaceTable {
  pub fn empty() -> Self {
    Self {
      entries: BTreeMap::new(),
    }
  }

  pub fn from_entries(entries: impl IntoIterator<Item = NamespaceEntry>) -> Self {
    let mut table = Self::empty();
    for entry in entries {
      table.insert(entry);
    }
    table
  }

  /// 既定表に設定ファイルの項目を重ねる。同名は上書き。
  pub fn with_overrides(overrides: &[NamespaceConfig]) -> Self {
    let mut table = Self::default();
    for namespace in overrides {
      table.insert(NamespaceEntry {
        name: namespace.name.clone(),
        import: namespace.import.clone(),
        contract_import: namespace.contract_import.clone(),
      });
    }
    table
  }

  pub fn insert(&mut self, entry: NamespaceEntry) {
    self.entries.insert(entry.name.clone(), entry);
  }

  pub fn is_known(&self, name: &str) -> bool {
    self.entries.contains_key(name)
  }

  pub fn get(&self, name: &str) -> Option<&NamespaceEntry> {
    self.entries.get(name)
  }

  /// `import` 行の本体（`import ` より後ろ）を組み立てる。
  /// 表にない名前空間は名前をそのまま引用符で囲む。
  pub fn import_spec(&self, reference: &NamespaceRef) -> String {
    match (self.entries.get(&reference.name), reference.contract) {
      (Some(entry), true) => format!("{} \"{}\"", reference.qualifier(), entry.contract_import),
      (Some(entry), false) => format!("\"{}\"", entry.import),
      (None, _) => format!("\"{}\"", reference.name),
    }
  }
}
