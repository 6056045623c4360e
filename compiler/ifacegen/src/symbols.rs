//! 型ごとの操作と埋め込み親をまとめた記号表。

use goiface_frontend::ast::{Field, FuncDecl, SourceFile, TypeExpr};
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// レシーバを持たない関数をまとめる擬似型の名前。
pub const GLOBAL: &str = "<global>";

#[derive(Debug, Clone)]
pub struct TypeEntry {
  pub name: String,
  /// 公開構造体として宣言されていればそのフィールド。
  pub definition: Option<Vec<Field>>,
  /// 名前なしフィールド（埋め込み）の型。宣言順、重複もそのまま。
  pub parents: Vec<TypeExpr>,
  /// 発見順の操作。出力時にだけ名前順に並べる。
  pub operations: Vec<FuncDecl>,
}

impl TypeEntry {
  fn new(name: &str) -> Self {
    Self {
      name: name.to_string(),
      definition: None,
      parents: Vec::new(),
      operations: Vec::new(),
    }
  }

  pub fn is_global(&self) -> bool {
    self.name == GLOBAL
  }

  pub fn is_struct(&self) -> bool {
    self.definition.is_some()
  }

  /// 名前の序数順（安定ソート）に並べた操作。
  pub fn sorted_operations(&self) -> Vec<&FuncDecl> {
    let mut operations: Vec<&FuncDecl> = self.operations.iter().collect();
    operations.sort_by(|left, right| left.name.name.cmp(&right.name.name));
    operations
  }
}

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
  entries: IndexMap<String, TypeEntry>,
  known_types: BTreeSet<String>,
}

impl SymbolTable {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_files<'a>(files: impl IntoIterator<Item = &'a SourceFile>) -> Self {
    let mut table = Self::new();
    for file in files {
      table.collect_file(file);
    }
    table
  }

  /// 1 ファイル分の宣言を取り込む。条件を満たさない宣言は黙って無視する。
  pub fn collect_file(&mut self, file: &SourceFile) {
    for func in file.func_decls() {
      if !func.name.is_exported() {
        continue;
      }
      let owner = match &func.receiver {
        None => GLOBAL,
        Some(receiver) => match receiver.base_name() {
          Some(name) => name,
          None => continue,
        },
      };
      self.entry_mut(owner).operations.push(func.clone());
    }

    for spec in file.type_specs() {
      if !spec.name.is_exported() {
        continue;
      }
      let Some(fields) = spec.struct_fields() else {
        continue;
      };
      self.known_types.insert(spec.name.name.clone());
      let entry = self.entry_mut(spec.name.as_str());
      entry.definition = Some(fields.to_vec());
      entry.parents.extend(
        fields
          .iter()
          .filter(|field| field.is_embedded())
          .map(|field| field.ty.clone()),
      );
    }
  }

  fn entry_mut(&mut self, name: &str) -> &mut TypeEntry {
    self
      .entries
      .entry(name.to_string())
      .or_insert_with(|| TypeEntry::new(name))
  }

  pub fn get(&self, name: &str) -> Option<&TypeEntry> {
    self.entries.get(name)
  }

  pub fn global(&self) -> Option<&TypeEntry> {
    self.get(GLOBAL)
  }

  /// 契約名へ置き換える対象となる公開構造体の名前。
  pub fn known_types(&self) -> &BTreeSet<String> {
    &self.known_types
  }

  /// 名前の序数順に並べた全エントリ。`<global>` は `<` のため先頭に来る。
  pub fn sorted_entries(&self) -> Vec<&TypeEntry> {
    let mut entries: Vec<&TypeEntry> = self.entries.values().collect();
    entries.sort_by(|left, right| left.name.cmp(&right.name));
    entries
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn operation_count(&self) -> usize {
    self.entries.values().map(|entry| entry.operations.len()).sum()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use goiface_frontend::parse_source;

  fn table(sources: &[&str]) -> SymbolTable {
    let files: Vec<SourceFile> = sources
      .iter()
      .map(|source| parse_source(source).unwrap())
      .collect();
    SymbolTable::from_files(&files)
  }

  #[test]
  fn pointer_and_value_receivers_share_one_entry() {
    let table = table(&[
      "package p\n\nfunc (w *Widget) Show() {}\n",
      "package p\n\nfunc (w Widget) Hide() {}\n\ntype Widget struct{}\n",
    ]);
    assert_eq!(table.len(), 1);
    let widget = table.get("Widget").unwrap();
    assert_eq!(widget.operations.len(), 2);
    assert!(widget.is_struct());
    assert!(table.known_types().contains("Widget"));
  }

  #[test]
  fn unexported_and_non_struct_declarations_are_skipped() {
    let table = table(&[concat!(
      "package p\n\n",
      "type hidden struct{}\n",
      "type Level int\n",
      "type Alias = Other\n",
      "type Reader interface { Read() }\n",
      "func helper() {}\n",
      "func (l Level) String() string { return \"\" }\n",
    )]);
    let names: Vec<_> = table.sorted_entries().iter().map(|entry| entry.name.clone()).collect();
    assert_eq!(names, vec!["Level"]);
    assert!(!table.get("Level").unwrap().is_struct());
    assert!(table.known_types().is_empty());
  }

  #[test]
  fn generic_receivers_are_skipped() {
    let table = table(&[concat!(
      "package p\n\n",
      "type List[T any] struct{}\n",
      "type Pair[K comparable, V any] struct{}\n",
      "type Box struct{}\n",
      "func (l *List[T]) Get() T { var zero T; return zero }\n",
      "func (p Pair[K, V]) Key() K { return p.k }\n",
      "func (b *Box) Open() {}\n",
    )]);
    let names: Vec<_> = table.sorted_entries().iter().map(|entry| entry.name.clone()).collect();
    assert_eq!(names, vec!["Box"]);
    assert_eq!(table.operation_count(), 1);
  }

  #[test]
  fn free_functions_go_to_global_bucket() {
    let table = table(&["package p\n\nfunc New() {}\nfunc Init() {}\n"]);
    let global = table.global().unwrap();
    let names: Vec<_> = global
      .sorted_operations()
      .iter()
      .map(|func| func.name.name.as_str())
      .collect();
    assert_eq!(names, vec!["Init", "New"]);
    assert_eq!(table.operation_count(), 2);
  }

  #[test]
  fn parents_keep_declaration_order_and_duplicates() {
    let table = table(&["package p\n\ntype W struct {\n\tB\n\tname string\n\t*A\n\tB\n}\n"]);
    let parents: Vec<_> = table
      .get("W")
      .unwrap()
      .parents
      .iter()
      .map(|parent| parent.render())
      .collect();
    assert_eq!(parents, vec!["B", "*A", "B"]);
  }

  #[test]
  fn sorted_entries_place_global_first() {
    let table = table(&["package p\n\ntype Zed struct{}\ntype Apple struct{}\nfunc Run() {}\n"]);
    let names: Vec<_> = table.sorted_entries().iter().map(|entry| entry.name.clone()).collect();
    assert_eq!(names, vec![GLOBAL.to_string(), "Apple".to_string(), "Zed".to_string()]);
  }
}
