//! 生成した実装が契約を満たすことをコンパイル時に確かめる `init()`。

use crate::symbols::SymbolTable;

pub fn render_testers(
  table: &SymbolTable,
  contract_name: &str,
  package_root: &str,
  package_name: &str,
) -> String {
  let entries = table.sorted_entries();
  let mut output = format!("package {package_name}\n\n");
  if !entries.is_empty() {
    output.push_str(&format!("import \"{package_root}/{package_name}/iface\"\n\n"));
  }
  output.push_str("func init() {\n");
  for entry in entries {
    let (name, value) = if entry.is_global() {
      (contract_name, format!("&Real{contract_name}{{}}"))
    } else if entry.is_struct() {
      (entry.name.as_str(), format!("&{}{{}}", entry.name))
    } else {
      (entry.name.as_str(), format!("new({})", entry.name))
    };
    output.push_str(&format!("  iface.Assert{name}({value})\n"));
  }
  output.push_str("}\n");
  output
}

#[cfg(test)]
mod tests {
  use super::*;
  use goiface_frontend::parse_source;

  #[test]
  fn values_depend_on_entry_kind() {
    let file = parse_source(concat!(
      "package gtk\n\n",
      "type Window struct{}\n",
      "type Align int\n",
      "func (a Align) String() string { return \"\" }\n",
      "func Init() {}\n",
    ))
    .unwrap();
    let table = SymbolTable::from_files([&file]);
    let rendered = render_testers(&table, "Gtk", "github.com/example/wrap", "gtk");
    assert_eq!(
      rendered,
      concat!(
        "package gtk\n\n",
        "import \"github.com/example/wrap/gtk/iface\"\n\n",
        "func init() {\n",
        "  iface.AssertGtk(&RealGtk{})\n",
        "  iface.AssertAlign(new(Align))\n",
        "  iface.AssertWindow(&Window{})\n",
        "}\n",
      )
    );
  }

  #[test]
  fn empty_table_needs_no_import() {
    let rendered = render_testers(&SymbolTable::new(), "Gtk", "root", "gtk");
    assert_eq!(rendered, "package gtk\n\nfunc init() {\n}\n");
  }
}
