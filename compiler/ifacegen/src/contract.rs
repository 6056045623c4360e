//! `package iface` に置く契約ファイル。

use crate::render::{RenderContext, RenderError, RenderMode, Renderer};
use crate::signature::contract_signature;
use crate::symbols::TypeEntry;

/// `entry` の契約を `name` という interface として出力する。
pub fn render_contract(
  renderer: &Renderer<'_>,
  name: &str,
  entry: &TypeEntry,
) -> Result<String, RenderError> {
  let mut ctx = RenderContext::new();
  let mut body = String::new();

  body.push_str(&format!("type {name} interface {{\n"));
  for parent in &entry.parents {
    let parent = renderer.render_type(parent, RenderMode::CONTRACT, &mut ctx)?;
    body.push_str("    ");
    body.push_str(&parent.text);
    body.push('\n');
  }
  if !entry.parents.is_empty() && !entry.operations.is_empty() {
    body.push('\n');
  }
  for func in entry.sorted_operations() {
    body.push_str("    ");
    body.push_str(&contract_signature(renderer, func, &mut ctx)?);
    body.push('\n');
  }
  body.push_str(&format!("}} // end of {name}\n\n"));
  body.push_str(&format!("func Assert{name}(_ {name}) {{}}\n"));

  let mut output = String::from("package iface\n\n");
  for reference in ctx.namespaces() {
    output.push_str("import ");
    output.push_str(&renderer.namespaces().import_spec(reference));
    output.push('\n');
  }
  output.push('\n');
  output.push_str(&body);
  Ok(output)
}
