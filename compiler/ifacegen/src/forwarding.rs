//! 自由関数へ転送するラッパ型 `Real<Contract>`。

use crate::render::{RenderContext, RenderError, Renderer};
use crate::signature::{concrete_signature, forwarding_call};
use crate::symbols::TypeEntry;

/// `<global>` の操作をメソッドとして持つ実装ファイルを出力する。
pub fn render_forwarding(
  renderer: &Renderer<'_>,
  global: &TypeEntry,
  contract_name: &str,
  package_root: &str,
  package_name: &str,
) -> Result<String, RenderError> {
  let mut ctx = RenderContext::new();
  let mut body = String::new();

  body.push_str(&format!("type Real{contract_name} struct{{}}\n\n"));
  body.push_str(&format!("var Real = &Real{contract_name}{{}}\n\n"));
  for func in global.sorted_operations() {
    let signature = concrete_signature(renderer, func, &mut ctx)?;
    body.push_str(&format!("func (*Real{contract_name}) {signature} {{\n"));
    body.push_str(&format!("  {}\n", forwarding_call(func)));
    body.push_str("}\n\n");
  }

  let mut output = format!("package {package_name}\n\n");
  if ctx.uses_local_contracts() {
    output.push_str(&format!("import \"{package_root}/{package_name}/iface\"\n"));
  }
  for reference in ctx.namespaces() {
    output.push_str("import ");
    output.push_str(&renderer.namespaces().import_spec(reference));
    output.push('\n');
  }
  output.push('\n');
  output.push_str(&body);
  Ok(output)
}
