//! 引数・結果リストと関数シグネチャの描画。

use std::collections::HashSet;

use goiface_frontend::ast::{Field, FuncDecl, Ident, Signature, TypeExpr, TypeKind};

use crate::render::{RenderContext, RenderError, RenderMode, Renderer};

/// `a, b int` のようなグループを 1 名ずつに展開する。名前なしの要素は 1 つのまま。
fn expand(fields: &[Field]) -> Vec<(Option<&Ident>, &TypeExpr)> {
  let mut expanded = Vec::new();
  for field in fields {
    if field.names.is_empty() {
      expanded.push((None, &field.ty));
    } else {
      expanded.extend(field.names.iter().map(|name| (Some(name), &field.ty)));
    }
  }
  expanded
}

/// 具象シグネチャと転送呼び出しで共有する引数名。
/// 名前なし・`_` の引数には位置に基づく `argN` を割り当てる。
/// 宣言済みの名前と衝突する場合は N を進めて空きを探す。
pub fn param_names(params: &[Field]) -> Vec<String> {
  let expanded = expand(params);
  let mut taken: HashSet<String> = expanded
    .iter()
    .filter_map(|(name, _)| name.filter(|name| !name.is_blank()))
    .map(|name| name.name.clone())
    .collect();
  expanded
    .into_iter()
    .enumerate()
    .map(|(index, (name, _))| match name {
      Some(name) if !name.is_blank() => name.name.clone(),
      _ => {
        let mut n = index;
        while taken.contains(&format!("arg{n}")) {
          n += 1;
        }
        let synthetic = format!("arg{n}");
        taken.insert(synthetic.clone());
        synthetic
      }
    })
    .collect()
}

pub fn render_params(
  renderer: &Renderer<'_>,
  params: &[Field],
  with_names: bool,
  mode: RenderMode,
  ctx: &mut RenderContext,
) -> Result<String, RenderError> {
  let names = if with_names {
    param_names(params)
  } else {
    Vec::new()
  };
  let mut rendered = Vec::new();
  for (index, (_, ty)) in expand(params).into_iter().enumerate() {
    let ty = renderer.render_type(ty, mode, ctx)?;
    match names.get(index) {
      Some(name) => rendered.push(format!("{name} {}", ty.text)),
      None => rendered.push(ty.text),
    }
  }
  Ok(rendered.join(", "))
}

/// 結果なしは `""`、1 つは `" T"`、2 つ以上は `" (T1, T2)"`。
pub fn render_results(
  renderer: &Renderer<'_>,
  results: &[Field],
  mode: RenderMode,
  ctx: &mut RenderContext,
) -> Result<String, RenderError> {
  let mut rendered = Vec::new();
  for (_, ty) in expand(results) {
    rendered.push(renderer.render_type(ty, mode, ctx)?.text);
  }
  Ok(match rendered.as_slice() {
    [] => String::new(),
    [single] => format!(" {single}"),
    many => format!(" ({})", many.join(", ")),
  })
}

/// 引数名なしの `(T1, T2) R`。関数型と interface 内メソッドで使う。
pub fn render_func_type(
  renderer: &Renderer<'_>,
  signature: &Signature,
  mode: RenderMode,
  ctx: &mut RenderContext,
) -> Result<String, RenderError> {
  let params = render_params(renderer, &signature.params, false, mode, ctx)?;
  let results = render_results(renderer, &signature.results, mode, ctx)?;
  Ok(format!("({params}){results}"))
}

/// 契約ファイルに書くメソッド行 `Name(T1, T2) R`。
pub fn contract_signature(
  renderer: &Renderer<'_>,
  func: &FuncDecl,
  ctx: &mut RenderContext,
) -> Result<String, RenderError> {
  let signature = render_func_type(renderer, &func.signature, RenderMode::CONTRACT, ctx)?;
  Ok(format!("{}{signature}", func.name.name))
}

/// 転送実装のメソッド宣言 `Name(a T1, b T2) R`。
pub fn concrete_signature(
  renderer: &Renderer<'_>,
  func: &FuncDecl,
  ctx: &mut RenderContext,
) -> Result<String, RenderError> {
  let mode = RenderMode::CONCRETE;
  let params = render_params(renderer, &func.signature.params, true, mode, ctx)?;
  let results = render_results(renderer, &func.signature.results, mode, ctx)?;
  Ok(format!("{}({params}){results}", func.name.name))
}

/// 元の関数を呼ぶ式。結果があれば `return ` を前置し、可変長引数には `...` を付ける。
pub fn forwarding_call(func: &FuncDecl) -> String {
  let params = &func.signature.params;
  let args: Vec<String> = param_names(params)
    .into_iter()
    .zip(expand(params))
    .map(|(name, (_, ty))| match ty.kind {
      TypeKind::Ellipsis { .. } => format!("{name}..."),
      _ => name,
    })
    .collect();
  let prefix = if func.signature.results.is_empty() {
    ""
  } else {
    "return "
  };
  format!("{prefix}{}({})", func.name.name, args.join(", "))
}
