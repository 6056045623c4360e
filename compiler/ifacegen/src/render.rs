//! 型式を Go の型表記へ描き戻す。
//!
//! 既知のローカル型は契約名へ、既知の外部名前空間は契約パッケージへ置き換えられる。
//! どちらを行うかは [`RenderMode`] で決まり、参照した名前空間は [`RenderContext`] に溜まる。

use goiface_frontend::ast::{ArrayLength, InterfaceElem, TypeExpr, TypeKind};
use goiface_frontend::Span;
use std::collections::BTreeSet;
use thiserror::Error;

use crate::namespace::{NamespaceRef, NamespaceTable};
use crate::signature;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
  #[error("{kind} 型は出力できません ({span})")]
  UnsupportedType { kind: &'static str, span: Span },
  #[error("配列長 `{raw}` は出力できません ({span})")]
  UnsupportedArrayLength { raw: String, span: Span },
}

/// 置き換えの有無を決める 2 つのフラグ。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderMode {
  /// 既知のローカル型を `iface.Name` として参照する。
  pub local_contracts: bool,
  /// 既知の外部名前空間を `<ns>_iface` へ書き換える。
  pub external_contracts: bool,
}

impl RenderMode {
  pub const PLAIN: RenderMode = RenderMode {
    local_contracts: false,
    external_contracts: false,
  };
  /// `package iface` 内で使う契約シグネチャ。
  pub const CONTRACT: RenderMode = RenderMode {
    local_contracts: false,
    external_contracts: true,
  };
  /// 利用側パッケージで使う具象シグネチャ。
  pub const CONCRETE: RenderMode = RenderMode {
    local_contracts: true,
    external_contracts: true,
  };
}

/// 1 ファイル分の出力で参照した名前空間。ファイルごとに作り直す。
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenderContext {
  namespaces: BTreeSet<NamespaceRef>,
  local_contracts: bool,
}

impl RenderContext {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn record_namespace(&mut self, reference: NamespaceRef) {
    self.namespaces.insert(reference);
  }

  pub fn namespaces(&self) -> impl Iterator<Item = &NamespaceRef> {
    self.namespaces.iter()
  }

  /// ローカルの `iface` パッケージを参照したかどうか。
  pub fn uses_local_contracts(&self) -> bool {
    self.local_contracts
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
  pub text: String,
  /// ローカルまたは外部の契約を指していれば `true`。ポインタの `*` を落とす判定に使う。
  pub is_contract: bool,
}

impl Rendered {
  fn plain(text: String) -> Self {
    Self {
      text,
      is_contract: false,
    }
  }

  fn contract(text: String) -> Self {
    Self {
      text,
      is_contract: true,
    }
  }
}

/// 型表と名前空間表を読み取り専用で参照する描画器。
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
  known_types: &'a BTreeSet<String>,
  namespaces: &'a NamespaceTable,
}

impl<'a> Renderer<'a> {
  pub fn new(known_types: &'a BTreeSet<String>, namespaces: &'a NamespaceTable) -> Self {
    Self {
      known_types,
      namespaces,
    }
  }

  pub fn namespaces(&self) -> &'a NamespaceTable {
    self.namespaces
  }

  pub fn render_type(
    &self,
    node: &TypeExpr,
    mode: RenderMode,
    ctx: &mut RenderContext,
  ) -> Result<Rendered, RenderError> {
    match &node.kind {
      TypeKind::Named { name } => {
        if !self.known_types.contains(name.as_str()) {
          return Ok(Rendered::plain(name.name.clone()));
        }
        if mode.local_contracts {
          ctx.local_contracts = true;
          Ok(Rendered::contract(format!("iface.{}", name.name)))
        } else {
          Ok(Rendered::contract(name.name.clone()))
        }
      }
      TypeKind::Pointer { target } => {
        let pointee = self.render_type(target, mode, ctx)?;
        if pointee.is_contract {
          Ok(pointee)
        } else {
          Ok(Rendered::plain(format!("*{}", pointee.text)))
        }
      }
      TypeKind::Qualified { package, name } => {
        let reference = if mode.external_contracts && self.namespaces.is_known(package.as_str()) {
          NamespaceRef::contract(package.as_str())
        } else {
          NamespaceRef::concrete(package.as_str())
        };
        let rendered = Rendered {
          text: format!("{}.{}", reference.qualifier(), name.name),
          is_contract: reference.contract,
        };
        ctx.record_namespace(reference);
        Ok(rendered)
      }
      TypeKind::Map { key, value } => {
        let key = self.render_type(key, mode, ctx)?;
        let value = self.render_type(value, mode, ctx)?;
        Ok(Rendered::plain(format!("map[{}]{}", key.text, value.text)))
      }
      TypeKind::Array { length, element } => {
        let open = match length {
          ArrayLength::Slice => "[]",
          ArrayLength::Ellipsis => "[...]",
          ArrayLength::Expr { raw } => {
            return Err(RenderError::UnsupportedArrayLength {
              raw: raw.clone(),
              span: node.span,
            })
          }
        };
        let element = self.render_type(element, mode, ctx)?;
        Ok(Rendered::plain(format!("{open}{}", element.text)))
      }
      TypeKind::Interface { elements } => {
        if elements.is_empty() {
          return Ok(Rendered::plain("interface{}".to_string()));
        }
        let mut rendered = Vec::with_capacity(elements.len());
        for element in elements {
          match element {
            InterfaceElem::Method { name, signature } => {
              let signature = signature::render_func_type(self, signature, mode, ctx)?;
              rendered.push(format!("{}{signature}", name.name));
            }
            InterfaceElem::Embedded { ty } => {
              rendered.push(self.render_type(ty, mode, ctx)?.text);
            }
          }
        }
        Ok(Rendered::plain(format!("interface {{ {} }}", rendered.join("; "))))
      }
      TypeKind::Func { signature } => {
        let signature = signature::render_func_type(self, signature, mode, ctx)?;
        Ok(Rendered::plain(format!("func{signature}")))
      }
      TypeKind::Ellipsis { element } => {
        let element = self.render_type(element, mode, ctx)?;
        Ok(Rendered::plain(format!("...{}", element.text)))
      }
      TypeKind::Chan { .. } | TypeKind::Struct { .. } => Err(RenderError::UnsupportedType {
        kind: node.kind.label(),
        span: node.span,
      }),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use goiface_frontend::ast::{Ident, Signature};

  fn ident(name: &str) -> Ident {
    Ident {
      name: name.to_string(),
      span: Span::default(),
    }
  }

  fn expr(kind: TypeKind) -> TypeExpr {
    TypeExpr::new(kind, Span::default())
  }

  fn named(name: &str) -> TypeExpr {
    expr(TypeKind::Named { name: ident(name) })
  }

  fn pointer(target: TypeExpr) -> TypeExpr {
    expr(TypeKind::Pointer {
      target: Box::new(target),
    })
  }

  fn qualified(package: &str, name: &str) -> TypeExpr {
    expr(TypeKind::Qualified {
      package: ident(package),
      name: ident(name),
    })
  }

  fn known() -> BTreeSet<String> {
    ["Widget".to_string()].into_iter().collect()
  }

  #[test]
  fn known_type_becomes_contract_reference() {
    let known = known();
    let namespaces = NamespaceTable::default();
    let renderer = Renderer::new(&known, &namespaces);

    let mut ctx = RenderContext::new();
    let local = renderer
      .render_type(&pointer(named("Widget")), RenderMode::CONCRETE, &mut ctx)
      .unwrap();
    assert_eq!(local.text, "iface.Widget");
    assert!(ctx.uses_local_contracts());

    let mut ctx = RenderContext::new();
    let bare = renderer
      .render_type(&pointer(named("Widget")), RenderMode::CONTRACT, &mut ctx)
      .unwrap();
    assert_eq!(bare.text, "Widget");
    assert!(!ctx.uses_local_contracts());
  }

  #[test]
  fn unknown_pointer_keeps_star() {
    let known = known();
    let namespaces = NamespaceTable::default();
    let renderer = Renderer::new(&known, &namespaces);
    let mut ctx = RenderContext::new();
    let rendered = renderer
      .render_type(&pointer(named("Other")), RenderMode::CONCRETE, &mut ctx)
      .unwrap();
    assert_eq!(rendered.text, "*Other");
    assert!(!rendered.is_contract);
  }

  #[test]
  fn known_namespace_is_recorded_with_its_tag() {
    let known = known();
    let namespaces = NamespaceTable::default();
    let renderer = Renderer::new(&known, &namespaces);

    let mut ctx = RenderContext::new();
    let rendered = renderer
      .render_type(&pointer(qualified("gdk", "Pixbuf")), RenderMode::CONTRACT, &mut ctx)
      .unwrap();
    assert_eq!(rendered.text, "gdk_iface.Pixbuf");
    assert_eq!(
      ctx.namespaces().collect::<Vec<_>>(),
      vec![&NamespaceRef::contract("gdk")]
    );

    let mut ctx = RenderContext::new();
    let rendered = renderer
      .render_type(&pointer(qualified("gdk", "Pixbuf")), RenderMode::PLAIN, &mut ctx)
      .unwrap();
    assert_eq!(rendered.text, "*gdk.Pixbuf");
    assert_eq!(
      ctx.namespaces().collect::<Vec<_>>(),
      vec![&NamespaceRef::concrete("gdk")]
    );
  }

  #[test]
  fn unknown_namespace_is_never_rewritten() {
    let known = known();
    let namespaces = NamespaceTable::default();
    let renderer = Renderer::new(&known, &namespaces);
    let mut ctx = RenderContext::new();
    let rendered = renderer
      .render_type(&pointer(qualified("unsafe", "Pointer")), RenderMode::CONCRETE, &mut ctx)
      .unwrap();
    assert_eq!(rendered.text, "*unsafe.Pointer");
  }

  #[test]
  fn fixed_length_array_is_rejected() {
    let known = known();
    let namespaces = NamespaceTable::default();
    let renderer = Renderer::new(&known, &namespaces);
    let node = expr(TypeKind::Array {
      length: ArrayLength::Expr {
        raw: "4".to_string(),
      },
      element: Box::new(named("byte")),
    });
    let err = renderer
      .render_type(&node, RenderMode::PLAIN, &mut RenderContext::new())
      .unwrap_err();
    assert!(matches!(err, RenderError::UnsupportedArrayLength { raw, .. } if raw == "4"));
  }

  #[test]
  fn func_type_drops_parameter_names() {
    let known = known();
    let namespaces = NamespaceTable::default();
    let renderer = Renderer::new(&known, &namespaces);
    let param = goiface_frontend::ast::Field {
      names: vec![ident("w")],
      ty: pointer(named("Widget")),
      tag: None,
      span: Span::default(),
    };
    let node = expr(TypeKind::Func {
      signature: Box::new(Signature {
        params: vec![param],
        results: Vec::new(),
        span: Span::default(),
      }),
    });
    let rendered = renderer
      .render_type(&node, RenderMode::CONCRETE, &mut RenderContext::new())
      .unwrap();
    assert_eq!(rendered.text, "func(iface.Widget)");
  }
}
