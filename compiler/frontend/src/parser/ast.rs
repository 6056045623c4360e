use serde::Serialize;

use crate::span::Span;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Go の公開規則（先頭が大文字）に従うかどうか。
    pub fn is_exported(&self) -> bool {
        self.name
            .chars()
            .next()
            .map(char::is_uppercase)
            .unwrap_or(false)
    }

    /// 空識別子 `_`。
    pub fn is_blank(&self) -> bool {
        self.name == "_"
    }
}

/// 1 ファイル分の宣言。関数本体や初期化式は保持しない。
#[derive(Debug, Clone, Serialize)]
pub struct SourceFile {
    pub package: Ident,
    pub imports: Vec<ImportSpec>,
    pub decls: Vec<Decl>,
}

impl SourceFile {
    pub fn func_decls(&self) -> impl Iterator<Item = &FuncDecl> {
        self.decls.iter().filter_map(|decl| match decl {
            Decl::Func(func) => Some(func),
            _ => None,
        })
    }

    pub fn type_specs(&self) -> impl Iterator<Item = &TypeSpec> {
        self.decls
            .iter()
            .filter_map(|decl| match decl {
                Decl::Type(decl) => Some(decl.specs.iter()),
                _ => None,
            })
            .flatten()
    }

    pub fn render(&self) -> String {
        let mut rendered = vec![format!("package {}", self.package.name)];
        for import in &self.imports {
            rendered.push(import.render());
        }
        rendered.extend(self.decls.iter().map(Decl::render));
        rendered.join("\n")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<Ident>,
    /// 引用符を含むそのままのパス文字列。
    pub path: String,
    pub span: Span,
}

impl ImportSpec {
    pub fn render(&self) -> String {
        match &self.alias {
            Some(alias) => format!("import {} {}", alias.name, self.path),
            None => format!("import {}", self.path),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decl {
    Func(FuncDecl),
    Type(TypeDecl),
    /// `var` / `const`。形だけ読み飛ばす。
    Value { keyword: ValueKeyword, span: Span },
}

impl Decl {
    pub fn render(&self) -> String {
        match self {
            Decl::Func(func) => func.render(),
            Decl::Type(decl) => decl
                .specs
                .iter()
                .map(TypeSpec::render)
                .collect::<Vec<_>>()
                .join("\n"),
            Decl::Value { keyword, .. } => format!("{} …", keyword.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKeyword {
    Var,
    Const,
}

impl ValueKeyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKeyword::Var => "var",
            ValueKeyword::Const => "const",
        }
    }
}

/// `type` 宣言。`type ( … )` のグループは複数の `TypeSpec` を持つ。
#[derive(Debug, Clone, Serialize)]
pub struct TypeDecl {
    pub specs: Vec<TypeSpec>,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeSpec {
    pub name: Ident,
    /// `type A = B` 形式のエイリアス。
    pub alias: bool,
    pub ty: TypeExpr,
    pub span: Span,
}

impl TypeSpec {
    pub fn render(&self) -> String {
        let assign = if self.alias { " =" } else { "" };
        format!("type {}{} {}", self.name.name, assign, self.ty.render())
    }

    /// 下位型が構造体であれば、そのフィールド一覧を返す。
    pub fn struct_fields(&self) -> Option<&[Field]> {
        if self.alias {
            return None;
        }
        match &self.ty.kind {
            TypeKind::Struct { fields } => Some(fields),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FuncDecl {
    pub name: Ident,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver: Option<Receiver>,
    pub signature: Signature,
    /// 本体 `{ … }` を持つかどうか（アセンブリ実装の宣言は持たない）。
    pub has_body: bool,
    pub span: Span,
}

impl FuncDecl {
    pub fn render(&self) -> String {
        let receiver = match &self.receiver {
            Some(receiver) => format!("({}) ", receiver.render()),
            None => String::new(),
        };
        format!(
            "func {}{}{}",
            receiver,
            self.name.name,
            self.signature.render()
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Receiver {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Ident>,
    pub ty: TypeExpr,
    /// ジェネリック型のレシーバ `*T[K, V]` に付く型引数。
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub type_args: Vec<Ident>,
}

impl Receiver {
    /// `*T` / `T` のどちらの形でも基底の型名 `T` を返す。
    /// 型引数付きのレシーバは対象外なので `None`。
    pub fn base_name(&self) -> Option<&str> {
        if !self.type_args.is_empty() {
            return None;
        }
        match &self.ty.kind {
            TypeKind::Named { name } => Some(name.as_str()),
            TypeKind::Pointer { target } => match &target.kind {
                TypeKind::Named { name } => Some(name.as_str()),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&self) -> String {
        let mut ty = self.ty.render();
        if !self.type_args.is_empty() {
            let args: Vec<&str> = self.type_args.iter().map(|arg| arg.name.as_str()).collect();
            ty.push_str(&format!("[{}]", args.join(", ")));
        }
        match &self.name {
            Some(name) => format!("{} {}", name.name, ty),
            None => ty,
        }
    }
}

/// 引数リストと結果リスト。
#[derive(Debug, Clone, Serialize)]
pub struct Signature {
    pub params: Vec<Field>,
    pub results: Vec<Field>,
    pub span: Span,
}

impl Signature {
    pub fn render(&self) -> String {
        let params = self
            .params
            .iter()
            .map(Field::render)
            .collect::<Vec<_>>()
            .join(", ");
        let results = match self.results.as_slice() {
            [] => String::new(),
            [single] if single.names.is_empty() => format!(" {}", single.ty.render()),
            many => format!(
                " ({})",
                many.iter()
                    .map(Field::render)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        };
        format!("({params}){results}")
    }
}

/// 構造体フィールド・引数・結果の共通表現。埋め込みフィールドは `names` が空になる。
#[derive(Debug, Clone, Serialize)]
pub struct Field {
    pub names: Vec<Ident>,
    pub ty: TypeExpr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    pub span: Span,
}

impl Field {
    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }

    pub fn render(&self) -> String {
        let mut rendered = if self.names.is_empty() {
            self.ty.render()
        } else {
            format!(
                "{} {}",
                self.names
                    .iter()
                    .map(|name| name.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                self.ty.render()
            )
        };
        if let Some(tag) = &self.tag {
            rendered.push(' ');
            rendered.push_str(tag);
        }
        rendered
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeExpr {
    pub kind: TypeKind,
    pub span: Span,
}

impl TypeExpr {
    pub fn new(kind: TypeKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// ソース上の表記に近い形で出力する（テスト・診断用）。
    pub fn render(&self) -> String {
        self.kind.render()
    }
}

/// 型式の閉じた列挙。
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeKind {
    Named {
        name: Ident,
    },
    Pointer {
        target: Box<TypeExpr>,
    },
    Qualified {
        package: Ident,
        name: Ident,
    },
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    Array {
        length: ArrayLength,
        element: Box<TypeExpr>,
    },
    Interface {
        elements: Vec<InterfaceElem>,
    },
    Func {
        signature: Box<Signature>,
    },
    /// 可変長引数 `...T`。引数位置にのみ現れる。
    Ellipsis {
        element: Box<TypeExpr>,
    },
    Chan {
        direction: ChanDirection,
        element: Box<TypeExpr>,
    },
    Struct {
        fields: Vec<Field>,
    },
}

impl TypeKind {
    /// 診断用の種別名。
    pub fn label(&self) -> &'static str {
        match self {
            TypeKind::Named { .. } => "named",
            TypeKind::Pointer { .. } => "pointer",
            TypeKind::Qualified { .. } => "qualified",
            TypeKind::Map { .. } => "map",
            TypeKind::Array { .. } => "array",
            TypeKind::Interface { .. } => "interface",
            TypeKind::Func { .. } => "func",
            TypeKind::Ellipsis { .. } => "ellipsis",
            TypeKind::Chan { .. } => "chan",
            TypeKind::Struct { .. } => "struct",
        }
    }

    fn render(&self) -> String {
        match self {
            TypeKind::Named { name } => name.name.clone(),
            TypeKind::Pointer { target } => format!("*{}", target.render()),
            TypeKind::Qualified { package, name } => format!("{}.{}", package.name, name.name),
            TypeKind::Map { key, value } => format!("map[{}]{}", key.render(), value.render()),
            TypeKind::Array { length, element } => {
                format!("[{}]{}", length.render(), element.render())
            }
            TypeKind::Interface { elements } if elements.is_empty() => "interface{}".to_string(),
            TypeKind::Interface { elements } => format!(
                "interface {{ {} }}",
                elements
                    .iter()
                    .map(InterfaceElem::render)
                    .collect::<Vec<_>>()
                    .join("; ")
            ),
            TypeKind::Func { signature } => format!("func{}", signature.render()),
            TypeKind::Ellipsis { element } => format!("...{}", element.render()),
            TypeKind::Chan { direction, element } => match direction {
                ChanDirection::Both => format!("chan {}", element.render()),
                ChanDirection::Send => format!("chan<- {}", element.render()),
                ChanDirection::Recv => format!("<-chan {}", element.render()),
            },
            TypeKind::Struct { fields } if fields.is_empty() => "struct{}".to_string(),
            TypeKind::Struct { fields } => format!(
                "struct {{ {} }}",
                fields
                    .iter()
                    .map(Field::render)
                    .collect::<Vec<_>>()
                    .join("; ")
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArrayLength {
    /// `[]T`
    Slice,
    /// `[...]T`
    Ellipsis,
    /// `[N]T` など任意の長さ式。
    Expr { raw: String },
}

impl ArrayLength {
    fn render(&self) -> &str {
        match self {
            ArrayLength::Slice => "",
            ArrayLength::Ellipsis => "...",
            ArrayLength::Expr { raw } => raw,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InterfaceElem {
    Method { name: Ident, signature: Signature },
    Embedded { ty: TypeExpr },
}

impl InterfaceElem {
    fn render(&self) -> String {
        match self {
            InterfaceElem::Method { name, signature } => {
                format!("{}{}", name.name, signature.render())
            }
            InterfaceElem::Embedded { ty } => ty.render(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanDirection {
    Both,
    Send,
    Recv,
}
