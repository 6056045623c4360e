//! Go ソースの宣言部分を読むパーサ。
//!
//! パッケージ節・import・`type`・`func`・`var`/`const` の形だけを組み立て、
//! 関数本体や初期化式は括弧の対応だけを見て読み飛ばす。

use chumsky::error::{Simple, SimpleReason};
use chumsky::prelude::*;
use chumsky::recursive::Recursive;
use chumsky::stream::Stream;
use chumsky::Parser as ChumskyParser;
use std::ops::Range;

pub mod ast;

use crate::error::FrontendError;
use crate::lexer::lex_source;
use crate::span::Span;
use crate::token::{Token, TokenKind};
use ast::{
    ArrayLength, ChanDirection, Decl, Field, FuncDecl, Ident, ImportSpec, InterfaceElem, Receiver,
    Signature, SourceFile, TypeDecl, TypeExpr, TypeKind, TypeSpec, ValueKeyword,
};

type ParserError = Simple<TokenKind>;

/// ソース文字列を字句解析してから宣言を組み立てる。字句エラーは最初の 1 件を返す。
pub fn parse_source(source: &str) -> Result<SourceFile, FrontendError> {
    let lexed = lex_source(source);
    if let Some(error) = lexed.errors.into_iter().next() {
        return Err(error);
    }
    parse_tokens(&lexed.tokens, source)
}

/// 字句解析済みのトークン列から宣言を組み立てる。
pub fn parse_tokens(tokens: &[Token], source: &str) -> Result<SourceFile, FrontendError> {
    let token_pairs: Vec<_> = tokens
        .iter()
        .map(|token| {
            let span = token.span;
            (token.kind, (span.start as usize)..(span.end as usize))
        })
        .collect();

    let end = source.len();
    let parser = file_parser(source);
    parser
        .parse(Stream::from_iter(end..end, token_pairs.into_iter()))
        .map_err(|errors| match errors.into_iter().next() {
            Some(error) => convert_error(error),
            None => FrontendError::InvalidDeclaration {
                message: "入力を解釈できません".to_string(),
                span: Span::new(0, end as u32),
            },
        })
}

fn convert_error(error: ParserError) -> FrontendError {
    let span = Span::from(error.span());
    if let SimpleReason::Custom(message) = error.reason() {
        return FrontendError::InvalidDeclaration {
            message: message.clone(),
            span,
        };
    }
    let mut expected: Vec<String> = error
        .expected()
        .map(|expectation| match expectation {
            Some(kind) => format!("`{}`", kind.describe()),
            None => "入力の終端".to_string(),
        })
        .collect();
    expected.sort();
    expected.dedup();
    FrontendError::UnexpectedToken {
        expected,
        found: error.found().map(|kind| kind.describe().to_string()),
        span,
    }
}

fn range_to_span(span: Range<usize>) -> Span {
    Span::from(span)
}

/// 括弧の対応だけを見てトークンを 1 つ（またはグループ 1 つ）読み飛ばす。
fn token_tree_parser() -> impl ChumskyParser<TokenKind, (), Error = ParserError> + Clone {
    recursive(|tree: Recursive<TokenKind, (), ParserError>| {
        let inner = choice((tree, just(TokenKind::Semicolon).ignored())).repeated();
        let group = |open: TokenKind, close: TokenKind| {
            just(open)
                .ignore_then(inner.clone())
                .then_ignore(just(close))
                .ignored()
        };
        choice((
            group(TokenKind::LParen, TokenKind::RParen),
            group(TokenKind::LBracket, TokenKind::RBracket),
            group(TokenKind::LBrace, TokenKind::RBrace),
            filter(|kind: &TokenKind| {
                kind.closing_delimiter().is_none()
                    && !matches!(
                        kind,
                        TokenKind::RParen
                            | TokenKind::RBracket
                            | TokenKind::RBrace
                            | TokenKind::Semicolon
                    )
            })
            .ignored(),
        ))
    })
}

/// 引数リストの 1 要素。`a int` なら `first` が名前、`second` が型になる。
#[derive(Debug, Clone)]
struct ParamEntry {
    first: TypeExpr,
    second: Option<TypeExpr>,
    span: Span,
}

/// Go の引数グループ化規則（`a, b int`）を解決する。
/// 全要素が名前付きか全要素が名前なしのどちらかでなければならない。
fn group_params(entries: Vec<ParamEntry>) -> Result<Vec<Field>, String> {
    if entries.iter().all(|entry| entry.second.is_none()) {
        return Ok(entries
            .into_iter()
            .map(|entry| Field {
                names: Vec::new(),
                ty: entry.first,
                tag: None,
                span: entry.span,
            })
            .collect());
    }

    let mut fields = Vec::new();
    let mut pending: Vec<Ident> = Vec::new();
    let mut pending_start: Option<Span> = None;
    for entry in entries {
        let name = match entry.first.kind {
            TypeKind::Named { name } => name,
            other => {
                return Err(format!(
                    "引数名が必要ですが {} 型が見つかりました",
                    other.label()
                ))
            }
        };
        pending.push(name);
        let start = *pending_start.get_or_insert(entry.span);
        if let Some(ty) = entry.second {
            fields.push(Field {
                names: std::mem::take(&mut pending),
                ty,
                tag: None,
                span: start.join(entry.span),
            });
            pending_start = None;
        }
    }
    if !pending.is_empty() {
        return Err("名前付き引数と名前なし引数が混在しています".to_string());
    }
    Ok(fields)
}

fn file_parser<'src>(
    source: &'src str,
) -> impl ChumskyParser<TokenKind, SourceFile, Error = ParserError> + Clone + 'src {
    let ident = just(TokenKind::Identifier).map_with_span(move |_, span: Range<usize>| Ident {
        name: source[span.clone()].to_string(),
        span: range_to_span(span),
    });
    let semi = just(TokenKind::Semicolon);
    let semis = semi.clone().repeated();
    let string_lit = choice((
        just(TokenKind::StringLiteral),
        just(TokenKind::RawStringLiteral),
    ))
    .map_with_span(move |_, span: Range<usize>| source[span].to_string());

    let token_tree = token_tree_parser();
    let block = just(TokenKind::LBrace)
        .ignore_then(choice((token_tree.clone(), semi.clone().ignored())).repeated())
        .then_ignore(just(TokenKind::RBrace))
        .ignored();

    let mut type_expr: Recursive<'src, TokenKind, TypeExpr, ParserError> = Recursive::declare();
    let mut signature: Recursive<'src, TokenKind, Signature, ParserError> = Recursive::declare();

    let type_name = ident
        .clone()
        .then(just(TokenKind::Dot).ignore_then(ident.clone()).or_not())
        .map_with_span(|(first, second), span: Range<usize>| {
            let kind = match second {
                Some(name) => TypeKind::Qualified {
                    package: first,
                    name,
                },
                None => TypeKind::Named { name: first },
            };
            TypeExpr::new(kind, range_to_span(span))
        });

    let pointer = just(TokenKind::Star)
        .ignore_then(type_expr.clone())
        .map_with_span(|target, span: Range<usize>| {
            TypeExpr::new(
                TypeKind::Pointer {
                    target: Box::new(target),
                },
                range_to_span(span),
            )
        });

    let array_length = filter(|kind: &TokenKind| {
        !matches!(kind, TokenKind::RBracket | TokenKind::Semicolon)
    })
    .repeated()
    .map_with_span(
        move |tokens: Vec<TokenKind>, span: Range<usize>| match tokens.as_slice() {
            [] => ArrayLength::Slice,
            [TokenKind::Ellipsis] => ArrayLength::Ellipsis,
            _ => ArrayLength::Expr {
                raw: source[span].trim().to_string(),
            },
        },
    );

    let array = just(TokenKind::LBracket)
        .ignore_then(array_length)
        .then_ignore(just(TokenKind::RBracket))
        .then(type_expr.clone())
        .map_with_span(|(length, element), span: Range<usize>| {
            TypeExpr::new(
                TypeKind::Array {
                    length,
                    element: Box::new(element),
                },
                range_to_span(span),
            )
        });

    let map = just(TokenKind::KeywordMap)
        .ignore_then(
            type_expr
                .clone()
                .delimited_by(just(TokenKind::LBracket), just(TokenKind::RBracket)),
        )
        .then(type_expr.clone())
        .map_with_span(|(key, value), span: Range<usize>| {
            TypeExpr::new(
                TypeKind::Map {
                    key: Box::new(key),
                    value: Box::new(value),
                },
                range_to_span(span),
            )
        });

    let func_type = just(TokenKind::KeywordFunc)
        .ignore_then(signature.clone())
        .map_with_span(|signature, span: Range<usize>| {
            TypeExpr::new(
                TypeKind::Func {
                    signature: Box::new(signature),
                },
                range_to_span(span),
            )
        });

    let interface_elem = choice((
        ident
            .clone()
            .then(signature.clone())
            .map(|(name, signature)| InterfaceElem::Method { name, signature }),
        type_expr.clone().map(|ty| InterfaceElem::Embedded { ty }),
    ));
    let interface = just(TokenKind::KeywordInterface)
        .ignore_then(just(TokenKind::LBrace))
        .ignore_then(semis.clone())
        .ignore_then(interface_elem.then_ignore(semis.clone()).repeated())
        .then_ignore(just(TokenKind::RBrace))
        .map_with_span(|elements, span: Range<usize>| {
            TypeExpr::new(TypeKind::Interface { elements }, range_to_span(span))
        });

    let named_fields = ident
        .clone()
        .separated_by(just(TokenKind::Comma))
        .at_least(1)
        .then(type_expr.clone())
        .then(string_lit.clone().or_not())
        .map_with_span(|((names, ty), tag), span: Range<usize>| Field {
            names,
            ty,
            tag,
            span: range_to_span(span),
        });
    let embedded_field = just(TokenKind::Star)
        .or_not()
        .then(type_name.clone())
        .map_with_span(|(star, ty), span: Range<usize>| match star {
            Some(_) => TypeExpr::new(
                TypeKind::Pointer {
                    target: Box::new(ty),
                },
                range_to_span(span),
            ),
            None => ty,
        })
        .then(string_lit.clone().or_not())
        .map_with_span(|(ty, tag), span: Range<usize>| Field {
            names: Vec::new(),
            ty,
            tag,
            span: range_to_span(span),
        });
    let struct_type = just(TokenKind::KeywordStruct)
        .ignore_then(just(TokenKind::LBrace))
        .ignore_then(semis.clone())
        .ignore_then(
            choice((named_fields, embedded_field))
                .then_ignore(semis.clone())
                .repeated(),
        )
        .then_ignore(just(TokenKind::RBrace))
        .map_with_span(|fields, span: Range<usize>| {
            TypeExpr::new(TypeKind::Struct { fields }, range_to_span(span))
        });

    let chan = choice((
        just(TokenKind::Arrow)
            .ignore_then(just(TokenKind::KeywordChan))
            .to(ChanDirection::Recv),
        just(TokenKind::KeywordChan)
            .ignore_then(just(TokenKind::Arrow))
            .to(ChanDirection::Send),
        just(TokenKind::KeywordChan).to(ChanDirection::Both),
    ))
    .then(type_expr.clone())
    .map_with_span(|(direction, element), span: Range<usize>| {
        TypeExpr::new(
            TypeKind::Chan {
                direction,
                element: Box::new(element),
            },
            range_to_span(span),
        )
    });

    let paren = type_expr
        .clone()
        .delimited_by(just(TokenKind::LParen), just(TokenKind::RParen));

    type_expr.define(
        choice((
            type_name.clone(),
            pointer,
            array,
            map,
            func_type,
            interface,
            struct_type,
            chan,
            paren,
        ))
        .boxed(),
    );

    let param_type = choice((
        just(TokenKind::Ellipsis)
            .ignore_then(type_expr.clone())
            .map_with_span(|element, span: Range<usize>| {
                TypeExpr::new(
                    TypeKind::Ellipsis {
                        element: Box::new(element),
                    },
                    range_to_span(span),
                )
            }),
        type_expr.clone(),
    ));
    let param_entry = param_type
        .clone()
        .then(param_type.or_not())
        .map_with_span(|(first, second), span: Range<usize>| ParamEntry {
            first,
            second,
            span: range_to_span(span),
        });
    let param_list = param_entry
        .separated_by(just(TokenKind::Comma))
        .allow_trailing()
        .delimited_by(just(TokenKind::LParen), just(TokenKind::RParen))
        .try_map(|entries, span: Range<usize>| {
            group_params(entries).map_err(|message| Simple::custom(span, message))
        });
    let results = choice((
        param_list.clone(),
        type_expr.clone().map(|ty| {
            let span = ty.span;
            vec![Field {
                names: Vec::new(),
                ty,
                tag: None,
                span,
            }]
        }),
    ))
    .or_not()
    .map(Option::unwrap_or_default);

    signature.define(param_list.then(results).map_with_span(
        |(params, results), span: Range<usize>| Signature {
            params,
            results,
            span: range_to_span(span),
        },
    ));

    // `(l *List[T])` の型引数。
    let receiver_type_args = ident
        .clone()
        .separated_by(just(TokenKind::Comma))
        .allow_trailing()
        .at_least(1)
        .delimited_by(just(TokenKind::LBracket), just(TokenKind::RBracket))
        .or_not()
        .map(Option::unwrap_or_default);
    let receiver = choice((
        ident
            .clone()
            .then(type_expr.clone())
            .then(receiver_type_args.clone())
            .map(|((name, ty), type_args)| Receiver {
                name: Some(name),
                ty,
                type_args,
            }),
        type_expr
            .clone()
            .then(receiver_type_args)
            .map(|(ty, type_args)| Receiver {
                name: None,
                ty,
                type_args,
            }),
    ))
    .delimited_by(just(TokenKind::LParen), just(TokenKind::RParen));

    let func_decl = just(TokenKind::KeywordFunc)
        .ignore_then(receiver.or_not())
        .then(ident.clone())
        .then(signature.clone())
        .then(block.or_not())
        .then_ignore(semi.clone())
        .map_with_span(
            |(((receiver, name), signature), body), span: Range<usize>| {
                Decl::Func(FuncDecl {
                    name,
                    receiver,
                    signature,
                    has_body: body.is_some(),
                    span: range_to_span(span),
                })
            },
        );

    let type_spec = ident
        .clone()
        .then(just(TokenKind::Assign).or_not())
        .then(type_expr.clone())
        .map_with_span(|((name, assign), ty), span: Range<usize>| TypeSpec {
            name,
            alias: assign.is_some(),
            ty,
            span: range_to_span(span),
        });
    let type_decl = just(TokenKind::KeywordType)
        .ignore_then(choice((
            semis
                .clone()
                .ignore_then(type_spec.clone().then_ignore(semis.clone()).repeated())
                .delimited_by(just(TokenKind::LParen), just(TokenKind::RParen)),
            type_spec.map(|spec| vec![spec]),
        )))
        .then_ignore(semi.clone())
        .map_with_span(|specs, span: Range<usize>| {
            Decl::Type(TypeDecl {
                specs,
                span: range_to_span(span),
            })
        });

    let value_decl = choice((
        just(TokenKind::KeywordVar).to(ValueKeyword::Var),
        just(TokenKind::KeywordConst).to(ValueKeyword::Const),
    ))
    .then_ignore(token_tree.repeated())
    .then_ignore(semi.clone())
    .map_with_span(|keyword, span: Range<usize>| Decl::Value {
        keyword,
        span: range_to_span(span),
    });

    let import_alias = choice((
        ident.clone(),
        just(TokenKind::Dot).map_with_span(|_, span: Range<usize>| Ident {
            name: ".".to_string(),
            span: range_to_span(span),
        }),
    ));
    let import_spec = import_alias
        .or_not()
        .then(string_lit)
        .map_with_span(|(alias, path), span: Range<usize>| ImportSpec {
            alias,
            path,
            span: range_to_span(span),
        });
    let import_decl = just(TokenKind::KeywordImport)
        .ignore_then(choice((
            semis
                .clone()
                .ignore_then(import_spec.clone().then_ignore(semis.clone()).repeated())
                .delimited_by(just(TokenKind::LParen), just(TokenKind::RParen)),
            import_spec.map(|spec| vec![spec]),
        )))
        .then_ignore(semi.clone());

    let package = just(TokenKind::KeywordPackage)
        .ignore_then(ident)
        .then_ignore(semi);

    package
        .then(
            import_decl
                .repeated()
                .map(|groups| groups.into_iter().flatten().collect::<Vec<_>>()),
        )
        .then(choice((func_decl, type_decl, value_decl)).repeated())
        .then_ignore(end())
        .map(|((package, imports), decls)| SourceFile {
            package,
            imports,
            decls,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> TypeExpr {
        TypeExpr::new(
            TypeKind::Named {
                name: Ident {
                    name: name.to_string(),
                    span: Span::default(),
                },
            },
            Span::default(),
        )
    }

    fn entry(first: &str, second: Option<&str>) -> ParamEntry {
        ParamEntry {
            first: named(first),
            second: second.map(named),
            span: Span::default(),
        }
    }

    #[test]
    fn grouped_names_share_the_following_type() {
        let fields = group_params(vec![
            entry("a", None),
            entry("b", Some("int")),
            entry("s", Some("string")),
        ])
        .expect("grouping should succeed");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].render(), "a, b int");
        assert_eq!(fields[1].render(), "s string");
    }

    #[test]
    fn unnamed_entries_stay_types() {
        let fields = group_params(vec![entry("int", None), entry("error", None)])
            .expect("grouping should succeed");
        assert!(fields.iter().all(Field::is_embedded));
    }

    #[test]
    fn trailing_unnamed_entry_after_named_is_rejected() {
        let result = group_params(vec![entry("a", Some("int")), entry("b", None)]);
        assert!(result.is_err());
    }
}
