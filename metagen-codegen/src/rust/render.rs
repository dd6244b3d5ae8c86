//! Rendering of declarations to Rust source.
//!
//! Declarations are turned into a token stream with `quote`, validated by
//! parsing it as a complete file with `syn`, and formatted with
//! `prettyplease`.

use crate::decl::{
    BaseDecl, ConstBlock, ConstValue, Decl, Docs, FieldDecl, Primitive, TargetType, TypeDecl,
    TypeSpec, VariantDecl,
};
use crate::error::CodegenError;
use crate::naming::{is_keyword, is_non_raw_keyword, sanitize_ident};
use proc_macro2::{Ident, Literal, Span, TokenStream};
use quote::{format_ident, quote};

/// Renders declarations into a formatted Rust file.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    version: String,
    header: Option<String>,
}

impl Renderer {
    /// Creates a renderer for a meta model of the given version.
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            header: None,
        }
    }

    /// Sets extra text placed in the file header comment.
    #[must_use]
    pub fn with_header(mut self, header: Option<String>) -> Self {
        self.header = header;
        self
    }

    /// Renders declarations in the given order.
    ///
    /// # Errors
    /// Returns `CodegenError::Render` if a value cannot be expressed or the
    /// produced tokens are not a valid Rust file.
    pub fn render(&self, decls: &[Decl]) -> Result<String, CodegenError> {
        let items: Vec<TokenStream> = decls.iter().map(render_decl).collect::<Result<_, _>>()?;

        let tokens = quote! {
            #![allow(
                non_camel_case_types,
                non_snake_case,
                non_upper_case_globals,
                deprecated,
                clippy::all
            )]

            use serde::{Deserialize, Serialize};

            #(#items)*
        };

        let file: syn::File = syn::parse2(tokens)
            .map_err(|e| CodegenError::render(format!("generated code is invalid: {e}")))?;
        let code = prettyplease::unparse(&file);
        Ok(format!("{}\n{code}", self.header_comment()))
    }

    fn header_comment(&self) -> String {
        let version = if self.version.is_empty() {
            "unknown"
        } else {
            self.version.as_str()
        };
        let mut out = format!(
            "// This code was automatically generated by metagen from LSP meta model version {version}.\n// Do not edit manually.\n"
        );
        if let Some(header) = &self.header {
            for line in header.lines() {
                if line.is_empty() {
                    out.push_str("//\n");
                } else {
                    out.push_str("// ");
                    out.push_str(line);
                    out.push('\n');
                }
            }
        }
        out
    }
}

/// Creates an identifier, escaping keywords.
pub fn ident(name: &str) -> Ident {
    let clean = sanitize_ident(name);
    if is_non_raw_keyword(&clean) {
        format_ident!("{}_", clean)
    } else if is_keyword(&clean) {
        Ident::new_raw(&clean, Span::call_site())
    } else {
        Ident::new(&clean, Span::call_site())
    }
}

fn render_decl(decl: &Decl) -> Result<TokenStream, CodegenError> {
    match decl {
        Decl::Type(t) => Ok(render_type_decl(t)),
        Decl::Consts(block) => render_consts(block),
    }
}

fn render_type_decl(decl: &TypeDecl) -> TokenStream {
    let name = ident(&decl.ident);
    let attrs = doc_attrs(&decl.docs);

    match &decl.spec {
        TypeSpec::Record { bases, fields } => {
            let bases = bases.iter().map(render_base);
            let fields = fields.iter().map(render_field);
            quote! {
                #attrs
                #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
                pub struct #name {
                    #(#bases)*
                    #(#fields)*
                }
            }
        }
        TypeSpec::Union { variants } => {
            let variants = variants.iter().map(render_variant);
            quote! {
                #attrs
                #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
                #[serde(untagged)]
                pub enum #name {
                    #(#variants)*
                }
            }
        }
        TypeSpec::Alias(ty) => {
            let ty = type_tokens(ty);
            quote! {
                #attrs
                pub type #name = #ty;
            }
        }
        TypeSpec::Newtype(primitive) => {
            let inner = newtype_inner(*primitive);
            quote! {
                #attrs
                #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
                #[serde(transparent)]
                pub struct #name(pub #inner);
            }
        }
    }
}

fn render_base(base: &BaseDecl) -> TokenStream {
    let field = ident(&base.ident);
    let ty = type_tokens(&base.ty);
    quote! {
        #[serde(flatten)]
        pub #field: #ty,
    }
}

fn render_field(field: &FieldDecl) -> TokenStream {
    let mut docs = field.docs.clone();
    if let Some(values) = field.ty.constraint() {
        let values: Vec<String> = values.iter().map(|v| format!("`{v}`")).collect();
        let note = match values.as_slice() {
            [one] => format!("Always {one}."),
            many => format!("One of {}.", many.join(", ")),
        };
        docs.text = Some(match docs.text.take() {
            Some(text) => format!("{text}\n\n{note}"),
            None => note,
        });
    }

    let attrs = doc_attrs(&docs);
    let name = ident(&field.ident);
    let wire = &field.wire_name;
    let ty = type_tokens(&field.ty);
    let skip = (field.optional && field.ty.is_option()).then(|| {
        quote! { #[serde(default, skip_serializing_if = "Option::is_none")] }
    });

    quote! {
        #attrs
        #[serde(rename = #wire)]
        #skip
        pub #name: #ty,
    }
}

fn render_variant(variant: &VariantDecl) -> TokenStream {
    let name = ident(&variant.ident);
    match &variant.ty {
        Some(ty) => {
            let ty = type_tokens(ty);
            quote! { #name(#ty), }
        }
        None => quote! { #name, },
    }
}

fn render_consts(block: &ConstBlock) -> Result<TokenStream, CodegenError> {
    let owner = ident(&block.owner);
    let consts = block
        .consts
        .iter()
        .map(|c| {
            let name = ident(&c.ident);
            let attrs = doc_attrs(&c.docs);
            let value = const_value(&c.value, &c.ident)?;
            Ok(quote! {
                #attrs
                pub const #name: #owner = #owner(#value);
            })
        })
        .collect::<Result<Vec<_>, CodegenError>>()?;

    Ok(quote! { #(#consts)* })
}

fn const_value(value: &ConstValue, name: &str) -> Result<TokenStream, CodegenError> {
    Ok(match value {
        ConstValue::Int(v) => {
            let abs = Literal::u32_unsuffixed(v.unsigned_abs());
            if *v < 0 { quote!(-#abs) } else { quote!(#abs) }
        }
        ConstValue::UInt(v) => {
            let lit = Literal::u32_unsuffixed(*v);
            quote!(#lit)
        }
        ConstValue::Float(v) => {
            if !v.is_finite() {
                return Err(CodegenError::render(format!(
                    "constant '{name}' has a non-finite value"
                )));
            }
            let abs = Literal::f64_unsuffixed(v.abs());
            if v.is_sign_negative() && *v != 0.0 {
                quote!(-#abs)
            } else {
                quote!(#abs)
            }
        }
        ConstValue::Str(s) => {
            let lit = Literal::string(s);
            quote!(::std::borrow::Cow::Borrowed(#lit))
        }
    })
}

fn doc_attrs(docs: &Docs) -> TokenStream {
    let lines = docs.lines().into_iter().map(|line| {
        if line.is_empty() {
            line
        } else {
            format!(" {line}")
        }
    });
    let deprecated = docs.deprecated.as_ref().map(|note| {
        quote! { #[deprecated(note = #note)] }
    });
    quote! {
        #(#[doc = #lines])*
        #deprecated
    }
}

fn newtype_inner(primitive: Primitive) -> TokenStream {
    match primitive {
        Primitive::String => quote!(::std::borrow::Cow<'static, str>),
        other => primitive_tokens(other),
    }
}

fn primitive_tokens(primitive: Primitive) -> TokenStream {
    match primitive {
        Primitive::Bool => quote!(bool),
        Primitive::I32 => quote!(i32),
        Primitive::U32 => quote!(u32),
        Primitive::F64 => quote!(f64),
        Primitive::String => quote!(String),
        Primitive::Unit => quote!(()),
    }
}

/// Returns the tokens spelling a target type.
pub fn type_tokens(ty: &TargetType) -> TokenStream {
    match ty {
        TargetType::Primitive(p) => primitive_tokens(*p),
        TargetType::Constrained { base, .. } => primitive_tokens(*base),
        TargetType::Symbol(name) => {
            let name = ident(name);
            quote!(#name)
        }
        TargetType::Vec(inner) => {
            let inner = type_tokens(inner);
            quote!(Vec<#inner>)
        }
        TargetType::Map(key, value) => {
            let key = type_tokens(key);
            let value = type_tokens(value);
            quote!(::std::collections::HashMap<#key, #value>)
        }
        TargetType::Tuple(items) => {
            let items = items.iter().map(type_tokens);
            quote!((#(#items,)*))
        }
        TargetType::Option(inner) => {
            let inner = type_tokens(inner);
            quote!(Option<#inner>)
        }
        TargetType::Boxed(inner) => {
            let inner = type_tokens(inner);
            quote!(Box<#inner>)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::{ConstDecl, LiteralValue};
    use crate::naming::field_name;

    fn render(decls: Vec<Decl>) -> String {
        Renderer::new("3.17.0")
            .render(&decls)
            .expect("Failed to render")
    }

    fn record(ident: &str, bases: Vec<BaseDecl>, fields: Vec<FieldDecl>) -> Decl {
        Decl::Type(TypeDecl {
            ident: ident.to_string(),
            docs: Docs::default(),
            spec: TypeSpec::Record { bases, fields },
        })
    }

    fn field(wire: &str, ty: TargetType, optional: bool) -> FieldDecl {
        FieldDecl {
            ident: field_name(wire),
            wire_name: wire.to_string(),
            ty,
            optional,
            docs: Docs::default(),
        }
    }

    #[test]
    fn test_ident_escapes_keywords() {
        assert_eq!(ident("type").to_string(), "r#type");
        assert_eq!(ident("self").to_string(), "self_");
        assert_eq!(ident("kind").to_string(), "kind");
        assert_eq!(ident("a.b").to_string(), "a_b");
    }

    #[test]
    fn test_header_names_version() {
        let code = Renderer::new("3.17.0")
            .with_header(Some("Custom line".to_string()))
            .render(&[])
            .expect("Failed to render");
        assert!(code.starts_with("// This code was automatically generated by metagen"));
        assert!(code.contains("version 3.17.0"));
        assert!(code.contains("// Custom line"));
        assert!(code.contains("#![allow("));
    }

    #[test]
    fn test_render_record_with_base_and_optional_field() {
        let code = render(vec![record(
            "VersionedTextDocumentIdentifier",
            vec![BaseDecl::new(TargetType::symbol("TextDocumentIdentifier"))],
            vec![
                field("version", TargetType::Primitive(Primitive::I32), false),
                field(
                    "workDoneToken",
                    TargetType::Primitive(Primitive::String).optional(),
                    true,
                ),
            ],
        )]);

        assert!(code.contains("pub struct VersionedTextDocumentIdentifier"));
        assert!(code.contains("#[serde(flatten)]"));
        assert!(code.contains("pub text_document_identifier: TextDocumentIdentifier"));
        assert!(code.contains("#[serde(rename = \"workDoneToken\")]"));
        assert!(code.contains("skip_serializing_if = \"Option::is_none\""));
        assert!(code.contains("pub work_done_token: Option<String>"));
        assert!(code.contains("pub version: i32"));
    }

    #[test]
    fn test_nullable_required_field_is_serialized() {
        let code = render(vec![record(
            "Params",
            Vec::new(),
            vec![field(
                "rootUri",
                TargetType::Primitive(Primitive::String).optional(),
                false,
            )],
        )]);

        assert!(code.contains("pub root_uri: Option<String>"));
        assert!(!code.contains("skip_serializing_if"));
    }

    #[test]
    fn test_render_union_and_alias() {
        let code = render(vec![
            Decl::Type(TypeDecl {
                ident: "Definition".to_string(),
                docs: Docs {
                    text: Some("The definition of a symbol.".to_string()),
                    ..Docs::default()
                },
                spec: TypeSpec::Union {
                    variants: vec![
                        VariantDecl {
                            ident: "Location".to_string(),
                            ty: Some(TargetType::symbol("Location")),
                        },
                        VariantDecl {
                            ident: "LocationList".to_string(),
                            ty: Some(TargetType::Vec(Box::new(TargetType::symbol("Location")))),
                        },
                        VariantDecl {
                            ident: "Null".to_string(),
                            ty: None,
                        },
                    ],
                },
            }),
            Decl::Type(TypeDecl {
                ident: "LSPObject".to_string(),
                docs: Docs::default(),
                spec: TypeSpec::Alias(TargetType::Map(
                    Box::new(TargetType::Primitive(Primitive::String)),
                    Box::new(TargetType::symbol("LSPAny")),
                )),
            }),
        ]);

        assert!(code.contains("/// The definition of a symbol."));
        assert!(code.contains("#[serde(untagged)]"));
        assert!(code.contains("pub enum Definition"));
        assert!(code.contains("LocationList(Vec<Location>)"));
        assert!(code.contains("Null,"));
        assert!(code.contains("pub type LSPObject = ::std::collections::HashMap<String, LSPAny>;"));
    }

    #[test]
    fn test_render_enumeration() {
        let code = render(vec![
            Decl::Type(TypeDecl {
                ident: "MarkupKind".to_string(),
                docs: Docs::default(),
                spec: TypeSpec::Newtype(Primitive::String),
            }),
            Decl::Consts(ConstBlock {
                owner: "MarkupKind".to_string(),
                consts: vec![ConstDecl {
                    ident: "MarkupKindPlainText".to_string(),
                    value: ConstValue::Str("plaintext".to_string()),
                    docs: Docs::default(),
                }],
            }),
            Decl::Type(TypeDecl {
                ident: "Offset".to_string(),
                docs: Docs::default(),
                spec: TypeSpec::Newtype(Primitive::I32),
            }),
            Decl::Consts(ConstBlock {
                owner: "Offset".to_string(),
                consts: vec![ConstDecl {
                    ident: "OffsetBefore".to_string(),
                    value: ConstValue::Int(-1),
                    docs: Docs::default(),
                }],
            }),
        ]);

        assert!(code.contains("#[serde(transparent)]"));
        assert!(code.contains("pub struct MarkupKind(pub ::std::borrow::Cow<'static, str>);"));
        assert!(code.contains("pub const MarkupKindPlainText: MarkupKind = MarkupKind("));
        assert!(code.contains("::std::borrow::Cow::Borrowed(\"plaintext\")"));
        assert!(code.contains("pub const OffsetBefore: Offset = Offset(-1);"));
    }

    #[test]
    fn test_constrained_field_documents_values() {
        let code = render(vec![record(
            "CreateFile",
            Vec::new(),
            vec![field(
                "kind",
                TargetType::Constrained {
                    base: Primitive::String,
                    values: vec![LiteralValue::String("create".to_string())],
                },
                false,
            )],
        )]);

        assert!(code.contains("/// Always `\"create\"`."));
        assert!(code.contains("pub kind: String"));
    }

    #[test]
    fn test_deprecated_and_keyword_field() {
        let mut deprecated = field("type", TargetType::Primitive(Primitive::Bool), false);
        deprecated.docs.deprecated = Some("Use kind instead.".to_string());
        let code = render(vec![record("Item", Vec::new(), vec![deprecated])]);

        assert!(code.contains("#[deprecated(note = \"Use kind instead.\")]"));
        assert!(code.contains("pub r#type: bool"));
    }

    #[test]
    fn test_tuple_and_boxed_types() {
        let ty = TargetType::Tuple(vec![
            TargetType::Primitive(Primitive::U32),
            TargetType::Boxed(Box::new(TargetType::symbol("Node"))),
        ]);
        let file: syn::Type = syn::parse2(type_tokens(&ty)).expect("valid type");
        let rendered = quote!(#file).to_string();
        assert!(rendered.contains("u32"));
        assert!(rendered.contains("Box < Node >"));
    }

    #[test]
    fn test_non_finite_constant_rejected() {
        let err = const_value(&ConstValue::Float(f64::NAN), "Bad").unwrap_err();
        assert!(matches!(err, CodegenError::Render { .. }));
    }
}
