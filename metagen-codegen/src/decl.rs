//! Target-language declaration model.
//!
//! Mapped schema types are collected as [`Decl`] values before rendering.
//! Keeping them as data lets the generator order them, detect recursion and
//! compare synthesized shapes without touching token streams.

use crate::naming::field_name;
use metagen_schema::Annotations;
use std::collections::HashSet;
use std::fmt;

/// Primitive target types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// `bool`.
    Bool,
    /// `i32`.
    I32,
    /// `u32`.
    U32,
    /// `f64`.
    F64,
    /// `String`.
    String,
    /// `()`.
    Unit,
}

impl Primitive {
    /// Returns the Rust spelling of this primitive.
    #[must_use]
    pub const fn rust_type(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I32 => "i32",
            Self::U32 => "u32",
            Self::F64 => "f64",
            Self::String => "String",
            Self::Unit => "()",
        }
    }
}

/// A literal value a constrained type is limited to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LiteralValue {
    /// String literal.
    String(String),
    /// Integer literal.
    Integer(i64),
    /// Boolean literal.
    Boolean(bool),
}

impl LiteralValue {
    /// Returns the primitive that carries this literal.
    #[must_use]
    pub const fn primitive(&self) -> Primitive {
        match self {
            Self::String(_) => Primitive::String,
            Self::Integer(_) => Primitive::I32,
            Self::Boolean(_) => Primitive::Bool,
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s:?}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

/// A target type expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetType {
    /// Primitive type.
    Primitive(Primitive),
    /// Named declaration.
    Symbol(String),
    /// Sequence.
    Vec(Box<TargetType>),
    /// Key/value map.
    Map(Box<TargetType>, Box<TargetType>),
    /// Fixed-size tuple.
    Tuple(Vec<TargetType>),
    /// Optional or nullable value.
    Option(Box<TargetType>),
    /// Heap indirection for recursive types.
    Boxed(Box<TargetType>),
    /// Primitive restricted to a set of literal values.
    Constrained {
        /// Carrier primitive.
        base: Primitive,
        /// Permitted values.
        values: Vec<LiteralValue>,
    },
}

impl TargetType {
    /// Creates a symbol reference.
    #[must_use]
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    /// Wraps this type in `Option` unless it already is one.
    #[must_use]
    pub fn optional(self) -> Self {
        match self {
            Self::Option(_) => self,
            other => Self::Option(Box::new(other)),
        }
    }

    /// Returns true for `Option` types.
    #[must_use]
    pub const fn is_option(&self) -> bool {
        matches!(self, Self::Option(_))
    }

    /// Returns the referenced declaration name, looking through `Box`.
    #[must_use]
    pub fn symbol_name(&self) -> Option<&str> {
        match self {
            Self::Symbol(name) => Some(name),
            Self::Boxed(inner) => inner.symbol_name(),
            _ => None,
        }
    }

    /// Returns the literal constraint, looking through `Option`.
    #[must_use]
    pub fn constraint(&self) -> Option<&[LiteralValue]> {
        match self {
            Self::Constrained { values, .. } => Some(values),
            Self::Option(inner) => inner.constraint(),
            _ => None,
        }
    }
}

/// Documentation attached to a declaration, field or constant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Docs {
    /// Documentation text.
    pub text: Option<String>,
    /// Version that introduced the element.
    pub since: Option<String>,
    /// Proposed feature marker.
    pub proposed: bool,
    /// Deprecation message.
    pub deprecated: Option<String>,
}

impl Docs {
    /// Builds docs from schema annotations.
    ///
    /// With `emit_docs` false only the deprecation marker is kept.
    #[must_use]
    pub fn from_annotations(annotations: &Annotations, emit_docs: bool) -> Self {
        if !emit_docs {
            return Self {
                deprecated: annotations.deprecated.clone(),
                ..Self::default()
            };
        }
        Self {
            text: annotations.documentation.clone(),
            since: annotations.since.clone(),
            proposed: annotations.proposed,
            deprecated: annotations.deprecated.clone(),
        }
    }

    /// Returns the doc comment lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .text
            .as_deref()
            .map(|t| t.lines().map(str::to_string).collect())
            .unwrap_or_default();

        let mentions_since = lines.iter().any(|l| l.contains("@since"));
        if let Some(since) = self.since.as_deref().filter(|_| !mentions_since) {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push(format!("@since {since}"));
        }
        if self.proposed && !lines.iter().any(|l| l.contains("@proposed")) {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push("@proposed".to_string());
        }
        lines
    }
}

/// A record field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDecl {
    /// Rust field name.
    pub ident: String,
    /// JSON property name.
    pub wire_name: String,
    /// Field type, already wrapped in `Option` when optional or nullable.
    pub ty: TargetType,
    /// Whether the property may be absent.
    pub optional: bool,
    /// Field docs.
    pub docs: Docs,
}

/// A flattened base of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BaseDecl {
    /// Rust field name holding the base.
    pub ident: String,
    /// Base type.
    pub ty: TargetType,
}

impl BaseDecl {
    /// Creates a base named after its type, or `base` for unnamed types.
    #[must_use]
    pub fn new(ty: TargetType) -> Self {
        Self {
            ident: field_name(ty.symbol_name().unwrap_or("base")),
            ty,
        }
    }
}

/// A union variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariantDecl {
    /// Variant name.
    pub ident: String,
    /// Payload type; `None` for the `null` variant.
    pub ty: Option<TargetType>,
}

/// Shape of a type declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSpec {
    /// Struct with flattened bases followed by fields.
    Record {
        /// Flattened bases.
        bases: Vec<BaseDecl>,
        /// Fields in declaration order.
        fields: Vec<FieldDecl>,
    },
    /// Untagged union.
    Union {
        /// Variants in declaration order.
        variants: Vec<VariantDecl>,
    },
    /// Type alias.
    Alias(TargetType),
    /// Transparent newtype used for enumerations.
    Newtype(Primitive),
}

/// Renames record members whose Rust name repeats an earlier one.
///
/// Bases come first, then fields. Later occurrences get a `_2`, `_3` suffix;
/// wire names are kept. Returns the number of renamed members.
pub fn disambiguate_members(
    owner: &str,
    bases: &mut [BaseDecl],
    fields: &mut [FieldDecl],
) -> usize {
    let mut seen = HashSet::with_capacity(bases.len() + fields.len());
    let bases = bases.iter_mut().map(|b| (&mut b.ident, None));
    let fields = fields
        .iter_mut()
        .map(|f| (&mut f.ident, Some(f.wire_name.as_str())));

    let mut renamed = 0;
    for (ident, wire_name) in bases.chain(fields) {
        if seen.insert(ident.clone()) {
            continue;
        }
        let mut n = 2;
        while seen.contains(&format!("{ident}_{n}")) {
            n += 1;
        }
        let unique = format!("{ident}_{n}");
        tracing::warn!(
            declaration = owner,
            member = %ident,
            wire_name = wire_name.unwrap_or(""),
            renamed = %unique,
            "duplicate member name"
        );
        seen.insert(unique.clone());
        *ident = unique;
        renamed += 1;
    }
    renamed
}

/// A named type declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDecl {
    /// Type name.
    pub ident: String,
    /// Docs.
    pub docs: Docs,
    /// Shape.
    pub spec: TypeSpec,
}

/// Value of a constant.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    /// Signed integer.
    Int(i32),
    /// Unsigned integer.
    UInt(u32),
    /// Floating point number.
    Float(f64),
    /// String.
    Str(String),
}

/// A constant belonging to an enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstDecl {
    /// Constant name.
    pub ident: String,
    /// Value.
    pub value: ConstValue,
    /// Docs.
    pub docs: Docs,
}

/// The constants of one enumeration, in entry order.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstBlock {
    /// Enumeration type the constants belong to.
    pub owner: String,
    /// Constants in entry order.
    pub consts: Vec<ConstDecl>,
}

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    /// Type declaration.
    Type(TypeDecl),
    /// Constant block.
    Consts(ConstBlock),
}

impl Decl {
    /// Returns the sort key identifier.
    #[must_use]
    pub fn ident(&self) -> &str {
        match self {
            Self::Type(t) => &t.ident,
            Self::Consts(c) => &c.owner,
        }
    }

    /// Types sort before constant blocks with the same identifier.
    const fn rank(&self) -> u8 {
        match self {
            Self::Type(_) => 0,
            Self::Consts(_) => 1,
        }
    }
}

/// Collects declarations and emits them in a stable order.
#[derive(Debug, Clone, Default)]
pub struct DeclSet {
    decls: Vec<Decl>,
}

impl DeclSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a type declaration.
    pub fn push_type(&mut self, decl: TypeDecl) {
        self.decls.push(Decl::Type(decl));
    }

    /// Adds a constant block.
    pub fn push_consts(&mut self, block: ConstBlock) {
        self.decls.push(Decl::Consts(block));
    }

    /// Returns the number of collected declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    /// Returns true if nothing was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Returns the declarations sorted lexicographically by identifier.
    ///
    /// The sort is stable, so output does not depend on schema order as long
    /// as identifiers are unique.
    #[must_use]
    pub fn into_sorted(self) -> Vec<Decl> {
        let mut decls = self.decls;
        decls.sort_by(|a, b| a.ident().cmp(b.ident()).then(a.rank().cmp(&b.rank())));
        decls
    }
}

impl Extend<TypeDecl> for DeclSet {
    fn extend<I: IntoIterator<Item = TypeDecl>>(&mut self, iter: I) {
        self.decls.extend(iter.into_iter().map(Decl::Type));
    }
}
