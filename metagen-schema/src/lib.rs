//! # metagen Schema
//!
//! LSP meta-model decoder and type resolver.
//!
//! This crate provides:
//! - Decoding of `metaModel.json` into a strongly-discriminated model
//! - The polymorphic type-expression tree with two-phase `kind` decoding
//! - A read-only name index over structures, enumerations and aliases
//! - Flattening of structure `extends`/`mixins` chains

pub mod error;
pub mod index;
pub mod messages;
pub mod model;
pub mod parser;
pub mod types;

pub use error::{ParseError, SchemaError};
pub use index::{NamedType, ResolvedProperty, TypeIndex};
pub use messages::{MessageDirection, Notification, Request};
pub use model::{
    Annotations, Enumeration, EnumerationEntry, MetaData, MetaModel, Property, StructLiteral,
    Structure, TypeAlias,
};
pub use parser::{load_meta_model, parse_meta_model, parse_meta_model_slice};
pub use types::{EnumerationValue, OneOrMore, Type, TypeKind};
