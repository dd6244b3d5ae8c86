//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions.
//!
//! ```ignore
//! use metagen::prelude::*;
//! ```

// Schema types
pub use metagen_schema::{
    Enumeration, MetaModel, NamedType, ParseError, SchemaError, Structure, Type, TypeAlias,
    TypeIndex, TypeKind, load_meta_model, parse_meta_model,
};

// Codegen types
pub use metagen_codegen::{
    CodegenError, Decl, Generator, GeneratorConfig, TargetType, generate_from_file,
    generate_from_json,
};
