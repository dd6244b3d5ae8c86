//! # metagen
//!
//! Generate serde-ready Rust types from LSP meta models.
//!
//! metagen reads a protocol `metaModel.json` (structures, enumerations, type
//! aliases, requests and notifications) and emits equivalent Rust declarations.
//!
//! ## Features
//!
//! - **Faithful decoding** - Every type-expression kind of the meta model, with
//!   JSON-path error reporting
//! - **Inheritance resolution** - `extends` and `mixins` chains, flattened or
//!   rendered as `#[serde(flatten)]` bases
//! - **Serde-ready output** - Wire names, optional fields, untagged unions and
//!   open enumerations
//! - **Deterministic** - Declarations sorted by name, independent of schema order
//!
//! ## Quick Start
//!
//! ```ignore
//! use metagen::prelude::*;
//!
//! let model = load_meta_model(std::path::Path::new("metaModel.json"))?;
//! let code = Generator::with_config(&model, GeneratorConfig::new().emit_docs(false))
//!     .generate()?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`schema`] - Meta-model decoding and the type resolver
//! - [`codegen`] - Type mapping, emitters and rendering
//! - [`cli`] - The `metagen` command-line driver

pub mod cli;
pub mod prelude;

/// Meta-model decoding and type resolution.
pub mod schema {
    pub use metagen_schema::*;
}

/// Rust code generation from meta models.
pub mod codegen {
    pub use metagen_codegen::*;
}
