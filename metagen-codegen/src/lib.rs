//! # metagen Codegen
//!
//! Rust type generation from LSP meta models.
//!
//! This crate provides:
//! - Mapping of schema type expressions to Rust types
//! - Enumeration newtypes and constants
//! - Structure, union and alias declarations with serde attributes
//! - Boxing of recursive types
//! - Rendering to formatted Rust source

pub mod decl;
pub mod error;
pub mod generator;
pub mod naming;
pub mod recursion;
pub mod rust;

pub use decl::{Decl, DeclSet, Primitive, TargetType, TypeDecl, TypeSpec};
pub use error::CodegenError;
pub use generator::{Generator, GeneratorConfig};

/// Generates Rust code from a meta-model JSON string.
///
/// # Arguments
/// * `json` - `metaModel.json` content
///
/// # Returns
/// Generated Rust code as a string.
///
/// # Errors
/// Returns `CodegenError` if parsing or generation fails.
pub fn generate_from_json(json: &str) -> Result<String, CodegenError> {
    generate_from_json_with_config(json, GeneratorConfig::default())
}

/// Generates Rust code from a meta-model JSON string with the given options.
///
/// # Errors
/// Returns `CodegenError` if parsing or generation fails.
pub fn generate_from_json_with_config(
    json: &str,
    config: GeneratorConfig,
) -> Result<String, CodegenError> {
    let model = metagen_schema::parse_meta_model(json)?;
    Generator::with_config(&model, config).generate()
}

/// Generates Rust code from a meta-model file.
///
/// # Arguments
/// * `path` - Path to the `metaModel.json` file
///
/// # Returns
/// Generated Rust code as a string.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, or generation fails.
pub fn generate_from_file(path: &std::path::Path) -> Result<String, CodegenError> {
    generate_from_file_with_config(path, GeneratorConfig::default())
}

/// Generates Rust code from a meta-model file with the given options.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, or generation fails.
pub fn generate_from_file_with_config(
    path: &std::path::Path,
    config: GeneratorConfig,
) -> Result<String, CodegenError> {
    let model = metagen_schema::load_meta_model(path)?;
    Generator::with_config(&model, config).generate()
}
