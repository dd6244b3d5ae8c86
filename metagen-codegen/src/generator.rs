//! Generation pipeline.

use crate::decl::{Decl, DeclSet};
use crate::error::CodegenError;
use crate::recursion::box_recursive_fields;
use crate::rust::{EnumEmitter, Renderer, StructEmitter, TypeMapper};
use metagen_schema::{MetaModel, NamedType, TypeIndex};

/// Generation options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Copy inherited properties into each record instead of flattening bases.
    pub flatten_bases: bool,
    /// Emit documentation comments.
    pub emit_docs: bool,
    /// Extra text for the generated file header.
    pub header: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            flatten_bases: false,
            emit_docs: true,
            header: None,
        }
    }
}

impl GeneratorConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether inherited properties are copied into each record.
    #[must_use]
    pub fn flatten_bases(mut self, flatten: bool) -> Self {
        self.flatten_bases = flatten;
        self
    }

    /// Sets whether documentation comments are emitted.
    #[must_use]
    pub fn emit_docs(mut self, emit: bool) -> Self {
        self.emit_docs = emit;
        self
    }

    /// Sets extra header text.
    #[must_use]
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }
}

/// Main code generator.
pub struct Generator<'a> {
    model: &'a MetaModel,
    index: TypeIndex<'a>,
    config: GeneratorConfig,
}

impl<'a> Generator<'a> {
    /// Creates a new generator with the default configuration.
    #[must_use]
    pub fn new(model: &'a MetaModel) -> Self {
        Self::with_config(model, GeneratorConfig::default())
    }

    /// Creates a new generator with the given configuration.
    #[must_use]
    pub fn with_config(model: &'a MetaModel, config: GeneratorConfig) -> Self {
        Self {
            model,
            index: TypeIndex::new(model),
            config,
        }
    }

    /// Returns the name index built for the model.
    #[must_use]
    pub fn index(&self) -> &TypeIndex<'a> {
        &self.index
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Maps every declaration and returns them sorted by identifier.
    ///
    /// # Errors
    /// Returns the first `CodegenError` encountered.
    pub fn declarations(&self) -> Result<Vec<Decl>, CodegenError> {
        let mut set = DeclSet::new();
        let mut mapper = TypeMapper::new(&self.index, self.config.emit_docs);
        let structs = StructEmitter::new(&self.index, self.config.flatten_bases);
        let enums = EnumEmitter::new(self.config.emit_docs);

        for structure in &self.model.structures {
            if self.index.is_primary(NamedType::Structure(structure)) {
                set.push_type(structs.emit_structure(structure, &mut mapper)?);
            }
        }

        for enumeration in &self.model.enumerations {
            if self.index.is_primary(NamedType::Enumeration(enumeration)) {
                let (decl, consts) = enums.emit(enumeration)?;
                set.push_type(decl);
                set.push_consts(consts);
            }
        }

        for alias in &self.model.type_aliases {
            if self.index.is_primary(NamedType::Alias(alias)) {
                set.push_type(structs.emit_alias(alias, &mut mapper)?);
            }
        }

        let synthesized = mapper.into_synthesized();
        let synthesized_count = synthesized.len();
        set.extend(synthesized);

        let mut decls = set.into_sorted();
        let boxed = box_recursive_fields(&mut decls);

        tracing::info!(
            declarations = decls.len(),
            synthesized = synthesized_count,
            boxed,
            "mapped meta model"
        );

        Ok(decls)
    }

    /// Generates the complete Rust source.
    ///
    /// # Errors
    /// Returns `CodegenError` if mapping or rendering fails.
    pub fn generate(&self) -> Result<String, CodegenError> {
        let decls = self.declarations()?;
        Renderer::new(&self.model.meta_data.version)
            .with_header(self.config.header.clone())
            .render(&decls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::TypeSpec;
    use metagen_schema::parse_meta_model;

    const MODEL: &str = r#"{
        "metaData": {"version": "3.17.0"},
        "structures": [
            {
                "name": "Position",
                "properties": [
                    {"name": "line", "type": {"kind": "base", "name": "uinteger"}},
                    {"name": "character", "type": {"kind": "base", "name": "uinteger"}}
                ]
            },
            {
                "name": "Range",
                "properties": [
                    {"name": "start", "type": {"kind": "reference", "name": "Position"}},
                    {"name": "end", "type": {"kind": "reference", "name": "Position"}}
                ]
            }
        ],
        "enumerations": [
            {
                "name": "DiagnosticSeverity",
                "type": {"kind": "base", "name": "uinteger"},
                "values": [{"name": "Error", "value": 1}]
            }
        ]
    }"#;

    fn idents(decls: &[Decl]) -> Vec<&str> {
        decls.iter().map(Decl::ident).collect()
    }

    #[test]
    fn test_config_builder() {
        let config = GeneratorConfig::new()
            .flatten_bases(true)
            .emit_docs(false)
            .header("custom");

        assert!(config.flatten_bases);
        assert!(!config.emit_docs);
        assert_eq!(config.header.as_deref(), Some("custom"));
        assert_eq!(GeneratorConfig::default(), GeneratorConfig::new());
    }

    #[test]
    fn test_declarations_sorted() {
        let model = parse_meta_model(MODEL).expect("Failed to parse");
        let generator = Generator::new(&model);

        let decls = generator.declarations().expect("Failed to generate");
        assert_eq!(
            idents(&decls),
            vec![
                "DiagnosticSeverity",
                "DiagnosticSeverity",
                "Position",
                "Range",
            ]
        );
        assert_eq!(generator.index().len(), 3);
    }

    #[test]
    fn test_empty_model_generates_header_only() {
        let model = parse_meta_model("{}").expect("Failed to parse");
        let decls = Generator::new(&model)
            .declarations()
            .expect("Failed to generate");
        assert!(decls.is_empty());

        let code = Generator::new(&model)
            .generate()
            .expect("Failed to generate");
        assert!(code.contains("version unknown"));
    }

    #[test]
    fn test_shadowed_duplicate_is_skipped() {
        let model = parse_meta_model(
            r#"{
                "structures": [{"name": "Dup", "properties": []}],
                "typeAliases": [{"name": "Dup", "type": {"kind": "base", "name": "string"}}]
            }"#,
        )
        .expect("Failed to parse");

        let decls = Generator::new(&model)
            .declarations()
            .expect("Failed to generate");
        assert_eq!(decls.len(), 1);
        let Decl::Type(decl) = &decls[0] else {
            panic!("expected type declaration");
        };
        assert!(matches!(decl.spec, TypeSpec::Alias(_)));
    }

    #[test]
    fn test_generate_contains_types() {
        let model = parse_meta_model(MODEL).expect("Failed to parse");
        let code = Generator::new(&model)
            .generate()
            .expect("Failed to generate");

        assert!(code.contains("pub struct Position"));
        assert!(code.contains("pub start: Position"));
        assert!(code.contains("pub struct DiagnosticSeverity(pub u32);"));
        assert!(code.contains("pub const DiagnosticSeverityError: DiagnosticSeverity"));
    }

    #[test]
    fn test_first_error_propagates() {
        let model = parse_meta_model(
            r#"{
                "structures": [
                    {"name": "S", "properties": [
                        {"name": "x", "type": {"kind": "reference", "name": "Missing"}}
                    ]}
                ]
            }"#,
        )
        .expect("Failed to parse");

        let err = Generator::new(&model).generate().unwrap_err();
        assert!(err.to_string().contains("Missing"));
    }
}
