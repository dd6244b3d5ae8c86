//! Structure and type alias code generation.

use crate::decl::{BaseDecl, TargetType, TypeDecl, TypeSpec, disambiguate_members};
use crate::error::CodegenError;
use crate::rust::types::TypeMapper;
use metagen_schema::{ResolvedProperty, Structure, TypeAlias, TypeIndex};

/// Generator for structure and alias declarations.
///
/// By default a structure's `extends` entries become flattened base fields
/// and only mixin properties are copied in. With `flatten_bases` every
/// inherited property is copied into the record instead.
pub struct StructEmitter<'a> {
    index: &'a TypeIndex<'a>,
    flatten_bases: bool,
}

impl<'a> StructEmitter<'a> {
    /// Creates a new struct emitter.
    #[must_use]
    pub fn new(index: &'a TypeIndex<'a>, flatten_bases: bool) -> Self {
        Self {
            index,
            flatten_bases,
        }
    }

    /// Emits the record declaration for a structure.
    ///
    /// # Errors
    /// Returns `CodegenError` if the inheritance chain cannot be resolved or a
    /// property type cannot be mapped.
    pub fn emit_structure(
        &self,
        structure: &'a Structure,
        mapper: &mut TypeMapper<'_>,
    ) -> Result<TypeDecl, CodegenError> {
        let flattened = self.index.resolve_extends(structure)?;

        let (mut bases, properties) = if self.flatten_bases {
            (Vec::new(), flattened)
        } else {
            let bases: Vec<BaseDecl> = self
                .index
                .base_names(structure)?
                .into_iter()
                .map(|name| BaseDecl::new(TargetType::symbol(name)))
                .collect();
            let mut properties = self.index.resolve_mixins(structure)?;
            properties.extend(ResolvedProperty::own(structure));
            (bases, properties)
        };

        let mut fields = properties
            .iter()
            .map(|p| mapper.field(p.owner, p.property, &structure.name))
            .collect::<Result<Vec<_>, _>>()?;
        disambiguate_members(&structure.name, &mut bases, &mut fields);

        tracing::trace!(
            structure = %structure.name,
            bases = bases.len(),
            fields = fields.len(),
            "emitted structure"
        );

        Ok(TypeDecl {
            ident: structure.name.clone(),
            docs: mapper.docs(&structure.annotations),
            spec: TypeSpec::Record { bases, fields },
        })
    }

    /// Emits the declaration for a type alias.
    ///
    /// # Errors
    /// Returns `CodegenError` if the aliased type cannot be mapped.
    pub fn emit_alias(
        &self,
        alias: &TypeAlias,
        mapper: &mut TypeMapper<'_>,
    ) -> Result<TypeDecl, CodegenError> {
        let docs = mapper.docs(&alias.annotations);
        mapper.declare(&alias.name, &alias.type_, docs)
    }
}
