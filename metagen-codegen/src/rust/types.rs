//! Type expression mapping.
//!
//! [`TypeMapper`] turns schema type expressions into [`TargetType`]s. Shapes
//! that need a name of their own (unions, intersections, inline literals) are
//! synthesized as auxiliary declarations, named from a hint derived from the
//! enclosing declaration and field.

use crate::decl::{
    BaseDecl, Docs, FieldDecl, LiteralValue, Primitive, TargetType, TypeDecl, TypeSpec,
    VariantDecl, disambiguate_members,
};
use crate::error::CodegenError;
use crate::naming::{field_name, to_pascal_case};
use metagen_schema::{Annotations, Property, StructLiteral, Type, TypeIndex};
use std::collections::{HashMap, HashSet};

/// Maps a base type name to its primitive.
///
/// # Errors
/// Returns `CodegenError::UnsupportedPrimitive` for unknown names.
pub fn primitive_for(name: &str, context: &str) -> Result<Primitive, CodegenError> {
    match name {
        "string" | "URI" | "DocumentUri" | "RegExp" => Ok(Primitive::String),
        "integer" => Ok(Primitive::I32),
        "uinteger" => Ok(Primitive::U32),
        "decimal" | "number" => Ok(Primitive::F64),
        "boolean" => Ok(Primitive::Bool),
        "null" => Ok(Primitive::Unit),
        other => Err(CodegenError::UnsupportedPrimitive {
            name: other.to_string(),
            context: context.to_string(),
        }),
    }
}

/// Registry of synthesized declarations.
///
/// Names already used by schema declarations are never handed out. A request
/// for a taken name reuses the existing declaration when the shape is
/// identical and otherwise gets a numeric suffix.
#[derive(Debug, Default)]
pub struct Synthesized {
    reserved: HashSet<String>,
    decls: Vec<TypeDecl>,
    by_name: HashMap<String, usize>,
}

impl Synthesized {
    /// Creates a registry that avoids every name in `index`.
    #[must_use]
    pub fn new(index: &TypeIndex<'_>) -> Self {
        Self {
            reserved: index.names().map(str::to_string).collect(),
            ..Self::default()
        }
    }

    /// Registers a declaration, returning the name it ends up under.
    pub fn register(&mut self, mut decl: TypeDecl) -> String {
        let base = decl.ident.clone();
        let mut candidate = base.clone();
        let mut suffix = 1;

        loop {
            if !self.reserved.contains(&candidate) {
                match self.by_name.get(&candidate) {
                    None => break,
                    Some(&idx) if self.decls[idx].spec == decl.spec => return candidate,
                    Some(_) => {}
                }
            }
            suffix += 1;
            candidate = format!("{base}{suffix}");
        }

        if candidate != base {
            tracing::debug!(requested = %base, assigned = %candidate, "renamed synthesized type");
        }
        decl.ident = candidate.clone();
        self.by_name.insert(candidate.clone(), self.decls.len());
        self.decls.push(decl);
        candidate
    }

    /// Consumes the registry, returning declarations in registration order.
    #[must_use]
    pub fn into_decls(self) -> Vec<TypeDecl> {
        self.decls
    }
}

/// Maps schema type expressions to target types.
pub struct TypeMapper<'a> {
    index: &'a TypeIndex<'a>,
    emit_docs: bool,
    synthesized: Synthesized,
}

impl<'a> TypeMapper<'a> {
    /// Creates a new type mapper.
    #[must_use]
    pub fn new(index: &'a TypeIndex<'a>, emit_docs: bool) -> Self {
        Self {
            index,
            emit_docs,
            synthesized: Synthesized::new(index),
        }
    }

    /// Returns the declarations synthesized so far.
    #[must_use]
    pub fn into_synthesized(self) -> Vec<TypeDecl> {
        self.synthesized.into_decls()
    }

    /// Builds docs honoring the `emit_docs` setting.
    #[must_use]
    pub fn docs(&self, annotations: &Annotations) -> Docs {
        Docs::from_annotations(annotations, self.emit_docs)
    }

    /// Maps a type expression.
    ///
    /// `context` names the declaration being mapped and appears in errors;
    /// `hint` is the name given to any synthesized declaration. Optional
    /// types are wrapped in `Option` exactly once.
    ///
    /// # Errors
    /// Returns `CodegenError` for unknown references or base types.
    pub fn map(
        &mut self,
        ty: &Type,
        optional: bool,
        context: &str,
        hint: &str,
    ) -> Result<TargetType, CodegenError> {
        let mapped = self.map_type(ty, context, hint)?;
        Ok(if optional { mapped.optional() } else { mapped })
    }

    /// Maps a property of `owner` to a field.
    ///
    /// # Errors
    /// Returns `CodegenError` if the property type cannot be mapped.
    pub fn field(
        &mut self,
        owner: &str,
        property: &Property,
        context: &str,
    ) -> Result<FieldDecl, CodegenError> {
        let hint = format!("{owner}{}", to_pascal_case(&property.name));
        let ty = self.map(&property.type_, property.optional, context, &hint)?;
        Ok(FieldDecl {
            ident: field_name(&property.name),
            wire_name: property.name.clone(),
            ty,
            optional: property.optional,
            docs: self.docs(&property.annotations),
        })
    }

    /// Builds the primary declaration for a named type expression.
    ///
    /// Unions, intersections and literals become declarations of their own
    /// under `ident`; a nullable union gets a `Null` variant. Anything else
    /// becomes an alias.
    ///
    /// # Errors
    /// Returns `CodegenError` if any part cannot be mapped.
    pub fn declare(
        &mut self,
        ident: &str,
        ty: &Type,
        docs: Docs,
    ) -> Result<TypeDecl, CodegenError> {
        let spec = match ty {
            Type::Or(or) => {
                let rest: Vec<&Type> = or.items.iter().filter(|t| !t.is_null()).collect();
                let nullable = rest.len() != or.items.len();
                if rest.len() >= 2 && literal_union(&rest).is_none() {
                    self.union_spec(&rest, nullable, ident, ident)?
                } else {
                    TypeSpec::Alias(self.map_type(ty, ident, ident)?)
                }
            }
            Type::And(and) => self.intersection_spec(&and.items, ident, ident)?,
            Type::StructLiteral(lit) => self.literal_spec(&lit.value, ident, ident)?,
            other => TypeSpec::Alias(self.map_type(other, ident, ident)?),
        };

        Ok(TypeDecl {
            ident: ident.to_string(),
            docs,
            spec,
        })
    }

    fn map_type(
        &mut self,
        ty: &Type,
        context: &str,
        hint: &str,
    ) -> Result<TargetType, CodegenError> {
        match ty {
            Type::Base(base) => Ok(TargetType::Primitive(primitive_for(&base.name, context)?)),
            Type::Reference(reference) => {
                self.index.resolve(&reference.name, context)?;
                Ok(TargetType::symbol(&reference.name))
            }
            Type::Array(array) => {
                let element = self.map_type(&array.element, context, &format!("{hint}Item"))?;
                Ok(TargetType::Vec(Box::new(element)))
            }
            Type::Map(map) => {
                let key = self.map_type(&map.key, context, &format!("{hint}Key"))?;
                let value = self.map_type(&map.value, context, &format!("{hint}Value"))?;
                Ok(TargetType::Map(Box::new(key), Box::new(value)))
            }
            Type::Tuple(tuple) => {
                let items = tuple
                    .items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.map_type(item, context, &format!("{hint}{i}")))
                    .collect::<Result<_, _>>()?;
                Ok(TargetType::Tuple(items))
            }
            Type::StringLiteral(lit) => Ok(constrained(LiteralValue::String(lit.value.clone()))),
            Type::IntegerLiteral(lit) => Ok(constrained(LiteralValue::Integer(lit.value))),
            Type::BooleanLiteral(lit) => Ok(constrained(LiteralValue::Boolean(lit.value))),
            Type::Or(or) => self.map_or(&or.items, context, hint),
            Type::And(and) => {
                let spec = self.intersection_spec(&and.items, context, hint)?;
                Ok(self.synthesize(hint, spec))
            }
            Type::StructLiteral(lit) => {
                let spec = self.literal_spec(&lit.value, context, hint)?;
                Ok(self.synthesize(hint, spec))
            }
        }
    }

    fn map_or(
        &mut self,
        items: &[Type],
        context: &str,
        hint: &str,
    ) -> Result<TargetType, CodegenError> {
        let rest: Vec<&Type> = items.iter().filter(|t| !t.is_null()).collect();
        let nullable = rest.len() != items.len();

        let mapped = match rest.as_slice() {
            [] => TargetType::Primitive(Primitive::Unit),
            [only] => self.map_type(only, context, hint)?,
            _ => match literal_union(&rest) {
                Some(constraint) => constraint,
                None => {
                    let spec = self.union_spec(&rest, false, context, hint)?;
                    self.synthesize(hint, spec)
                }
            },
        };

        Ok(if nullable { mapped.optional() } else { mapped })
    }

    fn union_spec(
        &mut self,
        items: &[&Type],
        with_null: bool,
        context: &str,
        hint: &str,
    ) -> Result<TypeSpec, CodegenError> {
        let mut taken = HashSet::new();
        let mut variants = Vec::with_capacity(items.len() + usize::from(with_null));

        for (i, item) in items.iter().enumerate() {
            let mut ident = variant_name(item);
            if !taken.insert(ident.clone()) {
                ident = format!("{ident}{i}");
                taken.insert(ident.clone());
            }
            let ty = self.map_type(item, context, &format!("{hint}{ident}"))?;
            variants.push(VariantDecl {
                ident,
                ty: Some(ty),
            });
        }

        if with_null {
            variants.push(VariantDecl {
                ident: "Null".to_string(),
                ty: None,
            });
        }

        Ok(TypeSpec::Union { variants })
    }

    fn intersection_spec(
        &mut self,
        items: &[Type],
        context: &str,
        hint: &str,
    ) -> Result<TypeSpec, CodegenError> {
        let mut bases = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let ty = self.map_type(item, context, &format!("{hint}Part{i}"))?;
                Ok(BaseDecl::new(ty))
            })
            .collect::<Result<Vec<_>, CodegenError>>()?;
        disambiguate_members(hint, &mut bases, &mut []);
        Ok(TypeSpec::Record {
            bases,
            fields: Vec::new(),
        })
    }

    fn literal_spec(
        &mut self,
        literal: &StructLiteral,
        context: &str,
        hint: &str,
    ) -> Result<TypeSpec, CodegenError> {
        let mut fields = literal
            .properties
            .iter()
            .map(|p| self.field(hint, p, context))
            .collect::<Result<Vec<_>, _>>()?;
        disambiguate_members(hint, &mut [], &mut fields);
        Ok(TypeSpec::Record {
            bases: Vec::new(),
            fields,
        })
    }

    fn synthesize(&mut self, hint: &str, spec: TypeSpec) -> TargetType {
        let name = self.synthesized.register(TypeDecl {
            ident: hint.to_string(),
            docs: Docs::default(),
            spec,
        });
        TargetType::Symbol(name)
    }
}

fn constrained(value: LiteralValue) -> TargetType {
    TargetType::Constrained {
        base: value.primitive(),
        values: vec![value],
    }
}

/// Collapses a union of same-typed literals into one constrained primitive.
fn literal_union(items: &[&Type]) -> Option<TargetType> {
    let values: Vec<LiteralValue> = items
        .iter()
        .map(|item| match item {
            Type::StringLiteral(lit) => Some(LiteralValue::String(lit.value.clone())),
            Type::IntegerLiteral(lit) => Some(LiteralValue::Integer(lit.value)),
            Type::BooleanLiteral(lit) => Some(LiteralValue::Boolean(lit.value)),
            _ => None,
        })
        .collect::<Option<_>>()?;

    let base = values.first()?.primitive();
    values
        .iter()
        .all(|v| v.primitive() == base)
        .then_some(TargetType::Constrained { base, values })
}

/// Returns the union variant name for an alternative.
fn variant_name(ty: &Type) -> String {
    match ty {
        Type::Base(base) => to_pascal_case(&base.name),
        Type::Reference(reference) => reference.name.clone(),
        Type::Array(array) => format!("{}List", variant_name(&array.element)),
        Type::Map(_) => "Map".to_string(),
        Type::Tuple(_) => "Tuple".to_string(),
        Type::StructLiteral(_) => "Literal".to_string(),
        Type::StringLiteral(lit) => {
            let name = to_pascal_case(&lit.value);
            if name.is_empty() {
                "Empty".to_string()
            } else {
                name
            }
        }
        Type::IntegerLiteral(lit) if lit.value < 0 => {
            format!("ValueMinus{}", lit.value.unsigned_abs())
        }
        Type::IntegerLiteral(lit) => format!("Value{}", lit.value),
        Type::BooleanLiteral(lit) => (if lit.value { "True" } else { "False" }).to_string(),
        Type::And(_) => "Intersection".to_string(),
        Type::Or(_) => "Union".to_string(),
    }
}
