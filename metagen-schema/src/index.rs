//! Name index and structure flattening.
//!
//! The [`TypeIndex`] is built once from a [`MetaModel`] and is read-only for
//! the rest of a generation run. It resolves reference names and flattens
//! structure `extends`/`mixins` chains into ordered property lists.

use crate::error::SchemaError;
use crate::model::{Enumeration, MetaModel, Property, Structure, TypeAlias};
use crate::types::Type;
use std::collections::HashMap;

/// A named declaration in the meta model.
#[derive(Debug, Clone, Copy)]
pub enum NamedType<'a> {
    /// Structure declaration.
    Structure(&'a Structure),
    /// Enumeration declaration.
    Enumeration(&'a Enumeration),
    /// Type alias declaration.
    Alias(&'a TypeAlias),
}

impl<'a> NamedType<'a> {
    /// Returns the declared name.
    #[must_use]
    pub fn name(&self) -> &'a str {
        match self {
            Self::Structure(s) => &s.name,
            Self::Enumeration(e) => &e.name,
            Self::Alias(a) => &a.name,
        }
    }
}

/// A property together with the structure that declares it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedProperty<'a> {
    /// Name of the declaring structure.
    pub owner: &'a str,
    /// The property itself.
    pub property: &'a Property,
}

impl<'a> ResolvedProperty<'a> {
    /// Returns the properties a structure declares itself, in order.
    pub fn own(structure: &'a Structure) -> impl Iterator<Item = Self> + 'a {
        let owner = structure.name.as_str();
        structure
            .properties
            .iter()
            .map(move |property| Self { owner, property })
    }
}

/// Read-only lookup from declared name to declaration.
#[derive(Debug, Clone)]
pub struct TypeIndex<'a> {
    types: HashMap<&'a str, NamedType<'a>>,
}

impl<'a> TypeIndex<'a> {
    /// Builds the index over all structures, enumerations and aliases.
    ///
    /// Later declarations with a duplicate name replace earlier ones.
    #[must_use]
    pub fn new(model: &'a MetaModel) -> Self {
        let mut types = HashMap::with_capacity(model.declaration_count());

        for s in &model.structures {
            types.insert(s.name.as_str(), NamedType::Structure(s));
        }
        for e in &model.enumerations {
            types.insert(e.name.as_str(), NamedType::Enumeration(e));
        }
        for a in &model.type_aliases {
            types.insert(a.name.as_str(), NamedType::Alias(a));
        }

        tracing::debug!(entries = types.len(), "built type index");
        Self { types }
    }

    /// Looks up a declaration by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<NamedType<'a>> {
        self.types.get(name).copied()
    }

    /// Returns an iterator over all declared names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.types.keys().copied()
    }

    /// Returns true if `ty` is the declaration the index holds for its name.
    ///
    /// False for declarations shadowed by a later duplicate.
    #[must_use]
    pub fn is_primary(&self, ty: NamedType<'_>) -> bool {
        match (self.get(ty.name()), ty) {
            (Some(NamedType::Structure(a)), NamedType::Structure(b)) => std::ptr::eq(a, b),
            (Some(NamedType::Enumeration(a)), NamedType::Enumeration(b)) => std::ptr::eq(a, b),
            (Some(NamedType::Alias(a)), NamedType::Alias(b)) => std::ptr::eq(a, b),
            _ => false,
        }
    }

    /// Returns the number of indexed declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Resolves a reference name, failing if it is not declared.
    ///
    /// # Errors
    /// Returns `SchemaError::UnknownReference` naming `context`.
    pub fn resolve(&self, name: &str, context: &str) -> Result<NamedType<'a>, SchemaError> {
        self.get(name)
            .ok_or_else(|| SchemaError::unknown(name, context))
    }

    /// Returns the names of the structures a structure extends.
    ///
    /// # Errors
    /// Returns `SchemaError` if an entry is not a reference to a structure.
    pub fn base_names(&self, structure: &'a Structure) -> Result<Vec<&'a str>, SchemaError> {
        structure
            .extends
            .iter()
            .enumerate()
            .map(|(idx, ty)| {
                let target = self.referenced_structure(structure, "base", idx, ty)?;
                Ok(target.name.as_str())
            })
            .collect()
    }

    /// Flattens a structure into its complete property list.
    ///
    /// Each `extends` entry, then each `mixins` entry, is flattened
    /// recursively; the structure's own properties come last. Properties with
    /// the same name are not merged: every occurrence is kept in encounter
    /// order.
    ///
    /// # Errors
    /// Returns `SchemaError` if an entry is not a reference, names an unknown
    /// declaration or a non-structure, or if the chain is circular.
    pub fn resolve_extends(
        &self,
        structure: &'a Structure,
    ) -> Result<Vec<ResolvedProperty<'a>>, SchemaError> {
        let mut out = Vec::new();
        let mut chain = Vec::new();
        self.flatten_into(structure, &mut chain, &mut out)?;
        Ok(out)
    }

    /// Flattens only the mixins of a structure.
    ///
    /// Each mixin is flattened completely (including its own bases), in
    /// declaration order. The structure's own properties are not included.
    ///
    /// # Errors
    /// Same conditions as [`TypeIndex::resolve_extends`].
    pub fn resolve_mixins(
        &self,
        structure: &'a Structure,
    ) -> Result<Vec<ResolvedProperty<'a>>, SchemaError> {
        let mut out = Vec::new();
        let mut chain = vec![structure.name.as_str()];

        for (idx, ty) in structure.mixins.iter().enumerate() {
            let mixin = self.referenced_structure(structure, "mixin", idx, ty)?;
            self.flatten_into(mixin, &mut chain, &mut out)?;
        }

        Ok(out)
    }

    fn flatten_into(
        &self,
        structure: &'a Structure,
        chain: &mut Vec<&'a str>,
        out: &mut Vec<ResolvedProperty<'a>>,
    ) -> Result<(), SchemaError> {
        if chain.contains(&structure.name.as_str()) {
            let mut path = chain.join(" -> ");
            path.push_str(" -> ");
            path.push_str(&structure.name);
            return Err(SchemaError::CircularReference { path });
        }
        chain.push(&structure.name);

        for (idx, ty) in structure.extends.iter().enumerate() {
            let base = self.referenced_structure(structure, "base", idx, ty)?;
            self.flatten_into(base, chain, out)?;
        }

        for (idx, ty) in structure.mixins.iter().enumerate() {
            let mixin = self.referenced_structure(structure, "mixin", idx, ty)?;
            self.flatten_into(mixin, chain, out)?;
        }

        out.extend(ResolvedProperty::own(structure));

        chain.pop();
        Ok(())
    }

    fn referenced_structure(
        &self,
        structure: &Structure,
        relation: &'static str,
        index: usize,
        ty: &Type,
    ) -> Result<&'a Structure, SchemaError> {
        let Some(name) = ty.as_reference() else {
            return Err(SchemaError::NotAReference {
                structure: structure.name.clone(),
                relation,
                index,
            });
        };

        match self.resolve(name, &structure.name)? {
            NamedType::Structure(s) => Ok(s),
            _ => Err(SchemaError::NotAStructure {
                name: name.to_string(),
                structure: structure.name.clone(),
            }),
        }
    }
}
