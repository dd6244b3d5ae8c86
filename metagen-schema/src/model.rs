//! Meta-model declarations.
//!
//! This module contains the root [`MetaModel`] and the named declarations it
//! holds: structures, enumerations and type aliases.

use crate::messages::{Notification, Request};
use crate::types::{EnumerationValue, Type};
use serde::Deserialize;

/// Complete meta-model document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaModel {
    /// Document metadata.
    #[serde(default)]
    pub meta_data: MetaData,
    /// Request definitions.
    #[serde(default)]
    pub requests: Vec<Request>,
    /// Notification definitions.
    #[serde(default)]
    pub notifications: Vec<Notification>,
    /// Structure definitions.
    #[serde(default)]
    pub structures: Vec<Structure>,
    /// Enumeration definitions.
    #[serde(default)]
    pub enumerations: Vec<Enumeration>,
    /// Type alias definitions.
    #[serde(default)]
    pub type_aliases: Vec<TypeAlias>,
}

impl MetaModel {
    /// Returns the number of named declarations (structures, enumerations, aliases).
    #[must_use]
    pub fn declaration_count(&self) -> usize {
        self.structures.len() + self.enumerations.len() + self.type_aliases.len()
    }
}

/// Meta-model metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetaData {
    /// Protocol version the model describes.
    #[serde(default)]
    pub version: String,
}

/// Documentation and lifecycle metadata shared by all declarations.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotations {
    /// Documentation text.
    #[serde(default)]
    pub documentation: Option<String>,
    /// Protocol version that introduced the element.
    #[serde(default)]
    pub since: Option<String>,
    /// Whether the element is a proposed feature.
    #[serde(default)]
    pub proposed: bool,
    /// Deprecation message.
    #[serde(default)]
    pub deprecated: Option<String>,
}

/// Structure definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Structure {
    /// Structure name.
    pub name: String,
    /// Own properties in declaration order.
    #[serde(default)]
    pub properties: Vec<Property>,
    /// Base structures.
    #[serde(default)]
    pub extends: Vec<Type>,
    /// Structures whose properties are injected.
    #[serde(default)]
    pub mixins: Vec<Type>,
    /// Documentation and lifecycle metadata.
    #[serde(flatten)]
    pub annotations: Annotations,
}

/// Structure property.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Property {
    /// Wire name.
    pub name: String,
    /// Property type.
    #[serde(rename = "type")]
    pub type_: Type,
    /// Whether the property may be absent.
    #[serde(default)]
    pub optional: bool,
    /// Documentation and lifecycle metadata.
    #[serde(flatten)]
    pub annotations: Annotations,
}

/// Inline structure shape of a `literal` type node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StructLiteral {
    /// Properties in declaration order.
    #[serde(default)]
    pub properties: Vec<Property>,
    /// Documentation and lifecycle metadata.
    #[serde(flatten)]
    pub annotations: Annotations,
}

/// Enumeration definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enumeration {
    /// Enumeration name.
    pub name: String,
    /// Declared base type.
    #[serde(rename = "type")]
    pub type_: Type,
    /// Entries in declaration order.
    #[serde(default)]
    pub values: Vec<EnumerationEntry>,
    /// Whether values outside the declared set are permitted.
    #[serde(default)]
    pub supports_custom_values: bool,
    /// Documentation and lifecycle metadata.
    #[serde(flatten)]
    pub annotations: Annotations,
}

/// Enumeration entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnumerationEntry {
    /// Entry name.
    pub name: String,
    /// Entry value.
    pub value: EnumerationValue,
    /// Documentation and lifecycle metadata.
    #[serde(flatten)]
    pub annotations: Annotations,
}

/// Type alias definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TypeAlias {
    /// Alias name.
    pub name: String,
    /// Aliased type.
    #[serde(rename = "type")]
    pub type_: Type,
    /// Documentation and lifecycle metadata.
    #[serde(flatten)]
    pub annotations: Annotations,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structure_defaults() {
        let s: Structure = serde_json::from_value(json!({"name": "Empty"})).unwrap();
        assert_eq!(s.name, "Empty");
        assert!(s.properties.is_empty());
        assert!(s.extends.is_empty());
        assert!(s.mixins.is_empty());
        assert_eq!(s.annotations, Annotations::default());
    }

    #[test]
    fn test_property_annotations() {
        let p: Property = serde_json::from_value(json!({
            "name": "textDocument",
            "type": {"kind": "reference", "name": "TextDocumentIdentifier"},
            "optional": true,
            "documentation": "The document.",
            "since": "3.17.0",
            "proposed": true,
            "deprecated": "use something else"
        }))
        .unwrap();

        assert!(p.optional);
        assert_eq!(p.type_.as_reference(), Some("TextDocumentIdentifier"));
        assert_eq!(
            p.annotations.documentation.as_deref(),
            Some("The document.")
        );
        assert_eq!(p.annotations.since.as_deref(), Some("3.17.0"));
        assert!(p.annotations.proposed);
        assert_eq!(
            p.annotations.deprecated.as_deref(),
            Some("use something else")
        );
    }

    #[test]
    fn test_enumeration_entries() {
        let e: Enumeration = serde_json::from_value(json!({
            "name": "DiagnosticSeverity",
            "type": {"kind": "base", "name": "uinteger"},
            "values": [
                {"name": "Error", "value": 1},
                {"name": "Warning", "value": 2}
            ],
            "supportsCustomValues": true
        }))
        .unwrap();

        assert_eq!(e.values.len(), 2);
        assert_eq!(e.values[1].value, EnumerationValue::Number(2.0));
        assert!(e.supports_custom_values);
    }
}
