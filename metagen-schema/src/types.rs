//! Type-expression tree.
//!
//! Every type expression in the meta model is a JSON object carrying a `kind`
//! discriminant. Decoding is two-phase: the discriminant is read first into a
//! [`TypeKind`], then the whole node is decoded into the payload of the
//! matching [`Type`] variant.

use crate::model::StructLiteral;
use serde::Deserialize;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde_json::Value;
use std::ops::Deref;

/// Discriminant of a type-expression node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Primitive base type (`string`, `integer`, ...).
    Base,
    /// Reference to a named declaration.
    Reference,
    /// Homogeneous array.
    Array,
    /// Key/value map.
    Map,
    /// Intersection of types.
    And,
    /// Union of types.
    Or,
    /// Fixed-arity heterogeneous sequence.
    Tuple,
    /// Inline structure literal.
    Literal,
    /// Single string value.
    StringLiteral,
    /// Single integer value.
    IntegerLiteral,
    /// Single boolean value.
    BooleanLiteral,
}

impl TypeKind {
    /// All recognized kinds.
    pub const ALL: [TypeKind; 11] = [
        Self::Base,
        Self::Reference,
        Self::Array,
        Self::Map,
        Self::And,
        Self::Or,
        Self::Tuple,
        Self::Literal,
        Self::StringLiteral,
        Self::IntegerLiteral,
        Self::BooleanLiteral,
    ];

    /// Returns the discriminant value used in the meta model.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Reference => "reference",
            Self::Array => "array",
            Self::Map => "map",
            Self::And => "and",
            Self::Or => "or",
            Self::Tuple => "tuple",
            Self::Literal => "literal",
            Self::StringLiteral => "stringLiteral",
            Self::IntegerLiteral => "integerLiteral",
            Self::BooleanLiteral => "booleanLiteral",
        }
    }

    /// Parses a kind from its discriminant value.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// Polymorphic type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// Primitive base type.
    Base(BaseType),
    /// Reference to a structure, enumeration or alias.
    Reference(ReferenceType),
    /// Array of an element type.
    Array(ArrayType),
    /// Map from key type to value type.
    Map(MapType),
    /// Intersection.
    And(AndType),
    /// Union.
    Or(OrType),
    /// Tuple.
    Tuple(TupleType),
    /// Inline structure literal.
    StructLiteral(StructLiteralType),
    /// String literal.
    StringLiteral(StringLiteralType),
    /// Integer literal.
    IntegerLiteral(IntegerLiteralType),
    /// Boolean literal.
    BooleanLiteral(BooleanLiteralType),
}

/// Payload of a `base` node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BaseType {
    /// Base type name.
    pub name: String,
}

/// Payload of a `reference` node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReferenceType {
    /// Referenced declaration name.
    pub name: String,
}

/// Payload of an `array` node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArrayType {
    /// Element type.
    pub element: Box<Type>,
}

/// Payload of a `map` node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapType {
    /// Key type.
    pub key: Box<Type>,
    /// Value type.
    pub value: Box<Type>,
}

/// Payload of an `and` node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AndType {
    /// Intersected types.
    pub items: Vec<Type>,
}

/// Payload of an `or` node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrType {
    /// Alternatives.
    pub items: Vec<Type>,
}

/// Payload of a `tuple` node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TupleType {
    /// Tuple members in order.
    pub items: Vec<Type>,
}

/// Payload of a `literal` node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StructLiteralType {
    /// Inline structure shape.
    pub value: StructLiteral,
}

/// Payload of a `stringLiteral` node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StringLiteralType {
    /// Literal value.
    pub value: String,
}

/// Payload of an `integerLiteral` node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IntegerLiteralType {
    /// Literal value.
    pub value: i64,
}

/// Payload of a `booleanLiteral` node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BooleanLiteralType {
    /// Literal value.
    pub value: bool,
}

impl Type {
    /// Creates a `base` node.
    #[must_use]
    pub fn base(name: impl Into<String>) -> Self {
        Self::Base(BaseType { name: name.into() })
    }

    /// Creates a `reference` node.
    #[must_use]
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Reference(ReferenceType { name: name.into() })
    }

    /// Creates an `array` node.
    #[must_use]
    pub fn array(element: Type) -> Self {
        Self::Array(ArrayType {
            element: Box::new(element),
        })
    }

    /// Creates an `or` node.
    #[must_use]
    pub fn or(items: Vec<Type>) -> Self {
        Self::Or(OrType { items })
    }

    /// Returns the discriminant of this node.
    #[must_use]
    pub const fn kind(&self) -> TypeKind {
        match self {
            Self::Base(_) => TypeKind::Base,
            Self::Reference(_) => TypeKind::Reference,
            Self::Array(_) => TypeKind::Array,
            Self::Map(_) => TypeKind::Map,
            Self::And(_) => TypeKind::And,
            Self::Or(_) => TypeKind::Or,
            Self::Tuple(_) => TypeKind::Tuple,
            Self::StructLiteral(_) => TypeKind::Literal,
            Self::StringLiteral(_) => TypeKind::StringLiteral,
            Self::IntegerLiteral(_) => TypeKind::IntegerLiteral,
            Self::BooleanLiteral(_) => TypeKind::BooleanLiteral,
        }
    }

    /// Returns the referenced name if this is a `reference` node.
    #[must_use]
    pub fn as_reference(&self) -> Option<&str> {
        match self {
            Self::Reference(r) => Some(&r.name),
            _ => None,
        }
    }

    /// Returns the base type name if this is a `base` node.
    #[must_use]
    pub fn as_base(&self) -> Option<&str> {
        match self {
            Self::Base(b) => Some(&b.name),
            _ => None,
        }
    }

    /// Returns true for the `null` base type.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.as_base() == Some("null")
    }

    /// Decodes the payload of an already-discriminated node.
    fn decode(kind: TypeKind, node: Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            TypeKind::Base => Self::Base(serde_json::from_value(node)?),
            TypeKind::Reference => Self::Reference(serde_json::from_value(node)?),
            TypeKind::Array => Self::Array(serde_json::from_value(node)?),
            TypeKind::Map => Self::Map(serde_json::from_value(node)?),
            TypeKind::And => Self::And(serde_json::from_value(node)?),
            TypeKind::Or => Self::Or(serde_json::from_value(node)?),
            TypeKind::Tuple => Self::Tuple(serde_json::from_value(node)?),
            TypeKind::Literal => Self::StructLiteral(serde_json::from_value(node)?),
            TypeKind::StringLiteral => Self::StringLiteral(serde_json::from_value(node)?),
            TypeKind::IntegerLiteral => Self::IntegerLiteral(serde_json::from_value(node)?),
            TypeKind::BooleanLiteral => Self::BooleanLiteral(serde_json::from_value(node)?),
        })
    }
}

#[derive(Deserialize)]
struct TypeDisc {
    kind: String,
}

impl<'de> Deserialize<'de> for Type {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let node = Value::deserialize(deserializer)?;
        let disc = TypeDisc::deserialize(&node).map_err(de::Error::custom)?;
        let kind = TypeKind::from_name(&disc.kind).ok_or_else(|| {
            de::Error::custom(format_args!("type kind '{}' is not supported", disc.kind))
        })?;
        Self::decode(kind, node).map_err(de::Error::custom)
    }
}

/// A value that may appear either bare or as an array.
///
/// Always holds at least one element.
#[derive(Debug, Clone, PartialEq)]
pub struct OneOrMore<T>(Vec<T>);

impl<T> OneOrMore<T> {
    /// Creates a single-element sequence.
    #[must_use]
    pub fn one(item: T) -> Self {
        Self(vec![item])
    }

    /// Consumes the sequence and returns its elements.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.0
    }
}

impl<T> Deref for OneOrMore<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<'a, T> IntoIterator for &'a OneOrMore<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'de, T> Deserialize<'de> for OneOrMore<T>
where
    T: DeserializeOwned,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let node = Value::deserialize(deserializer)?;
        let was_array = node.is_array();

        let array_err = match serde_json::from_value::<Vec<T>>(node.clone()) {
            Ok(items) if items.is_empty() => {
                return Err(de::Error::invalid_length(0, &"at least one element"));
            }
            Ok(items) => return Ok(Self(items)),
            Err(err) => err,
        };

        match serde_json::from_value::<T>(node) {
            Ok(item) => Ok(Self::one(item)),
            Err(_) if was_array => Err(de::Error::custom(array_err)),
            Err(err) => Err(de::Error::custom(err)),
        }
    }
}

/// Value of an enumeration entry.
///
/// Numbers are tried before strings, so `0` decodes as numeric zero.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EnumerationValue {
    /// Numeric value.
    Number(f64),
    /// Text value.
    String(String),
}

impl EnumerationValue {
    /// Returns the numeric value, if any.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::String(_) => None,
        }
    }

    /// Returns the text value, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Number(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: Value) -> Result<Type, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in TypeKind::ALL {
            assert_eq!(TypeKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(TypeKind::from_name("bogus"), None);
    }

    #[test]
    fn test_decode_every_kind() {
        let cases = [
            (json!({"kind": "base", "name": "string"}), TypeKind::Base),
            (
                json!({"kind": "reference", "name": "Range"}),
                TypeKind::Reference,
            ),
            (
                json!({"kind": "array", "element": {"kind": "base", "name": "integer"}}),
                TypeKind::Array,
            ),
            (
                json!({
                    "kind": "map",
                    "key": {"kind": "base", "name": "DocumentUri"},
                    "value": {"kind": "reference", "name": "TextEdit"}
                }),
                TypeKind::Map,
            ),
            (
                json!({"kind": "and", "items": [{"kind": "reference", "name": "A"}]}),
                TypeKind::And,
            ),
            (
                json!({"kind": "or", "items": [{"kind": "base", "name": "null"}]}),
                TypeKind::Or,
            ),
            (
                json!({"kind": "tuple", "items": [{"kind": "base", "name": "uinteger"}]}),
                TypeKind::Tuple,
            ),
            (
                json!({"kind": "literal", "value": {"properties": []}}),
                TypeKind::Literal,
            ),
            (
                json!({"kind": "stringLiteral", "value": "create"}),
                TypeKind::StringLiteral,
            ),
            (
                json!({"kind": "integerLiteral", "value": 1}),
                TypeKind::IntegerLiteral,
            ),
            (
                json!({"kind": "booleanLiteral", "value": true}),
                TypeKind::BooleanLiteral,
            ),
        ];

        for (value, expected) in cases {
            let ty = decode(value).expect("Failed to decode type");
            assert_eq!(ty.kind(), expected);
        }
    }

    #[test]
    fn test_decode_nested_payload() {
        let ty = decode(json!({
            "kind": "map",
            "key": {"kind": "base", "name": "string"},
            "value": {"kind": "array", "element": {"kind": "reference", "name": "TextEdit"}}
        }))
        .expect("Failed to decode type");

        let Type::Map(map) = ty else {
            panic!("expected map");
        };
        assert_eq!(map.key.as_base(), Some("string"));
        assert_eq!(*map.value, Type::array(Type::reference("TextEdit")));
    }

    #[test]
    fn test_decode_unknown_kind_names_it() {
        let err = decode(json!({"kind": "bogus", "name": "x"})).unwrap_err();
        assert!(err.to_string().contains("'bogus'"), "{err}");
    }

    #[test]
    fn test_decode_missing_kind() {
        assert!(decode(json!({"name": "string"})).is_err());
    }

    #[test]
    fn test_one_or_more_bare_value() {
        let items: OneOrMore<String> = serde_json::from_value(json!("a")).unwrap();
        assert_eq!(&*items, &["a".to_string()]);
    }

    #[test]
    fn test_one_or_more_array_keeps_order() {
        let items: OneOrMore<u32> = serde_json::from_value(json!([3, 1, 2])).unwrap();
        assert_eq!(items.into_vec(), vec![3, 1, 2]);
    }

    #[test]
    fn test_one_or_more_of_types() {
        let value = json!({"kind": "reference", "name": "A"});
        let single: OneOrMore<Type> = serde_json::from_value(value).unwrap();
        assert_eq!(single.len(), 1);

        let many: OneOrMore<Type> = serde_json::from_value(json!([
            {"kind": "reference", "name": "A"},
            {"kind": "base", "name": "string"}
        ]))
        .unwrap();
        assert_eq!(many.len(), 2);
        assert_eq!(many[1].as_base(), Some("string"));
    }

    #[test]
    fn test_one_or_more_rejects_empty() {
        let result = serde_json::from_value::<OneOrMore<u32>>(json!([]));
        assert!(result.is_err());
    }

    #[test]
    fn test_enumeration_value_zero_is_numeric() {
        let value: EnumerationValue = serde_json::from_value(json!(0)).unwrap();
        assert_eq!(value, EnumerationValue::Number(0.0));
        assert_eq!(value.as_str(), None);
    }

    #[test]
    fn test_enumeration_value_string() {
        let value: EnumerationValue = serde_json::from_value(json!("open")).unwrap();
        assert_eq!(value.as_str(), Some("open"));
        assert_eq!(value.as_number(), None);
    }
}
