//! Enumeration code generation.

use crate::decl::{ConstBlock, ConstDecl, ConstValue, Docs, Primitive, TypeDecl, TypeSpec};
use crate::error::CodegenError;
use metagen_schema::{Enumeration, EnumerationValue};

type Convert = fn(&EnumerationValue) -> Option<ConstValue>;

/// Generator for enumeration types and their constants.
///
/// Each enumeration becomes a transparent newtype over its base primitive plus
/// one constant per entry, named `{Enumeration}{Entry}`. Newtypes keep
/// enumerations open, so values outside the declared set still decode.
///
/// Entry values must match the base type. A string value in a numeric
/// enumeration, or a number in a string one, is reported as
/// [`CodegenError::EnumValueMismatch`] instead of being replaced by a zero
/// value.
#[derive(Debug, Clone, Copy)]
pub struct EnumEmitter {
    emit_docs: bool,
}

impl EnumEmitter {
    /// Creates a new enum emitter.
    #[must_use]
    pub const fn new(emit_docs: bool) -> Self {
        Self { emit_docs }
    }

    /// Emits the newtype declaration and constant block for an enumeration.
    ///
    /// # Errors
    /// Returns `CodegenError::UnsupportedBaseType` if the base type is not one
    /// of `integer`, `uinteger`, `number` or `string`, and
    /// `CodegenError::EnumValueMismatch` if an entry value has the wrong shape.
    pub fn emit(&self, enumeration: &Enumeration) -> Result<(TypeDecl, ConstBlock), CodegenError> {
        let base = enumeration
            .type_
            .as_base()
            .unwrap_or_else(|| enumeration.type_.kind().name());

        let (primitive, convert): (Primitive, Convert) = match base {
            "integer" => (Primitive::I32, to_i32),
            "uinteger" => (Primitive::U32, to_u32),
            "number" => (Primitive::F64, to_f64),
            "string" => (Primitive::String, to_str),
            other => {
                return Err(CodegenError::UnsupportedBaseType {
                    enumeration: enumeration.name.clone(),
                    base: other.to_string(),
                });
            }
        };

        let consts = enumeration
            .values
            .iter()
            .map(|entry| {
                let Some(value) = convert(&entry.value) else {
                    return Err(CodegenError::EnumValueMismatch {
                        enumeration: enumeration.name.clone(),
                        entry: entry.name.clone(),
                        base: base.to_string(),
                    });
                };
                Ok(ConstDecl {
                    ident: format!("{}{}", enumeration.name, entry.name),
                    value,
                    docs: Docs::from_annotations(&entry.annotations, self.emit_docs),
                })
            })
            .collect::<Result<Vec<_>, CodegenError>>()?;

        tracing::trace!(
            enumeration = %enumeration.name,
            base,
            entries = consts.len(),
            "emitted enumeration"
        );

        let decl = TypeDecl {
            ident: enumeration.name.clone(),
            docs: Docs::from_annotations(&enumeration.annotations, self.emit_docs),
            spec: TypeSpec::Newtype(primitive),
        };
        let block = ConstBlock {
            owner: enumeration.name.clone(),
            consts,
        };
        Ok((decl, block))
    }
}

fn to_i32(value: &EnumerationValue) -> Option<ConstValue> {
    value.as_number().map(|n| ConstValue::Int(n as i32))
}

fn to_u32(value: &EnumerationValue) -> Option<ConstValue> {
    value.as_number().map(|n| ConstValue::UInt(n as u32))
}

fn to_f64(value: &EnumerationValue) -> Option<ConstValue> {
    value.as_number().map(ConstValue::Float)
}

fn to_str(value: &EnumerationValue) -> Option<ConstValue> {
    value.as_str().map(|s| ConstValue::Str(s.to_string()))
}
