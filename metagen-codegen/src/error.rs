//! Error types for code generation.

use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Meta-model decoding error.
    #[error("meta model parse error: {0}")]
    Parse(#[from] metagen_schema::ParseError),

    /// Reference resolution error.
    #[error("reference resolution error: {0}")]
    Schema(#[from] metagen_schema::SchemaError),

    /// Enumeration declares a base type outside the supported set.
    #[error("enumeration '{enumeration}': unsupported base type '{base}'")]
    UnsupportedBaseType {
        /// Enumeration name.
        enumeration: String,
        /// Declared base type name (or type kind when not a base type).
        base: String,
    },

    /// Enumeration entry value does not fit the declared base type.
    #[error("enumeration '{enumeration}': value of entry '{entry}' is not a valid {base}")]
    EnumValueMismatch {
        /// Enumeration name.
        enumeration: String,
        /// Entry name.
        entry: String,
        /// Declared base type name.
        base: String,
    },

    /// A base type node names an unknown primitive.
    #[error("unsupported base type '{name}' in '{context}'")]
    UnsupportedPrimitive {
        /// Base type name.
        name: String,
        /// Declaration being mapped.
        context: String,
    },

    /// Rendering error.
    #[error("render error: {message}")]
    Render {
        /// Error message.
        message: String,
    },
}

impl CodegenError {
    /// Creates a render error with the given message.
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }
}
