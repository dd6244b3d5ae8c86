//! Error types for meta-model decoding and reference resolution.

use thiserror::Error;

/// Error type for meta-model decoding operations.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The meta-model file could not be read.
    #[error("cannot read meta model '{path}': {source}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON, a shape mismatch, or an unrecognized type kind.
    #[error("invalid meta model at {path}: {message}")]
    Json {
        /// JSON path of the failing node (`.` for the document root).
        path: String,
        /// Decoder message.
        message: String,
    },
}

/// Error type for reference resolution over a decoded meta model.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// An `extends` or `mixins` entry is not a reference type node.
    #[error("structure '{structure}': {relation} #{index} is not a reference")]
    NotAReference {
        /// Structure being resolved.
        structure: String,
        /// Either `"base"` or `"mixin"`.
        relation: &'static str,
        /// Position of the offending entry.
        index: usize,
    },

    /// A referenced name is absent from the name index.
    #[error("unknown type '{name}' referenced from '{context}'")]
    UnknownReference {
        /// Referenced name.
        name: String,
        /// Declaration the reference appears in.
        context: String,
    },

    /// A reference that must name a structure resolves to something else.
    #[error("'{name}' referenced from structure '{structure}' is not a structure")]
    NotAStructure {
        /// Referenced name.
        name: String,
        /// Structure being resolved.
        structure: String,
    },

    /// Circular `extends`/`mixins` chain.
    #[error("circular structure inheritance detected: {path}")]
    CircularReference {
        /// Chain of structure names forming the cycle.
        path: String,
    },
}

impl ParseError {
    /// Creates a JSON decoding error for the given path.
    pub fn json(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Json {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl SchemaError {
    /// Creates an unknown reference error.
    pub fn unknown(name: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnknownReference {
            name: name.into(),
            context: context.into(),
        }
    }
}
