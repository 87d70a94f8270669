//! Error types shared by the path codec, the from-clause builder and the
//! document mutator.

/// Result type for builder operations.
pub type BuilderResult<T> = Result<T, BuilderError>;

/// A class or field id that is not present in the schema index.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaLookupError {
    #[error("Unknown class: '{0}'")]
    UnknownClass(String),

    #[error("Unknown field '{field}' on class '{class}'")]
    UnknownField { class: String, field: String },
}

/// Errors raised while building or mutating a report definition.
///
/// Any operation returning one of these has left the document untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuilderError {
    #[error("Schema lookup failed: {0}")]
    SchemaLookup(#[from] SchemaLookupError),

    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// A report is rooted at a single class; a path starting elsewhere
    /// cannot be merged into its join tree.
    #[error("Path is rooted at '{found}' but the report is rooted at '{expected}'")]
    RootMismatch { expected: String, found: String },

    #[error("Unknown filter operator: '{0}'")]
    UnknownFilterOperator(String),
}

impl BuilderError {
    pub(crate) fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        BuilderError::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for unknown class or field ids.
    pub fn is_schema_lookup(&self) -> bool {
        matches!(self, BuilderError::SchemaLookup(_))
    }
}
