//! Error types for DDL generation.

/// Errors that can occur while rendering schema-change operations.
#[derive(Debug, thiserror::Error)]
pub enum DdlError {
    /// The active dialect cannot express the requested change.
    ///
    /// Raised through [`CompatibilityMode::Strict`](crate::CompatibilityMode::Strict);
    /// the message is meant to be reported to the user verbatim.
    #[error("{0}")]
    UnsupportedOperation(String),

    /// A definition object violates one of its invariants.
    #[error("Malformed definition: {0}")]
    MalformedDefinition(String),

    /// A foreign key or constraint names a table that never appears in
    /// the operation sequence being rendered.
    #[error("Unresolved {kind} '{name}': table '{table}' is not created in this session")]
    UnresolvedReference {
        /// What kind of declaration could not be resolved.
        kind: &'static str,
        /// Constraint name.
        name: String,
        /// The owning table that was never created.
        table: String,
    },

    /// A column type cannot be represented by the dialect's type mapping.
    #[error("Type {sql_type} is not supported by the {dialect} dialect")]
    UnsupportedType {
        /// Dialect name.
        dialect: &'static str,
        /// Debug rendering of the offending type.
        sql_type: String,
    },

    /// No generator is registered under the requested dialect name.
    #[error("Unknown dialect: {0}")]
    UnknownDialect(String),

    /// Operation list could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DdlError {
    /// Returns true if this error reports a dialect limitation rather than
    /// a caller mistake.
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedOperation(_) | Self::UnsupportedType { .. }
        )
    }
}

/// Result type for DDL generation.
pub type Result<T> = std::result::Result<T, DdlError>;
