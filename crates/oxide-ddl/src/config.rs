//! Generator configuration.

use serde::{Deserialize, Serialize};

use crate::compatibility::CompatibilityMode;

/// What to do with a foreign key or constraint whose owning table never
/// appears in the operation sequence being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReferencePolicy {
    /// Log a warning and carry on.
    #[default]
    Warn,
    /// Fail the session with
    /// [`DdlError::UnresolvedReference`](crate::DdlError::UnresolvedReference).
    Error,
}

/// Options fixed before a generation session begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GeneratorOptions {
    /// Policy for operations the dialect cannot perform.
    pub compatibility: CompatibilityMode,
    /// Policy for declarations that reference tables outside the session.
    pub unresolved_references: ReferencePolicy,
}

impl GeneratorOptions {
    /// Creates the default options (strict, warn on unresolved references).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compatibility mode.
    #[must_use]
    pub const fn compatibility(mut self, mode: CompatibilityMode) -> Self {
        self.compatibility = mode;
        self
    }

    /// Sets the unresolved-reference policy.
    #[must_use]
    pub const fn unresolved_references(mut self, policy: ReferencePolicy) -> Self {
        self.unresolved_references = policy;
        self
    }
}
