//! Policy for operations a dialect cannot perform.
//!
//! Every "this dialect cannot do X" path in a generator funnels through
//! [`CompatibilityMode::handle`], so callers see one failure shape no
//! matter which feature is missing.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{DdlError, Result};

/// How unsupported operations are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CompatibilityMode {
    /// Fail with [`DdlError::UnsupportedOperation`].
    #[default]
    Strict,
    /// Log a warning and emit an empty statement.
    Loose,
}

impl CompatibilityMode {
    /// Returns the SQL to emit in place of an unsupported operation.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::UnsupportedOperation`] carrying `message` in
    /// strict mode.
    pub fn handle(self, message: &str) -> Result<String> {
        match self {
            Self::Strict => Err(DdlError::UnsupportedOperation(message.to_string())),
            Self::Loose => {
                warn!(reason = %message, "Skipping unsupported operation");
                Ok(String::new())
            }
        }
    }
}

impl std::str::FromStr for CompatibilityMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "loose" => Ok(Self::Loose),
            other => Err(format!("unknown compatibility mode '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_fails_with_message() {
        let err = CompatibilityMode::Strict
            .handle("Sequences are not supported in SQLite")
            .unwrap_err();
        assert!(matches!(
            err,
            DdlError::UnsupportedOperation(ref m) if m == "Sequences are not supported in SQLite"
        ));
    }

    #[test]
    fn test_loose_returns_empty_statement() {
        let sql = CompatibilityMode::Loose
            .handle("Sequences are not supported in SQLite")
            .unwrap();
        assert!(sql.is_empty());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("LOOSE".parse::<CompatibilityMode>(), Ok(CompatibilityMode::Loose));
        assert_eq!("strict".parse::<CompatibilityMode>(), Ok(CompatibilityMode::Strict));
        assert!("lenient".parse::<CompatibilityMode>().is_err());
    }
}
