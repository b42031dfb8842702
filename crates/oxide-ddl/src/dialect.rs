//! Dialect selection by name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::GeneratorOptions;
use crate::error::DdlError;
use crate::generator::{Generator, GenericGenerator, PostgresGenerator, SqliteGenerator};

/// A supported SQL dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// ANSI SQL with no dialect overrides.
    Generic,
    /// SQLite.
    Sqlite,
    /// PostgreSQL.
    Postgres,
}

impl Dialect {
    /// All dialects, in display order.
    pub const ALL: [Self; 3] = [Self::Generic, Self::Sqlite, Self::Postgres];

    /// Returns the canonical dialect name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Sqlite => "sqlite",
            Self::Postgres => "postgres",
        }
    }

    /// Creates a generator for this dialect.
    #[must_use]
    pub fn generator(self, options: GeneratorOptions) -> Box<dyn Generator> {
        match self {
            Self::Generic => Box::new(GenericGenerator::with_options(options)),
            Self::Sqlite => Box::new(SqliteGenerator::with_options(options)),
            Self::Postgres => Box::new(PostgresGenerator::with_options(options)),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = DdlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "generic" | "ansi" => Ok(Self::Generic),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            _ => Err(DdlError::UnknownDialect(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::Operation;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("SQLite".parse::<Dialect>().unwrap(), Dialect::Sqlite);
        assert_eq!("postgresql".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("ansi".parse::<Dialect>().unwrap(), Dialect::Generic);
        assert!(matches!(
            "oracle".parse::<Dialect>(),
            Err(DdlError::UnknownDialect(ref name)) if name == "oracle"
        ));
    }

    #[test]
    fn test_names_round_trip() {
        for dialect in Dialect::ALL {
            assert_eq!(dialect.to_string().parse::<Dialect>().unwrap(), dialect);
        }
    }

    #[test]
    fn test_boxed_generator() {
        let mut g = Dialect::Sqlite.generator(GeneratorOptions::default());
        assert_eq!(g.name(), "sqlite");

        let sql = g
            .generate_all(&[Operation::rename_table("a", "b")])
            .unwrap();
        assert_eq!(sql, vec!["ALTER TABLE a RENAME TO b".to_string()]);
    }
}
