//! Dialect-aware DDL generation for schema migrations.
//!
//! `oxide-ddl` turns an ordered list of schema-change [`Operation`]s into
//! SQL statements for a target database:
//! - A generic generator renders every operation as standard SQL
//! - Dialect generators override only what differs (type names, quoting,
//!   statements the database spells differently)
//! - Operations a dialect cannot perform go through a
//!   [`CompatibilityMode`]: fail in `Strict`, skip with a warning in `Loose`
//!
//! SQLite cannot add foreign keys or constraints to an existing table, so
//! [`SqliteGenerator`] folds independently declared foreign keys and unique
//! constraints into the `CREATE TABLE` (or `ADD COLUMN`) of their owning
//! table.
//!
//! # Example
//!
//! ```rust
//! use oxide_ddl::prelude::*;
//!
//! let operations = vec![
//!     Operation::create_table(
//!         "Users",
//!         vec![
//!             ColumnDefinition::new("id", SqlType::Integer)
//!                 .primary_key()
//!                 .identity(),
//!             ColumnDefinition::new("role_id", SqlType::Integer),
//!         ],
//!     ),
//!     Operation::create_foreign_key(
//!         ForeignKeyDefinition::new("FK_Users_Roles", "Users", "role_id", "Roles", "id")
//!             .on_delete(ForeignKeyRule::Cascade),
//!     ),
//! ];
//!
//! let mut generator = SqliteGenerator::new();
//! let statements = generator.generate_all(&operations).unwrap();
//!
//! assert_eq!(
//!     statements,
//!     vec![
//!         "CREATE TABLE Users (id INTEGER PRIMARY KEY AUTOINCREMENT, role_id INTEGER, \
//!          CONSTRAINT FK_Users_Roles FOREIGN KEY (role_id) REFERENCES Roles (id) \
//!          ON DELETE CASCADE)"
//!             .to_string()
//!     ]
//! );
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Render a JSON operation list for SQLite
//! oxide-ddl render migration.json --dialect sqlite
//!
//! # Skip unsupported operations instead of failing
//! oxide-ddl render migration.json --compatibility loose
//!
//! # List supported dialects
//! oxide-ddl dialects
//! ```

pub mod compatibility;
pub mod config;
pub mod dialect;
pub mod error;
pub mod generator;
pub mod operation;
pub mod quoter;
pub mod schema;

pub use compatibility::CompatibilityMode;
pub use config::{GeneratorOptions, ReferencePolicy};
pub use dialect::Dialect;
pub use error::{DdlError, Result};
pub use generator::{Generator, GenericGenerator, PostgresGenerator, SqliteGenerator};
pub use operation::{Operation, parse_operations};
pub use quoter::Quoter;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::compatibility::CompatibilityMode;
    pub use crate::config::{GeneratorOptions, ReferencePolicy};
    pub use crate::dialect::Dialect;
    pub use crate::error::{DdlError, Result};
    pub use crate::generator::{Generator, GenericGenerator, PostgresGenerator, SqliteGenerator};
    pub use crate::operation::{Operation, parse_operations};
    pub use crate::schema::{
        ColumnDefinition, ConstraintDefinition, ConstraintKind, DefaultValue,
        ForeignKeyDefinition, ForeignKeyRule, IndexDefinition, SequenceDefinition, SqlType,
    };
}
