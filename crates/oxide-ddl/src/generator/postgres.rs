//! PostgreSQL generator.

use crate::config::GeneratorOptions;
use crate::error::{DdlError, Result};
use crate::operation::{AlterColumnOp, RenameTableOp};
use crate::quoter::Quoter;
use crate::schema::{ColumnDefinition, SqlType};

use super::Generator;

/// PostgreSQL generator.
///
/// Every operation is supported natively; unquoted identifiers fold to
/// lower case, so mixed-case names are quoted.
#[derive(Debug, Clone)]
pub struct PostgresGenerator {
    options: GeneratorOptions,
    quoter: Quoter,
}

impl Default for PostgresGenerator {
    fn default() -> Self {
        Self::with_options(GeneratorOptions::default())
    }
}

impl PostgresGenerator {
    /// Creates a PostgreSQL generator with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a PostgreSQL generator with the given options.
    #[must_use]
    pub fn with_options(options: GeneratorOptions) -> Self {
        Self {
            options,
            quoter: Quoter::lower_folding(),
        }
    }
}

impl Generator for PostgresGenerator {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn options(&self) -> GeneratorOptions {
        self.options
    }

    fn quoter(&self) -> &Quoter {
        &self.quoter
    }

    fn map_type(&self, sql_type: &SqlType) -> Result<String> {
        Ok(match sql_type {
            SqlType::SmallInt => "SMALLINT".to_string(),
            SqlType::Integer => "INTEGER".to_string(),
            SqlType::BigInt => "BIGINT".to_string(),
            SqlType::Real => "REAL".to_string(),
            SqlType::Double => "DOUBLE PRECISION".to_string(),
            SqlType::Decimal(p, s) => format!("NUMERIC({p}, {s})"),
            SqlType::Char(n) => format!("CHAR({n})"),
            SqlType::Varchar(n) => format!("VARCHAR({n})"),
            SqlType::Text => "TEXT".to_string(),
            SqlType::Boolean => "BOOLEAN".to_string(),
            SqlType::Date => "DATE".to_string(),
            SqlType::Time => "TIME".to_string(),
            SqlType::Timestamp => "TIMESTAMP".to_string(),
            SqlType::Blob | SqlType::Binary(_) => "BYTEA".to_string(),
            SqlType::Json => "JSONB".to_string(),
            SqlType::Uuid => "UUID".to_string(),
            SqlType::Custom(name) => name.clone(),
        })
    }

    fn column_type(&self, column: &ColumnDefinition) -> Result<String> {
        if !column.identity {
            return self.map_type(&column.sql_type);
        }
        match column.sql_type {
            SqlType::SmallInt => Ok("SMALLSERIAL".to_string()),
            SqlType::Integer => Ok("SERIAL".to_string()),
            SqlType::BigInt => Ok("BIGSERIAL".to_string()),
            ref other => Err(DdlError::UnsupportedType {
                dialect: self.name(),
                sql_type: format!("identity {other:?}"),
            }),
        }
    }

    fn identity_clause(&self, _column: &ColumnDefinition) -> Result<Option<String>> {
        // SERIAL types imply it.
        Ok(None)
    }

    fn rename_table(&self, op: &RenameTableOp) -> Result<String> {
        Ok(format!(
            "ALTER TABLE {} RENAME TO {}",
            self.quoter.quote(&op.old_name),
            self.quoter.quote(&op.new_name)
        ))
    }

    fn alter_column(&self, op: &AlterColumnOp) -> Result<String> {
        let column = &op.column;
        column.validate()?;

        let name = self.quoter.quote(&column.name);
        let mut actions = vec![format!(
            "ALTER COLUMN {name} TYPE {}",
            self.map_type(&column.sql_type)?
        )];
        if column.nullable {
            actions.push(format!("ALTER COLUMN {name} DROP NOT NULL"));
        } else {
            actions.push(format!("ALTER COLUMN {name} SET NOT NULL"));
        }
        match column.default {
            Some(ref default) => actions.push(format!(
                "ALTER COLUMN {name} SET DEFAULT {}",
                self.render_default(default)
            )),
            None => actions.push(format!("ALTER COLUMN {name} DROP DEFAULT")),
        }

        Ok(format!(
            "ALTER TABLE {} {}",
            self.quoter.quote(&column.table_name),
            actions.join(", ")
        ))
    }
}
