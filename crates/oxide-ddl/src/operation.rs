//! Schema-change operations.
//!
//! An [`Operation`] describes one structural change. Callers build an
//! ordered list of them once; a [`Generator`](crate::Generator) renders the
//! list for a particular dialect without reordering it.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::schema::{
    ColumnDefinition, ConstraintDefinition, DefaultValue, ForeignKeyDefinition, IndexDefinition,
    SequenceDefinition,
};

/// Create a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTableOp {
    /// Table name.
    pub name: String,
    /// Column definitions, in declaration order.
    pub columns: Vec<ColumnDefinition>,
}

/// Drop a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTableOp {
    /// Table name.
    pub name: String,
}

/// Rename a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameTableOp {
    /// Current name.
    pub old_name: String,
    /// New name.
    pub new_name: String,
}

/// Add a column to an existing table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateColumnOp {
    /// Column definition; its `table_name` is the target table.
    pub column: ColumnDefinition,
}

/// Change the definition of an existing column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlterColumnOp {
    /// New column definition; its `table_name` is the target table.
    pub column: ColumnDefinition,
}

/// Rename a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameColumnOp {
    /// Table name.
    pub table: String,
    /// Current column name.
    pub old_name: String,
    /// New column name.
    pub new_name: String,
}

/// Drop a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteColumnOp {
    /// Table name.
    pub table: String,
    /// Column name.
    pub column: String,
}

/// Create an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateIndexOp {
    /// Index definition.
    pub index: IndexDefinition,
}

/// Drop an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteIndexOp {
    /// Index name.
    pub name: String,
    /// Table the index belongs to.
    pub table: String,
}

/// Declare a foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateForeignKeyOp {
    /// Foreign key definition.
    pub foreign_key: ForeignKeyDefinition,
}

/// Drop a foreign key by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteForeignKeyOp {
    /// Referencing table.
    pub table: String,
    /// Constraint name.
    pub name: String,
}

/// Declare a named table constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateConstraintOp {
    /// Constraint definition.
    pub constraint: ConstraintDefinition,
}

/// Drop a named table constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteConstraintOp {
    /// Constraint being dropped; its kind selects the statement form.
    pub constraint: ConstraintDefinition,
}

/// Create a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSequenceOp {
    /// Sequence definition.
    pub sequence: SequenceDefinition,
}

/// Drop a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteSequenceOp {
    /// Sequence name.
    pub name: String,
}

/// Set a column default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlterDefaultConstraintOp {
    /// Table name.
    pub table: String,
    /// Column name.
    pub column: String,
    /// New default value.
    pub default: DefaultValue,
}

/// Remove a column default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteDefaultConstraintOp {
    /// Table name.
    pub table: String,
    /// Column name.
    pub column: String,
}

/// Raw SQL passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteSqlOp {
    /// SQL text.
    pub sql: String,
}

/// A single schema-change operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// CREATE TABLE.
    CreateTable(CreateTableOp),
    /// DROP TABLE.
    DeleteTable(DeleteTableOp),
    /// Rename a table.
    RenameTable(RenameTableOp),
    /// ADD COLUMN.
    CreateColumn(CreateColumnOp),
    /// ALTER COLUMN.
    AlterColumn(AlterColumnOp),
    /// RENAME COLUMN.
    RenameColumn(RenameColumnOp),
    /// DROP COLUMN.
    DeleteColumn(DeleteColumnOp),
    /// CREATE INDEX.
    CreateIndex(CreateIndexOp),
    /// DROP INDEX.
    DeleteIndex(DeleteIndexOp),
    /// Add a foreign key.
    CreateForeignKey(CreateForeignKeyOp),
    /// Drop a foreign key.
    DeleteForeignKey(DeleteForeignKeyOp),
    /// Add a named constraint.
    CreateConstraint(CreateConstraintOp),
    /// Drop a named constraint.
    DeleteConstraint(DeleteConstraintOp),
    /// CREATE SEQUENCE.
    CreateSequence(CreateSequenceOp),
    /// DROP SEQUENCE.
    DeleteSequence(DeleteSequenceOp),
    /// SET DEFAULT.
    AlterDefaultConstraint(AlterDefaultConstraintOp),
    /// DROP DEFAULT.
    DeleteDefaultConstraint(DeleteDefaultConstraintOp),
    /// Raw SQL.
    ExecuteSql(ExecuteSqlOp),
}

impl Operation {
    /// Creates a CreateTable operation; every column is assigned to `name`.
    #[must_use]
    pub fn create_table(name: impl Into<String>, columns: Vec<ColumnDefinition>) -> Self {
        let name = name.into();
        let columns = columns
            .into_iter()
            .map(|c| c.in_table(name.clone()))
            .collect();
        Self::CreateTable(CreateTableOp { name, columns })
    }

    /// Creates a DeleteTable operation.
    #[must_use]
    pub fn delete_table(name: impl Into<String>) -> Self {
        Self::DeleteTable(DeleteTableOp { name: name.into() })
    }

    /// Creates a RenameTable operation.
    #[must_use]
    pub fn rename_table(old_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        Self::RenameTable(RenameTableOp {
            old_name: old_name.into(),
            new_name: new_name.into(),
        })
    }

    /// Creates a CreateColumn operation adding `column` to `table`.
    #[must_use]
    pub fn create_column(table: impl Into<String>, column: ColumnDefinition) -> Self {
        Self::CreateColumn(CreateColumnOp {
            column: column.in_table(table),
        })
    }

    /// Creates an AlterColumn operation redefining `column` in `table`.
    #[must_use]
    pub fn alter_column(table: impl Into<String>, column: ColumnDefinition) -> Self {
        Self::AlterColumn(AlterColumnOp {
            column: column.in_table(table),
        })
    }

    /// Creates a RenameColumn operation.
    #[must_use]
    pub fn rename_column(
        table: impl Into<String>,
        old_name: impl Into<String>,
        new_name: impl Into<String>,
    ) -> Self {
        Self::RenameColumn(RenameColumnOp {
            table: table.into(),
            old_name: old_name.into(),
            new_name: new_name.into(),
        })
    }

    /// Creates a DeleteColumn operation.
    #[must_use]
    pub fn delete_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::DeleteColumn(DeleteColumnOp {
            table: table.into(),
            column: column.into(),
        })
    }

    /// Creates a CreateIndex operation.
    #[must_use]
    pub fn create_index(
        name: impl Into<String>,
        table: impl Into<String>,
        columns: Vec<String>,
        unique: bool,
    ) -> Self {
        Self::CreateIndex(CreateIndexOp {
            index: IndexDefinition {
                name: name.into(),
                table_name: table.into(),
                columns,
                unique,
            },
        })
    }

    /// Creates a DeleteIndex operation.
    #[must_use]
    pub fn delete_index(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self::DeleteIndex(DeleteIndexOp {
            name: name.into(),
            table: table.into(),
        })
    }

    /// Creates a CreateForeignKey operation.
    #[must_use]
    pub const fn create_foreign_key(foreign_key: ForeignKeyDefinition) -> Self {
        Self::CreateForeignKey(CreateForeignKeyOp { foreign_key })
    }

    /// Creates a DeleteForeignKey operation.
    #[must_use]
    pub fn delete_foreign_key(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self::DeleteForeignKey(DeleteForeignKeyOp {
            table: table.into(),
            name: name.into(),
        })
    }

    /// Creates a CreateConstraint operation.
    #[must_use]
    pub const fn create_constraint(constraint: ConstraintDefinition) -> Self {
        Self::CreateConstraint(CreateConstraintOp { constraint })
    }

    /// Creates a DeleteConstraint operation.
    #[must_use]
    pub const fn delete_constraint(constraint: ConstraintDefinition) -> Self {
        Self::DeleteConstraint(DeleteConstraintOp { constraint })
    }

    /// Creates a CreateSequence operation.
    #[must_use]
    pub const fn create_sequence(sequence: SequenceDefinition) -> Self {
        Self::CreateSequence(CreateSequenceOp { sequence })
    }

    /// Creates a DeleteSequence operation.
    #[must_use]
    pub fn delete_sequence(name: impl Into<String>) -> Self {
        Self::DeleteSequence(DeleteSequenceOp { name: name.into() })
    }

    /// Creates an AlterDefaultConstraint operation.
    #[must_use]
    pub fn alter_default(
        table: impl Into<String>,
        column: impl Into<String>,
        default: DefaultValue,
    ) -> Self {
        Self::AlterDefaultConstraint(AlterDefaultConstraintOp {
            table: table.into(),
            column: column.into(),
            default,
        })
    }

    /// Creates a DeleteDefaultConstraint operation.
    #[must_use]
    pub fn delete_default(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::DeleteDefaultConstraint(DeleteDefaultConstraintOp {
            table: table.into(),
            column: column.into(),
        })
    }

    /// Creates an ExecuteSql operation.
    #[must_use]
    pub fn execute_sql(sql: impl Into<String>) -> Self {
        Self::ExecuteSql(ExecuteSqlOp { sql: sql.into() })
    }

    /// Returns a human-readable description of this operation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::CreateTable(op) => format!("Create table '{}'", op.name),
            Self::DeleteTable(op) => format!("Delete table '{}'", op.name),
            Self::RenameTable(op) => {
                format!("Rename table '{}' to '{}'", op.old_name, op.new_name)
            }
            Self::CreateColumn(op) => format!(
                "Create column '{}' on table '{}'",
                op.column.name, op.column.table_name
            ),
            Self::AlterColumn(op) => format!(
                "Alter column '{}' on table '{}'",
                op.column.name, op.column.table_name
            ),
            Self::RenameColumn(op) => format!(
                "Rename column '{}' to '{}' on table '{}'",
                op.old_name, op.new_name, op.table
            ),
            Self::DeleteColumn(op) => {
                format!("Delete column '{}' from table '{}'", op.column, op.table)
            }
            Self::CreateIndex(op) => format!(
                "Create index '{}' on table '{}'",
                op.index.name, op.index.table_name
            ),
            Self::DeleteIndex(op) => format!("Delete index '{}'", op.name),
            Self::CreateForeignKey(op) => format!(
                "Create foreign key '{}' on table '{}'",
                op.foreign_key.name, op.foreign_key.foreign_table
            ),
            Self::DeleteForeignKey(op) => {
                format!("Delete foreign key '{}' from table '{}'", op.name, op.table)
            }
            Self::CreateConstraint(op) => format!(
                "Create constraint '{}' on table '{}'",
                op.constraint.name, op.constraint.table_name
            ),
            Self::DeleteConstraint(op) => format!(
                "Delete constraint '{}' from table '{}'",
                op.constraint.name, op.constraint.table_name
            ),
            Self::CreateSequence(op) => format!("Create sequence '{}'", op.sequence.name),
            Self::DeleteSequence(op) => format!("Delete sequence '{}'", op.name),
            Self::AlterDefaultConstraint(op) => {
                format!("Alter default of '{}.{}'", op.table, op.column)
            }
            Self::DeleteDefaultConstraint(op) => {
                format!("Delete default of '{}.{}'", op.table, op.column)
            }
            Self::ExecuteSql(_) => "Execute SQL".to_string(),
        }
    }
}

/// Parses an ordered operation list from JSON.
///
/// Columns inside a `create_table` may omit `table_name`; they are assigned
/// to the table being created.
///
/// # Errors
///
/// Returns [`DdlError::Json`](crate::DdlError::Json) if the input is not a
/// JSON array of operations.
pub fn parse_operations(json: &str) -> Result<Vec<Operation>> {
    let mut operations: Vec<Operation> = serde_json::from_str(json)?;
    for operation in &mut operations {
        if let Operation::CreateTable(op) = operation {
            for column in op.columns.iter_mut().filter(|c| c.table_name.is_empty()) {
                column.table_name.clone_from(&op.name);
            }
        }
    }
    Ok(operations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ForeignKeyRule, SqlType};

    #[test]
    fn test_create_table_assigns_owner() {
        let op = Operation::create_table(
            "users",
            vec![
                ColumnDefinition::new("id", SqlType::Integer).primary_key(),
                ColumnDefinition::new("name", SqlType::Text),
            ],
        );

        match op {
            Operation::CreateTable(t) => {
                assert!(t.columns.iter().all(|c| c.table_name == "users"));
            }
            _ => panic!("Expected CreateTable"),
        }
    }

    #[test]
    fn test_description() {
        let op = Operation::delete_column("users", "email");
        assert_eq!(op.description(), "Delete column 'email' from table 'users'");

        let op = Operation::create_foreign_key(ForeignKeyDefinition::new(
            "fk_posts_users",
            "posts",
            "user_id",
            "users",
            "id",
        ));
        assert_eq!(
            op.description(),
            "Create foreign key 'fk_posts_users' on table 'posts'"
        );
    }

    #[test]
    fn test_parse_operations() {
        let json = r#"[
            {"op": "create_table", "name": "roles", "columns": [
                {"name": "id", "sql_type": "integer", "nullable": false, "primary_key": true}
            ]},
            {"op": "create_foreign_key", "foreign_key": {
                "name": "fk_users_roles",
                "foreign_table": "users", "foreign_columns": ["role_id"],
                "primary_table": "roles", "primary_columns": ["id"],
                "on_delete": "cascade"
            }},
            {"op": "rename_table", "old_name": "roles", "new_name": "groups"}
        ]"#;

        let ops = parse_operations(json).unwrap();
        assert_eq!(ops.len(), 3);
        assert_eq!(
            ops[0],
            Operation::create_table(
                "roles",
                vec![ColumnDefinition::new("id", SqlType::Integer).primary_key()]
            )
        );
        match &ops[1] {
            Operation::CreateForeignKey(op) => {
                assert_eq!(op.foreign_key.on_delete, ForeignKeyRule::Cascade);
                assert_eq!(op.foreign_key.on_update, ForeignKeyRule::NoAction);
            }
            other => panic!("Expected CreateForeignKey, got {other:?}"),
        }
        assert_eq!(ops[2], Operation::rename_table("roles", "groups"));
    }

    #[test]
    fn test_parse_rejects_unknown_operation() {
        let err = parse_operations(r#"[{"op": "truncate_table", "name": "x"}]"#).unwrap_err();
        assert!(err.to_string().starts_with("Serialization error"));
    }
}
