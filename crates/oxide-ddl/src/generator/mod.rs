//! SQL generation for schema-change operations.
//!
//! [`Generator`] has one rendering method per operation kind. Every method
//! has a default that produces dialect-neutral SQL (see [`generic`]); a
//! dialect overrides only the kinds that differ and delegates the rest.

pub mod generic;
mod postgres;
mod sqlite;

pub use generic::GenericGenerator;
pub use postgres::PostgresGenerator;
pub use sqlite::SqliteGenerator;

use tracing::debug;

use crate::compatibility::CompatibilityMode;
use crate::config::GeneratorOptions;
use crate::error::Result;
use crate::operation::{
    AlterColumnOp, AlterDefaultConstraintOp, CreateColumnOp, CreateConstraintOp,
    CreateForeignKeyOp, CreateIndexOp, CreateSequenceOp, CreateTableOp, DeleteColumnOp,
    DeleteConstraintOp, DeleteDefaultConstraintOp, DeleteForeignKeyOp, DeleteIndexOp,
    DeleteSequenceOp, DeleteTableOp, Operation, RenameColumnOp, RenameTableOp,
};
use crate::quoter::Quoter;
use crate::schema::{
    ColumnDefinition, ConstraintDefinition, DefaultValue, ForeignKeyDefinition, SqlType,
};

/// Dialect-specific SQL generation.
///
/// Rendering methods take `&self` and are pure. State that depends on the
/// whole operation sequence (such as foreign keys that must be folded into
/// a `CREATE TABLE`) is collected by [`Generator::begin_session`], which
/// [`Generator::generate_all`] calls before rendering anything.
pub trait Generator {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Returns the options this generator was configured with.
    fn options(&self) -> GeneratorOptions;

    /// Returns the identifier quoter.
    fn quoter(&self) -> &Quoter;

    /// Maps a type descriptor to the dialect's type name.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::UnsupportedType`](crate::DdlError::UnsupportedType)
    /// if the dialect has no representation for `sql_type`.
    fn map_type(&self, sql_type: &SqlType) -> Result<String>;

    /// Returns the compatibility mode for unsupported operations.
    fn compatibility(&self) -> CompatibilityMode {
        self.options().compatibility
    }

    /// Prepares a fresh generation session for `operations`.
    ///
    /// # Errors
    ///
    /// Dialects that resolve cross references here may fail with
    /// [`DdlError::UnresolvedReference`](crate::DdlError::UnresolvedReference).
    fn begin_session(&mut self, operations: &[Operation]) -> Result<()> {
        let _ = operations;
        Ok(())
    }

    /// Renders an ordered operation sequence in one session.
    ///
    /// Empty statements (operations skipped in loose mode, or declarations
    /// folded into another statement) are dropped from the output.
    ///
    /// # Errors
    ///
    /// Fails on the first operation that cannot be rendered.
    fn generate_all(&mut self, operations: &[Operation]) -> Result<Vec<String>> {
        self.begin_session(operations)?;

        let mut statements = Vec::with_capacity(operations.len());
        for operation in operations {
            let sql = self.generate(operation)?;
            if sql.is_empty() {
                debug!(
                    dialect = self.name(),
                    operation = %operation.description(),
                    "No statement emitted"
                );
                continue;
            }
            debug!(dialect = self.name(), sql = %sql, "Generated SQL");
            statements.push(sql);
        }
        Ok(statements)
    }

    /// Renders a single operation.
    ///
    /// # Errors
    ///
    /// Fails if the operation is malformed, uses a type the dialect cannot
    /// represent, or is unsupported under strict compatibility.
    fn generate(&self, operation: &Operation) -> Result<String> {
        match operation {
            Operation::CreateTable(op) => self.create_table(op),
            Operation::DeleteTable(op) => self.delete_table(op),
            Operation::RenameTable(op) => self.rename_table(op),
            Operation::CreateColumn(op) => self.create_column(op),
            Operation::AlterColumn(op) => self.alter_column(op),
            Operation::RenameColumn(op) => self.rename_column(op),
            Operation::DeleteColumn(op) => self.delete_column(op),
            Operation::CreateIndex(op) => self.create_index(op),
            Operation::DeleteIndex(op) => self.delete_index(op),
            Operation::CreateForeignKey(op) => self.create_foreign_key(op),
            Operation::DeleteForeignKey(op) => self.delete_foreign_key(op),
            Operation::CreateConstraint(op) => self.create_constraint(op),
            Operation::DeleteConstraint(op) => self.delete_constraint(op),
            Operation::CreateSequence(op) => self.create_sequence(op),
            Operation::DeleteSequence(op) => self.delete_sequence(op),
            Operation::AlterDefaultConstraint(op) => self.alter_default(op),
            Operation::DeleteDefaultConstraint(op) => self.delete_default(op),
            Operation::ExecuteSql(op) => Ok(op.sql.clone()),
        }
    }

    /// Generates SQL for CREATE TABLE.
    ///
    /// # Errors
    ///
    /// See [`Generator::generate`].
    fn create_table(&self, op: &CreateTableOp) -> Result<String> {
        generic::create_table(self, op)
    }

    /// Generates SQL for DROP TABLE.
    ///
    /// # Errors
    ///
    /// See [`Generator::generate`].
    fn delete_table(&self, op: &DeleteTableOp) -> Result<String> {
        Ok(generic::delete_table(self, op))
    }

    /// Generates SQL for renaming a table.
    ///
    /// # Errors
    ///
    /// See [`Generator::generate`].
    fn rename_table(&self, op: &RenameTableOp) -> Result<String> {
        Ok(generic::rename_table(self, op))
    }

    /// Generates SQL for ADD COLUMN.
    ///
    /// # Errors
    ///
    /// See [`Generator::generate`].
    fn create_column(&self, op: &CreateColumnOp) -> Result<String> {
        generic::create_column(self, op)
    }

    /// Generates SQL for ALTER COLUMN.
    ///
    /// # Errors
    ///
    /// See [`Generator::generate`].
    fn alter_column(&self, op: &AlterColumnOp) -> Result<String> {
        generic::alter_column(self, op)
    }

    /// Generates SQL for RENAME COLUMN.
    ///
    /// # Errors
    ///
    /// See [`Generator::generate`].
    fn rename_column(&self, op: &RenameColumnOp) -> Result<String> {
        Ok(generic::rename_column(self, op))
    }

    /// Generates SQL for DROP COLUMN.
    ///
    /// # Errors
    ///
    /// See [`Generator::generate`].
    fn delete_column(&self, op: &DeleteColumnOp) -> Result<String> {
        Ok(generic::delete_column(self, op))
    }

    /// Generates SQL for CREATE INDEX.
    ///
    /// # Errors
    ///
    /// See [`Generator::generate`].
    fn create_index(&self, op: &CreateIndexOp) -> Result<String> {
        generic::create_index(self, op)
    }

    /// Generates SQL for DROP INDEX.
    ///
    /// # Errors
    ///
    /// See [`Generator::generate`].
    fn delete_index(&self, op: &DeleteIndexOp) -> Result<String> {
        Ok(generic::delete_index(self, op))
    }

    /// Generates SQL for adding a foreign key to an existing table.
    ///
    /// # Errors
    ///
    /// See [`Generator::generate`].
    fn create_foreign_key(&self, op: &CreateForeignKeyOp) -> Result<String> {
        generic::create_foreign_key(self, op)
    }

    /// Generates SQL for dropping a foreign key.
    ///
    /// # Errors
    ///
    /// See [`Generator::generate`].
    fn delete_foreign_key(&self, op: &DeleteForeignKeyOp) -> Result<String> {
        Ok(generic::delete_foreign_key(self, op))
    }

    /// Generates SQL for adding a named constraint.
    ///
    /// # Errors
    ///
    /// See [`Generator::generate`].
    fn create_constraint(&self, op: &CreateConstraintOp) -> Result<String> {
        generic::create_constraint(self, op)
    }

    /// Generates SQL for dropping a named constraint.
    ///
    /// # Errors
    ///
    /// See [`Generator::generate`].
    fn delete_constraint(&self, op: &DeleteConstraintOp) -> Result<String> {
        Ok(generic::delete_constraint(self, op))
    }

    /// Generates SQL for CREATE SEQUENCE.
    ///
    /// # Errors
    ///
    /// See [`Generator::generate`].
    fn create_sequence(&self, op: &CreateSequenceOp) -> Result<String> {
        Ok(generic::create_sequence(self, op))
    }

    /// Generates SQL for DROP SEQUENCE.
    ///
    /// # Errors
    ///
    /// See [`Generator::generate`].
    fn delete_sequence(&self, op: &DeleteSequenceOp) -> Result<String> {
        Ok(generic::delete_sequence(self, op))
    }

    /// Generates SQL for setting a column default.
    ///
    /// # Errors
    ///
    /// See [`Generator::generate`].
    fn alter_default(&self, op: &AlterDefaultConstraintOp) -> Result<String> {
        Ok(generic::alter_default(self, op))
    }

    /// Generates SQL for removing a column default.
    ///
    /// # Errors
    ///
    /// See [`Generator::generate`].
    fn delete_default(&self, op: &DeleteDefaultConstraintOp) -> Result<String> {
        Ok(generic::delete_default(self, op))
    }

    /// Generates a column definition as used inside CREATE TABLE and
    /// ADD COLUMN.
    ///
    /// # Errors
    ///
    /// Fails if the column is malformed or its type cannot be mapped.
    fn column_definition(&self, column: &ColumnDefinition) -> Result<String> {
        generic::column_definition(self, column)
    }

    /// Returns the type name used for `column`, which may depend on more
    /// than its type descriptor (e.g. identity columns).
    ///
    /// # Errors
    ///
    /// See [`Generator::map_type`].
    fn column_type(&self, column: &ColumnDefinition) -> Result<String> {
        self.map_type(&column.sql_type)
    }

    /// Returns the clause marking `column` as an identity column, or `None`
    /// when the type already implies it.
    ///
    /// # Errors
    ///
    /// Dialects with restrictions on identity columns report them through
    /// the compatibility mode.
    fn identity_clause(&self, column: &ColumnDefinition) -> Result<Option<String>> {
        let _ = column;
        Ok(Some("GENERATED BY DEFAULT AS IDENTITY".to_string()))
    }

    /// Renders a default value literal.
    fn render_default(&self, default: &DefaultValue) -> String {
        generic::render_default(self, default)
    }

    /// Renders a `CONSTRAINT name FOREIGN KEY (...) REFERENCES ...` clause.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::MalformedDefinition`](crate::DdlError::MalformedDefinition)
    /// if the column lists are empty or differ in length.
    fn foreign_key_clause(&self, foreign_key: &ForeignKeyDefinition) -> Result<String> {
        generic::foreign_key_clause(self, foreign_key)
    }

    /// Renders a `CONSTRAINT name UNIQUE (...)` or `PRIMARY KEY` clause.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::MalformedDefinition`](crate::DdlError::MalformedDefinition)
    /// if the constraint has no columns.
    fn constraint_clause(&self, constraint: &ConstraintDefinition) -> Result<String> {
        generic::constraint_clause(self, constraint)
    }
}
