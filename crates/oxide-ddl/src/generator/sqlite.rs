//! SQLite generator.
//!
//! SQLite accepts foreign keys and table constraints only inside the
//! original `CREATE TABLE`, and has no `ALTER COLUMN`, sequences or column
//! defaults that can be changed later. Callers still declare foreign keys
//! and constraints as separate operations (as they would for dialects with
//! `ALTER TABLE ... ADD CONSTRAINT`), so a session first collects every such
//! declaration and then splices each one into the statement that creates
//! its owning table or column.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::config::{GeneratorOptions, ReferencePolicy};
use crate::error::{DdlError, Result};
use crate::operation::{
    AlterColumnOp, AlterDefaultConstraintOp, CreateColumnOp, CreateConstraintOp,
    CreateForeignKeyOp, CreateSequenceOp, CreateTableOp, DeleteColumnOp, DeleteConstraintOp,
    DeleteDefaultConstraintOp, DeleteForeignKeyOp, DeleteSequenceOp, Operation, RenameColumnOp,
    RenameTableOp,
};
use crate::quoter::Quoter;
use crate::schema::{
    ColumnDefinition, ConstraintDefinition, DefaultValue, ForeignKeyDefinition, SqlType,
};

use super::{Generator, generic};

/// Declarations collected for one generation session.
#[derive(Debug, Clone, Default)]
struct PendingRegistry {
    foreign_keys: Vec<ForeignKeyDefinition>,
    constraints: Vec<ConstraintDefinition>,
    created_tables: HashSet<String>,
    added_columns: HashSet<(String, String)>,
}

impl PendingRegistry {
    fn collect(operations: &[Operation]) -> Self {
        let mut registry = Self::default();
        for operation in operations {
            match operation {
                Operation::CreateTable(op) => {
                    registry.created_tables.insert(op.name.clone());
                }
                Operation::CreateColumn(op) => {
                    registry
                        .added_columns
                        .insert((op.column.table_name.clone(), op.column.name.clone()));
                }
                Operation::CreateForeignKey(op) => {
                    registry.foreign_keys.push(op.foreign_key.clone());
                }
                Operation::CreateConstraint(op) => {
                    registry.constraints.push(op.constraint.clone());
                }
                _ => {}
            }
        }
        registry
    }

    /// True if `fk`'s leading column is added by a CreateColumn in this
    /// session, which then owns the inline clause.
    fn attaches_to_added_column(&self, fk: &ForeignKeyDefinition) -> bool {
        fk.leading_column().is_some_and(|column| {
            self.added_columns
                .contains(&(fk.foreign_table.clone(), column.to_string()))
        })
    }

    /// First pending foreign key whose leading column is `table.column`.
    fn first_foreign_key_on(&self, table: &str, column: &str) -> Option<&ForeignKeyDefinition> {
        self.foreign_keys
            .iter()
            .find(|fk| fk.foreign_table == table && fk.leading_column() == Some(column))
    }

    /// True if `fk`'s owning table is created, or its leading column added,
    /// in this session.
    fn owner_in_session(&self, fk: &ForeignKeyDefinition) -> bool {
        self.created_tables.contains(&fk.foreign_table) || self.attaches_to_added_column(fk)
    }

    /// True if `fk` will be rendered inside a CREATE TABLE or ADD COLUMN
    /// of this session. An ADD COLUMN carries only the first key on its
    /// column.
    fn inlines_foreign_key(&self, fk: &ForeignKeyDefinition) -> bool {
        if !self.foreign_keys.contains(fk) {
            return false;
        }
        if self.attaches_to_added_column(fk) {
            return fk.leading_column().is_some_and(|column| {
                self.first_foreign_key_on(&fk.foreign_table, column) == Some(fk)
            });
        }
        self.created_tables.contains(&fk.foreign_table)
    }

    /// True if `constraint` covers a column added by a CreateColumn in this
    /// session, which CREATE TABLE cannot reference yet.
    fn covers_added_column(&self, constraint: &ConstraintDefinition) -> bool {
        constraint.columns.iter().any(|column| {
            self.added_columns
                .contains(&(constraint.table_name.clone(), column.clone()))
        })
    }

    /// True if `constraint` will be rendered inside a CREATE TABLE of this
    /// session.
    fn inlines_constraint(&self, constraint: &ConstraintDefinition) -> bool {
        self.constraints.contains(constraint)
            && self.created_tables.contains(&constraint.table_name)
            && !self.covers_added_column(constraint)
    }
}

/// SQLite generator.
#[derive(Debug, Clone, Default)]
pub struct SqliteGenerator {
    options: GeneratorOptions,
    quoter: Quoter,
    pending: PendingRegistry,
}

impl SqliteGenerator {
    /// Creates a SQLite generator with default (strict) options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a SQLite generator with the given options.
    #[must_use]
    pub fn with_options(options: GeneratorOptions) -> Self {
        Self {
            options,
            quoter: Quoter::case_preserving(),
            pending: PendingRegistry::default(),
        }
    }

    /// Registers a foreign key to be inlined into the CREATE TABLE or ADD
    /// COLUMN of its referencing table.
    ///
    /// [`Generator::generate_all`] does this automatically for every
    /// CreateForeignKey in the sequence; call it directly only when
    /// rendering operations one at a time.
    pub fn register_foreign_key(&mut self, foreign_key: ForeignKeyDefinition) {
        self.pending.foreign_keys.push(foreign_key);
    }

    /// Registers a constraint to be inlined into the CREATE TABLE of its
    /// owning table.
    pub fn register_constraint(&mut self, constraint: ConstraintDefinition) {
        self.pending.constraints.push(constraint);
    }

    /// Foreign key clauses for a new table: one per column in column order,
    /// then table-level keys whose leading column is not part of the table,
    /// in declaration order. Keys on columns added later in the session
    /// belong to their ADD COLUMN.
    fn inline_foreign_keys(&self, op: &CreateTableOp) -> Result<Vec<String>> {
        let fks = &self.pending.foreign_keys;
        let mut rendered = vec![false; fks.len()];
        let mut clauses = Vec::new();

        for column in &op.columns {
            let found = fks.iter().enumerate().find(|(i, fk)| {
                !rendered[*i]
                    && fk.foreign_table == op.name
                    && fk.leading_column() == Some(column.name.as_str())
                    && !self.pending.attaches_to_added_column(fk)
            });
            if let Some((i, fk)) = found {
                rendered[i] = true;
                clauses.push(self.foreign_key_clause(fk)?);
            }
        }

        for (i, fk) in fks.iter().enumerate() {
            if !rendered[i]
                && fk.foreign_table == op.name
                && !self.pending.attaches_to_added_column(fk)
            {
                rendered[i] = true;
                clauses.push(self.foreign_key_clause(fk)?);
            }
        }

        Ok(clauses)
    }

    /// Constraint clauses for a new table, in declaration order. Constraints
    /// over columns added later in the session are left to
    /// [`Generator::create_constraint`].
    fn inline_constraints(&self, table: &str) -> Result<Vec<String>> {
        self.pending
            .constraints
            .iter()
            .filter(|c| c.table_name == table && !self.pending.covers_added_column(c))
            .map(|c| self.constraint_clause(c))
            .collect()
    }

    /// Applies the unresolved-reference policy to declarations whose owning
    /// table never appears in the session.
    fn check_references(&self) -> Result<()> {
        let unresolved_fks = self
            .pending
            .foreign_keys
            .iter()
            .filter(|fk| !self.pending.owner_in_session(fk))
            .map(|fk| ("foreign key", &fk.name, &fk.foreign_table));
        let unresolved_constraints = self
            .pending
            .constraints
            .iter()
            .filter(|c| {
                !c.is_unique() && !self.pending.created_tables.contains(&c.table_name)
            })
            .map(|c| ("constraint", &c.name, &c.table_name));

        for (kind, name, table) in unresolved_fks.chain(unresolved_constraints) {
            match self.options.unresolved_references {
                ReferencePolicy::Warn => {
                    warn!(
                        dialect = self.name(),
                        kind,
                        name = %name,
                        table = %table,
                        "Declaration references a table that is not created in this session"
                    );
                }
                ReferencePolicy::Error => {
                    return Err(DdlError::UnresolvedReference {
                        kind,
                        name: name.clone(),
                        table: table.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl Generator for SqliteGenerator {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn options(&self) -> GeneratorOptions {
        self.options
    }

    fn quoter(&self) -> &Quoter {
        &self.quoter
    }

    fn map_type(&self, sql_type: &SqlType) -> Result<String> {
        // Storage affinities; everything is representable.
        Ok(match sql_type {
            SqlType::SmallInt | SqlType::Integer | SqlType::BigInt | SqlType::Boolean => {
                "INTEGER".to_string()
            }
            SqlType::Real | SqlType::Double => "REAL".to_string(),
            SqlType::Decimal(_, _) => "NUMERIC".to_string(),
            SqlType::Char(_)
            | SqlType::Varchar(_)
            | SqlType::Text
            | SqlType::Date
            | SqlType::Time
            | SqlType::Timestamp
            | SqlType::Json
            | SqlType::Uuid => "TEXT".to_string(),
            SqlType::Blob | SqlType::Binary(_) => "BLOB".to_string(),
            SqlType::Custom(name) => name.clone(),
        })
    }

    fn begin_session(&mut self, operations: &[Operation]) -> Result<()> {
        self.pending = PendingRegistry::collect(operations);
        debug!(
            dialect = self.name(),
            foreign_keys = self.pending.foreign_keys.len(),
            constraints = self.pending.constraints.len(),
            "Collected pending declarations"
        );
        self.check_references()
    }

    fn create_table(&self, op: &CreateTableOp) -> Result<String> {
        let sql = generic::create_table(self, op)?;

        let mut clauses = self.inline_foreign_keys(op)?;
        clauses.extend(self.inline_constraints(&op.name)?);
        if clauses.is_empty() {
            return Ok(sql);
        }

        let Some(head) = sql.strip_suffix(')') else {
            return Err(DdlError::MalformedDefinition(format!(
                "CREATE TABLE for '{}' does not end with a column list",
                op.name
            )));
        };
        Ok(format!("{head}, {})", clauses.join(", ")))
    }

    fn rename_table(&self, op: &RenameTableOp) -> Result<String> {
        Ok(format!(
            "ALTER TABLE {} RENAME TO {}",
            self.quoter.quote(&op.old_name),
            self.quoter.quote(&op.new_name)
        ))
    }

    fn create_column(&self, op: &CreateColumnOp) -> Result<String> {
        let sql = generic::create_column(self, op)?;
        let column = &op.column;
        match self
            .pending
            .first_foreign_key_on(&column.table_name, &column.name)
        {
            Some(fk) => Ok(format!("{sql} {}", self.foreign_key_clause(fk)?)),
            None => Ok(sql),
        }
    }

    fn alter_column(&self, op: &AlterColumnOp) -> Result<String> {
        self.compatibility().handle(&format!(
            "SQLite does not support altering column {}.{}",
            op.column.table_name, op.column.name
        ))
    }

    fn rename_column(&self, op: &RenameColumnOp) -> Result<String> {
        self.compatibility().handle(&format!(
            "SQLite does not support renaming column {}.{}",
            op.table, op.old_name
        ))
    }

    fn delete_column(&self, op: &DeleteColumnOp) -> Result<String> {
        self.compatibility().handle(&format!(
            "SQLite does not support deleting column {}.{}",
            op.table, op.column
        ))
    }

    fn create_foreign_key(&self, op: &CreateForeignKeyOp) -> Result<String> {
        let fk = &op.foreign_key;
        fk.validate()?;
        if self.pending.inlines_foreign_key(fk) {
            debug!(
                dialect = self.name(),
                name = %fk.name,
                table = %fk.foreign_table,
                "Foreign key inlined into table definition"
            );
            return Ok(String::new());
        }
        if self.pending.attaches_to_added_column(fk) {
            return self.compatibility().handle(&format!(
                "SQLite columns can carry only one foreign key when added \
                 (foreign key {} on {}.{})",
                fk.name,
                fk.foreign_table,
                fk.leading_column().unwrap_or_default()
            ));
        }
        self.compatibility().handle(&format!(
            "SQLite foreign keys can only be added when the table is created \
             (foreign key {} on {})",
            fk.name, fk.foreign_table
        ))
    }

    fn delete_foreign_key(&self, op: &DeleteForeignKeyOp) -> Result<String> {
        self.compatibility().handle(&format!(
            "SQLite foreign keys can only be deleted together with their table \
             (foreign key {} on {})",
            op.name, op.table
        ))
    }

    fn create_constraint(&self, op: &CreateConstraintOp) -> Result<String> {
        let constraint = &op.constraint;
        constraint.validate()?;
        if self.pending.inlines_constraint(constraint) {
            debug!(
                dialect = self.name(),
                name = %constraint.name,
                table = %constraint.table_name,
                "Constraint inlined into table definition"
            );
            return Ok(String::new());
        }
        if constraint.is_unique() {
            return Ok(format!(
                "CREATE UNIQUE INDEX {} ON {} ({})",
                self.quoter.quote(&constraint.name),
                self.quoter.quote(&constraint.table_name),
                self.quoter.quote_list(&constraint.columns)
            ));
        }
        self.compatibility().handle(&format!(
            "SQLite primary keys can only be declared when the table is created \
             (constraint {} on {})",
            constraint.name, constraint.table_name
        ))
    }

    fn delete_constraint(&self, op: &DeleteConstraintOp) -> Result<String> {
        let constraint = &op.constraint;
        if constraint.is_unique() && self.pending.inlines_constraint(constraint) {
            return self.compatibility().handle(&format!(
                "SQLite unique constraints declared in CREATE TABLE can only be deleted \
                 together with their table (constraint {} on {})",
                constraint.name, constraint.table_name
            ));
        }
        if constraint.is_unique() {
            return Ok(format!("DROP INDEX {}", self.quoter.quote(&constraint.name)));
        }
        self.compatibility().handle(&format!(
            "SQLite primary keys can only be deleted together with their table \
             (constraint {} on {})",
            constraint.name, constraint.table_name
        ))
    }

    fn create_sequence(&self, op: &CreateSequenceOp) -> Result<String> {
        self.compatibility().handle(&format!(
            "SQLite does not support sequences (cannot create {})",
            op.sequence.name
        ))
    }

    fn delete_sequence(&self, op: &DeleteSequenceOp) -> Result<String> {
        self.compatibility().handle(&format!(
            "SQLite does not support sequences (cannot delete {})",
            op.name
        ))
    }

    fn alter_default(&self, op: &AlterDefaultConstraintOp) -> Result<String> {
        self.compatibility().handle(&format!(
            "SQLite does not support altering the default of {}.{}",
            op.table, op.column
        ))
    }

    fn delete_default(&self, op: &DeleteDefaultConstraintOp) -> Result<String> {
        self.compatibility().handle(&format!(
            "SQLite does not support deleting the default of {}.{}",
            op.table, op.column
        ))
    }

    fn identity_clause(&self, column: &ColumnDefinition) -> Result<Option<String>> {
        if column.primary_key && self.map_type(&column.sql_type)? == "INTEGER" {
            return Ok(Some("AUTOINCREMENT".to_string()));
        }
        self.compatibility()
            .handle(&format!(
                "SQLite only supports AUTOINCREMENT on a single INTEGER PRIMARY KEY \
                 (column {}.{})",
                column.table_name, column.name
            ))
            .map(|_| None)
    }

    fn render_default(&self, default: &DefaultValue) -> String {
        match default {
            DefaultValue::Bool(b) => (if *b { "1" } else { "0" }).to_string(),
            // Function calls in a default must be parenthesized.
            DefaultValue::Expression(expr) if !expr.starts_with('(') => format!("({expr})"),
            other => generic::render_default(self, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compatibility::CompatibilityMode;
    use crate::schema::ForeignKeyRule;

    fn loose() -> SqliteGenerator {
        SqliteGenerator::with_options(
            GeneratorOptions::new().compatibility(CompatibilityMode::Loose),
        )
    }

    fn users_table() -> Operation {
        Operation::create_table(
            "Users",
            vec![
                ColumnDefinition::new("id", SqlType::Integer)
                    .primary_key()
                    .identity(),
                ColumnDefinition::new("name", SqlType::Varchar(100)).not_null(),
                ColumnDefinition::new("role_id", SqlType::Integer),
            ],
        )
    }

    #[test]
    fn test_sqlite_data_types() {
        let g = SqliteGenerator::new();
        assert_eq!(g.map_type(&SqlType::BigInt).unwrap(), "INTEGER");
        assert_eq!(g.map_type(&SqlType::Boolean).unwrap(), "INTEGER");
        assert_eq!(g.map_type(&SqlType::Varchar(255)).unwrap(), "TEXT");
        assert_eq!(g.map_type(&SqlType::Uuid).unwrap(), "TEXT");
        assert_eq!(g.map_type(&SqlType::Decimal(10, 2)).unwrap(), "NUMERIC");
        assert_eq!(g.map_type(&SqlType::Blob).unwrap(), "BLOB");
    }

    #[test]
    fn test_create_table_without_pending() {
        let sql = SqliteGenerator::new().generate(&users_table()).unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE Users (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL, \
             role_id INTEGER)"
        );
    }

    #[test]
    fn test_registered_foreign_key_is_spliced() {
        let mut g = SqliteGenerator::new();
        g.register_foreign_key(
            ForeignKeyDefinition::new("FK_Users_Roles", "Users", "role_id", "Roles", "id")
                .on_delete(ForeignKeyRule::Cascade),
        );

        let sql = g.generate(&users_table()).unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE Users (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL, \
             role_id INTEGER, CONSTRAINT FK_Users_Roles FOREIGN KEY (role_id) REFERENCES Roles (id) \
             ON DELETE CASCADE)"
        );
    }

    #[test]
    fn test_foreign_keys_follow_column_order() {
        let mut g = SqliteGenerator::new();
        g.register_foreign_key(ForeignKeyDefinition::new(
            "fk_b", "t", "b_id", "b", "id",
        ));
        g.register_foreign_key(ForeignKeyDefinition::new(
            "fk_a", "t", "a_id", "a", "id",
        ));

        let op = Operation::create_table(
            "t",
            vec![
                ColumnDefinition::new("a_id", SqlType::Integer),
                ColumnDefinition::new("b_id", SqlType::Integer),
            ],
        );
        let sql = g.generate(&op).unwrap();
        let a = sql.find("fk_a").unwrap();
        let b = sql.find("fk_b").unwrap();
        assert!(a < b, "foreign keys should follow column order: {sql}");
    }

    #[test]
    fn test_constraints_only_for_owning_table() {
        let mut g = SqliteGenerator::new();
        g.register_constraint(ConstraintDefinition::unique(
            "uq_other",
            "Other",
            vec!["x".into()],
        ));

        let sql = g.generate(&users_table()).unwrap();
        assert!(!sql.contains("uq_other"));
        assert!(sql.ends_with("role_id INTEGER)"));
    }

    #[test]
    fn test_create_column_with_foreign_key() {
        let mut g = SqliteGenerator::new();
        g.register_foreign_key(ForeignKeyDefinition::new(
            "fk_posts_users",
            "posts",
            "author_id",
            "users",
            "id",
        ));

        let op = Operation::create_column("posts", ColumnDefinition::new("author_id", SqlType::Integer));
        assert_eq!(
            g.generate(&op).unwrap(),
            "ALTER TABLE posts ADD COLUMN author_id INTEGER CONSTRAINT fk_posts_users \
             FOREIGN KEY (author_id) REFERENCES users (id)"
        );
    }

    #[test]
    fn test_bool_default() {
        let op = Operation::create_column(
            "users",
            ColumnDefinition::new("active", SqlType::Boolean)
                .not_null()
                .default(DefaultValue::Bool(true)),
        );
        assert_eq!(
            SqliteGenerator::new().generate(&op).unwrap(),
            "ALTER TABLE users ADD COLUMN active INTEGER NOT NULL DEFAULT 1"
        );
    }

    #[test]
    fn test_rename_table() {
        assert_eq!(
            SqliteGenerator::new()
                .generate(&Operation::rename_table("old_users", "users"))
                .unwrap(),
            "ALTER TABLE old_users RENAME TO users"
        );
    }

    #[test]
    fn test_autoincrement_requires_primary_key() {
        let op = Operation::create_table(
            "counters",
            vec![ColumnDefinition::new("n", SqlType::Integer).identity()],
        );

        let err = SqliteGenerator::new().generate(&op).unwrap_err();
        assert!(err.is_unsupported());

        let sql = loose().generate(&op).unwrap();
        assert_eq!(sql, "CREATE TABLE counters (n INTEGER)");
    }

    #[test]
    fn test_autoincrement_requires_integer_affinity() {
        let op = Operation::create_table(
            "keys",
            vec![ColumnDefinition::new("id", SqlType::Text)
                .primary_key()
                .identity()],
        );

        let err = SqliteGenerator::new().generate(&op).unwrap_err();
        assert!(err.is_unsupported());
        assert_eq!(
            loose().generate(&op).unwrap(),
            "CREATE TABLE keys (id TEXT PRIMARY KEY)"
        );

        let op = Operation::create_table(
            "events",
            vec![ColumnDefinition::new("id", SqlType::BigInt)
                .primary_key()
                .identity()],
        );
        assert_eq!(
            SqliteGenerator::new().generate(&op).unwrap(),
            "CREATE TABLE events (id INTEGER PRIMARY KEY AUTOINCREMENT)"
        );
    }

    #[test]
    fn test_expression_default_is_parenthesized() {
        let op = Operation::create_column(
            "events",
            ColumnDefinition::new("created_at", SqlType::Timestamp)
                .default(DefaultValue::Expression("datetime('now')".into())),
        );
        assert_eq!(
            SqliteGenerator::new().generate(&op).unwrap(),
            "ALTER TABLE events ADD COLUMN created_at TEXT DEFAULT (datetime('now'))"
        );

        let op = Operation::create_column(
            "events",
            ColumnDefinition::new("seen_at", SqlType::Timestamp)
                .default(DefaultValue::Expression("(CURRENT_TIMESTAMP)".into())),
        );
        assert_eq!(
            SqliteGenerator::new().generate(&op).unwrap(),
            "ALTER TABLE events ADD COLUMN seen_at TEXT DEFAULT (CURRENT_TIMESTAMP)"
        );
    }

    #[test]
    fn test_unique_constraint_on_existing_table_becomes_index() {
        let constraint =
            ConstraintDefinition::unique("uq_users_email", "users", vec!["email".into()]);

        let g = SqliteGenerator::new();
        assert_eq!(
            g.generate(&Operation::create_constraint(constraint.clone()))
                .unwrap(),
            "CREATE UNIQUE INDEX uq_users_email ON users (email)"
        );
        assert_eq!(
            g.generate(&Operation::delete_constraint(constraint)).unwrap(),
            "DROP INDEX uq_users_email"
        );
    }

    #[test]
    fn test_primary_key_constraint_on_existing_table_is_rejected() {
        let op = Operation::create_constraint(ConstraintDefinition::primary_key(
            "pk_users",
            "users",
            vec!["id".into()],
        ));
        assert!(SqliteGenerator::new().generate(&op).is_err());
        assert_eq!(loose().generate(&op).unwrap(), "");
    }

    #[test]
    fn test_session_resets_registry() {
        let mut g = SqliteGenerator::new();
        let fk = ForeignKeyDefinition::new("fk", "Users", "role_id", "Roles", "id");
        let first = vec![users_table(), Operation::create_foreign_key(fk)];
        let sql = g.generate_all(&first).unwrap();
        assert!(sql[0].contains("CONSTRAINT fk"));

        let sql = g.generate_all(&[users_table()]).unwrap();
        assert!(!sql[0].contains("CONSTRAINT"));
    }
}
