//! Dialect-neutral rendering.
//!
//! The free functions here are the default behaviour of every
//! [`Generator`] method. They are generic over the generator so that a
//! dialect overriding a method can still produce the base statement with
//! its own quoter and type mapping, then post-process it.

use crate::config::GeneratorOptions;
use crate::error::{DdlError, Result};
use crate::operation::{
    AlterColumnOp, AlterDefaultConstraintOp, CreateColumnOp, CreateConstraintOp,
    CreateForeignKeyOp, CreateIndexOp, CreateSequenceOp, CreateTableOp, DeleteColumnOp,
    DeleteConstraintOp, DeleteDefaultConstraintOp, DeleteForeignKeyOp, DeleteIndexOp,
    DeleteSequenceOp, DeleteTableOp, RenameColumnOp, RenameTableOp,
};
use crate::quoter::Quoter;
use crate::schema::{
    ColumnDefinition, ConstraintDefinition, ConstraintKind, DefaultValue, ForeignKeyDefinition,
    SqlType,
};

use super::Generator;

/// ANSI SQL generator with no dialect overrides.
#[derive(Debug, Clone, Default)]
pub struct GenericGenerator {
    options: GeneratorOptions,
    quoter: Quoter,
}

impl GenericGenerator {
    /// Creates a generic generator with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generic generator with the given options.
    #[must_use]
    pub fn with_options(options: GeneratorOptions) -> Self {
        Self {
            options,
            quoter: Quoter::case_preserving(),
        }
    }
}

impl Generator for GenericGenerator {
    fn name(&self) -> &'static str {
        "generic"
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
            SqlType::Decimal(p, s) => format!("DECIMAL({p}, {s})"),
            SqlType::Char(n) => format!("CHAR({n})"),
            SqlType::Varchar(n) => format!("VARCHAR({n})"),
            SqlType::Text => "CLOB".to_string(),
            SqlType::Boolean => "BOOLEAN".to_string(),
            SqlType::Date => "DATE".to_string(),
            SqlType::Time => "TIME".to_string(),
            SqlType::Timestamp => "TIMESTAMP".to_string(),
            SqlType::Blob => "BLOB".to_string(),
            SqlType::Binary(n) => format!("BINARY({n})"),
            SqlType::Custom(name) => name.clone(),
            SqlType::Json | SqlType::Uuid => {
                return Err(DdlError::UnsupportedType {
                    dialect: self.name(),
                    sql_type: format!("{sql_type:?}"),
                });
            }
        })
    }
}

/// `CREATE TABLE t (col, col[, PRIMARY KEY (a, b)])` on a single line.
///
/// A single primary-key column is declared inline; two or more are
/// declared as a table-level clause.
pub fn create_table<G: Generator + ?Sized>(g: &G, op: &CreateTableOp) -> Result<String> {
    if op.columns.is_empty() {
        return Err(DdlError::MalformedDefinition(format!(
            "table '{}' has no columns",
            op.name
        )));
    }
    for column in &op.columns {
        column.validate()?;
        if column.table_name != op.name {
            return Err(DdlError::MalformedDefinition(format!(
                "column '{}' belongs to table '{}' but is declared in '{}'",
                column.name, column.table_name, op.name
            )));
        }
    }

    let q = g.quoter();
    let primary_key: Vec<String> = op
        .columns
        .iter()
        .filter(|c| c.primary_key)
        .map(|c| c.name.clone())
        .collect();
    let composite = primary_key.len() > 1;

    let mut defs = Vec::with_capacity(op.columns.len() + 1);
    for column in &op.columns {
        if composite && column.primary_key {
            let mut column = column.clone();
            column.primary_key = false;
            defs.push(g.column_definition(&column)?);
        } else {
            defs.push(g.column_definition(column)?);
        }
    }
    if composite {
        defs.push(format!("PRIMARY KEY ({})", q.quote_list(&primary_key)));
    }

    Ok(format!("CREATE TABLE {} ({})", q.quote(&op.name), defs.join(", ")))
}

/// `DROP TABLE t`.
pub fn delete_table<G: Generator + ?Sized>(g: &G, op: &DeleteTableOp) -> String {
    format!("DROP TABLE {}", g.quoter().quote(&op.name))
}

/// `RENAME TABLE a TO b`.
pub fn rename_table<G: Generator + ?Sized>(g: &G, op: &RenameTableOp) -> String {
    let q = g.quoter();
    format!(
        "RENAME TABLE {} TO {}",
        q.quote(&op.old_name),
        q.quote(&op.new_name)
    )
}

/// `ALTER TABLE t ADD COLUMN def`.
pub fn create_column<G: Generator + ?Sized>(g: &G, op: &CreateColumnOp) -> Result<String> {
    Ok(format!(
        "ALTER TABLE {} ADD COLUMN {}",
        g.quoter().quote(&op.column.table_name),
        g.column_definition(&op.column)?
    ))
}

/// `ALTER TABLE t ALTER COLUMN def`.
pub fn alter_column<G: Generator + ?Sized>(g: &G, op: &AlterColumnOp) -> Result<String> {
    Ok(format!(
        "ALTER TABLE {} ALTER COLUMN {}",
        g.quoter().quote(&op.column.table_name),
        g.column_definition(&op.column)?
    ))
}

/// `ALTER TABLE t RENAME COLUMN a TO b`.
pub fn rename_column<G: Generator + ?Sized>(g: &G, op: &RenameColumnOp) -> String {
    let q = g.quoter();
    format!(
        "ALTER TABLE {} RENAME COLUMN {} TO {}",
        q.quote(&op.table),
        q.quote(&op.old_name),
        q.quote(&op.new_name)
    )
}

/// `ALTER TABLE t DROP COLUMN c`.
pub fn delete_column<G: Generator + ?Sized>(g: &G, op: &DeleteColumnOp) -> String {
    let q = g.quoter();
    format!(
        "ALTER TABLE {} DROP COLUMN {}",
        q.quote(&op.table),
        q.quote(&op.column)
    )
}

/// `CREATE [UNIQUE] INDEX i ON t (cols)`.
pub fn create_index<G: Generator + ?Sized>(g: &G, op: &CreateIndexOp) -> Result<String> {
    op.index.validate()?;
    let q = g.quoter();
    Ok(format!(
        "CREATE {}INDEX {} ON {} ({})",
        if op.index.unique { "UNIQUE " } else { "" },
        q.quote(&op.index.name),
        q.quote(&op.index.table_name),
        q.quote_list(&op.index.columns)
    ))
}

/// `DROP INDEX i`.
pub fn delete_index<G: Generator + ?Sized>(g: &G, op: &DeleteIndexOp) -> String {
    format!("DROP INDEX {}", g.quoter().quote(&op.name))
}

/// `ALTER TABLE t ADD CONSTRAINT n FOREIGN KEY ...`.
pub fn create_foreign_key<G: Generator + ?Sized>(
    g: &G,
    op: &CreateForeignKeyOp,
) -> Result<String> {
    Ok(format!(
        "ALTER TABLE {} ADD {}",
        g.quoter().quote(&op.foreign_key.foreign_table),
        g.foreign_key_clause(&op.foreign_key)?
    ))
}

/// `ALTER TABLE t DROP CONSTRAINT n`.
pub fn delete_foreign_key<G: Generator + ?Sized>(g: &G, op: &DeleteForeignKeyOp) -> String {
    let q = g.quoter();
    format!(
        "ALTER TABLE {} DROP CONSTRAINT {}",
        q.quote(&op.table),
        q.quote(&op.name)
    )
}

/// `ALTER TABLE t ADD CONSTRAINT n UNIQUE|PRIMARY KEY (cols)`.
pub fn create_constraint<G: Generator + ?Sized>(
    g: &G,
    op: &CreateConstraintOp,
) -> Result<String> {
    Ok(format!(
        "ALTER TABLE {} ADD {}",
        g.quoter().quote(&op.constraint.table_name),
        g.constraint_clause(&op.constraint)?
    ))
}

/// `ALTER TABLE t DROP CONSTRAINT n`.
pub fn delete_constraint<G: Generator + ?Sized>(g: &G, op: &DeleteConstraintOp) -> String {
    let q = g.quoter();
    format!(
        "ALTER TABLE {} DROP CONSTRAINT {}",
        q.quote(&op.constraint.table_name),
        q.quote(&op.constraint.name)
    )
}

/// `CREATE SEQUENCE s [INCREMENT BY n] [MINVALUE n] ...`.
pub fn create_sequence<G: Generator + ?Sized>(g: &G, op: &CreateSequenceOp) -> String {
    let seq = &op.sequence;
    let mut sql = format!("CREATE SEQUENCE {}", g.quoter().quote(&seq.name));
    if let Some(n) = seq.increment {
        sql.push_str(&format!(" INCREMENT BY {n}"));
    }
    if let Some(n) = seq.min_value {
        sql.push_str(&format!(" MINVALUE {n}"));
    }
    if let Some(n) = seq.max_value {
        sql.push_str(&format!(" MAXVALUE {n}"));
    }
    if let Some(n) = seq.start_with {
        sql.push_str(&format!(" START WITH {n}"));
    }
    if let Some(n) = seq.cache {
        sql.push_str(&format!(" CACHE {n}"));
    }
    if seq.cycle {
        sql.push_str(" CYCLE");
    }
    sql
}

/// `DROP SEQUENCE s`.
pub fn delete_sequence<G: Generator + ?Sized>(g: &G, op: &DeleteSequenceOp) -> String {
    format!("DROP SEQUENCE {}", g.quoter().quote(&op.name))
}

/// `ALTER TABLE t ALTER COLUMN c SET DEFAULT v`.
pub fn alter_default<G: Generator + ?Sized>(g: &G, op: &AlterDefaultConstraintOp) -> String {
    let q = g.quoter();
    format!(
        "ALTER TABLE {} ALTER COLUMN {} SET DEFAULT {}",
        q.quote(&op.table),
        q.quote(&op.column),
        g.render_default(&op.default)
    )
}

/// `ALTER TABLE t ALTER COLUMN c DROP DEFAULT`.
pub fn delete_default<G: Generator + ?Sized>(g: &G, op: &DeleteDefaultConstraintOp) -> String {
    let q = g.quoter();
    format!(
        "ALTER TABLE {} ALTER COLUMN {} DROP DEFAULT",
        q.quote(&op.table),
        q.quote(&op.column)
    )
}

/// `name type [PRIMARY KEY] [identity] [NOT NULL] [UNIQUE] [DEFAULT v]`.
pub fn column_definition<G: Generator + ?Sized>(
    g: &G,
    column: &ColumnDefinition,
) -> Result<String> {
    column.validate()?;

    let mut sql = format!(
        "{} {}",
        g.quoter().quote(&column.name),
        g.column_type(column)?
    );

    if column.primary_key {
        sql.push_str(" PRIMARY KEY");
    }
    if column.identity {
        if let Some(clause) = g.identity_clause(column)? {
            if !clause.is_empty() {
                sql.push(' ');
                sql.push_str(&clause);
            }
        }
    }
    if !column.primary_key {
        if !column.nullable {
            sql.push_str(" NOT NULL");
        }
        if column.unique {
            sql.push_str(" UNIQUE");
        }
    }
    if let Some(ref default) = column.default {
        sql.push_str(" DEFAULT ");
        sql.push_str(&g.render_default(default));
    }

    Ok(sql)
}

/// ANSI literal for a default value.
pub fn render_default<G: Generator + ?Sized>(g: &G, default: &DefaultValue) -> String {
    match default {
        DefaultValue::Null => "NULL".to_string(),
        DefaultValue::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        DefaultValue::Integer(i) => i.to_string(),
        DefaultValue::Float(f) => f.to_string(),
        DefaultValue::String(s) => g.quoter().quote_string(s),
        DefaultValue::Expression(expr) => expr.clone(),
    }
}

/// `CONSTRAINT n FOREIGN KEY (a, b) REFERENCES p (x, y) [ON DELETE r] [ON UPDATE r]`.
pub fn foreign_key_clause<G: Generator + ?Sized>(
    g: &G,
    fk: &ForeignKeyDefinition,
) -> Result<String> {
    fk.validate()?;
    let q = g.quoter();

    let mut sql = format!(
        "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
        q.quote(&fk.name),
        q.quote_list(&fk.foreign_columns),
        q.quote(&fk.primary_table),
        q.quote_list(&fk.primary_columns)
    );
    if let Some(rule) = fk.on_delete.as_sql() {
        sql.push_str(" ON DELETE ");
        sql.push_str(rule);
    }
    if let Some(rule) = fk.on_update.as_sql() {
        sql.push_str(" ON UPDATE ");
        sql.push_str(rule);
    }
    Ok(sql)
}

/// `CONSTRAINT n UNIQUE (cols)` or `CONSTRAINT n PRIMARY KEY (cols)`.
pub fn constraint_clause<G: Generator + ?Sized>(
    g: &G,
    constraint: &ConstraintDefinition,
) -> Result<String> {
    constraint.validate()?;
    let q = g.quoter();
    let kind = match constraint.kind {
        ConstraintKind::Unique => "UNIQUE",
        ConstraintKind::PrimaryKey => "PRIMARY KEY",
    };
    Ok(format!(
        "CONSTRAINT {} {} ({})",
        q.quote(&constraint.name),
        kind,
        q.quote_list(&constraint.columns)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::Operation;
    use crate::schema::{ForeignKeyRule, SequenceDefinition};

    fn generator() -> GenericGenerator {
        GenericGenerator::new()
    }

    #[test]
    fn test_create_table() {
        let op = Operation::create_table(
            "users",
            vec![
                ColumnDefinition::new("id", SqlType::Integer)
                    .primary_key()
                    .identity(),
                ColumnDefinition::new("name", SqlType::Varchar(100)).not_null(),
                ColumnDefinition::new("active", SqlType::Boolean).default(DefaultValue::Bool(true)),
            ],
        );

        assert_eq!(
            generator().generate(&op).unwrap(),
            "CREATE TABLE users (id INTEGER PRIMARY KEY GENERATED BY DEFAULT AS IDENTITY, \
             name VARCHAR(100) NOT NULL, active BOOLEAN DEFAULT TRUE)"
        );
    }

    #[test]
    fn test_composite_primary_key() {
        let op = Operation::create_table(
            "memberships",
            vec![
                ColumnDefinition::new("user_id", SqlType::Integer).primary_key(),
                ColumnDefinition::new("group_id", SqlType::Integer).primary_key(),
            ],
        );

        assert_eq!(
            generator().generate(&op).unwrap(),
            "CREATE TABLE memberships (user_id INTEGER NOT NULL, group_id INTEGER NOT NULL, \
             PRIMARY KEY (user_id, group_id))"
        );
    }

    #[test]
    fn test_table_without_columns_is_malformed() {
        let op = Operation::create_table("empty", vec![]);
        assert!(matches!(
            generator().generate(&op),
            Err(DdlError::MalformedDefinition(_))
        ));
    }

    #[test]
    fn test_column_declared_in_wrong_table() {
        let op = Operation::CreateTable(CreateTableOp {
            name: "users".into(),
            columns: vec![ColumnDefinition::new("id", SqlType::Integer).in_table("accounts")],
        });
        let err = generator().generate(&op).unwrap_err();
        assert!(err.to_string().contains("belongs to table 'accounts'"));
    }

    #[test]
    fn test_unmappable_type() {
        let op = Operation::create_table(
            "docs",
            vec![ColumnDefinition::new("body", SqlType::Json)],
        );
        assert!(matches!(
            generator().generate(&op),
            Err(DdlError::UnsupportedType {
                dialect: "generic",
                ..
            })
        ));
    }

    #[test]
    fn test_foreign_key() {
        let op = Operation::create_foreign_key(
            ForeignKeyDefinition::new("fk_posts_users", "posts", "author_id", "users", "id")
                .on_delete(ForeignKeyRule::SetNull)
                .on_update(ForeignKeyRule::Cascade),
        );

        assert_eq!(
            generator().generate(&op).unwrap(),
            "ALTER TABLE posts ADD CONSTRAINT fk_posts_users FOREIGN KEY (author_id) \
             REFERENCES users (id) ON DELETE SET NULL ON UPDATE CASCADE"
        );
    }

    #[test]
    fn test_constraints() {
        let unique = ConstraintDefinition::unique(
            "uq_users_email",
            "users",
            vec!["email".into()],
        );
        assert_eq!(
            generator()
                .generate(&Operation::create_constraint(unique.clone()))
                .unwrap(),
            "ALTER TABLE users ADD CONSTRAINT uq_users_email UNIQUE (email)"
        );
        assert_eq!(
            generator()
                .generate(&Operation::delete_constraint(unique))
                .unwrap(),
            "ALTER TABLE users DROP CONSTRAINT uq_users_email"
        );
    }

    #[test]
    fn test_sequence() {
        let mut seq = SequenceDefinition::new("invoice_no");
        seq.increment = Some(1);
        seq.start_with = Some(1000);
        seq.cycle = true;

        assert_eq!(
            generator().generate(&Operation::create_sequence(seq)).unwrap(),
            "CREATE SEQUENCE invoice_no INCREMENT BY 1 START WITH 1000 CYCLE"
        );
        assert_eq!(
            generator()
                .generate(&Operation::delete_sequence("invoice_no"))
                .unwrap(),
            "DROP SEQUENCE invoice_no"
        );
    }

    #[test]
    fn test_defaults() {
        let g = generator();
        assert_eq!(
            g.generate(&Operation::alter_default(
                "users",
                "nickname",
                DefaultValue::String("n/a".into())
            ))
            .unwrap(),
            "ALTER TABLE users ALTER COLUMN nickname SET DEFAULT 'n/a'"
        );
        assert_eq!(
            g.generate(&Operation::delete_default("users", "nickname"))
                .unwrap(),
            "ALTER TABLE users ALTER COLUMN nickname DROP DEFAULT"
        );
    }

    #[test]
    fn test_simple_statements() {
        let g = generator();
        assert_eq!(
            g.generate(&Operation::rename_table("a", "b")).unwrap(),
            "RENAME TABLE a TO b"
        );
        assert_eq!(
            g.generate(&Operation::delete_table("order")).unwrap(),
            "DROP TABLE \"order\""
        );
        assert_eq!(
            g.generate(&Operation::create_index(
                "ix_users_name",
                "users",
                vec!["last".into(), "first".into()],
                false
            ))
            .unwrap(),
            "CREATE INDEX ix_users_name ON users (last, first)"
        );
        assert_eq!(
            g.generate(&Operation::execute_sql("VACUUM")).unwrap(),
            "VACUUM"
        );
    }
}
