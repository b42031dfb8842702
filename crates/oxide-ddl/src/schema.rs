//! Definition objects referenced by operations.
//!
//! These describe *what* a schema change talks about (a column, a foreign
//! key, a constraint, ...) without any knowledge of a target dialect.
//! Generators read them; nothing mutates them after construction.

use serde::{Deserialize, Serialize};

use crate::error::{DdlError, Result};

/// Column type descriptor.
///
/// Each generator maps these onto its own type names; a type the dialect
/// cannot represent fails generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlType {
    /// 16-bit integer.
    SmallInt,
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    BigInt,
    /// Single precision float.
    Real,
    /// Double precision float.
    Double,
    /// Exact numeric with precision and scale.
    Decimal(u8, u8),
    /// Fixed-length character string.
    Char(usize),
    /// Variable-length character string.
    Varchar(usize),
    /// Unbounded text.
    Text,
    /// Boolean.
    Boolean,
    /// Date only.
    Date,
    /// Time only.
    Time,
    /// Date and time.
    Timestamp,
    /// Binary large object.
    Blob,
    /// Fixed-length binary data.
    Binary(usize),
    /// JSON document.
    Json,
    /// UUID.
    Uuid,
    /// Dialect-specific type name, passed through verbatim.
    Custom(String),
}

/// Default value for a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultValue {
    /// NULL default.
    Null,
    /// Boolean literal.
    Bool(bool),
    /// Integer literal.
    Integer(i64),
    /// Float literal.
    Float(f64),
    /// String literal, quoted by the dialect.
    String(String),
    /// Raw SQL expression (e.g. `CURRENT_TIMESTAMP`).
    Expression(String),
}

/// Referential action for ON DELETE / ON UPDATE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ForeignKeyRule {
    /// No action; renders no clause.
    #[default]
    NoAction,
    /// Restrict.
    Restrict,
    /// Cascade to referencing rows.
    Cascade,
    /// Set referencing columns to NULL.
    SetNull,
    /// Set referencing columns to their default.
    SetDefault,
}

impl ForeignKeyRule {
    /// Returns the SQL keyword(s) for this rule, or `None` for `NoAction`.
    #[must_use]
    pub const fn as_sql(self) -> Option<&'static str> {
        match self {
            Self::NoAction => None,
            Self::Restrict => Some("RESTRICT"),
            Self::Cascade => Some("CASCADE"),
            Self::SetNull => Some("SET NULL"),
            Self::SetDefault => Some("SET DEFAULT"),
        }
    }
}

/// A single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name.
    pub name: String,
    /// Name of the table owning the column.
    #[serde(default)]
    pub table_name: String,
    /// Type descriptor.
    pub sql_type: SqlType,
    /// Whether NULL is allowed.
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    /// Default value literal.
    #[serde(default)]
    pub default: Option<DefaultValue>,
    /// Whether the column is (part of) the primary key.
    #[serde(default)]
    pub primary_key: bool,
    /// Whether the column is an auto-incrementing identity.
    #[serde(default)]
    pub identity: bool,
    /// Whether the column carries a single-column UNIQUE constraint.
    #[serde(default)]
    pub unique: bool,
}

const fn default_nullable() -> bool {
    true
}

impl ColumnDefinition {
    /// Creates a nullable column with no default.
    ///
    /// The owning table is filled in by [`ColumnDefinition::in_table`] or by
    /// the operation constructors that take a table name.
    #[must_use]
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            table_name: String::new(),
            sql_type,
            nullable: true,
            default: None,
            primary_key: false,
            identity: false,
            unique: false,
        }
    }

    /// Sets the owning table.
    #[must_use]
    pub fn in_table(mut self, table: impl Into<String>) -> Self {
        self.table_name = table.into();
        self
    }

    /// Sets the column as NOT NULL.
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default(mut self, value: DefaultValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Marks the column as primary key. Primary keys are never NULL.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Marks the column as an identity (auto-increment) column.
    #[must_use]
    pub const fn identity(mut self) -> Self {
        self.identity = true;
        self
    }

    /// Marks the column as unique.
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Checks the column invariants.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::MalformedDefinition`] if the column or its table
    /// has an empty name.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(DdlError::MalformedDefinition(format!(
                "column in table '{}' has an empty name",
                self.table_name
            )));
        }
        if self.table_name.is_empty() {
            return Err(DdlError::MalformedDefinition(format!(
                "column '{}' has no owning table",
                self.name
            )));
        }
        Ok(())
    }
}

/// A foreign key relationship.
///
/// The *foreign* side is the referencing table that owns the constraint;
/// the *primary* side is the referenced table. Column `i` of
/// `foreign_columns` maps to column `i` of `primary_columns`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForeignKeyDefinition {
    /// Constraint name.
    pub name: String,
    /// Referencing table.
    pub foreign_table: String,
    /// Referencing columns, in order.
    pub foreign_columns: Vec<String>,
    /// Referenced table.
    pub primary_table: String,
    /// Referenced columns, in order.
    pub primary_columns: Vec<String>,
    /// Action on delete.
    #[serde(default)]
    pub on_delete: ForeignKeyRule,
    /// Action on update.
    #[serde(default)]
    pub on_update: ForeignKeyRule,
}

impl ForeignKeyDefinition {
    /// Creates a single-column foreign key `foreign_table.foreign_column ->
    /// primary_table.primary_column`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        foreign_table: impl Into<String>,
        foreign_column: impl Into<String>,
        primary_table: impl Into<String>,
        primary_column: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            foreign_table: foreign_table.into(),
            foreign_columns: vec![foreign_column.into()],
            primary_table: primary_table.into(),
            primary_columns: vec![primary_column.into()],
            on_delete: ForeignKeyRule::NoAction,
            on_update: ForeignKeyRule::NoAction,
        }
    }

    /// Adds another column pair to the key.
    #[must_use]
    pub fn column_pair(
        mut self,
        foreign_column: impl Into<String>,
        primary_column: impl Into<String>,
    ) -> Self {
        self.foreign_columns.push(foreign_column.into());
        self.primary_columns.push(primary_column.into());
        self
    }

    /// Sets the ON DELETE rule.
    #[must_use]
    pub const fn on_delete(mut self, rule: ForeignKeyRule) -> Self {
        self.on_delete = rule;
        self
    }

    /// Sets the ON UPDATE rule.
    #[must_use]
    pub const fn on_update(mut self, rule: ForeignKeyRule) -> Self {
        self.on_update = rule;
        self
    }

    /// First referencing column, used to attach the key to a column
    /// definition.
    #[must_use]
    pub fn leading_column(&self) -> Option<&str> {
        self.foreign_columns.first().map(String::as_str)
    }

    /// Checks the foreign key invariants.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::MalformedDefinition`] if either column list is
    /// empty or the two lists differ in length.
    pub fn validate(&self) -> Result<()> {
        if self.foreign_columns.is_empty() || self.primary_columns.is_empty() {
            return Err(DdlError::MalformedDefinition(format!(
                "foreign key '{}' must reference at least one column",
                self.name
            )));
        }
        if self.foreign_columns.len() != self.primary_columns.len() {
            return Err(DdlError::MalformedDefinition(format!(
                "foreign key '{}' maps {} column(s) of '{}' onto {} column(s) of '{}'",
                self.name,
                self.foreign_columns.len(),
                self.foreign_table,
                self.primary_columns.len(),
                self.primary_table
            )));
        }
        Ok(())
    }
}

/// Kind of a named table constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    /// UNIQUE constraint.
    #[default]
    Unique,
    /// PRIMARY KEY constraint.
    PrimaryKey,
}

/// A named table constraint over a set of columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstraintDefinition {
    /// Constraint name.
    pub name: String,
    /// Owning table.
    pub table_name: String,
    /// Constrained columns, in order.
    pub columns: Vec<String>,
    /// Constraint kind.
    #[serde(default)]
    pub kind: ConstraintKind,
}

impl ConstraintDefinition {
    /// Creates a UNIQUE constraint.
    #[must_use]
    pub fn unique(
        name: impl Into<String>,
        table_name: impl Into<String>,
        columns: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            table_name: table_name.into(),
            columns,
            kind: ConstraintKind::Unique,
        }
    }

    /// Creates a PRIMARY KEY constraint.
    #[must_use]
    pub fn primary_key(
        name: impl Into<String>,
        table_name: impl Into<String>,
        columns: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            table_name: table_name.into(),
            columns,
            kind: ConstraintKind::PrimaryKey,
        }
    }

    /// Returns true for UNIQUE constraints.
    #[must_use]
    pub const fn is_unique(&self) -> bool {
        matches!(self.kind, ConstraintKind::Unique)
    }

    /// Checks the constraint invariants.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::MalformedDefinition`] if the constraint covers no
    /// columns.
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(DdlError::MalformedDefinition(format!(
                "constraint '{}' on '{}' has no columns",
                self.name, self.table_name
            )));
        }
        Ok(())
    }
}

/// An index over one or more columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexDefinition {
    /// Index name.
    pub name: String,
    /// Indexed table.
    pub table_name: String,
    /// Indexed columns, in order.
    pub columns: Vec<String>,
    /// Whether the index enforces uniqueness.
    #[serde(default)]
    pub unique: bool,
}

impl IndexDefinition {
    /// Checks the index invariants.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::MalformedDefinition`] if the index covers no
    /// columns.
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(DdlError::MalformedDefinition(format!(
                "index '{}' on '{}' has no columns",
                self.name, self.table_name
            )));
        }
        Ok(())
    }
}

/// A sequence object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct SequenceDefinition {
    /// Sequence name.
    pub name: String,
    /// Step between values.
    #[serde(default)]
    pub increment: Option<i64>,
    /// Lower bound.
    #[serde(default)]
    pub min_value: Option<i64>,
    /// Upper bound.
    #[serde(default)]
    pub max_value: Option<i64>,
    /// First value.
    #[serde(default)]
    pub start_with: Option<i64>,
    /// Number of preallocated values.
    #[serde(default)]
    pub cache: Option<i64>,
    /// Whether to wrap around at the bound.
    #[serde(default)]
    pub cycle: bool,
}

impl SequenceDefinition {
    /// Creates a sequence with dialect defaults for every option.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
