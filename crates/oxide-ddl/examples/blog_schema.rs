//! Example: Blog Schema in Three Dialects
//!
//! This example renders the same blog schema (users, posts, comments and a
//! later profile change) for every supported dialect, showing how SQLite
//! folds separately declared foreign keys into its CREATE TABLE statements.
//!
//! Run with: cargo run --example blog_schema -p oxide-ddl

use oxide_ddl::prelude::*;

fn timestamp(name: &str) -> ColumnDefinition {
    ColumnDefinition::new(name, SqlType::Timestamp)
        .not_null()
        .default(DefaultValue::Expression("CURRENT_TIMESTAMP".to_string()))
}

fn blog_operations() -> Vec<Operation> {
    vec![
        Operation::create_table(
            "users",
            vec![
                ColumnDefinition::new("id", SqlType::BigInt)
                    .primary_key()
                    .identity(),
                ColumnDefinition::new("username", SqlType::Varchar(100))
                    .not_null()
                    .unique(),
                ColumnDefinition::new("email", SqlType::Varchar(255)).not_null(),
                ColumnDefinition::new("is_active", SqlType::Boolean)
                    .not_null()
                    .default(DefaultValue::Bool(true)),
                timestamp("created_at"),
            ],
        ),
        Operation::create_table(
            "posts",
            vec![
                ColumnDefinition::new("id", SqlType::BigInt)
                    .primary_key()
                    .identity(),
                ColumnDefinition::new("author_id", SqlType::BigInt).not_null(),
                ColumnDefinition::new("title", SqlType::Varchar(200)).not_null(),
                ColumnDefinition::new("slug", SqlType::Varchar(200)).not_null(),
                ColumnDefinition::new("content", SqlType::Text).not_null(),
                timestamp("created_at"),
            ],
        ),
        Operation::create_foreign_key(
            ForeignKeyDefinition::new("fk_posts_author", "posts", "author_id", "users", "id")
                .on_delete(ForeignKeyRule::Cascade),
        ),
        Operation::create_constraint(ConstraintDefinition::unique(
            "uq_posts_slug",
            "posts",
            vec!["slug".to_string()],
        )),
        Operation::create_index(
            "idx_posts_author",
            "posts",
            vec!["author_id".to_string()],
            false,
        ),
        Operation::create_table(
            "comments",
            vec![
                ColumnDefinition::new("id", SqlType::BigInt)
                    .primary_key()
                    .identity(),
                ColumnDefinition::new("post_id", SqlType::BigInt).not_null(),
                ColumnDefinition::new("author_id", SqlType::BigInt),
                ColumnDefinition::new("content", SqlType::Text).not_null(),
                timestamp("created_at"),
            ],
        ),
        Operation::create_foreign_key(
            ForeignKeyDefinition::new("fk_comments_post", "comments", "post_id", "posts", "id")
                .on_delete(ForeignKeyRule::Cascade),
        ),
        Operation::create_foreign_key(
            ForeignKeyDefinition::new(
                "fk_comments_author",
                "comments",
                "author_id",
                "users",
                "id",
            )
            .on_delete(ForeignKeyRule::SetNull),
        ),
        // Profile change: SQLite cannot alter an existing column.
        Operation::create_column("users", ColumnDefinition::new("bio", SqlType::Text)),
        Operation::alter_column(
            "users",
            ColumnDefinition::new("email", SqlType::Varchar(320)).not_null(),
        ),
    ]
}

fn main() {
    println!("{}", "=".repeat(70));
    println!(" OXIDE-DDL: Blog Schema Example");
    println!("{}", "=".repeat(70));

    let operations = blog_operations();
    println!("\nOperations:");
    for op in &operations {
        println!("    - {}", op.description());
    }

    let options = GeneratorOptions::new().compatibility(CompatibilityMode::Loose);
    for dialect in Dialect::ALL {
        println!("\n-- Dialect: {dialect}");
        println!("{}", "-".repeat(70));
        let mut generator = dialect.generator(options);
        match generator.generate_all(&operations) {
            Ok(statements) => {
                for sql in statements {
                    println!("{sql};");
                }
            }
            Err(e) => println!("-- cannot render: {e}"),
        }
    }

    println!("\n-- Strict SQLite");
    println!("{}", "-".repeat(70));
    let mut strict = SqliteGenerator::new();
    if let Err(e) = strict.generate_all(&operations) {
        println!("-- rejected: {e}");
    }

    println!();
    println!("{}", "=".repeat(70));
    println!(" Example completed successfully!");
    println!("{}", "=".repeat(70));
}
