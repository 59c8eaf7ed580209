use super::{Db, Dialect, PAIR_COLUMNS};

/// SQLite dialect implementation of the `Dialect` trait.
#[cfg(feature = "sqlite")]
pub struct SqliteDialect;

#[cfg(feature = "sqlite")]
impl Dialect for SqliteDialect {
    fn placeholder(_idx: usize) -> String {
        "?".to_string()
    }

    // Pairs created within the same microsecond fall back to insertion order.
    fn list_pairs_statement() -> String {
        format!("SELECT {PAIR_COLUMNS} FROM image_pairs ORDER BY created_at DESC, rowid DESC")
    }

    async fn migration(pool: &sqlx::Pool<Db>) -> Result<(), sqlx::Error> {
        let stmts = vec![
            r#"CREATE TABLE IF NOT EXISTS image_pairs (
                id TEXT PRIMARY KEY,
                original_image TEXT NOT NULL,
                mask_image TEXT NOT NULL,
                created_at TEXT NOT NULL
            );"#,
            r#"CREATE INDEX IF NOT EXISTS image_pairs_created_at
                ON image_pairs (created_at);"#,
        ];

        for stmt in stmts {
            sqlx::query(stmt).execute(pool).await?;
        }

        Ok(())
    }
}
