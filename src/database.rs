use crate::{
    dialect::{CurrentDialect, CurrentRow, Dialect},
    pair::{ImagePair, NewImagePair, PairId, TIMESTAMP_FORMAT},
};
use chrono::NaiveDateTime;
pub use crate::dialect::Db;
pub use sqlx::Pool;
use sqlx::{Execute, FromRow, Row};
use thiserror::Error;

pub async fn run_migration(pool: &Pool<Db>) -> Result<(), sqlx::Error> {
    CurrentDialect::migration(pool).await
}

/// Opens a connection pool for `url`, creating the database file when it is missing.
#[cfg(feature = "sqlite")]
pub async fn connect(url: &str) -> Result<Pool<Db>, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    SqlitePoolOptions::new().connect_with(options).await
}

impl FromRow<'_, CurrentRow> for ImagePair {
    fn from_row(row: &CurrentRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let id = PairId::try_from(id).map_err(|e| sqlx::Error::ColumnDecode {
            index: "id".to_string(),
            source: Box::new(e),
        })?;
        let created_at: String = row.try_get("created_at")?;
        let created_at = NaiveDateTime::parse_from_str(&created_at, TIMESTAMP_FORMAT).map_err(
            |e| sqlx::Error::ColumnDecode {
                index: "created_at".to_string(),
                source: Box::new(e),
            },
        )?;

        Ok(ImagePair {
            id,
            original_image: row.try_get("original_image")?,
            mask_image: row.try_get("mask_image")?,
            created_at,
        })
    }
}

/// A database abstraction over the `image_pairs` collection.
///
/// This struct wraps an SQLx connection pool. Cloning is cheap and every clone
/// shares the same pool, so a single instance is created at startup and handed
/// to whoever needs storage. Statements come from the compile-time `Dialect`.
///
/// Failures are never retried; they surface as [`DatabaseError`] immediately.
#[derive(Debug, Clone)]
pub struct Database {
    pool: Pool<Db>,
}

impl Database {
    /// Wraps a pool whose schema is already in place.
    pub fn new(pool: Pool<Db>) -> Self {
        Self { pool }
    }

    pub async fn with_migration(pool: Pool<Db>) -> Result<Self, sqlx::Error> {
        run_migration(&pool).await?;

        Ok(Self { pool })
    }

    /// Stores a new image pair.
    ///
    /// The identifier and the creation timestamp are assigned here, at the time
    /// of the write, and the stored document is returned.
    pub async fn insert_pair(&self, doc: NewImagePair) -> Result<ImagePair, DatabaseError> {
        let pair = doc.into_pair();
        let stmt = CurrentDialect::insert_pair_statement();

        let query = sqlx::query(&stmt)
            .bind(pair.id.to_string())
            .bind(&pair.original_image)
            .bind(&pair.mask_image)
            .bind(pair.created_at.format(TIMESTAMP_FORMAT).to_string());
        let sql = query.sql();

        query
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::QueryFailed {
                operation: DbOperation::InsertPair { id: pair.id },
                sql: sql.to_string(),
                source: e,
            })?;

        tracing::debug!(id = %pair.id, "image pair stored");

        Ok(pair)
    }

    /// Returns every stored pair, most recently created first.
    ///
    /// An empty collection yields an empty vector.
    pub async fn list_pairs(&self) -> Result<Vec<ImagePair>, DatabaseError> {
        let stmt = CurrentDialect::list_pairs_statement();

        sqlx::query_as(&stmt)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::QueryFailed {
                operation: DbOperation::ListPairs,
                sql: stmt.to_string(),
                source: e,
            })
    }

    pub async fn find_pair(&self, id: &PairId) -> Result<Option<ImagePair>, DatabaseError> {
        let stmt = CurrentDialect::find_pair_statement();

        sqlx::query_as(&stmt)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::QueryFailed {
                operation: DbOperation::FindPair { id: *id },
                sql: stmt.to_string(),
                source: e,
            })
    }

    /// Deletes the pair with the given id and returns how many rows went away (0 or 1).
    pub async fn delete_pair(&self, id: &PairId) -> Result<u64, DatabaseError> {
        let stmt = CurrentDialect::delete_pair_statement();

        let result = sqlx::query(&stmt)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::QueryFailed {
                operation: DbOperation::DeletePair { id: *id },
                sql: stmt.to_string(),
                source: e,
            })?;

        Ok(result.rows_affected())
    }
}

/// Represents errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A general SQL query failure, with the operation and SQL that caused it.
    #[error("Query failed during {operation:?}: {source}")]
    QueryFailed {
        operation: DbOperation,
        sql: String,
        #[source]
        source: sqlx::Error,
    },
}

/// The kind of database operation being performed,
/// used for attaching context to [`DatabaseError::QueryFailed`].
#[derive(Debug)]
pub enum DbOperation {
    /// INSERT INTO image_pairs
    InsertPair { id: PairId },
    /// SELECT ... FROM image_pairs ORDER BY created_at DESC
    ListPairs,
    /// SELECT ... FROM image_pairs WHERE id = ...
    FindPair { id: PairId },
    /// DELETE FROM image_pairs WHERE id = ...
    DeletePair { id: PairId },
}
