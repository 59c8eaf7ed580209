//! # SQL Dialect Module
//!
//! This module defines the `Dialect` trait, which abstracts over the differences in
//! SQL syntax across database systems for the single `image_pairs` collection.
//! Each image pair is stored as one row keyed by its identifier; the row is the
//! whole document and is never updated after insertion.
//!
//! The dialect used is decided at compile time by feature flags. When the `sqlite`
//! feature is enabled, the `CurrentDialect` type alias is set to `sqlite::SqliteDialect`.

#[cfg(feature = "sqlite")]
mod sqlite;

/// The current SQL dialect used at compile time, determined by feature flags.
#[cfg(feature = "sqlite")]
pub type CurrentDialect = sqlite::SqliteDialect;

#[cfg(feature = "sqlite")]
pub type Db = sqlx::Sqlite;

#[cfg(feature = "sqlite")]
pub type CurrentRow = sqlx::sqlite::SqliteRow;

/// Column list shared by every statement reading a full document.
const PAIR_COLUMNS: &str = "id, original_image, mask_image, created_at";

/// A trait for SQL dialects to support database-specific query generation.
///
/// Implementors only need to provide [`Dialect::placeholder`] and
/// [`Dialect::migration`]; every statement has a portable default that may be
/// overridden where the target database offers something better.
pub trait Dialect {
    /// Returns the SQL placeholder syntax for the given parameter index.
    ///
    /// - SQLite: `?`
    /// - PostgreSQL: `$1`, `$2`, ...
    ///
    /// # Parameters
    /// - `idx`: The 1-based parameter index (used in dialects that number placeholders).
    fn placeholder(idx: usize) -> String;

    /// Returns the SQL statement inserting a new image pair document.
    ///
    /// Binds, in order: id, original image, mask image, creation timestamp.
    fn insert_pair_statement() -> String {
        format!(
            "INSERT INTO image_pairs ({PAIR_COLUMNS}) VALUES ({}, {}, {}, {})",
            Self::placeholder(1),
            Self::placeholder(2),
            Self::placeholder(3),
            Self::placeholder(4)
        )
    }

    /// Returns the SQL statement listing every image pair, newest first.
    fn list_pairs_statement() -> String {
        format!("SELECT {PAIR_COLUMNS} FROM image_pairs ORDER BY created_at DESC")
    }

    /// Returns the SQL statement fetching a single image pair by id.
    fn find_pair_statement() -> String {
        format!(
            "SELECT {PAIR_COLUMNS} FROM image_pairs WHERE id = {}",
            Self::placeholder(1)
        )
    }

    /// Returns the SQL statement deleting a single image pair by id.
    fn delete_pair_statement() -> String {
        format!("DELETE FROM image_pairs WHERE id = {}", Self::placeholder(1))
    }

    /// Creates the collection if it does not exist yet. Must be idempotent.
    async fn migration(pool: &sqlx::Pool<Db>) -> Result<(), sqlx::Error>;
}
