//! # Image Pair Module
//!
//! This module provides the operations the web server and the CLI share:
//! uploading a pair, listing pairs, looking one up and removing it.
//!
//! ## Provided Structures
//!
//! - **UploadPairCommand**: Collects the original and mask uploads, encodes them
//!   as data URIs and stores them as a single record. A command missing either
//!   part is rejected before anything is written.
//! - **Upload**: Raw bytes of one uploaded file plus its declared content type.
//!
//! ## Functions
//!
//! - **list_pairs**: Every stored pair, newest first.
//! - **find_pair**: One pair by its textual id.
//! - **remove_pair**: Deletes one pair by its textual id.
//!
//! Identifiers arrive as text and are parsed here; malformed ids become
//! `AppError::InvalidId`, unknown ids become `AppError::NotFound`.

use bytes::Bytes;

use crate::{
    database::{Database, DatabaseError},
    encoding::{FALLBACK_CONTENT_TYPE, encode_data_uri},
    pair::{ImagePair, InvalidPairId, NewImagePair, PairId},
};

/// Which half of a pair an upload belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairPart {
    Original,
    Mask,
}

impl PairPart {
    /// The multipart field name carrying this part.
    pub fn field_name(self) -> &'static str {
        match self {
            PairPart::Original => "original",
            PairPart::Mask => "mask",
        }
    }
}

impl std::fmt::Display for PairPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field_name())
    }
}

/// One uploaded file.
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub bytes: Bytes,
    /// Declared MIME type; `None` falls back to `application/octet-stream`.
    pub content_type: Option<String>,
}

impl Upload {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Upload {
            bytes: bytes.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = Some(content_type.to_string());
        self
    }

    fn to_data_uri(&self) -> String {
        encode_data_uri(
            &self.bytes,
            self.content_type.as_deref().unwrap_or(FALLBACK_CONTENT_TYPE),
        )
    }
}

/// Represents a request to store one original/mask pair.
///
/// Use the builder-style methods to attach both parts, then call `execute()`.
#[derive(Debug, Default)]
pub struct UploadPairCommand {
    pub original: Option<Upload>,
    pub mask: Option<Upload>,
}

impl UploadPairCommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_original(mut self, upload: Upload) -> Self {
        self.original = Some(upload);
        self
    }

    pub fn with_mask(mut self, upload: Upload) -> Self {
        self.mask = Some(upload);
        self
    }

    /// Sets the given part, replacing an earlier upload for the same part.
    pub fn with_part(self, part: PairPart, upload: Upload) -> Self {
        match part {
            PairPart::Original => self.with_original(upload),
            PairPart::Mask => self.with_mask(upload),
        }
    }

    /// Encodes both parts and stores them as one record.
    ///
    /// # Returns
    ///
    /// The stored `ImagePair`, including its new id and creation time.
    ///
    /// # Errors
    ///
    /// - `AppError::MissingPart` if either part was never provided; nothing is stored.
    /// - `AppError::Database` if the store rejects the write.
    pub async fn execute(self, db: &Database) -> Result<ImagePair, AppError> {
        let original = self.original.ok_or(AppError::MissingPart {
            part: PairPart::Original,
        })?;
        let mask = self.mask.ok_or(AppError::MissingPart {
            part: PairPart::Mask,
        })?;

        let doc = NewImagePair {
            original_image: original.to_data_uri(),
            mask_image: mask.to_data_uri(),
        };

        Ok(db.insert_pair(doc).await?)
    }
}

/// Returns every stored pair, newest first.
pub async fn list_pairs(db: &Database) -> Result<Vec<ImagePair>, AppError> {
    Ok(db.list_pairs().await?)
}

/// Looks up a pair by its textual id.
pub async fn find_pair(db: &Database, id: &str) -> Result<ImagePair, AppError> {
    let id: PairId = id.parse()?;

    db.find_pair(&id)
        .await?
        .ok_or(AppError::NotFound { id })
}

/// Deletes a pair by its textual id.
///
/// Fails with `AppError::NotFound` when no pair was removed.
pub async fn remove_pair(db: &Database, id: &str) -> Result<(), AppError> {
    let id: PairId = id.parse()?;

    match db.delete_pair(&id).await? {
        0 => Err(AppError::NotFound { id }),
        _ => Ok(()),
    }
}

/// Error types of the pair operations.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("missing required file `{part}`")]
    MissingPart { part: PairPart },

    #[error(transparent)]
    InvalidId(#[from] InvalidPairId),

    #[error("image pair not found: {id}")]
    NotFound { id: PairId },
}
