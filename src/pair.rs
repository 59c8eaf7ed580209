//! Image pair documents and their identifiers.

use chrono::{Local, NaiveDateTime, SubsecRound};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;
use uuid::Uuid;

/// Text layout of persisted timestamps.
///
/// Fixed width, so stored values order lexicographically the same way they
/// order chronologically.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Unique identifier of an image pair.
///
/// Identifiers are random v4 UUIDs and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairId(Uuid);

impl PairId {
    /// Generates a fresh identifier.
    pub fn new() -> Self {
        PairId(Uuid::new_v4())
    }
}

impl Default for PairId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for PairId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for PairId {
    type Err = InvalidPairId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(PairId)
            .map_err(|source| InvalidPairId {
                raw: s.to_string(),
                source,
            })
    }
}

impl TryFrom<String> for PairId {
    type Error = InvalidPairId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The supplied text is not a well-formed pair identifier.
#[derive(Debug, Error)]
#[error("'{raw}' is not a valid image pair id: {source}")]
pub struct InvalidPairId {
    pub raw: String,
    #[source]
    pub source: uuid::Error,
}

/// A stored original/mask pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePair {
    pub id: PairId,
    /// Data URI of the original image.
    pub original_image: String,
    /// Data URI of the mask image.
    pub mask_image: String,
    pub created_at: NaiveDateTime,
}

/// The contents of a pair before the store assigns its id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewImagePair {
    pub original_image: String,
    pub mask_image: String,
}

impl NewImagePair {
    /// Turns the contents into a full document stamped with the current local time.
    pub fn into_pair(self) -> ImagePair {
        ImagePair {
            id: PairId::new(),
            original_image: self.original_image,
            mask_image: self.mask_image,
            created_at: now(),
        }
    }
}

/// Current local time at the precision kept by the store.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(6)
}
