//! # Inpainting Image Pair Store
//!
//! This crate stores pairs of images, an original and its mask, that feed an
//! inpainting workflow. Each pair is kept as one document whose images are
//! embedded as base64 data URIs, so clients can render them without a second
//! request.
//!
//! ## Features
//!
//! - **Pair Upload**: Encode an original and a mask and store them together;
//!   a pair is never stored with only one half.
//! - **Listing and Lookup**: Fetch every pair newest first, or one pair by id.
//! - **Removal**: Delete a pair by id.
//! - **Asynchronous Execution**: All storage access is async on top of SQLx.
//!
//! ## Usage
//!
//! ```no_run
//! use maskpair::app::{Upload, UploadPairCommand};
//! use maskpair::database::Database;
//!
//! async fn store(db: &Database, original: &[u8], mask: &[u8]) {
//!     let command = UploadPairCommand::new()
//!         .with_original(Upload::new(original.to_vec()).with_content_type("image/png"))
//!         .with_mask(Upload::new(mask.to_vec()).with_content_type("image/png"));
//!
//!     match command.execute(db).await {
//!         Ok(pair) => println!("Stored image pair {}", pair.id),
//!         Err(error) => eprintln!("Failed to store image pair: {}", error),
//!     }
//! }
//! ```

pub mod app;
pub mod database;
mod dialect;
pub mod encoding;
pub mod pair;

pub mod prelude {
    pub use crate::app::*;
    pub use crate::database::*;
    pub use crate::encoding::*;
    pub use crate::pair::*;
}
