// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]

//! # Data API SDK
//!
//! A minimal, Rust-native client SDK for document databases exposed over an
//! HTTP/JSON "Data API": one POST endpoint per collection, command-envelope
//! request bodies, `{data, status, errors}` response envelopes.
//!
//! ## Features
//!
//! - **Collection CRUD**: insert, find, update, replace, delete, bulk writes
//! - **Lazy cursors**: server-side pagination hidden behind a rewindable,
//!   clonable, sliceable iteration surface
//! - **Ordered/unordered batches**: strict left-to-right execution or
//!   bounded-concurrency fan-out
//! - **Robust transport**: retries with backoff, 429 handling, timeouts
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dataapi_sdk::{Database, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let db = Database::new("https://db.example.com/api/json/v1", "AstraCS:...")?;
//!     let coll = db.collection("people");
//!
//!     coll.insert_one(serde_json::json!({"name": "Ann"})).await?;
//!     let mut cursor = coll.find(None, Default::default());
//!     while let Some(doc) = cursor.next().await? {
//!         println!("{doc:?}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        Database                          │
//! │                collection(name) → Collection             │
//! └──────────────────────────────────────────────────────────┘
//!                             │
//! ┌───────────────┬──────────┴───────────┬───────────────────┐
//! │  Collection   │       Cursor         │     Transport     │
//! ├───────────────┼──────────────────────┼───────────────────┤
//! │ insert_*      │ next / rewind        │ POST command      │
//! │ find / count  │ clone / close        │ Retry / Backoff   │
//! │ update/delete │ slice / distinct     │ Token header      │
//! │ bulk_write    │ page-state tracking  │ Error mapping     │
//! └───────────────┴──────────────────────┴───────────────────┘
//! ```

#![warn(clippy::all)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the SDK
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP transport for the Data API command protocol
pub mod http;

/// Lazy, rewindable cursors over paginated result sets
pub mod cursor;

/// Collection-level CRUD operations
pub mod collection;

/// Database handle (keyspace-scoped collection factory)
pub mod database;

// ============================================================================
// Re-exports
// ============================================================================

pub use collection::{
    BulkOperation, BulkWriteOptions, BulkWriteResult, Collection, DeleteOptions, DeleteResult,
    FindOneAndModifyOptions, FindOneOptions, FindOptions, InsertManyOptions, InsertManyResult,
    InsertOneResult, ReturnDocument, UpdateOptions, UpdateResult,
};
pub use cursor::{CursorState, FetchedPage, FindCursor, PageFetcher, QuerySpec};
pub use database::Database;
pub use error::{Error, Result};
pub use http::{ApiError, ApiResponse, DataApiClient, DataApiClientConfig};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
