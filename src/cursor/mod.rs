//! Lazy, rewindable cursors over paginated result sets
//!
//! # Overview
//!
//! A [`FindCursor`] presents a uniform, restartable, lazily-evaluated
//! sequence of documents matching a query, built atop a paginated fetch
//! primitive ([`PageFetcher`]), while hiding page boundaries from the
//! consumer. It is an explicit state machine rather than a generator, so
//! that rewind, clone, and positional access can inspect and reset the
//! iteration state.

mod distinct;
mod find_cursor;
mod types;

pub use distinct::split_field_path;
pub use find_cursor::FindCursor;
pub use types::{CursorKey, CursorState, FetchedPage, PageFetcher, QuerySpec};
