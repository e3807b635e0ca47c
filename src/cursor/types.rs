//! Cursor types and the page-fetch seam
//!
//! Defines the immutable query specification, the cursor lifecycle states,
//! and the [`PageFetcher`] trait the cursor pulls pages through.

use crate::error::{Error, Result};
use crate::types::{Document, JsonValue, Projection, Sort};
use async_trait::async_trait;

/// Immutable description of a find query.
///
/// A cursor captures one of these at construction and never mutates it;
/// rewinding or cloning a cursor reuses the same spec.
#[derive(Debug, Clone, Default)]
pub struct QuerySpec {
    /// Filter predicate, in the server's query language (pass-through)
    pub filter: Option<JsonValue>,
    /// Field projection
    pub projection: Option<Projection>,
    /// Sort specification; forces non-paginated retrieval
    pub sort: Option<Sort>,
    /// Number of matching documents to skip
    pub skip: Option<u32>,
    /// Maximum number of documents to yield
    pub limit: Option<u32>,
}

impl QuerySpec {
    /// A copy of this spec with skip/limit cleared.
    ///
    /// Used for sorted retrievals, where skip and limit are applied
    /// client-side against the fully materialized sorted set.
    pub fn without_paging(&self) -> Self {
        Self {
            skip: None,
            limit: None,
            ..self.clone()
        }
    }
}

/// One page of fetched documents plus the continuation token
#[derive(Debug, Clone, Default)]
pub struct FetchedPage {
    /// Documents of this page, in server order
    pub documents: Vec<Document>,
    /// Token to resume the scan; `None` on the last page
    pub next_page_state: Option<String>,
}

/// One network round trip per page.
///
/// Implementations must be safe to call repeatedly with the same token
/// (a fetch must not invalidate its own token server-side). Fetch
/// failures are propagated verbatim by the cursor; retrying is the
/// transport's business, not the cursor's.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one page for `query`, resuming from `page_state` when given
    async fn fetch_page(&self, query: &QuerySpec, page_state: Option<&str>)
        -> Result<FetchedPage>;
}

/// Lifecycle state of a cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorState {
    /// Created, nothing fetched yet
    #[default]
    Idle,
    /// At least one document yielded
    Started,
    /// Fully consumed; no further fetches will happen
    Exhausted,
    /// Explicitly closed; permanently non-iterable
    Closed,
}

/// A positional access key for a cursor: a single index or a range.
///
/// Mirrors the dynamic indexing surface of document APIs: a JSON number
/// is an index, a `{"start": i, "end": j}` object is a range, and any
/// other shape is rejected before touching the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorKey {
    /// Single absolute position
    Index(usize),
    /// Half-open absolute range `[start, end)`
    Range(usize, usize),
}

impl TryFrom<&JsonValue> for CursorKey {
    type Error = Error;

    fn try_from(key: &JsonValue) -> Result<Self> {
        match key {
            JsonValue::Number(n) => n
                .as_u64()
                .map(|i| Self::Index(i as usize))
                .ok_or_else(|| Error::invalid_index_key(key)),
            JsonValue::Object(map) => {
                let bound = |name: &str| map.get(name).and_then(JsonValue::as_u64);
                match (bound("start"), bound("end")) {
                    (Some(start), Some(end)) if map.len() == 2 => {
                        Ok(Self::Range(start as usize, end as usize))
                    }
                    _ => Err(Error::invalid_index_key(key)),
                }
            }
            other => Err(Error::invalid_index_key(other)),
        }
    }
}
