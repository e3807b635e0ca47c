//! The find cursor state machine

use super::distinct::{extract_path_values, split_field_path};
use super::types::{CursorKey, CursorState, PageFetcher, QuerySpec};
use crate::error::{Error, Result};
use crate::types::{Document, JsonValue};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

static NEXT_CURSOR_ID: AtomicU64 = AtomicU64::new(1);

/// A lazy, stateful, resumable sequence of documents matching a query.
///
/// The cursor owns pagination state: it buffers one page at a time,
/// tracks the continuation token, and counts the documents yielded since
/// the last rewind. Iteration is single-task (`&mut self`); clones are
/// fully independent and may be driven concurrently.
///
/// When the query carries a sort specification the whole matching set is
/// materialized by a single non-paginated fetch, with skip and limit
/// applied client-side: stable ordering cannot be guaranteed across
/// independently fetched server pages.
pub struct FindCursor {
    fetcher: Arc<dyn PageFetcher>,
    query: QuerySpec,
    state: CursorState,
    buffer: VecDeque<Document>,
    page_state: Option<String>,
    /// Set once the server stops returning a continuation token; the
    /// buffer may still hold documents of the final page.
    final_page: bool,
    retrieved: usize,
    cursor_id: u64,
}

impl FindCursor {
    /// Create an idle cursor over `query`, pulling pages through `fetcher`
    pub fn new(fetcher: Arc<dyn PageFetcher>, query: QuerySpec) -> Self {
        Self {
            fetcher,
            query,
            state: CursorState::Idle,
            buffer: VecDeque::new(),
            page_state: None,
            final_page: false,
            retrieved: 0,
            cursor_id: NEXT_CURSOR_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Process-unique identity of this cursor, for diagnostic correlation
    pub fn cursor_id(&self) -> u64 {
        self.cursor_id
    }

    /// Current lifecycle state
    pub fn state(&self) -> CursorState {
        self.state
    }

    /// The immutable query specification this cursor was built with
    pub fn query(&self) -> &QuerySpec {
        &self.query
    }

    /// Number of documents yielded since construction or the last rewind
    pub fn retrieved(&self) -> usize {
        self.retrieved
    }

    /// True iff further advancement may still succeed: not closed and not
    /// yet proven exhausted. Does not force a fetch.
    pub fn alive(&self) -> bool {
        matches!(self.state, CursorState::Idle | CursorState::Started)
    }

    /// Advance iteration by one document.
    ///
    /// `Ok(None)` is the end-of-sequence signal; a closed cursor fails
    /// with [`Error::CursorClosed`] and never triggers a fetch.
    pub async fn next(&mut self) -> Result<Option<Document>> {
        if self.state == CursorState::Closed {
            return Err(Error::cursor_closed(self.cursor_id));
        }
        loop {
            if let Some(doc) = self.buffer.pop_front() {
                self.retrieved += 1;
                self.state = CursorState::Started;
                return Ok(Some(doc));
            }
            if self.state == CursorState::Exhausted || self.final_page {
                self.state = CursorState::Exhausted;
                return Ok(None);
            }
            if self.query.sort.is_some() {
                self.fetch_sorted().await?;
            } else {
                self.fetch_next_page().await?;
            }
        }
    }

    /// Reset iteration to the start without touching the query spec.
    ///
    /// Valid from any non-closed state, mid-iteration included; a closed
    /// cursor stays closed. Returns `self` for chaining.
    pub fn rewind(&mut self) -> &mut Self {
        if self.state != CursorState::Closed {
            self.buffer.clear();
            self.page_state = None;
            self.final_page = false;
            self.retrieved = 0;
            self.state = CursorState::Idle;
        }
        self
    }

    /// Permanently close the cursor, releasing buffered documents.
    ///
    /// Idempotent. After close, [`Self::next`] fails with
    /// [`Error::CursorClosed`] and no fetch ever happens again.
    pub fn close(&mut self) {
        self.state = CursorState::Closed;
        self.buffer.clear();
        self.page_state = None;
    }

    /// Consume the remainder of the cursor into a vector
    pub async fn to_vec(&mut self) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        while let Some(doc) = self.next().await? {
            documents.push(doc);
        }
        Ok(documents)
    }

    /// The document at absolute position `index` (counted from the start
    /// of the traversal, i.e. since the last rewind).
    ///
    /// Positional access consumes intervening documents. If the cursor
    /// has already advanced past `index` it rewinds internally before
    /// counting, so repeated calls are deterministic.
    pub async fn at(&mut self, index: usize) -> Result<Option<Document>> {
        Ok(self
            .slice(index, index.saturating_add(1))
            .await?
            .into_iter()
            .next())
    }

    /// The documents in the absolute half-open range `[start, end)`.
    ///
    /// Same positional semantics as [`Self::at`]; a range beyond the end
    /// of the result set is truncated, not an error.
    pub async fn slice(&mut self, start: usize, end: usize) -> Result<Vec<Document>> {
        if self.state == CursorState::Closed {
            return Err(Error::cursor_closed(self.cursor_id));
        }
        if self.retrieved > start {
            self.rewind();
        }
        while self.retrieved < start {
            if self.next().await?.is_none() {
                return Ok(Vec::new());
            }
        }
        let mut documents = Vec::new();
        while self.retrieved < end {
            match self.next().await? {
                Some(doc) => documents.push(doc),
                None => break,
            }
        }
        Ok(documents)
    }

    /// Dynamic positional access with a JSON key.
    ///
    /// Integer keys behave like [`Self::at`], `{"start", "end"}` objects
    /// like [`Self::slice`]; any other key shape fails with
    /// [`Error::InvalidIndexKey`] before any fetch.
    pub async fn get(&mut self, key: &JsonValue) -> Result<Vec<Document>> {
        match CursorKey::try_from(key)? {
            CursorKey::Index(index) => Ok(self.at(index).await?.into_iter().collect()),
            CursorKey::Range(start, end) => self.slice(start, end).await,
        }
    }

    /// Consume the remainder of the cursor (no rewind first) and collect
    /// the distinct values at a dotted field path.
    ///
    /// Array leaf values flatten one level, so each element contributes
    /// separately. Deduplication is structural: nested objects compare by
    /// content, via a linear scan rather than hashing.
    pub async fn distinct(&mut self, path: &str) -> Result<Vec<JsonValue>> {
        // Path validation happens before any fetch
        let segments = split_field_path(path)?;
        let mut distinct_values: Vec<JsonValue> = Vec::new();
        while let Some(doc) = self.next().await? {
            for value in extract_path_values(&JsonValue::Object(doc), &segments) {
                let candidates = match value {
                    JsonValue::Array(items) => items,
                    other => vec![other],
                };
                for candidate in candidates {
                    if !distinct_values.contains(&candidate) {
                        distinct_values.push(candidate);
                    }
                }
            }
        }
        Ok(distinct_values)
    }

    async fn fetch_next_page(&mut self) -> Result<()> {
        debug!(
            cursor_id = self.cursor_id,
            page_state = ?self.page_state,
            "fetching next page"
        );
        let page = self
            .fetcher
            .fetch_page(&self.query, self.page_state.as_deref())
            .await?;
        self.buffer.extend(page.documents);
        self.page_state = page.next_page_state;
        if self.page_state.is_none() {
            self.final_page = true;
        }
        Ok(())
    }

    /// Sorted queries materialize in one fetch; skip and limit apply
    /// client-side against the complete sorted set.
    async fn fetch_sorted(&mut self) -> Result<()> {
        debug!(
            cursor_id = self.cursor_id,
            "fetching sorted result set (non-paginated)"
        );
        let page = self
            .fetcher
            .fetch_page(&self.query.without_paging(), None)
            .await?;
        let skip = self.query.skip.unwrap_or(0) as usize;
        let take = self.query.limit.map_or(usize::MAX, |limit| limit as usize);
        self.buffer
            .extend(page.documents.into_iter().skip(skip).take(take));
        self.page_state = None;
        self.final_page = true;
        Ok(())
    }
}

impl Clone for FindCursor {
    /// An independent cursor over the same query spec, reset to idle.
    /// Iteration state (buffer, token, counters) is never shared.
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.fetcher), self.query.clone())
    }
}

impl std::fmt::Debug for FindCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FindCursor")
            .field("cursor_id", &self.cursor_id)
            .field("state", &self.state)
            .field("retrieved", &self.retrieved)
            .field("buffered", &self.buffer.len())
            .field("page_state", &self.page_state)
            .finish_non_exhaustive()
    }
}
