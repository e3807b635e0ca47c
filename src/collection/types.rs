//! Option and result types for collection operations

use crate::types::{JsonValue, Projection, Sort};

// ============================================================================
// Operation options
// ============================================================================

/// Options for `find`
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    /// Field projection
    pub projection: Option<Projection>,
    /// Sort specification; forces non-paginated retrieval
    pub sort: Option<Sort>,
    /// Number of matching documents to skip
    pub skip: Option<u32>,
    /// Maximum number of documents to return
    pub limit: Option<u32>,
}

impl FindOptions {
    /// Set the projection
    #[must_use]
    pub fn projection(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Set the sort specification
    #[must_use]
    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Set the skip count
    #[must_use]
    pub fn skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Set the limit
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Options for `find_one`
#[derive(Debug, Clone, Default)]
pub struct FindOneOptions {
    /// Field projection
    pub projection: Option<Projection>,
    /// Sort specification (picks which match is returned)
    pub sort: Option<Sort>,
}

impl FindOneOptions {
    /// Set the projection
    #[must_use]
    pub fn projection(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Set the sort specification
    #[must_use]
    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }
}

/// Options for `insert_many`
#[derive(Debug, Clone)]
pub struct InsertManyOptions {
    /// Ordered mode: chunks run strictly left-to-right and the first
    /// failure aborts the rest. Unordered mode attempts everything.
    pub ordered: bool,
    /// Documents per insertMany request
    pub chunk_size: usize,
    /// Fan-out limit for unordered mode (ignored when ordered)
    pub concurrency: usize,
}

impl Default for InsertManyOptions {
    fn default() -> Self {
        Self {
            ordered: true,
            chunk_size: 20,
            concurrency: 1,
        }
    }
}

impl InsertManyOptions {
    /// Set ordered/unordered mode
    #[must_use]
    pub fn ordered(mut self, ordered: bool) -> Self {
        self.ordered = ordered;
        self
    }

    /// Set the chunk size
    #[must_use]
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Set the unordered fan-out limit
    #[must_use]
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}

/// Options for `update_one`, `update_many` and `replace_one`
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    /// Insert a new document when nothing matches
    pub upsert: bool,
    /// Sort specification (picks which match is modified)
    pub sort: Option<Sort>,
}

impl UpdateOptions {
    /// Set the upsert flag
    #[must_use]
    pub fn upsert(mut self, upsert: bool) -> Self {
        self.upsert = upsert;
        self
    }

    /// Set the sort specification
    #[must_use]
    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }
}

/// Which side of the modification `find_one_and_*` returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnDocument {
    /// The document as it was before the modification
    #[default]
    Before,
    /// The document as it is after the modification
    After,
}

impl ReturnDocument {
    /// Wire representation
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
        }
    }
}

/// Options for `find_one_and_update` and `find_one_and_replace`
#[derive(Debug, Clone, Default)]
pub struct FindOneAndModifyOptions {
    /// Field projection applied to the returned document
    pub projection: Option<Projection>,
    /// Sort specification (picks which match is modified)
    pub sort: Option<Sort>,
    /// Insert a new document when nothing matches
    pub upsert: bool,
    /// Return the document from before or after the modification
    pub return_document: ReturnDocument,
}

impl FindOneAndModifyOptions {
    /// Set the projection
    #[must_use]
    pub fn projection(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Set the sort specification
    #[must_use]
    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Set the upsert flag
    #[must_use]
    pub fn upsert(mut self, upsert: bool) -> Self {
        self.upsert = upsert;
        self
    }

    /// Set which document version is returned
    #[must_use]
    pub fn return_document(mut self, return_document: ReturnDocument) -> Self {
        self.return_document = return_document;
        self
    }
}

/// Options for `delete_one` and `find_one_and_delete`
#[derive(Debug, Clone, Default)]
pub struct DeleteOptions {
    /// Sort specification (picks which match is deleted)
    pub sort: Option<Sort>,
}

impl DeleteOptions {
    /// Set the sort specification
    #[must_use]
    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }
}

/// Options for `bulk_write`
#[derive(Debug, Clone)]
pub struct BulkWriteOptions {
    /// Ordered mode: operations run strictly left-to-right and the first
    /// failure aborts the rest. Unordered mode attempts everything.
    pub ordered: bool,
    /// Fan-out limit for unordered mode (ignored when ordered)
    pub concurrency: usize,
}

impl Default for BulkWriteOptions {
    fn default() -> Self {
        Self {
            ordered: true,
            concurrency: 1,
        }
    }
}

impl BulkWriteOptions {
    /// Set ordered/unordered mode
    #[must_use]
    pub fn ordered(mut self, ordered: bool) -> Self {
        self.ordered = ordered;
        self
    }

    /// Set the unordered fan-out limit
    #[must_use]
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}

// ============================================================================
// Operation results
// ============================================================================

/// Result of `insert_one`
#[derive(Debug, Clone, PartialEq)]
pub struct InsertOneResult {
    /// The id of the inserted document (server-generated when absent
    /// from the submitted document)
    pub inserted_id: JsonValue,
}

/// Result of `insert_many`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertManyResult {
    /// The ids of all inserted documents, in insertion order per chunk
    pub inserted_ids: Vec<JsonValue>,
}

/// Result of `update_one`, `update_many` and `replace_one`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateResult {
    /// Documents that matched the filter
    pub matched_count: u64,
    /// Documents actually modified
    pub modified_count: u64,
    /// Id of the upserted document, when an upsert happened
    pub upserted_id: Option<JsonValue>,
}

/// Result of `delete_one` and `delete_many`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteResult {
    /// Documents deleted
    pub deleted_count: u64,
}
