//! Collection-level CRUD operations
//!
//! # Overview
//!
//! A [`Collection`] is a handle on one named document collection. It
//! translates typed operations into Data API command envelopes, maps the
//! response envelopes into result structs, and implements the cursor's
//! page-fetch seam for `find`. Multi-document operations (insert_many,
//! update_many, delete_many, bulk_write) handle server-side chunking and
//! offer ordered (strict left-to-right, abort-on-first-failure) and
//! unordered (bounded-concurrency, failures aggregated) execution.

#[allow(clippy::module_inception)]
mod collection;

mod bulk;
mod types;

pub use bulk::{BulkOperation, BulkWriteResult};
pub use collection::Collection;
pub use types::{
    BulkWriteOptions, DeleteOptions, DeleteResult, FindOneAndModifyOptions, FindOneOptions,
    FindOptions, InsertManyOptions, InsertManyResult, InsertOneResult, ReturnDocument,
    UpdateOptions, UpdateResult,
};
