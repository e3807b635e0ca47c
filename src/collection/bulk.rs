//! Bulk write operations
//!
//! A bulk write is a heterogeneous batch of single- and multi-document
//! operations executed against one collection, either ordered (strict
//! left-to-right, abort on first failure) or unordered (bounded
//! concurrency, all attempted, failures aggregated).

use super::collection::Collection;
use super::types::{InsertManyOptions, UpdateOptions};
use crate::error::Result;
use crate::types::JsonValue;
use std::collections::HashMap;

/// One operation inside a `bulk_write` batch
#[derive(Debug, Clone)]
pub enum BulkOperation {
    /// Insert a single document
    InsertOne {
        document: JsonValue,
    },
    /// Insert several documents
    InsertMany {
        documents: Vec<JsonValue>,
        ordered: bool,
    },
    /// Update the first matching document
    UpdateOne {
        filter: JsonValue,
        update: JsonValue,
        upsert: bool,
    },
    /// Update all matching documents
    UpdateMany {
        filter: JsonValue,
        update: JsonValue,
        upsert: bool,
    },
    /// Replace the first matching document wholesale
    ReplaceOne {
        filter: JsonValue,
        replacement: JsonValue,
        upsert: bool,
    },
    /// Delete the first matching document
    DeleteOne {
        filter: JsonValue,
    },
    /// Delete all matching documents
    DeleteMany {
        filter: JsonValue,
    },
}

impl BulkOperation {
    /// Insert a single document
    pub fn insert_one(document: JsonValue) -> Self {
        Self::InsertOne { document }
    }

    /// Insert several documents (ordered within the operation)
    pub fn insert_many(documents: Vec<JsonValue>) -> Self {
        Self::InsertMany {
            documents,
            ordered: true,
        }
    }

    /// Update the first matching document
    pub fn update_one(filter: JsonValue, update: JsonValue, upsert: bool) -> Self {
        Self::UpdateOne {
            filter,
            update,
            upsert,
        }
    }

    /// Update all matching documents
    pub fn update_many(filter: JsonValue, update: JsonValue, upsert: bool) -> Self {
        Self::UpdateMany {
            filter,
            update,
            upsert,
        }
    }

    /// Replace the first matching document
    pub fn replace_one(filter: JsonValue, replacement: JsonValue, upsert: bool) -> Self {
        Self::ReplaceOne {
            filter,
            replacement,
            upsert,
        }
    }

    /// Delete the first matching document
    pub fn delete_one(filter: JsonValue) -> Self {
        Self::DeleteOne { filter }
    }

    /// Delete all matching documents
    pub fn delete_many(filter: JsonValue) -> Self {
        Self::DeleteMany { filter }
    }

    /// Run this operation against `collection`, reporting counters as a
    /// single-operation [`BulkWriteResult`]. `index` is the operation's
    /// position in the batch, used to key upserted ids.
    pub(super) async fn execute(
        &self,
        collection: &Collection,
        index: usize,
    ) -> Result<BulkWriteResult> {
        let mut result = BulkWriteResult::default();
        match self {
            Self::InsertOne { document } => {
                collection.insert_one(document.clone()).await?;
                result.inserted_count = 1;
            }
            Self::InsertMany { documents, ordered } => {
                let inserted = collection
                    .insert_many(
                        documents.clone(),
                        InsertManyOptions::default().ordered(*ordered),
                    )
                    .await?;
                result.inserted_count = inserted.inserted_ids.len() as u64;
            }
            Self::UpdateOne {
                filter,
                update,
                upsert,
            } => {
                let updated = collection
                    .update_one(
                        filter.clone(),
                        update.clone(),
                        UpdateOptions::default().upsert(*upsert),
                    )
                    .await?;
                result.absorb_update(index, updated);
            }
            Self::UpdateMany {
                filter,
                update,
                upsert,
            } => {
                let updated = collection
                    .update_many(filter.clone(), update.clone(), *upsert)
                    .await?;
                result.absorb_update(index, updated);
            }
            Self::ReplaceOne {
                filter,
                replacement,
                upsert,
            } => {
                let updated = collection
                    .replace_one(
                        filter.clone(),
                        replacement.clone(),
                        UpdateOptions::default().upsert(*upsert),
                    )
                    .await?;
                result.absorb_update(index, updated);
            }
            Self::DeleteOne { filter } => {
                let deleted = collection.delete_one(filter.clone(), Default::default()).await?;
                result.deleted_count = deleted.deleted_count;
            }
            Self::DeleteMany { filter } => {
                let deleted = collection.delete_many(filter.clone()).await?;
                result.deleted_count = deleted.deleted_count;
            }
        }
        Ok(result)
    }
}

/// Aggregated counters of a `bulk_write` batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkWriteResult {
    /// Documents inserted, upserts included
    pub inserted_count: u64,
    /// Documents that matched an update/replace filter
    pub matched_count: u64,
    /// Documents actually modified
    pub modified_count: u64,
    /// Documents deleted
    pub deleted_count: u64,
    /// Upserts performed
    pub upserted_count: u64,
    /// Upserted ids, keyed by the operation's index in the batch
    pub upserted_ids: HashMap<usize, JsonValue>,
}

impl BulkWriteResult {
    /// Merge the counters of another (partial) result into this one
    pub fn merge(&mut self, other: Self) {
        self.inserted_count += other.inserted_count;
        self.matched_count += other.matched_count;
        self.modified_count += other.modified_count;
        self.deleted_count += other.deleted_count;
        self.upserted_count += other.upserted_count;
        self.upserted_ids.extend(other.upserted_ids);
    }

    /// Fold an update-style result in. An upsert counts as an insert as
    /// well as an upsert; a plain update contributes match/modify counts.
    fn absorb_update(&mut self, index: usize, update: super::types::UpdateResult) {
        self.matched_count += update.matched_count;
        self.modified_count += update.modified_count;
        if let Some(id) = update.upserted_id {
            self.upserted_count += 1;
            self.inserted_count += 1;
            self.upserted_ids.insert(index, id);
        }
    }
}
