//! The collection handle and its CRUD surface

use super::bulk::{BulkOperation, BulkWriteResult};
use super::types::{
    BulkWriteOptions, DeleteOptions, DeleteResult, FindOneAndModifyOptions, FindOneOptions,
    FindOptions, InsertManyOptions, InsertManyResult, InsertOneResult, UpdateOptions, UpdateResult,
};
use crate::cursor::{split_field_path, FetchedPage, FindCursor, PageFetcher, QuerySpec};
use crate::error::{Error, Result};
use crate::http::DataApiClient;
use crate::types::{Document, JsonObject, JsonValue, Projection, Sort};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// A handle on one named document collection.
///
/// Cheap to clone; all clones share the underlying transport. Every
/// operation is one or more POSTed command envelopes against the
/// collection's endpoint (`{base_url}/{keyspace}/{name}`).
#[derive(Clone)]
pub struct Collection {
    client: Arc<DataApiClient>,
    keyspace: String,
    name: String,
}

impl Collection {
    /// Create a collection handle
    pub fn new(
        client: Arc<DataApiClient>,
        keyspace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            client,
            keyspace: keyspace.into(),
            name: name.into(),
        }
    }

    /// The collection name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The keyspace this collection lives in
    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    /// Request path of this collection, relative to the API base URL
    pub fn path(&self) -> String {
        format!("{}/{}", self.keyspace, self.name)
    }

    // ========================================================================
    // Insert
    // ========================================================================

    /// Insert a single document, returning its id
    pub async fn insert_one(&self, document: JsonValue) -> Result<InsertOneResult> {
        let body = json!({"insertOne": {"document": document}});
        let response = self.client.command_ok(&self.path(), &body).await?;
        let inserted_id = response
            .status_field("insertedIds")
            .and_then(JsonValue::as_array)
            .and_then(|ids| ids.first())
            .cloned()
            .unwrap_or(JsonValue::Null);
        Ok(InsertOneResult { inserted_id })
    }

    /// Insert several documents, in chunks.
    ///
    /// Ordered mode submits chunks strictly left-to-right and stops at
    /// the first failure; unordered mode fans chunks out with bounded
    /// concurrency and attempts all of them. Either way a failure is
    /// reported as [`Error::InsertMany`] carrying the ids that were
    /// inserted regardless.
    pub async fn insert_many(
        &self,
        documents: Vec<JsonValue>,
        options: InsertManyOptions,
    ) -> Result<InsertManyResult> {
        debug!(
            collection = self.name,
            count = documents.len(),
            ordered = options.ordered,
            "insert_many"
        );
        if options.ordered {
            self.insert_many_ordered(documents, options.chunk_size).await
        } else {
            self.insert_many_unordered(documents, options.chunk_size, options.concurrency)
                .await
        }
    }

    async fn insert_many_ordered(
        &self,
        documents: Vec<JsonValue>,
        chunk_size: usize,
    ) -> Result<InsertManyResult> {
        let path = self.path();
        let mut inserted_ids: Vec<JsonValue> = Vec::new();
        for chunk in documents.chunks(chunk_size) {
            let body = json!({"insertMany": {
                "documents": chunk,
                "options": {"ordered": true},
            }});
            let response = match self.client.command(&path, &body).await {
                Ok(response) => response,
                Err(cause) => {
                    return Err(Error::InsertMany {
                        inserted_ids,
                        cause: Box::new(cause),
                    })
                }
            };
            inserted_ids.extend(extract_inserted_ids(&response));
            if response.has_errors() {
                return Err(Error::InsertMany {
                    inserted_ids,
                    cause: Box::new(Error::Api {
                        errors: response.errors,
                    }),
                });
            }
        }
        Ok(InsertManyResult { inserted_ids })
    }

    async fn insert_many_unordered(
        &self,
        documents: Vec<JsonValue>,
        chunk_size: usize,
        concurrency: usize,
    ) -> Result<InsertManyResult> {
        let path = self.path();
        let chunks: Vec<Vec<JsonValue>> = documents
            .chunks(chunk_size)
            .map(<[JsonValue]>::to_vec)
            .collect();

        let outcomes: Vec<(Vec<JsonValue>, Option<Error>)> = stream::iter(chunks)
            .map(|chunk| {
                let path = path.clone();
                async move {
                    let body = json!({"insertMany": {
                        "documents": chunk,
                        "options": {"ordered": false},
                    }});
                    match self.client.command(&path, &body).await {
                        Ok(response) => {
                            let ids = extract_inserted_ids(&response);
                            let failure = response.has_errors().then(|| Error::Api {
                                errors: response.errors,
                            });
                            (ids, failure)
                        }
                        Err(cause) => (Vec::new(), Some(cause)),
                    }
                }
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        let mut inserted_ids = Vec::new();
        let mut first_failure = None;
        for (ids, failure) in outcomes {
            inserted_ids.extend(ids);
            if first_failure.is_none() {
                first_failure = failure;
            }
        }
        match first_failure {
            None => Ok(InsertManyResult { inserted_ids }),
            Some(cause) => Err(Error::InsertMany {
                inserted_ids,
                cause: Box::new(cause),
            }),
        }
    }

    // ========================================================================
    // Find
    // ========================================================================

    /// Build a lazy cursor over all documents matching `filter`
    pub fn find(&self, filter: Option<JsonValue>, options: FindOptions) -> FindCursor {
        let query = QuerySpec {
            filter,
            projection: options.projection,
            sort: options.sort,
            skip: options.skip,
            limit: options.limit,
        };
        FindCursor::new(Arc::new(self.clone()), query)
    }

    /// Fetch the first document matching `filter`, if any
    pub async fn find_one(
        &self,
        filter: Option<JsonValue>,
        options: FindOneOptions,
    ) -> Result<Option<Document>> {
        let mut command = JsonObject::new();
        insert_filter(&mut command, filter);
        insert_projection(&mut command, options.projection.as_ref());
        insert_sort(&mut command, options.sort.as_ref());
        let body = json!({ "findOne": command });
        let response = self.client.command_ok(&self.path(), &body).await?;
        Ok(response.data.and_then(|data| data.document))
    }

    /// Distinct values at a dotted field path across matching documents.
    ///
    /// The path is validated before any network access; extraction and
    /// structural deduplication happen client-side via a find cursor.
    pub async fn distinct(
        &self,
        path: &str,
        filter: Option<JsonValue>,
    ) -> Result<Vec<JsonValue>> {
        split_field_path(path)?;
        let mut cursor = self.find(filter, FindOptions::default());
        cursor.distinct(path).await
    }

    /// Count matching documents, failing when the count exceeds
    /// `upper_bound` or the server's own counting ceiling.
    pub async fn count_documents(
        &self,
        filter: Option<JsonValue>,
        upper_bound: u64,
    ) -> Result<u64> {
        let mut command = JsonObject::new();
        insert_filter(&mut command, filter);
        let body = json!({ "countDocuments": command });
        let response = self.client.command_ok(&self.path(), &body).await?;
        if response.status_flag("moreData") {
            return Err(Error::TooManyDocuments { upper_bound });
        }
        let count = response.status_count("count");
        if count > upper_bound {
            return Err(Error::TooManyDocuments { upper_bound });
        }
        Ok(count)
    }

    // ========================================================================
    // Update / replace
    // ========================================================================

    /// Update the first document matching `filter`
    pub async fn update_one(
        &self,
        filter: JsonValue,
        update: JsonValue,
        options: UpdateOptions,
    ) -> Result<UpdateResult> {
        let mut command = JsonObject::new();
        command.insert("filter".to_string(), filter);
        command.insert("update".to_string(), update);
        insert_sort(&mut command, options.sort.as_ref());
        if options.upsert {
            command.insert("options".to_string(), json!({"upsert": true}));
        }
        let body = json!({ "updateOne": command });
        let response = self.client.command_ok(&self.path(), &body).await?;
        Ok(update_result_from_status(&response))
    }

    /// Update all documents matching `filter`.
    ///
    /// The server modifies a bounded chunk per request; this loops until
    /// it reports no more matching data, accumulating counts.
    pub async fn update_many(
        &self,
        filter: JsonValue,
        update: JsonValue,
        upsert: bool,
    ) -> Result<UpdateResult> {
        let path = self.path();
        let mut result = UpdateResult::default();
        let mut page_state: Option<String> = None;
        loop {
            let mut options = JsonObject::new();
            if upsert {
                options.insert("upsert".to_string(), JsonValue::Bool(true));
            }
            if let Some(token) = &page_state {
                options.insert("pageState".to_string(), JsonValue::from(token.clone()));
            }
            let mut command = JsonObject::new();
            command.insert("filter".to_string(), filter.clone());
            command.insert("update".to_string(), update.clone());
            if !options.is_empty() {
                command.insert("options".to_string(), JsonValue::Object(options));
            }
            let body = json!({ "updateMany": command });
            let response = self.client.command_ok(&path, &body).await?;

            let chunk = update_result_from_status(&response);
            result.matched_count += chunk.matched_count;
            result.modified_count += chunk.modified_count;
            if chunk.upserted_id.is_some() {
                result.upserted_id = chunk.upserted_id;
            }

            if !response.status_flag("moreData") {
                return Ok(result);
            }
            page_state = response
                .status_field("nextPageState")
                .and_then(JsonValue::as_str)
                .map(ToString::to_string);
        }
    }

    /// Replace the first document matching `filter` wholesale
    pub async fn replace_one(
        &self,
        filter: JsonValue,
        replacement: JsonValue,
        options: UpdateOptions,
    ) -> Result<UpdateResult> {
        let mut command = JsonObject::new();
        command.insert("filter".to_string(), filter);
        command.insert("replacement".to_string(), replacement);
        insert_sort(&mut command, options.sort.as_ref());
        if options.upsert {
            command.insert("options".to_string(), json!({"upsert": true}));
        }
        let body = json!({ "findOneAndReplace": command });
        let response = self.client.command_ok(&self.path(), &body).await?;
        Ok(update_result_from_status(&response))
    }

    /// Replace the first matching document and return it (before or
    /// after the replacement, per the options)
    pub async fn find_one_and_replace(
        &self,
        filter: JsonValue,
        replacement: JsonValue,
        options: FindOneAndModifyOptions,
    ) -> Result<Option<Document>> {
        let mut command = JsonObject::new();
        command.insert("filter".to_string(), filter);
        command.insert("replacement".to_string(), replacement);
        insert_projection(&mut command, options.projection.as_ref());
        insert_sort(&mut command, options.sort.as_ref());
        command.insert(
            "options".to_string(),
            json!({
                "upsert": options.upsert,
                "returnDocument": options.return_document.as_str(),
            }),
        );
        let body = json!({ "findOneAndReplace": command });
        let response = self.client.command_ok(&self.path(), &body).await?;
        Ok(response.data.and_then(|data| data.document))
    }

    /// Update the first matching document and return it (before or
    /// after the update, per the options)
    pub async fn find_one_and_update(
        &self,
        filter: JsonValue,
        update: JsonValue,
        options: FindOneAndModifyOptions,
    ) -> Result<Option<Document>> {
        let mut command = JsonObject::new();
        command.insert("filter".to_string(), filter);
        command.insert("update".to_string(), update);
        insert_projection(&mut command, options.projection.as_ref());
        insert_sort(&mut command, options.sort.as_ref());
        command.insert(
            "options".to_string(),
            json!({
                "upsert": options.upsert,
                "returnDocument": options.return_document.as_str(),
            }),
        );
        let body = json!({ "findOneAndUpdate": command });
        let response = self.client.command_ok(&self.path(), &body).await?;
        Ok(response.data.and_then(|data| data.document))
    }

    // ========================================================================
    // Delete
    // ========================================================================

    /// Delete the first document matching `filter`
    pub async fn delete_one(
        &self,
        filter: JsonValue,
        options: DeleteOptions,
    ) -> Result<DeleteResult> {
        let mut command = JsonObject::new();
        command.insert("filter".to_string(), filter);
        insert_sort(&mut command, options.sort.as_ref());
        let body = json!({ "deleteOne": command });
        let response = self.client.command_ok(&self.path(), &body).await?;
        Ok(DeleteResult {
            deleted_count: response.status_count("deletedCount"),
        })
    }

    /// Delete all documents matching `filter`.
    ///
    /// An empty filter is rejected with [`Error::EmptyFilter`]:
    /// unconditional deletion must go through [`Self::delete_all`]. The
    /// server deletes a bounded chunk per request; this loops until it
    /// reports no more matches.
    pub async fn delete_many(&self, filter: JsonValue) -> Result<DeleteResult> {
        let empty = match &filter {
            JsonValue::Object(map) => map.is_empty(),
            JsonValue::Null => true,
            _ => false,
        };
        if empty {
            return Err(Error::empty_filter("delete_many"));
        }

        let path = self.path();
        let mut deleted_count = 0;
        loop {
            let body = json!({"deleteMany": {"filter": filter}});
            let response = self.client.command_ok(&path, &body).await?;
            deleted_count += response.status_count("deletedCount");
            if !response.status_flag("moreData") {
                return Ok(DeleteResult { deleted_count });
            }
        }
    }

    /// Delete every document in the collection
    pub async fn delete_all(&self) -> Result<()> {
        let path = self.path();
        loop {
            let body = json!({"deleteMany": {"filter": {}}});
            let response = self.client.command_ok(&path, &body).await?;
            if !response.status_flag("moreData") {
                return Ok(());
            }
        }
    }

    /// Delete the first matching document and return it
    pub async fn find_one_and_delete(
        &self,
        filter: JsonValue,
        options: FindOneOptions,
    ) -> Result<Option<Document>> {
        let mut command = JsonObject::new();
        command.insert("filter".to_string(), filter);
        insert_projection(&mut command, options.projection.as_ref());
        insert_sort(&mut command, options.sort.as_ref());
        let body = json!({ "findOneAndDelete": command });
        let response = self.client.command_ok(&self.path(), &body).await?;
        Ok(response.data.and_then(|data| data.document))
    }

    // ========================================================================
    // Bulk write
    // ========================================================================

    /// Execute a heterogeneous batch of write operations.
    ///
    /// Ordered mode runs operations strictly left-to-right and aborts on
    /// the first failure; unordered mode fans them out with bounded
    /// concurrency and attempts all of them. Failures are reported as
    /// [`Error::BulkWrite`] carrying the partial result.
    pub async fn bulk_write(
        &self,
        operations: Vec<BulkOperation>,
        options: BulkWriteOptions,
    ) -> Result<BulkWriteResult> {
        debug!(
            collection = self.name,
            operations = operations.len(),
            ordered = options.ordered,
            "bulk_write"
        );
        if options.ordered {
            let mut result = BulkWriteResult::default();
            for (index, operation) in operations.iter().enumerate() {
                match operation.execute(self, index).await {
                    Ok(partial) => result.merge(partial),
                    Err(cause) => {
                        return Err(Error::BulkWrite {
                            partial_result: Box::new(result),
                            causes: vec![cause],
                        })
                    }
                }
            }
            Ok(result)
        } else {
            let outcomes: Vec<Result<BulkWriteResult>> =
                stream::iter(operations.iter().enumerate())
                    .map(|(index, operation)| operation.execute(self, index))
                    .buffer_unordered(options.concurrency)
                    .collect()
                    .await;

            let mut result = BulkWriteResult::default();
            let mut causes = Vec::new();
            for outcome in outcomes {
                match outcome {
                    Ok(partial) => result.merge(partial),
                    Err(cause) => causes.push(cause),
                }
            }
            if causes.is_empty() {
                Ok(result)
            } else {
                Err(Error::BulkWrite {
                    partial_result: Box::new(result),
                    causes,
                })
            }
        }
    }
}

/// The cursor's page-fetch seam: one `find` command per page
#[async_trait]
impl PageFetcher for Collection {
    async fn fetch_page(
        &self,
        query: &QuerySpec,
        page_state: Option<&str>,
    ) -> Result<FetchedPage> {
        let mut command = JsonObject::new();
        insert_filter(&mut command, query.filter.clone());
        insert_projection(&mut command, query.projection.as_ref());
        insert_sort(&mut command, query.sort.as_ref());

        let mut options = JsonObject::new();
        if let Some(skip) = query.skip {
            options.insert("skip".to_string(), JsonValue::from(skip));
        }
        if let Some(limit) = query.limit {
            options.insert("limit".to_string(), JsonValue::from(limit));
        }
        if let Some(token) = page_state {
            options.insert("pageState".to_string(), JsonValue::from(token));
        }
        if !options.is_empty() {
            command.insert("options".to_string(), JsonValue::Object(options));
        }

        let body = json!({ "find": command });
        let response = self.client.command_ok(&self.path(), &body).await?;
        let data = response.data.unwrap_or_default();
        Ok(FetchedPage {
            documents: data.documents,
            next_page_state: data.next_page_state,
        })
    }
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("keyspace", &self.keyspace)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Command envelope helpers
// ============================================================================

fn extract_inserted_ids(response: &crate::http::ApiResponse) -> Vec<JsonValue> {
    response
        .status_field("insertedIds")
        .and_then(JsonValue::as_array)
        .map(Clone::clone)
        .unwrap_or_default()
}

fn insert_filter(command: &mut JsonObject, filter: Option<JsonValue>) {
    command.insert("filter".to_string(), filter.unwrap_or_else(|| json!({})));
}

fn insert_projection(command: &mut JsonObject, projection: Option<&Projection>) {
    if let Some(projection) = projection {
        command.insert("projection".to_string(), projection.to_json());
    }
}

fn insert_sort(command: &mut JsonObject, sort: Option<&Sort>) {
    if let Some(sort) = sort {
        command.insert("sort".to_string(), sort.to_json());
    }
}

fn update_result_from_status(response: &crate::http::ApiResponse) -> UpdateResult {
    UpdateResult {
        matched_count: response.status_count("matchedCount"),
        modified_count: response.status_count("modifiedCount"),
        upserted_id: response.status_field("upsertedId").cloned(),
    }
}
