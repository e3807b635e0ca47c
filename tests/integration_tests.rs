//! Integration tests using a mock Data API server
//!
//! Tests the full end-to-end flow: typed operation → command envelope →
//! response envelope → result structs, including multi-request operations
//! (cursor pagination, chunked inserts, looped updateMany/deleteMany).

use dataapi_sdk::{
    BulkOperation, BulkWriteOptions, Database, Error, FindOneAndModifyOptions, FindOneOptions,
    FindOptions, InsertManyOptions, Projection, ReturnDocument, Sort, UpdateOptions,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COLLECTION_PATH: &str = "/default_keyspace/test_collection";

async fn database(server: &MockServer) -> Database {
    // RUST_LOG=dataapi_sdk=debug shows the request/retry flow when a test fails
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
    Database::new(server.uri(), "test-token").unwrap()
}

fn seq_docs(range: std::ops::Range<u64>) -> Vec<serde_json::Value> {
    range.map(|seq| json!({"_id": seq.to_string(), "seq": seq})).collect()
}

// ============================================================================
// Transport
// ============================================================================

#[tokio::test]
async fn test_token_header_on_commands() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .and(header("Token", "test-token"))
        .and(body_partial_json(json!({"findOne": {}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"document": {"_id": "a", "seq": 0}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let coll = database(&server).await.collection("test_collection");
    let doc = coll.find_one(None, Default::default()).await.unwrap().unwrap();
    assert_eq!(doc.get("seq"), Some(&json!(0)));
}

#[tokio::test]
async fn test_envelope_errors_surface_as_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{"message": "Unknown command", "errorCode": "COMMAND_UNKNOWN"}]
        })))
        .mount(&server)
        .await;

    let coll = database(&server).await.collection("test_collection");
    let err = coll.find_one(None, Default::default()).await.unwrap_err();
    match err {
        Error::Api { errors } => {
            assert_eq!(errors[0].error_code.as_deref(), Some("COMMAND_UNKNOWN"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

// ============================================================================
// Find and cursors
// ============================================================================

#[tokio::test]
async fn test_cursor_paginates_across_requests() {
    let server = MockServer::start().await;

    // Second page: matched by its continuation token, mounted first so it
    // takes precedence over the generic find mock.
    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .and(body_partial_json(
            json!({"find": {"options": {"pageState": "page-1"}}}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"documents": seq_docs(2..4), "nextPageState": null}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .and(body_partial_json(json!({"find": {}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"documents": seq_docs(0..2), "nextPageState": "page-1"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let coll = database(&server).await.collection("test_collection");
    let mut cursor = coll.find(None, FindOptions::default());
    let mut seqs = Vec::new();
    while let Some(doc) = cursor.next().await.unwrap() {
        seqs.push(doc.get("seq").and_then(serde_json::Value::as_u64).unwrap());
    }
    assert_eq!(seqs, vec![0, 1, 2, 3]);
    assert_eq!(cursor.retrieved(), 4);
}

#[tokio::test]
async fn test_sorted_find_fetches_once_and_applies_skip_limit() {
    let server = MockServer::start().await;

    // A sorted find must not carry skip/limit/pageState on the wire; the
    // single request returns the whole ordered result set.
    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .and(body_partial_json(json!({"find": {"sort": {"seq": 1}}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"documents": seq_docs(0..6), "nextPageState": null}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let coll = database(&server).await.collection("test_collection");
    let options = FindOptions::default().sort(Sort::ascending("seq")).skip(2).limit(3);
    let docs = coll.find(None, options).to_vec().await.unwrap();
    let seqs: Vec<u64> = docs
        .iter()
        .map(|doc| doc.get("seq").and_then(serde_json::Value::as_u64).unwrap())
        .collect();
    assert_eq!(seqs, vec![2, 3, 4]);
}

#[tokio::test]
async fn test_distinct_over_paginated_results() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .and(body_partial_json(json!({"find": {}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "documents": [
                    {"_id": "a", "f": [1, 2]},
                    {"_id": "b", "f": 2},
                    {"_id": "c", "f": null},
                    {"_id": "d"}
                ],
                "nextPageState": null
            }
        })))
        .mount(&server)
        .await;

    let coll = database(&server).await.collection("test_collection");
    let values = coll.distinct("f", None).await.unwrap();
    assert_eq!(values, vec![json!(1), json!(2), json!(null)]);
}

// ============================================================================
// Insert
// ============================================================================

#[tokio::test]
async fn test_insert_one_returns_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .and(body_partial_json(
            json!({"insertOne": {"document": {"name": "Ann"}}}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": {"insertedIds": ["generated-id"]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let coll = database(&server).await.collection("test_collection");
    let result = coll.insert_one(json!({"name": "Ann"})).await.unwrap();
    assert_eq!(result.inserted_id, json!("generated-id"));
}

#[tokio::test]
async fn test_insert_many_ordered_chunks() {
    let server = MockServer::start().await;

    // 6 documents with chunk_size 2: three sequential insertMany requests
    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .and(body_partial_json(
            json!({"insertMany": {"options": {"ordered": true}}}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": {"insertedIds": ["x", "y"]}
        })))
        .expect(3)
        .mount(&server)
        .await;

    let coll = database(&server).await.collection("test_collection");
    let result = coll
        .insert_many(seq_docs(0..6), InsertManyOptions::default().chunk_size(2))
        .await
        .unwrap();
    assert_eq!(result.inserted_ids.len(), 6);
}

#[tokio::test]
async fn test_insert_many_ordered_stops_at_failing_chunk() {
    let server = MockServer::start().await;

    // First chunk succeeds, second reports a partial failure; the third
    // chunk must never be submitted.
    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": {"insertedIds": ["a", "b"]}
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": {"insertedIds": ["c"]},
            "errors": [{"message": "Document already exists", "errorCode": "DOCUMENT_ALREADY_EXISTS"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let coll = database(&server).await.collection("test_collection");
    let err = coll
        .insert_many(seq_docs(0..6), InsertManyOptions::default().chunk_size(2))
        .await
        .unwrap_err();
    match err {
        Error::InsertMany {
            inserted_ids,
            cause,
        } => {
            assert_eq!(inserted_ids, vec![json!("a"), json!("b"), json!("c")]);
            assert!(matches!(*cause, Error::Api { .. }));
        }
        other => panic!("expected InsertMany error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_insert_many_unordered_attempts_all_chunks() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .and(body_partial_json(
            json!({"insertMany": {"options": {"ordered": false}}}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": {"insertedIds": ["x", "y"]}
        })))
        .expect(3)
        .mount(&server)
        .await;

    let coll = database(&server).await.collection("test_collection");
    let options = InsertManyOptions::default()
        .ordered(false)
        .chunk_size(2)
        .concurrency(3);
    let result = coll.insert_many(seq_docs(0..6), options).await.unwrap();
    assert_eq!(result.inserted_ids.len(), 6);
}

// ============================================================================
// Count
// ============================================================================

#[tokio::test]
async fn test_count_documents() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .and(body_partial_json(json!({"countDocuments": {}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": {"count": 5}
        })))
        .mount(&server)
        .await;

    let coll = database(&server).await.collection("test_collection");
    assert_eq!(coll.count_documents(None, 100).await.unwrap(), 5);

    let err = coll.count_documents(None, 4).await.unwrap_err();
    assert!(matches!(err, Error::TooManyDocuments { upper_bound: 4 }));
}

#[tokio::test]
async fn test_count_documents_server_overflow() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": {"count": 1000, "moreData": true}
        })))
        .mount(&server)
        .await;

    let coll = database(&server).await.collection("test_collection");
    let err = coll.count_documents(None, 10_000).await.unwrap_err();
    assert!(matches!(err, Error::TooManyDocuments { .. }));
}

// ============================================================================
// Update / replace
// ============================================================================

#[tokio::test]
async fn test_update_one_upsert() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .and(body_partial_json(json!({"updateOne": {
            "filter": {"_id": "missing"},
            "options": {"upsert": true},
        }})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": {"matchedCount": 0, "modifiedCount": 0, "upsertedId": "missing"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let coll = database(&server).await.collection("test_collection");
    let result = coll
        .update_one(
            json!({"_id": "missing"}),
            json!({"$set": {"seq": 1}}),
            UpdateOptions::default().upsert(true),
        )
        .await
        .unwrap();
    assert_eq!(result.matched_count, 0);
    assert_eq!(result.upserted_id, Some(json!("missing")));
}

#[tokio::test]
async fn test_update_many_loops_until_no_more_data() {
    let server = MockServer::start().await;

    // Continuation request: carries the server's page state
    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .and(body_partial_json(json!({"updateMany": {
            "options": {"pageState": "um-1"},
        }})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": {"matchedCount": 3, "modifiedCount": 3}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .and(body_partial_json(json!({"updateMany": {}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": {
                "matchedCount": 20,
                "modifiedCount": 20,
                "moreData": true,
                "nextPageState": "um-1"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let coll = database(&server).await.collection("test_collection");
    let result = coll
        .update_many(json!({"group": "a"}), json!({"$inc": {"seq": 1}}), false)
        .await
        .unwrap();
    assert_eq!(result.matched_count, 23);
    assert_eq!(result.modified_count, 23);
    assert_eq!(result.upserted_id, None);
}

#[tokio::test]
async fn test_replace_one_with_sort() {
    let server = MockServer::start().await;

    // Wholesale replacement rides the findOneAndReplace command; only the
    // status counters matter for the result.
    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .and(body_partial_json(json!({"findOneAndReplace": {
            "filter": {"group": "a"},
            "replacement": {"group": "a", "seq": 0},
            "sort": {"seq": 1},
        }})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"document": {"_id": "a", "group": "a", "seq": 0}},
            "status": {"matchedCount": 1, "modifiedCount": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let coll = database(&server).await.collection("test_collection");
    let result = coll
        .replace_one(
            json!({"group": "a"}),
            json!({"group": "a", "seq": 0}),
            UpdateOptions::default().sort(Sort::ascending("seq")),
        )
        .await
        .unwrap();
    assert_eq!(result.matched_count, 1);
    assert_eq!(result.modified_count, 1);
    assert_eq!(result.upserted_id, None);
}

#[tokio::test]
async fn test_replace_one_upsert_reports_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .and(body_partial_json(json!({"findOneAndReplace": {
            "filter": {"_id": "missing"},
            "options": {"upsert": true},
        }})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": {"matchedCount": 0, "modifiedCount": 0, "upsertedId": "missing"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let coll = database(&server).await.collection("test_collection");
    let result = coll
        .replace_one(
            json!({"_id": "missing"}),
            json!({"seq": 0}),
            UpdateOptions::default().upsert(true),
        )
        .await
        .unwrap();
    assert_eq!(result.matched_count, 0);
    assert_eq!(result.upserted_id, Some(json!("missing")));
}

#[tokio::test]
async fn test_find_one_and_replace_returns_after_document() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .and(body_partial_json(json!({"findOneAndReplace": {
            "options": {"upsert": false, "returnDocument": "after"},
        }})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"document": {"_id": "a", "name": "replaced"}},
            "status": {"matchedCount": 1, "modifiedCount": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let coll = database(&server).await.collection("test_collection");
    let doc = coll
        .find_one_and_replace(
            json!({"_id": "a"}),
            json!({"name": "replaced"}),
            FindOneAndModifyOptions::default().return_document(ReturnDocument::After),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(doc.get("name"), Some(&json!("replaced")));
}

#[tokio::test]
async fn test_find_one_and_update_with_projection() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .and(body_partial_json(json!({"findOneAndUpdate": {
            "projection": {"seq": true},
        }})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"document": {"_id": "a", "seq": 0}},
            "status": {"matchedCount": 1, "modifiedCount": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let coll = database(&server).await.collection("test_collection");
    let doc = coll
        .find_one_and_update(
            json!({"_id": "a"}),
            json!({"$set": {"seq": 1}}),
            FindOneAndModifyOptions::default().projection(Projection::include(["seq"])),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(doc.get("seq"), Some(&json!(0)));
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_delete_one() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .and(body_partial_json(
            json!({"deleteOne": {"filter": {"_id": "a"}}}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": {"deletedCount": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let coll = database(&server).await.collection("test_collection");
    let result = coll
        .delete_one(json!({"_id": "a"}), Default::default())
        .await
        .unwrap();
    assert_eq!(result.deleted_count, 1);
}

#[tokio::test]
async fn test_find_one_and_delete_returns_document() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .and(body_partial_json(json!({"findOneAndDelete": {
            "filter": {"group": "a"},
            "projection": {"seq": true},
            "sort": {"seq": -1},
        }})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"document": {"_id": "z", "seq": 9}},
            "status": {"deletedCount": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let coll = database(&server).await.collection("test_collection");
    let doc = coll
        .find_one_and_delete(
            json!({"group": "a"}),
            FindOneOptions::default()
                .projection(Projection::include(["seq"]))
                .sort(Sort::descending("seq")),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(doc.get("seq"), Some(&json!(9)));
}

#[tokio::test]
async fn test_find_one_and_delete_no_match() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .and(body_partial_json(json!({"findOneAndDelete": {}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"document": null},
            "status": {"deletedCount": 0}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let coll = database(&server).await.collection("test_collection");
    let doc = coll
        .find_one_and_delete(json!({"_id": "nope"}), Default::default())
        .await
        .unwrap();
    assert!(doc.is_none());
}

#[tokio::test]
async fn test_delete_many_loops_until_no_more_data() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": {"deletedCount": 20, "moreData": true}
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": {"deletedCount": 5}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let coll = database(&server).await.collection("test_collection");
    let result = coll.delete_many(json!({"group": "a"})).await.unwrap();
    assert_eq!(result.deleted_count, 25);
}

#[tokio::test]
async fn test_delete_all_requires_no_filter() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .and(body_partial_json(json!({"deleteMany": {"filter": {}}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": {"deletedCount": 42}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let coll = database(&server).await.collection("test_collection");
    coll.delete_all().await.unwrap();
}

// ============================================================================
// Bulk write
// ============================================================================

#[tokio::test]
async fn test_bulk_write_ordered_counters() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .and(body_partial_json(json!({"insertOne": {}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": {"insertedIds": ["ins-1"]}
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .and(body_partial_json(json!({"updateOne": {}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": {"matchedCount": 0, "modifiedCount": 0, "upsertedId": "up-1"}
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .and(body_partial_json(json!({"deleteOne": {}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": {"deletedCount": 1}
        })))
        .mount(&server)
        .await;

    let coll = database(&server).await.collection("test_collection");
    let operations = vec![
        BulkOperation::insert_one(json!({"name": "Ann"})),
        BulkOperation::update_one(json!({"_id": "up-1"}), json!({"$set": {"seq": 9}}), true),
        BulkOperation::delete_one(json!({"_id": "gone"})),
    ];
    let result = coll
        .bulk_write(operations, BulkWriteOptions::default())
        .await
        .unwrap();

    // An upsert counts as both an insert and an upsert, keyed by its
    // position in the batch.
    assert_eq!(result.inserted_count, 2);
    assert_eq!(result.upserted_count, 1);
    assert_eq!(result.upserted_ids.get(&1), Some(&json!("up-1")));
    assert_eq!(result.matched_count, 0);
    assert_eq!(result.deleted_count, 1);
}

#[tokio::test]
async fn test_bulk_write_ordered_aborts_on_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .and(body_partial_json(json!({"insertOne": {}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": {"insertedIds": ["ins-1"]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .and(body_partial_json(json!({"updateOne": {}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{"message": "Update failed", "errorCode": "UPDATE_FAILED"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    // The delete after the failing update must never run
    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .and(body_partial_json(json!({"deleteOne": {}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": {"deletedCount": 1}
        })))
        .expect(0)
        .mount(&server)
        .await;

    let coll = database(&server).await.collection("test_collection");
    let operations = vec![
        BulkOperation::insert_one(json!({"name": "Ann"})),
        BulkOperation::update_one(json!({"_id": "x"}), json!({"$set": {"seq": 9}}), false),
        BulkOperation::delete_one(json!({"_id": "gone"})),
    ];
    let err = coll
        .bulk_write(operations, BulkWriteOptions::default())
        .await
        .unwrap_err();
    match err {
        Error::BulkWrite {
            partial_result,
            causes,
        } => {
            assert_eq!(partial_result.inserted_count, 1);
            assert_eq!(causes.len(), 1);
        }
        other => panic!("expected BulkWrite error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_bulk_write_unordered_aggregates_failures() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .and(body_partial_json(json!({"insertOne": {}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{"message": "Document already exists", "errorCode": "DOCUMENT_ALREADY_EXISTS"}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .and(body_partial_json(json!({"deleteOne": {}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": {"deletedCount": 1}
        })))
        .expect(2)
        .mount(&server)
        .await;

    let coll = database(&server).await.collection("test_collection");
    let operations = vec![
        BulkOperation::insert_one(json!({"_id": "dup"})),
        BulkOperation::delete_one(json!({"_id": "a"})),
        BulkOperation::delete_one(json!({"_id": "b"})),
    ];
    let err = coll
        .bulk_write(
            operations,
            BulkWriteOptions::default().ordered(false).concurrency(3),
        )
        .await
        .unwrap_err();
    match err {
        Error::BulkWrite {
            partial_result,
            causes,
        } => {
            // Both deletes still ran despite the failing insert
            assert_eq!(partial_result.deleted_count, 2);
            assert_eq!(causes.len(), 1);
        }
        other => panic!("expected BulkWrite error, got {other:?}"),
    }
}
