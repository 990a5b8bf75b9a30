//! End-to-end store and search behaviour through the public API.

use crate::common::hash_store;
use vecsearch::{NewRecord, SearchEngine, SearchQuery, VectorStoreError};

#[tokio::test]
async fn test_identical_text_ranks_first_in_insertion_order() {
    let store = hash_store(384);
    for (id, text) in [("d1", "cat"), ("d2", "dog"), ("d3", "cat")] {
        store.put(NewRecord::new(id, text)).await.unwrap();
    }
    let engine = SearchEngine::new(store);

    let hits = engine
        .search(&SearchQuery::new("cat").with_top_k(2).with_threshold(0.0))
        .await
        .unwrap();

    let ids: Vec<_> = hits.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, ["d1", "d3"]);
    assert!(hits.iter().all(|h| h.similarity == 1.0));

    // With room for all three, d2 comes last
    let hits = engine
        .search(&SearchQuery::new("cat").with_top_k(3))
        .await
        .unwrap();
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[2].id, "d2");
    assert!(hits[2].similarity < 1.0);
}

#[tokio::test]
async fn test_hits_carry_text_and_metadata() {
    let store = hash_store(8);
    store
        .put(
            NewRecord::new("doc", "the quick brown fox")
                .with_field("source", "wiki")
                .with_field("page", 12),
        )
        .await
        .unwrap();

    let engine = SearchEngine::new(store);
    let hits = engine
        .search(&SearchQuery::new("the quick brown fox"))
        .await
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].text, "the quick brown fox");
    assert_eq!(hits[0].metadata["source"], "wiki");
    assert_eq!(hits[0].metadata["page"], 12);
}

#[tokio::test]
async fn test_overwrite_changes_ranking() {
    let store = hash_store(3);
    store
        .put(NewRecord::new("x", "a").with_vector(vec![1.0, 0.0, 0.0]))
        .await
        .unwrap();
    store
        .put(NewRecord::new("y", "b").with_vector(vec![0.0, 1.0, 0.0]))
        .await
        .unwrap();

    let engine = SearchEngine::new(store.clone());
    let before = engine.search_by_vector(&[0.0, 1.0, 0.0], 1, 0.0).unwrap();
    assert_eq!(before[0].id, "y");

    // Overwrite x so it also matches; it keeps its earlier position and wins the tie
    store
        .put(NewRecord::new("x", "b").with_vector(vec![0.0, 2.0, 0.0]))
        .await
        .unwrap();
    let after = engine.search_by_vector(&[0.0, 1.0, 0.0], 2, 0.0).unwrap();
    let ids: Vec<_> = after.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, ["x", "y"]);
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn test_negative_threshold_returns_opposites() {
    let store = hash_store(2);
    store
        .put(NewRecord::new("same", "s").with_vector(vec![1.0, 0.0]))
        .await
        .unwrap();
    store
        .put(NewRecord::new("opposite", "o").with_vector(vec![-1.0, 0.0]))
        .await
        .unwrap();
    let engine = SearchEngine::new(store);

    assert_eq!(engine.search_by_vector(&[1.0, 0.0], 10, 0.0).unwrap().len(), 1);

    let hits = engine.search_by_vector(&[1.0, 0.0], 10, -1.0).unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[1].id, "opposite");
    assert_eq!(hits[1].similarity, -1.0);
}

#[tokio::test]
async fn test_deleted_record_disappears_from_results() {
    let store = hash_store(16);
    store.put(NewRecord::new("a", "alpha")).await.unwrap();
    store.put(NewRecord::new("b", "alpha")).await.unwrap();
    assert!(store.delete("a"));

    let engine = SearchEngine::new(store.clone());
    let hits = engine.search(&SearchQuery::new("alpha")).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "b");

    assert!(matches!(
        store.get("a"),
        Err(VectorStoreError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_invalid_query_rejected_before_embedding() {
    let store = hash_store(16);
    store.put(NewRecord::new("a", "alpha")).await.unwrap();
    let engine = SearchEngine::new(store);

    for query in [
        SearchQuery::new("alpha").with_top_k(0),
        SearchQuery::new("alpha").with_threshold(2.0),
        SearchQuery::new("alpha").with_threshold(f32::NAN),
    ] {
        let err = engine.search(&query).await.unwrap_err();
        assert!(matches!(err, VectorStoreError::InvalidArgument { .. }));
    }
}
