//! Concurrent access and provider failure behaviour.

use crate::common::{FailingProvider, GatedProvider, NanProvider, hash_store};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use vecsearch::service::EmbedRequest;
use vecsearch::{
    NewRecord, SearchEngine, SearchQuery, TimeoutProvider, VectorService, VectorStore,
    VectorStoreError,
};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_writers_and_readers() {
    let store = hash_store(64);
    let engine = SearchEngine::new(store.clone());

    let mut handles = Vec::new();
    for writer in 0..8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..50 {
                let id = format!("w{writer}-{}", i % 10);
                store
                    .put(NewRecord::new(id, format!("text {writer} {i}")))
                    .await
                    .unwrap();
            }
        }));
    }
    for _ in 0..4 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..50 {
                let hits = engine
                    .search(&SearchQuery::new("text 1 1").with_top_k(5).with_threshold(-1.0))
                    .await
                    .unwrap();
                assert!(hits.len() <= 5);
                assert!(hits.windows(2).all(|w| w[0].similarity >= w[1].similarity));
                for hit in hits {
                    assert!(hit.text.starts_with("text "));
                }
            }
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }

    // Each writer cycles through 10 ids
    assert_eq!(store.len(), 80);
    assert!(store.snapshot().iter().all(|r| r.vector.len() == 64));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_overwrites_leave_one_record() {
    let store = hash_store(16);
    let mut handles = Vec::new();
    for i in 0..32 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .put(NewRecord::new("shared", format!("version {i}")))
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(store.len(), 1);
    let record = store.get("shared").unwrap();
    assert!(record.text.starts_with("version "));
    // Text and vector always come from the same write
    assert_eq!(
        record.vector,
        vecsearch::embedding::hash_embedding(&record.text, store.dimension())
    );
}

#[tokio::test]
async fn test_failed_put_leaves_store_unchanged() {
    let provider = Arc::new(FailingProvider::new(4));
    let store = Arc::new(VectorStore::new(provider.clone()));

    store
        .put(NewRecord::new("keep", "kept").with_vector(vec![1.0, 0.0, 0.0, 0.0]))
        .await
        .unwrap();

    let err = store.put(NewRecord::new("keep", "replacement")).await.unwrap_err();
    assert!(matches!(err, VectorStoreError::ProviderFailure { .. }));
    assert!(err.is_retryable());
    assert_eq!(store.get("keep").unwrap().text, "kept");

    let err = store.put(NewRecord::new("new", "never stored")).await.unwrap_err();
    assert!(matches!(err, VectorStoreError::ProviderFailure { .. }));
    assert!(!store.contains("new"));
    assert_eq!(store.len(), 1);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_provider_failure_aborts_search() {
    let provider = Arc::new(FailingProvider::new(2));
    let store = Arc::new(VectorStore::new(provider));
    store
        .put(NewRecord::new("a", "a").with_vector(vec![1.0, 0.0]))
        .await
        .unwrap();

    let engine = SearchEngine::new(store);
    let err = engine.search(&SearchQuery::new("a")).await.unwrap_err();
    assert!(matches!(err, VectorStoreError::ProviderFailure { .. }));
}

#[tokio::test]
async fn test_non_finite_query_embedding_aborts_search() {
    let store = Arc::new(VectorStore::new(Arc::new(NanProvider::new(2))));
    store
        .put(NewRecord::new("b", "b").with_vector(vec![1.0, 0.0]))
        .await
        .unwrap();

    let engine = SearchEngine::new(store.clone());
    let err = engine
        .search(&SearchQuery::new("b").with_threshold(-1.0))
        .await
        .unwrap_err();
    assert!(matches!(err, VectorStoreError::ProviderFailure { .. }));

    // The same output is refused when storing, and the store is untouched
    let err = store.put(NewRecord::new("c", "c")).await.unwrap_err();
    assert!(matches!(err, VectorStoreError::ProviderFailure { .. }));
    assert_eq!(store.len(), 1);

    let service = VectorService::new(store);
    let err = service
        .embed(EmbedRequest {
            text: "c".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, VectorStoreError::ProviderFailure { .. }));
}

#[tokio::test]
async fn test_invalid_search_never_calls_provider() {
    let provider = Arc::new(FailingProvider::new(2));
    let engine = SearchEngine::new(Arc::new(VectorStore::new(provider.clone())));

    let err = engine
        .search(&SearchQuery::new("a").with_top_k(0))
        .await
        .unwrap_err();
    assert!(matches!(err, VectorStoreError::InvalidArgument { .. }));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_slow_embedding_does_not_block_readers() {
    let provider = Arc::new(GatedProvider::new(2));
    let store = Arc::new(VectorStore::new(provider.clone()));
    store
        .put(NewRecord::new("ready", "r").with_vector(vec![1.0, 0.0]))
        .await
        .unwrap();

    let pending = {
        let store = store.clone();
        tokio::spawn(async move { store.put(NewRecord::new("slow", "embedded later")).await })
    };
    provider.entered.notified().await;

    // The writer is parked inside the provider; reads and other writes proceed
    let engine = SearchEngine::new(store.clone());
    assert_eq!(engine.search_by_vector(&[1.0, 0.0], 5, 0.0).unwrap().len(), 1);
    assert_eq!(store.list(10).len(), 1);
    assert!(store.delete("ready"));
    assert!(!store.contains("slow"));

    provider.release.notify_one();
    let outcome = pending.await.unwrap().unwrap();
    assert_eq!(outcome.record.id, "slow");
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_timed_out_put_writes_nothing() {
    let gated = Arc::new(GatedProvider::new(2));
    let provider = Arc::new(TimeoutProvider::new(gated, Duration::from_millis(20)));
    let store = Arc::new(VectorStore::new(provider));

    let err = store.put(NewRecord::new("late", "never")).await.unwrap_err();
    match err {
        VectorStoreError::ProviderFailure { reason, .. } => assert!(reason.contains("timed out")),
        other => panic!("Expected ProviderFailure, got {other:?}"),
    }
    assert!(store.is_empty());
}
