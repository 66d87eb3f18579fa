//! Search-ordering tests for the in-memory vector store.

use std::collections::HashMap;

use corpus_rag::document::Chunk;
use corpus_rag::inmemory::InMemoryVectorStore;
use corpus_rag::vectorstore::VectorStore;
use proptest::prelude::*;

fn chunk(id: &str, embedding: Vec<f32>) -> Chunk {
    Chunk {
        id: id.to_string(),
        text: format!("text for {id}"),
        embedding,
        metadata: HashMap::new(),
        document_id: "doc_1".to_string(),
    }
}

/// A query vector identical to one stored vector returns that record first
/// with a score of (numerically) one.
#[tokio::test]
async fn exact_match_ranks_first() {
    let store = InMemoryVectorStore::new();
    store.create_collection("docs", 3).await.unwrap();
    store
        .upsert(
            "docs",
            &[
                chunk("a", vec![1.0, 0.0, 0.0]),
                chunk("b", vec![0.0, 1.0, 0.0]),
                chunk("c", vec![0.6, 0.8, 0.0]),
            ],
        )
        .await
        .unwrap();

    let results = store.search("docs", &[0.0, 1.0, 0.0], 3).await.unwrap();

    assert_eq!(results[0].chunk.id, "b");
    assert!((results[0].score - 1.0).abs() < 1e-6);
}

#[tokio::test]
async fn deleted_chunks_stop_matching() {
    let store = InMemoryVectorStore::new();
    store.create_collection("docs", 2).await.unwrap();
    store.upsert("docs", &[chunk("a", vec![1.0, 0.0]), chunk("b", vec![0.0, 1.0])]).await.unwrap();

    store.delete("docs", &["a"]).await.unwrap();
    let results = store.search("docs", &[1.0, 0.0], 10).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].chunk.id, "b");
}

#[tokio::test]
async fn upsert_by_id_replaces_the_record() {
    let store = InMemoryVectorStore::new();
    store.create_collection("docs", 2).await.unwrap();
    store.upsert("docs", &[chunk("a", vec![1.0, 0.0])]).await.unwrap();
    store.upsert("docs", &[chunk("a", vec![0.0, 1.0])]).await.unwrap();

    let results = store.search("docs", &[0.0, 1.0], 10).await.unwrap();

    assert_eq!(results.len(), 1);
    assert!((results[0].score - 1.0).abs() < 1e-6);
}

#[tokio::test]
async fn searching_a_missing_collection_fails() {
    let store = InMemoryVectorStore::new();
    assert!(store.search("nope", &[1.0], 1).await.is_err());
}

#[tokio::test]
async fn deleting_a_collection_removes_its_data() {
    let store = InMemoryVectorStore::new();
    store.create_collection("docs", 2).await.unwrap();
    store.upsert("docs", &[chunk("a", vec![1.0, 0.0])]).await.unwrap();

    store.delete_collection("docs").await.unwrap();

    assert!(store.search("docs", &[1.0, 0.0], 1).await.is_err());
}

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map("non-zero embedding", |mut v| {
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm < 1e-8 {
            return None;
        }
        for val in &mut v {
            *val /= norm;
        }
        Some(v)
    })
}

fn arb_chunk(dim: usize) -> impl Strategy<Value = Chunk> {
    ("[a-z]{3,8}", arb_normalized_embedding(dim))
        .prop_map(|(id, embedding)| chunk(&id, embedding))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Search results are ordered by descending cosine similarity and the
    /// result count never exceeds `top_k` or the number of stored chunks.
    #[test]
    fn results_ordered_descending_and_bounded_by_top_k(
        chunks in proptest::collection::vec(arb_chunk(16), 1..20),
        query in arb_normalized_embedding(16),
        top_k in 1usize..25,
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let (results, unique_count) = rt.block_on(async {
            let store = InMemoryVectorStore::new();
            store.create_collection("test", 16).await.unwrap();

            // Deduplicate by id so upsert overwrites don't shrink the set
            let mut deduped: HashMap<String, Chunk> = HashMap::new();
            for chunk in &chunks {
                deduped.entry(chunk.id.clone()).or_insert_with(|| chunk.clone());
            }
            let unique: Vec<Chunk> = deduped.into_values().collect();
            let count = unique.len();

            store.upsert("test", &unique).await.unwrap();
            (store.search("test", &query, top_k).await.unwrap(), count)
        });

        prop_assert!(results.len() <= top_k);
        prop_assert!(results.len() <= unique_count);

        for window in results.windows(2) {
            prop_assert!(
                window[0].score >= window[1].score,
                "results not in descending order: {} < {}",
                window[0].score,
                window[1].score,
            );
        }
    }
}
