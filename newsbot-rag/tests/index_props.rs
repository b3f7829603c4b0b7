//! Property tests for vector index search ordering.

use newsbot_rag::{ArticleMeta, IndexEntry, Passage, VectorIndex};
use proptest::prelude::*;

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map(
        "non-zero embedding",
        |mut v| {
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm < 1e-8 {
                return None;
            }
            for val in &mut v {
                *val /= norm;
            }
            Some(v)
        },
    )
}

/// Generate an index entry with a normalized embedding.
fn arb_entry(dim: usize) -> impl Strategy<Value = IndexEntry> {
    ("[a-z]{3,8}", "[a-z ]{5,30}", arb_normalized_embedding(dim)).prop_map(
        |(id, text, embedding)| IndexEntry {
            passage: Passage {
                id: id.clone(),
                article_id: "article_1".to_string(),
                text,
                ordinal: 0,
            },
            source: ArticleMeta {
                title: format!("Article {id}"),
                url: "https://example.com/article".to_string(),
            },
            embedding,
        },
    )
}

/// For any set of indexed entries, a search returns at most `top_k` results,
/// never more than are stored, every result scores at least `min_score`, and
/// scores are in descending order.
mod prop_search_ordering {
    use super::*;

    const DIM: usize = 16;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn results_bounded_filtered_and_ordered(
            entries in proptest::collection::vec(arb_entry(DIM), 1..20),
            query in arb_normalized_embedding(DIM),
            top_k in 1usize..25,
            min_score in -1.0f32..1.0f32,
        ) {
            let stored = entries.len();

            let rt = tokio::runtime::Runtime::new().unwrap();
            let results = rt.block_on(async move {
                let index = VectorIndex::new(DIM);
                index.add(entries).await.unwrap();
                index.search(&query, top_k, min_score).await.unwrap()
            });

            // Result count is at most top_k and at most the number of stored entries
            prop_assert!(results.len() <= top_k);
            prop_assert!(results.len() <= stored);

            // Every result clears the threshold
            for result in &results {
                prop_assert!(
                    result.score >= min_score,
                    "result below threshold: {} < {}",
                    result.score,
                    min_score,
                );
            }

            // Results are ordered by descending score
            for window in results.windows(2) {
                prop_assert!(
                    window[0].score >= window[1].score,
                    "results not in descending order: {} < {}",
                    window[0].score,
                    window[1].score,
                );
            }
        }

        #[test]
        fn mismatched_dimensions_never_corrupt_the_index(
            entries in proptest::collection::vec(arb_entry(DIM), 1..10),
            bad in arb_entry(DIM + 1),
        ) {
            let stored = entries.len();

            let rt = tokio::runtime::Runtime::new().unwrap();
            let (rejected, len_after) = rt.block_on(async move {
                let index = VectorIndex::new(DIM);
                index.add(entries).await.unwrap();
                let rejected = index.add(vec![bad]).await.is_err();
                (rejected, index.len().await)
            });

            prop_assert!(rejected);
            prop_assert_eq!(len_after, stored);
        }
    }
}
