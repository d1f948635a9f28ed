use std::path::Path;
use tempfile::TempDir;

use faq_forge::config::{AssistantConfig, Config, DbConfig, ServerConfig};
use faq_forge::db;
use faq_forge::migrate;
use faq_forge::models::FaqPair;
use faq_forge::store::FaqStore;

fn test_config(root: &Path) -> Config {
    Config {
        db: DbConfig {
            path: root.join("data").join("faqforge.sqlite"),
        },
        server: ServerConfig {
            bind: "127.0.0.1:0".to_string(),
        },
        assistant: AssistantConfig {
            api_base: "https://api.openai.com/v1".to_string(),
            assistant_id: "asst_test".to_string(),
            instruction: "unused".to_string(),
            poll_interval_ms: 1000,
            max_poll_attempts: 120,
            timeout_secs: 30,
        },
    }
}

async fn setup_store() -> (TempDir, FaqStore) {
    let tmp = TempDir::new().unwrap();
    let cfg = test_config(tmp.path());

    let pool = db::connect(&cfg).await.unwrap();
    migrate::apply_schema(&pool).await.unwrap();

    (tmp, FaqStore::new(pool))
}

fn pairs(items: &[(&str, &str)]) -> Vec<FaqPair> {
    items
        .iter()
        .map(|(q, a)| FaqPair {
            question: q.to_string(),
            answer: a.to_string(),
        })
        .collect()
}

#[tokio::test]
async fn test_migrations_idempotent() {
    let tmp = TempDir::new().unwrap();
    let cfg = test_config(tmp.path());

    migrate::run_migrations(&cfg).await.unwrap();
    migrate::run_migrations(&cfg).await.unwrap();
}

#[tokio::test]
async fn test_collection_round_trip() {
    let (_tmp, store) = setup_store().await;

    let created = store.create_collection("Catan Rules").await.unwrap();
    assert!(!created.id.is_empty());
    assert!(!created.created_at.is_empty());

    let listed = store.list_collections().await.unwrap();
    let matches: Vec<_> = listed.iter().filter(|c| c.name == "Catan Rules").collect();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id, created.id);
}

#[tokio::test]
async fn test_collections_listed_newest_first() {
    let (_tmp, store) = setup_store().await;

    store.create_collection("first").await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    store.create_collection("second").await.unwrap();

    let listed = store.list_collections().await.unwrap();
    assert_eq!(listed[0].name, "second");
    assert_eq!(listed[1].name, "first");
}

#[tokio::test]
async fn test_get_collection() {
    let (_tmp, store) = setup_store().await;

    let created = store.create_collection("Rulebook").await.unwrap();

    let found = store.get_collection(&created.id).await.unwrap().unwrap();
    assert_eq!(found.name, "Rulebook");

    let missing = store.get_collection("no-such-id").await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_insert_returns_stored_rows() {
    let (_tmp, store) = setup_store().await;

    let collection = store.create_collection("Catan Rules").await.unwrap();
    let batch = pairs(&[
        ("How many players?", "Three to four."),
        ("How do you win?", "Reach ten victory points."),
    ]);

    let rows = store.insert_faqs(&collection.id, &batch).await.unwrap();
    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert!(!row.id.is_empty());
        assert!(!row.created_at.is_empty());
        assert_eq!(row.faq_collection_id, collection.id);
    }

    let fetched = store.faqs_for_collection(&collection.id).await.unwrap();
    assert_eq!(fetched.len(), 2);
}

#[tokio::test]
async fn test_insert_unknown_collection_rejected_atomically() {
    let (_tmp, store) = setup_store().await;

    let collection = store.create_collection("real").await.unwrap();
    let batch = pairs(&[("Q", "A")]);

    let res = store.insert_faqs("no-such-collection", &batch).await;
    assert!(res.is_err());

    // Nothing from the rejected batch may remain
    let rows = store.faqs_for_collection("no-such-collection").await.unwrap();
    assert!(rows.is_empty());
    let rows = store.faqs_for_collection(&collection.id).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_concurrent_inserts_into_one_collection() {
    let (_tmp, store) = setup_store().await;

    let collection = store.create_collection("shared").await.unwrap();

    let batch_a = pairs(&[("A1?", "a1"), ("A2?", "a2"), ("A3?", "a3")]);
    let batch_b = pairs(&[("B1?", "b1"), ("B2?", "b2")]);

    let store_a = store.clone();
    let store_b = store.clone();
    let id_a = collection.id.clone();
    let id_b = collection.id.clone();

    let (res_a, res_b) = tokio::join!(
        tokio::spawn(async move { store_a.insert_faqs(&id_a, &batch_a).await }),
        tokio::spawn(async move { store_b.insert_faqs(&id_b, &batch_b).await }),
    );

    let rows_a = res_a.unwrap().unwrap();
    let rows_b = res_b.unwrap().unwrap();
    assert_eq!(rows_a.len(), 3);
    assert_eq!(rows_b.len(), 2);

    // The union of both batches persists with no loss or duplication
    let all = store.faqs_for_collection(&collection.id).await.unwrap();
    assert_eq!(all.len(), 5);

    let mut questions: Vec<_> = all.iter().map(|r| r.question.as_str()).collect();
    questions.sort_unstable();
    assert_eq!(questions, vec!["A1?", "A2?", "A3?", "B1?", "B2?"]);
}
