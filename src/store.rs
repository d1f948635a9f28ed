//! FAQ persistence gateway.
//!
//! Collection-scoped storage for generated question/answer pairs, backed
//! by SQLite. Batch inserts run in a single transaction so a rejected row
//! (e.g. an unknown collection id) leaves nothing behind.

use chrono::{SecondsFormat, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::models::{Collection, FaqPair, FaqRow};

/// Fixed-width RFC 3339 UTC timestamp, so `ORDER BY created_at DESC`
/// over the TEXT column matches chronological order.
fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Handle over the SQLite pool. Constructed once at startup and shared
/// across request handlers.
#[derive(Clone)]
pub struct FaqStore {
    pool: SqlitePool,
}

impl FaqStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a batch of pairs tagged with `collection_id`, all-or-nothing.
    ///
    /// Returns the stored rows including the server-assigned ids and
    /// creation timestamps. Fails if the collection does not exist (FK)
    /// or the store rejects the write.
    pub async fn insert_faqs(
        &self,
        collection_id: &str,
        pairs: &[FaqPair],
    ) -> Result<Vec<FaqRow>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let mut rows = Vec::with_capacity(pairs.len());

        for pair in pairs {
            let row = FaqRow {
                id: Uuid::new_v4().to_string(),
                faq_collection_id: collection_id.to_string(),
                question: pair.question.clone(),
                answer: pair.answer.clone(),
                created_at: now_rfc3339(),
            };

            sqlx::query(
                "INSERT INTO faqs (id, faq_collection_id, question, answer, created_at) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&row.id)
            .bind(&row.faq_collection_id)
            .bind(&row.question)
            .bind(&row.answer)
            .bind(&row.created_at)
            .execute(&mut *tx)
            .await?;

            rows.push(row);
        }

        tx.commit().await?;
        Ok(rows)
    }

    /// All FAQ rows belonging to one collection.
    pub async fn faqs_for_collection(
        &self,
        collection_id: &str,
    ) -> Result<Vec<FaqRow>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT id, faq_collection_id, question, answer, created_at FROM faqs WHERE faq_collection_id = ?",
        )
        .bind(collection_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| FaqRow {
                id: row.get("id"),
                faq_collection_id: row.get("faq_collection_id"),
                question: row.get("question"),
                answer: row.get("answer"),
                created_at: row.get("created_at"),
            })
            .collect())
    }

    /// Create a named collection and return the stored row.
    pub async fn create_collection(&self, name: &str) -> Result<Collection, sqlx::Error> {
        let collection = Collection {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            created_at: now_rfc3339(),
        };

        sqlx::query("INSERT INTO faq_collections (id, name, created_at) VALUES (?, ?, ?)")
            .bind(&collection.id)
            .bind(&collection.name)
            .bind(&collection.created_at)
            .execute(&self.pool)
            .await?;

        Ok(collection)
    }

    /// Look up a single collection by id.
    pub async fn get_collection(&self, id: &str) -> Result<Option<Collection>, sqlx::Error> {
        let row = sqlx::query("SELECT id, name, created_at FROM faq_collections WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| Collection {
            id: row.get("id"),
            name: row.get("name"),
            created_at: row.get("created_at"),
        }))
    }

    /// All collections, newest first.
    pub async fn list_collections(&self) -> Result<Vec<Collection>, sqlx::Error> {
        let rows =
            sqlx::query("SELECT id, name, created_at FROM faq_collections ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .iter()
            .map(|row| Collection {
                id: row.get("id"),
                name: row.get("name"),
                created_at: row.get("created_at"),
            })
            .collect())
    }
}
