//! Core data types that flow through the generation pipeline.
//!
//! Local rows (`Collection`, `FaqRow`) live in SQLite; everything else
//! mirrors objects owned by the hosted document store and assistant APIs
//! and is never persisted here.

use serde::{Deserialize, Serialize};

/// A question/answer pair decoded from the assistant's reply, before it is
/// assigned an id and written to a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqPair {
    pub question: String,
    pub answer: String,
}

/// A stored FAQ row with server-assigned id and timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct FaqRow {
    pub id: String,
    pub faq_collection_id: String,
    pub question: String,
    pub answer: String,
    /// RFC 3339 UTC.
    pub created_at: String,
}

/// A named grouping of FAQ rows.
#[derive(Debug, Clone, Serialize)]
pub struct Collection {
    pub id: String,
    pub name: String,
    /// RFC 3339 UTC.
    pub created_at: String,
}

/// Metadata for a document held by the hosted file store.
#[derive(Debug, Clone, Serialize)]
pub struct StoredFile {
    pub id: String,
    pub filename: String,
    pub bytes: i64,
    /// Unix seconds, as reported by the store.
    pub created_at: i64,
    pub purpose: String,
}

/// Role of a conversation message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    Requester,
    Assistant,
}

/// One message in a remote conversation, with its text content flattened.
#[derive(Debug, Clone)]
pub struct ConversationMessage {
    pub role: MessageRole,
    pub text: String,
}
