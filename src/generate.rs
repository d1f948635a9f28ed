//! End-to-end FAQ generation.
//!
//! One request walks the whole pipeline on the calling task: validate
//! input, create a conversation, post the document message, start the
//! job, poll it to completion, extract the pairs from the reply, and
//! persist them under the target collection.
//!
//! No step is resumable — a failure anywhere means the caller retries the
//! whole operation with the same file ids and collection id. Once a
//! conversation exists remotely, every failure path attempts to delete it
//! so failed requests don't accumulate billable resources; a cleanup
//! failure is logged and never replaces the original error.

use std::time::Duration;

use crate::assistant::AssistantClient;
use crate::config::AssistantConfig;
use crate::error::GenerateError;
use crate::extract::extract_faq_pairs;
use crate::models::FaqRow;
use crate::poller::wait_for_completion;
use crate::store::FaqStore;

/// Reject missing or malformed input before any remote resource is
/// created.
pub fn validate_request(file_ids: &[String], collection_id: &str) -> Result<(), GenerateError> {
    if file_ids.is_empty() {
        return Err(GenerateError::InvalidInput(
            "fileIds must be a non-empty array".to_string(),
        ));
    }
    if file_ids.iter().any(|id| id.trim().is_empty()) {
        return Err(GenerateError::InvalidInput(
            "fileIds must not contain empty ids".to_string(),
        ));
    }
    if collection_id.trim().is_empty() {
        return Err(GenerateError::InvalidInput(
            "faq_collection_id is required".to_string(),
        ));
    }
    Ok(())
}

/// Generate FAQs from the given documents and persist them under
/// `collection_id`. Returns the stored rows.
pub async fn generate_faqs(
    assistant: &AssistantClient,
    store: &FaqStore,
    settings: &AssistantConfig,
    file_ids: &[String],
    collection_id: &str,
) -> Result<Vec<FaqRow>, GenerateError> {
    validate_request(file_ids, collection_id)?;

    let conversation_id = assistant.create_conversation().await?;
    tracing::info!(%conversation_id, "conversation created");

    match run_pipeline(assistant, store, settings, &conversation_id, file_ids, collection_id).await
    {
        Ok(rows) => Ok(rows),
        Err(err) => {
            // Best-effort compensating delete of the remote conversation.
            if let Err(cleanup_err) = assistant.delete_conversation(&conversation_id).await {
                tracing::warn!(
                    %conversation_id,
                    error = %cleanup_err,
                    "failed to clean up conversation after error"
                );
            }
            Err(err)
        }
    }
}

async fn run_pipeline(
    assistant: &AssistantClient,
    store: &FaqStore,
    settings: &AssistantConfig,
    conversation_id: &str,
    file_ids: &[String],
    collection_id: &str,
) -> Result<Vec<FaqRow>, GenerateError> {
    let message_id = assistant
        .post_document_message(conversation_id, &settings.instruction, file_ids)
        .await?;
    tracing::info!(conversation_id, %message_id, files = file_ids.len(), "message posted");

    let job_id = assistant.start_job(conversation_id).await?;
    tracing::info!(conversation_id, %job_id, "job started");

    wait_for_completion(
        assistant,
        conversation_id,
        &job_id,
        Duration::from_millis(settings.poll_interval_ms),
        settings.max_poll_attempts,
    )
    .await?;
    tracing::info!(conversation_id, %job_id, "job completed");

    let messages = assistant.list_messages(conversation_id).await?;
    let pairs = extract_faq_pairs(&messages)?;
    tracing::info!(conversation_id, pairs = pairs.len(), "response extracted");

    let rows = store.insert_faqs(collection_id, &pairs).await?;
    tracing::info!(collection_id, rows = rows.len(), "faqs persisted");

    Ok(rows)
}
