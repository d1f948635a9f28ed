//! Client for the hosted assistant API (conversations, messages, jobs).
//!
//! One FAQ generation request maps onto a fixed call sequence against the
//! provider: create a conversation, post a requester message that attaches
//! the uploaded documents with the document-search capability, start a job
//! against the configured assistant profile, poll the job, then read the
//! produced messages back.
//!
//! Conversations, messages, and jobs are billable remote resources owned
//! entirely by the provider; nothing here is cached locally. The
//! orchestration layer deletes the conversation on failure paths.
//!
//! Response JSON is navigated with `serde_json::Value` accessors rather
//! than mirrored structs — the provider's payloads carry far more fields
//! than the handful we read.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::config::AssistantConfig;
use crate::error::GenerateError;
use crate::models::{ConversationMessage, MessageRole};

/// Status of a remote assistant job, as a closed set.
///
/// The provider reports status as a string; [`JobStatus::from_wire`]
/// folds the full vocabulary down to what the poller needs: keep
/// waiting, done, or dead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Queued, in progress, or any other non-terminal state.
    Pending,
    /// Finished successfully; messages are ready to read.
    Completed,
    /// The provider reported failure, with its reason when present.
    Failed { reason: Option<String> },
    /// Some other terminal state (cancelled, expired, incomplete).
    Ended { status: String },
}

impl JobStatus {
    /// Fold a provider status string (plus optional failure reason) into
    /// the closed set. Unknown strings are treated as non-terminal so a
    /// new provider state stalls the poller into its timeout instead of
    /// misreporting success or failure.
    pub fn from_wire(status: &str, reason: Option<String>) -> Self {
        match status {
            "completed" => JobStatus::Completed,
            "failed" => JobStatus::Failed { reason },
            "cancelled" | "expired" | "incomplete" => JobStatus::Ended {
                status: status.to_string(),
            },
            _ => JobStatus::Pending,
        }
    }
}

/// Source of job status observations. The poller depends on this rather
/// than on [`AssistantClient`] directly so its cadence can be tested with
/// a scripted sequence and no network.
#[async_trait]
pub trait JobStatusSource: Send + Sync {
    async fn job_status(
        &self,
        conversation_id: &str,
        job_id: &str,
    ) -> Result<JobStatus, GenerateError>;
}

/// HTTP client for the hosted assistant API.
///
/// Constructed once at startup and injected into the orchestration; holds
/// the bearer key and the assistant profile id every job is bound to.
pub struct AssistantClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    assistant_id: String,
}

impl AssistantClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `OPENAI_API_KEY` is not in the environment or
    /// the HTTP client cannot be constructed.
    pub fn new(config: &AssistantConfig) -> anyhow::Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable not set"))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            assistant_id: config.assistant_id.clone(),
        })
    }

    /// Create a fresh conversation and return its id.
    pub async fn create_conversation(&self) -> Result<String, GenerateError> {
        let json = self
            .post_json("/threads", &serde_json::json!({}))
            .await?;
        require_id(&json, "conversation")
    }

    /// Post one requester message carrying `instruction` as its content
    /// and every file id as an attachment with document search enabled.
    /// Returns the message id.
    pub async fn post_document_message(
        &self,
        conversation_id: &str,
        instruction: &str,
        file_ids: &[String],
    ) -> Result<String, GenerateError> {
        let attachments: Vec<Value> = file_ids
            .iter()
            .map(|file_id| {
                serde_json::json!({
                    "file_id": file_id,
                    "tools": [{ "type": "file_search" }],
                })
            })
            .collect();

        let body = serde_json::json!({
            "role": "user",
            "content": instruction,
            "attachments": attachments,
        });

        let json = self
            .post_json(&format!("/threads/{}/messages", conversation_id), &body)
            .await?;
        require_id(&json, "message")
    }

    /// Start a job running the configured assistant against the
    /// conversation. Returns the job id.
    pub async fn start_job(&self, conversation_id: &str) -> Result<String, GenerateError> {
        let body = serde_json::json!({ "assistant_id": self.assistant_id });
        let json = self
            .post_json(&format!("/threads/{}/runs", conversation_id), &body)
            .await?;
        require_id(&json, "job")
    }

    /// All messages in the conversation, in the order the provider
    /// returns them (newest first), with text content flattened.
    pub async fn list_messages(
        &self,
        conversation_id: &str,
    ) -> Result<Vec<ConversationMessage>, GenerateError> {
        let json = self
            .get_json(&format!("/threads/{}/messages", conversation_id))
            .await?;

        let data = json
            .get("data")
            .and_then(|d| d.as_array())
            .ok_or_else(|| GenerateError::Api("message list response missing data array".into()))?;

        Ok(data.iter().map(parse_message).collect())
    }

    /// Delete a conversation. Used as best-effort cleanup on failure
    /// paths; callers log errors instead of propagating them.
    pub async fn delete_conversation(&self, conversation_id: &str) -> Result<(), GenerateError> {
        let url = format!("{}/threads/{}", self.api_base, conversation_id);
        let response = self
            .http
            .delete(&url)
            .bearer_auth(&self.api_key)
            .header("OpenAI-Beta", "assistants=v2")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(GenerateError::Api(format!(
                "delete conversation failed with {}: {}",
                status, body_text
            )));
        }
        Ok(())
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, GenerateError> {
        let url = format!("{}{}", self.api_base, path);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("OpenAI-Beta", "assistants=v2")
            .json(body)
            .send()
            .await?;
        read_json(response).await
    }

    async fn get_json(&self, path: &str) -> Result<Value, GenerateError> {
        let url = format!("{}{}", self.api_base, path);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .header("OpenAI-Beta", "assistants=v2")
            .send()
            .await?;
        read_json(response).await
    }
}

#[async_trait]
impl JobStatusSource for AssistantClient {
    async fn job_status(
        &self,
        conversation_id: &str,
        job_id: &str,
    ) -> Result<JobStatus, GenerateError> {
        let json = self
            .get_json(&format!("/threads/{}/runs/{}", conversation_id, job_id))
            .await?;

        let status = json
            .get("status")
            .and_then(|s| s.as_str())
            .ok_or_else(|| GenerateError::Api("job status response missing status".into()))?;

        let reason = json
            .get("last_error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
            .map(|m| m.to_string());

        Ok(JobStatus::from_wire(status, reason))
    }
}

/// Read a response body as JSON, mapping non-2xx statuses to an API error
/// that carries the provider's body text.
async fn read_json(response: reqwest::Response) -> Result<Value, GenerateError> {
    let status = response.status();
    if !status.is_success() {
        let body_text = response.text().await.unwrap_or_default();
        return Err(GenerateError::Api(format!(
            "assistant API error {}: {}",
            status, body_text
        )));
    }
    Ok(response.json().await?)
}

fn require_id(json: &Value, what: &str) -> Result<String, GenerateError> {
    json.get("id")
        .and_then(|id| id.as_str())
        .map(|id| id.to_string())
        .ok_or_else(|| GenerateError::Api(format!("{} response missing id", what)))
}

/// Flatten one wire message into role + concatenated text parts.
fn parse_message(item: &Value) -> ConversationMessage {
    let role = match item.get("role").and_then(|r| r.as_str()) {
        Some("assistant") => MessageRole::Assistant,
        _ => MessageRole::Requester,
    };

    let text = item
        .get("content")
        .and_then(|c| c.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| {
                    part.get("text")
                        .and_then(|t| t.get("value"))
                        .and_then(|v| v.as_str())
                })
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default();

    ConversationMessage { role, text }
}
