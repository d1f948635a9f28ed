//! Client for the hosted document store (file upload, listing, deletion).
//!
//! Documents live entirely in the remote store: upload returns an opaque
//! file id that later generation requests reference, and deletion is an
//! independent explicit call. Nothing is cached locally.

use serde_json::Value;
use std::time::Duration;

use crate::config::AssistantConfig;
use crate::error::GenerateError;
use crate::models::StoredFile;

/// Purpose tag attached to every upload so the assistant service accepts
/// the file as job input.
const UPLOAD_PURPOSE: &str = "assistants";

/// HTTP client for the hosted file store. Constructed once at startup.
pub struct DocumentStoreClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl DocumentStoreClient {
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
        })
    }

    /// Upload a document and return its metadata, including the opaque id
    /// that generation requests reference.
    pub async fn upload(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredFile, GenerateError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new()
            .text("purpose", UPLOAD_PURPOSE)
            .part("file", part);

        let response = self
            .http
            .post(format!("{}/files", self.api_base))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let json = read_json(response).await?;
        parse_file(&json)
    }

    /// Metadata for every file held by the store.
    pub async fn list(&self) -> Result<Vec<StoredFile>, GenerateError> {
        let response = self
            .http
            .get(format!("{}/files", self.api_base))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let json = read_json(response).await?;
        let data = json
            .get("data")
            .and_then(|d| d.as_array())
            .ok_or_else(|| GenerateError::Api("file list response missing data array".into()))?;

        data.iter().map(parse_file).collect()
    }

    /// Delete a file by id.
    pub async fn delete(&self, file_id: &str) -> Result<(), GenerateError> {
        let response = self
            .http
            .delete(format!("{}/files/{}", self.api_base, file_id))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(GenerateError::Api(format!(
                "delete file failed with {}: {}",
                status, body_text
            )));
        }
        Ok(())
    }
}

async fn read_json(response: reqwest::Response) -> Result<Value, GenerateError> {
    let status = response.status();
    if !status.is_success() {
        let body_text = response.text().await.unwrap_or_default();
        return Err(GenerateError::Api(format!(
            "document store error {}: {}",
            status, body_text
        )));
    }
    Ok(response.json().await?)
}

fn parse_file(json: &Value) -> Result<StoredFile, GenerateError> {
    let id = json
        .get("id")
        .and_then(|id| id.as_str())
        .ok_or_else(|| GenerateError::Api("file response missing id".into()))?;

    Ok(StoredFile {
        id: id.to_string(),
        filename: json
            .get("filename")
            .and_then(|f| f.as_str())
            .unwrap_or_default()
            .to_string(),
        bytes: json.get("bytes").and_then(|b| b.as_i64()).unwrap_or(0),
        created_at: json.get("created_at").and_then(|c| c.as_i64()).unwrap_or(0),
        purpose: json
            .get("purpose")
            .and_then(|p| p.as_str())
            .unwrap_or_default()
            .to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_full() {
        let json = serde_json::json!({
            "id": "file-abc",
            "filename": "rules.pdf",
            "bytes": 4096,
            "created_at": 1700000000,
            "purpose": "assistants"
        });

        let file = parse_file(&json).unwrap();
        assert_eq!(file.id, "file-abc");
        assert_eq!(file.filename, "rules.pdf");
        assert_eq!(file.bytes, 4096);
        assert_eq!(file.purpose, "assistants");
    }

    #[test]
    fn test_parse_file_missing_id_is_error() {
        let json = serde_json::json!({ "filename": "rules.pdf" });
        assert!(parse_file(&json).is_err());
    }
}
