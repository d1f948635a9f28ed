use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub server: ServerConfig,
    pub assistant: AssistantConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssistantConfig {
    /// Base URL of the hosted assistant API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Assistant profile every generation job runs against.
    pub assistant_id: String,
    /// Request message posted alongside the document attachments.
    #[serde(default = "default_instruction")]
    pub instruction: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_instruction() -> String {
    "Please analyze this document and create a comprehensive list of FAQs based on its content. \
     Format the response as a JSON array of question-answer pairs."
        .to_string()
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_max_poll_attempts() -> u32 {
    120
}

fn default_timeout_secs() -> u64 {
    30
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.assistant.assistant_id.trim().is_empty() {
        anyhow::bail!("assistant.assistant_id must not be empty");
    }

    if config.assistant.poll_interval_ms == 0 {
        anyhow::bail!("assistant.poll_interval_ms must be > 0");
    }

    if config.assistant.max_poll_attempts == 0 {
        anyhow::bail!("assistant.max_poll_attempts must be > 0");
    }

    if config.assistant.timeout_secs == 0 {
        anyhow::bail!("assistant.timeout_secs must be > 0");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("faqforge.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_defaults_applied() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = write_config(
            tmp.path(),
            r#"
[db]
path = "./data/faqforge.sqlite"

[server]
bind = "127.0.0.1:8080"

[assistant]
assistant_id = "asst_abc123"
"#,
        );

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.assistant.api_base, "https://api.openai.com/v1");
        assert_eq!(cfg.assistant.poll_interval_ms, 1000);
        assert_eq!(cfg.assistant.max_poll_attempts, 120);
        assert!(cfg.assistant.instruction.contains("JSON array"));
    }

    #[test]
    fn test_rejects_empty_assistant_id() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = write_config(
            tmp.path(),
            r#"
[db]
path = "./data/faqforge.sqlite"

[server]
bind = "127.0.0.1:8080"

[assistant]
assistant_id = "  "
"#,
        );

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("assistant_id"));
    }

    #[test]
    fn test_rejects_zero_poll_interval() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = write_config(
            tmp.path(),
            r#"
[db]
path = "./data/faqforge.sqlite"

[server]
bind = "127.0.0.1:8080"

[assistant]
assistant_id = "asst_abc123"
poll_interval_ms = 0
"#,
        );

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("poll_interval_ms"));
    }
}
