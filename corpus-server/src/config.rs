//! Environment-based server configuration.

use anyhow::{Context, Result};

/// Settings for the corpus server, read from the environment.
///
/// Required variables: `OPENSEARCH_URL`, `OPENAI_API_KEY`. Everything else
/// has a default or is optional.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host. `HOST`, default `127.0.0.1`.
    pub host: String,
    /// Bind port. `PORT`, default `8080`.
    pub port: u16,
    /// OpenSearch cluster URL. `OPENSEARCH_URL`.
    pub opensearch_url: String,
    /// Index holding chunk records. `OPENSEARCH_INDEX`, default `documents`.
    pub index: String,
    /// Basic-auth credentials for the cluster. `OS_USER` / `OS_PASS`.
    pub opensearch_credentials: Option<(String, String)>,
    /// API key for the embedding and completion services. `OPENAI_API_KEY`.
    pub openai_api_key: String,
    /// Chat model override. `OPENAI_CHAT_MODEL`.
    pub chat_model: Option<String>,
    /// Root directory for archived uploads. `STORAGE_ROOT`, default `data`.
    pub storage_root: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Fails when a required variable is missing or `PORT` is not a number.
    pub fn from_env() -> Result<Self> {
        let host = optional("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = match optional("PORT") {
            Some(raw) => raw.parse().with_context(|| format!("invalid PORT '{raw}'"))?,
            None => 8080,
        };

        let opensearch_credentials = match (optional("OS_USER"), optional("OS_PASS")) {
            (Some(user), Some(pass)) => Some((user, pass)),
            _ => None,
        };

        Ok(Self {
            host,
            port,
            opensearch_url: required("OPENSEARCH_URL")?,
            index: optional("OPENSEARCH_INDEX").unwrap_or_else(|| "documents".to_string()),
            opensearch_credentials,
            openai_api_key: required("OPENAI_API_KEY")?,
            chat_model: optional("OPENAI_CHAT_MODEL"),
            storage_root: optional("STORAGE_ROOT").unwrap_or_else(|| "data".to_string()),
        })
    }
}

fn required(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("{name} environment variable not set"))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
