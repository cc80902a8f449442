use std::collections::HashMap;
use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";
const DEFAULT_API_VERSION: &str = "2022-06-28";
/// Largest page the databases query endpoint accepts.
const MAX_PAGE_SIZE: u32 = 100;

#[derive(Clone, Debug)]
pub struct NotionClientConfig {
    pub base_url: String,
    pub api_version: String,
    pub token: String,
    pub database_id: String,
    pub timeout: Duration,
    pub page_size: u32,
    pub max_error_body_bytes: usize,
}

impl NotionClientConfig {
    pub fn new(token: impl Into<String>, database_id: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            token: token.into(),
            database_id: database_id.into(),
            timeout: Duration::from_secs(30),
            page_size: MAX_PAGE_SIZE,
            max_error_body_bytes: 8 * 1024,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn query_url(&self) -> String {
        format!("{}/databases/{}/query", self.base_url, self.database_id)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotionError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid response JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("upstream returned error: status={status} code={code} message={message}")]
    Upstream {
        status: StatusCode,
        code: String,
        message: String,
    },

    #[error("upstream returned non-JSON error: status={status} body={body}")]
    UpstreamBody { status: StatusCode, body: String },

    #[error("cursor {0} was returned twice in a row")]
    RepeatedCursor(String),
}

/// One raw database row. Properties stay untyped here; each one is decoded on
/// demand through [`PropertyValue::from_json`] so a malformed property never
/// fails the whole page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, serde_json::Value>,
}

/// One batch of records plus the cursor for the next batch, `None` when done.
#[derive(Debug, Clone, Default)]
pub struct RecordPage {
    pub results: Vec<Record>,
    pub next_cursor: Option<String>,
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_cursor: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<Record>,
    next_cursor: Option<String>,
    #[serde(default = "default_has_more")]
    has_more: bool,
}

fn default_has_more() -> bool {
    true
}

impl From<QueryResponse> for RecordPage {
    fn from(resp: QueryResponse) -> Self {
        Self {
            results: resp.results,
            next_cursor: if resp.has_more { resp.next_cursor } else { None },
        }
    }
}

#[derive(Debug, Deserialize)]
struct NotionErrorEnvelope {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// A decoded database property. Anything the build does not read is `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title { title: Vec<RichTextSegment> },
    RichText { rich_text: Vec<RichTextSegment> },
    Select { select: Option<SelectOption> },
    MultiSelect { multi_select: Vec<SelectOption> },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RichTextSegment {
    #[serde(default)]
    pub plain_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SelectOption {
    #[serde(default)]
    pub name: String,
}

impl PropertyValue {
    /// Decode a raw property. Returns `None` for payloads that do not match the
    /// shape named by their own `type` tag.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(value.clone())
            .inspect_err(|e| debug!(error = %e, "property payload does not match its type"))
            .ok()
    }
}

#[derive(Clone)]
pub struct NotionClient {
    config: NotionClientConfig,
    http: reqwest::Client,
}

impl NotionClient {
    pub fn new(config: NotionClientConfig) -> Result<Self, NotionError> {
        let http = reqwest::Client::builder()
            .user_agent("quiz-site")
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &NotionClientConfig {
        &self.config
    }

    /// Query one page of the configured database, starting at `cursor`.
    pub async fn query_database(&self, cursor: Option<&str>) -> Result<RecordPage, NotionError> {
        let body = QueryRequest {
            page_size: self.config.page_size.min(MAX_PAGE_SIZE),
            start_cursor: cursor,
        };
        let resp = self
            .http
            .post(self.config.query_url())
            .bearer_auth(&self.config.token)
            .header("Notion-Version", &self.config.api_version)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = read_limited_text(resp, self.config.max_error_body_bytes).await;
            return Err(upstream_error(status, &body));
        }

        let bytes = resp.bytes().await?;
        let parsed: QueryResponse = serde_json::from_slice(&bytes)?;
        Ok(parsed.into())
    }
}

fn upstream_error(status: StatusCode, body: &str) -> NotionError {
    if let Ok(parsed) = serde_json::from_str::<NotionErrorEnvelope>(body) {
        if parsed.code.is_some() || parsed.message.is_some() {
            return NotionError::Upstream {
                status,
                code: parsed.code.unwrap_or_else(|| "unknown".to_string()),
                message: parsed
                    .message
                    .unwrap_or_else(|| "unknown upstream error".to_string()),
            };
        }
    }
    NotionError::UpstreamBody {
        status,
        body: body.to_string(),
    }
}

async fn read_limited_text(resp: reqwest::Response, max_bytes: usize) -> String {
    match resp.bytes().await {
        Ok(mut b) => {
            if b.len() > max_bytes {
                b.truncate(max_bytes);
            }
            String::from_utf8_lossy(&b).to_string()
        }
        Err(e) => {
            warn!(error = %e, "failed to read upstream error body");
            "<failed to read error body>".to_string()
        }
    }
}
