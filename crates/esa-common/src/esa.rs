use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.esa.io/v1";

/// Only the first page is ever requested.
pub const POSTS_PER_PAGE: u32 = 100;

#[derive(Clone, Debug)]
pub struct EsaClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub team_name: String,
    pub max_error_body_bytes: usize,
}

impl EsaClientConfig {
    pub fn new(api_key: impl Into<String>, team_name: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            team_name: team_name.into(),
            max_error_body_bytes: 8 * 1024,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn posts_url(&self) -> String {
        format!("{}/teams/{}/posts", self.base_url, self.team_name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EsaClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("esa.io returned error: status={status} body={body}")]
    Status { status: StatusCode, body: String },
}

/// A post as returned by `GET /v1/teams/{team}/posts`. Fields this relay
/// does not re-expose are ignored; `body_md` and `tags` may be `null` or
/// absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpstreamPost {
    pub number: i64,
    pub name: String,
    #[serde(default)]
    pub body_md: Option<String>,
    pub updated_at: String,
    pub created_at: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub category: Option<String>,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct PostsEnvelope {
    posts: Vec<UpstreamPost>,
}

/// Thin esa.io API client. No timeout and no retries are configured: a slow
/// upstream stalls only the request waiting on it.
#[derive(Clone)]
pub struct EsaClient {
    config: EsaClientConfig,
    http: reqwest::Client,
}

impl EsaClient {
    pub fn new(config: EsaClientConfig) -> Result<Self, EsaClientError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("esa-mcp-server/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &EsaClientConfig {
        &self.config
    }

    /// Fetches the first page of posts for the configured team.
    pub async fn fetch_posts(&self) -> Result<Vec<UpstreamPost>, EsaClientError> {
        let url = self.config.posts_url();
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .query(&[("per_page", POSTS_PER_PAGE)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = read_limited_text(resp, self.config.max_error_body_bytes).await;
            return Err(EsaClientError::Status { status, body });
        }

        let envelope = resp.json::<PostsEnvelope>().await?;
        debug!(
            team = %self.config.team_name,
            count = envelope.posts.len(),
            "fetched posts from esa.io"
        );
        Ok(envelope.posts)
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
            warn!(error = %e, "failed to read esa.io error body");
            "<failed to read error body>".to_string()
        }
    }
}
