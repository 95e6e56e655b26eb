//! Cloudflare Pages deployments client
//!
//! Talks to the Cloudflare v4 REST API:
//! - `GET  /accounts/{account}/pages/projects/{project}/deployments`
//! - `DELETE /accounts/{account}/pages/projects/{project}/deployments/{id}`
//!
//! Every response is wrapped in the standard `{ success, errors, result, result_info }`
//! envelope.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use tracing::debug;

use crate::deployment_api::{ApiResult, DeploymentApi};
use crate::error::ApiError;
use crate::types::{DeploymentPage, DeploymentRecord, Environment, PageInfo, StageStatus};

/// Public Cloudflare API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Page size requested from the listing endpoint
pub const DEFAULT_PER_PAGE: u32 = 25;

/// Connection settings for a single Pages project.
#[derive(Clone)]
pub struct ClientConfig {
    /// API base URL (no trailing slash)
    pub base_url: String,
    /// Scoped API token with Pages edit permission
    pub api_token: String,
    pub account_id: String,
    pub project_name: String,
    pub per_page: u32,
}

impl ClientConfig {
    /// Create config for a project against the public API
    pub fn new(api_token: &str, account_id: &str, project_name: &str) -> Self {
        ClientConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: api_token.to_string(),
            account_id: account_id.to_string(),
            project_name: project_name.to_string(),
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Point the client at a different API host
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Set the listing page size
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    fn deployments_url(&self) -> String {
        format!(
            "{}/accounts/{}/pages/projects/{}/deployments",
            self.base_url, self.account_id, self.project_name
        )
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"*****")
            .field("account_id", &self.account_id)
            .field("project_name", &self.project_name)
            .field("per_page", &self.per_page)
            .finish()
    }
}

/// HTTP client for one Pages project
#[derive(Debug)]
pub struct CloudflareClient {
    config: ClientConfig,
    http_client: reqwest::Client,
}

impl CloudflareClient {
    /// Create a new client
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("pages-prune/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;

        Ok(CloudflareClient {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl DeploymentApi for CloudflareClient {
    async fn list_deployments(
        &self,
        environment: Environment,
        page: u32,
    ) -> ApiResult<DeploymentPage> {
        debug!(env = %environment, page, "Listing deployments");

        let response = self
            .http_client
            .get(self.config.deployments_url())
            .bearer_auth(&self.config.api_token)
            .query(&[
                ("env", environment.as_str().to_string()),
                ("page", page.to_string()),
                ("per_page", self.config.per_page.to_string()),
            ])
            .send()
            .await?;

        let envelope: Envelope<Vec<WireDeployment>> = read_envelope(response).await?;
        let deployments = envelope
            .result
            .unwrap_or_default()
            .into_iter()
            .map(DeploymentRecord::from)
            .collect();
        let info = envelope.result_info.map(|info| PageInfo {
            page: info.page.unwrap_or(page),
            per_page: info.per_page.unwrap_or(self.config.per_page),
            total_pages: info.total_pages,
            total_count: info.total_count,
        });

        Ok(DeploymentPage { deployments, info })
    }

    async fn delete_deployment(&self, deployment_id: &str) -> ApiResult<()> {
        let url = format!("{}/{}", self.config.deployments_url(), deployment_id);
        debug!(deployment_id, "Deleting deployment");

        let response = self
            .http_client
            .delete(&url)
            .bearer_auth(&self.config.api_token)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound {
                id: deployment_id.to_string(),
            });
        }

        let _: Envelope<IgnoredAny> = read_envelope(response).await?;
        Ok(())
    }
}

/// Decode the standard response envelope, turning error statuses and
/// `success: false` into `ApiError::Api`.
async fn read_envelope<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<Envelope<T>> {
    let status = response.status();
    let body = response.text().await?;

    match serde_json::from_str::<Envelope<T>>(&body) {
        Ok(envelope) if status.is_success() && envelope.success => Ok(envelope),
        Ok(envelope) => Err(ApiError::Api {
            status: status.as_u16(),
            message: envelope
                .errors
                .first()
                .map(ApiMessage::to_string)
                .unwrap_or_else(|| fallback_message(status)),
        }),
        Err(err) if status.is_success() => Err(err.into()),
        Err(_) => Err(ApiError::Api {
            status: status.as_u16(),
            message: fallback_message(status),
        }),
    }
}

fn fallback_message(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    result: Option<T>,
    result_info: Option<ResultInfo>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    code: Option<i64>,
    message: String,
}

impl std::fmt::Display for ApiMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (code {})", self.message, code),
            None => f.write_str(&self.message),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ResultInfo {
    page: Option<u32>,
    per_page: Option<u32>,
    total_pages: Option<u32>,
    total_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct WireDeployment {
    id: String,
    created_on: DateTime<Utc>,
    latest_stage: WireStage,
    short_id: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireStage {
    status: StageStatus,
}

impl From<WireDeployment> for DeploymentRecord {
    fn from(wire: WireDeployment) -> Self {
        DeploymentRecord {
            id: wire.id,
            created_at: wire.created_on,
            stage_status: wire.latest_stage.status,
            short_id: wire.short_id,
            url: wire.url,
        }
    }
}
