//! Deployment records as seen through the hosting service boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Outcome of a deployment's latest processing stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Idle,
    Active,
    Success,
    Failure,
    Canceled,
    /// Any status string the service reports that is not listed above.
    #[serde(other)]
    Unknown,
}

impl StageStatus {
    /// Every status value, in declaration order.
    pub const ALL: [StageStatus; 6] = [
        StageStatus::Idle,
        StageStatus::Active,
        StageStatus::Success,
        StageStatus::Failure,
        StageStatus::Canceled,
        StageStatus::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StageStatus::Idle => "idle",
            StageStatus::Active => "active",
            StageStatus::Success => "success",
            StageStatus::Failure => "failure",
            StageStatus::Canceled => "canceled",
            StageStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for StageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deployment environment filter accepted by the listing endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Preview,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Preview => "preview",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when an environment name is neither `production` nor `preview`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown environment: {0:?} (expected \"production\" or \"preview\")")]
pub struct ParseEnvironmentError(pub String);

impl FromStr for Environment {
    type Err = ParseEnvironmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" => Ok(Environment::Production),
            "preview" => Ok(Environment::Preview),
            _ => Err(ParseEnvironmentError(s.to_string())),
        }
    }
}

/// One historical attempt to deploy the project to an environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    /// Opaque identifier, unique within a project.
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub stage_status: StageStatus,
    pub short_id: Option<String>,
    pub url: Option<String>,
}

impl DeploymentRecord {
    pub fn new(id: impl Into<String>, created_at: DateTime<Utc>, stage_status: StageStatus) -> Self {
        Self {
            id: id.into(),
            created_at,
            stage_status,
            short_id: None,
            url: None,
        }
    }
}

/// Pagination details the service attaches to a listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub page: u32,
    pub per_page: u32,
    pub total_pages: Option<u32>,
    pub total_count: Option<u64>,
}

/// A single page of a deployment listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentPage {
    pub deployments: Vec<DeploymentRecord>,
    pub info: Option<PageInfo>,
}
