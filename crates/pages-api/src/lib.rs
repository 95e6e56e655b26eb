//! Pages-API: deployment hosting service boundary for pages-prune
//!
//! This crate holds everything that touches the remote service:
//!
//! - `DeploymentRecord`, `StageStatus`, `Environment`: the records a run works on
//! - `DeploymentApi`: the list/delete capability the retention run depends on
//! - `CloudflareClient`: reqwest implementation against the Cloudflare v4 API
//! - `fakes::MemoryDeploymentApi`: canned implementation for tests

pub mod client;
pub mod deployment_api;
mod error;
pub mod fakes;
pub mod types;

pub use client::{ClientConfig, CloudflareClient, DEFAULT_BASE_URL, DEFAULT_PER_PAGE};
pub use deployment_api::{ApiResult, DeploymentApi};
pub use error::ApiError;
pub use types::{
    DeploymentPage, DeploymentRecord, Environment, PageInfo, ParseEnvironmentError, StageStatus,
};
