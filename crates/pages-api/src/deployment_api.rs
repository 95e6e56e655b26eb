//! Capability trait for the deployment hosting service.
//!
//! `DeploymentApi` exposes exactly the two operations the retention run needs:
//! listing one page of deployments and deleting a deployment by id. The project
//! and account are bound into the implementation when it is constructed.
//!
//! `CloudflareClient` is the production implementation; `fakes::MemoryDeploymentApi`
//! returns canned data and errors for tests.

use async_trait::async_trait;

use crate::error::ApiError;
use crate::types::{DeploymentPage, Environment};

/// Result type for deployment API operations
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Listing and deletion of deployment records for one project.
///
/// Guarantees:
/// - `list_deployments` pages are 1-based.
/// - `delete_deployment` returns `ApiError::NotFound` when the id does not exist.
#[async_trait]
pub trait DeploymentApi: Send + Sync {
    /// Fetch one page of deployments for `environment`.
    async fn list_deployments(
        &self,
        environment: Environment,
        page: u32,
    ) -> ApiResult<DeploymentPage>;

    /// Delete a single deployment by id.
    async fn delete_deployment(&self, deployment_id: &str) -> ApiResult<()>;
}
