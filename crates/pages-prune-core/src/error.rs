//! Error taxonomy for a retention run.

use pages_api::{ApiError, Environment};

/// Pre-flight configuration problems. Raised before any network call.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required configuration: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("invalid environment: {0}")]
    InvalidEnvironment(String),
}

/// Conditions that stop a run before or instead of the deletion phase.
#[derive(Debug, thiserror::Error)]
pub enum PruneError {
    #[error("failed to list deployments (page {page}): {source}")]
    Fetch {
        page: u32,
        #[source]
        source: ApiError,
    },

    #[error("deployment listing did not end after {max_pages} pages")]
    PageLimitExceeded { max_pages: u32 },

    #[error("no successful deployments found in {environment}; refusing to delete anything")]
    NoProtectedDeployment { environment: Environment },
}

impl PruneError {
    /// Whether the run should be reported as a failure to the operator.
    ///
    /// A missing protected deployment is a safety stop, not a fault.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, PruneError::NoProtectedDeployment { .. })
    }
}

/// One candidate's delete call failed. Recorded, never propagated.
#[derive(Debug, thiserror::Error)]
#[error("failed to delete deployment {id}: {source}")]
pub struct DeletionError {
    pub id: String,
    #[source]
    pub source: ApiError,
}

/// Result type for retention run operations.
pub type Result<T> = std::result::Result<T, PruneError>;
