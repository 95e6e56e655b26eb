//! Sequential deletion of delete candidates.
//!
//! Each candidate gets exactly one delete call, in the order given. A failed
//! call is recorded in the report and the loop moves on.

use pages_api::{DeploymentApi, DeploymentRecord};
use tracing::{error, info};

use crate::error::DeletionError;
use crate::obs;

/// Result of one delete attempt.
#[derive(Debug)]
pub enum DeletionOutcome {
    Deleted { id: String },
    Failed(DeletionError),
}

impl DeletionOutcome {
    pub fn id(&self) -> &str {
        match self {
            DeletionOutcome::Deleted { id } => id,
            DeletionOutcome::Failed(err) => &err.id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DeletionOutcome::Deleted { .. })
    }
}

/// Per-candidate outcomes, in attempt order.
#[derive(Debug, Default)]
pub struct DeletionReport {
    pub outcomes: Vec<DeletionOutcome>,
}

impl DeletionReport {
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &DeletionError> {
        self.outcomes.iter().filter_map(|o| match o {
            DeletionOutcome::Failed(err) => Some(err),
            DeletionOutcome::Deleted { .. } => None,
        })
    }
}

/// Issues delete calls one at a time against a [`DeploymentApi`].
pub struct DeletionExecutor<'a> {
    api: &'a dyn DeploymentApi,
}

impl<'a> DeletionExecutor<'a> {
    pub fn new(api: &'a dyn DeploymentApi) -> Self {
        Self { api }
    }

    pub async fn execute(&self, candidates: &[DeploymentRecord]) -> DeletionReport {
        let mut report = DeletionReport {
            outcomes: Vec::with_capacity(candidates.len()),
        };

        for deployment in candidates {
            info!(deployment_id = %deployment.id, "Deleting deployment");
            let outcome = match self.api.delete_deployment(&deployment.id).await {
                Ok(()) => {
                    obs::emit_deployment_deleted(&deployment.id, deployment.stage_status);
                    DeletionOutcome::Deleted {
                        id: deployment.id.clone(),
                    }
                }
                Err(source) => {
                    let err = DeletionError {
                        id: deployment.id.clone(),
                        source,
                    };
                    error!(
                        event = "deployment.delete_failed",
                        deployment_id = %deployment.id,
                        error = %err.source,
                        "Error deleting deployment"
                    );
                    DeletionOutcome::Failed(err)
                }
            };
            report.outcomes.push(outcome);
        }

        report
    }
}
