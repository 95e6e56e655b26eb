//! Structured lifecycle events for a retention run.
//!
//! - `run_span` tags every log line of a run with its `run_id`
//! - `emit_*` functions log the key run events at `info!` (or `warn!`/`error!`)

use pages_api::{Environment, StageStatus};
use tracing::{error, info, warn};

use crate::error::PruneError;

/// Span tagging every log line of one run with its `run_id`.
pub fn run_span(run_id: &str) -> tracing::Span {
    tracing::info_span!("pages_prune.run", run_id = %run_id)
}

pub fn emit_run_started(environment: Environment, expiration_hours: f64) {
    info!(
        event = "run.started",
        environment = %environment,
        expiration_hours = expiration_hours,
    );
}

pub fn emit_fetched(environment: Environment, count: usize) {
    info!(
        event = "run.fetched",
        environment = %environment,
        count = count,
        "Existing deployments in environment {}: {}",
        environment,
        count
    );
}

pub fn emit_protected(deployment_id: &str, created_at: &str) {
    info!(
        event = "run.protected",
        deployment_id = %deployment_id,
        created_at = %created_at,
        "Latest successful deployment: {} (created on {})",
        deployment_id,
        created_at
    );
}

pub fn emit_candidates(count: usize, kept: usize) {
    info!(
        event = "run.candidates",
        count = count,
        kept = kept,
        "Deployments to delete: {}",
        count
    );
}

pub fn emit_deployment_deleted(deployment_id: &str, status: StageStatus) {
    info!(
        event = "deployment.deleted",
        deployment_id = %deployment_id,
        status = %status,
        "Deployment '{}' deleted.",
        deployment_id
    );
}

/// Abort reasons that are faults log at `error!`, the safety stop at `warn!`.
pub fn emit_run_aborted(reason: &PruneError) {
    if reason.is_fatal() {
        error!(event = "run.aborted", reason = %reason, "Aborting run");
    } else {
        warn!(event = "run.aborted", reason = %reason, "Aborting run");
    }
}

pub fn emit_run_finished(duration_ms: u64, candidates: usize, succeeded: usize, failed: usize) {
    info!(
        event = "run.finished",
        duration_ms = duration_ms,
        candidates = candidates,
        succeeded = succeeded,
        failed = failed,
        "Done."
    );
}
