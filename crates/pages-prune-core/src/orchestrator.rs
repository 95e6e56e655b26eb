//! One retention run: fetch → classify → delete.
//!
//! Phases run strictly in sequence:
//! `Idle → Fetching → Classifying → (Aborted | Deleting) → Done`.
//! A fetch failure or a snapshot without any successful deployment ends the
//! run in `Aborted` before a single delete call is made.

use std::time::Instant;

use chrono::{DateTime, SecondsFormat, Utc};
use pages_api::{DeploymentApi, Environment};
use serde::{Deserialize, Serialize};
use tracing::{debug, Instrument};

use crate::config::RetentionConfig;
use crate::error::PruneError;
use crate::executor::{DeletionExecutor, DeletionReport};
use crate::fetcher::DeploymentFetcher;
use crate::obs;
use crate::retention::classify;

/// Identifier attached to every log line of a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub String);

impl RunId {
    pub fn new() -> Self {
        RunId(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Run state machine position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Fetching,
    Classifying,
    Deleting,
    Done,
    Aborted,
}

impl RunPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunPhase::Idle => "idle",
            RunPhase::Fetching => "fetching",
            RunPhase::Classifying => "classifying",
            RunPhase::Deleting => "deleting",
            RunPhase::Done => "done",
            RunPhase::Aborted => "aborted",
        }
    }
}

/// Counts and per-item outcomes of a completed run.
#[derive(Debug)]
pub struct RunSummary {
    pub run_id: RunId,
    pub environment: Environment,
    pub fetched: usize,
    pub protected_id: String,
    pub candidates: usize,
    pub deletions: DeletionReport,
    pub duration_ms: u64,
}

/// Terminal state of a run.
#[derive(Debug)]
pub enum RunOutcome {
    Done(RunSummary),
    Aborted { run_id: RunId, reason: PruneError },
}

impl RunOutcome {
    pub fn run_id(&self) -> &RunId {
        match self {
            RunOutcome::Done(summary) => &summary.run_id,
            RunOutcome::Aborted { run_id, .. } => run_id,
        }
    }

    pub fn phase(&self) -> RunPhase {
        match self {
            RunOutcome::Done(_) => RunPhase::Done,
            RunOutcome::Aborted { .. } => RunPhase::Aborted,
        }
    }

    /// Whether the operator should see a failed run (non-zero exit).
    pub fn is_failure(&self) -> bool {
        matches!(self, RunOutcome::Aborted { reason, .. } if reason.is_fatal())
    }
}

/// Sequences one run against a [`DeploymentApi`].
pub struct Orchestrator<'a> {
    api: &'a dyn DeploymentApi,
    config: RetentionConfig,
}

impl<'a> Orchestrator<'a> {
    pub fn new(api: &'a dyn DeploymentApi, config: RetentionConfig) -> Self {
        Self { api, config }
    }

    /// Run using the current UTC time for age checks.
    pub async fn run(&self) -> RunOutcome {
        self.run_at(Utc::now()).await
    }

    /// Run with a fixed `now` (used for deterministic tests).
    pub async fn run_at(&self, now: DateTime<Utc>) -> RunOutcome {
        let run_id = RunId::new();
        let span = obs::run_span(&run_id.0);
        self.execute(run_id, now).instrument(span).await
    }

    async fn execute(&self, run_id: RunId, now: DateTime<Utc>) -> RunOutcome {
        let started = Instant::now();
        let environment = self.config.environment;
        enter(RunPhase::Idle);
        obs::emit_run_started(environment, self.config.expiration_hours);

        enter(RunPhase::Fetching);
        let snapshot = match DeploymentFetcher::new(self.api).fetch(environment).await {
            Ok(snapshot) => snapshot,
            Err(reason) => return abort(run_id, reason),
        };
        obs::emit_fetched(environment, snapshot.len());

        enter(RunPhase::Classifying);
        let decision = classify(&snapshot, &self.config, now);
        for (id, verdict) in &decision.verdicts {
            debug!(deployment_id = %id, verdict = ?verdict, "Classified deployment");
        }
        let Some(protected) = decision.protected else {
            return abort(run_id, PruneError::NoProtectedDeployment { environment });
        };
        obs::emit_protected(
            &protected.id,
            &protected
                .created_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        );
        obs::emit_candidates(decision.delete_candidates.len(), decision.kept);

        enter(RunPhase::Deleting);
        let deletions = DeletionExecutor::new(self.api)
            .execute(&decision.delete_candidates)
            .await;

        enter(RunPhase::Done);
        let duration_ms = started.elapsed().as_millis() as u64;
        obs::emit_run_finished(
            duration_ms,
            deletions.attempted(),
            deletions.succeeded(),
            deletions.failed(),
        );

        RunOutcome::Done(RunSummary {
            run_id,
            environment,
            fetched: snapshot.len(),
            protected_id: protected.id,
            candidates: decision.delete_candidates.len(),
            deletions,
            duration_ms,
        })
    }
}

fn enter(phase: RunPhase) {
    debug!(phase = phase.as_str(), "Run phase");
}

fn abort(run_id: RunId, reason: PruneError) -> RunOutcome {
    enter(RunPhase::Aborted);
    obs::emit_run_aborted(&reason);
    RunOutcome::Aborted { run_id, reason }
}
