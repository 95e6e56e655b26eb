//! Retention classification for a deployment snapshot.
//!
//! The most recent successful deployment is protected. Every other record is
//! judged by the first matching rule:
//! 1. Protected deployment (same id) is kept
//! 2. `NeverRemove` status is kept
//! 3. `AlwaysRemove` status is deleted, whatever its age
//! 4. Age at or under the threshold is kept
//! 5. Anything else is deleted

use chrono::{DateTime, Utc};
use pages_api::{DeploymentRecord, StageStatus};
use serde::Serialize;

use crate::config::RetentionConfig;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// How a stage status participates in retention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RetentionClass {
    /// Live deployments are never removed.
    NeverRemove,
    /// Failed or canceled deployments are removed regardless of age.
    AlwaysRemove,
    /// Removed only once older than the expiration threshold.
    AgeBased,
}

/// Retention class of each stage status.
pub fn retention_class(status: StageStatus) -> RetentionClass {
    match status {
        StageStatus::Active => RetentionClass::NeverRemove,
        StageStatus::Failure | StageStatus::Canceled => RetentionClass::AlwaysRemove,
        StageStatus::Success | StageStatus::Idle | StageStatus::Unknown => {
            RetentionClass::AgeBased
        }
    }
}

/// Why a record survives this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum KeepReason {
    Protected,
    NeverRemove,
    WithinThreshold,
}

/// Why a record is a delete candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeleteReason {
    AlwaysRemove,
    Expired,
}

/// Outcome of the rule chain for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Keep(KeepReason),
    Delete(DeleteReason),
}

impl Verdict {
    pub fn is_delete(&self) -> bool {
        matches!(self, Verdict::Delete(_))
    }
}

/// Partition of a snapshot into the protected deployment and delete candidates.
#[derive(Debug, Clone, PartialEq)]
pub struct RetentionDecision {
    /// Most recent successful deployment, if the snapshot has one.
    pub protected: Option<DeploymentRecord>,
    /// Records to delete, in snapshot order.
    pub delete_candidates: Vec<DeploymentRecord>,
    /// Number of records kept, the protected one included.
    pub kept: usize,
    /// Per-record verdicts, in snapshot order.
    pub verdicts: Vec<(String, Verdict)>,
}

/// Pick the most recent successful deployment.
///
/// On equal `created_at` the record seen first in the snapshot wins.
pub fn select_protected(snapshot: &[DeploymentRecord]) -> Option<&DeploymentRecord> {
    snapshot
        .iter()
        .filter(|d| d.stage_status == StageStatus::Success)
        .fold(None, |best: Option<&DeploymentRecord>, d| match best {
            Some(b) if d.created_at <= b.created_at => Some(b),
            _ => Some(d),
        })
}

/// Age of a record in fractional hours at `now`. Records dated in the future
/// have a negative age.
pub fn age_hours(record: &DeploymentRecord, now: DateTime<Utc>) -> f64 {
    (now - record.created_at).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

/// Apply the rule chain to one record.
pub fn evaluate(
    record: &DeploymentRecord,
    protected_id: Option<&str>,
    config: &RetentionConfig,
    now: DateTime<Utc>,
) -> Verdict {
    if protected_id == Some(record.id.as_str()) {
        return Verdict::Keep(KeepReason::Protected);
    }
    match retention_class(record.stage_status) {
        RetentionClass::NeverRemove => Verdict::Keep(KeepReason::NeverRemove),
        RetentionClass::AlwaysRemove => Verdict::Delete(DeleteReason::AlwaysRemove),
        RetentionClass::AgeBased if age_hours(record, now) <= config.expiration_hours => {
            Verdict::Keep(KeepReason::WithinThreshold)
        }
        RetentionClass::AgeBased => Verdict::Delete(DeleteReason::Expired),
    }
}

/// Classify every record in `snapshot`. Pure: the only clock is `now`.
///
/// With no successful deployment there is nothing to protect, but the
/// remaining rules are still applied so callers can report what would go.
pub fn classify(
    snapshot: &[DeploymentRecord],
    config: &RetentionConfig,
    now: DateTime<Utc>,
) -> RetentionDecision {
    let protected = select_protected(snapshot).cloned();
    let protected_id = protected.as_ref().map(|p| p.id.as_str());

    let mut delete_candidates = Vec::new();
    let mut verdicts = Vec::with_capacity(snapshot.len());
    for record in snapshot {
        let verdict = evaluate(record, protected_id, config, now);
        if verdict.is_delete() {
            delete_candidates.push(record.clone());
        }
        verdicts.push((record.id.clone(), verdict));
    }

    RetentionDecision {
        kept: snapshot.len() - delete_candidates.len(),
        protected,
        delete_candidates,
        verdicts,
    }
}
