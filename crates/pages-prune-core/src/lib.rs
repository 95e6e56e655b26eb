//! Pages-Prune Core
//!
//! Retention rules and the run loop for pruning a Cloudflare Pages
//! deployment history. The most recent successful deployment is always kept;
//! failed, canceled, and expired deployments are deleted one at a time.
//!
//! ## Key Components
//!
//! - `RawConfig` / `AppConfig`: validated run configuration
//! - `DeploymentFetcher`: complete snapshot over the paginated listing
//! - `classify`: pure keep/delete decision per deployment
//! - `DeletionExecutor`: sequential deletes with per-item failure isolation
//! - `Orchestrator`: fetch → classify → delete, once per run

pub mod config;
pub mod error;
pub mod executor;
pub mod fetcher;
pub mod obs;
pub mod orchestrator;
pub mod retention;
pub mod telemetry;

pub use config::{
    parse_expiration_hours, AppConfig, LoggingSafeConfig, RawConfig, RetentionConfig,
    DEFAULT_EXPIRATION_HOURS,
};
pub use error::{ConfigError, DeletionError, PruneError, Result};
pub use executor::{DeletionExecutor, DeletionOutcome, DeletionReport};
pub use fetcher::DeploymentFetcher;
pub use orchestrator::{Orchestrator, RunId, RunOutcome, RunPhase, RunSummary};
pub use retention::{
    classify, retention_class, DeleteReason, KeepReason, RetentionClass, RetentionDecision,
    Verdict,
};
pub use telemetry::{init_tracing, LogFormat};
