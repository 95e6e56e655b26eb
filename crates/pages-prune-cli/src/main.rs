//! pages-prune: Cloudflare Pages deployment retention
//!
//! Deletes failed, canceled, and expired deployments of one Pages project while
//! always keeping the most recent successful deployment. Meant to be run on a
//! schedule; every run works from a fresh listing.
//!
//! Configuration comes from flags or the matching environment variables
//! (`CF_API_TOKEN`, `CF_ACCOUNT_ID`, `CF_PROJECT_NAME`, `CF_EXPIRATION_HOURS`,
//! `CF_ENV`). A `.env` file in the working directory is loaded first.

use anyhow::{Context, Result};
use clap::Parser;
use pages_api::CloudflareClient;
use pages_prune_core::{init_tracing, LogFormat, Orchestrator, RawConfig, RunOutcome, RunSummary};
use tracing::{info, warn, Level};

#[derive(Parser)]
#[command(name = "pages-prune")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Prune old Cloudflare Pages deployments, keeping the latest success", long_about = None)]
struct Cli {
    /// Cloudflare API token with Pages edit permission
    #[arg(long, env = "CF_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Cloudflare account ID
    #[arg(long, env = "CF_ACCOUNT_ID")]
    account_id: Option<String>,

    /// Pages project name
    #[arg(long, env = "CF_PROJECT_NAME")]
    project_name: Option<String>,

    /// Age in hours after which a deployment may be deleted (default 6)
    #[arg(long, env = "CF_EXPIRATION_HOURS")]
    expiration_hours: Option<String>,

    /// Deployment environment to prune: production or preview
    #[arg(long = "env", env = "CF_ENV")]
    environment: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn raw_config(&self) -> RawConfig {
        RawConfig {
            api_token: self.api_token.clone(),
            account_id: self.account_id.clone(),
            project_name: self.project_name.clone(),
            expiration_hours: self.expiration_hours.clone(),
            environment: self.environment.clone(),
        }
    }

    fn log_format(&self) -> LogFormat {
        if self.json {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.log_format(), level);

    if let Err(err) = dotenv {
        if !err.not_found() {
            warn!(error = %err, "Ignoring unreadable .env file");
        }
    }

    let config = cli.raw_config().resolve().context("Invalid configuration")?;
    info!(config = %config.to_logging_safe(), "Using configuration");

    let client =
        CloudflareClient::new(config.client_config()).context("Failed to create API client")?;

    let outcome = Orchestrator::new(&client, config.retention).run().await;
    finish(outcome)
}

/// Map a run outcome to the process result.
fn finish(outcome: RunOutcome) -> Result<()> {
    match outcome {
        RunOutcome::Done(summary) => {
            log_summary(&summary);
            Ok(())
        }
        RunOutcome::Aborted { run_id, reason } if reason.is_fatal() => {
            Err(anyhow::Error::new(reason).context(format!("Run {} aborted", run_id)))
        }
        RunOutcome::Aborted { run_id, reason } => {
            info!(run_id = %run_id, reason = %reason, "Nothing deleted");
            Ok(())
        }
    }
}

fn log_summary(summary: &RunSummary) {
    info!(
        run_id = %summary.run_id,
        environment = %summary.environment,
        fetched = summary.fetched,
        protected = %summary.protected_id,
        candidates = summary.candidates,
        deleted = summary.deletions.succeeded(),
        failed = summary.deletions.failed(),
        "Run summary"
    );
    for failure in summary.deletions.failures() {
        warn!(deployment_id = %failure.id, error = %failure.source, "Deployment left in place");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pages_api::{ApiError, Environment};
    use pages_prune_core::{
        ConfigError, DeletionError, DeletionOutcome, DeletionReport, PruneError, RunId,
    };

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["pages-prune"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("parse args")
    }

    #[test]
    fn flags_build_raw_config() {
        let cli = parse(&[
            "--api-token",
            "tok",
            "--account-id",
            "acct",
            "--project-name",
            "site",
            "--expiration-hours",
            "12",
            "--env",
            "preview",
        ]);
        let config = cli.raw_config().resolve().expect("valid config");

        assert_eq!(config.project_name, "site");
        assert_eq!(config.retention.expiration_hours, 12.0);
        assert_eq!(config.retention.environment, Environment::Preview);
    }

    #[test]
    fn json_flag_selects_json_logs() {
        let cli = parse(&["--json", "-v"]);
        assert_eq!(cli.log_format(), LogFormat::Json);
        assert!(cli.verbose);
    }

    #[test]
    fn missing_credentials_fail_resolution() {
        let cli = Cli {
            api_token: None,
            account_id: None,
            project_name: Some("site".to_string()),
            expiration_hours: None,
            environment: None,
            verbose: false,
            json: false,
        };

        let err = cli.raw_config().resolve().unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ref f) if f.len() == 2));
    }

    #[test]
    fn fatal_abort_is_an_error() {
        let outcome = RunOutcome::Aborted {
            run_id: RunId::new(),
            reason: PruneError::Fetch {
                page: 1,
                source: ApiError::Http("connection refused".to_string()),
            },
        };
        let err = finish(outcome).unwrap_err();
        assert!(format!("{:#}", err).contains("connection refused"));
    }

    #[test]
    fn safety_abort_exits_cleanly() {
        let outcome = RunOutcome::Aborted {
            run_id: RunId::new(),
            reason: PruneError::NoProtectedDeployment {
                environment: Environment::Production,
            },
        };
        assert!(finish(outcome).is_ok());
    }

    #[test]
    fn partial_deletion_failure_still_succeeds() {
        let outcome = RunOutcome::Done(RunSummary {
            run_id: RunId::new(),
            environment: Environment::Production,
            fetched: 3,
            protected_id: "keep".to_string(),
            candidates: 2,
            deletions: DeletionReport {
                outcomes: vec![
                    DeletionOutcome::Deleted {
                        id: "a".to_string(),
                    },
                    DeletionOutcome::Failed(DeletionError {
                        id: "b".to_string(),
                        source: ApiError::NotFound {
                            id: "b".to_string(),
                        },
                    }),
                ],
            },
            duration_ms: 5,
        });
        assert!(finish(outcome).is_ok());
    }
}
