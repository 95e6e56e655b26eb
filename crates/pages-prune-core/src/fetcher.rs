//! Full-snapshot fetch over the paginated listing endpoint.

use std::collections::HashSet;

use pages_api::{DeploymentApi, DeploymentRecord, Environment};
use tracing::{debug, warn};

use crate::error::{PruneError, Result};

/// Upper bound on pages read in one fetch.
pub const MAX_PAGES: u32 = 10_000;

/// Reads every page of deployments for an environment.
///
/// Any page failure fails the whole fetch; a partial listing is never returned.
pub struct DeploymentFetcher<'a> {
    api: &'a dyn DeploymentApi,
    max_pages: u32,
}

impl<'a> DeploymentFetcher<'a> {
    pub fn new(api: &'a dyn DeploymentApi) -> Self {
        Self {
            api,
            max_pages: MAX_PAGES,
        }
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    pub async fn fetch(&self, environment: Environment) -> Result<Vec<DeploymentRecord>> {
        let mut deployments = Vec::new();
        let mut seen = HashSet::new();

        for page in 1..=self.max_pages {
            let batch = self
                .api
                .list_deployments(environment, page)
                .await
                .map_err(|source| PruneError::Fetch { page, source })?;

            let received = batch.deployments.len();
            debug!(page, received, "Fetched deployment page");
            if received == 0 {
                return Ok(deployments);
            }

            for deployment in batch.deployments {
                if seen.insert(deployment.id.clone()) {
                    deployments.push(deployment);
                } else {
                    warn!(deployment_id = %deployment.id, page, "Duplicate deployment in listing");
                }
            }

            let last_page = match batch.info {
                Some(info) => match info.total_pages {
                    Some(total) => page >= total,
                    None => (received as u32) < info.per_page,
                },
                None => false,
            };
            if last_page {
                return Ok(deployments);
            }
        }

        Err(PruneError::PageLimitExceeded {
            max_pages: self.max_pages,
        })
    }
}
