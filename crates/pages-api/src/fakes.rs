//! In-memory fake for `DeploymentApi` (testing only)
//!
//! `MemoryDeploymentApi` serves a fixed set of deployments in pages, can be told
//! to fail specific pages or specific deletions, and records every delete call.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::deployment_api::{ApiResult, DeploymentApi};
use crate::error::ApiError;
use crate::types::{DeploymentPage, DeploymentRecord, Environment, PageInfo};

#[derive(Debug, Default)]
struct FakeState {
    deployments: Vec<DeploymentRecord>,
    failing_pages: HashSet<u32>,
    failing_deletes: HashSet<String>,
    delete_calls: Vec<String>,
    list_calls: Vec<(Environment, u32)>,
}

/// In-memory deployment store backed by a `Vec<DeploymentRecord>`.
///
/// The environment filter is recorded but not applied; every stored
/// deployment belongs to whichever environment is asked for.
#[derive(Debug)]
pub struct MemoryDeploymentApi {
    per_page: u32,
    state: Mutex<FakeState>,
}

impl Default for MemoryDeploymentApi {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl MemoryDeploymentApi {
    pub fn new(deployments: Vec<DeploymentRecord>) -> Self {
        Self {
            per_page: 25,
            state: Mutex::new(FakeState {
                deployments,
                ..FakeState::default()
            }),
        }
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    /// Make `list_deployments` fail for the given 1-based page.
    pub fn fail_page(self, page: u32) -> Self {
        self.state.lock().unwrap().failing_pages.insert(page);
        self
    }

    /// Make `delete_deployment` fail for the given id.
    pub fn fail_delete(self, deployment_id: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_deletes
            .insert(deployment_id.to_string());
        self
    }

    /// Ids passed to `delete_deployment`, in call order.
    pub fn delete_calls(&self) -> Vec<String> {
        self.state.lock().unwrap().delete_calls.clone()
    }

    /// `(environment, page)` pairs passed to `list_deployments`, in call order.
    pub fn list_calls(&self) -> Vec<(Environment, u32)> {
        self.state.lock().unwrap().list_calls.clone()
    }

    /// Ids still present in the store.
    pub fn remaining_ids(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .deployments
            .iter()
            .map(|d| d.id.clone())
            .collect()
    }
}

#[async_trait]
impl DeploymentApi for MemoryDeploymentApi {
    async fn list_deployments(
        &self,
        environment: Environment,
        page: u32,
    ) -> ApiResult<DeploymentPage> {
        let mut state = self.state.lock().unwrap();
        state.list_calls.push((environment, page));

        if state.failing_pages.contains(&page) {
            return Err(ApiError::Http(format!("connection reset on page {}", page)));
        }

        let per_page = self.per_page as usize;
        let total = state.deployments.len();
        let total_pages = total.div_ceil(per_page) as u32;
        let start = (page.saturating_sub(1) as usize).saturating_mul(per_page);
        let deployments = state
            .deployments
            .iter()
            .skip(start)
            .take(per_page)
            .cloned()
            .collect();

        Ok(DeploymentPage {
            deployments,
            info: Some(PageInfo {
                page,
                per_page: self.per_page,
                total_pages: Some(total_pages),
                total_count: Some(total as u64),
            }),
        })
    }

    async fn delete_deployment(&self, deployment_id: &str) -> ApiResult<()> {
        let mut state = self.state.lock().unwrap();
        state.delete_calls.push(deployment_id.to_string());

        if state.failing_deletes.contains(deployment_id) {
            return Err(ApiError::Api {
                status: 500,
                message: format!("simulated failure deleting {}", deployment_id),
            });
        }

        let before = state.deployments.len();
        state.deployments.retain(|d| d.id != deployment_id);
        if state.deployments.len() == before {
            return Err(ApiError::NotFound {
                id: deployment_id.to_string(),
            });
        }
        Ok(())
    }
}
