//! Todoist REST client.
//!
//! Implements [`TaskSource`] against the Todoist REST API:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | list active tasks | `GET {api_base}/tasks` |
//! | resolve a label | `GET {api_base}/labels/{id}` |
//!
//! # Configuration
//!
//! ```toml
//! [todoist]
//! api_base = "https://api.todoist.com/rest/v1"
//! ```
//!
//! The bearer token comes from `TODOIST_KEY`. Each request is attempted
//! once; failures are returned to the caller.

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::http::{build_client, ensure_success, trim_base};
use crate::models::{Label, SourceTask};
use crate::traits::TaskSource;

pub struct TodoistClient {
    client: reqwest::Client,
    api_base: String,
    token: String,
}

impl TodoistClient {
    pub fn new(api_base: &str, token: &str, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            api_base: trim_base(api_base),
            token: token.to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        operation: &str,
    ) -> Result<T> {
        let url = format!("{}{}", self.api_base, path);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .with_context(|| format!("Todoist {} request to {} failed", operation, url))?;
        let resp = ensure_success(resp, "Todoist", operation).await?;
        resp.json::<T>()
            .await
            .with_context(|| format!("Todoist {} returned an unexpected body", operation))
    }
}

#[async_trait]
impl TaskSource for TodoistClient {
    async fn list_active_tasks(&self) -> Result<Vec<SourceTask>> {
        let tasks: Vec<SourceTask> = self.get_json("/tasks", "list tasks").await?;
        tracing::debug!(count = tasks.len(), "fetched tasks from Todoist");
        Ok(tasks)
    }

    async fn get_label(&self, id: i64) -> Result<Label> {
        self.get_json(&format!("/labels/{}", id), "get label").await
    }
}
