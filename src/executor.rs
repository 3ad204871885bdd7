//! Sync executor: translates tasks and writes them to the destination.
//!
//! Writes run through a bounded concurrent group: at most `concurrency`
//! translate-and-write operations are in flight at once. Every task gets its
//! own [`WriteOutcome`], so one failing write neither stops its siblings nor
//! disappears from the report.

use anyhow::Result;
use futures::stream::{self, StreamExt};
use std::fmt;
use std::future::Future;

use crate::models::{RecordId, SourceTask};
use crate::progress::{SyncProgressEvent, SyncProgressReporter};
use crate::translate::translate;
use crate::traits::{RecordStore, TaskSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAction {
    Create,
    Update,
}

impl fmt::Display for WriteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteAction::Create => f.write_str("create"),
            WriteAction::Update => f.write_str("update"),
        }
    }
}

/// Result of translating and writing one task.
#[derive(Debug)]
pub struct WriteOutcome {
    pub task_id: i64,
    pub action: WriteAction,
    pub result: Result<RecordId>,
}

/// A task that could not be synced, with the rendered error chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    pub task_id: i64,
    pub action: WriteAction,
    pub error: String,
}

pub struct Executor<'a> {
    store: &'a dyn RecordStore,
    source: &'a dyn TaskSource,
    collection: &'a str,
    concurrency: usize,
    reporter: &'a dyn SyncProgressReporter,
}

impl<'a> Executor<'a> {
    pub fn new(
        store: &'a dyn RecordStore,
        source: &'a dyn TaskSource,
        collection: &'a str,
        concurrency: usize,
        reporter: &'a dyn SyncProgressReporter,
    ) -> Self {
        Self {
            store,
            source,
            collection,
            concurrency: concurrency.max(1),
            reporter,
        }
    }

    /// Create a new record under the collection for every task.
    pub async fn create_all(&self, tasks: Vec<SourceTask>) -> Vec<WriteOutcome> {
        self.write_all(WriteAction::Create, tasks, |task| self.create_one(task))
            .await
    }

    /// Rewrite the properties of each task's existing record.
    pub async fn update_all(&self, tasks: Vec<(SourceTask, RecordId)>) -> Vec<WriteOutcome> {
        self.write_all(WriteAction::Update, tasks, |(task, record)| {
            self.update_one(task, record)
        })
        .await
    }

    async fn write_all<T, F, Fut>(
        &self,
        action: WriteAction,
        items: Vec<T>,
        write: F,
    ) -> Vec<WriteOutcome>
    where
        F: Fn(T) -> Fut,
        Fut: Future<Output = WriteOutcome>,
    {
        let total = items.len() as u64;
        let mut pending =
            std::pin::pin!(stream::iter(items).map(write).buffer_unordered(self.concurrency));

        let mut outcomes = Vec::with_capacity(total as usize);
        while let Some(outcome) = pending.next().await {
            match &outcome.result {
                Ok(record) => {
                    tracing::debug!(task_id = outcome.task_id, record = %record, %action, "written")
                }
                Err(e) => tracing::warn!(
                    task_id = outcome.task_id,
                    %action,
                    error = %format!("{:#}", e),
                    "write failed"
                ),
            }
            outcomes.push(outcome);
            self.reporter.report(SyncProgressEvent::Writing {
                action,
                n: outcomes.len() as u64,
                total,
            });
        }
        outcomes
    }

    async fn create_one(&self, task: SourceTask) -> WriteOutcome {
        let result: Result<RecordId> = async {
            let properties = translate(&task, self.source).await?;
            self.store.create(self.collection, &properties).await
        }
        .await;
        WriteOutcome {
            task_id: task.id,
            action: WriteAction::Create,
            result,
        }
    }

    async fn update_one(&self, task: SourceTask, record: RecordId) -> WriteOutcome {
        let result: Result<RecordId> = async {
            let properties = translate(&task, self.source).await?;
            self.store.update(&record, &properties).await
        }
        .await;
        WriteOutcome {
            task_id: task.id,
            action: WriteAction::Update,
            result,
        }
    }
}

/// Aggregate counts for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub indexed: usize,
    pub fetched: usize,
    pub to_create: usize,
    pub to_update: usize,
    pub created: usize,
    pub updated: usize,
    pub failures: Vec<TaskFailure>,
    pub dry_run: bool,
}

impl SyncReport {
    pub fn record(&mut self, outcomes: Vec<WriteOutcome>) {
        for outcome in outcomes {
            match outcome.result {
                Ok(_) => match outcome.action {
                    WriteAction::Create => self.created += 1,
                    WriteAction::Update => self.updated += 1,
                },
                Err(e) => self.failures.push(TaskFailure {
                    task_id: outcome.task_id,
                    action: outcome.action,
                    error: format!("{:#}", e),
                }),
            }
        }
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}
