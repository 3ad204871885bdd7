//! Run orchestration.
//!
//! Sequences one sync run: index the destination → fetch source tasks →
//! classify → create → update. Index or fetch failures abort the run;
//! individual write failures are collected into the [`SyncReport`].

use anyhow::Result;

use crate::config::{Config, Credentials};
use crate::executor::{Executor, SyncReport};
use crate::fetch::fetch_active;
use crate::index::IdentityIndex;
use crate::notion::NotionClient;
use crate::progress::{ProgressMode, SyncProgressEvent, SyncProgressReporter};
use crate::reconcile::classify;
use crate::todoist::TodoistClient;
use crate::traits::{RecordStore, TaskSource};

/// Per-run settings resolved from config and CLI flags.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub collection: String,
    pub concurrency: usize,
    pub dry_run: bool,
}

/// Run one sync against the configured services and print a summary.
pub async fn run_sync(
    config: &Config,
    dry_run: bool,
    concurrency: Option<usize>,
    progress: ProgressMode,
) -> Result<SyncReport> {
    let creds = Credentials::from_env()?;
    let source = todoist_client(config, &creds)?;
    let store = notion_client(config, &creds)?;

    let settings = SyncSettings {
        collection: config.database_id()?.to_string(),
        concurrency: concurrency.unwrap_or(config.sync.concurrency),
        dry_run,
    };
    if settings.concurrency == 0 {
        anyhow::bail!("--concurrency must be >= 1");
    }

    let reporter = progress.reporter();
    let report = sync_with(&source, &store, &settings, reporter.as_ref()).await?;
    print_summary(&report);
    Ok(report)
}

/// Run one sync against arbitrary service implementations.
pub async fn sync_with(
    source: &dyn TaskSource,
    store: &dyn RecordStore,
    settings: &SyncSettings,
    reporter: &dyn SyncProgressReporter,
) -> Result<SyncReport> {
    reporter.report(SyncProgressEvent::Indexing);
    let index = IdentityIndex::build(store, &settings.collection).await?;

    reporter.report(SyncProgressEvent::Fetching);
    let tasks = fetch_active(source).await?;

    let mut report = SyncReport {
        indexed: index.len(),
        fetched: tasks.len(),
        dry_run: settings.dry_run,
        ..Default::default()
    };

    let plan = classify(tasks, &index);
    report.to_create = plan.to_create.len();
    report.to_update = plan.to_update.len();
    tracing::info!(
        to_create = report.to_create,
        to_update = report.to_update,
        "classified tasks"
    );

    if settings.dry_run {
        for task in &plan.to_create {
            println!("  would create task {}: {}", task.id, task.content);
        }
        for (task, record) in &plan.to_update {
            println!("  would update task {} → page {}", task.id, record);
        }
        return Ok(report);
    }

    let executor = Executor::new(
        store,
        source,
        &settings.collection,
        settings.concurrency,
        reporter,
    );
    let created = executor.create_all(plan.to_create).await;
    report.record(created);
    let updated = executor.update_all(plan.to_update).await;
    report.record(updated);

    Ok(report)
}

/// Build the identity index and print it, for inspecting the destination.
pub async fn run_index(config: &Config) -> Result<()> {
    let creds = Credentials::from_env()?;
    let store = notion_client(config, &creds)?;
    let index = IdentityIndex::build(&store, config.database_id()?).await?;

    println!("{:<16} PAGE ID", "TASK ID");
    for (task_id, record) in index.sorted() {
        println!("{:<16} {}", task_id, record);
    }
    println!("{} records indexed", index.len());
    Ok(())
}

fn todoist_client(config: &Config, creds: &Credentials) -> Result<TodoistClient> {
    TodoistClient::new(
        &config.todoist.api_base,
        &creds.todoist_key,
        config.sync.timeout_secs,
    )
}

fn notion_client(config: &Config, creds: &Credentials) -> Result<NotionClient> {
    NotionClient::new(
        &config.notion.api_base,
        &creds.notion_key,
        &config.notion.version,
        config.properties.clone(),
        config.sync.timeout_secs,
    )
}

fn print_summary(report: &SyncReport) {
    if report.dry_run {
        println!("sync todoist → notion (dry-run)");
    } else {
        println!("sync todoist → notion");
    }
    println!("  indexed records: {}", report.indexed);
    println!("  fetched tasks: {}", report.fetched);
    println!("  to create: {}", report.to_create);
    println!("  to update: {}", report.to_update);
    if report.dry_run {
        return;
    }
    println!("  created: {}", report.created);
    println!("  updated: {}", report.updated);
    if !report.failures.is_empty() {
        println!("  failed: {}", report.failures.len());
        for failure in &report.failures {
            println!(
                "    task {} ({}): {}",
                failure.task_id, failure.action, failure.error
            );
        }
    } else {
        println!("ok");
    }
}
