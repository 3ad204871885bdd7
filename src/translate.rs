//! Property translator: one source task → one destination [`PropertySet`].
//!
//! | Task field | Destination property | Rule |
//! |------------|----------------------|------|
//! | `id` | number | as is |
//! | `content` | title | literal text |
//! | `description` | rich text | `""` when absent |
//! | `label_ids` | multi-select | resolved label names, in label order |
//! | `priority` | select | decimal string (`3` → `"3"`) |
//! | `completed` | checkbox | as is |
//! | `due.date` | date | date portion only, `null` when absent |
//! | `url` | url | as is, `null` when absent |
//!
//! Label names are resolved through the [`TaskSource`] for every task
//! separately; two tasks sharing a label each resolve it.

use anyhow::Result;
use chrono::NaiveDate;
use futures::future::try_join_all;

use crate::error::SyncError;
use crate::models::{PropertySet, SourceTask};
use crate::traits::TaskSource;

/// Resolve the task's labels concurrently, then build its properties.
///
/// Any label lookup failure is logged and fails the whole translation; no
/// placeholder name is substituted.
pub async fn translate(task: &SourceTask, source: &dyn TaskSource) -> Result<PropertySet> {
    let label_names = resolve_labels(task, source).await?;
    build_properties(task, label_names)
}

async fn resolve_labels(task: &SourceTask, source: &dyn TaskSource) -> Result<Vec<String>> {
    let lookups = task.label_ids.iter().map(|&id| async move {
        source.get_label(id).await.map_err(|e| {
            tracing::error!(task_id = task.id, label_id = id, error = %e, "label lookup failed");
            e.context(format!("resolving label {} for task {}", id, task.id))
        })
    });
    let labels = try_join_all(lookups).await?;
    Ok(labels.into_iter().map(|label| label.name).collect())
}

/// Build a task's properties from already-resolved label names.
///
/// Deterministic: the same task and names always give the same set.
pub fn build_properties(task: &SourceTask, label_names: Vec<String>) -> Result<PropertySet> {
    let due_date = match &task.due {
        Some(due) => Some(parse_due_date(task.id, &due.date)?),
        None => None,
    };

    Ok(PropertySet {
        task_id: task.id,
        title: task.content.clone(),
        description: task.description.clone().unwrap_or_default(),
        tags: label_names,
        priority: task.priority.to_string(),
        completed: task.completed,
        due_date,
        url: task.url.clone(),
    })
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part, and keeps the date.
fn parse_due_date(task_id: i64, value: &str) -> Result<NaiveDate> {
    let date_part = value.split(['T', ' ']).next().unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| {
        SyncError::MalformedDueDate {
            task_id,
            value: value.to_string(),
        }
        .into()
    })
}
