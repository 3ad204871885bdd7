//! Task fetcher: the eligible slice of the source's active tasks.

use anyhow::Result;

use crate::models::SourceTask;
use crate::traits::TaskSource;

/// Fetch active tasks and drop subtasks, keeping the service's ordering.
///
/// A source failure is logged and returned; it is not retried.
pub async fn fetch_active(source: &dyn TaskSource) -> Result<Vec<SourceTask>> {
    let tasks = match source.list_active_tasks().await {
        Ok(tasks) => tasks,
        Err(e) => {
            tracing::error!(error = %e, "failed to list active tasks");
            return Err(e);
        }
    };

    let total = tasks.len();
    let top_level = top_level_only(tasks);
    tracing::debug!(
        total,
        top_level = top_level.len(),
        "filtered subtasks from fetched tasks"
    );
    Ok(top_level)
}

fn top_level_only(tasks: Vec<SourceTask>) -> Vec<SourceTask> {
    tasks
        .into_iter()
        .filter(|task| task.parent_id.is_none())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Label;
    use async_trait::async_trait;

    struct StaticSource(Result<Vec<SourceTask>, String>);

    #[async_trait]
    impl TaskSource for StaticSource {
        async fn list_active_tasks(&self) -> Result<Vec<SourceTask>> {
            self.0.clone().map_err(|e| anyhow::anyhow!(e))
        }

        async fn get_label(&self, _id: i64) -> Result<Label> {
            unreachable!("fetcher never resolves labels")
        }
    }

    fn child(id: i64, parent: i64) -> SourceTask {
        SourceTask {
            parent_id: Some(parent),
            ..SourceTask::new(id, "child")
        }
    }

    #[tokio::test]
    async fn test_drops_subtasks_preserving_order() {
        let source = StaticSource(Ok(vec![
            SourceTask::new(3, "c"),
            child(4, 3),
            SourceTask::new(1, "a"),
            child(5, 1),
            SourceTask::new(2, "b"),
        ]));
        let tasks = fetch_active(&source).await.unwrap();
        let ids: Vec<i64> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_source_failure_propagates() {
        let source = StaticSource(Err("401 Unauthorized".to_string()));
        let err = fetch_active(&source).await.unwrap_err();
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_empty_source() {
        let source = StaticSource(Ok(vec![]));
        assert!(fetch_active(&source).await.unwrap().is_empty());
    }
}
