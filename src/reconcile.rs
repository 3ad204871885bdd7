//! Reconciler: decides, per task, whether the destination needs a new record
//! or an update to an existing one.
//!
//! The sync is additive. Records whose task is no longer active at the
//! source are never considered here and stay untouched.

use crate::index::IdentityIndex;
use crate::models::{RecordId, SourceTask};

/// Create/update sets for one run, each in fetch order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub to_create: Vec<SourceTask>,
    pub to_update: Vec<(SourceTask, RecordId)>,
}

impl Plan {
    pub fn len(&self) -> usize {
        self.to_create.len() + self.to_update.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition `tasks` against `index`.
///
/// Every task lands in exactly one set. A task whose id is indexed is paired
/// with that record id; anything else is created.
pub fn classify(tasks: Vec<SourceTask>, index: &IdentityIndex) -> Plan {
    let mut plan = Plan::default();
    for task in tasks {
        match index.get(task.id) {
            Some(record) => {
                tracing::debug!(task_id = task.id, record = %record, "update");
                let record = record.clone();
                plan.to_update.push((task, record));
            }
            None => {
                tracing::debug!(task_id = task.id, "create");
                plan.to_create.push(task);
            }
        }
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(pairs: &[(i64, &str)]) -> IdentityIndex {
        pairs
            .iter()
            .map(|(id, page)| (*id, RecordId::from(*page)))
            .collect()
    }

    fn tasks(ids: &[i64]) -> Vec<SourceTask> {
        ids.iter()
            .map(|id| SourceTask::new(*id, &format!("task {}", id)))
            .collect()
    }

    #[test]
    fn test_existing_task_routed_to_update() {
        let plan = classify(tasks(&[42]), &index(&[(42, "p1")]));
        assert!(plan.to_create.is_empty());
        assert_eq!(plan.to_update.len(), 1);
        assert_eq!(plan.to_update[0].0.id, 42);
        assert_eq!(plan.to_update[0].1, RecordId::from("p1"));
    }

    #[test]
    fn test_unknown_task_routed_to_create() {
        let plan = classify(tasks(&[7]), &index(&[(42, "p1")]));
        assert!(plan.to_update.is_empty());
        assert_eq!(plan.to_create, tasks(&[7]));
    }

    #[test]
    fn test_partition_is_total_and_order_preserving() {
        let input = tasks(&[5, 1, 9, 3, 8, 2]);
        let idx = index(&[(1, "a"), (3, "c"), (2, "b"), (100, "stale")]);
        let plan = classify(input.clone(), &idx);

        assert_eq!(plan.len(), input.len());
        let created: Vec<i64> = plan.to_create.iter().map(|t| t.id).collect();
        let updated: Vec<i64> = plan.to_update.iter().map(|(t, _)| t.id).collect();
        assert_eq!(created, vec![5, 9, 8]);
        assert_eq!(updated, vec![1, 3, 2]);
        for id in &created {
            assert!(!updated.contains(id));
        }
        for (task, record) in &plan.to_update {
            assert_eq!(idx.get(task.id), Some(record));
        }
    }

    #[test]
    fn test_stale_records_are_ignored() {
        let plan = classify(Vec::new(), &index(&[(1, "a"), (2, "b")]));
        assert!(plan.is_empty());
    }

    #[test]
    fn test_empty_index_creates_everything() {
        let plan = classify(tasks(&[1, 2, 3]), &IdentityIndex::default());
        assert_eq!(plan.to_create.len(), 3);
        assert!(plan.to_update.is_empty());
    }
}
