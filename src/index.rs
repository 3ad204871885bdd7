//! Identity index: which destination record holds which source task.
//!
//! Built once at the start of a run by draining every page of the
//! destination collection. After construction the index is read-only; writes
//! made later in the run are not reflected in it.

use anyhow::Result;
use std::collections::HashMap;

use crate::error::SyncError;
use crate::models::RecordId;
use crate::traits::RecordStore;

/// Point-in-time mapping from source task id to destination record id.
#[derive(Debug, Clone, Default)]
pub struct IdentityIndex {
    entries: HashMap<i64, RecordId>,
}

impl IdentityIndex {
    /// Drain `collection` page by page and index every record.
    ///
    /// Fails without returning a partial index if any page fetch fails or a
    /// page reports more results but carries no cursor. Records whose task id
    /// column is empty are skipped. If two records carry the same task id,
    /// the later one wins.
    pub async fn build(store: &dyn RecordStore, collection: &str) -> Result<Self> {
        let mut entries = HashMap::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;
        let mut skipped = 0usize;

        loop {
            let page = store.query(collection, cursor.as_deref()).await?;
            pages += 1;

            for record in page.records {
                let Some(task_id) = record.task_id else {
                    skipped += 1;
                    tracing::warn!(record = %record.id, "record has no task id; not indexed");
                    continue;
                };
                if let Some(previous) = entries.insert(task_id, record.id.clone()) {
                    tracing::warn!(
                        task_id,
                        kept = %record.id,
                        replaced = %previous,
                        "duplicate task id in destination"
                    );
                }
            }

            match page.next_cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                None if !page.has_more => break,
                _ => return Err(SyncError::MalformedContinuation { page: pages }.into()),
            }
        }

        tracing::info!(
            entries = entries.len(),
            pages,
            skipped,
            "identity index built"
        );
        Ok(Self { entries })
    }

    pub fn get(&self, task_id: i64) -> Option<&RecordId> {
        self.entries.get(&task_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by task id.
    pub fn sorted(&self) -> Vec<(i64, &RecordId)> {
        let mut out: Vec<_> = self.entries.iter().map(|(k, v)| (*k, v)).collect();
        out.sort_by_key(|(k, _)| *k);
        out
    }
}

impl FromIterator<(i64, RecordId)> for IdentityIndex {
    fn from_iter<I: IntoIterator<Item = (i64, RecordId)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
