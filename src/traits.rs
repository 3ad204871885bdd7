//! Service seams between the sync core and the outside world.
//!
//! The core never talks HTTP directly. It reads tasks through a
//! [`TaskSource`] and reads/writes destination records through a
//! [`RecordStore`]. The built-in implementations are
//! [`TodoistClient`](crate::todoist::TodoistClient) and
//! [`NotionClient`](crate::notion::NotionClient); tests substitute
//! in-memory fakes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   ┌───────────────────────┐   ┌─────────────┐
//! │ TaskSource  │──▶│ fetch → reconcile →   │──▶│ RecordStore │
//! │ (Todoist)   │   │ translate → write     │   │  (Notion)   │
//! └─────────────┘   └───────────────────────┘   └─────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use anyhow::Result;
//! use todoist_notion_sync::models::{Label, SourceTask};
//! use todoist_notion_sync::traits::TaskSource;
//!
//! pub struct FixedTasks(Vec<SourceTask>);
//!
//! #[async_trait]
//! impl TaskSource for FixedTasks {
//!     async fn list_active_tasks(&self) -> Result<Vec<SourceTask>> {
//!         Ok(self.0.clone())
//!     }
//!
//!     async fn get_label(&self, id: i64) -> Result<Label> {
//!         Ok(Label { id, name: format!("label-{}", id) })
//!     }
//! }
//! ```

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Label, PropertySet, RecordId, RecordPage, SourceTask};

/// Read access to the task-management service.
#[async_trait]
pub trait TaskSource: Send + Sync {
    /// Return every active task, subtasks included, in service order.
    ///
    /// Called once per run. Not paginated: the service is trusted to return
    /// the full active set.
    async fn list_active_tasks(&self) -> Result<Vec<SourceTask>>;

    /// Resolve a label id to its label.
    async fn get_label(&self, id: i64) -> Result<Label>;
}

/// Paginated read and per-record write access to the destination store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch one page of records from `collection`.
    ///
    /// `cursor` is `None` for the first page and the previous page's
    /// `next_cursor` afterwards. The last page has `next_cursor == None`.
    async fn query(&self, collection: &str, cursor: Option<&str>) -> Result<RecordPage>;

    /// Create a record under `collection` and return its id.
    async fn create(&self, collection: &str, properties: &PropertySet) -> Result<RecordId>;

    /// Overwrite every synced property of an existing record.
    async fn update(&self, record: &RecordId, properties: &PropertySet) -> Result<RecordId>;
}
