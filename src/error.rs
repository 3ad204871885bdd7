//! Domain errors raised while reading destination records or translating tasks.
//!
//! Transport failures are carried as [`anyhow::Error`] with context; these
//! variants cover data that arrived intact but has the wrong shape.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// A query page reported more results without a cursor to fetch them.
    #[error("malformed continuation: page {page} has more results but no next cursor")]
    MalformedContinuation { page: usize },

    #[error("record {record} has no '{property}' property")]
    MissingProperty { record: String, property: String },

    #[error("record {record}: property '{property}' is not {expected}")]
    UnexpectedPropertyType {
        record: String,
        property: String,
        expected: &'static str,
    },

    #[error("task {task_id} has malformed due date '{value}'")]
    MalformedDueDate { task_id: i64, value: String },

    #[error("invalid response from {service}: {detail}")]
    InvalidResponse {
        service: &'static str,
        detail: String,
    },
}
