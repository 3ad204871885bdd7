//! Notion API client.
//!
//! Implements [`RecordStore`] on top of three Notion endpoints:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | query one page of records | `POST {api_base}/v1/databases/{id}/query` |
//! | create a record | `POST {api_base}/v1/pages` |
//! | update a record | `PATCH {api_base}/v1/pages/{id}` |
//!
//! # Configuration
//!
//! ```toml
//! [notion]
//! database_id = "0123456789abcdef0123456789abcdef"
//! version = "2022-06-28"
//!
//! [properties]
//! task_id = "Task ID"
//! completed = "✅"
//! ```
//!
//! The integration token comes from `NOTION_KEY`.
//!
//! # Pagination
//!
//! Queries ask for 100 results at a time. Each response carries `has_more`
//! and `next_cursor`; the cursor is passed back as `start_cursor` by the
//! caller (see [`IdentityIndex::build`](crate::index::IdentityIndex::build)).
//!
//! # Property encoding
//!
//! A [`PropertySet`] is written as a full property object. Absent due dates
//! and URLs are sent as explicit `null`s so an update clears stale values.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::config::PropertyNames;
use crate::error::SyncError;
use crate::http::{build_client, ensure_success, trim_base};
use crate::models::{DestinationRecord, PropertySet, RecordId, RecordPage};
use crate::traits::RecordStore;

const PAGE_SIZE: u32 = 100;

pub struct NotionClient {
    client: reqwest::Client,
    api_base: String,
    token: String,
    version: String,
    names: PropertyNames,
}

impl NotionClient {
    pub fn new(
        api_base: &str,
        token: &str,
        version: &str,
        names: PropertyNames,
        timeout_secs: u64,
    ) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            api_base: trim_base(api_base),
            token: token.to_string(),
            version: version.to_string(),
            names,
        })
    }

    async fn send_json(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &Value,
        operation: &str,
    ) -> Result<Value> {
        let url = format!("{}{}", self.api_base, path);
        let resp = self
            .client
            .request(method, &url)
            .bearer_auth(&self.token)
            .header("Notion-Version", &self.version)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Notion {} request to {} failed", operation, url))?;
        let resp = ensure_success(resp, "Notion", operation).await?;
        resp.json::<Value>()
            .await
            .with_context(|| format!("Notion {} returned an unexpected body", operation))
    }
}

#[async_trait]
impl RecordStore for NotionClient {
    async fn query(&self, collection: &str, cursor: Option<&str>) -> Result<RecordPage> {
        let mut body = json!({ "page_size": PAGE_SIZE });
        if let Some(cursor) = cursor {
            body["start_cursor"] = Value::String(cursor.to_string());
        }
        let path = format!("/v1/databases/{}/query", collection);
        let json = self
            .send_json(reqwest::Method::POST, &path, &body, "query database")
            .await?;
        parse_query_response(&json, &self.names.task_id)
    }

    async fn create(&self, collection: &str, properties: &PropertySet) -> Result<RecordId> {
        let body = json!({
            "parent": { "database_id": collection },
            "properties": properties_json(properties, &self.names),
        });
        let json = self
            .send_json(reqwest::Method::POST, "/v1/pages", &body, "create page")
            .await?;
        page_id(&json)
    }

    async fn update(&self, record: &RecordId, properties: &PropertySet) -> Result<RecordId> {
        let body = json!({ "properties": properties_json(properties, &self.names) });
        let path = format!("/v1/pages/{}", record);
        let json = self
            .send_json(reqwest::Method::PATCH, &path, &body, "update page")
            .await?;
        page_id(&json)
    }
}

/// Encode a property set as a Notion `properties` object.
pub fn properties_json(props: &PropertySet, names: &PropertyNames) -> Value {
    let mut out = Map::new();
    out.insert(names.task_id.clone(), json!({ "number": props.task_id }));
    out.insert(names.title.clone(), json!({ "title": [text(&props.title)] }));
    out.insert(
        names.description.clone(),
        json!({ "rich_text": [text(&props.description)] }),
    );
    let tags: Vec<Value> = props
        .tags
        .iter()
        .map(|name| json!({ "name": name }))
        .collect();
    out.insert(names.tags.clone(), json!({ "multi_select": tags }));
    out.insert(
        names.priority.clone(),
        json!({ "select": { "name": props.priority } }),
    );
    out.insert(
        names.completed.clone(),
        json!({ "checkbox": props.completed }),
    );
    let date = props
        .due_date
        .map(|d| json!({ "start": d.format("%Y-%m-%d").to_string() }));
    out.insert(names.due_date.clone(), json!({ "date": date }));
    out.insert(names.url.clone(), json!({ "url": props.url }));
    Value::Object(out)
}

fn text(content: &str) -> Value {
    json!({ "type": "text", "text": { "content": content } })
}

/// Parse a database query response into a [`RecordPage`].
///
/// Every result must carry the `task_id_property` column. An empty number
/// cell yields a record with no task id.
pub fn parse_query_response(json: &Value, task_id_property: &str) -> Result<RecordPage> {
    let results = json
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| invalid("query response has no results array"))?;

    let mut records = Vec::with_capacity(results.len());
    for page in results {
        let id = page_id(page)?;
        let property = page
            .get("properties")
            .and_then(|p| p.get(task_id_property))
            .ok_or_else(|| SyncError::MissingProperty {
                record: id.to_string(),
                property: task_id_property.to_string(),
            })?;
        let task_id = number_property(&id, task_id_property, property)?;
        records.push(DestinationRecord { id, task_id });
    }

    let has_more = json
        .get("has_more")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let next_cursor = json
        .get("next_cursor")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(RecordPage {
        records,
        has_more,
        next_cursor,
    })
}

fn number_property(record: &RecordId, name: &str, property: &Value) -> Result<Option<i64>> {
    let mistyped = || SyncError::UnexpectedPropertyType {
        record: record.to_string(),
        property: name.to_string(),
        expected: "an integer number",
    };

    if let Some(kind) = property.get("type").and_then(Value::as_str) {
        if kind != "number" {
            return Err(mistyped().into());
        }
    }

    match property.get("number") {
        None | Some(Value::Null) => Ok(None),
        Some(value) => {
            if let Some(n) = value.as_i64() {
                return Ok(Some(n));
            }
            match value.as_f64() {
                Some(f) if f.fract() == 0.0 => Ok(Some(f as i64)),
                _ => Err(mistyped().into()),
            }
        }
    }
}

fn page_id(json: &Value) -> Result<RecordId> {
    json.get("id")
        .and_then(Value::as_str)
        .map(RecordId::from)
        .ok_or_else(|| invalid("page object has no id").into())
}

fn invalid(detail: &str) -> SyncError {
    SyncError::InvalidResponse {
        service: "Notion",
        detail: detail.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> PropertySet {
        PropertySet {
            task_id: 42,
            title: "Write report".into(),
            description: String::new(),
            tags: vec!["Work".into(), "Urgent".into()],
            priority: "3".into(),
            completed: false,
            due_date: None,
            url: None,
        }
    }

    #[test]
    fn test_properties_json_shape() {
        let value = properties_json(&sample(), &PropertyNames::default());
        assert_eq!(value["Task ID"], json!({ "number": 42 }));
        assert_eq!(
            value["Content"]["title"][0]["text"]["content"],
            json!("Write report")
        );
        assert_eq!(
            value["Description"]["rich_text"][0]["text"]["content"],
            json!("")
        );
        assert_eq!(
            value["Tags"],
            json!({ "multi_select": [{ "name": "Work" }, { "name": "Urgent" }] })
        );
        assert_eq!(value["Priority"], json!({ "select": { "name": "3" } }));
        assert_eq!(value["✅"], json!({ "checkbox": false }));
        assert_eq!(value["URL"], json!({ "url": null }));
    }

    #[test]
    fn test_absent_due_date_is_explicit_null() {
        let value = properties_json(&sample(), &PropertyNames::default());
        let due = value
            .get("Due Date")
            .and_then(|d| d.as_object())
            .expect("due date property present");
        assert!(due.contains_key("date"));
        assert!(due["date"].is_null());
    }

    #[test]
    fn test_due_date_start() {
        let mut props = sample();
        props.due_date = NaiveDate::from_ymd_opt(2024, 5, 1);
        let value = properties_json(&props, &PropertyNames::default());
        assert_eq!(value["Due Date"], json!({ "date": { "start": "2024-05-01" } }));
    }

    #[test]
    fn test_custom_column_names() {
        let names = PropertyNames {
            completed: "Done".into(),
            ..PropertyNames::default()
        };
        let value = properties_json(&sample(), &names);
        assert!(value.get("Done").is_some());
        assert!(value.get("✅").is_none());
    }

    #[test]
    fn test_parse_query_response() {
        let json = json!({
            "object": "list",
            "results": [
                { "id": "p1", "properties": { "Task ID": { "type": "number", "number": 42 } } },
                { "id": "p2", "properties": { "Task ID": { "type": "number", "number": null } } },
                { "id": "p3", "properties": { "Task ID": { "type": "number", "number": 7.0 } } }
            ],
            "has_more": true,
            "next_cursor": "cur-2"
        });
        let page = parse_query_response(&json, "Task ID").unwrap();
        assert_eq!(page.records.len(), 3);
        assert_eq!(page.records[0].task_id, Some(42));
        assert_eq!(page.records[1].task_id, None);
        assert_eq!(page.records[2].task_id, Some(7));
        assert!(page.has_more);
        assert_eq!(page.next_cursor.as_deref(), Some("cur-2"));
    }

    #[test]
    fn test_last_page_has_no_cursor() {
        let json = json!({ "results": [], "has_more": false, "next_cursor": null });
        let page = parse_query_response(&json, "Task ID").unwrap();
        assert!(!page.has_more);
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn test_missing_task_id_column() {
        let json = json!({
            "results": [{ "id": "p1", "properties": { "Name": {} } }],
            "has_more": false
        });
        let err = parse_query_response(&json, "Task ID").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SyncError>(),
            Some(SyncError::MissingProperty { .. })
        ));
    }

    #[test]
    fn test_wrong_column_type() {
        let json = json!({
            "results": [{ "id": "p1", "properties": { "Task ID": { "type": "rich_text", "rich_text": [] } } }],
            "has_more": false
        });
        let err = parse_query_response(&json, "Task ID").unwrap_err();
        assert!(err.to_string().contains("is not an integer number"));
    }

    #[test]
    fn test_missing_results() {
        assert!(parse_query_response(&json!({ "object": "error" }), "Task ID").is_err());
    }
}
