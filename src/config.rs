use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub notion: NotionConfig,
    #[serde(default)]
    pub todoist: TodoistConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub properties: PropertyNames,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotionConfig {
    /// Target database. `NOTION_DATABASE_ID` overrides this.
    #[serde(default)]
    pub database_id: Option<String>,
    #[serde(default = "default_notion_api_base")]
    pub api_base: String,
    #[serde(default = "default_notion_version")]
    pub version: String,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            database_id: None,
            api_base: default_notion_api_base(),
            version: default_notion_version(),
        }
    }
}

fn default_notion_api_base() -> String {
    "https://api.notion.com".to_string()
}
fn default_notion_version() -> String {
    "2022-06-28".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct TodoistConfig {
    #[serde(default = "default_todoist_api_base")]
    pub api_base: String,
}

impl Default for TodoistConfig {
    fn default() -> Self {
        Self {
            api_base: default_todoist_api_base(),
        }
    }
}

fn default_todoist_api_base() -> String {
    "https://api.todoist.com/rest/v1".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct SyncConfig {
    /// Maximum destination writes in flight at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_concurrency() -> usize {
    3
}
fn default_timeout_secs() -> u64 {
    30
}

/// Column names of the destination database.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PropertyNames {
    pub task_id: String,
    pub title: String,
    pub description: String,
    pub tags: String,
    pub priority: String,
    pub completed: String,
    pub due_date: String,
    pub url: String,
}

impl Default for PropertyNames {
    fn default() -> Self {
        Self {
            task_id: "Task ID".to_string(),
            title: "Content".to_string(),
            description: "Description".to_string(),
            tags: "Tags".to_string(),
            priority: "Priority".to_string(),
            completed: "✅".to_string(),
            due_date: "Due Date".to_string(),
            url: "URL".to_string(),
        }
    }
}

impl PropertyNames {
    fn all(&self) -> [(&'static str, &str); 8] {
        [
            ("task_id", self.task_id.as_str()),
            ("title", self.title.as_str()),
            ("description", self.description.as_str()),
            ("tags", self.tags.as_str()),
            ("priority", self.priority.as_str()),
            ("completed", self.completed.as_str()),
            ("due_date", self.due_date.as_str()),
            ("url", self.url.as_str()),
        ]
    }
}

/// API tokens read from the environment (or a `.env` file loaded by the CLI).
#[derive(Clone)]
pub struct Credentials {
    pub notion_key: String,
    pub todoist_key: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        let notion_key =
            std::env::var("NOTION_KEY").context("NOTION_KEY environment variable not set")?;
        let todoist_key =
            std::env::var("TODOIST_KEY").context("TODOIST_KEY environment variable not set")?;
        Ok(Self {
            notion_key,
            todoist_key,
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("notion_key", &"<redacted>")
            .field("todoist_key", &"<redacted>")
            .finish()
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| "Failed to parse config file")
    }

    /// The database id, once [`load_config`] has validated it.
    pub fn database_id(&self) -> Result<&str> {
        self.notion
            .database_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "notion.database_id must be set (or NOTION_DATABASE_ID in the environment)"
                )
            })
    }

    pub fn validate(&self) -> Result<()> {
        self.database_id()?;

        if self.sync.concurrency == 0 {
            anyhow::bail!("sync.concurrency must be >= 1");
        }
        if self.sync.timeout_secs == 0 {
            anyhow::bail!("sync.timeout_secs must be > 0");
        }

        let mut seen = HashSet::new();
        for (key, name) in self.properties.all() {
            if name.trim().is_empty() {
                anyhow::bail!("properties.{} must not be empty", key);
            }
            if !seen.insert(name) {
                anyhow::bail!("properties.{}: column '{}' is used twice", key, name);
            }
        }

        Ok(())
    }
}

/// Load configuration from `path` and validate it.
pub fn load_config(path: &Path) -> Result<Config> {
    let config = read_config(path)?;
    config.validate()?;
    Ok(config)
}

/// Read configuration from `path`, falling back to defaults when the file
/// does not exist, and apply environment overrides. Does not validate.
pub fn read_config(path: &Path) -> Result<Config> {
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Config::from_toml_str(&content)?
    } else {
        tracing::debug!(path = %path.display(), "config file not found; using defaults");
        Config::default()
    };

    if let Ok(id) = std::env::var("NOTION_DATABASE_ID") {
        config.notion.database_id = Some(id);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[notion]
database_id = "abc123"
api_base = "http://localhost:9000"

[todoist]
api_base = "http://localhost:9001"

[sync]
concurrency = 8

[properties]
completed = "Done"
"#;

    #[test]
    fn test_parse_full() {
        let config = Config::from_toml_str(FULL).unwrap();
        assert_eq!(config.database_id().unwrap(), "abc123");
        assert_eq!(config.notion.api_base, "http://localhost:9000");
        assert_eq!(config.notion.version, "2022-06-28");
        assert_eq!(config.todoist.api_base, "http://localhost:9001");
        assert_eq!(config.sync.concurrency, 8);
        assert_eq!(config.sync.timeout_secs, 30);
        assert_eq!(config.properties.completed, "Done");
        assert_eq!(config.properties.task_id, "Task ID");
        config.validate().unwrap();
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.sync.concurrency, 3);
        assert_eq!(config.properties, PropertyNames::default());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config = Config::from_toml_str(
            "[notion]\ndatabase_id = \"x\"\n[sync]\nconcurrency = 0\n",
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("concurrency"));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let config = Config::from_toml_str(
            "[notion]\ndatabase_id = \"x\"\n[properties]\ntags = \"Content\"\n",
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("used twice"));
    }

    #[test]
    fn test_blank_database_id_rejected() {
        let config = Config::from_toml_str("[notion]\ndatabase_id = \"  \"\n").unwrap();
        assert!(config.database_id().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tnsync.toml");
        std::fs::write(&path, FULL).unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.sync.concurrency, 8);
    }

    #[test]
    fn test_unparseable_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tnsync.toml");
        std::fs::write(&path, "[sync\nconcurrency = ").unwrap();
        assert!(load_config(&path).is_err());
    }
}
