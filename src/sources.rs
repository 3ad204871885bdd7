use anyhow::Result;

use crate::config::Config;

/// One row of `tnsync sources` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceStatus {
    pub name: &'static str,
    pub status: String,
    pub healthy: bool,
}

/// Report whether each service has what it needs to run, without calling it.
pub fn get_sources(config: &Config) -> Vec<SourceStatus> {
    let todoist = if std::env::var("TODOIST_KEY").is_ok() {
        ok_status("todoist")
    } else {
        missing("todoist", "TODOIST_KEY not set")
    };

    let notion = match (
        std::env::var("NOTION_KEY").is_ok(),
        config.database_id().is_ok(),
    ) {
        (true, true) => ok_status("notion"),
        (false, _) => missing("notion", "NOTION_KEY not set"),
        (true, false) => missing("notion", "no database id"),
    };

    vec![todoist, notion]
}

pub fn list_sources(config: &Config) -> Result<()> {
    println!("{:<12} {:<32} HEALTHY", "SERVICE", "STATUS");
    for source in get_sources(config) {
        println!(
            "{:<12} {:<32} {}",
            source.name, source.status, source.healthy
        );
    }
    Ok(())
}

fn ok_status(name: &'static str) -> SourceStatus {
    SourceStatus {
        name,
        status: "OK".to_string(),
        healthy: true,
    }
}

fn missing(name: &'static str, reason: &str) -> SourceStatus {
    SourceStatus {
        name,
        status: format!("NOT CONFIGURED ({})", reason),
        healthy: false,
    }
}
