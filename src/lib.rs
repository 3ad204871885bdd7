//! # todoist-notion-sync
//!
//! One-way sync of active Todoist tasks into a Notion database.
//!
//! Each run creates a Notion page for every top-level task that has none yet
//! and rewrites the properties of pages whose task already exists. Nothing
//! flows back to Todoist, and pages whose task disappeared are left alone.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌─────────────┐
//! │  Todoist    │──▶│   fetch      │   │   Notion    │
//! │ TaskSource  │   └──────┬───────┘   │ RecordStore │
//! └─────┬───────┘          ▼           └──┬───────▲──┘
//!       │           ┌──────────────┐      │       │
//!       │           │  reconcile   │◀─────┘ index │
//!       │           └──────┬───────┘              │
//!       │   labels  ┌──────▼───────┐   writes     │
//!       └──────────▶│  translate   │──────────────┘
//!                   │  + executor  │
//!                   └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! export TODOIST_KEY=... NOTION_KEY=... NOTION_DATABASE_ID=...
//! tnsync sources              # check credentials
//! tnsync sync --dry-run       # show what would change
//! tnsync sync                 # create and update pages
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and credentials |
//! | [`models`] | Core data types |
//! | [`traits`] | `TaskSource` / `RecordStore` seams |
//! | [`index`] | Task id → page id identity index |
//! | [`fetch`] | Active top-level task fetcher |
//! | [`translate`] | Task → destination properties |
//! | [`reconcile`] | Create/update classification |
//! | [`executor`] | Bounded concurrent writes and the run report |
//! | [`sync`] | Run orchestration |
//! | [`todoist`] | Todoist REST client |
//! | [`notion`] | Notion API client |
//! | [`progress`] | Progress reporting on stderr |
//! | [`sources`] | Service configuration status |

pub mod config;
pub mod error;
pub mod executor;
pub mod fetch;
pub mod http;
pub mod index;
pub mod models;
pub mod notion;
pub mod progress;
pub mod reconcile;
pub mod sources;
pub mod sync;
pub mod todoist;
pub mod traits;
pub mod translate;
