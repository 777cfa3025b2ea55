//! Document store: read-only content collections and encrypted secret records.
//!
//! Layout:
//! - `models.rs`: row structs, serialized with the collections' wire field names
//! - `schema.rs`: SQL DDL bootstrapping the collections (SQLite-first)
//! - `sqlite.rs`: `ContentStore`, the pooled query surface

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{ImageAsset, Project, ProjectTool, ProjectWithTools, SecretRecord, TimelineEntry, Tool};
pub use schema::SQLITE_INIT;
pub use sqlite::{ContentStore, SqlitePool};
