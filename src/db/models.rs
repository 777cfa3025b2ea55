use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Encrypted credential as stored in the `keys` collection.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct SecretRecord {
    #[sqlx(rename = "for_name")]
    pub name: String,
    #[sqlx(rename = "key")]
    pub ciphertext: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct ImageAsset {
    pub href: String,
    pub alt: String,
    /// Purpose tag: `profile`, `resume` or `coverletter`.
    #[serde(rename = "for")]
    #[sqlx(rename = "for_tag")]
    pub purpose: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct TimelineEntry {
    pub yearmo: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Tool {
    pub id: i64,
    pub tool: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub img: String,
    pub href: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTool {
    pub project_id: i64,
    pub tool_id: i64,
}

/// A project as served by `/api/projects`: its row plus the names of its tools.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectWithTools {
    #[serde(flatten)]
    pub project: Project,
    pub tools: Vec<String>,
}
