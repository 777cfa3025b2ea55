use crate::crypto::SecretStore;
use crate::db::models::{ImageAsset, Project, ProjectTool, SecretRecord, TimelineEntry, Tool};
use crate::db::schema::SQLITE_INIT;
use crate::error::PortfolioError;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use tracing::info;

pub type SqlitePool = Pool<Sqlite>;

/// Read surface over the content collections. Clones share one pool.
#[derive(Clone)]
pub struct ContentStore {
    pool: SqlitePool,
}

impl ContentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database and bootstrap the collections.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, PortfolioError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;
        let store = Self::new(pool);
        store.init_schema().await?;
        info!(database_url = %database_url, "content store ready");
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), PortfolioError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn images_by_tag(&self, tag: &str) -> Result<Vec<ImageAsset>, PortfolioError> {
        let rows = sqlx::query_as::<_, ImageAsset>(
            "SELECT href, alt, for_tag FROM images WHERE for_tag = ? ORDER BY rowid",
        )
        .bind(tag)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Images carrying any of `tags`, in insertion order.
    pub async fn images_by_tags(&self, tags: &[&str]) -> Result<Vec<ImageAsset>, PortfolioError> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; tags.len()].join(", ");
        let sql = format!(
            "SELECT href, alt, for_tag FROM images WHERE for_tag IN ({placeholders}) ORDER BY rowid"
        );
        let mut query = sqlx::query_as::<_, ImageAsset>(&sql);
        for tag in tags {
            query = query.bind(*tag);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    pub async fn timeline(&self) -> Result<Vec<TimelineEntry>, PortfolioError> {
        let rows = sqlx::query_as::<_, TimelineEntry>(
            "SELECT yearmo, title, description FROM timeline ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn tools(&self) -> Result<Vec<Tool>, PortfolioError> {
        let rows = sqlx::query_as::<_, Tool>("SELECT id, tool, category FROM tools ORDER BY rowid")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn projects(&self) -> Result<Vec<Project>, PortfolioError> {
        let rows = sqlx::query_as::<_, Project>(
            "SELECT id, title, body, img, href FROM projects ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Association rows in insertion order; this order decides tool order per project.
    pub async fn project_tools(&self) -> Result<Vec<ProjectTool>, PortfolioError> {
        let rows = sqlx::query_as::<_, ProjectTool>(
            "SELECT project_id, tool_id FROM project_tools ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Write a new secret record. Records are immutable: an existing name is an error.
    pub async fn insert_secret(&self, record: &SecretRecord) -> Result<(), PortfolioError> {
        sqlx::query("INSERT INTO keys (for_name, key) VALUES (?, ?)")
            .bind(&record.name)
            .bind(&record.ciphertext)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl SecretStore for ContentStore {
    async fn get_secret(&self, name: &str) -> Result<Option<String>, PortfolioError> {
        let row = sqlx::query_as::<_, SecretRecord>(
            "SELECT for_name, key FROM keys WHERE for_name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| r.ciphertext))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    /// Fresh store backed by a throwaway SQLite file.
    pub(crate) async fn temp_store() -> ContentStore {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!(
            "portfolio-unit-{}-{}.sqlite",
            std::process::id(),
            nanos
        ));
        ContentStore::connect(&format!("sqlite:{}", path.display()), 1)
            .await
            .expect("open temp store")
    }

    #[tokio::test]
    async fn empty_collections_read_as_empty() {
        let store = temp_store().await;
        assert!(store.images_by_tag("profile").await.unwrap().is_empty());
        assert!(store.timeline().await.unwrap().is_empty());
        assert!(store.tools().await.unwrap().is_empty());
        assert!(store.projects().await.unwrap().is_empty());
        assert!(store.get_secret("ClientID").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn images_filter_by_tag_in_insertion_order() {
        let store = temp_store().await;
        for (href, tag) in [
            ("/cv.pdf", "resume"),
            ("/me.png", "profile"),
            ("/letter.pdf", "coverletter"),
            ("/me2.png", "profile"),
        ] {
            sqlx::query("INSERT INTO images (href, alt, for_tag) VALUES (?, 'alt', ?)")
                .bind(href)
                .bind(tag)
                .execute(store.pool())
                .await
                .unwrap();
        }

        let profile = store.images_by_tag("profile").await.unwrap();
        let hrefs: Vec<_> = profile.iter().map(|i| i.href.as_str()).collect();
        assert_eq!(hrefs, ["/me.png", "/me2.png"]);

        let docs = store
            .images_by_tags(&["resume", "coverletter"])
            .await
            .unwrap();
        let hrefs: Vec<_> = docs.iter().map(|i| i.href.as_str()).collect();
        assert_eq!(hrefs, ["/cv.pdf", "/letter.pdf"]);
        assert!(store.images_by_tags(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn tools_and_projects_follow_insertion_not_id() {
        let store = temp_store().await;
        sqlx::query("INSERT INTO tools (id, tool) VALUES (7, 'Zig'), (2, 'Axum')")
            .execute(store.pool())
            .await
            .unwrap();
        sqlx::query("INSERT INTO projects (id, title) VALUES (30, 'Newest'), (10, 'Oldest')")
            .execute(store.pool())
            .await
            .unwrap();

        let tool_ids: Vec<_> = store.tools().await.unwrap().iter().map(|t| t.id).collect();
        assert_eq!(tool_ids, [7, 2]);
        let project_ids: Vec<_> = store.projects().await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(project_ids, [30, 10]);

        let duplicate = sqlx::query("INSERT INTO tools (id, tool) VALUES (7, 'Again')")
            .execute(store.pool())
            .await;
        assert!(duplicate.is_err());
    }

    #[tokio::test]
    async fn secrets_are_write_once() {
        let store = temp_store().await;
        let record = SecretRecord {
            name: "APIKey".to_string(),
            ciphertext: "00ff".to_string(),
        };
        store.insert_secret(&record).await.unwrap();
        assert!(store.insert_secret(&record).await.is_err());
        assert_eq!(
            store.get_secret("APIKey").await.unwrap().as_deref(),
            Some("00ff")
        );
    }
}
