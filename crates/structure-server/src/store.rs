//! Server-side persistence for shared trees using `SQLite` via `SQLx`.
//!
//! Metadata lives in the `share` table; each share's text is stored as an
//! individually addressable blob named `<id>.txt` under the shares
//! directory. HTTP route wiring and page rendering sit above this layer and
//! consume the operations exposed here.

use std::io;
use std::path::{Path, PathBuf};

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

/// Default database filename.
pub const DB_FILE: &str = "shares.db";

/// Default subdirectory holding share content blobs.
pub const SHARES_DIR: &str = "shares";

/// Maximum number of pooled `SQLite` connections.
///
/// A value greater than `1` lets lookups from independent clients proceed
/// without serializing on a single connection.
pub const DB_POOL_MAX_CONNECTIONS: u32 = 10;

/// Reserved id that serves a fixed sample share without touching the store.
pub const DEMO_SHARE_ID: &str = "demo";

/// Project name attached to the demo share.
const DEMO_PROJECT_NAME: &str = "Demo";

/// Fixed sample tree served for the demo id.
const DEMO_CONTENT: &str = r"sample-project/
├── src/
│   ├── components/
│   │   ├── Header.js
│   │   ├── Footer.js
│   │   └── Sidebar.js
│   ├── utils/
│   │   └── helpers.js
│   └── App.js
├── public/
│   ├── index.html
│   └── favicon.ico
├── tests/
│   └── App.test.js
├── package.json
├── README.md
└── .gitignore";

/// A stored share as returned to rendering adapters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Share {
    /// Plain-text tree content.
    pub content: String,
    /// Project name supplied at creation time.
    pub project_name: String,
}

/// Metadata store plus blob directory for shared trees.
#[derive(Clone)]
pub struct ShareStore {
    pool: SqlitePool,
    shares_dir: PathBuf,
}

impl ShareStore {
    /// Opens the share database, runs embedded migrations, and ensures the
    /// blob directory exists.
    ///
    /// # Errors
    /// Returns an error if directories cannot be created, the database
    /// cannot be opened, or migrations fail.
    pub async fn open(db_path: &Path, shares_dir: &Path) -> Result<Self, String> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| format!("Failed to create database directory: {err}"))?;
        }
        std::fs::create_dir_all(shares_dir)
            .map_err(|err| format!("Failed to create shares directory: {err}"))?;

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(DB_POOL_MAX_CONNECTIONS)
            .connect_with(options)
            .await
            .map_err(|err| format!("Failed to connect to database: {err}"))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|err| format!("Failed to run migrations: {err}"))?;

        Ok(Self { pool, shares_dir: shares_dir.to_path_buf() })
    }

    /// Persists new share content and returns its freshly generated id.
    ///
    /// Empty content is rejected before any storage mutation. Ids are
    /// random UUIDv4 values in hyphenated form; the collision probability is
    /// negligible and no uniqueness retry is performed.
    ///
    /// # Errors
    /// Returns an error if the content is empty, the blob cannot be written,
    /// or the metadata row cannot be inserted.
    pub async fn create(&self, content: &str, project_name: &str) -> Result<String, String> {
        if content.is_empty() {
            return Err("No content supplied".to_string());
        }

        let id = Uuid::new_v4().to_string();
        let file_path = self.shares_dir.join(format!("{id}.txt"));
        tokio::fs::write(&file_path, content)
            .await
            .map_err(|err| format!("Failed to write share content: {err}"))?;

        sqlx::query(
            r"
INSERT INTO share (id, project_name, created_at, file_path, view_count)
VALUES (?, ?, unixepoch(), ?, 0)
",
        )
        .bind(&id)
        .bind(project_name)
        .bind(file_path.to_string_lossy().into_owned())
        .execute(&self.pool)
        .await
        .map_err(|err| format!("Failed to insert share: {err}"))?;

        debug!(id = %id, project = %project_name, "created share");
        Ok(id)
    }

    /// Looks up a share by id and counts the view.
    ///
    /// The demo id bypasses persistence entirely. A successful metadata
    /// lookup bumps the view counter with a single atomic update, so
    /// concurrent lookups never lose increments. Unknown ids, malformed ids,
    /// and missing blobs all read uniformly as not found.
    ///
    /// # Errors
    /// Returns an error if the metadata query, the counter update, or an
    /// unexpected blob read failure occurs.
    pub async fn get(&self, id: &str) -> Result<Option<Share>, String> {
        if id == DEMO_SHARE_ID {
            return Ok(Some(demo_share()));
        }
        if !is_valid_id(id) {
            return Ok(None);
        }

        let row = sqlx::query(
            r"
SELECT project_name,
       file_path
FROM share
WHERE id = ?
",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| format!("Failed to get share: {err}"))?;

        let Some(row) = row else {
            return Ok(None);
        };

        sqlx::query(
            r"
UPDATE share
SET view_count = view_count + 1
WHERE id = ?
",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|err| format!("Failed to update view count: {err}"))?;

        let file_path: String = row.get("file_path");
        match read_blob(&file_path).await? {
            Some(content) => Ok(Some(Share { content, project_name: row.get("project_name") })),
            None => Ok(None),
        }
    }

    /// Returns the raw share text without counting a view.
    ///
    /// Same demo bypass and id validation as [`ShareStore::get`].
    ///
    /// # Errors
    /// Returns an error if the metadata query or an unexpected blob read
    /// failure occurs.
    pub async fn get_raw(&self, id: &str) -> Result<Option<String>, String> {
        if id == DEMO_SHARE_ID {
            return Ok(Some(DEMO_CONTENT.to_string()));
        }
        if !is_valid_id(id) {
            return Ok(None);
        }

        let row = sqlx::query(
            r"
SELECT file_path
FROM share
WHERE id = ?
",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| format!("Failed to get share: {err}"))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let file_path: String = row.get("file_path");
        read_blob(&file_path).await
    }

    /// Returns the view counter for a stored share id.
    ///
    /// # Errors
    /// Returns an error if the metadata query fails.
    pub async fn view_count(&self, id: &str) -> Result<Option<i64>, String> {
        if !is_valid_id(id) {
            return Ok(None);
        }

        let row = sqlx::query(
            r"
SELECT view_count
FROM share
WHERE id = ?
",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| format!("Failed to get view count: {err}"))?;

        Ok(row.map(|row| row.get("view_count")))
    }
}

/// Reads a share blob, mapping a missing file to "not found".
async fn read_blob(file_path: &str) -> Result<Option<String>, String> {
    match tokio::fs::read_to_string(file_path).await {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(format!("Failed to read share content: {err}")),
    }
}

/// Restricts ids to alphanumeric and hyphen characters before they address
/// storage, closing path-traversal lookups.
fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
}

/// Builds the fixed demo share.
fn demo_share() -> Share {
    Share {
        content: DEMO_CONTENT.to_string(),
        project_name: DEMO_PROJECT_NAME.to_string(),
    }
}

#[cfg(test)]
impl ShareStore {
    /// Opens an in-memory `SQLite` database for tests and runs migrations.
    ///
    /// # Errors
    /// Returns an error if the database connection or migrations fail.
    pub async fn open_in_memory(shares_dir: &Path) -> Result<Self, String> {
        std::fs::create_dir_all(shares_dir)
            .map_err(|err| format!("Failed to create shares directory: {err}"))?;

        let options = SqliteConnectOptions::new()
            .filename(":memory:")
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|err| format!("Failed to connect to in-memory database: {err}"))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|err| format!("Failed to run migrations: {err}"))?;

        Ok(Self { pool, shares_dir: shares_dir.to_path_buf() })
    }
}
