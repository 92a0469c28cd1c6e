use crate::config::Config;
use crate::model::Bookmark;
use anyhow::Result;
use libsql::{Builder, Connection, Database as LibsqlDatabase};
use std::path::Path;
use std::time::Duration;

const SYSTEM_MIGRATIONS: &[(&str, &str)] = &[(
    "system/000_migrations_table.sql",
    include_str!("migrations/system/000_migrations_table.sql"),
)];

pub struct Database {
    _db: LibsqlDatabase,
    conn: Connection,
}

impl Database {
    async fn is_migration_applied(conn: &Connection, name: &str) -> Result<bool> {
        let query = "SELECT 1 FROM _migrations WHERE name = ?";
        match conn.query(query, libsql::params![name]).await {
            Ok(mut rows) => Ok(rows.next().await?.is_some()),
            Err(e) => {
                if e.to_string().contains("no such table") {
                    Ok(false)
                } else {
                    Err(e.into())
                }
            }
        }
    }

    async fn record_migration(conn: &Connection, name: &str) -> Result<()> {
        let query = r#"
            INSERT INTO _migrations (name, applied_at)
            VALUES (?, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        "#;
        conn.execute(query, libsql::params![name]).await?;
        Ok(())
    }

    async fn run_migration(conn: &Connection, name: &str, sql: &str) -> Result<()> {
        if Self::is_migration_applied(conn, name).await? {
            tracing::debug!("migration {} already applied, skipping", name);
            return Ok(());
        }

        tracing::info!("applying migration: {}", name);
        conn.execute_batch(sql)
            .await
            .map_err(|e| anyhow::anyhow!("failed to execute migration {name}: {e}"))?;

        Self::record_migration(conn, name).await?;
        Ok(())
    }

    async fn run_all_migrations(conn: &Connection) -> Result<()> {
        for (filename, sql) in SYSTEM_MIGRATIONS {
            Self::run_migration(conn, filename, sql).await?;
        }

        for (filename, sql) in crate::bookmarks::migrations() {
            Self::run_migration(conn, filename, sql).await?;
        }

        Ok(())
    }

    pub async fn new(cfg: &Config, data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(cfg.app.get_db());

        let db = match (&cfg.app.turso_url, &cfg.app.turso_auth_token) {
            (Some(url), Some(token)) => {
                tracing::info!("[db] running in synced database mode (offline writes)");
                let sync_interval = Duration::from_secs(cfg.app.sync_interval_seconds);
                Builder::new_synced_database(&path, url.clone(), token.clone())
                    .sync_interval(sync_interval)
                    .build()
                    .await?
            }
            _ => Builder::new_local(&path).build().await?,
        };

        let conn = db.connect()?;
        conn.query("SELECT 1", ()).await?;

        Self::run_all_migrations(&conn).await?;

        Ok(Database { _db: db, conn })
    }

    /// In-memory database with the full schema, used by the test suites.
    pub async fn open_in_memory() -> Result<Self> {
        let db = Builder::new_local(":memory:").build().await?;
        let conn = db.connect()?;

        Self::run_all_migrations(&conn).await?;

        Ok(Database { _db: db, conn })
    }

    fn row_to_bookmark(row: &libsql::Row) -> Result<Bookmark> {
        let metadata_json: String = row.get::<Option<String>>(4)?.unwrap_or_default();
        let metadata = serde_json::from_str(&metadata_json).unwrap_or_default();

        Ok(Bookmark {
            id: Some(row.get(0)?),
            url: row.get(1)?,
            title: row.get::<Option<String>>(2)?,
            author: row.get::<Option<String>>(3)?,
            metadata,
            created_at: row.get::<Option<String>>(5)?,
        })
    }

    /// Insert the bookmark, or update its mutable fields when it already has
    /// an id. `url` and `created_at` are never overwritten.
    pub async fn save_bookmark(&self, bookmark: &mut Bookmark) -> Result<()> {
        bookmark.set_created_at_if_absent();
        let metadata = serde_json::to_string(&bookmark.metadata)?;

        match bookmark.id {
            Some(id) => {
                self.conn
                    .execute(
                        "UPDATE bookmarks SET title = ?, author = ?, metadata = ? WHERE id = ?",
                        libsql::params![
                            bookmark.title.clone(),
                            bookmark.author.clone(),
                            metadata,
                            id
                        ],
                    )
                    .await?;
            }
            None => {
                let insert = r#"
                    INSERT INTO bookmarks (url, title, author, metadata, created_at)
                    VALUES (?, ?, ?, ?, ?)
                    RETURNING id
                "#;

                let mut rows = self
                    .conn
                    .query(
                        insert,
                        libsql::params![
                            bookmark.url.clone(),
                            bookmark.title.clone(),
                            bookmark.author.clone(),
                            metadata,
                            bookmark.created_at.clone()
                        ],
                    )
                    .await?;

                if let Some(row) = rows.next().await? {
                    bookmark.id = Some(row.get(0)?);
                } else {
                    anyhow::bail!("Failed to create bookmark");
                }
            }
        }

        Ok(())
    }

    pub async fn get_bookmark(&self, id: i64) -> Result<Option<Bookmark>> {
        let query = r#"
            SELECT id, url, title, author, metadata, created_at
            FROM bookmarks WHERE id = ?
        "#;

        let mut rows = self.conn.query(query, libsql::params![id]).await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_bookmark(&row)?))
        } else {
            Ok(None)
        }
    }

    pub async fn list_bookmarks(&self, limit: i32, offset: i32) -> Result<Vec<Bookmark>> {
        let query = r#"
            SELECT id, url, title, author, metadata, created_at
            FROM bookmarks
            ORDER BY id
            LIMIT ? OFFSET ?
        "#;

        let mut rows = self.conn.query(query, libsql::params![limit, offset]).await?;
        let mut bookmarks: Vec<Bookmark> = vec![];

        while let Some(row) = rows.next().await? {
            bookmarks.push(Self::row_to_bookmark(&row)?);
        }

        Ok(bookmarks)
    }

    pub async fn delete_bookmark(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM bookmarks WHERE id = ?", libsql::params![id])
            .await?;

        Ok(affected > 0)
    }
}
