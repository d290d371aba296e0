use sqlx::{migrate::MigrateDatabase, query, sqlite::SqlitePoolOptions, Sqlite, SqlitePool};
use tracing::{debug, info};

/// Creates the tables if they don't exist.
pub async fn setup_database(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    query(
        "CREATE TABLE IF NOT EXISTS preferences (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Opens (creating if needed) the preferences database at `database_url`
/// and sets up its schema.
pub async fn create_database_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    if let Some(parent) = database_path(database_url).and_then(|path| {
        std::path::Path::new(path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(std::path::Path::to_path_buf)
    }) {
        if !parent.exists() {
            debug!(dir = %parent.display(), "creating database directory");
            std::fs::create_dir_all(&parent)?;
        }
    }

    if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        info!(%database_url, "creating preferences database");
        Sqlite::create_database(database_url).await?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .after_connect(|conn, _| {
            Box::pin(async move {
                use sqlx::Executor as _;
                conn.execute("PRAGMA journal_mode = WAL;").await?;
                conn.execute("PRAGMA synchronous = NORMAL;").await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await?;

    setup_database(&pool).await?;
    debug!(%database_url, "preferences database ready");
    Ok(pool)
}

/// Filesystem path inside a `sqlite://` URL, without query parameters.
fn database_path(url: &str) -> Option<&str> {
    let rest = url.strip_prefix("sqlite://")?;
    let rest = rest.split('?').next().unwrap_or(rest);
    if rest.is_empty() || rest.starts_with(":memory:") {
        return None;
    }
    Some(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_path_from_url() {
        assert_eq!(database_path("sqlite://tour_map.db"), Some("tour_map.db"));
        assert_eq!(database_path("sqlite:///var/lib/prefs.db"), Some("/var/lib/prefs.db"));
        assert_eq!(database_path("sqlite://state/a.db?mode=rwc"), Some("state/a.db"));
        assert_eq!(database_path("sqlite::memory:"), None);
    }

    #[tokio::test]
    async fn creates_file_and_schema() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let db_path = dir.path().join("nested/prefs.db");
        let url = format!("sqlite://{}", db_path.display());

        let pool = create_database_pool(&url).await?;
        assert!(db_path.exists());

        let tables: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'preferences'")
                .fetch_all(&pool)
                .await?;
        assert_eq!(tables.len(), 1);

        // Running the schema twice is harmless.
        setup_database(&pool).await?;
        Ok(())
    }
}
