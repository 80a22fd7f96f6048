//! SQLite connection and read helpers.

use std::path::{Path, PathBuf};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::Result;
use crate::schema::{StoredGene, SCHEMA};

/// Row counts of the three tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub genes: i64,
    pub aliases: i64,
    pub diseases: i64,
}

/// Main database handle.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    path: PathBuf,
}

impl Database {
    /// Open the database file at `path`, creating it if missing.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        info!(path = %path.display(), "Opened SQLite database");
        Ok(Self { pool, path })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create tables and indexes if they don't exist.
    pub async fn initialize(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        debug!("Schema ready");
        Ok(())
    }

    pub async fn gene(&self, hgnc_id: i64) -> Result<Option<StoredGene>> {
        let gene = sqlx::query_as::<_, StoredGene>(
            "SELECT hgnc_id, symbol, name, coord_hg38, coord_hg19 FROM Gene WHERE hgnc_id = ?",
        )
        .bind(hgnc_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(gene)
    }

    /// Aliases of a gene, sorted.
    pub async fn aliases(&self, hgnc_id: i64) -> Result<Vec<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT alias FROM Alias WHERE hgnc_id = ? ORDER BY alias")
                .bind(hgnc_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(alias,)| alias).collect())
    }

    /// Diseases of a gene, sorted.
    pub async fn diseases(&self, hgnc_id: i64) -> Result<Vec<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT disease_name FROM Disease WHERE hgnc_id = ? ORDER BY disease_name")
                .bind(hgnc_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    pub async fn counts(&self) -> Result<TableCounts> {
        let (genes,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM Gene").fetch_one(&self.pool).await?;
        let (aliases,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM Alias").fetch_one(&self.pool).await?;
        let (diseases,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM Disease").fetch_one(&self.pool).await?;
        Ok(TableCounts { genes, aliases, diseases })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
