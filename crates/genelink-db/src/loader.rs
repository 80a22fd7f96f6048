//! Load a gene result CSV into the database.
//!
//! All rows go in one transaction. Reloading a gene replaces its `Gene` row
//! and all of its aliases and diseases.

use std::path::Path;
use genelink_common::{split_list, GeneInfo};
use sqlx::{Sqlite, Transaction};
use tracing::{debug, info, instrument, warn};

use crate::database::Database;
use crate::error::{DbError, Result};

/// Rows written by one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub genes: usize,
    pub aliases: usize,
    pub diseases: usize,
}

/// Numeric part of an `HGNC:<n>` id. A bare number is accepted as well.
pub fn parse_hgnc_number(hgnc_id: &str) -> Result<i64> {
    let trimmed = hgnc_id.trim();
    trimmed
        .strip_prefix("HGNC:")
        .unwrap_or(trimmed)
        .parse()
        .map_err(|_| DbError::InvalidHgncId(hgnc_id.to_string()))
}

fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

/// Read every record of a result CSV.
pub fn read_gene_csv(path: &Path) -> Result<Vec<GeneInfo>> {
    if !path.exists() {
        return Err(DbError::InputNotFound(path.to_path_buf()));
    }
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader.deserialize().collect::<std::result::Result<Vec<GeneInfo>, _>>()?;
    debug!(rows = rows.len(), "Read gene CSV");
    Ok(rows)
}

/// Load `csv_path` into `db`. The schema must already exist.
#[instrument(skip(db))]
pub async fn load_csv(db: &Database, csv_path: &Path) -> Result<LoadSummary> {
    let rows = read_gene_csv(csv_path)?;
    load_rows(db, &rows).await
}

/// Write already-parsed rows into `db` in a single transaction.
pub async fn load_rows(db: &Database, rows: &[GeneInfo]) -> Result<LoadSummary> {
    let mut tx = db.pool().begin().await?;
    match insert_rows(&mut tx, rows).await {
        Ok(summary) => {
            tx.commit().await?;
            info!(
                genes = summary.genes,
                aliases = summary.aliases,
                diseases = summary.diseases,
                "Loaded gene CSV"
            );
            Ok(summary)
        }
        Err(e) => {
            warn!(error = %e, "Load failed, rolling back");
            if let Err(rollback) = tx.rollback().await {
                warn!(error = %rollback, "Rollback failed");
            }
            Err(e)
        }
    }
}

async fn insert_rows(tx: &mut Transaction<'_, Sqlite>, rows: &[GeneInfo]) -> Result<LoadSummary> {
    let mut summary = LoadSummary::default();

    for row in rows {
        let hgnc_id = parse_hgnc_number(&row.hgnc_id)?;

        sqlx::query(
            "INSERT OR REPLACE INTO Gene (hgnc_id, symbol, name, coord_hg38, coord_hg19) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(hgnc_id)
        .bind(&row.gene_symbol)
        .bind(non_empty(&row.gene_name))
        .bind(non_empty(&row.coord_hg38))
        .bind(non_empty(&row.coord_hg19))
        .execute(&mut **tx)
        .await?;

        sqlx::query("DELETE FROM Alias WHERE hgnc_id = ?")
            .bind(hgnc_id)
            .execute(&mut **tx)
            .await?;
        sqlx::query("DELETE FROM Disease WHERE hgnc_id = ?")
            .bind(hgnc_id)
            .execute(&mut **tx)
            .await?;

        for alias in split_list(&row.gene_aliases) {
            sqlx::query("INSERT INTO Alias (hgnc_id, alias) VALUES (?, ?)")
                .bind(hgnc_id)
                .bind(alias)
                .execute(&mut **tx)
                .await?;
            summary.aliases += 1;
        }

        for disease in split_list(&row.disease) {
            sqlx::query("INSERT INTO Disease (hgnc_id, disease_name) VALUES (?, ?)")
                .bind(hgnc_id)
                .bind(disease)
                .execute(&mut **tx)
                .await?;
            summary.diseases += 1;
        }

        summary.genes += 1;
    }

    Ok(summary)
}
