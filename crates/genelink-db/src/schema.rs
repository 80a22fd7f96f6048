//! Table definitions.

/// DDL statements, run in order. Every statement is idempotent.
pub const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS Gene (
        hgnc_id     INTEGER PRIMARY KEY,
        symbol      TEXT NOT NULL,
        name        TEXT,
        coord_hg38  TEXT,
        coord_hg19  TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS Alias (
        hgnc_id  INTEGER NOT NULL,
        alias    TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS Disease (
        hgnc_id       INTEGER NOT NULL,
        disease_name  TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_alias_hgnc_id ON Alias (hgnc_id)",
    "CREATE INDEX IF NOT EXISTS idx_disease_hgnc_id ON Disease (hgnc_id)",
];

/// A row of the `Gene` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct StoredGene {
    pub hgnc_id: i64,
    pub symbol: String,
    pub name: Option<String>,
    pub coord_hg38: Option<String>,
    pub coord_hg19: Option<String>,
}
