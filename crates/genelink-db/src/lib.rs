//! SQLite storage for gene-disease result tables.
//!
//! A result CSV is denormalised into three tables:
//! - `Gene`: one row per HGNC id
//! - `Alias`: gene aliases
//! - `Disease`: linked disease names
//!
//! ```rust,no_run
//! use genelink_db::{load_csv, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::open("genes.db").await?;
//!     db.initialize().await?;
//!     let summary = load_csv(&db, "genes.csv".as_ref()).await?;
//!     println!("{} genes loaded", summary.genes);
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
pub mod loader;
pub mod schema;

pub use database::{Database, TableCounts};
pub use error::{DbError, Result};
pub use loader::{load_csv, load_rows, parse_hgnc_number, read_gene_csv, LoadSummary};
pub use schema::StoredGene;
