//! genelink-ingestion: article retrieval and gene-disease extraction pipeline.
//! - Identifier parsing and PMID → PMCID resolution (Europe PMC)
//! - Full-text XML download and `<body>` text extraction
//! - Regex gene mention extraction
//! - Gene metadata enrichment (HGNC, NCBI, Ensembl)
//! - CSV output
//! - End-to-end pipeline orchestration

pub mod body;
pub mod genes;
pub mod identifier;
pub mod metadata;
pub mod output;
pub mod pipeline;
pub mod sources;

pub use identifier::ArticleId;
pub use pipeline::{Pipeline, PipelineOutcome, PipelineReport};
