//! genelink-common: Shared types, errors, and the sandboxed HTTP client used
//! across all genelink crates.

pub mod error;
pub mod entities;
pub mod sandbox;

// Re-export commonly used types
pub use entities::{join_list, split_list, Associations, DiseaseSpan, GeneInfo, GeneMention, Span, GENE_INFO_HEADERS};
pub use error::{GenelinkError, Result};
