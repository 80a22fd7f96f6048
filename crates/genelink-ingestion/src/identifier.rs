//! Article identifiers accepted on the command line.

use std::fmt;
use genelink_common::{GenelinkError, Result};

/// A PubMed or PubMed Central identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleId {
    /// Numeric PubMed id, without any `PMID` prefix.
    Pmid(String),
    /// PubMed Central id, kept as given (e.g. `PMC11127317`).
    Pmcid(String),
}

impl ArticleId {
    /// Parse `PMC…`, `PMID…` or a bare number. Prefixes are matched
    /// case-insensitively.
    pub fn parse(identifier: &str) -> Result<Self> {
        let ident = identifier.trim();
        let upper = ident.to_ascii_uppercase();

        if upper.starts_with("PMC") {
            return Ok(Self::Pmcid(ident.to_string()));
        }
        if upper.starts_with("PMID") {
            let pmid = ident[4..].trim();
            if pmid.is_empty() {
                return Err(GenelinkError::InvalidIdentifier(identifier.to_string()));
            }
            return Ok(Self::Pmid(pmid.to_string()));
        }
        if !ident.is_empty() && ident.bytes().all(|b| b.is_ascii_digit()) {
            return Ok(Self::Pmid(ident.to_string()));
        }
        Err(GenelinkError::InvalidIdentifier(identifier.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pmid(id) | Self::Pmcid(id) => id,
        }
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pmid(id) => write!(f, "PMID{}", id),
            Self::Pmcid(id) => f.write_str(id),
        }
    }
}
