//! Gene metadata enrichment from HGNC, NCBI Gene and Ensembl.
//!
//! Every lookup is best effort: a failed request leaves the corresponding
//! field empty. Only a missing HGNC record drops the gene.

pub mod ensembl;
pub mod hgnc;
pub mod ncbi;

use std::collections::BTreeSet;
use async_trait::async_trait;
use genelink_common::sandbox::SandboxClient;
use tracing::{debug, instrument};

use ensembl::{Assembly, EnsemblClient};
use hgnc::{HgncClient, HgncRecord};
use ncbi::NcbiGeneClient;

/// Metadata for one gene, before diseases are attached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneMetadata {
    /// "HGNC:<n>" as reported by HGNC
    pub hgnc_id: String,
    /// Upper-cased symbol as found in the article
    pub symbol: String,
    pub name: String,
    /// Sorted, unique, never equal to the symbol
    pub aliases: Vec<String>,
    pub coord_hg38: String,
    pub coord_hg19: String,
}

/// Source of gene metadata. `None` means the gene is unknown and is skipped.
#[async_trait]
pub trait GeneMetadataSource: Send + Sync {
    async fn gene_metadata(&self, symbol: &str, hgnc_id: Option<u32>) -> Option<GeneMetadata>;
}

/// Union of HGNC alias fields and NCBI aliases, minus anything equal to
/// `symbol` (case-insensitive, trimmed).
pub fn collect_aliases(record: &HgncRecord, ncbi_aliases: &[String], symbol: &str) -> Vec<String> {
    let symbol = symbol.trim().to_uppercase();
    record
        .alias_values()
        .chain(ncbi_aliases.iter().map(String::as_str))
        .filter(|alias| alias.trim().to_uppercase() != symbol)
        .map(String::from)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Combines the HGNC, NCBI and Ensembl clients.
pub struct MetadataEnricher {
    hgnc: HgncClient,
    ncbi: NcbiGeneClient,
    ensembl: EnsemblClient,
}

impl MetadataEnricher {
    pub fn new(hgnc: HgncClient, ncbi: NcbiGeneClient, ensembl: EnsemblClient) -> Self {
        Self { hgnc, ncbi, ensembl }
    }

    /// Enricher against the public endpoints with default timeouts.
    pub fn with_client(client: SandboxClient) -> Self {
        Self::new(
            HgncClient::new(client.clone()),
            NcbiGeneClient::new(client.clone()),
            EnsemblClient::new(client),
        )
    }

    async fn coordinates(&self, record: &HgncRecord, symbol: &str) -> (String, String) {
        let (mut hg38, mut hg19) = (String::new(), String::new());
        if let Some(ensembl_id) = record.ensembl_gene_id() {
            hg38 = self.ensembl.coordinates_by_id(ensembl_id, Assembly::Hg38).await;
            hg19 = self.ensembl.coordinates_by_id(ensembl_id, Assembly::Hg19).await;
        }
        if hg38.is_empty() && hg19.is_empty() {
            debug!(symbol, "falling back to Ensembl symbol lookup");
            hg38 = self.ensembl.coordinates_by_symbol(symbol, Assembly::Hg38).await;
            hg19 = self.ensembl.coordinates_by_symbol(symbol, Assembly::Hg19).await;
        }
        (hg38, hg19)
    }
}

#[async_trait]
impl GeneMetadataSource for MetadataEnricher {
    #[instrument(skip(self))]
    async fn gene_metadata(&self, symbol: &str, hgnc_id: Option<u32>) -> Option<GeneMetadata> {
        let symbol = symbol.to_uppercase();

        let record = match self.hgnc.fetch_by_symbol(&symbol).await {
            Some(record) => record,
            None => match hgnc_id {
                Some(id) => self.hgnc.fetch_by_id(id).await?,
                None => return None,
            },
        };

        let ncbi_aliases = match record.entrez_id() {
            Some(entrez_id) => self.ncbi.aliases(&entrez_id).await,
            None => Vec::new(),
        };
        let aliases = collect_aliases(&record, &ncbi_aliases, &symbol);
        let (coord_hg38, coord_hg19) = self.coordinates(&record, &symbol).await;

        Some(GeneMetadata {
            hgnc_id: record.hgnc_id,
            symbol,
            name: record.name,
            aliases,
            coord_hg38,
            coord_hg19,
        })
    }
}
