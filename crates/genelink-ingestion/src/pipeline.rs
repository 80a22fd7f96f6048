//! End-to-end extraction pipeline.
//!
//! Orchestrates one run for a single article:
//!   1. Parse the identifier and fetch the article body text
//!   2. Extract gene mentions
//!   3. Run disease NER
//!   4. Drop generic and unconfirmed disease terms
//!   5. Link diseases to genes by sentence proximity
//!   6. Enrich every linked gene with HGNC / NCBI / Ensembl metadata
//!
//! Each stage sits behind a trait so the whole flow runs offline in tests.
//! Stages are awaited strictly one after another.

use std::time::Instant;
use genelink_common::{join_list, Associations, DiseaseSpan, GeneInfo, GeneMention, GenelinkError, Result};
use genelink_kg::link_diseases;
use genelink_ner::{is_generic, DiseaseRecognizer, Sentences, TermValidator};
use serde::Serialize;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::genes::extract_genes;
use crate::identifier::ArticleId;
use crate::metadata::GeneMetadataSource;
use crate::sources::ArticleSource;

// ── Outcome ──────────────────────────────────────────────────────────────────

/// What a run produced.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// The article mentions no gene symbols.
    NoGenes,
    /// Genes were found but none ended up with a disease and metadata.
    NoAssociations,
    /// Enriched genes in extraction order.
    Genes(Vec<GeneInfo>),
}

impl PipelineOutcome {
    pub fn genes(&self) -> &[GeneInfo] {
        match self {
            PipelineOutcome::Genes(genes) => genes,
            _ => &[],
        }
    }
}

// ── Report ───────────────────────────────────────────────────────────────────

/// Per-run counts, logged at the end of a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub article: String,
    pub recognizer: String,
    pub text_bytes: usize,
    pub genes_found: usize,
    pub disease_spans: usize,
    pub accepted: usize,
    pub generic_rejected: usize,
    pub invalid_rejected: usize,
    pub linked: usize,
    pub dropped: usize,
    pub enriched: usize,
    pub skipped: usize,
    pub duration_ms: u64,
}

/// Disease spans that survived the term filter, plus rejection counts.
#[derive(Debug, Default)]
struct Screened {
    accepted: Vec<DiseaseSpan>,
    generic: usize,
    invalid: usize,
}

// ── Pipeline ─────────────────────────────────────────────────────────────────

pub struct Pipeline {
    source: Box<dyn ArticleSource>,
    recognizer: Box<dyn DiseaseRecognizer>,
    validator: Box<dyn TermValidator>,
    metadata: Box<dyn GeneMetadataSource>,
}

impl Pipeline {
    pub fn new(
        source: Box<dyn ArticleSource>,
        recognizer: Box<dyn DiseaseRecognizer>,
        validator: Box<dyn TermValidator>,
        metadata: Box<dyn GeneMetadataSource>,
    ) -> Self {
        Self { source, recognizer, validator, metadata }
    }

    /// Fetch the article named by `identifier` and process it.
    #[instrument(skip(self))]
    pub async fn run(&self, identifier: &str) -> Result<(PipelineOutcome, PipelineReport)> {
        let id = ArticleId::parse(identifier)?;
        info!(article = %id, "Fetching article text");
        let text = self.source.fetch_body_text(&id).await?;
        self.run_text(&id.to_string(), &text).await
    }

    /// Process already-fetched body text. `article` only labels the report.
    pub async fn run_text(&self, article: &str, text: &str) -> Result<(PipelineOutcome, PipelineReport)> {
        let t0 = Instant::now();
        let mut report = PipelineReport {
            run_id: Uuid::new_v4(),
            article: article.to_string(),
            recognizer: self.recognizer.name().to_string(),
            text_bytes: text.len(),
            ..Default::default()
        };
        info!(run_id = %report.run_id, article, text_bytes = text.len(), "Starting extraction");

        info!("Extracting gene mentions");
        let genes = extract_genes(text);
        report.genes_found = genes.len();
        if genes.is_empty() {
            info!("No gene symbols found in the article");
            return Ok(finish(PipelineOutcome::NoGenes, report, t0));
        }
        debug!(symbols = ?genes.iter().map(|g| g.symbol.as_str()).collect::<Vec<_>>(), "Genes found");

        info!(recognizer = %report.recognizer, "Running disease NER");
        let spans = self
            .recognizer
            .recognize(text)
            .await
            .map_err(|e| GenelinkError::Pipeline(format!("Disease NER failed ({}): {}", self.recognizer.name(), e)))?;
        report.disease_spans = spans.len();

        let screened = self.screen(spans).await;
        report.accepted = screened.accepted.len();
        report.generic_rejected = screened.generic;
        report.invalid_rejected = screened.invalid;

        let sentences = Sentences::split(text);
        info!(accepted = report.accepted, sentences = sentences.len(), "Linking diseases to genes");
        let (associations, links) = link_diseases(&genes, &sentences, &screened.accepted);
        report.linked = links.linked();
        report.dropped = links.dropped + links.outside_sentences;

        let rows = self.enrich(&genes, &associations, &mut report).await;
        let outcome = if rows.is_empty() {
            info!("No gene-disease associations found in the article");
            PipelineOutcome::NoAssociations
        } else {
            PipelineOutcome::Genes(rows)
        };
        Ok(finish(outcome, report, t0))
    }

    /// Apply the generic-term heuristic, then the validator, to each span.
    async fn screen(&self, spans: Vec<DiseaseSpan>) -> Screened {
        let mut screened = Screened::default();
        for span in spans {
            let name = span.name();
            if name.is_empty() || is_generic(name) {
                debug!(term = %span.text, "generic disease term");
                screened.generic += 1;
                continue;
            }
            if !self.validator.is_valid(name).await {
                debug!(term = name, "disease term not confirmed");
                screened.invalid += 1;
                continue;
            }
            screened.accepted.push(span);
        }
        screened
    }

    /// Metadata for every gene with at least one disease, in extraction order.
    async fn enrich(
        &self,
        genes: &[GeneMention],
        associations: &Associations,
        report: &mut PipelineReport,
    ) -> Vec<GeneInfo> {
        let mut rows = Vec::new();
        for gene in genes {
            let Some(diseases) = associations.diseases_for(&gene.symbol) else {
                continue;
            };
            info!(symbol = %gene.symbol, diseases = diseases.len(), "Fetching gene metadata");
            match self.metadata.gene_metadata(&gene.symbol, gene.hgnc_id).await {
                Some(meta) => {
                    report.enriched += 1;
                    rows.push(GeneInfo {
                        hgnc_id: meta.hgnc_id,
                        gene_symbol: meta.symbol,
                        gene_name: meta.name,
                        gene_aliases: join_list(&meta.aliases),
                        coord_hg38: meta.coord_hg38,
                        coord_hg19: meta.coord_hg19,
                        disease: join_list(diseases),
                    });
                }
                None => {
                    info!(symbol = %gene.symbol, "Gene not found in HGNC, skipping");
                    report.skipped += 1;
                }
            }
        }
        rows
    }
}

fn finish(outcome: PipelineOutcome, mut report: PipelineReport, t0: Instant) -> (PipelineOutcome, PipelineReport) {
    report.duration_ms = t0.elapsed().as_millis() as u64;
    info!(
        run_id = %report.run_id,
        genes_found = report.genes_found,
        disease_spans = report.disease_spans,
        accepted = report.accepted,
        linked = report.linked,
        enriched = report.enriched,
        duration_ms = report.duration_ms,
        "Extraction complete"
    );
    (outcome, report)
}
