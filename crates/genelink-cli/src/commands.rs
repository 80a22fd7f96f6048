//! Subcommand implementations.

use std::path::Path;
use std::time::Duration;
use anyhow::Context;
use genelink_common::sandbox::SandboxClient;
use genelink_db::{load_rows, read_gene_csv, Database};
use genelink_ingestion::metadata::ensembl::EnsemblClient;
use genelink_ingestion::metadata::hgnc::HgncClient;
use genelink_ingestion::metadata::ncbi::NcbiGeneClient;
use genelink_ingestion::metadata::MetadataEnricher;
use genelink_ingestion::output::write_csv;
use genelink_ingestion::sources::europepmc::EuropePmcClient;
use genelink_ingestion::{Pipeline, PipelineOutcome};
use genelink_ner::trie_ner::ensure_mesh_file;
use genelink_ner::{AcceptAll, DiseaseRecognizer, DiseaseValidator, RemoteNer, TermValidator, TrieNer};
use tracing::{debug, info, warn};

use crate::config::{Config, HttpConfig, NerBackend, NerConfig};

fn build_client(http: &HttpConfig) -> anyhow::Result<SandboxClient> {
    let mut client = SandboxClient::with_settings(&http.user_agent, Duration::from_secs(30))?;
    for host in &http.extra_allowed_hosts {
        client.allow_domain(host);
    }
    Ok(client)
}

async fn build_recognizer(ner: &NerConfig, client: &SandboxClient) -> anyhow::Result<Box<dyn DiseaseRecognizer>> {
    let recognizer: Box<dyn DiseaseRecognizer> = match ner.backend {
        NerBackend::Remote => Box::new(RemoteNer::new(client.clone(), ner.service_url.as_str(), ner.model.as_str())),
        NerBackend::Dictionary => {
            let mesh_path = match &ner.mesh_path {
                Some(path) => Some(path.clone()),
                None if ner.download_mesh => Some(ensure_mesh_file(client).await?),
                None => None,
            };
            let trie = match mesh_path {
                Some(path) => TrieNer::with_mesh_file(&path)
                    .with_context(|| format!("loading MeSH descriptors from {}", path.display()))?,
                None => TrieNer::with_embedded_vocabulary()?,
            };
            info!("Dictionary NER ready: {} patterns", trie.stats().total_patterns);
            Box::new(trie)
        }
    };
    Ok(recognizer)
}

fn build_validator(config: &Config, client: &SandboxClient) -> Box<dyn TermValidator> {
    if config.validation.enabled {
        Box::new(
            DiseaseValidator::new(client.clone())
                .with_api_key(config.ncbi.api_key.clone())
                .with_timeout(config.http.validation_timeout()),
        )
    } else {
        warn!("Disease validation disabled; every non-generic term is accepted");
        Box::new(AcceptAll)
    }
}

/// `genelink extract`: run the pipeline for one article and write the CSV.
pub async fn extract(config: &Config, input: &str, output: &Path) -> anyhow::Result<()> {
    let client = build_client(&config.http)?;

    let source = EuropePmcClient::new(client.clone()).with_timeout(config.http.article_timeout());
    let recognizer = build_recognizer(&config.ner, &client).await?;
    let validator = build_validator(config, &client);
    let metadata = MetadataEnricher::new(
        HgncClient::new(client.clone()).with_timeout(config.http.metadata_timeout()),
        NcbiGeneClient::new(client.clone())
            .with_api_key(config.ncbi.api_key.clone())
            .with_timeout(config.http.metadata_timeout()),
        EnsemblClient::new(client).with_timeout(config.http.ensembl_timeout()),
    );

    let pipeline = Pipeline::new(Box::new(source), recognizer, validator, Box::new(metadata));
    let (outcome, report) = pipeline.run(input).await?;
    debug!(?report, "Run report");

    match outcome {
        PipelineOutcome::NoGenes => println!("No gene symbols found in the article."),
        PipelineOutcome::NoAssociations => println!("No gene-disease associations found in the article."),
        PipelineOutcome::Genes(rows) => {
            write_csv(&rows, output).with_context(|| format!("writing {}", output.display()))?;
            println!(
                "Success: {} gene(s) with disease associations written to {}",
                rows.len(),
                output.display()
            );
        }
    }
    Ok(())
}

/// `genelink load-db`: denormalise a gene CSV into SQLite.
pub async fn load_db(input: &Path, output: &Path) -> anyhow::Result<()> {
    // Parse first so a bad CSV never leaves a database file behind
    let rows = read_gene_csv(input)?;

    let db = Database::open(output)
        .await
        .with_context(|| format!("opening database {}", output.display()))?;
    db.initialize().await?;
    let result = load_rows(&db, &rows).await;
    db.close().await;

    let summary = result?;
    println!(
        "Successfully processed data and saved to {} ({} genes, {} aliases, {} diseases)",
        output.display(),
        summary.genes,
        summary.aliases,
        summary.diseases
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_db_bad_csv_creates_no_database() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.csv");
        std::fs::write(&input, "Symbol,Other\r\nTP53,x\r\n").unwrap();
        let output = dir.path().join("genes.db");

        let err = load_db(&input, &output).await.unwrap_err();
        assert!(err.to_string().starts_with("Error reading CSV file:"));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_load_db_missing_input_creates_no_database() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("genes.db");

        let err = load_db(&dir.path().join("nope.csv"), &output).await.unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_load_db_writes_tables() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("genes.csv");
        std::fs::write(
            &input,
            "HGNC ID,Gene Symbol,HGNC Gene Name,Gene Aliases,hg38 Coordinates,hg19 Coordinates,Disease\r\n\
             HGNC:6990,MECP2,methyl-CpG binding protein 2,,,,Rett syndrome\r\n",
        )
        .unwrap();
        let output = dir.path().join("genes.db");

        load_db(&input, &output).await.unwrap();
        let db = Database::open(&output).await.unwrap();
        assert_eq!(db.diseases(6990).await.unwrap(), vec!["Rett syndrome"]);
        db.close().await;
    }
}
