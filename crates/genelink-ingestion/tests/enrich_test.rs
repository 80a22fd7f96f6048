//! MetadataEnricher against mocked HGNC, NCBI and Ensembl endpoints.

use genelink_common::sandbox::SandboxClient;
use genelink_ingestion::metadata::ensembl::EnsemblClient;
use genelink_ingestion::metadata::hgnc::HgncClient;
use genelink_ingestion::metadata::ncbi::NcbiGeneClient;
use genelink_ingestion::metadata::{GeneMetadata, GeneMetadataSource, MetadataEnricher};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Servers {
    hgnc: MockServer,
    ncbi: MockServer,
    grch38: MockServer,
    grch37: MockServer,
}

impl Servers {
    async fn start() -> Self {
        Self {
            hgnc: MockServer::start().await,
            ncbi: MockServer::start().await,
            grch38: MockServer::start().await,
            grch37: MockServer::start().await,
        }
    }

    fn enricher(&self) -> MetadataEnricher {
        let client = SandboxClient::new().unwrap();
        MetadataEnricher::new(
            HgncClient::new(client.clone()).with_base_url(self.hgnc.uri()),
            NcbiGeneClient::new(client.clone()).with_endpoint(format!("{}/esummary.fcgi", self.ncbi.uri())),
            EnsemblClient::new(client).with_base_urls(self.grch38.uri(), self.grch37.uri()),
        )
    }
}

fn docs(doc: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "response": { "docs": [doc] } }))
}

fn no_docs() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "response": { "numFound": 0, "docs": [] } }))
}

fn region(chrom: &str, start: u64, end: u64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "seq_region_name": chrom, "start": start, "end": end }))
}

#[tokio::test]
async fn test_enrich_by_symbol_with_ensembl_id() {
    let s = Servers::start().await;
    Mock::given(method("GET"))
        .and(path("/fetch/symbol/PTPN11"))
        .respond_with(docs(json!({
            "hgnc_id": "HGNC:9644",
            "symbol": "PTPN11",
            "name": "protein tyrosine phosphatase non-receptor type 11",
            "alias_symbol": ["SHP-2", "SHP2"],
            "prev_symbol": ["PTP2C"],
            "entrez_id": "5781",
            "ensembl_gene_id": "ENSG00000179295"
        })))
        .mount(&s.hgnc)
        .await;
    Mock::given(method("GET"))
        .and(query_param("id", "5781"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": { "5781": { "otheraliases": "BPTP3, CFC, NS1, PTN11, SHP2" } }
        })))
        .mount(&s.ncbi)
        .await;
    Mock::given(method("GET"))
        .and(path("/lookup/id/ENSG00000179295"))
        .respond_with(region("12", 112418351, 112509913))
        .mount(&s.grch38)
        .await;
    Mock::given(method("GET"))
        .and(path("/lookup/id/ENSG00000179295"))
        .respond_with(region("12", 112856155, 112947717))
        .mount(&s.grch37)
        .await;

    let meta = s.enricher().gene_metadata("ptpn11", None).await.unwrap();
    assert_eq!(
        meta,
        GeneMetadata {
            hgnc_id: "HGNC:9644".into(),
            symbol: "PTPN11".into(),
            name: "protein tyrosine phosphatase non-receptor type 11".into(),
            aliases: ["BPTP3", "CFC", "NS1", "PTN11", "PTP2C", "SHP-2", "SHP2"]
                .iter()
                .map(|a| a.to_string())
                .collect(),
            coord_hg38: "chr12:112418351-112509913".into(),
            coord_hg19: "chr12:112856155-112947717".into(),
        }
    );
}

#[tokio::test]
async fn test_id_fallback_and_symbol_coordinates() {
    let s = Servers::start().await;
    Mock::given(method("GET"))
        .and(path("/fetch/symbol/C9ORF72"))
        .respond_with(no_docs())
        .mount(&s.hgnc)
        .await;
    Mock::given(method("GET"))
        .and(path("/fetch/hgnc_id/HGNC:28337"))
        .respond_with(docs(json!({
            "hgnc_id": "HGNC:28337",
            "symbol": "C9orf72",
            "name": "C9orf72-SMCR8 complex subunit",
            "alias_name": "C9orf72"
        })))
        .mount(&s.hgnc)
        .await;
    Mock::given(method("GET"))
        .and(path("/lookup/symbol/homo_sapiens/C9ORF72"))
        .respond_with(region("9", 27546545, 27573866))
        .mount(&s.grch38)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&s.grch37)
        .await;

    let meta = s.enricher().gene_metadata("C9ORF72", Some(28337)).await.unwrap();
    assert_eq!(meta.hgnc_id, "HGNC:28337");
    assert_eq!(meta.symbol, "C9ORF72");
    // the only alias equals the symbol case-insensitively
    assert!(meta.aliases.is_empty());
    assert_eq!(meta.coord_hg38, "chr9:27546545-27573866");
    assert_eq!(meta.coord_hg19, "");
}

#[tokio::test]
async fn test_unknown_gene_is_none() {
    let s = Servers::start().await;
    Mock::given(method("GET")).respond_with(no_docs()).mount(&s.hgnc).await;

    assert!(s.enricher().gene_metadata("NOTAGENE", None).await.is_none());
    assert!(s.enricher().gene_metadata("NOTAGENE", Some(1)).await.is_none());
}

#[tokio::test]
#[ignore] // requires network
async fn test_live_tp53() {
    let enricher = MetadataEnricher::with_client(SandboxClient::new().unwrap());
    let meta = enricher.gene_metadata("TP53", Some(11998)).await.unwrap();
    assert_eq!(meta.hgnc_id, "HGNC:11998");
    assert!(meta.coord_hg38.starts_with("chr17:"));
    assert!(meta.aliases.iter().any(|a| a == "p53"));
}
