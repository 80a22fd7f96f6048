//! HGNC REST client.
//!
//! `GET https://rest.genenames.org/fetch/symbol/{SYMBOL}` or
//! `GET https://rest.genenames.org/fetch/hgnc_id/HGNC:{id}`, JSON, first
//! document of `response.docs`.

use std::time::Duration;
use genelink_common::sandbox::SandboxClient;
use genelink_common::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

pub const HGNC_REST_URL: &str = "https://rest.genenames.org";

/// HGNC fields that are either a single string or a list of strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::One(s) => vec![s.as_str()],
            Self::Many(v) => v.iter().map(String::as_str).collect(),
        }
    }
}

/// Entrez ids come back as strings, but accept numbers too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntrezId {
    Text(String),
    Number(u64),
}

impl EntrezId {
    pub fn as_string(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
        }
    }
}

/// A gene record as served by the HGNC REST API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HgncRecord {
    /// HGNC accession, e.g. "HGNC:11998"
    #[serde(default)]
    pub hgnc_id: String,
    /// Approved symbol
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub alias_symbol: Option<OneOrMany>,
    #[serde(default)]
    pub prev_symbol: Option<OneOrMany>,
    #[serde(default)]
    pub alias_name: Option<OneOrMany>,
    #[serde(default)]
    pub entrez_id: Option<EntrezId>,
    #[serde(default)]
    pub ensembl_gene_id: Option<String>,
}

impl HgncRecord {
    /// Every alias-like value: alias symbols, previous symbols, alias names.
    pub fn alias_values(&self) -> impl Iterator<Item = &str> {
        [&self.alias_symbol, &self.prev_symbol, &self.alias_name]
            .into_iter()
            .flatten()
            .flat_map(OneOrMany::values)
            .filter(|v| !v.is_empty())
    }

    pub fn entrez_id(&self) -> Option<String> {
        self.entrez_id
            .as_ref()
            .map(EntrezId::as_string)
            .filter(|s| !s.trim().is_empty())
    }

    pub fn ensembl_gene_id(&self) -> Option<&str> {
        self.ensembl_gene_id.as_deref().filter(|s| !s.trim().is_empty())
    }
}

pub struct HgncClient {
    client: SandboxClient,
    base_url: String,
    timeout: Duration,
}

impl HgncClient {
    pub fn new(client: SandboxClient) -> Self {
        Self {
            client,
            base_url: HGNC_REST_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Record for an approved symbol. Failures are logged and yield `None`.
    #[instrument(skip(self))]
    pub async fn fetch_by_symbol(&self, symbol: &str) -> Option<HgncRecord> {
        self.fetch_logged(&format!("fetch/symbol/{}", symbol)).await
    }

    /// Record for a numeric HGNC id. Failures are logged and yield `None`.
    #[instrument(skip(self))]
    pub async fn fetch_by_id(&self, hgnc_id: u32) -> Option<HgncRecord> {
        self.fetch_logged(&format!("fetch/hgnc_id/HGNC:{}", hgnc_id)).await
    }

    async fn fetch_logged(&self, path: &str) -> Option<HgncRecord> {
        match self.fetch(path).await {
            Ok(record) => record,
            Err(e) => {
                warn!(path, error = %e, "HGNC lookup failed");
                None
            }
        }
    }

    async fn fetch(&self, path: &str) -> Result<Option<HgncRecord>> {
        let url = format!("{}/{}", self.base_url, path);
        let body = self
            .client
            .get(&url)?
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        let doc = match body["response"]["docs"].as_array().and_then(|docs| docs.first()) {
            Some(doc) => doc.clone(),
            None => {
                debug!(path, "HGNC returned no documents");
                return Ok(None);
            }
        };
        // a document without a symbol is treated as no record
        if doc.get("symbol").is_none() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(doc)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tp53_doc() -> serde_json::Value {
        serde_json::json!({
            "hgnc_id": "HGNC:11998",
            "symbol": "TP53",
            "name": "tumor protein p53",
            "alias_symbol": ["p53", "LFS1"],
            "prev_symbol": [],
            "alias_name": "Li-Fraumeni syndrome",
            "entrez_id": "7157",
            "ensembl_gene_id": "ENSG00000141510"
        })
    }

    fn client(server: &MockServer) -> HgncClient {
        HgncClient::new(SandboxClient::new().unwrap()).with_base_url(server.uri())
    }

    #[test]
    fn test_record_accepts_string_or_list_fields() {
        let rec: HgncRecord = serde_json::from_value(tp53_doc()).unwrap();
        let aliases: Vec<&str> = rec.alias_values().collect();
        assert_eq!(aliases, vec!["p53", "LFS1", "Li-Fraumeni syndrome"]);
        assert_eq!(rec.entrez_id().as_deref(), Some("7157"));
        assert_eq!(rec.ensembl_gene_id(), Some("ENSG00000141510"));
    }

    #[test]
    fn test_numeric_entrez_id() {
        let rec: HgncRecord =
            serde_json::from_value(serde_json::json!({ "symbol": "KRAS", "entrez_id": 3845 })).unwrap();
        assert_eq!(rec.entrez_id().as_deref(), Some("3845"));
        assert_eq!(rec.alias_values().count(), 0);
    }

    #[tokio::test]
    async fn test_fetch_by_symbol() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fetch/symbol/TP53"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": { "numFound": 1, "docs": [tp53_doc()] }
            })))
            .mount(&server)
            .await;

        let rec = client(&server).fetch_by_symbol("TP53").await.unwrap();
        assert_eq!(rec.hgnc_id, "HGNC:11998");
        assert_eq!(rec.name, "tumor protein p53");
    }

    #[tokio::test]
    async fn test_fetch_by_id_and_empty_docs() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fetch/hgnc_id/HGNC:11998"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": { "docs": [tp53_doc()] }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/fetch/symbol/NOTAGENE"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": { "numFound": 0, "docs": [] }
            })))
            .mount(&server)
            .await;

        let hgnc = client(&server);
        assert_eq!(hgnc.fetch_by_id(11998).await.unwrap().symbol, "TP53");
        assert!(hgnc.fetch_by_symbol("NOTAGENE").await.is_none());
    }

    #[tokio::test]
    async fn test_server_error_yields_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        assert!(client(&server).fetch_by_symbol("TP53").await.is_none());
    }
}
