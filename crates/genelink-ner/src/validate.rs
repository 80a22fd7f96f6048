//! Cross-database validity check for disease names.
//!
//! A term is accepted when at least one source knows it, checked in order:
//! 1. NCBI MedGen (E-utilities esearch)
//! 2. NCBI MeSH, restricted to `[MeSH Terms]`
//! 3. EBI OLS search within the Disease Ontology (`doid`)
//!
//! Every request failure counts as "not confirmed"; nothing is surfaced.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use async_trait::async_trait;
use genelink_common::sandbox::SandboxClient;
use tracing::{debug, instrument};

pub const ESEARCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi";
pub const OLS_SEARCH_URL: &str = "https://www.ebi.ac.uk/ols/api/search";

/// Decides whether a disease name is a recognised disease.
#[async_trait]
pub trait TermValidator: Send + Sync {
    async fn is_valid(&self, term: &str) -> bool;
}

/// Accepts every non-empty term. Used when validation is disabled.
pub struct AcceptAll;

#[async_trait]
impl TermValidator for AcceptAll {
    async fn is_valid(&self, term: &str) -> bool {
        !term.trim().is_empty()
    }
}

/// Validator backed by MedGen, MeSH and OLS lookups, memoised per instance.
pub struct DiseaseValidator {
    client: SandboxClient,
    esearch_url: String,
    ols_url: String,
    api_key: Option<String>,
    timeout: Duration,
    cache: Mutex<HashMap<String, bool>>,
}

impl DiseaseValidator {
    pub fn new(client: SandboxClient) -> Self {
        Self {
            client,
            esearch_url: ESEARCH_URL.to_string(),
            ols_url: OLS_SEARCH_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(5),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Point the validator at other E-utilities / OLS endpoints.
    pub fn with_endpoints(mut self, esearch_url: impl Into<String>, ols_url: impl Into<String>) -> Self {
        self.esearch_url = esearch_url.into();
        self.ols_url = ols_url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// esearch hit test: HTTP 200 and at least one `<Id>` in the XML body.
    async fn esearch_has_ids(&self, db: &str, term: &str) -> bool {
        let mut params = vec![("db", db.to_string()), ("term", term.to_string())];
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.clone()));
        }

        let request = match self.client.get(&self.esearch_url) {
            Ok(r) => r,
            Err(_) => return false,
        };
        let resp = match request.query(&params).timeout(self.timeout).send().await {
            Ok(r) if r.status() == reqwest::StatusCode::OK => r,
            _ => return false,
        };
        resp.text().await.map(|body| body.contains("<Id>")).unwrap_or(false)
    }

    async fn ols_has_hits(&self, term: &str) -> bool {
        let request = match self.client.get(&self.ols_url) {
            Ok(r) => r,
            Err(_) => return false,
        };
        let resp = match request
            .query(&[("q", term), ("ontology", "doid")])
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(r) if r.status() == reqwest::StatusCode::OK => r,
            _ => return false,
        };
        match resp.json::<serde_json::Value>().await {
            Ok(body) => body["response"]["numFound"].as_u64().unwrap_or(0) > 0,
            Err(_) => false,
        }
    }

    async fn lookup(&self, query: &str) -> bool {
        if self.esearch_has_ids("medgen", query).await {
            debug!(term = query, source = "medgen", "disease confirmed");
            return true;
        }
        if self.esearch_has_ids("mesh", &format!("{}[MeSH Terms]", query)).await {
            debug!(term = query, source = "mesh", "disease confirmed");
            return true;
        }
        if self.ols_has_hits(query).await {
            debug!(term = query, source = "ols", "disease confirmed");
            return true;
        }
        debug!(term = query, "disease not confirmed by any source");
        false
    }
}

#[async_trait]
impl TermValidator for DiseaseValidator {
    #[instrument(skip(self))]
    async fn is_valid(&self, term: &str) -> bool {
        let query = term.trim();
        if query.is_empty() {
            return false;
        }

        let key = query.to_lowercase();
        let cached = self.cache.lock().ok().and_then(|c| c.get(&key).copied());
        if let Some(known) = cached {
            return known;
        }

        let valid = self.lookup(query).await;
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, valid);
        }
        valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const HIT: &str = "<eSearchResult><Count>1</Count><IdList><Id>41393</Id></IdList></eSearchResult>";
    const MISS: &str = "<eSearchResult><Count>0</Count><IdList></IdList></eSearchResult>";

    async fn validator(server: &MockServer) -> DiseaseValidator {
        DiseaseValidator::new(SandboxClient::new().unwrap()).with_endpoints(
            format!("{}/esearch.fcgi", server.uri()),
            format!("{}/ols/api/search", server.uri()),
        )
    }

    #[tokio::test]
    async fn test_empty_term_is_invalid() {
        let server = MockServer::start().await;
        assert!(!validator(&server).await.is_valid("   ").await);
    }

    #[tokio::test]
    async fn test_medgen_hit_accepts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/esearch.fcgi"))
            .and(query_param("db", "medgen"))
            .respond_with(ResponseTemplate::new(200).set_body_string(HIT))
            .expect(1)
            .mount(&server)
            .await;

        let v = validator(&server).await;
        assert!(v.is_valid("Noonan syndrome").await);
        // Second call is served from the cache (expect(1) above)
        assert!(v.is_valid("noonan syndrome").await);
    }

    #[tokio::test]
    async fn test_falls_through_to_ols() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/esearch.fcgi"))
            .respond_with(ResponseTemplate::new(200).set_body_string(MISS))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ols/api/search"))
            .and(query_param("ontology", "doid"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": { "numFound": 3, "docs": [] }
            })))
            .mount(&server)
            .await;

        assert!(validator(&server).await.is_valid("RASopathy").await);
    }

    #[tokio::test]
    async fn test_all_sources_failing_rejects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/esearch.fcgi"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ols/api/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        assert!(!validator(&server).await.is_valid("blue fingers").await);
    }

    #[tokio::test]
    async fn test_accept_all() {
        assert!(AcceptAll.is_valid("anything").await);
        assert!(!AcceptAll.is_valid("").await);
    }
}
