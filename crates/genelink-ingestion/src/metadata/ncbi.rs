//! NCBI Gene aliases via E-utilities esummary.

use std::time::Duration;
use genelink_common::sandbox::SandboxClient;
use genelink_common::Result;
use tracing::{instrument, warn};

pub const ESUMMARY_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esummary.fcgi";

pub struct NcbiGeneClient {
    client: SandboxClient,
    esummary_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl NcbiGeneClient {
    pub fn new(client: SandboxClient) -> Self {
        Self {
            client,
            esummary_url: ESUMMARY_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_endpoint(mut self, esummary_url: impl Into<String>) -> Self {
        self.esummary_url = esummary_url.into();
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

    /// `otheraliases` of an Entrez gene, split on commas. Empty on failure.
    #[instrument(skip(self))]
    pub async fn aliases(&self, entrez_id: &str) -> Vec<String> {
        match self.summary(entrez_id).await {
            Ok(body) => parse_other_aliases(&body, entrez_id),
            Err(e) => {
                warn!(entrez_id, error = %e, "NCBI esummary failed");
                Vec::new()
            }
        }
    }

    async fn summary(&self, entrez_id: &str) -> Result<serde_json::Value> {
        let mut params = vec![
            ("db", "gene".to_string()),
            ("id", entrez_id.to_string()),
            ("retmode", "json".to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.clone()));
        }
        Ok(self
            .client
            .get(&self.esummary_url)?
            .query(&params)
            .timeout(self.timeout)
            .send()
            .await?
            .json::<serde_json::Value>()
            .await?)
    }
}

/// Pull `result.<id>.otheraliases` out of an esummary JSON body.
pub fn parse_other_aliases(body: &serde_json::Value, entrez_id: &str) -> Vec<String> {
    body["result"][entrez_id]["otheraliases"]
        .as_str()
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}
