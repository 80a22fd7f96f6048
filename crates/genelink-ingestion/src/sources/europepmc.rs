//! Europe PMC REST API client.
//!
//! Endpoints:
//!   search:   https://www.ebi.ac.uk/europepmc/webservices/rest/search
//!   fulltext: https://www.ebi.ac.uk/europepmc/webservices/rest/{PMCID}/fullTextXML

use std::time::Duration;
use async_trait::async_trait;
use genelink_common::sandbox::SandboxClient;
use genelink_common::{GenelinkError, Result};
use tracing::{debug, instrument};

use super::ArticleSource;

pub const EPMC_REST_URL: &str = "https://www.ebi.ac.uk/europepmc/webservices/rest";

pub struct EuropePmcClient {
    client: SandboxClient,
    base_url: String,
    timeout: Duration,
}

impl EuropePmcClient {
    pub fn new(client: SandboxClient) -> Self {
        Self {
            client,
            base_url: EPMC_REST_URL.to_string(),
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
}

#[async_trait]
impl ArticleSource for EuropePmcClient {
    #[instrument(skip(self))]
    async fn resolve_pmcid(&self, pmid: &str) -> Result<String> {
        let url = format!("{}/search", self.base_url);
        let query = format!("EXT_ID:{} AND SRC:MED", pmid);

        let resp = self
            .client
            .get(&url)?
            .query(&[("query", query.as_str()), ("format", "json")])
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        let first = resp["resultList"]["result"]
            .as_array()
            .and_then(|results| results.first())
            .ok_or_else(|| GenelinkError::NotFound(format!("No Europe PMC match for PMID {}", pmid)))?;

        let pmcid = first["pmcid"]
            .as_str()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| GenelinkError::NotFound(format!("No PMCID found for PMID {}", pmid)))?;

        debug!(pmid, pmcid, "Resolved PMID to PMCID");
        Ok(pmcid.to_string())
    }

    #[instrument(skip(self))]
    async fn fetch_full_text(&self, pmcid: &str) -> Result<String> {
        let url = format!("{}/{}/fullTextXML", self.base_url, pmcid);
        let xml = self
            .client
            .get(&url)?
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        debug!(pmcid, bytes = xml.len(), "Downloaded full-text XML");
        Ok(xml)
    }
}
