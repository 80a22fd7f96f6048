use reqwest::{Client, ClientBuilder};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;
use crate::error::GenelinkError;

/// Hosts every genelink client may reach.
const DEFAULT_ALLOWED_HOSTS: &[&str] = &[
    "www.ebi.ac.uk",             // Europe PMC, OLS
    "rest.genenames.org",        // HGNC
    "eutils.ncbi.nlm.nih.gov",   // NCBI E-utilities
    "rest.ensembl.org",          // Ensembl GRCh38
    "grch37.rest.ensembl.org",   // Ensembl GRCh37
    "nlmpubs.nlm.nih.gov",       // MeSH descriptor downloads
    "localhost",                 // Local NER service
    "127.0.0.1",                 // Localhost alt
];

const DEFAULT_USER_AGENT: &str = concat!("genelink/", env!("CARGO_PKG_VERSION"));

/// An HTTP client that only allows requests to approved hosts.
///
/// Every request carries the client-wide timeout unless the caller overrides
/// it per request with `RequestBuilder::timeout`.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl SandboxClient {
    /// Creates a client with the default allowlist and a 30 s timeout.
    pub fn new() -> Result<Self, GenelinkError> {
        Self::with_settings(DEFAULT_USER_AGENT, Duration::from_secs(30))
    }

    pub fn with_settings(user_agent: &str, timeout: Duration) -> Result<Self, GenelinkError> {
        let allowlist = DEFAULT_ALLOWED_HOSTS.iter().map(|d| d.to_string()).collect();

        let client = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| GenelinkError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, allowlist })
    }

    /// Appends an exact hostname to the allowlist.
    pub fn allow_domain(&mut self, domain: &str) {
        self.allowlist.insert(domain.to_string());
    }

    /// Validates if a URL is permitted under the current sandbox policy.
    pub fn is_allowed(&self, url: &str) -> bool {
        if let Ok(parsed) = Url::parse(url) {
            if let Some(host) = parsed.host_str() {
                // Exact match or a subdomain of an allowed host
                for allowed in &self.allowlist {
                    if host == allowed || host.ends_with(&format!(".{}", allowed)) {
                        return true;
                    }
                }
            }
        }
        false
    }

    fn check(&self, url: &str) -> Result<(), GenelinkError> {
        if self.is_allowed(url) {
            Ok(())
        } else {
            Err(GenelinkError::SecurityError(format!(
                "domain not in allowlist for URL {}",
                url
            )))
        }
    }

    /// Builds a GET request to an allowed URL.
    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder, GenelinkError> {
        self.check(url)?;
        Ok(self.client.get(url))
    }

    /// Builds a POST request to an allowed URL.
    pub fn post(&self, url: &str) -> Result<reqwest::RequestBuilder, GenelinkError> {
        self.check(url)?;
        Ok(self.client.post(url))
    }
}
