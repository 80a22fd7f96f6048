//! Ensembl REST coordinate lookups on GRCh38 and GRCh37.

use std::fmt;
use std::time::Duration;
use genelink_common::sandbox::SandboxClient;
use genelink_common::Result;
use serde::Deserialize;
use tracing::{debug, instrument};

pub const ENSEMBL_GRCH38_URL: &str = "https://rest.ensembl.org";
pub const ENSEMBL_GRCH37_URL: &str = "https://grch37.rest.ensembl.org";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assembly {
    Hg38,
    Hg19,
}

impl fmt::Display for Assembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hg38 => "hg38",
            Self::Hg19 => "hg19",
        })
    }
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    seq_region_name: Option<String>,
    start: Option<u64>,
    end: Option<u64>,
}

impl LookupResponse {
    fn coordinates(&self) -> Option<String> {
        match (&self.seq_region_name, self.start, self.end) {
            (Some(chrom), Some(start), Some(end)) if !chrom.is_empty() && start > 0 && end > 0 => {
                Some(format!("chr{}:{}-{}", chrom, start, end))
            }
            _ => None,
        }
    }
}

pub struct EnsemblClient {
    client: SandboxClient,
    grch38_url: String,
    grch37_url: String,
    timeout: Duration,
}

impl EnsemblClient {
    pub fn new(client: SandboxClient) -> Self {
        Self {
            client,
            grch38_url: ENSEMBL_GRCH38_URL.to_string(),
            grch37_url: ENSEMBL_GRCH37_URL.to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    pub fn with_base_urls(mut self, grch38_url: impl Into<String>, grch37_url: impl Into<String>) -> Self {
        self.grch38_url = grch38_url.into().trim_end_matches('/').to_string();
        self.grch37_url = grch37_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn base_url(&self, assembly: Assembly) -> &str {
        match assembly {
            Assembly::Hg38 => &self.grch38_url,
            Assembly::Hg19 => &self.grch37_url,
        }
    }

    /// `chr<region>:<start>-<end>` for an Ensembl gene id, or an empty string.
    #[instrument(skip(self))]
    pub async fn coordinates_by_id(&self, ensembl_id: &str, assembly: Assembly) -> String {
        let url = format!("{}/lookup/id/{}", self.base_url(assembly), ensembl_id);
        self.lookup(&url).await
    }

    /// Same as [`Self::coordinates_by_id`], resolving a human gene symbol.
    #[instrument(skip(self))]
    pub async fn coordinates_by_symbol(&self, symbol: &str, assembly: Assembly) -> String {
        let url = format!("{}/lookup/symbol/homo_sapiens/{}", self.base_url(assembly), symbol);
        self.lookup(&url).await
    }

    async fn lookup(&self, url: &str) -> String {
        match self.fetch(url).await {
            Ok(Some(coords)) => coords,
            Ok(None) => String::new(),
            Err(e) => {
                debug!(url, error = %e, "Ensembl lookup failed");
                String::new()
            }
        }
    }

    async fn fetch(&self, url: &str) -> Result<Option<String>> {
        let resp = self
            .client
            .get(url)?
            .query(&[("content-type", "application/json")])
            .timeout(self.timeout)
            .send()
            .await?;
        if resp.status() != reqwest::StatusCode::OK {
            return Ok(None);
        }
        let body: LookupResponse = resp.json().await?;
        Ok(body.coordinates())
    }
}
