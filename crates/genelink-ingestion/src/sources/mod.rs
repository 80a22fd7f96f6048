//! Article source clients.

pub mod europepmc;

use async_trait::async_trait;
use genelink_common::Result;

use crate::body::extract_body_text;
use crate::identifier::ArticleId;

/// Common interface for full-text article sources.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Map a PubMed id onto its PubMed Central id.
    async fn resolve_pmcid(&self, pmid: &str) -> Result<String>;

    /// Download the full-text XML of a PMC article.
    async fn fetch_full_text(&self, pmcid: &str) -> Result<String>;

    /// Body text of the article, resolving a PMID first when needed.
    async fn fetch_body_text(&self, id: &ArticleId) -> Result<String> {
        let pmcid = match id {
            ArticleId::Pmcid(pmcid) => pmcid.clone(),
            ArticleId::Pmid(pmid) => self.resolve_pmcid(pmid).await?,
        };
        let xml = self.fetch_full_text(&pmcid).await?;
        Ok(extract_body_text(&xml))
    }
}
