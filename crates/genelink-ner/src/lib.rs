//! Disease named-entity recognition and disease-term filtering.
//!
//! Two recognizers are provided behind the [`DiseaseRecognizer`] trait:
//! - [`RemoteNer`]: calls an external NER model service (e.g. SciSpacy BC5CDR)
//! - [`TrieNer`]: dictionary matching with an Aho-Corasick automaton
//!
//! Recognized spans are then screened with [`is_generic`] and a
//! [`TermValidator`] before they reach the linker.

pub mod entity_types;
pub mod generic;
pub mod remote;
pub mod sentences;
pub mod trie_ner;
pub mod validate;

use async_trait::async_trait;
use genelink_common::DiseaseSpan;

pub use entity_types::{normalize_entity_label, EntityType};
pub use generic::is_generic;
pub use remote::RemoteNer;
pub use sentences::Sentences;
pub use trie_ner::TrieNer;
pub use validate::{AcceptAll, DiseaseValidator, TermValidator};

pub type Result<T> = std::result::Result<T, NerError>;

#[derive(Debug, thiserror::Error)]
pub enum NerError {
    #[error("Dictionary loading failed: {0}")]
    DictionaryLoad(String),

    #[error("NER service error: {0}")]
    Service(String),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<std::io::Error> for NerError {
    fn from(e: std::io::Error) -> Self {
        NerError::DictionaryLoad(e.to_string())
    }
}

impl From<genelink_common::GenelinkError> for NerError {
    fn from(e: genelink_common::GenelinkError) -> Self {
        NerError::Service(e.to_string())
    }
}

/// Finds disease mentions in article text.
#[async_trait]
pub trait DiseaseRecognizer: Send + Sync {
    /// Short name used in logs, e.g. "remote:bc5cdr" or "dictionary".
    fn name(&self) -> &str;

    /// Disease spans in document order. Offsets are byte offsets into `text`.
    async fn recognize(&self, text: &str) -> Result<Vec<DiseaseSpan>>;
}
