//! Client for an external NER model service (e.g. SciSpacy `en_ner_bc5cdr_md`
//! behind a small FastAPI wrapper).
//!
//! Request:  `POST {service_url}/ner` with `{"text": ..., "model": ...}`
//! Response: `{"entities": [{"text", "label", "start", "end"}], "model": ...}`
//!
//! The service reports character offsets; they are converted to byte offsets
//! here so every downstream stage works on byte offsets.

use std::time::Duration;
use async_trait::async_trait;
use genelink_common::sandbox::SandboxClient;
use genelink_common::DiseaseSpan;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::entity_types::{normalize_entity_label, EntityType};
use crate::{DiseaseRecognizer, NerError, Result};

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8001";
pub const DEFAULT_MODEL: &str = "bc5cdr";

/// A single entity as reported by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceEntity {
    pub text: String,
    pub label: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Deserialize)]
struct NerResponse {
    entities: Vec<ServiceEntity>,
    #[serde(default)]
    model: String,
}

pub struct RemoteNer {
    client: SandboxClient,
    service_url: String,
    model: String,
    name: String,
    timeout: Duration,
}

impl RemoteNer {
    /// Build a client for the service at `service_url`. The service host is
    /// added to the client's allowlist.
    pub fn new(mut client: SandboxClient, service_url: impl Into<String>, model: impl Into<String>) -> Self {
        let service_url = service_url.into().trim_end_matches('/').to_string();
        if let Some(host) = url::Url::parse(&service_url).ok().and_then(|u| u.host_str().map(String::from)) {
            client.allow_domain(&host);
        }
        let model = model.into();
        Self {
            client,
            name: format!("remote:{}", model),
            service_url,
            model,
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl DiseaseRecognizer for RemoteNer {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn recognize(&self, text: &str) -> Result<Vec<DiseaseSpan>> {
        let url = format!("{}/ner", self.service_url);
        debug!(model = %self.model, "Calling NER service");

        let resp = self
            .client
            .post(&url)?
            .timeout(self.timeout)
            .json(&serde_json::json!({ "text": text, "model": self.model }))
            .send()
            .await
            .map_err(|e| NerError::Service(format!("NER service unreachable at {}: {e}", self.service_url)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(NerError::Service(format!("NER service error {status}: {body}")));
        }

        let ner: NerResponse = resp
            .json()
            .await
            .map_err(|e| NerError::Service(format!("Failed to parse NER response: {e}")))?;

        let spans = disease_spans(text, &ner.entities);
        info!(
            model = %ner.model,
            n_entities = ner.entities.len(),
            n_diseases = spans.len(),
            "NER complete"
        );
        Ok(spans)
    }
}

/// Keep disease entities and map their character offsets onto byte offsets
/// of `text`. Entities whose offsets fall outside the text are dropped.
pub fn disease_spans(text: &str, entities: &[ServiceEntity]) -> Vec<DiseaseSpan> {
    // byte offset of every char index, plus one past the end
    let char_to_byte: Vec<usize> = text
        .char_indices()
        .map(|(b, _)| b)
        .chain(std::iter::once(text.len()))
        .collect();

    let mut spans: Vec<DiseaseSpan> = entities
        .iter()
        .filter(|e| normalize_entity_label(&e.label) == EntityType::Disease)
        .filter_map(|e| {
            let (start, end) = match (char_to_byte.get(e.start), char_to_byte.get(e.end)) {
                (Some(&s), Some(&t)) if s < t => (s, t),
                _ => {
                    warn!(entity = %e.text, start = e.start, end = e.end, "NER entity offsets out of range");
                    return None;
                }
            };
            Some(DiseaseSpan::new(&text[start..end], start, end))
        })
        .collect();

    spans.sort_by_key(|d| d.span.start);
    spans
}
