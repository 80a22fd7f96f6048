//! Dictionary disease NER using an Aho-Corasick automaton.
//!
//! Matches disease names from an embedded vocabulary, optionally extended with
//! MeSH disease descriptors (tree numbers under `C`). Matching is ASCII
//! case-insensitive. Only hits that start and end on word boundaries count;
//! among those the leftmost-longest non-overlapping ones are kept.
//!
//! No network calls are made while matching; the MeSH file is read once at
//! construction.

use std::path::{Path, PathBuf};
use aho_corasick::{AhoCorasick, MatchKind};
use async_trait::async_trait;
use genelink_common::sandbox::SandboxClient;
use genelink_common::DiseaseSpan;
use tracing::{info, warn};

use crate::{DiseaseRecognizer, NerError, Result};

/// MeSH descriptor XML (current year) published by NLM.
const MESH_DESCRIPTOR_URL: &str =
    "https://nlmpubs.nlm.nih.gov/projects/mesh/MESH_FILES/xmlmesh/desc2025.xml";
const MESH_CACHE_FILE: &str = "mesh_desc2025.xml";

/// A dictionary disease recognizer.
pub struct TrieNer {
    automaton: AhoCorasick,
    stats: TrieStats,
}

#[derive(Debug, Clone, Default)]
pub struct TrieStats {
    pub embedded_count: usize,
    pub mesh_count: usize,
    pub total_patterns: usize,
}

impl TrieNer {
    /// Recognizer over the embedded vocabulary only.
    pub fn with_embedded_vocabulary() -> Result<Self> {
        let patterns = Self::embedded_vocabulary();
        let embedded_count = patterns.len();
        Self::build(patterns, embedded_count)
    }

    /// Recognizer over the embedded vocabulary plus the disease descriptors of
    /// a MeSH descriptor XML file.
    pub fn with_mesh_file(path: &Path) -> Result<Self> {
        let mut patterns = Self::embedded_vocabulary();
        let embedded_count = patterns.len();
        let content = std::fs::read_to_string(path)?;
        parse_mesh_diseases(&content, &mut patterns)?;
        Self::build(patterns, embedded_count)
    }

    fn build(patterns: Vec<String>, embedded_count: usize) -> Result<Self> {
        // Standard semantics so every overlapping hit is reported
        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .ascii_case_insensitive(true)
            .build(&patterns)
            .map_err(|e| NerError::DictionaryLoad(e.to_string()))?;

        let stats = TrieStats {
            embedded_count,
            mesh_count: patterns.len() - embedded_count,
            total_patterns: patterns.len(),
        };

        info!(
            "TrieNer loaded: {} embedded, {} MeSH (total: {})",
            stats.embedded_count, stats.mesh_count, stats.total_patterns
        );

        Ok(Self { automaton, stats })
    }

    /// Dictionary matches in `text`, in document order.
    pub fn extract(&self, text: &str) -> Vec<DiseaseSpan> {
        let mut candidates: Vec<(usize, usize)> = self
            .automaton
            .find_overlapping_iter(text)
            .map(|mat| (mat.start(), mat.end()))
            .filter(|&(start, end)| is_word_boundary(text, start, end))
            .collect();
        // Leftmost first, longest first at the same start
        candidates.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        let mut entities = Vec::new();
        let mut covered_until = 0;
        for (start, end) in candidates {
            if start < covered_until {
                continue;
            }
            entities.push(DiseaseSpan::new(&text[start..end], start, end));
            covered_until = end;
        }
        entities
    }

    pub fn stats(&self) -> &TrieStats {
        &self.stats
    }

    // ─────────────────────────────────────────────────────────────────────────

    fn embedded_vocabulary() -> Vec<String> {
        let diseases = [
            "Noonan syndrome",
            "Li-Fraumeni syndrome",
            "Lynch syndrome",
            "Marfan syndrome",
            "Rett syndrome",
            "Down syndrome",
            "Turner syndrome",
            "Dravet syndrome",
            "Costello syndrome",
            "LEOPARD syndrome",
            "CHARGE syndrome",
            "SHORT syndrome",
            "Cowden syndrome",
            "Peutz-Jeghers syndrome",
            "Ehlers-Danlos syndrome",
            "Fragile X syndrome",
            "Angelman syndrome",
            "Prader-Willi syndrome",
            "Kabuki syndrome",
            "cystic fibrosis",
            "Duchenne muscular dystrophy",
            "muscular dystrophy",
            "spinal muscular atrophy",
            "Huntington disease",
            "Alzheimer disease",
            "Parkinson disease",
            "amyotrophic lateral sclerosis",
            "neurofibromatosis type 1",
            "neurofibromatosis",
            "tuberous sclerosis",
            "hypertrophic cardiomyopathy",
            "dilated cardiomyopathy",
            "cardiomyopathy",
            "long QT syndrome",
            "Brugada syndrome",
            "sickle cell anemia",
            "beta-thalassemia",
            "thalassemia",
            "hemophilia A",
            "phenylketonuria",
            "retinitis pigmentosa",
            "epilepsy",
            "epileptic encephalopathy",
            "intellectual disability",
            "autism spectrum disorder",
            "developmental delay",
            "hearing loss",
            "osteogenesis imperfecta",
            "achondroplasia",
            "polycystic kidney disease",
            "juvenile myelomonocytic leukemia",
            "acute myeloid leukemia",
            "acute lymphoblastic leukemia",
            "leukemia",
            "breast cancer",
            "ovarian cancer",
            "colorectal cancer",
            "lung cancer",
            "pancreatic cancer",
            "prostate cancer",
            "melanoma",
            "glioblastoma",
            "neuroblastoma",
            "retinoblastoma",
            "osteosarcoma",
            "familial adenomatous polyposis",
            "type 2 diabetes",
            "diabetes mellitus",
            "hypothyroidism",
            "obesity",
            "cancer",
            // Generic phrases NER also reports; filtered downstream
            "autosomal recessive",
            "autosomal dominant",
            "short stature",
            "rare disease",
            "genetic disorder",
        ];

        diseases
            .iter()
            .map(|name| name.to_string())
            .collect()
    }
}

#[async_trait]
impl DiseaseRecognizer for TrieNer {
    fn name(&self) -> &str {
        "dictionary"
    }

    async fn recognize(&self, text: &str) -> Result<Vec<DiseaseSpan>> {
        Ok(self.extract(text))
    }
}

/// Whether `text[start..end]` starts and ends on word boundaries.
fn is_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before_ok = text[..start]
        .chars()
        .next_back()
        .map_or(true, |c| !c.is_alphanumeric());
    let after_ok = text[end..]
        .chars()
        .next()
        .map_or(true, |c| !c.is_alphanumeric());
    before_ok && after_ok
}

/// Helper struct for MeSH XML parsing
#[derive(Default)]
struct MeshDescriptorData {
    name: String,
    tree_numbers: Vec<String>,
}

/// Parse MeSH descriptor XML and append disease terms (tree numbers under
/// `C`). Only the record's own `DescriptorName` is taken; nested references
/// to other descriptors are ignored.
fn parse_mesh_diseases(xml: &str, patterns: &mut Vec<String>) -> Result<usize> {
    use quick_xml::events::Event;
    use quick_xml::Reader;

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut current: Option<MeshDescriptorData> = None;
    let mut depth_in_record = 0usize;
    let mut current_text = String::new();
    let mut count = 0;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.name().as_ref() == b"DescriptorRecord" {
                    current = Some(MeshDescriptorData::default());
                    depth_in_record = 0;
                } else if current.is_some() {
                    depth_in_record += 1;
                }
                current_text.clear();
            }
            Ok(Event::Text(e)) => {
                if current.is_some() {
                    current_text = e.unescape().unwrap_or_default().to_string();
                }
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                match name.as_ref() {
                    b"DescriptorRecord" => {
                        if let Some(desc) = current.take() {
                            if desc.tree_numbers.iter().any(|t| t.starts_with('C')) && !desc.name.is_empty() {
                                patterns.push(desc.name);
                                count += 1;
                            }
                        }
                    }
                    // depth 2 = <DescriptorName><String>
                    b"String" if depth_in_record == 2 => {
                        if let Some(ref mut desc) = current {
                            if desc.name.is_empty() {
                                desc.name = current_text.clone();
                            }
                        }
                    }
                    b"TreeNumber" => {
                        if let Some(ref mut desc) = current {
                            desc.tree_numbers.push(current_text.clone());
                        }
                    }
                    _ => {}
                }
                if current.is_some() && name.as_ref() != b"DescriptorRecord" {
                    depth_in_record = depth_in_record.saturating_sub(1);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                warn!("MeSH XML parse error: {:?}", e);
                break;
            }
            _ => {}
        }
    }

    info!("Loaded {} disease patterns from MeSH", count);
    if count == 0 {
        return Err(NerError::DictionaryLoad("no disease descriptors found in MeSH file".to_string()));
    }
    Ok(count)
}

/// Cache location for the MeSH descriptor file.
pub fn mesh_cache_path() -> std::io::Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("genelink")
        .join("databases");
    std::fs::create_dir_all(&cache_dir)?;
    Ok(cache_dir.join(MESH_CACHE_FILE))
}

/// Return the cached MeSH descriptor file, downloading it first if absent.
pub async fn ensure_mesh_file(client: &SandboxClient) -> Result<PathBuf> {
    let path = mesh_cache_path()?;
    if path.exists() {
        return Ok(path);
    }

    info!("MeSH file not found at {:?}, downloading from {}...", path, MESH_DESCRIPTOR_URL);
    let response = client
        .get(MESH_DESCRIPTOR_URL)?
        .timeout(std::time::Duration::from_secs(600))
        .send()
        .await
        .map_err(|e| NerError::Download(e.to_string()))?;
    if !response.status().is_success() {
        return Err(NerError::Download(format!("MeSH download failed: HTTP {}", response.status())));
    }
    let bytes = response.bytes().await.map_err(|e| NerError::Download(e.to_string()))?;
    std::fs::write(&path, &bytes)?;
    info!("MeSH downloaded successfully");
    Ok(path)
}
