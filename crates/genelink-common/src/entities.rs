//! Core record types passed between the pipeline stages.
//! Offsets are byte offsets into the article body text.

use std::collections::{BTreeSet, HashMap};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Span
// ---------------------------------------------------------------------------

/// Half-open `[start, end)` byte range into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Midpoint of the span, kept as `f64` so odd-length spans don't round.
    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) as f64 / 2.0
    }

    /// Whether `other` lies entirely within this span (bounds inclusive).
    pub fn contains(&self, other: &Span) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Gene mention
// ---------------------------------------------------------------------------

/// All mentions of one gene symbol in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneMention {
    /// Upper-cased gene symbol, e.g. "TP53"
    pub symbol: String,
    /// Numeric HGNC id when the text states one, e.g. 11998
    pub hgnc_id: Option<u32>,
    /// Spans of the symbol text, in the order they were found.
    pub mentions: Vec<Span>,
}

impl GeneMention {
    pub fn new(symbol: impl Into<String>, hgnc_id: Option<u32>) -> Self {
        Self { symbol: symbol.into(), hgnc_id, mentions: Vec::new() }
    }

    /// Mentions lying entirely within `window`.
    pub fn mentions_within<'a>(&'a self, window: &'a Span) -> impl Iterator<Item = &'a Span> + 'a {
        self.mentions.iter().filter(move |m| window.contains(m))
    }

    pub fn is_mentioned_within(&self, window: &Span) -> bool {
        self.mentions_within(window).next().is_some()
    }
}

// ---------------------------------------------------------------------------
// Disease span
// ---------------------------------------------------------------------------

/// A disease entity reported by NER.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseSpan {
    /// Surface text exactly as it appears in the document.
    pub text: String,
    pub span: Span,
}

impl DiseaseSpan {
    pub fn new(text: impl Into<String>, start: usize, end: usize) -> Self {
        Self { text: text.into(), span: Span::new(start, end) }
    }

    /// Name used for linking and output: surface text with surrounding
    /// whitespace and trailing/leading `.,;:` removed.
    pub fn name(&self) -> &str {
        self.text.trim().trim_matches(|c| matches!(c, '.' | ',' | ';' | ':'))
    }
}

// ---------------------------------------------------------------------------
// Associations
// ---------------------------------------------------------------------------

/// Gene symbol → disease names accumulated while linking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Associations {
    by_symbol: HashMap<String, BTreeSet<String>>,
}

impl Associations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `disease` is linked to `symbol`. Returns false if the pair
    /// was already present.
    pub fn add(&mut self, symbol: &str, disease: &str) -> bool {
        self.by_symbol
            .entry(symbol.to_string())
            .or_default()
            .insert(disease.to_string())
    }

    /// Diseases linked to `symbol`, sorted.
    pub fn diseases_for(&self, symbol: &str) -> Option<&BTreeSet<String>> {
        self.by_symbol.get(symbol).filter(|set| !set.is_empty())
    }

    /// Total number of distinct (gene, disease) pairs.
    pub fn pair_count(&self) -> usize {
        self.by_symbol.values().map(BTreeSet::len).sum()
    }
}

// ---------------------------------------------------------------------------
// Enriched gene record (output row)
// ---------------------------------------------------------------------------

/// Column headers of the result CSV, in order.
pub const GENE_INFO_HEADERS: [&str; 7] = [
    "HGNC ID",
    "Gene Symbol",
    "HGNC Gene Name",
    "Gene Aliases",
    "hg38 Coordinates",
    "hg19 Coordinates",
    "Disease",
];

/// One output row: a gene with its metadata and linked diseases.
/// Field order and serde names match `GENE_INFO_HEADERS`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneInfo {
    #[serde(rename = "HGNC ID")]
    pub hgnc_id: String,
    #[serde(rename = "Gene Symbol")]
    pub gene_symbol: String,
    #[serde(rename = "HGNC Gene Name")]
    pub gene_name: String,
    /// `; `-joined, sorted aliases.
    #[serde(rename = "Gene Aliases", default)]
    pub gene_aliases: String,
    #[serde(rename = "hg38 Coordinates", default)]
    pub coord_hg38: String,
    #[serde(rename = "hg19 Coordinates", default)]
    pub coord_hg19: String,
    /// `; `-joined, sorted disease names.
    #[serde(rename = "Disease", default)]
    pub disease: String,
}

/// Join a sorted set of names the way list cells are written in the CSV.
pub fn join_list<'a>(items: impl IntoIterator<Item = &'a String>) -> String {
    items.into_iter().map(String::as_str).collect::<Vec<_>>().join("; ")
}

/// Split a `;`-separated CSV cell back into trimmed, non-empty values.
pub fn split_list(cell: &str) -> Vec<String> {
    cell.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
