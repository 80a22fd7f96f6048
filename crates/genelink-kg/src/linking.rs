//! Disease-to-gene linking by sentence proximity.
//!
//! For each disease span, in order:
//! 1. Genes mentioned inside the disease's sentence compete on distance:
//!    the gene whose nearest in-sentence mention midpoint is closest to the
//!    disease midpoint wins. Equal distances keep the earlier gene.
//! 2. With no gene in the sentence, the previous sentence is tried, then the
//!    next one. Either links only if its mentions belong to exactly one gene.
//! 3. Otherwise the disease is dropped.
//!
//! Single forward pass; earlier decisions are never revisited.

use genelink_common::{Associations, DiseaseSpan, GeneMention, Span};
use genelink_ner::Sentences;
use serde::Serialize;
use tracing::debug;

/// How a single disease span was resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkDecision<'a> {
    /// Nearest gene in the same sentence.
    SameSentence(&'a GeneMention),
    /// Only gene mentioned in the preceding sentence.
    PreviousSentence(&'a GeneMention),
    /// Only gene mentioned in the following sentence.
    NextSentence(&'a GeneMention),
    /// No unique gene in context.
    Dropped,
    /// The span does not start inside any sentence.
    OutsideSentences,
}

impl<'a> LinkDecision<'a> {
    pub fn gene(&self) -> Option<&'a GeneMention> {
        match self {
            LinkDecision::SameSentence(g)
            | LinkDecision::PreviousSentence(g)
            | LinkDecision::NextSentence(g) => Some(g),
            LinkDecision::Dropped | LinkDecision::OutsideSentences => None,
        }
    }
}

/// Per-run linking counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinkReport {
    pub same_sentence: usize,
    pub previous_sentence: usize,
    pub next_sentence: usize,
    pub dropped: usize,
    pub outside_sentences: usize,
}

impl LinkReport {
    pub fn linked(&self) -> usize {
        self.same_sentence + self.previous_sentence + self.next_sentence
    }
}

/// Links disease spans to gene mentions within one document.
pub struct Linker<'a> {
    genes: &'a [GeneMention],
    sentences: &'a Sentences,
}

impl<'a> Linker<'a> {
    pub fn new(genes: &'a [GeneMention], sentences: &'a Sentences) -> Self {
        Self { genes, sentences }
    }

    /// Resolve one disease span.
    pub fn decide(&self, disease: &DiseaseSpan) -> LinkDecision<'a> {
        let Some(idx) = self.sentences.index_of(disease.span.start) else {
            return LinkDecision::OutsideSentences;
        };
        let Some(sentence) = self.sentences.get(idx) else {
            return LinkDecision::OutsideSentences;
        };

        if let Some(gene) = self.nearest_in(sentence, &disease.span) {
            return LinkDecision::SameSentence(gene);
        }

        let previous = idx.checked_sub(1).and_then(|i| self.sentences.get(i));
        if let Some(gene) = previous.and_then(|s| self.unique_gene_in(s)) {
            return LinkDecision::PreviousSentence(gene);
        }

        if let Some(gene) = self.sentences.get(idx + 1).and_then(|s| self.unique_gene_in(s)) {
            return LinkDecision::NextSentence(gene);
        }

        LinkDecision::Dropped
    }

    /// Gene whose closest mention inside `sentence` is nearest the disease.
    fn nearest_in(&self, sentence: &Span, disease: &Span) -> Option<&'a GeneMention> {
        let center = disease.midpoint();
        let mut best: Option<(&'a GeneMention, f64)> = None;

        for gene in self.genes {
            let distance = gene
                .mentions_within(sentence)
                .map(|m| (m.midpoint() - center).abs())
                .min_by(f64::total_cmp);

            if let Some(d) = distance {
                if best.map_or(true, |(_, best_d)| d < best_d) {
                    best = Some((gene, d));
                }
            }
        }

        best.map(|(gene, _)| gene)
    }

    /// The gene mentioned in `sentence` if exactly one distinct symbol is.
    fn unique_gene_in(&self, sentence: &Span) -> Option<&'a GeneMention> {
        let mut found: Option<&'a GeneMention> = None;
        for gene in self.genes.iter().filter(|g| g.is_mentioned_within(sentence)) {
            match found {
                None => found = Some(gene),
                Some(prev) if prev.symbol == gene.symbol => {}
                Some(_) => return None,
            }
        }
        found
    }

    /// Link every disease span, accumulating associations.
    pub fn link_all(&self, diseases: &[DiseaseSpan]) -> (Associations, LinkReport) {
        let mut associations = Associations::new();
        let mut report = LinkReport::default();

        for disease in diseases {
            let name = disease.name();
            if name.is_empty() {
                continue;
            }

            let decision = self.decide(disease);
            match &decision {
                LinkDecision::SameSentence(_) => report.same_sentence += 1,
                LinkDecision::PreviousSentence(_) => report.previous_sentence += 1,
                LinkDecision::NextSentence(_) => report.next_sentence += 1,
                LinkDecision::Dropped => report.dropped += 1,
                LinkDecision::OutsideSentences => report.outside_sentences += 1,
            }

            if let Some(gene) = decision.gene() {
                associations.add(&gene.symbol, name);
            }
            debug!(disease = name, start = disease.span.start, decision = ?decision.gene().map(|g| &g.symbol), "linked");
        }

        debug!(
            pairs = associations.pair_count(),
            linked = report.linked(),
            dropped = report.dropped,
            outside = report.outside_sentences,
            "linking done"
        );
        (associations, report)
    }
}

/// Convenience wrapper: link `diseases` to `genes` over `sentences`.
pub fn link_diseases(
    genes: &[GeneMention],
    sentences: &Sentences,
    diseases: &[DiseaseSpan],
) -> (Associations, LinkReport) {
    Linker::new(genes, sentences).link_all(diseases)
}
