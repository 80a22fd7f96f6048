//! Regex-based gene mention extraction.
//!
//! Two passes over the text:
//! - explicit mentions carrying an HGNC id, e.g. `TP53 (HGNC:11998)`
//! - mentions in a variant context, e.g. `mutations in the PTPN11`
//!
//! Symbols are upper-cased and each distinct symbol yields one
//! [`GeneMention`] in first-seen order.

use std::collections::HashMap;
use std::sync::OnceLock;
use genelink_common::{GeneMention, Span};
use regex::Regex;

fn explicit_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b([A-Z0-9-]+)\s*\([^)]*HGNC:(\d+)\)").unwrap())
}

fn context_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)(?:(?:variant|variants|mutation|mutations|VUS|VUSs)\s+in\s+(?:the\s+|a\s+)?)([A-Z0-9-]+)\b",
        )
        .unwrap()
    })
}

/// Accumulates mentions keyed by symbol while keeping insertion order.
#[derive(Default)]
struct GeneTable {
    genes: Vec<GeneMention>,
    index: HashMap<String, usize>,
}

impl GeneTable {
    fn entry(&mut self, symbol: String) -> &mut GeneMention {
        let idx = match self.index.get(&symbol) {
            Some(&idx) => idx,
            None => {
                self.genes.push(GeneMention::new(symbol.clone(), None));
                self.index.insert(symbol, self.genes.len() - 1);
                self.genes.len() - 1
            }
        };
        &mut self.genes[idx]
    }
}

/// Find gene mentions in `text`. Mention spans are byte offsets of the
/// symbol itself.
pub fn extract_genes(text: &str) -> Vec<GeneMention> {
    let mut table = GeneTable::default();

    for caps in explicit_re().captures_iter(text) {
        let (Some(sym), Some(id)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let gene = table.entry(sym.as_str().to_uppercase());
        if gene.hgnc_id.is_none() {
            gene.hgnc_id = id.as_str().parse().ok();
        }
        gene.mentions.push(Span::new(sym.start(), sym.end()));
    }

    for caps in context_re().captures_iter(text) {
        let Some(sym) = caps.get(1) else {
            continue;
        };
        table
            .entry(sym.as_str().to_uppercase())
            .mentions
            .push(Span::new(sym.start(), sym.end()));
    }

    table.genes
}
