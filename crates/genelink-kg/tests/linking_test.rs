//! Dictionary NER output linked over real sentence segmentation.

use genelink_common::{GeneMention, Span};
use genelink_kg::link_diseases;
use genelink_ner::{is_generic, Sentences, TrieNer};
use pretty_assertions::assert_eq;

const TEXT: &str = "Pathogenic PTPN11 variants cause Noonan syndrome and juvenile myelomonocytic leukemia. \
KRAS was also screened. Costello syndrome was excluded. \
Carriers of SOS1 and RAF1 variants showed autosomal dominant inheritance.";

fn genes(text: &str, symbols: &[&str]) -> Vec<GeneMention> {
    symbols
        .iter()
        .map(|sym| {
            let mut gene = GeneMention::new(*sym, None);
            gene.mentions = text
                .match_indices(sym)
                .map(|(start, m)| Span::new(start, start + m.len()))
                .collect();
            gene
        })
        .collect()
}

#[test]
fn test_dictionary_spans_link_to_genes() {
    let ner = TrieNer::with_embedded_vocabulary().unwrap();
    let spans = ner.extract(TEXT);
    let names: Vec<&str> = spans.iter().map(|d| d.text.as_str()).collect();
    assert_eq!(
        names,
        vec!["Noonan syndrome", "juvenile myelomonocytic leukemia", "Costello syndrome", "autosomal dominant"]
    );

    let accepted: Vec<_> = spans.into_iter().filter(|d| !is_generic(d.name())).collect();
    assert_eq!(accepted.len(), 3);

    let genes = genes(TEXT, &["PTPN11", "KRAS", "SOS1", "RAF1"]);
    let sentences = Sentences::split(TEXT);
    assert_eq!(sentences.len(), 4);

    let (associations, report) = link_diseases(&genes, &sentences, &accepted);

    let ptpn11: Vec<&str> = associations.diseases_for("PTPN11").unwrap().iter().map(String::as_str).collect();
    assert_eq!(ptpn11, vec!["Noonan syndrome", "juvenile myelomonocytic leukemia"]);
    let kras: Vec<&str> = associations.diseases_for("KRAS").unwrap().iter().map(String::as_str).collect();
    assert_eq!(kras, vec!["Costello syndrome"]);
    assert!(associations.diseases_for("SOS1").is_none());

    assert_eq!(report.same_sentence, 2);
    assert_eq!(report.previous_sentence, 1);
    assert_eq!(report.linked(), 3);
}
