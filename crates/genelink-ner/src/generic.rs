//! Generic disease-term heuristic.
//!
//! NER models happily tag phrases like "disease", "autosomal recessive" or
//! "rare genetic disorder". These carry no specific disease and are never
//! linked to a gene.

use regex::Regex;

/// Qualifiers that make a disease phrase non-specific.
const GENERIC_PARTS: &[&str] = &[
    "single", "system", "single-system", "multi", "multisystem", "multi-system",
    "systemic", "common", "rare", "genetic", "hereditary", "familial", "unknown",
    "autosomal", "dominant", "recessive", "tall", "stature", "short",
];

/// Head nouns that are generic on their own.
const GENERIC_HEADS: &[&str] = &["disease", "syndrome", "disorder"];

fn separator_regex() -> &'static Regex {
    use std::sync::OnceLock;
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\s-]+").unwrap())
}

fn all_generic(phrase: &str) -> bool {
    separator_regex()
        .split(phrase)
        .all(|part| GENERIC_PARTS.contains(&part))
}

/// Upper-case acronym test: at least one cased letter and no lower-case ones.
fn is_acronym(s: &str) -> bool {
    s.chars().any(char::is_uppercase) && !s.chars().any(char::is_lowercase)
}

/// Whether `term` is too generic to be recorded as a specific disease.
pub fn is_generic(term: &str) -> bool {
    let orig = term.trim();
    let t = orig.to_lowercase();

    // Named syndromes with an acronym prefix, e.g. "SHORT syndrome"
    if let Some(prefix) = orig.strip_suffix(" syndrome") {
        let prefix = prefix.trim_matches(|c| matches!(c, ' ' | ',' | ';' | ':' | '-'));
        if !prefix.is_empty() && is_acronym(prefix) {
            return false;
        }
    }

    if GENERIC_HEADS.contains(&t.as_str()) {
        return true;
    }

    // "<qualifiers> disease|syndrome|disorder"
    for head in GENERIC_HEADS {
        if let Some(prefix) = t.strip_suffix(head) {
            let prefix = prefix.trim_matches(|c| matches!(c, ' ' | '-' | ';' | ','));
            if prefix.is_empty() || all_generic(prefix) {
                return true;
            }
        }
    }

    // One or two descriptive words, e.g. "autosomal recessive", "short stature"
    let n_parts = separator_regex().split(&t).count();
    n_parts <= 2 && all_generic(&t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_heads_are_generic() {
        assert!(is_generic("disease"));
        assert!(is_generic("Syndrome"));
        assert!(is_generic(" disorder "));
    }

    #[test]
    fn test_qualified_heads_are_generic() {
        assert!(is_generic("rare disease"));
        assert!(is_generic("hereditary genetic disorder"));
        assert!(is_generic("multi-system disease"));
        assert!(is_generic("familial syndrome"));
    }

    #[test]
    fn test_descriptive_pairs_are_generic() {
        assert!(is_generic("autosomal recessive"));
        assert!(is_generic("autosomal dominant"));
        assert!(is_generic("short stature"));
        assert!(is_generic("tall stature"));
        assert!(is_generic("single-system"));
    }

    #[test]
    fn test_acronym_syndromes_are_specific() {
        assert!(!is_generic("SHORT syndrome"));
        assert!(!is_generic("CHARGE syndrome"));
        assert!(!is_generic("3-M syndrome"));
    }

    #[test]
    fn test_specific_diseases_pass() {
        assert!(!is_generic("Noonan syndrome"));
        assert!(!is_generic("Alzheimer disease"));
        assert!(!is_generic("cystic fibrosis"));
        assert!(!is_generic("hypertrophic cardiomyopathy"));
        assert!(!is_generic("familial adenomatous polyposis"));
    }

    #[test]
    fn test_long_descriptive_phrase_is_not_caught_by_pair_rule() {
        // Three qualifiers without a generic head fall outside the two-word rule.
        assert!(!is_generic("rare autosomal recessive"));
    }
}
