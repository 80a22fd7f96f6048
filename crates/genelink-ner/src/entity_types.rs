//! Entity type classification and label normalisation.

use std::collections::HashMap;

/// Normalised entity type for labels reported by NER models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum EntityType {
    Gene,
    Disease,
    Chemical,
    Species,
    CellLine,
    Other,
}

// Model-specific labels keyed in upper case
fn get_label_map() -> &'static HashMap<&'static str, EntityType> {
    use std::sync::OnceLock;
    static LABEL_MAP: OnceLock<HashMap<&'static str, EntityType>> = OnceLock::new();
    LABEL_MAP.get_or_init(|| {
        let mut m = HashMap::new();

        // BC5CDR (SciSpacy en_ner_bc5cdr_md)
        m.insert("DISEASE", EntityType::Disease);
        m.insert("CHEMICAL", EntityType::Chemical);

        // NCBI Disease corpus
        m.insert("SPECIFICDISEASE", EntityType::Disease);
        m.insert("DISEASECLASS", EntityType::Disease);
        m.insert("MODIFIER", EntityType::Disease);
        m.insert("COMPOSITEMENTION", EntityType::Disease);

        // BioNLP / CRAFT
        m.insert("CANCER", EntityType::Disease);
        m.insert("GGP", EntityType::Gene);
        m.insert("GENE", EntityType::Gene);
        m.insert("GENE_OR_GENE_PRODUCT", EntityType::Gene);
        m.insert("SIMPLE_CHEMICAL", EntityType::Chemical);
        m.insert("TAXON", EntityType::Species);
        m.insert("ORGANISM", EntityType::Species);
        m.insert("CELL_LINE", EntityType::CellLine);
        m.insert("CELL_TYPE", EntityType::CellLine);

        m
    })
}

/// Normalise a model-specific entity label to an [`EntityType`].
/// BIO prefixes (`B-`, `I-`) and letter case are ignored.
pub fn normalize_entity_label(label: &str) -> EntityType {
    let clean = label
        .trim()
        .trim_start_matches("B-")
        .trim_start_matches("I-")
        .to_uppercase();

    get_label_map()
        .get(clean.as_str())
        .copied()
        .unwrap_or(EntityType::Other)
}
