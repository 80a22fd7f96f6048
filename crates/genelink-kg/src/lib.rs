//! genelink-kg: gene–disease association building.
//!
//! Turns regex gene mentions, sentence spans and accepted disease spans into
//! gene → disease associations with a sentence-proximity heuristic.

pub mod linking;

pub use linking::{link_diseases, LinkDecision, LinkReport, Linker};
