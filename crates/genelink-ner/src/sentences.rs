//! Sentence segmentation over article text.
//!
//! Uses Unicode sentence boundaries (UAX #29). Each sentence span excludes
//! surrounding whitespace; whitespace-only segments are dropped.

use genelink_common::Span;
use unicode_segmentation::UnicodeSegmentation;

/// Ordered, non-overlapping sentence spans of one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sentences {
    spans: Vec<Span>,
}

impl Sentences {
    /// Segment `text` into sentences.
    pub fn split(text: &str) -> Self {
        let spans = text
            .split_sentence_bound_indices()
            .filter_map(|(offset, sentence)| {
                let lead = sentence.len() - sentence.trim_start().len();
                let trimmed = sentence.trim();
                if trimmed.is_empty() {
                    return None;
                }
                let start = offset + lead;
                Some(Span::new(start, start + trimmed.len()))
            })
            .collect();
        Self { spans }
    }

    /// Index of the sentence containing byte `offset`.
    pub fn index_of(&self, offset: usize) -> Option<usize> {
        // First sentence whose end is beyond the offset
        let idx = self.spans.partition_point(|s| s.end <= offset);
        self.spans
            .get(idx)
            .filter(|s| s.start <= offset)
            .map(|_| idx)
    }

    pub fn get(&self, index: usize) -> Option<&Span> {
        self.spans.get(index)
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_trims_whitespace() {
        let text = "TP53 is mutated. Patients had Li-Fraumeni syndrome.  Done.";
        let s = Sentences::split(text);
        assert_eq!(s.len(), 3);
        let first = s.get(0).unwrap();
        assert_eq!(&text[first.start..first.end], "TP53 is mutated.");
        let second = s.get(1).unwrap();
        assert_eq!(&text[second.start..second.end], "Patients had Li-Fraumeni syndrome.");
        let third = s.get(2).unwrap();
        assert_eq!(&text[third.start..third.end], "Done.");
    }

    #[test]
    fn test_index_of_offsets() {
        let text = "First one. Second one.";
        let s = Sentences::split(text);
        assert_eq!(s.index_of(0), Some(0));
        assert_eq!(s.index_of(9), Some(0));
        // The space between sentences belongs to neither
        assert_eq!(s.index_of(10), None);
        assert_eq!(s.index_of(11), Some(1));
        assert_eq!(s.index_of(text.len()), None);
    }

    #[test]
    fn test_empty_text() {
        assert!(Sentences::split("").is_empty());
        assert!(Sentences::split("   ").is_empty());
    }
}
