//! The in-memory inverted index produced by [`crate::builder`].
//!
//! An index is immutable once built. A changed corpus needs a full
//! rebuild; there is no update or merge.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{normalizer::Lexeme, tokenizer::Location};

/// A term's weight in one document, with where it occurs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Posting {
    score: f64,
    occurrences: Vec<Location>,
}

impl Posting {
    pub(crate) fn new(score: f64, occurrences: Vec<Location>) -> Self {
        Self { score, occurrences }
    }

    /// TF-IDF weight, `tf * ln(N / df)`.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Locations of the term inside the document, in scan order.
    pub fn occurrences(&self) -> &[Location] {
        &self.occurrences
    }
}

/// Postings of one term, keyed by document id.
pub type Postings = BTreeMap<u64, Posting>;

/// Mapping `lexeme -> document id -> posting`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvertedIndex {
    document_count: usize,
    terms: BTreeMap<Lexeme, Postings>,
}

impl InvertedIndex {
    pub(crate) fn with_document_count(document_count: usize) -> Self {
        Self {
            document_count,
            terms: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(
        &mut self,
        term: Lexeme,
        doc_id: u64,
        posting: Posting,
    ) {
        self.terms.entry(term).or_default().insert(doc_id, posting);
    }

    /// Size of the corpus the index was built from (`N`).
    pub fn document_count(&self) -> usize {
        self.document_count
    }

    /// Number of distinct indexed lexemes.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    pub fn postings(&self, term: &str) -> Option<&Postings> {
        self.terms.get(term)
    }

    /// The stored lexeme and its postings.
    pub fn lookup(&self, term: &str) -> Option<(&Lexeme, &Postings)> {
        self.terms.get_key_value(term)
    }

    pub fn get(&self, term: &str, doc_id: u64) -> Option<&Posting> {
        self.terms.get(term)?.get(&doc_id)
    }

    /// Number of documents holding a posting for `term`.
    ///
    /// Pruning removes a term from every document at once, so for any
    /// indexed term this equals its corpus document frequency.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.terms.get(term).map_or(0, BTreeMap::len)
    }

    /// Indexed lexemes in sorted order.
    pub fn terms(&self) -> impl Iterator<Item = &Lexeme> {
        self.terms.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Lexeme, &Postings)> {
        self.terms.iter()
    }

    /// Every `(term, posting)` pair of one document, in lexeme order.
    pub fn document_terms(
        &self,
        doc_id: u64,
    ) -> impl Iterator<Item = (&Lexeme, &Posting)> {
        self.terms.iter().filter_map(move |(term, postings)| {
            postings.get(&doc_id).map(|posting| (term, posting))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{normalizer::Normalizer, stopwords::Stopwords};

    fn lexeme(word: &str) -> Lexeme {
        let stopwords = Stopwords::none();
        Normalizer::new(&stopwords).normalize(word).unwrap()
    }

    fn loc(line: usize, start: usize, end: usize) -> Location {
        Location { line, start, end }
    }

    fn sample() -> InvertedIndex {
        let mut index = InvertedIndex::with_document_count(3);
        index.insert(lexeme("cat"), 1, Posting::new(0.4, vec![loc(1, 0, 3)]));
        index.insert(lexeme("cat"), 2, Posting::new(0.4, vec![loc(1, 0, 3)]));
        index.insert(lexeme("dog"), 3, Posting::new(1.1, vec![loc(1, 0, 3)]));
        index
    }

    #[test]
    fn lookups_by_term_and_document() {
        let index = sample();
        assert_eq!(index.document_count(), 3);
        assert_eq!(index.len(), 2);
        assert!(index.contains("cat"));
        assert_eq!(index.postings("cat").unwrap().len(), 2);
        assert_eq!(index.get("dog", 3).unwrap().score(), 1.1);
        assert!(index.get("dog", 1).is_none());
        assert!(index.get("bird", 1).is_none());
    }

    #[test]
    fn document_frequency_counts_postings() {
        let index = sample();
        assert_eq!(index.document_frequency("cat"), 2);
        assert_eq!(index.document_frequency("dog"), 1);
        assert_eq!(index.document_frequency("bird"), 0);
    }

    #[test]
    fn document_terms_lists_one_document() {
        let index = sample();
        let terms: Vec<_> = index
            .document_terms(1)
            .map(|(term, _)| term.as_str())
            .collect();
        assert_eq!(terms, vec!["cat"]);
        assert_eq!(index.document_terms(42).count(), 0);
    }

    #[test]
    fn serializes_as_nested_maps() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["document_count"], 3);
        assert_eq!(json["terms"]["dog"]["3"]["score"], 1.1);
        assert_eq!(json["terms"]["cat"]["1"]["occurrences"][0]["end"], 3);
    }
}
