//! Per-document term frequencies.

use std::collections::BTreeMap;

use crate::{
    normalizer::{Lexeme, Normalizer},
    tokenizer::{Location, tokenize},
};

/// How often a lexeme occurs in one document, and where.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermFrequencyEntry {
    count: usize,
    occurrences: Vec<Location>,
}

impl TermFrequencyEntry {
    fn record(&mut self, location: Location) {
        self.count += 1;
        self.occurrences.push(location);
    }

    /// Term frequency within the document. Always at least 1.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Locations in scan order.
    pub fn occurrences(&self) -> &[Location] {
        &self.occurrences
    }

    pub fn into_occurrences(self) -> Vec<Location> {
        self.occurrences
    }
}

/// The term-frequency map of a single document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTerms {
    id: u64,
    terms: BTreeMap<Lexeme, TermFrequencyEntry>,
}

impl DocumentTerms {
    /// Tokenize and normalize `text`, accumulating one entry per lexeme.
    pub fn build(id: u64, text: &str, normalizer: &Normalizer<'_>) -> Self {
        let mut terms: BTreeMap<Lexeme, TermFrequencyEntry> = BTreeMap::new();

        for token in tokenize(text) {
            if let Some(lexeme) = normalizer.normalize(token.lexeme) {
                terms.entry(lexeme).or_default().record(token.location);
            }
        }

        Self { id, terms }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn get(&self, term: &str) -> Option<&TermFrequencyEntry> {
        self.terms.get(term)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    /// Number of distinct lexemes.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Entries in lexeme order.
    pub fn iter(&self) -> impl Iterator<Item = (&Lexeme, &TermFrequencyEntry)> {
        self.terms.iter()
    }

    pub(crate) fn into_terms(self) -> BTreeMap<Lexeme, TermFrequencyEntry> {
        self.terms
    }
}
