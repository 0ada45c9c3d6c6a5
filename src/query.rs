//! Keyword lookup against a built [`InvertedIndex`].
//!
//! A query is split on whitespace and every keyword is looked up on its
//! own. A document matches when it has a posting for any keyword (OR
//! semantics). The engine does not rank; [`SearchResults::ranked`] is a
//! convenience for callers that want an order.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    index::{InvertedIndex, Posting},
    normalizer::{Lexeme, Normalizer},
};

/// One matched `(document, term)` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit<'a> {
    pub doc_id: u64,
    pub term: &'a Lexeme,
    pub posting: &'a Posting,
}

/// The set of hits for a query, unique per `(document, term)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults<'a> {
    hits: BTreeMap<(u64, &'a Lexeme), &'a Posting>,
}

/// A document's combined weight across the terms it matched.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedDocument<'a> {
    pub doc_id: u64,
    pub score: f64,
    pub terms: Vec<&'a Lexeme>,
}

impl<'a> SearchResults<'a> {
    fn add_term(&mut self, index: &'a InvertedIndex, term: &str) {
        let Some((lexeme, postings)) = index.lookup(term) else {
            tracing::trace!(term, "no postings for keyword");
            return;
        };
        for (doc_id, posting) in postings {
            self.hits.insert((*doc_id, lexeme), posting);
        }
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Hit<'a>> + '_ {
        self.hits.iter().map(|(&(doc_id, term), &posting)| Hit {
            doc_id,
            term,
            posting,
        })
    }

    /// Ids of every matched document.
    pub fn document_ids(&self) -> BTreeSet<u64> {
        self.hits.keys().map(|(doc_id, _)| *doc_id).collect()
    }

    /// Sum each document's scores and order by descending total, then by
    /// ascending id.
    pub fn ranked(&self) -> Vec<RankedDocument<'a>> {
        let mut by_doc: BTreeMap<u64, RankedDocument<'a>> = BTreeMap::new();
        for hit in self.iter() {
            let entry = by_doc.entry(hit.doc_id).or_insert(RankedDocument {
                doc_id: hit.doc_id,
                score: 0.0,
                terms: Vec::new(),
            });
            entry.score += hit.posting.score();
            entry.terms.push(hit.term);
        }

        let mut ranked: Vec<_> = by_doc.into_values().collect();
        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.doc_id.cmp(&b.doc_id))
        });
        ranked
    }
}

/// Search `index`, normalizing each keyword the same way documents were
/// normalized at build time.
///
/// Keywords that normalize to nothing (stopwords, numbers, punctuation)
/// are ignored.
///
/// # Examples
///
/// ```
/// use notehero::{builder, corpus::Corpus, normalizer::Normalizer, query,
///     stopwords::Stopwords};
///
/// let mut corpus = Corpus::new();
/// corpus.insert(1, "cat sat mat").unwrap();
/// corpus.insert(2, "cat ran").unwrap();
/// corpus.insert(3, "dog sat").unwrap();
///
/// let stopwords = Stopwords::bundled();
/// let index = builder::build(&corpus, &stopwords).unwrap();
/// let normalizer = Normalizer::new(&stopwords);
/// let results = query::search(&index, "Cat dog", &normalizer);
///
/// let ids: Vec<_> = results.document_ids().into_iter().collect();
/// assert_eq!(ids, vec![1, 2, 3]);
/// ```
pub fn search<'a>(
    index: &'a InvertedIndex,
    query: &str,
    normalizer: &Normalizer<'_>,
) -> SearchResults<'a> {
    let mut results = SearchResults::default();
    for keyword in query.split_whitespace() {
        match normalizer.normalize(keyword) {
            Some(term) => results.add_term(index, term.as_str()),
            None => tracing::debug!(keyword, "keyword dropped by normalizer"),
        }
    }
    results
}

/// Search `index` with each whitespace-separated keyword used verbatim.
///
/// Index keys are normalized lexemes, so a keyword only matches when it is
/// already lowercase and free of punctuation.
pub fn search_literal<'a>(
    index: &'a InvertedIndex,
    query: &str,
) -> SearchResults<'a> {
    let mut results = SearchResults::default();
    for keyword in query.split_whitespace() {
        results.add_term(index, keyword);
    }
    results
}
