//! TF-IDF index construction.
//!
//! A build runs in two phases:
//!
//! 1. Every document is tokenized and counted independently, fanned out
//!    over the rayon pool. Each worker owns the map it produces.
//! 2. On the calling thread, document frequencies are computed across all
//!    maps, each `(document, term)` pair is scored as
//!    `tf * ln(N / df)`, zero scores are dropped, and the survivors are
//!    inserted into the [`InvertedIndex`].
//!
//! A term present in every document scores exactly zero everywhere and is
//! therefore absent from the index.

use std::collections::{BTreeMap, HashMap};

use rayon::prelude::*;

use crate::{
    corpus::Corpus,
    error::{Error, Result},
    frequency::DocumentTerms,
    index::{InvertedIndex, Posting},
    normalizer::{Lexeme, Normalizer},
    stopwords::Stopwords,
};

/// Builds an [`InvertedIndex`] from a [`Corpus`].
#[derive(Debug, Clone, Copy)]
pub struct IndexBuilder<'a> {
    normalizer: Normalizer<'a>,
    threads: Option<usize>,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(stopwords: &'a Stopwords) -> Self {
        Self {
            normalizer: Normalizer::new(stopwords),
            threads: None,
        }
    }

    /// Run the per-document phase on a dedicated pool of `threads`
    /// workers instead of rayon's global pool.
    pub fn threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    /// Build the index for `corpus`.
    ///
    /// Fails with [`Error::EmptyCorpus`] when there is nothing to index;
    /// no partial index is ever returned.
    pub fn build(&self, corpus: &Corpus) -> Result<InvertedIndex> {
        if corpus.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        let documents = match self.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| {
                        Error::Config(format!("cannot start worker pool: {e}"))
                    })?;
                pool.install(|| self.term_frequencies(corpus))
            }
            None => self.term_frequencies(corpus),
        };

        Ok(score_documents(corpus.len(), documents))
    }

    /// Phase one: one [`DocumentTerms`] per document, in id order.
    pub fn term_frequencies(&self, corpus: &Corpus) -> Vec<DocumentTerms> {
        let normalizer = &self.normalizer;
        corpus
            .as_map()
            .par_iter()
            .map(|(id, text)| DocumentTerms::build(*id, text, normalizer))
            .collect()
    }
}

/// Build an index with default settings.
///
/// # Examples
///
/// ```
/// use notehero::{builder, corpus::Corpus, stopwords::Stopwords};
///
/// let mut corpus = Corpus::new();
/// corpus.insert(1, "cat sat mat").unwrap();
/// corpus.insert(2, "cat ran").unwrap();
/// corpus.insert(3, "dog sat").unwrap();
///
/// let index = builder::build(&corpus, &Stopwords::bundled()).unwrap();
/// let score = index.get("mat", 1).unwrap().score();
/// assert!((score - 3f64.ln()).abs() < 1e-12);
/// ```
pub fn build(corpus: &Corpus, stopwords: &Stopwords) -> Result<InvertedIndex> {
    IndexBuilder::new(stopwords).build(corpus)
}

/// Number of documents whose map contains each term.
pub fn document_frequencies(
    documents: &[DocumentTerms],
) -> BTreeMap<&Lexeme, usize> {
    let mut df: BTreeMap<&Lexeme, usize> = BTreeMap::new();
    for doc in documents {
        for (term, _) in doc.iter() {
            *df.entry(term).or_default() += 1;
        }
    }
    df
}

/// Phase two: score every `(document, term)` pair and assemble the index.
fn score_documents(
    corpus_size: usize,
    documents: Vec<DocumentTerms>,
) -> InvertedIndex {
    let n = corpus_size as f64;
    let idf: HashMap<Lexeme, f64> = document_frequencies(&documents)
        .into_iter()
        .map(|(term, df)| (term.clone(), (n / df as f64).ln()))
        .collect();

    tracing::debug!(
        documents = corpus_size,
        terms = idf.len(),
        "computed document frequencies"
    );

    let mut index = InvertedIndex::with_document_count(corpus_size);
    let mut pruned = 0usize;

    for doc in documents {
        let doc_id = doc.id();
        for (term, entry) in doc.into_terms() {
            let Some(&weight) = idf.get(&term) else {
                continue;
            };
            let score = entry.count() as f64 * weight;
            if score == 0.0 {
                pruned += 1;
                continue;
            }
            let posting = Posting::new(score, entry.into_occurrences());
            index.insert(term, doc_id, posting);
        }
    }

    tracing::debug!(terms = index.len(), pruned, "built inverted index");

    index
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const EPS: f64 = 1e-12;

    fn corpus(docs: &[(u64, &str)]) -> Corpus {
        let mut corpus = Corpus::new();
        for (id, text) in docs {
            corpus.insert(*id, *text).unwrap();
        }
        corpus
    }

    fn scenario_a() -> Corpus {
        corpus(&[(1, "cat sat mat"), (2, "cat ran"), (3, "dog sat")])
    }

    #[test]
    fn scores_follow_tf_idf() {
        let index = build(&scenario_a(), &Stopwords::bundled()).unwrap();
        let half = (3.0f64 / 2.0).ln();
        let third = 3.0f64.ln();

        assert_eq!(index.document_count(), 3);
        assert_eq!(index.len(), 5);

        for (term, doc, expected) in [
            ("cat", 1, half),
            ("cat", 2, half),
            ("sat", 1, half),
            ("sat", 3, half),
            ("mat", 1, third),
            ("ran", 2, third),
            ("dog", 3, third),
        ] {
            let score = index.get(term, doc).unwrap().score();
            assert!(
                (score - expected).abs() < EPS,
                "{term}@{doc}: {score} != {expected}"
            );
        }

        assert_eq!(index.document_frequency("cat"), 2);
        assert_eq!(index.document_frequency("dog"), 1);
    }

    #[test]
    fn empty_corpus_is_rejected() {
        let err = build(&Corpus::new(), &Stopwords::bundled()).unwrap_err();
        assert!(matches!(err, Error::EmptyCorpus));
        assert!(err.is_input_error());
    }

    #[test]
    fn term_in_every_document_is_pruned() {
        let corpus = corpus(&[(1, "notes alpha"), (2, "notes beta")]);
        let index = build(&corpus, &Stopwords::bundled()).unwrap();
        assert!(!index.contains("notes"));
        assert!(index.contains("alpha"));
        assert!(index.contains("beta"));
    }

    #[test]
    fn single_document_corpus_indexes_nothing() {
        let corpus = corpus(&[(1, "lonely words here")]);
        let index = build(&corpus, &Stopwords::bundled()).unwrap();
        assert_eq!(index.document_count(), 1);
        assert!(index.is_empty());
    }

    #[test]
    fn term_frequency_multiplies_score() {
        let corpus = corpus(&[(1, "rust rust rust"), (2, "python")]);
        let index = build(&corpus, &Stopwords::bundled()).unwrap();
        let posting = index.get("rust", 1).unwrap();
        assert!((posting.score() - 3.0 * 2.0f64.ln()).abs() < EPS);
        assert_eq!(posting.occurrences().len(), 3);
    }

    #[test]
    fn documents_without_lexemes_still_count_towards_n() {
        let corpus = corpus(&[(1, "rust"), (2, "the and of"), (3, "")]);
        let index = build(&corpus, &Stopwords::bundled()).unwrap();
        let score = index.get("rust", 1).unwrap().score();
        assert!((score - 3.0f64.ln()).abs() < EPS);
    }

    #[test]
    fn permissive_stopwords_index_stopwords() {
        let corpus = corpus(&[(1, "the cat"), (2, "dog")]);
        let index = build(&corpus, &Stopwords::none()).unwrap();
        assert!(index.contains("the"));
    }

    #[test]
    fn dedicated_pool_matches_global_pool() {
        let stopwords = Stopwords::bundled();
        let global =
            IndexBuilder::new(&stopwords).build(&scenario_a()).unwrap();
        let pooled = IndexBuilder::new(&stopwords)
            .threads(Some(2))
            .build(&scenario_a())
            .unwrap();
        assert_eq!(global, pooled);
    }

    #[test]
    fn document_frequencies_count_documents_not_occurrences() {
        let stopwords = Stopwords::bundled();
        let corpus = corpus(&[(1, "cat cat cat"), (2, "cat dog")]);
        let docs = IndexBuilder::new(&stopwords).term_frequencies(&corpus);
        let df = document_frequencies(&docs);
        assert_eq!(df.get(&docs[0].iter().next().unwrap().0), Some(&2));
        assert_eq!(df.len(), 2);
    }

    fn arb_corpus() -> impl Strategy<Value = Corpus> {
        let word = prop::sample::select(vec![
            "alpha", "beta", "gamma", "delta", "notes", "rust", "the", "42",
        ]);
        let text = prop::collection::vec(word, 0..12)
            .prop_map(|words| words.join(" "));
        prop::collection::btree_map(any::<u64>(), text, 1..8)
            .prop_map(Corpus::from)
    }

    proptest! {
        #[test]
        fn postings_respect_counts_and_bounds(corpus in arb_corpus()) {
            let stopwords = Stopwords::bundled();
            let builder = IndexBuilder::new(&stopwords);
            let index = builder.build(&corpus).unwrap();
            let docs = builder.term_frequencies(&corpus);
            let df = document_frequencies(&docs);
            let n = corpus.len();

            for (term, postings) in index.iter() {
                let term_df = df[term];
                prop_assert!(term_df >= 1 && term_df < n);
                prop_assert_eq!(postings.len(), term_df);
                for (doc_id, posting) in postings {
                    let doc = docs.iter().find(|d| d.id() == *doc_id).unwrap();
                    let entry = doc.get(term.as_str()).unwrap();
                    prop_assert_eq!(posting.occurrences().len(), entry.count());
                    prop_assert!(posting.score() > 0.0);
                }
            }
        }

        #[test]
        fn terms_in_every_document_never_appear(corpus in arb_corpus()) {
            let stopwords = Stopwords::bundled();
            let builder = IndexBuilder::new(&stopwords);
            let index = builder.build(&corpus).unwrap();
            let docs = builder.term_frequencies(&corpus);

            for (term, df) in document_frequencies(&docs) {
                if df == corpus.len() {
                    prop_assert!(!index.contains(term.as_str()));
                } else {
                    prop_assert!(index.contains(term.as_str()));
                }
            }
        }

        #[test]
        fn rebuilding_is_deterministic(corpus in arb_corpus()) {
            let stopwords = Stopwords::bundled();
            let first = build(&corpus, &stopwords).unwrap();
            let second = build(&corpus, &stopwords).unwrap();
            prop_assert_eq!(
                serde_json::to_string(&first).unwrap(),
                serde_json::to_string(&second).unwrap()
            );
        }
    }
}
