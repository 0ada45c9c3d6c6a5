//! notehero - TF-IDF full-text search over a collection of personal notes.
//!
//! Notes are split into tokens with line and character positions,
//! normalized into lexemes, and weighted per document with
//! `count * ln(N / df)`. The resulting [`InvertedIndex`] maps each lexeme
//! to the documents that contain it, and [`query::search`] answers
//! keyword lookups against it.
//!
//! # Quick start
//!
//! ```
//! use notehero::{Corpus, IndexBuilder, Normalizer, Stopwords, query};
//!
//! let mut corpus = Corpus::new();
//! corpus.insert(1, "The cat sat on the mat").unwrap();
//! corpus.insert(2, "A cat ran").unwrap();
//! corpus.insert(3, "The dog sat").unwrap();
//!
//! let stopwords = Stopwords::bundled();
//! let index = IndexBuilder::new(&stopwords).build(&corpus).unwrap();
//!
//! let results = query::search(&index, "dog", &Normalizer::new(&stopwords));
//! for doc in results.ranked() {
//!     println!("#{} (score: {:.3})", doc.doc_id, doc.score);
//! }
//! ```

pub mod builder;
pub mod config;
pub mod corpus;
pub mod error;
pub mod frequency;
pub mod index;
pub mod ingestion;
pub mod normalizer;
pub mod query;
pub mod stopwords;
pub mod tokenizer;
pub mod walker;

pub use builder::IndexBuilder;
pub use config::Settings;
pub use corpus::{Corpus, Document};
pub use error::{Error, Result};
pub use index::{InvertedIndex, Posting};
pub use normalizer::{Lexeme, Normalizer};
pub use query::{SearchResults, search};
pub use stopwords::Stopwords;
pub use tokenizer::{Location, tokenize};
