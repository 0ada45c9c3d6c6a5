//! English stopword set used by the normalizer.
//!
//! The set is an ordinary value: build it once with one of the
//! constructors below and hand it to [`crate::normalizer::Normalizer`].

use std::{collections::HashSet, path::Path};

use crate::error::{Error, Result};

/// Word list compiled into the binary, one lowercase word per line.
const BUNDLED_LIST: &str = include_str!("../resources/english_stopwords.txt");

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    /// The English list shipped with the crate.
    pub fn bundled() -> Self {
        Self::parse(BUNDLED_LIST)
    }

    /// An empty set that rejects nothing.
    pub fn none() -> Self {
        Self::default()
    }

    /// Parse a newline-delimited word list.
    ///
    /// Runs of newlines are treated as one separator and words are stored
    /// lowercased.
    pub fn parse(list: &str) -> Self {
        let words = list
            .split('\n')
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.is_empty())
            .map(str::to_lowercase)
            .collect();
        Self { words }
    }

    /// Read a word list from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let list =
            std::fs::read_to_string(path).map_err(|source| Error::Stopwords {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::parse(&list))
    }

    /// Resolve the stopword set for an index build.
    ///
    /// `None` selects the bundled list. A list that cannot be read is
    /// logged and replaced by [`Stopwords::none`].
    pub fn load_or_permissive(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::bundled();
        };

        match Self::load(path) {
            Ok(words) => {
                tracing::debug!(
                    path = %path.display(),
                    count = words.len(),
                    "loaded stopword list"
                );
                words
            }
            Err(e) => {
                tracing::warn!(
                    "{e}; continuing without stopword filtering"
                );
                Self::none()
            }
        }
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, word: &str) -> bool {
        if word.chars().any(char::is_uppercase) {
            self.words.contains(&word.to_lowercase())
        } else {
            self.words.contains(word)
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
