//! Reduces raw tokens to canonical lexemes.

use std::{borrow::Borrow, fmt};

use serde::Serialize;

use crate::stopwords::Stopwords;

/// Minimum number of characters a lexeme must have.
pub const MIN_LEXEME_LEN: usize = 2;

/// A normalized search term.
///
/// Always lowercase ASCII alphanumerics, at least [`MIN_LEXEME_LEN`]
/// characters, not purely numeric, and not a stopword of the
/// [`Normalizer`] that produced it.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
)]
#[serde(transparent)]
pub struct Lexeme(String);

impl Lexeme {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Lexeme {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Lexeme {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turns raw token text into [`Lexeme`]s, filtering stopwords.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    stopwords: &'a Stopwords,
}

impl<'a> Normalizer<'a> {
    pub fn new(stopwords: &'a Stopwords) -> Self {
        Self { stopwords }
    }

    /// Normalize one raw token.
    ///
    /// Drops every character outside `[A-Za-z0-9]` and lowercases the
    /// rest. Returns `None` when the result is too short, all digits, or a
    /// stopword.
    ///
    /// # Examples
    ///
    /// ```
    /// use notehero::{normalizer::Normalizer, stopwords::Stopwords};
    ///
    /// let stopwords = Stopwords::bundled();
    /// let normalizer = Normalizer::new(&stopwords);
    ///
    /// assert_eq!(normalizer.normalize("Hello,").unwrap().as_str(), "hello");
    /// assert!(normalizer.normalize("The").is_none());
    /// assert!(normalizer.normalize("2024").is_none());
    /// ```
    pub fn normalize(&self, raw: &str) -> Option<Lexeme> {
        let cleaned: String = raw
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();

        if cleaned.len() < MIN_LEXEME_LEN
            || cleaned.bytes().all(|b| b.is_ascii_digit())
            || self.stopwords.contains(&cleaned)
        {
            return None;
        }

        Some(Lexeme(cleaned))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_bundled<T>(f: impl FnOnce(Normalizer<'_>) -> T) -> T {
        let stopwords = Stopwords::bundled();
        f(Normalizer::new(&stopwords))
    }

    #[test]
    fn strips_punctuation_and_lowercases() {
        with_bundled(|n| {
            assert_eq!(n.normalize("Rust's").unwrap().as_str(), "rusts");
            assert_eq!(n.normalize("(TF-IDF)").unwrap().as_str(), "tfidf");
            assert_eq!(n.normalize("**bold**").unwrap().as_str(), "bold");
        });
    }

    #[test]
    fn drops_non_ascii_letters() {
        with_bundled(|n| {
            assert_eq!(n.normalize("café").unwrap().as_str(), "caf");
            assert!(n.normalize("日本").is_none());
        });
    }

    #[test]
    fn rejects_short_tokens() {
        with_bundled(|n| {
            assert!(n.normalize("").is_none());
            assert!(n.normalize("x").is_none());
            assert!(n.normalize("-").is_none());
            assert!(n.normalize("x.").is_none());
        });
    }

    #[test]
    fn rejects_pure_numbers_but_keeps_mixed() {
        with_bundled(|n| {
            assert!(n.normalize("42").is_none());
            assert!(n.normalize("3.14").is_none());
            assert_eq!(n.normalize("v2").unwrap().as_str(), "v2");
            assert_eq!(n.normalize("2fa").unwrap().as_str(), "2fa");
        });
    }

    #[test]
    fn rejects_stopwords_after_cleanup() {
        with_bundled(|n| {
            assert!(n.normalize("The").is_none());
            assert!(n.normalize("and,").is_none());
            assert!(n.normalize("Which?").is_none());
        });
    }

    #[test]
    fn permissive_stopwords_keep_everything_else() {
        let stopwords = Stopwords::none();
        let n = Normalizer::new(&stopwords);
        assert_eq!(n.normalize("The").unwrap().as_str(), "the");
        assert!(n.normalize("1").is_none());
    }

    #[test]
    fn lexeme_borrows_as_str() {
        use std::collections::BTreeMap;

        with_bundled(|n| {
            let mut map = BTreeMap::new();
            map.insert(n.normalize("notes").unwrap(), 1);
            assert_eq!(map.get("notes"), Some(&1));
        });
    }
}
