//! Whitespace tokenizer producing located raw tokens.
//!
//! Input text is trimmed before scanning, and every [`Location`] refers to
//! the trimmed text. Offsets count characters (Unicode scalar values), not
//! bytes, so they stay meaningful for non-ASCII notes.

use std::{iter::Peekable, str::CharIndices};

use serde::Serialize;

/// Position of a token inside the trimmed document text.
///
/// `line` is 1-indexed; `[start, end)` are character offsets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
)]
pub struct Location {
    pub line: usize,
    pub start: usize,
    pub end: usize,
}

impl Location {
    /// Number of characters covered by this location.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A token as it appears in the text, before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawToken<'a> {
    pub lexeme: &'a str,
    pub location: Location,
}

/// Split `text` into whitespace-separated tokens.
///
/// The returned iterator borrows the text and is cheap to clone, so a
/// sequence can be restarted by cloning it before consumption or by
/// calling `tokenize` again.
///
/// # Examples
///
/// ```
/// use notehero::tokenizer::tokenize;
///
/// let tokens: Vec<_> = tokenize("  hello\nworld ").collect();
/// assert_eq!(tokens.len(), 2);
/// assert_eq!(tokens[1].lexeme, "world");
/// assert_eq!(tokens[1].location.line, 2);
/// assert_eq!(tokens[1].location.start, 6);
/// ```
pub fn tokenize(text: &str) -> Tokens<'_> {
    let text = text.trim();
    Tokens {
        text,
        chars: text.char_indices().peekable(),
        position: 0,
        line: 1,
    }
}

/// Iterator over the [`RawToken`]s of a document. Created by [`tokenize`].
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    text: &'a str,
    chars: Peekable<CharIndices<'a>>,
    /// Character offset of the next unread character.
    position: usize,
    line: usize,
}

impl Tokens<'_> {
    fn skip_whitespace(&mut self) {
        while let Some(&(_, c)) = self.chars.peek() {
            if !c.is_whitespace() {
                break;
            }
            if c == '\n' {
                self.line += 1;
            }
            self.chars.next();
            self.position += 1;
        }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = RawToken<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();

        let &(byte_start, _) = self.chars.peek()?;
        let start = self.position;
        let line = self.line;

        let mut byte_end = self.text.len();
        while let Some(&(idx, c)) = self.chars.peek() {
            if c.is_whitespace() {
                byte_end = idx;
                break;
            }
            self.chars.next();
            self.position += 1;
        }

        Some(RawToken {
            lexeme: &self.text[byte_start..byte_end],
            location: Location {
                line,
                start,
                end: self.position,
            },
        })
    }
}

impl std::iter::FusedIterator for Tokens<'_> {}
