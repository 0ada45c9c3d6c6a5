//! The batch of documents an index is built from.

use std::{
    collections::{BTreeMap, HashMap, btree_map::Entry},
    io::Read,
    path::Path,
};

use serde::Deserialize;

use crate::error::{Error, Result};

/// One document of a corpus batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: u64,
    pub text: String,
}

/// Wire shape of a document in a JSON corpus file. `text` may be null or
/// absent, which is rejected when the corpus is assembled.
#[derive(Debug, Deserialize)]
struct RawDocument {
    id: u64,
    #[serde(default)]
    text: Option<String>,
}

impl TryFrom<RawDocument> for Document {
    type Error = Error;

    fn try_from(raw: RawDocument) -> Result<Self> {
        let text = raw.text.ok_or(Error::MissingText { id: raw.id })?;
        Ok(Self { id: raw.id, text })
    }
}

/// A keyed collection of document texts.
///
/// Ids are unique. Iteration is in ascending id order so that everything
/// derived from a corpus is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    documents: BTreeMap<u64, String>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document, rejecting an id that is already present.
    pub fn insert(&mut self, id: u64, text: impl Into<String>) -> Result<()> {
        match self.documents.entry(id) {
            Entry::Occupied(_) => Err(Error::DuplicateDocument { id }),
            Entry::Vacant(slot) => {
                slot.insert(text.into());
                Ok(())
            }
        }
    }

    /// Collect documents, failing on the first repeated id.
    pub fn from_documents(
        documents: impl IntoIterator<Item = Document>,
    ) -> Result<Self> {
        let mut corpus = Self::new();
        for doc in documents {
            corpus.insert(doc.id, doc.text)?;
        }
        Ok(corpus)
    }

    /// Parse a JSON array of `{"id": <u64>, "text": <string>}` objects.
    ///
    /// # Examples
    ///
    /// ```
    /// use notehero::corpus::Corpus;
    ///
    /// let json = r#"[
    ///     {"id": 1, "text": "cat sat"},
    ///     {"id": 2, "text": "dog"}
    /// ]"#;
    /// let corpus = Corpus::from_json_reader(json.as_bytes()).unwrap();
    /// assert_eq!(corpus.len(), 2);
    /// assert_eq!(corpus.get(2), Some("dog"));
    /// ```
    pub fn from_json_reader(reader: impl Read) -> Result<Self> {
        let raw: Vec<RawDocument> = serde_json::from_reader(reader)?;
        let documents = raw
            .into_iter()
            .map(Document::try_from)
            .collect::<Result<Vec<_>>>()?;
        Self::from_documents(documents)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_json_reader(std::io::BufReader::new(file))
    }

    pub fn get(&self, id: u64) -> Option<&str> {
        self.documents.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// `(id, text)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &str)> {
        self.documents.iter().map(|(id, text)| (*id, text.as_str()))
    }

    pub(crate) fn as_map(&self) -> &BTreeMap<u64, String> {
        &self.documents
    }
}

impl From<HashMap<u64, String>> for Corpus {
    fn from(documents: HashMap<u64, String>) -> Self {
        Self {
            documents: documents.into_iter().collect(),
        }
    }
}

impl From<BTreeMap<u64, String>> for Corpus {
    fn from(documents: BTreeMap<u64, String>) -> Self {
        Self { documents }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_rejects_duplicate_ids() {
        let mut corpus = Corpus::new();
        corpus.insert(1, "first").unwrap();
        let err = corpus.insert(1, "second").unwrap_err();
        assert!(matches!(err, Error::DuplicateDocument { id: 1 }));
        assert_eq!(corpus.get(1), Some("first"));
    }

    #[test]
    fn from_documents_keeps_every_text() {
        let corpus = Corpus::from_documents([
            Document {
                id: 7,
                text: "seven".into(),
            },
            Document {
                id: 2,
                text: String::new(),
            },
        ])
        .unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.get(2), Some(""));
        assert_eq!(corpus.get(7), Some("seven"));
    }

    #[test]
    fn iteration_is_sorted_by_id() {
        let corpus = Corpus::from(HashMap::from([
            (3, "c".to_string()),
            (1, "a".to_string()),
            (2, "b".to_string()),
        ]));
        let ids: Vec<_> = corpus.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn json_null_text_is_rejected() {
        let json = r#"[{"id": 1, "text": "ok"}, {"id": 2, "text": null}]"#;
        let err = Corpus::from_json_reader(json.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MissingText { id: 2 }));
    }

    #[test]
    fn json_missing_text_is_rejected() {
        let json = r#"[{"id": 9}]"#;
        let err = Corpus::from_json_reader(json.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MissingText { id: 9 }));
    }

    #[test]
    fn json_duplicate_id_is_rejected() {
        let json = r#"[{"id": 1, "text": "a"}, {"id": 1, "text": "b"}]"#;
        let err = Corpus::from_json_reader(json.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::DuplicateDocument { id: 1 }));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let err = Corpus::from_json_reader("{not json".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn from_json_file_reads_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("corpus.json");
        std::fs::write(&path, r#"[{"id": 4, "text": "hello"}]"#).unwrap();

        let corpus = Corpus::from_json_file(&path).unwrap();
        assert_eq!(corpus.get(4), Some("hello"));
    }
}
