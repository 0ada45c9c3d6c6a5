use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot build an index from an empty corpus")]
    EmptyCorpus,

    #[error("document {id} has no text")]
    MissingText { id: u64 },

    #[error("document id {id} appears more than once in the corpus")]
    DuplicateDocument { id: u64 },

    #[error("could not read stopword list {}: {source}", path.display())]
    Stopwords {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },
}

impl Error {
    /// Whether this error rejects the input batch itself, as opposed to an
    /// environment or resource failure.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::EmptyCorpus
                | Error::MissingText { .. }
                | Error::DuplicateDocument { .. }
        )
    }
}
