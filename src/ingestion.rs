use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use rayon::prelude::*;

use crate::{
    corpus::Corpus,
    error::Result,
    walker::{self, FileFilter},
};

const FRONT_MATTER_DELIMITER: &str = "---";

/// Remove a leading YAML front matter block from a note.
///
/// The (trimmed) note must open with `---`; the block ends at the next
/// `---` after the opening line. Notes without a complete block are
/// returned trimmed but otherwise untouched. The YAML is not parsed.
///
/// # Examples
///
/// ```
/// use notehero::ingestion::strip_front_matter;
///
/// let note = "---\ntitle: Groceries\n---\n\nmilk and eggs";
/// assert_eq!(strip_front_matter(note), "milk and eggs");
/// assert_eq!(strip_front_matter("plain note"), "plain note");
/// ```
pub fn strip_front_matter(source: &str) -> &str {
    let trimmed = source.trim();
    if !trimmed.starts_with(FRONT_MATTER_DELIMITER) {
        return trimmed;
    }

    // Skip the opening delimiter and the line break after it.
    let body_start = FRONT_MATTER_DELIMITER.len() + 1;
    let closing = trimmed
        .get(body_start..)
        .and_then(|rest| rest.find(FRONT_MATTER_DELIMITER))
        .map(|idx| idx + body_start);

    match closing {
        Some(end) => trimmed[end + FRONT_MATTER_DELIMITER.len()..].trim(),
        None => {
            tracing::debug!("front matter not terminated, indexing whole note");
            trimmed
        }
    }
}

/// Notes read from a directory, ready to index.
#[derive(Debug, Clone, Default)]
pub struct LoadedNotes {
    pub corpus: Corpus,
    /// Relative path of each document id.
    pub paths: BTreeMap<u64, PathBuf>,
}

impl LoadedNotes {
    pub fn path_of(&self, doc_id: u64) -> Option<&Path> {
        self.paths.get(&doc_id).map(PathBuf::as_path)
    }
}

/// Read every note under `root` into a [`Corpus`].
///
/// Files are read in parallel and decoded as UTF-8, with invalid bytes
/// replaced. A file that cannot be read is logged and left out. Ids are
/// assigned from 1 in relative-path order over the notes that were read,
/// so they never skip a number.
pub fn load_directory(root: &Path, filter: &FileFilter) -> Result<LoadedNotes> {
    let files = walker::discover_files(root, filter)?;
    tracing::debug!(
        count = files.len(),
        root = %root.display(),
        "discovered notes"
    );

    let loaded: Vec<_> = files
        .par_iter()
        .filter_map(|file| match std::fs::read(&file.absolute_path) {
            Ok(bytes) => {
                let content = String::from_utf8_lossy(&bytes);
                let text = strip_front_matter(&content).to_string();
                Some((file.relative_path.clone(), text))
            }
            Err(e) => {
                tracing::warn!(
                    path = %file.absolute_path.display(),
                    "skipping unreadable note: {e}"
                );
                None
            }
        })
        .collect();

    let mut notes = LoadedNotes::default();
    for (doc_id, (relative_path, text)) in (1..).zip(loaded) {
        notes.corpus.insert(doc_id, text)?;
        notes.paths.insert(doc_id, relative_path);
    }

    Ok(notes)
}
