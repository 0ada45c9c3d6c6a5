//! Layered settings for index builds.
//!
//! Each setting is resolved from, in order of priority:
//! 1. Command-line flags
//! 2. `NOTEHERO_*` environment variables
//! 3. `config.json` in the XDG config directory (`~/.config/notehero/`),
//!    or the file named by `NOTEHERO_CONFIG`
//! 4. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{
    error::{Error, Result},
    walker::DEFAULT_EXTENSIONS,
};

pub const ENV_CONFIG: &str = "NOTEHERO_CONFIG";
pub const ENV_STOPWORDS: &str = "NOTEHERO_STOPWORDS";
pub const ENV_THREADS: &str = "NOTEHERO_THREADS";

const CONFIG_FILE_NAME: &str = "config.json";

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_file: Option<PathBuf>,
    pub stopwords: Option<PathBuf>,
    pub threads: Option<usize>,
    pub extensions: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    stopwords: Option<PathBuf>,
    threads: Option<usize>,
    extensions: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Stopword list to load; `None` uses the bundled English list.
    pub stopwords: Option<PathBuf>,
    /// Worker count for the per-document phase; `None` uses rayon's
    /// default pool.
    pub threads: Option<usize>,
    /// Note file extensions, without the dot.
    pub extensions: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stopwords: None,
            threads: None,
            extensions: DEFAULT_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl Settings {
    /// Resolve settings against the process environment.
    pub fn resolve(overrides: &Overrides) -> Result<Self> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve settings with an explicit environment lookup.
    pub fn resolve_with(
        overrides: &Overrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let config_path = match &overrides.config_file {
            Some(path) => Some(path.clone()),
            None => env(ENV_CONFIG)
                .map(PathBuf::from)
                .or_else(default_config_path),
        };
        let file = match config_path {
            Some(path) => load_file(&path, overrides.config_file.is_some())?,
            None => FileConfig::default(),
        };

        let defaults = Self::default();

        let stopwords = overrides
            .stopwords
            .clone()
            .or_else(|| env(ENV_STOPWORDS).map(PathBuf::from))
            .or(file.stopwords);

        let threads = match overrides.threads {
            Some(n) => Some(n),
            None => match env(ENV_THREADS) {
                Some(raw) => Some(raw.trim().parse().map_err(|_| {
                    Error::Config(format!(
                        "{ENV_THREADS} is not a number: {raw}"
                    ))
                })?),
                None => file.threads,
            },
        };
        if threads == Some(0) {
            return Err(Error::Config("thread count must be at least 1".into()));
        }

        let extensions = if !overrides.extensions.is_empty() {
            overrides.extensions.clone()
        } else {
            file.extensions.unwrap_or(defaults.extensions)
        };
        if extensions.is_empty() {
            return Err(Error::Config(
                "at least one note extension is required".into(),
            ));
        }

        Ok(Self {
            stopwords,
            threads,
            extensions,
        })
    }
}

fn default_config_path() -> Option<PathBuf> {
    xdg::BaseDirectories::with_prefix("notehero")
        .get_config_home()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Read a config file. A missing file is only an error when it was named
/// explicitly.
fn load_file(path: &Path, required: bool) -> Result<FileConfig> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
            return Ok(FileConfig::default());
        }
        Err(e) => {
            return Err(Error::Config(format!(
                "cannot read {}: {e}",
                path.display()
            )));
        }
    };

    tracing::debug!(path = %path.display(), "loaded config file");
    serde_json::from_str(&contents)
        .map_err(|e| Error::Config(format!("invalid {}: {e}", path.display())))
}
