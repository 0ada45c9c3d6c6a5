use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Debug, Parser)]
#[command(
    name = "notehero",
    about = "Full-text TF-IDF search for your notes"
)]
pub struct Cli {
    /// Read settings from this JSON file instead of the XDG config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Newline-delimited stopword list (default: bundled English list)
    #[arg(long, global = true)]
    pub stopwords: Option<PathBuf>,

    /// Worker threads for tokenizing documents
    #[arg(long, global = true)]
    pub threads: Option<usize>,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the index and look up keywords
    Search(SearchArgs),
    /// Show corpus and index statistics
    Stats(StatsArgs),
    /// List the indexed terms of one document
    Terms(TermsArgs),
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

// -- Corpus source --

#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Directory of notes to index
    #[arg(required_unless_present = "corpus", conflicts_with = "corpus")]
    pub dir: Option<PathBuf>,

    /// JSON file with an array of {"id", "text"} documents
    #[arg(long)]
    pub corpus: Option<PathBuf>,

    /// Note file extension to include (repeatable; default: md, txt)
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Only index notes whose relative path matches this glob
    #[arg(long, value_name = "PATTERN", conflicts_with = "corpus")]
    pub glob: Option<String>,
}

// -- Search --

#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// Whitespace-separated keywords; any of them may match
    pub query: String,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Number of documents to show
    #[arg(short = 'n', long, default_value = "10")]
    pub count: usize,

    /// Show every matching document
    #[arg(long)]
    pub all: bool,

    /// Look keywords up verbatim instead of normalizing them
    #[arg(long)]
    pub literal: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Stats --

#[derive(Debug, Parser)]
pub struct StatsArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Number of most widespread terms to list
    #[arg(long, default_value = "10")]
    pub top: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Terms --

#[derive(Debug, Parser)]
pub struct TermsArgs {
    /// Document id (notes are numbered from 1 in path order)
    pub doc_id: u64,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "notehero",
            &mut std::io::stdout(),
        );
    }
}
