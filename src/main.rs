use std::{collections::BTreeMap, path::PathBuf, process::ExitCode};

use clap::Parser;
use notehero::{
    Corpus,
    Error,
    IndexBuilder,
    InvertedIndex,
    Normalizer,
    Result,
    Settings,
    Stopwords,
    config::Overrides,
    ingestion,
    query::{self, SearchResults},
    walker::FileFilter,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Command, SearchArgs, SourceArgs, StatsArgs, TermsArgs};

/// Exit status when the corpus itself is unusable.
const EXIT_BAD_INPUT: u8 = 2;

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("NOTEHERO_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            if e.is_input_error() {
                ExitCode::from(EXIT_BAD_INPUT)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Search(args) => {
            let built = BuiltIndex::from_source(cli, &args.source)?;
            cmd_search(&built, args)
        }
        Command::Stats(args) => {
            let built = BuiltIndex::from_source(cli, &args.source)?;
            cmd_stats(&built, args)
        }
        Command::Terms(args) => {
            let built = BuiltIndex::from_source(cli, &args.source)?;
            cmd_terms(&built, args)
        }
        Command::Completions(args) => {
            args.generate();
            Ok(())
        }
    }
}

/// An index together with what is needed to present its results.
struct BuiltIndex {
    index: InvertedIndex,
    corpus: Corpus,
    stopwords: Stopwords,
    /// Relative note paths, when the corpus came from a directory.
    paths: BTreeMap<u64, PathBuf>,
}

impl BuiltIndex {
    fn from_source(cli: &Cli, source: &SourceArgs) -> Result<Self> {
        let settings = Settings::resolve(&Overrides {
            config_file: cli.config.clone(),
            stopwords: cli.stopwords.clone(),
            threads: cli.threads,
            extensions: source.extensions.clone(),
        })?;

        let (corpus, paths) = match (&source.dir, &source.corpus) {
            (_, Some(file)) => {
                (Corpus::from_json_file(file)?, BTreeMap::new())
            }
            (Some(dir), None) => {
                let mut filter = FileFilter::new(&settings.extensions);
                if let Some(pattern) = &source.glob {
                    filter = filter.with_include(pattern)?;
                }
                let notes = ingestion::load_directory(dir, &filter)?;
                (notes.corpus, notes.paths)
            }
            (None, None) => {
                return Err(Error::Config(
                    "a notes directory or --corpus file is required".into(),
                ));
            }
        };

        let stopwords =
            Stopwords::load_or_permissive(settings.stopwords.as_deref());
        let index = IndexBuilder::new(&stopwords)
            .threads(settings.threads)
            .build(&corpus)?;

        tracing::info!(
            documents = index.document_count(),
            terms = index.len(),
            "index built"
        );

        Ok(Self {
            index,
            corpus,
            stopwords,
            paths,
        })
    }

    fn label(&self, doc_id: u64) -> String {
        match self.paths.get(&doc_id) {
            Some(path) => format!("{} #{doc_id}", path.display()),
            None => format!("#{doc_id}"),
        }
    }
}

fn cmd_search(built: &BuiltIndex, args: &SearchArgs) -> Result<()> {
    let results: SearchResults<'_> = if args.literal {
        query::search_literal(&built.index, &args.query)
    } else {
        let normalizer = Normalizer::new(&built.stopwords);
        query::search(&built.index, &args.query, &normalizer)
    };

    let ranked = results.ranked();
    let limit = if args.all { ranked.len() } else { args.count };

    if args.json {
        let rows: Vec<_> = ranked
            .iter()
            .take(limit)
            .map(|doc| {
                let hits: Vec<_> = results
                    .iter()
                    .filter(|hit| hit.doc_id == doc.doc_id)
                    .map(|hit| {
                        json!({
                            "term": hit.term,
                            "score": hit.posting.score(),
                            "occurrences": hit.posting.occurrences(),
                        })
                    })
                    .collect();
                json!({
                    "doc_id": doc.doc_id,
                    "path": built.paths.get(&doc.doc_id),
                    "score": doc.score,
                    "hits": hits,
                })
            })
            .collect();
        let out = json!({
            "query": args.query,
            "result_count": ranked.len(),
            "results": rows,
        });
        println!("{}", serde_json::to_string(&out)?);
        return Ok(());
    }

    if ranked.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    for (rank, doc) in ranked.iter().take(limit).enumerate() {
        println!(
            "{:>3}. [{:.3}] {}",
            rank + 1,
            doc.score,
            built.label(doc.doc_id)
        );
        for hit in results.iter().filter(|hit| hit.doc_id == doc.doc_id) {
            let lines: Vec<_> = hit
                .posting
                .occurrences()
                .iter()
                .map(|loc| loc.line.to_string())
                .collect();
            println!(
                "     {} ({:.3}) line {}",
                hit.term,
                hit.posting.score(),
                lines.join(", ")
            );
        }
    }
    println!("\n{} matching document(s)", ranked.len());
    Ok(())
}

fn cmd_stats(built: &BuiltIndex, args: &StatsArgs) -> Result<()> {
    let index = &built.index;

    let mut widespread: Vec<_> = index
        .iter()
        .map(|(term, postings)| (term.as_str(), postings.len()))
        .collect();
    widespread.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    widespread.truncate(args.top);

    if args.json {
        let top: Vec<_> = widespread
            .iter()
            .map(|(term, df)| {
                json!({ "term": term, "document_frequency": df })
            })
            .collect();
        let out = json!({
            "documents": index.document_count(),
            "terms": index.len(),
            "stopwords": built.stopwords.len(),
            "top_terms": top,
        });
        println!("{}", serde_json::to_string(&out)?);
        return Ok(());
    }

    println!("Documents: {}", index.document_count());
    println!("Indexed terms: {}", index.len());
    println!("Stopwords: {}", built.stopwords.len());
    if !widespread.is_empty() {
        println!("Most widespread terms:");
        for (term, df) in &widespread {
            println!("  {term}\t{df}");
        }
    }
    Ok(())
}

fn cmd_terms(built: &BuiltIndex, args: &TermsArgs) -> Result<()> {
    if built.corpus.get(args.doc_id).is_none() {
        return Err(Error::NotFound {
            kind: "document",
            name: format!("#{}", args.doc_id),
        });
    }

    let mut terms: Vec<_> = built.index.document_terms(args.doc_id).collect();
    terms.sort_by(|a, b| {
        b.1.score()
            .total_cmp(&a.1.score())
            .then_with(|| a.0.cmp(b.0))
    });

    if args.json {
        let rows: Vec<_> = terms
            .iter()
            .map(|(term, posting)| {
                json!({
                    "term": term,
                    "score": posting.score(),
                    "occurrences": posting.occurrences(),
                })
            })
            .collect();
        let out = json!({
            "doc_id": args.doc_id,
            "path": built.paths.get(&args.doc_id),
            "terms": rows,
        });
        println!("{}", serde_json::to_string(&out)?);
        return Ok(());
    }

    println!("{}", built.label(args.doc_id));
    if terms.is_empty() {
        println!("No indexed terms.");
        return Ok(());
    }
    for (term, posting) in &terms {
        let locations: Vec<_> = posting
            .occurrences()
            .iter()
            .map(|loc| format!("{}:{}-{}", loc.line, loc.start, loc.end))
            .collect();
        println!(
            "  {:<20} {:>7.3}  {}",
            term.as_str(),
            posting.score(),
            locations.join(" ")
        );
    }
    Ok(())
}
