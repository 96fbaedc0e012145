// vorschlag-suggest: Complete German word prefixes.
//
// Prints the completions of each prefix on one line:
//   prefix: word1 word2 ...
//
// Prefixes come from the arguments, or from stdin (one per line) if none
// are given. Words passed with --accept are recorded as typed before any
// prefix is completed, and are appended to the history log.
//
// Usage:
//   vorschlag-suggest [-D DATA_DIR] [-d DIC] [-a AFF] [-f FREQ] [OPTIONS] [PREFIX...]

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use vorschlag_cli::ResourceArgs;
use vorschlag_de::Suggester;

#[derive(Parser)]
#[command(name = "vorschlag-suggest", about = "Complete German word prefixes")]
struct Cli {
    #[command(flatten)]
    resources: ResourceArgs,

    /// Frequency corpus, one word per line, most frequent first
    #[arg(short, long)]
    frequency: Option<PathBuf>,

    /// History log
    #[arg(short = 'H', long)]
    history: Option<PathBuf>,

    /// Packed index cache file
    #[arg(long)]
    index_cache: Option<PathBuf>,

    /// Answer from the prefix index instead of the packed index
    #[arg(long)]
    fallback: bool,

    /// Maximum number of completions per prefix
    #[arg(short = 'n', long)]
    max_results: Option<usize>,

    /// Record a word as typed by the user (repeatable)
    #[arg(long)]
    accept: Vec<String>,

    /// Print the score after each completion
    #[arg(short, long)]
    scores: bool,

    /// Prefixes to complete
    prefixes: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    vorschlag_cli::init_logging(&cli.resources.verbose);

    let mut config = cli
        .resources
        .to_config()
        .unwrap_or_else(|e| vorschlag_cli::fatal(&e.to_string()));
    if cli.frequency.is_some() {
        config.frequency = cli.frequency;
    }
    if cli.history.is_some() {
        config.history = cli.history;
    }
    if cli.index_cache.is_some() {
        config.index_cache = cli.index_cache;
    }
    if let Some(n) = cli.max_results {
        config.max_results = n;
    }
    config.accelerated &= !cli.fallback;

    let mut suggester = Suggester::new(&config);
    for word in &cli.accept {
        suggester.record_usage(word);
    }
    info!(accelerated = suggester.is_accelerated(), "answering queries");

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    for prefix in vorschlag_cli::words_or_stdin(cli.prefixes) {
        let line = if cli.scores {
            suggester
                .suggest_scored(&prefix)
                .iter()
                .map(|(word, score)| format!("{word} ({score:.3})"))
                .collect::<Vec<_>>()
                .join(" ")
        } else {
            suggester.suggest(&prefix).join(" ")
        };
        if writeln!(out, "{prefix}: {line}").is_err() {
            // Broken pipe
            break;
        }
    }
}
