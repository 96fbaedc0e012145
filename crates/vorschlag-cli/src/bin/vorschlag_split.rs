// vorschlag-split: Split German compounds into dictionary words.
//
// Prints each word with its parts joined by '+', or the word alone if it
// cannot be split:
//   Kindergarten: Kinder+garten
//
// Usage:
//   vorschlag-split [-D DATA_DIR] [-d DIC] [-a AFF] [-m MIN_LEN] [WORD...]

use std::io::{self, Write};

use clap::Parser;
use vorschlag_cli::ResourceArgs;
use vorschlag_de::MorphologicalExpander;

#[derive(Parser)]
#[command(name = "vorschlag-split", about = "Split German compounds")]
struct Cli {
    #[command(flatten)]
    resources: ResourceArgs,

    /// Minimum length of each part, in characters
    #[arg(short, long, default_value_t = vorschlag_de::morphology::DEFAULT_MIN_COMPOUND_PART)]
    min_len: usize,

    /// Words to split
    words: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    vorschlag_cli::init_logging(&cli.resources.verbose);

    let dictionary = cli
        .resources
        .load_dictionary()
        .unwrap_or_else(|e| vorschlag_cli::fatal(&e));
    let expander = MorphologicalExpander::from_dictionary(dictionary);

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    for word in vorschlag_cli::words_or_stdin(cli.words) {
        let parts = expander.split_compound(&word, cli.min_len);
        let shown = if parts.is_empty() {
            "(unknown)".to_string()
        } else {
            parts.join("+")
        };
        if writeln!(out, "{word}: {shown}").is_err() {
            break;
        }
    }
}
