// vorschlag-check: Check words against the dictionary and its affix rules.
//
// Output format:
//   C: word    (known)
//   W: word    (unknown)
// With --expand, every known word is followed by the forms its dictionary
// entry generates:
//   F: form
//
// Usage:
//   vorschlag-check [-D DATA_DIR] [-d DIC] [-a AFF] [-e] [WORD...]

use std::io::{self, Write};

use clap::Parser;
use vorschlag_cli::ResourceArgs;
use vorschlag_de::MorphologicalExpander;

#[derive(Parser)]
#[command(name = "vorschlag-check", about = "Check German words")]
struct Cli {
    #[command(flatten)]
    resources: ResourceArgs,

    /// Also print the surface forms of each known word
    #[arg(short, long)]
    expand: bool,

    /// Words to check
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
        let result = if expander.has_dictionary() && expander.is_valid(&word) {
            writeln!(out, "C: {word}").and_then(|()| {
                if !cli.expand {
                    return Ok(());
                }
                for form in expander.expand_lemma(&word).iter().skip(1) {
                    writeln!(out, "F: {form}")?;
                }
                Ok(())
            })
        } else {
            writeln!(out, "W: {word}")
        };
        if result.is_err() {
            break;
        }
    }
}
