// vorschlag-cli: shared utilities for CLI tools.

use std::path::{Path, PathBuf};
use std::process;

use clap::Args;
use tracing::{debug, warn};
use vorschlag_de::{AffixDictionary, ConfigError, SuggesterConfig};

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "VORSCHLAG_DATA_DIR";

/// Dictionary file name looked for in data directories.
const DIC_FILE: &str = "de_DE.dic";

/// Resource options shared by every tool.
#[derive(Debug, Clone, Default, Args)]
pub struct ResourceArgs {
    /// JSON config file; explicit flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding de_DE.dic, de_DE.aff, frequency.txt and history.txt
    #[arg(short = 'D', long)]
    pub data_dir: Option<PathBuf>,

    /// Word list (.dic)
    #[arg(short, long)]
    pub dictionary: Option<PathBuf>,

    /// Affix rules (.aff)
    #[arg(short, long)]
    pub affix: Option<PathBuf>,

    /// Log filter, e.g. info or vorschlag_de=debug
    #[arg(short, long, default_value_t = String::from("warn"))]
    pub verbose: String,
}

impl ResourceArgs {
    /// Merge the config file, explicit flags and the first data directory
    /// found on the search path, in that order of precedence (flags first).
    pub fn to_config(&self) -> Result<SuggesterConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => SuggesterConfig::from_json_file(path)?,
            None => SuggesterConfig::default(),
        };
        if self.dictionary.is_some() {
            config.dictionary = self.dictionary.clone();
        }
        if self.affix.is_some() {
            config.affix = self.affix.clone();
        }
        if let Some(dir) = find_data_dir(&search_paths(self.data_dir.as_deref())) {
            debug!(dir = %dir.display(), "using data directory");
            let affix = config.affix.clone();
            config = config.with_data_dir(&dir);
            // The data directory's affix rules belong to its own word list
            if self.dictionary.is_some() && self.affix.is_none() {
                config.affix = affix;
            }
        }
        Ok(config)
    }

    /// Load only the dictionary, for the tools that do not rank.
    pub fn load_dictionary(&self) -> Result<Option<AffixDictionary>, String> {
        let config = self.to_config().map_err(|e| e.to_string())?;
        let Some(dic) = config.dictionary else {
            warn!("no dictionary found, every word counts as unknown");
            return Ok(None);
        };
        AffixDictionary::load(&dic, config.affix.as_deref())
            .map(Some)
            .map_err(|e| e.to_string())
    }
}

/// Install the stderr log subscriber.
pub fn init_logging(filter: &str) {
    tracing_subscriber::fmt()
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Directories searched for resource files.
///
/// Search order:
/// 1. `explicit` argument (if provided)
/// 2. `VORSCHLAG_DATA_DIR` environment variable
/// 3. `~/.local/share/vorschlag`
/// 4. `/usr/share/vorschlag`
/// 5. Current working directory
pub fn search_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    build_search_paths(
        explicit,
        std::env::var_os(DATA_DIR_ENV).map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
        std::env::current_dir().ok(),
    )
}

fn build_search_paths(
    explicit: Option<&Path>,
    env_dir: Option<PathBuf>,
    home: Option<PathBuf>,
    cwd: Option<PathBuf>,
) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(p) = explicit {
        paths.push(p.to_path_buf());
    }
    paths.extend(env_dir);
    if let Some(home) = home {
        paths.push(home.join(".local").join("share").join("vorschlag"));
    }
    paths.push(PathBuf::from("/usr/share/vorschlag"));
    paths.extend(cwd);
    paths
}

/// The first directory that contains a dictionary.
pub fn find_data_dir(paths: &[PathBuf]) -> Option<PathBuf> {
    paths.iter().find(|dir| dir.join(DIC_FILE).is_file()).cloned()
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

/// Words from the arguments, or from stdin (one per line) if there are none.
pub fn words_or_stdin(words: Vec<String>) -> Box<dyn Iterator<Item = String>> {
    use std::io::BufRead;

    if !words.is_empty() {
        return Box::new(words.into_iter());
    }
    let lines = std::io::stdin().lock().lines().map_while(|line| match line {
        Ok(l) => Some(l),
        Err(e) => {
            eprintln!("error reading stdin: {e}");
            None
        }
    });
    Box::new(
        lines
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty()),
    )
}
