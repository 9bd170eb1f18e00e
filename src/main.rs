//! Initialize a dictionary tree, then show what the did-you-mean word cache
//! suggests for some prefix.

use anyhow::Context;
use clap::Parser;
use dict_bootstrap::{Config, DictionaryContext, Result, TAG_PREFIX};
use log::LevelFilter;
use std::{
    io::{self, BufWriter, Write},
    path::PathBuf,
};

/// Bootstrap the optional dictionaries of a dictionary tree
///
/// Raw dictionary files are expected in the `source/` subdirectory of the
/// tree. Derived files are written next to it, in `didyoumean/` and
/// `autotagging/`.
#[derive(Parser, Debug)]
#[command(version, author)]
struct Args {
    /// Root directory of the dictionary tree
    #[arg(short, long, default_value = "DATA/DICTIONARIES")]
    root: PathBuf,

    /// Prefix whose did-you-mean recommendations should be displayed
    #[arg(short, long, default_value = "da")]
    prefix: Box<str>,

    /// Keep the case of DeReWo words instead of lowercasing them
    ///
    /// This only affects word lists that are derived by this run.
    #[arg(long, default_value_t = false)]
    keep_case: bool,

    /// Character that prefixes autotagging tags
    #[arg(long, default_value_t = TAG_PREFIX)]
    tag_prefix: char,
}
//
impl Args {
    /// Decode and validate CLI arguments
    pub fn parse_and_check() -> Result<Self> {
        // Decode CLI arguments
        let args = Args::parse();

        // Check CLI arguments for basic sanity
        anyhow::ensure!(
            !args.prefix.trim().is_empty(),
            "the recommendation prefix should not be empty"
        );
        anyhow::ensure!(
            !args.tag_prefix.is_alphanumeric() && !args.tag_prefix.is_whitespace(),
            "the tag prefix should be a punctuation character"
        );
        Ok(args)
    }

    /// Bootstrap configuration
    pub fn config(&self) -> Config {
        let mut config = Config::new(&self.root);
        config.lowercase_words = !self.keep_case;
        config.tag_prefix = self.tag_prefix;
        config
    }
}

fn main() -> Result<()> {
    // Set up logging
    setup_logging().map_err(|e| anyhow::format_err!("{e}"))?;

    // Decode CLI arguments
    let args = Args::parse_and_check()?;

    // Bring up the dictionaries
    let dictionaries = DictionaryContext::initialize(args.config());
    let word_cache = dictionaries.word_cache();

    // Display what the word cache knows about the prefix
    let recommendations = word_cache.recommend(&args.prefix);
    let mut stdout = BufWriter::new(io::stdout().lock());
    write_report(&mut stdout, args.tag_prefix, word_cache.size(), &recommendations)
        .context("writing to stdout")?;
    stdout.flush().context("flushing stdout")?;
    Ok(())
}

/// Write the word cache size, then one tagged line per recommendation
fn write_report(
    out: &mut impl Write,
    tag_prefix: char,
    size: usize,
    recommendations: &[&str],
) -> io::Result<()> {
    writeln!(out, "dymDict-size = {size}")?;
    for word in recommendations {
        writeln!(out, "{tag_prefix} {word}")?;
    }
    writeln!(out, "recommendations: {}", recommendations.len())
}

/// Set up logging
fn setup_logging() -> syslog::Result<()> {
    syslog::init(
        syslog::Facility::LOG_USER,
        if cfg!(feature = "log-trace") {
            LevelFilter::Trace
        } else if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        },
        None,
    )
}
