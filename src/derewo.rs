//! Translation of the DeReWo frequency list into a did-you-mean word list
//!
//! DeReWo is distributed as a ZIP archive holding a single text entry. That
//! entry starts with a free-form header block, terminated by a `# -----` ruler
//! line and a blank line, followed by one `word frequency` record per line.
//! We only keep the words, which we store sorted and deduplicated, one per
//! line, in a `.words` file of the did-you-mean directory.

use crate::{
    config::Config,
    paths::{self, Paths},
    sources::Dictionary,
    Result, Word,
};
use anyhow::Context;
use std::{
    collections::BTreeSet,
    fs::{self, File},
    io::{self, BufRead, BufReader, Write},
    path::{Path, PathBuf},
};
use zip::ZipArchive;

/// Name of the frequency list inside of the DeReWo archive
pub const DEREWO_ENTRY: &str = "derewo-v-100000t-2009-04-30-0.1";

/// Extension of did-you-mean word lists
pub const WORDS_EXTENSION: &str = "words";

/// Prefix of the line that ends the header of the frequency list
const HEADER_END: &str = "# -----";

/// Outcome of a DeReWo activation request
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum Activation {
    /// No DeReWo archive was staged
    SourceAbsent,

    /// The word list was derived by an earlier run
    AlreadyTranslated,

    /// The word list was derived from the archive
    Translated {
        /// Number of distinct words that were written
        words: usize,
    },
}

/// Location of the word list derived from the DeReWo archive
pub fn words_file(paths: &Paths) -> PathBuf {
    paths.dym_dir().join(format!(
        "{}.{WORDS_EXTENSION}",
        Dictionary::DeReWo0.filename()
    ))
}

/// Derive the did-you-mean word list from the DeReWo archive, once
///
/// Nothing is done if the archive is absent, or if the word list already
/// exists. On error, no word list is left behind, so that the next activation
/// can try again.
pub fn activate(paths: &Paths, config: &Config) -> Result<Activation> {
    let input = Dictionary::DeReWo0.file(paths);
    let output = words_file(paths);
    if !input.is_file() {
        log::debug!("No DeReWo archive at {}, skipping", input.display());
        return Ok(Activation::SourceAbsent);
    }
    if output.exists() {
        log::debug!("DeReWo word list {} already exists", output.display());
        return Ok(Activation::AlreadyTranslated);
    }
    let words = load_derewo(&input, config.lowercase_words, config.min_word_length)?;
    let words = write_words(&output, words)?;
    log::info!("Derived {words} words from {} into {}", input.display(), output.display());
    Ok(Activation::Translated { words })
}

/// Remove the derived word list, leaving the DeReWo archive alone
///
/// Returns truth that a word list was removed.
pub fn deactivate(paths: &Paths) -> Result<bool> {
    let output = words_file(paths);
    match fs::remove_file(&output) {
        Ok(()) => {
            log::info!("Removed DeReWo word list {}", output.display());
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("removing {}", output.display())),
    }
}

/// Extract the words of the DeReWo frequency list from its ZIP archive
///
/// Words are optionally lowercased, then those shorter than `min_length`
/// characters are dropped. Order and duplicates are preserved.
pub fn load_derewo(path: &Path, lowercase: bool, min_length: usize) -> Result<Vec<Word>> {
    let context = || format!("reading DeReWo archive {}", path.display());
    let file = File::open(path).with_context(context)?;
    let mut archive = ZipArchive::new(BufReader::new(file)).with_context(context)?;
    let entry = archive
        .by_name(DEREWO_ENTRY)
        .with_context(|| format!("looking up entry {DEREWO_ENTRY} in {}", path.display()))?;
    parse_frequency_list(BufReader::new(entry), lowercase, min_length).with_context(context)
}

/// Extract the words of a DeReWo frequency list
fn parse_frequency_list(
    reader: impl BufRead,
    lowercase: bool,
    min_length: usize,
) -> Result<Vec<Word>> {
    // Invalid UTF-8 only spoils the affected record
    let mut lines = reader
        .split(b'\n')
        .map(|line| line.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()));

    // Skip the header, then the blank line that follows it
    let mut header_found = false;
    for line in lines.by_ref() {
        if line?.starts_with(HEADER_END) {
            header_found = true;
            break;
        }
    }
    anyhow::ensure!(header_found, "no `{HEADER_END}` line terminates the header");
    lines.next().transpose()?;

    // Records are a word followed by its frequency, which we don't need
    let mut words = Vec::new();
    for line in lines {
        let line = line?;
        let line = line.trim();
        let Some((word, _frequency)) = line.split_once(' ') else {
            log::trace!("Rejected DeReWo line {line:?} without frequency");
            continue;
        };
        let word = if lowercase {
            word.to_lowercase()
        } else {
            word.to_owned()
        };
        if word.chars().count() < min_length {
            log::trace!("Rejected DeReWo word {word:?} because it's too short");
            continue;
        }
        words.push(word.into());
    }
    Ok(words)
}

/// Write a word list, sorted and deduplicated, one word per line
///
/// Any previous file at `path` is replaced, see [`paths::replace_file()`].
/// Returns the number of distinct words that were written.
pub fn write_words(path: &Path, words: impl IntoIterator<Item = Word>) -> Result<usize> {
    let words = words.into_iter().collect::<BTreeSet<_>>();
    paths::replace_file(path, |writer| {
        for word in &words {
            writer.write_all(word.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        Ok(())
    })
    .with_context(|| format!("writing word list {}", path.display()))?;
    Ok(words.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    const LIST: &str = "\
DeReWo frequency list
# some header comment
# -----

haus 1234
auto 900
ei 50
Baum 700
haus 12
";

    fn words(list: &[Word]) -> Vec<&str> {
        list.iter().map(|word| &**word).collect()
    }

    #[test]
    fn parse_lowercase() {
        let list = parse_frequency_list(LIST.as_bytes(), true, 4).unwrap();
        assert_eq!(words(&list), ["haus", "auto", "baum", "haus"]);
    }

    #[test]
    fn parse_keep_case() {
        let list = parse_frequency_list(LIST.as_bytes(), false, 4).unwrap();
        assert_eq!(words(&list), ["haus", "auto", "Baum", "haus"]);
    }

    #[test]
    fn parse_counts_characters() {
        let list = "# -----\n\nähre 10\nöl 5\n";
        let list = parse_frequency_list(list.as_bytes(), true, 4).unwrap();
        assert_eq!(words(&list), ["ähre"]);
    }

    #[test]
    fn parse_skips_separator_and_malformed_lines() {
        // The line after the ruler is consumed even if it holds a record
        let list = "# -----\nlost 1\nsolo\n   trimmed 3  \n";
        let list = parse_frequency_list(list.as_bytes(), true, 4).unwrap();
        assert_eq!(words(&list), ["trimmed"]);
    }

    #[test]
    fn parse_survives_invalid_utf8() {
        let list = b"# -----\n\nhaus 1234\nb\xE4ume 800\nauto 900\n";
        let list = parse_frequency_list(&list[..], true, 4).unwrap();
        assert_eq!(words(&list), ["haus", "b\u{FFFD}ume", "auto"]);
    }

    #[test]
    fn parse_requires_header() {
        assert!(parse_frequency_list("haus 1234\n".as_bytes(), true, 4).is_err());
    }

    #[test]
    fn write_sorted_unique() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.words");
        fs::write(&path, "stale\n").unwrap();
        let count = write_words(
            &path,
            ["haus", "auto", "baum", "haus"].map(Word::from),
        )
        .unwrap();
        assert_eq!(count, 3);
        assert_eq!(fs::read_to_string(&path).unwrap(), "auto\nbaum\nhaus\n");
    }

    #[test]
    fn load_from_archive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("derewo.zip");
        test_utils::write_zip(&path, &[(DEREWO_ENTRY, LIST.as_bytes())]);
        let list = load_derewo(&path, true, 4).unwrap();
        assert_eq!(words(&list), ["haus", "auto", "baum", "haus"]);
    }

    #[test]
    fn load_without_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("derewo.zip");
        test_utils::write_zip(&path, &[("something-else.txt", LIST.as_bytes())]);
        assert!(load_derewo(&path, true, 4).is_err());
    }

    #[test]
    fn load_not_an_archive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("derewo.zip");
        fs::write(&path, LIST).unwrap();
        assert!(load_derewo(&path, true, 4).is_err());
    }

    #[test]
    fn activation_lifecycle() {
        let root = tempfile::tempdir().unwrap();
        let paths = Paths::new(root.path());
        let config = Config::new(root.path());
        fs::create_dir_all(paths.source_dir()).unwrap();
        fs::create_dir_all(paths.dym_dir()).unwrap();

        assert_eq!(activate(&paths, &config).unwrap(), Activation::SourceAbsent);
        assert!(!deactivate(&paths).unwrap());

        test_utils::write_zip(
            &Dictionary::DeReWo0.file(&paths),
            &[(DEREWO_ENTRY, LIST.as_bytes())],
        );
        assert_eq!(
            activate(&paths, &config).unwrap(),
            Activation::Translated { words: 3 }
        );
        assert_eq!(
            activate(&paths, &config).unwrap(),
            Activation::AlreadyTranslated
        );
        assert!(deactivate(&paths).unwrap());
        assert!(!words_file(&paths).exists());
        assert!(Dictionary::DeReWo0.is_active(&paths));
    }

    #[test]
    fn failed_activation_leaves_nothing_behind() {
        let root = tempfile::tempdir().unwrap();
        let paths = Paths::new(root.path());
        let config = Config::new(root.path());
        fs::create_dir_all(paths.source_dir()).unwrap();
        fs::create_dir_all(paths.dym_dir()).unwrap();
        fs::write(Dictionary::DeReWo0.file(&paths), b"corrupt").unwrap();

        assert!(activate(&paths, &config).is_err());
        assert!(!words_file(&paths).exists());
        assert_eq!(fs::read_dir(paths.dym_dir()).unwrap().count(), 0);
    }
}
