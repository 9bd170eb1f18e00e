//! Did-you-mean word cache
//!
//! The cache knows two kinds of words: dictionary words, loaded from the
//! `.words` lists of the did-you-mean directory, and common words that were
//! learned at runtime (e.g. autotagging terms). All words are stored in
//! lowercase, and lookups are case-insensitive.

use crate::{derewo::WORDS_EXTENSION, Result, Word};
use anyhow::Context;
use std::{
    collections::BTreeSet,
    fs::{self, File},
    io::{BufRead, BufReader},
    ops::Bound,
    path::Path,
};

/// Word cache used for query suggestions
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct WordCache {
    /// Words loaded from the word lists
    dictionary: BTreeSet<Word>,

    /// Words learned at runtime
    common: BTreeSet<Word>,
}
//
impl WordCache {
    /// Set up a cache without any word
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set up a cache with all word lists from a directory
    ///
    /// Word lists that cannot be read are logged and skipped.
    pub fn new(dir: &Path) -> Self {
        let mut cache = Self::empty();
        cache.reload(dir);
        cache
    }

    /// Replace the dictionary words with the word lists of a directory,
    /// keeping the learned words
    pub fn reload(&mut self, dir: &Path) {
        self.dictionary.clear();
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Failed to list word lists in {}: {e}", dir.display());
                return;
            }
        };
        for entry in entries.filter_map(|entry| entry.ok()) {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(WORDS_EXTENSION) {
                continue;
            }
            match self.load_word_list(&path) {
                Ok(count) => log::info!("Loaded {count} words from {}", path.display()),
                Err(e) => log::warn!("Skipped word list {}: {e:#}", path.display()),
            }
        }
    }

    /// Add a word list to the dictionary words, return how many words it had
    fn load_word_list(&mut self, path: &Path) -> Result<usize> {
        let file = File::open(path).context("opening word list")?;
        let mut count = 0;
        for line in BufReader::new(file).lines() {
            let line = line.context("reading word list")?;
            let word = line.trim();
            if word.is_empty() {
                continue;
            }
            self.dictionary.insert(word.to_lowercase().into());
            count += 1;
        }
        Ok(count)
    }

    /// Learn common words
    pub fn learn<S: AsRef<str>>(&mut self, words: impl IntoIterator<Item = S>) {
        for word in words {
            let word = word.as_ref().trim();
            if !word.is_empty() {
                self.common.insert(word.to_lowercase().into());
            }
        }
    }

    /// Known words that start with `prefix`, in lexicographic order
    pub fn recommend(&self, prefix: &str) -> Vec<&str> {
        let prefix = prefix.to_lowercase();
        with_prefix(&self.dictionary, &prefix)
            .into_iter()
            .chain(with_prefix(&self.common, &prefix))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Truth that a word is known, regardless of case
    pub fn contains(&self, word: &str) -> bool {
        let word = word.to_lowercase();
        self.dictionary.contains(word.as_str()) || self.common.contains(word.as_str())
    }

    /// Number of distinct known words
    pub fn size(&self) -> usize {
        self.dictionary.len() + self.common.difference(&self.dictionary).count()
    }

    /// Truth that no word is known
    pub fn is_empty(&self) -> bool {
        self.dictionary.is_empty() && self.common.is_empty()
    }
}

/// Words of a sorted set that start with `prefix`
fn with_prefix<'set>(set: &'set BTreeSet<Word>, prefix: &str) -> Vec<&'set str> {
    set.range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
        .take_while(|word| word.starts_with(prefix))
        .map(|word| &**word)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty() {
        let cache = WordCache::empty();
        assert!(cache.is_empty());
        assert_eq!(cache.size(), 0);
        assert!(cache.recommend("a").is_empty());
    }

    #[test]
    fn loads_word_lists_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.zip.words"), "auto\nbaum\nhaus\n").unwrap();
        fs::write(dir.path().join("b.words"), "Dach\n\nhaus\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored\n").unwrap();
        let cache = WordCache::new(dir.path());
        assert_eq!(cache.size(), 4);
        assert!(cache.contains("dach"));
        assert!(cache.contains("HAUS"));
        assert!(!cache.contains("ignored"));
    }

    #[test]
    fn missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let cache = WordCache::new(&dir.path().join("nope"));
        assert!(cache.is_empty());
    }

    #[test]
    fn learn_and_recommend() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("x.words"), "dach\ndamm\ndank\nhaus\n").unwrap();
        let mut cache = WordCache::new(dir.path());
        cache.learn(["Darmstadt", "damm", "  ", "Berlin"]);
        assert_eq!(cache.size(), 6);
        assert_eq!(cache.recommend("Da"), ["dach", "damm", "dank", "darmstadt"]);
        assert_eq!(cache.recommend("dan"), ["dank"]);
        assert_eq!(cache.recommend("ber"), ["berlin"]);
        assert!(cache.recommend("z").is_empty());
    }

    #[test]
    fn reload_keeps_learned_words() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("x.words");
        fs::write(&list, "dach\nhaus\n").unwrap();
        let mut cache = WordCache::new(dir.path());
        cache.learn(["Darmstadt"]);
        fs::remove_file(&list).unwrap();
        cache.reload(dir.path());
        assert_eq!(cache.size(), 1);
        assert!(cache.contains("darmstadt"));
        assert!(!cache.contains("haus"));
    }
}
