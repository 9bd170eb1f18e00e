//! Controlled vocabularies and their on-disk format
//!
//! A vocabulary file is a tab-separated table. Its first record holds the
//! object space, and every following record is a
//! `term, object link, comma-separated synonyms` triplet.

use crate::{paths, Result, Word};
use anyhow::{ensure, Context};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashMap},
    fs::File,
    path::{Path, PathBuf},
};
use unicase::UniCase;

/// Extension of vocabulary files
pub const VOCABULARY_EXTENSION: &str = "vocabulary";

/// Marker of the object space record
const OBJECT_SPACE_MARKER: &str = "#objectspace";

/// What a vocabulary term stands for
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct VocabularyEntry {
    /// Alternative spellings of the term
    pub synonyms: Vec<Word>,

    /// URI of the object that the term designates (may be empty)
    pub object_link: Box<str>,
}
//
impl VocabularyEntry {
    /// Entry without synonyms
    pub fn new(object_link: impl Into<Box<str>>) -> Self {
        Self {
            synonyms: Vec::new(),
            object_link: object_link.into(),
        }
    }
}

/// Named mapping from terms to the objects they designate
#[derive(Clone, Debug)]
pub struct Vocabulary {
    /// Name of the vocabulary
    name: Box<str>,

    /// Common URI prefix of the object links
    object_space: Box<str>,

    /// Terms and what they stand for
    terms: BTreeMap<Word, VocabularyEntry>,

    /// Case-insensitive index from terms and synonyms to terms
    index: HashMap<UniCase<Word>, Word>,
}
//
impl Vocabulary {
    /// Build a vocabulary
    pub fn new(
        name: impl Into<Box<str>>,
        object_space: impl Into<Box<str>>,
        terms: BTreeMap<Word, VocabularyEntry>,
    ) -> Self {
        let mut index = HashMap::new();
        for (term, entry) in &terms {
            for key in std::iter::once(term).chain(&entry.synonyms) {
                index
                    .entry(UniCase::new(key.clone()))
                    .or_insert_with(|| term.clone());
            }
        }
        Self {
            name: name.into(),
            object_space: object_space.into(),
            terms,
            index,
        }
    }

    /// Name of the vocabulary
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Common URI prefix of the object links
    pub fn object_space(&self) -> &str {
        &self.object_space
    }

    /// Terms and what they stand for, in sorted order
    pub fn terms(&self) -> &BTreeMap<Word, VocabularyEntry> {
        &self.terms
    }

    /// Number of terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Truth that the vocabulary has no term
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Find the term that a word (or synonym) stands for, ignoring case
    pub fn lookup(&self, word: &str) -> Option<(&str, &VocabularyEntry)> {
        let term = self.index.get(&UniCase::new(Word::from(word.trim())))?;
        let (term, entry) = self.terms.get_key_value(term)?;
        Some((&**term, entry))
    }

    /// Location of this vocabulary's file within a vocabulary directory
    pub fn file(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.{VOCABULARY_EXTENSION}", self.name))
    }

    /// Save this vocabulary into a vocabulary directory, replacing any
    /// former version, and return the file location
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        let path = self.file(dir);
        paths::replace_file(&path, |writer| {
            let mut writer = WriterBuilder::new()
                .delimiter(b'\t')
                .has_headers(false)
                .flexible(true)
                .from_writer(writer);
            writer.write_record([OBJECT_SPACE_MARKER, &*self.object_space])?;
            for (term, entry) in &self.terms {
                writer.serialize(Row {
                    term: term.to_string(),
                    object_link: entry.object_link.to_string(),
                    synonyms: entry.synonyms.join(","),
                })?;
            }
            writer.flush()?;
            Ok(())
        })
        .with_context(|| format!("saving vocabulary {} to {}", self.name, path.display()))?;
        Ok(path)
    }

    /// Load a vocabulary file, naming the vocabulary after the file
    pub fn load(path: &Path) -> Result<Self> {
        let context = || format!("loading vocabulary {}", path.display());
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .with_context(|| format!("no vocabulary name in {}", path.display()))?;
        let file = File::open(path).with_context(context)?;
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut object_space = String::new();
        let mut terms = BTreeMap::new();
        for (idx, record) in reader.records().enumerate() {
            let record = record.with_context(context)?;
            if idx == 0 && record.get(0) == Some(OBJECT_SPACE_MARKER) {
                object_space = record.get(1).unwrap_or_default().to_owned();
                continue;
            }
            let row = record
                .deserialize::<Row>(None)
                .with_context(|| format!("decoding record {}", idx + 1))
                .with_context(context)?;
            ensure!(
                !row.term.trim().is_empty(),
                "empty term in record {} of {}",
                idx + 1,
                path.display()
            );
            let synonyms = row
                .synonyms
                .split(',')
                .map(str::trim)
                .filter(|synonym| !synonym.is_empty())
                .map(Word::from)
                .collect();
            terms.insert(
                row.term.trim().into(),
                VocabularyEntry {
                    synonyms,
                    object_link: row.object_link.into(),
                },
            );
        }
        Ok(Self::new(name, object_space, terms))
    }
}
//
impl PartialEq for Vocabulary {
    fn eq(&self, other: &Self) -> bool {
        // The index is derived from the terms
        self.name == other.name
            && self.object_space == other.object_space
            && self.terms == other.terms
    }
}

/// Record of a vocabulary file
#[derive(Debug, Deserialize, Serialize)]
struct Row {
    term: String,
    #[serde(default)]
    object_link: String,
    #[serde(default)]
    synonyms: String,
}
