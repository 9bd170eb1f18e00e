//! Autotagging: annotation of text with tags from controlled vocabularies
//!
//! Vocabularies are persisted as one `<name>.vocabulary` file each in the
//! autotagging directory. Place names from the geolocation backends can be
//! attached on top of them, under the pseudo-vocabulary [`LOCATIONS`].

pub mod vocabulary;

pub use self::vocabulary::{Vocabulary, VocabularyEntry, VOCABULARY_EXTENSION};
use crate::{geo::OverarchingLocation, Result, Word};
use anyhow::Context;
use std::{
    collections::{BTreeMap, BTreeSet},
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

/// Name under which attached places are reported
pub const LOCATIONS: &str = "Locations";

/// Resolved tag
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Tag {
    /// Vocabulary that the tag comes from
    pub vocabulary: Box<str>,

    /// Canonical term of the tag
    pub term: Box<str>,

    /// URI of the designated object, if known
    pub object_link: Option<Box<str>>,
}

/// Registry of controlled vocabularies
#[derive(Debug)]
pub struct Autotagging {
    /// Directory where vocabularies are persisted
    dir: PathBuf,

    /// Prefix character of tags in queries
    prefix: char,

    /// Known vocabularies, keyed by name
    vocabularies: BTreeMap<Box<str>, Vocabulary>,

    /// Attached places, if any
    places: Option<Arc<OverarchingLocation>>,
}
//
impl Autotagging {
    /// Set up the registry, loading all vocabularies from `dir`
    ///
    /// Vocabulary files that cannot be loaded are logged and skipped.
    pub fn new(dir: impl Into<PathBuf>, prefix: char) -> Self {
        let mut result = Self {
            dir: dir.into(),
            prefix,
            vocabularies: BTreeMap::new(),
            places: None,
        };
        let entries = match fs::read_dir(&result.dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!(
                    "Failed to list vocabularies in {}: {e}",
                    result.dir.display()
                );
                return result;
            }
        };
        let mut files = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension().and_then(|ext| ext.to_str()) == Some(VOCABULARY_EXTENSION)
            })
            .collect::<Vec<_>>();
        files.sort_unstable();
        for path in files {
            match Vocabulary::load(&path) {
                Ok(vocabulary) => {
                    log::info!(
                        "Loaded vocabulary {} with {} terms",
                        vocabulary.name(),
                        vocabulary.len()
                    );
                    result
                        .vocabularies
                        .insert(vocabulary.name().into(), vocabulary);
                }
                Err(e) => log::warn!("Skipped vocabulary {}: {e:#}", path.display()),
            }
        }
        result
    }

    /// Directory where vocabularies are persisted
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Prefix character of tags
    pub fn prefix(&self) -> char {
        self.prefix
    }

    /// Register a vocabulary, replacing any vocabulary with the same name,
    /// and persist it
    ///
    /// The vocabulary stays registered even if it could not be persisted.
    pub fn add_vocabulary(&mut self, vocabulary: Vocabulary) -> Result<()> {
        let name = Box::<str>::from(vocabulary.name());
        log::info!("Adding vocabulary {name} with {} terms", vocabulary.len());
        let saved = vocabulary.save(&self.dir);
        self.vocabularies.insert(name, vocabulary);
        saved.map(|_| ())
    }

    /// Unregister a vocabulary and delete its file
    ///
    /// Returns the removed vocabulary, if it was registered.
    pub fn delete_vocabulary(&mut self, name: &str) -> Option<Vocabulary> {
        let vocabulary = self.vocabularies.remove(name)?;
        let path = vocabulary.file(&self.dir);
        match fs::remove_file(&path) {
            Ok(()) => log::info!("Deleted vocabulary {name}"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => log::warn!(
                "Failed to delete vocabulary file {}: {e}",
                path.display()
            ),
        }
        Some(vocabulary)
    }

    /// Registered vocabulary with a given name
    pub fn vocabulary(&self, name: &str) -> Option<&Vocabulary> {
        self.vocabularies.get(name)
    }

    /// Names of the registered vocabularies, in sorted order
    pub fn vocabulary_names(&self) -> impl Iterator<Item = &str> {
        self.vocabularies.keys().map(|name| &**name)
    }

    /// Attach geolocation places as an extra tag source
    pub fn add_places(&mut self, places: Arc<OverarchingLocation>) {
        log::info!("Attached {} places to autotagging", places.len());
        self.places = Some(places);
    }

    /// All known tag terms, including attached place names
    pub fn all_tags(&self) -> BTreeSet<Word> {
        let mut tags = self
            .vocabularies
            .values()
            .flat_map(|vocabulary| vocabulary.terms().keys().cloned())
            .collect::<BTreeSet<_>>();
        if let Some(places) = &self.places {
            tags.extend(places.place_names().into_iter().map(Word::from));
        }
        tags
    }

    /// Resolve a word into a tag, ignoring case
    ///
    /// Vocabularies are searched in name order, then attached places.
    pub fn get_tag(&self, word: &str) -> Option<Tag> {
        let word = word.trim().trim_start_matches(self.prefix);
        if word.is_empty() {
            return None;
        }
        for vocabulary in self.vocabularies.values() {
            if let Some((term, entry)) = vocabulary.lookup(word) {
                return Some(Tag {
                    vocabulary: vocabulary.name().into(),
                    term: term.into(),
                    object_link: (!entry.object_link.is_empty())
                        .then(|| entry.object_link.clone()),
                });
            }
        }
        let location = *self.places.as_ref()?.find(word, true).first()?;
        Some(Tag {
            vocabulary: LOCATIONS.into(),
            term: location.name.clone(),
            object_link: None,
        })
    }

    /// Query form of a tag, e.g. `$Persons:Albert Einstein`
    pub fn format_tag(&self, tag: &Tag) -> String {
        format!("{}{}:{}", self.prefix, tag.vocabulary, tag.term)
    }
}

/// Persist a vocabulary, logging failures
///
/// The vocabulary is registered either way.
pub(crate) fn add_or_warn(autotagging: &mut Autotagging, vocabulary: Vocabulary) {
    let name = Box::<str>::from(vocabulary.name());
    if let Err(e) = autotagging
        .add_vocabulary(vocabulary)
        .with_context(|| format!("registering vocabulary {name}"))
    {
        log::warn!("{e:#}");
    }
}
