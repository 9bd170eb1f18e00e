//! Initialized dictionaries and the bootstrap sequence that produces them

use crate::{
    autotagging::Autotagging,
    config::Config,
    derewo::{self, Activation},
    geo::{GeonamesLocation, OpenGeoDbLocation, OverarchingLocation},
    paths::{self, Paths},
    pnd,
    sources::Dictionary,
    triplestore::TripleStore,
    wordcache::WordCache,
    Result,
};
use std::sync::Arc;

/// Dictionaries of a dictionary tree, ready for use
#[derive(Debug)]
pub struct DictionaryContext {
    /// Configuration that the dictionaries were initialized with
    config: Arc<Config>,

    /// Layout of the dictionary tree
    paths: Paths,

    /// Did-you-mean word cache
    word_cache: WordCache,

    /// Autotagging vocabularies
    autotagging: Autotagging,

    /// Geolocation backends, also attached to autotagging
    geolocation: Arc<OverarchingLocation>,

    /// RDF triples loaded from the dictionaries
    triple_store: TripleStore,
}
//
impl DictionaryContext {
    /// Initialize all dictionaries of the tree rooted at `config.root`
    ///
    /// Missing dictionaries are skipped and broken ones are logged, so this
    /// always succeeds, possibly with fewer dictionaries than expected.
    pub fn initialize(config: Config) -> Self {
        let config = Arc::new(config);
        let paths = Paths::new(&config.root);
        log::info!("Initializing dictionaries in {}", paths.root().display());
        for dir in [paths.source_dir(), paths.autotagging_dir(), paths.dym_dir()] {
            paths::ensure_dir(dir);
        }

        let mut autotagging = Autotagging::new(paths.autotagging_dir(), config.tag_prefix);
        if let Err(e) = derewo::activate(&paths, &config) {
            log::error!("Failed to derive the DeReWo word list: {e:#}");
        }
        let mut word_cache = WordCache::new(paths.dym_dir());
        let geolocation = select_geolocation(&paths, &config);
        let mut triple_store = TripleStore::new();
        pnd::activate(&paths, &mut triple_store, &mut autotagging);

        // Tags must be collected before places are attached, otherwise every
        // place name would end up in the word cache
        let tags = autotagging.all_tags();
        let geolocation = Arc::new(geolocation);
        autotagging.add_places(geolocation.clone());
        word_cache.learn(&tags);
        log::info!(
            "Dictionaries ready: {} words, {} vocabularies, {} places",
            word_cache.size(),
            autotagging.vocabulary_names().count(),
            geolocation.len()
        );

        Self {
            config,
            paths,
            word_cache,
            autotagging,
            geolocation,
            triple_store,
        }
    }

    /// Configuration that the dictionaries were initialized with
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Layout of the dictionary tree
    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    /// Did-you-mean word cache
    pub fn word_cache(&self) -> &WordCache {
        &self.word_cache
    }

    /// Autotagging vocabularies
    pub fn autotagging(&self) -> &Autotagging {
        &self.autotagging
    }

    /// Geolocation backends
    pub fn geolocation(&self) -> &Arc<OverarchingLocation> {
        &self.geolocation
    }

    /// RDF triples loaded from the dictionaries
    pub fn triple_store(&self) -> &TripleStore {
        &self.triple_store
    }

    /// Derive the DeReWo word list if needed, and load it into the word cache
    pub fn activate_derewo(&mut self) -> Result<Activation> {
        let activation = derewo::activate(&self.paths, &self.config)?;
        if let Activation::Translated { .. } = activation {
            self.word_cache.reload(self.paths.dym_dir());
        }
        Ok(activation)
    }

    /// Delete the DeReWo word list and drop its words from the word cache
    ///
    /// Returns truth that a word list was deleted.
    pub fn deactivate_derewo(&mut self) -> Result<bool> {
        let removed = derewo::deactivate(&self.paths)?;
        if removed {
            self.word_cache.reload(self.paths.dym_dir());
        }
        Ok(removed)
    }

    /// Load the PND dump and register the person names vocabulary
    pub fn activate_pnd(&mut self) {
        pnd::activate(&self.paths, &mut self.triple_store, &mut self.autotagging);
    }

    /// Drop the PND triples and the person names vocabulary
    pub fn deactivate_pnd(&mut self) {
        pnd::deactivate(&mut self.triple_store, &mut self.autotagging);
    }
}

/// Activate the staged gazetteers
///
/// The newer OpenGeoDB dump takes precedence over the older one, which gets
/// disabled. Geonames comes on top of either.
fn select_geolocation(paths: &Paths, config: &Config) -> OverarchingLocation {
    let mut geolocation = OverarchingLocation::new();
    let opengeodb = if Dictionary::GeoDb1.is_active(paths) {
        match Dictionary::GeoDb0.disable(paths) {
            Ok(true) => log::info!(
                "Disabled {} in favor of {}",
                Dictionary::GeoDb0,
                Dictionary::GeoDb1
            ),
            Ok(false) => {}
            Err(e) => log::warn!("Failed to disable {}: {e:#}", Dictionary::GeoDb0),
        }
        Some(Dictionary::GeoDb1)
    } else if Dictionary::GeoDb0.is_active(paths) {
        Some(Dictionary::GeoDb0)
    } else {
        None
    };
    if let Some(dictionary) = opengeodb {
        match OpenGeoDbLocation::new(&dictionary.file(paths), config.geodb_lon_lat) {
            Ok(backend) => geolocation.activate_localization(dictionary.nickname(), backend),
            Err(e) => log::error!("Failed to activate {dictionary}: {e:#}"),
        }
    }
    if Dictionary::Geonames0.is_active(paths) {
        match GeonamesLocation::new(&Dictionary::Geonames0.file(paths)) {
            Ok(backend) => {
                geolocation.activate_localization(Dictionary::Geonames0.nickname(), backend)
            }
            Err(e) => log::error!("Failed to activate {}: {e:#}", Dictionary::Geonames0),
        }
    }
    if geolocation.nicknames().next().is_none() {
        log::debug!("No gazetteer staged in {}", paths.source_dir().display());
    }
    geolocation
}
