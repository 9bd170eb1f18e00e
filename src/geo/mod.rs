//! Geolocation: resolution of place names into coordinates
//!
//! Each gazetteer dataset is loaded by a backend implementing
//! [`Localization`], and backends are aggregated by an
//! [`OverarchingLocation`] under the nickname of their source dictionary.

pub mod geonames;
pub mod opengeodb;

pub use self::{geonames::GeonamesLocation, opengeodb::OpenGeoDbLocation};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    ops::Bound,
};

/// Named place
#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    /// Canonical place name
    pub name: Box<str>,

    /// Latitude in degrees
    pub latitude: f64,

    /// Longitude in degrees
    pub longitude: f64,

    /// Number of inhabitants (0 if unknown)
    pub population: u64,
}

/// Gazetteer backend
pub trait Localization: fmt::Debug + Send + Sync {
    /// Number of known places
    fn len(&self) -> usize;

    /// Truth that no place is known
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Places whose name (or alias) is `name`, or starts with `name` if not
    /// `exact`, ignoring case
    fn find(&self, name: &str, exact: bool) -> Vec<&Location>;

    /// Canonical names of all known places
    fn names(&self) -> Box<dyn Iterator<Item = &str> + '_>;
}

/// Place index shared by the gazetteer backends
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Gazetteer {
    /// Known places
    locations: Vec<Location>,

    /// Indices of places in `locations`, keyed by lowercase name or alias
    by_name: BTreeMap<Box<str>, Vec<usize>>,
}
//
impl Gazetteer {
    /// Set up an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a place, which can be found by its name and any alias
    pub fn insert(&mut self, location: Location, aliases: &[&str]) {
        let idx = self.locations.len();
        let keys = std::iter::once(&*location.name)
            .chain(aliases.iter().copied())
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_lowercase)
            .collect::<BTreeSet<_>>();
        for key in keys {
            self.by_name.entry(key.into()).or_default().push(idx);
        }
        self.locations.push(location);
    }

    /// Number of known places
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Truth that no place is known
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// See [`Localization::find()`]
    pub fn find(&self, name: &str, exact: bool) -> Vec<&Location> {
        let key = name.trim().to_lowercase();
        let indices = if exact {
            self.by_name.get(key.as_str()).cloned().unwrap_or_default()
        } else {
            self.by_name
                .range::<str, _>((Bound::Included(key.as_str()), Bound::Unbounded))
                .take_while(|(name, _)| name.starts_with(key.as_str()))
                .flat_map(|(_, indices)| indices.iter().copied())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        };
        indices.into_iter().map(|idx| &self.locations[idx]).collect()
    }

    /// Canonical names of all known places
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.locations.iter().map(|location| &*location.name)
    }
}

/// Aggregation of all active gazetteer backends
#[derive(Debug, Default)]
pub struct OverarchingLocation {
    /// Active backends, keyed by nickname
    backends: BTreeMap<Box<str>, Box<dyn Localization>>,
}
//
impl OverarchingLocation {
    /// Set up an aggregator without any backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend, replacing any backend with the same nickname
    pub fn activate_localization(&mut self, nickname: &str, backend: impl Localization + 'static) {
        log::info!(
            "Activated geolocation backend {nickname} with {} places",
            backend.len()
        );
        self.backends.insert(nickname.into(), Box::new(backend));
    }

    /// Unregister a backend, return truth that it was registered
    pub fn deactivate_localization(&mut self, nickname: &str) -> bool {
        self.backends.remove(nickname).is_some()
    }

    /// Nicknames of the active backends, in sorted order
    pub fn nicknames(&self) -> impl Iterator<Item = &str> {
        self.backends.keys().map(|nickname| &**nickname)
    }

    /// Total number of places across all backends
    pub fn len(&self) -> usize {
        self.backends.values().map(|backend| backend.len()).sum()
    }

    /// Truth that no backend knows any place
    pub fn is_empty(&self) -> bool {
        self.backends.values().all(|backend| backend.is_empty())
    }

    /// See [`Localization::find()`], applied to every backend
    pub fn find(&self, name: &str, exact: bool) -> Vec<&Location> {
        self.backends
            .values()
            .flat_map(|backend| backend.find(name, exact))
            .collect()
    }

    /// Distinct place names across all backends
    pub fn place_names(&self) -> BTreeSet<&str> {
        self.backends
            .values()
            .flat_map(|backend| backend.names())
            .collect()
    }
}
