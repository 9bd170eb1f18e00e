//! Bootstrap of the optional linguistic dictionaries of a search platform
//!
//! Given a root directory, this crate looks for a handful of well-known data
//! files that may have been staged in its `source/` subdirectory (word
//! frequency lists, gazetteers, a person-name RDF dump), translates them into
//! our own formats where needed, and uses them to populate three facilities:
//!
//! - A did-you-mean [`WordCache`](wordcache::WordCache) for query suggestions
//! - An [`Autotagging`](autotagging::Autotagging) vocabulary registry
//! - A geolocation index, the [`OverarchingLocation`](geo::OverarchingLocation)
//!
//! Every dictionary is optional. Missing or broken source files are logged and
//! skipped, so [`initialize()`] always hands back a usable
//! [`DictionaryContext`].

pub mod autotagging;
pub mod compression;
pub mod config;
pub mod context;
pub mod derewo;
pub mod geo;
pub mod paths;
pub mod pnd;
pub mod sources;
pub mod triplestore;
pub mod wordcache;

#[cfg(test)]
pub(crate) mod test_utils;

pub use crate::{config::Config, context::DictionaryContext, sources::Dictionary};
use std::path::Path;

/// Use anyhow for Result type erasure
pub use anyhow::Result;

/// Default prefix character of autotagging tags
pub const TAG_PREFIX: char = '$';

/// Word or term, as stored in our in-memory collections
pub type Word = Box<str>;

/// Initialize all dictionaries below `root` with the default configuration
///
/// See [`DictionaryContext::initialize()`] for details.
pub fn initialize(root: impl AsRef<Path>) -> DictionaryContext {
    DictionaryContext::initialize(Config::new(root.as_ref()))
}
