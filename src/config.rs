//! Dictionary bootstrap configuration

use crate::TAG_PREFIX;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Final bootstrap configuration
///
/// Built with defaults by [`Config::new()`], then tuned field by field by
/// whoever hosts the dictionaries (e.g. the CLI argument parser). Shared as an
/// `Arc<Config>` once the dictionaries are initialized.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Config {
    /// Root directory of the dictionary tree
    pub root: PathBuf,

    /// Character that prefixes autotagging tags
    pub tag_prefix: char,

    /// Truth that DeReWo words should be lowercased before being recorded
    pub lowercase_words: bool,

    /// Shortest DeReWo word (in characters) that is worth suggesting
    pub min_word_length: usize,

    /// Truth that OpenGeoDB coordinate rows list longitude before latitude
    pub geodb_lon_lat: bool,
}
//
impl Config {
    /// Default configuration for a dictionary tree rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            tag_prefix: TAG_PREFIX,
            lowercase_words: true,
            min_word_length: 4,
            geodb_lon_lat: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn defaults() {
        let config = Config::new("/data/dictionaries");
        assert_eq!(config.root, Path::new("/data/dictionaries"));
        assert_eq!(config.tag_prefix, '$');
        assert!(config.lowercase_words);
        assert_eq!(config.min_word_length, 4);
        assert!(!config.geodb_lon_lat);
    }
}
