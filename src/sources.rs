//! Well-known dictionary source files

use crate::{paths::Paths, Result};
use anyhow::Context;
use std::{
    fmt, fs,
    path::{Path, PathBuf},
    sync::OnceLock,
};

/// Suffix of source files that have been deactivated without being deleted
pub const DISABLED_EXTENSION: &str = ".disabled";

/// Dictionary source files that we know how to use
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Dictionary {
    /// OpenGeoDB 0.2.5a dump (gzipped SQL)
    GeoDb0,

    /// More recent OpenGeoDB dump (gzipped SQL), preferred over `GeoDb0`
    GeoDb1,

    /// Geonames cities with population >= 1000 (ZIP of tab-separated text)
    Geonames0,

    /// DeReWo German word frequency list (ZIP with one text entry)
    DeReWo0,

    /// DBpedia person name authority file (bzip2'd N-Triples)
    Pnd0,
}
//
impl Dictionary {
    /// All known dictionaries
    pub const ALL: [Self; 5] = [
        Self::GeoDb0,
        Self::GeoDb1,
        Self::Geonames0,
        Self::DeReWo0,
        Self::Pnd0,
    ];

    /// Look up a dictionary by nickname
    pub fn from_nickname(nickname: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|dictionary| dictionary.nickname() == nickname)
    }

    /// Short name under which the dictionary is registered at runtime
    pub fn nickname(self) -> &'static str {
        &self.info().nickname
    }

    /// Canonical download location
    pub fn url(self) -> &'static str {
        &self.info().url
    }

    /// Name of the staged file, i.e. the last path segment of the URL
    pub fn filename(self) -> &'static str {
        &self.info().filename
    }

    /// Where the active source file is staged
    pub fn file(self, paths: &Paths) -> PathBuf {
        paths.source_dir().join(self.filename())
    }

    /// Where the source file is kept while deactivated
    pub fn file_disabled(self, paths: &Paths) -> PathBuf {
        paths
            .source_dir()
            .join(format!("{}{DISABLED_EXTENSION}", self.filename()))
    }

    /// Truth that the active source file is present
    pub fn is_active(self, paths: &Paths) -> bool {
        self.file(paths).is_file()
    }

    /// Truth that a deactivated source file is present
    pub fn is_disabled(self, paths: &Paths) -> bool {
        self.file_disabled(paths).is_file()
    }

    /// Deactivate the source file by renaming it to its disabled form
    ///
    /// Returns truth that a file was renamed.
    pub fn disable(self, paths: &Paths) -> Result<bool> {
        rename_if_present(&self.file(paths), &self.file_disabled(paths))
    }

    /// Bring a deactivated source file back to its active name
    ///
    /// Does nothing if an active file is already there. Returns truth that a
    /// file was renamed.
    pub fn reenable(self, paths: &Paths) -> Result<bool> {
        if self.is_active(paths) {
            return Ok(false);
        }
        rename_if_present(&self.file_disabled(paths), &self.file(paths))
    }

    /// Static description of this dictionary
    fn info(self) -> &'static DictionaryInfo {
        &descriptors()[self as usize]
    }
}
//
impl fmt::Display for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.nickname())
    }
}

/// What we know about a dictionary source
#[derive(Clone, Debug, Eq, PartialEq)]
struct DictionaryInfo {
    /// Runtime registration name
    nickname: Box<str>,

    /// Canonical download URL
    url: Box<str>,

    /// Last path segment of the URL
    filename: Box<str>,
}
//
impl DictionaryInfo {
    /// Describe a dictionary, deriving its file name from its URL
    fn new(nickname: &str, url: &str) -> Self {
        let filename = url_filename(url)
            .unwrap_or_else(|| panic!("dictionary URL {url} should end with a file name"));
        Self {
            nickname: nickname.into(),
            url: url.into(),
            filename: filename.into(),
        }
    }
}

/// Descriptors of all known dictionaries, in [`Dictionary`] discriminant order
fn descriptors() -> &'static [DictionaryInfo] {
    static LAZY: OnceLock<Box<[DictionaryInfo]>> = OnceLock::new();
    LAZY.get_or_init(|| {
        Dictionary::ALL
            .into_iter()
            .map(|dictionary| match dictionary {
                Dictionary::GeoDb0 => DictionaryInfo::new(
                    "geo0",
                    "http://downloads.sourceforge.net/project/opengeodb/Data/0.2.5a/opengeodb-0.2.5a-UTF8-sql.gz",
                ),
                Dictionary::GeoDb1 => DictionaryInfo::new(
                    "geo1",
                    "http://fa-technik.adfc.de/code/opengeodb/dump/opengeodb-02624_2011-10-17.sql.gz",
                ),
                Dictionary::Geonames0 => DictionaryInfo::new(
                    "geon0",
                    "http://download.geonames.org/export/dump/cities1000.zip",
                ),
                Dictionary::DeReWo0 => DictionaryInfo::new(
                    "drw0",
                    "http://www.ids-mannheim.de/kl/derewo/derewo-v-100000t-2009-04-30-0.1.zip",
                ),
                Dictionary::Pnd0 => DictionaryInfo::new(
                    "pnd0",
                    "http://downloads.dbpedia.org/3.7-i18n/de/pnd_de.nt.bz2",
                ),
            })
            .collect()
    })
}

/// Extract the file name from a URL, ignoring any query or fragment
fn url_filename(url: &str) -> Option<&str> {
    let (_scheme, rest) = url.split_once("://")?;
    let path = rest.split(['?', '#']).next()?;
    let (_authority, path) = path.split_once('/')?;
    path.rsplit('/').next().filter(|name| !name.is_empty())
}

/// Rename `from` to `to` if `from` exists, replacing `to`
fn rename_if_present(from: &Path, to: &Path) -> Result<bool> {
    if !from.is_file() {
        return Ok(false);
    }
    fs::rename(from, to)
        .with_context(|| format!("renaming {} to {}", from.display(), to.display()))?;
    Ok(true)
}
