//! Working directories of the dictionary tree

use crate::Result;
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

/// Staging area for raw dictionary downloads
pub const SOURCE_DIR: &str = "source";

/// Output area for normalized did-you-mean word lists
pub const DID_YOU_MEAN_DIR: &str = "didyoumean";

/// Vocabulary definitions of the autotagging registry
pub const AUTOTAGGING_DIR: &str = "autotagging";

/// Absolute locations of the dictionary tree below some root directory
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Paths {
    /// Root of the dictionary tree
    root: Box<Path>,

    /// Where raw dictionary files are staged
    source_dir: Box<Path>,

    /// Where did-you-mean word lists are stored
    dym_dir: Box<Path>,

    /// Where autotagging vocabularies are stored
    autotagging_dir: Box<Path>,
}
//
impl Paths {
    /// Compute the layout of a dictionary tree, without touching the disk
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            source_dir: root.join(SOURCE_DIR).into(),
            dym_dir: root.join(DID_YOU_MEAN_DIR).into(),
            autotagging_dir: root.join(AUTOTAGGING_DIR).into(),
            root: root.into(),
        }
    }

    /// Root of the dictionary tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Staging area for raw downloads
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Output area for did-you-mean word lists
    pub fn dym_dir(&self) -> &Path {
        &self.dym_dir
    }

    /// Vocabulary definitions of the autotagging registry
    pub fn autotagging_dir(&self) -> &Path {
        &self.autotagging_dir
    }
}

/// Create a directory (and its parents) if it doesn't exist yet
///
/// Failure is not reported to the caller: later operations on this directory
/// will fail as if the files they look for were absent, which they handle.
pub fn ensure_dir(dir: &Path) {
    if dir.is_dir() {
        return;
    }
    match fs::create_dir_all(dir) {
        Ok(()) => log::debug!("Created dictionary directory {}", dir.display()),
        Err(e) => log::warn!("Failed to create dictionary directory {}: {e}", dir.display()),
    }
}

/// Replace the file at `path` with whatever `write` produces
///
/// The content is first written to a temporary file in the same directory,
/// then renamed into place. If anything fails, `path` is left untouched and
/// the temporary file is removed.
pub fn replace_file(
    path: &Path,
    write: impl FnOnce(&mut BufWriter<&mut File>) -> Result<()>,
) -> Result<()> {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }
    temp.persist(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout() {
        let paths = Paths::new("/var/dict");
        assert_eq!(paths.root(), Path::new("/var/dict"));
        assert_eq!(paths.source_dir(), Path::new("/var/dict/source"));
        assert_eq!(paths.dym_dir(), Path::new("/var/dict/didyoumean"));
        assert_eq!(paths.autotagging_dir(), Path::new("/var/dict/autotagging"));
    }

    #[test]
    fn ensure_dir_is_idempotent() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("a").join("b");
        ensure_dir(&dir);
        assert!(dir.is_dir());
        ensure_dir(&dir);
        assert!(dir.is_dir());
    }

    #[test]
    fn replace_file_swaps_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.txt");
        fs::write(&path, "old").unwrap();
        replace_file(&path, |w| Ok(w.write_all(b"new")?)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn replace_file_failure_keeps_old_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.txt");
        fs::write(&path, "old").unwrap();
        let result = replace_file(&path, |w| {
            w.write_all(b"partial")?;
            anyhow::bail!("interrupted")
        });
        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "old");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn ensure_dir_swallows_failures() {
        let root = tempfile::tempdir().unwrap();
        let blocker = root.path().join("file");
        fs::write(&blocker, b"not a directory").unwrap();
        let dir = blocker.join("sub");
        ensure_dir(&dir);
        assert!(!dir.exists());
    }
}
