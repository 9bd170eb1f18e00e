//! Transparent decompression of staged source files

use crate::Result;
use anyhow::Context;
use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

/// Open a source file, decompressing it on the fly according to its extension
///
/// `.bz2` files go through bzip2, `.gz` files through gzip, and everything
/// else is read as-is.
pub fn open_source(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let file = BufReader::new(file);
    let extension = path.extension().and_then(|ext| ext.to_str());
    Ok(match extension {
        Some("bz2") => {
            log::trace!("Reading {} through bzip2", path.display());
            Box::new(BzDecoder::new(file))
        }
        Some("gz") => {
            log::trace!("Reading {} through gzip", path.display());
            Box::new(GzDecoder::new(file))
        }
        _ => Box::new(file),
    })
}

/// Read the full decompressed content of a source file
pub fn read_source(path: &Path) -> Result<Vec<u8>> {
    let mut content = Vec::new();
    open_source(path)?
        .read_to_end(&mut content)
        .with_context(|| format!("decompressing {}", path.display()))?;
    Ok(content)
}
