//! Fixtures for unit tests
//!
//! Compressed source files are produced with the same codec crates that are
//! used to read them back.

use std::{fs::File, io::Write, path::Path};

/// Write a ZIP archive with the given (name, content) members
pub fn write_zip(path: &Path, members: &[(&str, &[u8])]) {
    let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
    for (name, content) in members {
        zip.start_file(*name, zip::write::FileOptions::default())
            .unwrap();
        zip.write_all(content).unwrap();
    }
    zip.finish().unwrap();
}

/// Write a gzip-compressed file
pub fn write_gzip(path: &Path, content: &[u8]) {
    let mut encoder =
        flate2::write::GzEncoder::new(File::create(path).unwrap(), flate2::Compression::default());
    encoder.write_all(content).unwrap();
    encoder.finish().unwrap();
}

/// Write a bzip2-compressed file
pub fn write_bzip2(path: &Path, content: &[u8]) {
    let mut encoder =
        bzip2::write::BzEncoder::new(File::create(path).unwrap(), bzip2::Compression::default());
    encoder.write_all(content).unwrap();
    encoder.finish().unwrap();
}
