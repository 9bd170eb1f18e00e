//! Geonames gazetteer, distributed as a ZIP archive of tab-separated text
//!
//! See <http://download.geonames.org/export/dump/readme.txt> for the column
//! layout of the main `geoname` table.

use super::{Gazetteer, Localization, Location};
use crate::Result;
use anyhow::Context;
use csv::{ReaderBuilder, StringRecord};
use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};
use zip::ZipArchive;

/// Columns of the `geoname` table that we use
const NAME: usize = 1;
const ASCII_NAME: usize = 2;
const ALTERNATE_NAMES: usize = 3;
const LATITUDE: usize = 4;
const LONGITUDE: usize = 5;
const POPULATION: usize = 14;

/// Geonames-backed gazetteer
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeonamesLocation(Gazetteer);
//
impl GeonamesLocation {
    /// Load the first text table of a Geonames ZIP archive
    pub fn new(path: &Path) -> Result<Self> {
        let context = || format!("loading Geonames archive {}", path.display());
        let file = File::open(path).with_context(context)?;
        let mut archive = ZipArchive::new(BufReader::new(file)).with_context(context)?;
        let table_name = archive
            .file_names()
            .find(|name| name.ends_with(".txt"))
            .map(str::to_owned)
            .with_context(|| format!("no text table in {}", path.display()))?;
        let table = archive.by_name(&table_name).with_context(context)?;
        Self::from_table(table).with_context(context)
    }

    /// Load an uncompressed `geoname` table
    ///
    /// Rows which lack a name or valid coordinates are skipped.
    pub fn from_table(reader: impl Read) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(reader);
        let mut gazetteer = Gazetteer::new();
        for record in reader.records() {
            let record = record.context("reading Geonames table")?;
            let Some(location) = parse_location(&record) else {
                log::trace!("Rejected Geonames row {record:?}");
                continue;
            };
            let mut aliases = vec![record.get(ASCII_NAME).unwrap_or_default()];
            aliases.extend(
                record
                    .get(ALTERNATE_NAMES)
                    .unwrap_or_default()
                    .split(','),
            );
            gazetteer.insert(location, &aliases);
        }
        Ok(Self(gazetteer))
    }
}
//
impl Localization for GeonamesLocation {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn find(&self, name: &str, exact: bool) -> Vec<&Location> {
        self.0.find(name, exact)
    }

    fn names(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.0.names())
    }
}

/// Extract a place from a row of the `geoname` table
fn parse_location(record: &StringRecord) -> Option<Location> {
    let name = record.get(NAME)?.trim();
    if name.is_empty() {
        return None;
    }
    Some(Location {
        name: name.into(),
        latitude: record.get(LATITUDE)?.trim().parse().ok()?,
        longitude: record.get(LONGITUDE)?.trim().parse().ok()?,
        population: record
            .get(POPULATION)
            .and_then(|population| population.trim().parse().ok())
            .unwrap_or(0),
    })
}
