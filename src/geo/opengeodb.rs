//! OpenGeoDB gazetteer, distributed as a gzipped SQL dump
//!
//! We only look at two tables of the dump. `geodb_textdata` associates
//! location IDs with typed text values, among which place names. And
//! `geodb_coordinates` associates the same location IDs with coordinates.

use super::{Gazetteer, Localization, Location};
use crate::{compression, Result};
use anyhow::{bail, ensure, Context};
use std::{
    collections::{BTreeMap, HashMap},
    io::{BufRead, BufReader},
    path::Path,
};

/// `geodb_textdata` text type of place names
const TEXT_TYPE_NAME: i64 = 500100000;

/// `geodb_textdata` text type of population counts
const TEXT_TYPE_POPULATION: i64 = 500600000;

/// OpenGeoDB-backed gazetteer
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OpenGeoDbLocation(Gazetteer);
//
impl OpenGeoDbLocation {
    /// Load an OpenGeoDB dump
    ///
    /// `lon_lat` tells that coordinate rows list the longitude before the
    /// latitude, which is not the case of the dumps that we know of.
    pub fn new(path: &Path, lon_lat: bool) -> Result<Self> {
        let reader = BufReader::new(compression::open_source(path)?);
        Self::from_sql(reader, lon_lat)
            .with_context(|| format!("loading OpenGeoDB dump {}", path.display()))
    }

    /// Load OpenGeoDB data from an uncompressed SQL dump
    pub fn from_sql(reader: impl BufRead, lon_lat: bool) -> Result<Self> {
        let mut names = BTreeMap::<u64, Box<str>>::new();
        let mut populations = HashMap::<u64, u64>::new();
        let mut coordinates = HashMap::<u64, (f64, f64)>::new();

        // Statements may span multiple lines, we only care about inserts
        let mut statement = String::new();
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if statement.is_empty() && !line.starts_with("INSERT INTO") {
                continue;
            }
            statement.push_str(line);
            statement.push(' ');
            if !line.ends_with(';') {
                continue;
            }
            let complete = std::mem::take(&mut statement);
            let complete = complete.trim_end();
            if !matches!(insert_table(complete), Some("geodb_textdata" | "geodb_coordinates")) {
                continue;
            }
            let (table, rows) = match parse_insert(complete) {
                Ok(insert) => insert,
                Err(e) => {
                    log::trace!("Rejected OpenGeoDB statement {complete:?}: {e:#}");
                    continue;
                }
            };
            match table {
                "geodb_textdata" => {
                    for row in rows {
                        let (Some(loc_id), Some(text_type)) = (int(&row, 0), int(&row, 1)) else {
                            log::trace!("Rejected OpenGeoDB text row {row:?}");
                            continue;
                        };
                        let Some(text) = row.get(2).cloned().flatten() else {
                            continue;
                        };
                        match text_type {
                            TEXT_TYPE_NAME => {
                                names.insert(loc_id as u64, text.into());
                            }
                            TEXT_TYPE_POPULATION => {
                                if let Ok(population) = text.parse() {
                                    populations.insert(loc_id as u64, population);
                                }
                            }
                            _ => {}
                        }
                    }
                }
                "geodb_coordinates" => {
                    for row in rows {
                        let (Some(loc_id), Some(first), Some(second)) =
                            (int(&row, 0), float(&row, 2), float(&row, 3))
                        else {
                            log::trace!("Rejected OpenGeoDB coordinate row {row:?}");
                            continue;
                        };
                        let (latitude, longitude) = if lon_lat {
                            (second, first)
                        } else {
                            (first, second)
                        };
                        coordinates.insert(loc_id as u64, (latitude, longitude));
                    }
                }
                _ => {}
            }
        }

        // Places are only usable if they have both a name and coordinates
        let mut gazetteer = Gazetteer::new();
        for (loc_id, name) in names {
            let Some(&(latitude, longitude)) = coordinates.get(&loc_id) else {
                log::trace!("Ignored OpenGeoDB place {name:?} without coordinates");
                continue;
            };
            let location = Location {
                name,
                latitude,
                longitude,
                population: populations.get(&loc_id).copied().unwrap_or(0),
            };
            gazetteer.insert(location, &[]);
        }
        Ok(Self(gazetteer))
    }
}
//
impl Localization for OpenGeoDbLocation {
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

/// SQL value, `None` standing for `NULL`
type Value = Option<String>;

/// Integer column of a row
fn int(row: &[Value], column: usize) -> Option<i64> {
    row.get(column)?.as_deref()?.parse().ok()
}

/// Floating-point column of a row
fn float(row: &[Value], column: usize) -> Option<f64> {
    row.get(column)?.as_deref()?.parse().ok()
}

/// Name of the table that an `INSERT INTO` statement targets
fn insert_table(statement: &str) -> Option<&str> {
    let rest = statement.strip_prefix("INSERT INTO")?.trim_start();
    let table_end = rest.find(|c: char| c.is_whitespace() || c == '(')?;
    Some(rest[..table_end].trim_matches('`'))
}

/// Parse `INSERT INTO table VALUES (...), (...);` into a table name and rows
fn parse_insert(statement: &str) -> Result<(&str, Vec<Vec<Value>>)> {
    let Some(table) = insert_table(statement) else {
        bail!("not an INSERT statement with a table name");
    };
    let rest = statement["INSERT INTO".len()..].trim_start();
    let Some(values_start) = rest.find("VALUES") else {
        bail!("only INSERT ... VALUES statements are supported");
    };

    let mut chars = rest[values_start + "VALUES".len()..].chars().peekable();
    let mut rows = Vec::new();
    loop {
        skip_whitespace(&mut chars);
        match chars.next() {
            Some('(') => rows.push(parse_row(&mut chars)?),
            other => bail!("expected `(` at the start of a row, found {other:?}"),
        }
        skip_whitespace(&mut chars);
        match chars.next() {
            Some(',') => continue,
            Some(';') | None => break,
            other => bail!("expected `,` or `;` after a row, found {other:?}"),
        }
    }
    Ok((table, rows))
}

/// Parse the values of a row, after its opening parenthesis
fn parse_row(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Result<Vec<Value>> {
    let mut row = Vec::new();
    loop {
        skip_whitespace(chars);
        let value = if chars.peek() == Some(&'\'') {
            chars.next();
            Some(parse_string(chars)?)
        } else {
            let mut raw = String::new();
            while let Some(&c) = chars.peek() {
                if c == ',' || c == ')' {
                    break;
                }
                raw.push(c);
                chars.next();
            }
            let raw = raw.trim();
            ensure!(!raw.is_empty(), "empty value");
            (!raw.eq_ignore_ascii_case("NULL")).then(|| raw.to_owned())
        };
        row.push(value);
        skip_whitespace(chars);
        match chars.next() {
            Some(',') => continue,
            Some(')') => return Ok(row),
            other => bail!("expected `,` or `)` after a value, found {other:?}"),
        }
    }
}

/// Parse a quoted string, after its opening quote
fn parse_string(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Result<String> {
    let mut result = String::new();
    loop {
        match chars.next() {
            Some('\\') => match chars.next() {
                Some('n') => result.push('\n'),
                Some('t') => result.push('\t'),
                Some('r') => result.push('\r'),
                Some('0') => result.push('\0'),
                Some(c) => result.push(c),
                None => bail!("unterminated string"),
            },
            Some('\'') => {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    result.push('\'');
                } else {
                    return Ok(result);
                }
            }
            Some(c) => result.push(c),
            None => bail!("unterminated string"),
        }
    }
}

/// Skip whitespace characters
fn skip_whitespace(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
}
