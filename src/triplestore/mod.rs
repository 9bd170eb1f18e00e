//! In-memory RDF triple store

pub mod ntriples;

use crate::Result;
use anyhow::Context;
use std::{collections::HashSet, fmt};

/// RDF term
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Term {
    /// Resource identified by an IRI (stored without angle brackets)
    Iri(Box<str>),

    /// Blank node (stored without the `_:` prefix)
    Blank(Box<str>),

    /// Literal value
    Literal {
        /// Lexical form, with escape sequences resolved
        value: Box<str>,

        /// Language tag, if any
        language: Option<Box<str>>,

        /// Datatype IRI, if any
        datatype: Option<Box<str>>,
    },
}
//
impl Term {
    /// IRI of this term, if it is a resource
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => Some(iri),
            _ => None,
        }
    }
}
//
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "<{iri}>"),
            Self::Blank(label) => write!(f, "_:{label}"),
            Self::Literal {
                value,
                language,
                datatype,
            } => {
                write!(f, "{value:?}")?;
                if let Some(language) = language {
                    write!(f, "@{language}")?;
                }
                if let Some(datatype) = datatype {
                    write!(f, "^^<{datatype}>")?;
                }
                Ok(())
            }
        }
    }
}

/// RDF statement
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Triple {
    /// Resource that the statement is about (IRI or blank node)
    pub subject: Term,

    /// IRI of the property
    pub predicate: Box<str>,

    /// Value of the property
    pub object: Term,
}

/// Triple store
///
/// Triples are kept in insertion order, which makes every query result
/// deterministic.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TripleStore {
    triples: Vec<Triple>,
}
//
impl TripleStore {
    /// Set up an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an N-Triples document, return how many triples it contained
    ///
    /// On error, the store is left unchanged.
    pub fn load_ntriples(&mut self, bytes: &[u8]) -> Result<usize> {
        let document = std::str::from_utf8(bytes).context("N-Triples must be UTF-8")?;
        let triples = ntriples::parse(document).context("parsing N-Triples")?;
        let count = triples.len();
        self.triples.extend(triples);
        Ok(count)
    }

    /// Add a single triple
    pub fn insert(&mut self, triple: Triple) {
        self.triples.push(triple);
    }

    /// Distinct subjects of all triples with a given predicate, in the order
    /// where they were first inserted
    pub fn subjects_of(&self, predicate: &str) -> Vec<&Term> {
        let mut seen = HashSet::new();
        self.triples
            .iter()
            .filter(|triple| &*triple.predicate == predicate)
            .map(|triple| &triple.subject)
            .filter(|subject| seen.insert(*subject))
            .collect()
    }

    /// Delete all triples with a given predicate and, if specified, subject
    ///
    /// Returns the number of deleted triples.
    pub fn delete_objects(&mut self, subject: Option<&Term>, predicate: &str) -> usize {
        let initial_len = self.triples.len();
        self.triples.retain(|triple| {
            let matches = &*triple.predicate == predicate
                && subject.map_or(true, |subject| triple.subject == *subject);
            !matches
        });
        initial_len - self.triples.len()
    }

    /// Iterate over all triples
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Number of triples
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Truth that the store holds no triple
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = concat!(
        "<http://x/b> <http://x/p> \"1\" .\n",
        "<http://x/a> <http://x/p> \"2\" .\n",
        "<http://x/b> <http://x/p> \"3\" .\n",
        "<http://x/a> <http://x/q> \"4\" .\n",
        "_:n <http://x/p> \"5\" .\n",
    );

    fn iri(s: &str) -> Term {
        Term::Iri(s.into())
    }

    #[test]
    fn subjects_are_distinct_and_ordered() {
        let mut store = TripleStore::new();
        assert_eq!(store.load_ntriples(DOCUMENT.as_bytes()).unwrap(), 5);
        assert_eq!(store.len(), 5);
        assert_eq!(
            store.subjects_of("http://x/p"),
            [&iri("http://x/b"), &iri("http://x/a"), &Term::Blank("n".into())]
        );
        assert_eq!(store.subjects_of("http://x/q"), [&iri("http://x/a")]);
        assert!(store.subjects_of("http://x/r").is_empty());
    }

    #[test]
    fn delete_by_predicate() {
        let mut store = TripleStore::new();
        store.load_ntriples(DOCUMENT.as_bytes()).unwrap();
        assert_eq!(store.delete_objects(None, "http://x/p"), 4);
        assert!(store.subjects_of("http://x/p").is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn delete_by_subject_and_predicate() {
        let mut store = TripleStore::new();
        store.load_ntriples(DOCUMENT.as_bytes()).unwrap();
        assert_eq!(store.delete_objects(Some(&iri("http://x/b")), "http://x/p"), 2);
        assert_eq!(store.len(), 3);
        assert_eq!(store.delete_objects(Some(&iri("http://x/b")), "http://x/p"), 0);
    }

    #[test]
    fn failed_load_leaves_store_untouched() {
        let mut store = TripleStore::new();
        store.load_ntriples(DOCUMENT.as_bytes()).unwrap();
        assert!(store.load_ntriples(b"<s> <p> <o> .\nbroken\n").is_err());
        assert!(store.load_ntriples(&[0xff, 0xfe]).is_err());
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn display() {
        let triple = store_single("<http://x/s> <http://x/p> \"v\"@en .");
        assert_eq!(triple.subject.to_string(), "<http://x/s>");
        assert_eq!(triple.object.to_string(), "\"v\"@en");
        assert_eq!(triple.subject.as_iri(), Some("http://x/s"));
        assert_eq!(triple.object.as_iri(), None);
    }

    fn store_single(line: &str) -> Triple {
        let mut store = TripleStore::new();
        store.load_ntriples(line.as_bytes()).unwrap();
        let triple = store.iter().next().cloned().unwrap();
        triple
    }
}
