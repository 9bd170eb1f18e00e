//! Person names vocabulary, extracted from the DBpedia PND dump
//!
//! The dump is a bzip2-compressed N-Triples file. Every resource that has an
//! `individualisedPnd` property is a person, whose name we recover from the
//! last segment of the resource IRI (`.../Albert_Einstein_(physicist)` becomes
//! `Albert Einstein`).

use crate::{
    autotagging::{self, Autotagging, Vocabulary, VocabularyEntry},
    compression,
    paths::Paths,
    sources::Dictionary,
    triplestore::TripleStore,
    Word,
};
use anyhow::Context;
use std::collections::BTreeMap;

/// Predicate which marks persons in the PND dump
pub const PND_PREDICATE: &str = "http://dbpedia.org/ontology/individualisedPnd";

/// Name of the person names vocabulary
pub const PERSONS: &str = "Persons";

/// Load the PND dump into the triple store, then register the person names
/// vocabulary
///
/// Nothing is done if the dump is absent. Errors are logged, and a dump that
/// cannot be loaded leaves both the triple store and the vocabularies alone.
pub fn activate(paths: &Paths, store: &mut TripleStore, autotagging: &mut Autotagging) {
    let path = Dictionary::Pnd0.file(paths);
    if !path.is_file() {
        log::debug!("No PND dump at {}, skipping", path.display());
        return;
    }
    let loaded = compression::read_source(&path)
        .and_then(|bytes| store.load_ntriples(&bytes))
        .with_context(|| format!("loading PND dump {}", path.display()));
    match loaded {
        Ok(triples) => log::info!("Loaded {triples} triples from {}", path.display()),
        Err(e) => {
            log::error!("{e:#}");
            return;
        }
    }
    match build_vocabulary(store) {
        Some(vocabulary) => autotagging::add_or_warn(autotagging, vocabulary),
        None => log::warn!("No person found in PND dump {}", path.display()),
    }
}

/// Drop the PND triples and the person names vocabulary
pub fn deactivate(store: &mut TripleStore, autotagging: &mut Autotagging) {
    let triples = store.delete_objects(None, PND_PREDICATE);
    let vocabulary = autotagging.delete_vocabulary(PERSONS);
    log::info!(
        "Deactivated PND: dropped {triples} triples and {} person names",
        vocabulary.map_or(0, |vocabulary| vocabulary.len())
    );
}

/// Build the person names vocabulary from the triples of a store
///
/// Returns `None` if the store knows no person. The object space is the
/// namespace of the last person, in insertion order.
pub fn build_vocabulary(store: &TripleStore) -> Option<Vocabulary> {
    let mut object_space = "";
    let mut terms = BTreeMap::<Word, VocabularyEntry>::new();
    for subject in store.subjects_of(PND_PREDICATE) {
        let Some(iri) = subject.as_iri() else {
            log::trace!("Ignored non-IRI person {subject}");
            continue;
        };
        let Some((namespace, term)) = person_name(iri) else {
            log::trace!("Ignored person {iri} without a usable name");
            continue;
        };
        object_space = namespace;
        terms.insert(term.into(), VocabularyEntry::new(iri));
    }
    (!terms.is_empty()).then(|| Vocabulary::new(PERSONS, object_space, terms))
}

/// Split a person IRI into its namespace (up to and including the last `/`)
/// and a readable name
fn person_name(iri: &str) -> Option<(&str, String)> {
    let slash = iri.rfind('/')?;
    let (namespace, local) = iri.split_at(slash + 1);
    let local = local.find('(').map_or(local, |paren| &local[..paren]);
    let term = local.replace('_', " ");
    let term = term.trim();
    (!term.is_empty()).then(|| (namespace, term.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triplestore::{Term, Triple};

    const EINSTEIN: &str = "http://dbpedia.org/resource/Albert_Einstein_(physicist)";

    fn person(iri: &str) -> Triple {
        Triple {
            subject: Term::Iri(iri.into()),
            predicate: PND_PREDICATE.into(),
            object: Term::Literal {
                value: "118529579".into(),
                language: None,
                datatype: None,
            },
        }
    }

    #[test]
    fn names() {
        assert_eq!(
            person_name(EINSTEIN),
            Some(("http://dbpedia.org/resource/", "Albert Einstein".to_owned()))
        );
        assert_eq!(
            person_name("http://x/ns/Marie_Curie"),
            Some(("http://x/ns/", "Marie Curie".to_owned()))
        );
        assert_eq!(person_name("urn:isbn:123"), None);
        assert_eq!(person_name("http://x/_(nobody)"), None);
        assert_eq!(person_name("http://x/"), None);
    }

    #[test]
    fn single_person() {
        let mut store = TripleStore::new();
        store.insert(person(EINSTEIN));
        let persons = build_vocabulary(&store).unwrap();
        assert_eq!(persons.name(), PERSONS);
        assert_eq!(persons.object_space(), "http://dbpedia.org/resource/");
        assert_eq!(persons.len(), 1);
        let entry = &persons.terms()["Albert Einstein"];
        assert!(entry.synonyms.is_empty());
        assert_eq!(&*entry.object_link, EINSTEIN);
    }

    #[test]
    fn normalized_terms_and_last_object_space() {
        let mut store = TripleStore::new();
        for iri in [
            "http://a/Albert_Einstein",
            "http://a/___",
            "http://b/Albert_Einstein_(physicist)",
            "http://c/(anonymous)",
            "http://b/Niels__Bohr_",
        ] {
            store.insert(person(iri));
        }
        store.insert(Triple {
            subject: Term::Blank("p1".into()),
            ..person(EINSTEIN)
        });
        store.insert(Triple {
            predicate: "http://x/other".into(),
            ..person("http://z/Not_A_Person")
        });

        let persons = build_vocabulary(&store).unwrap();
        assert_eq!(persons.object_space(), "http://b/");
        assert_eq!(
            persons.terms().keys().map(|term| &**term).collect::<Vec<_>>(),
            ["Albert Einstein", "Niels  Bohr"]
        );
        // Last write wins on duplicate terms
        assert_eq!(
            &*persons.terms()["Albert Einstein"].object_link,
            "http://b/Albert_Einstein_(physicist)"
        );
        for term in persons.terms().keys() {
            assert!(!term.contains('_') && !term.contains('('));
            assert_eq!(&**term, term.trim());
        }
    }

    #[test]
    fn no_person() {
        assert!(build_vocabulary(&TripleStore::new()).is_none());
    }
}
