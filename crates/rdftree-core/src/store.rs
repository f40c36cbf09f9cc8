//! Triple pattern matching.
//!
//! The generator only ever asks a graph one question: "which triples match
//! this (subject?, predicate?, object?) pattern". [`TripleSource`] captures
//! that contract; [`Graph`] is the in-memory implementation with one index
//! per position.
//!
//! Results are always returned in the structural `Ord` order of [`Triple`],
//! so two graphs holding the same statements answer every query identically
//! regardless of insertion order.

use crate::term::{Iri, Resource, Term, Triple};
use ahash::AHashMap;
use std::collections::BTreeSet;

/// Read-only access to a set of triples.
pub trait TripleSource {
    /// All triples matching the pattern; `None` is a wildcard.
    fn matching(
        &self,
        subject: Option<&Resource>,
        predicate: Option<&Iri>,
        object: Option<&Term>,
    ) -> Vec<Triple>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Existence check without materializing more than needed.
    fn contains_match(
        &self,
        subject: Option<&Resource>,
        predicate: Option<&Iri>,
        object: Option<&Term>,
    ) -> bool {
        !self.matching(subject, predicate, object).is_empty()
    }

    /// Every object of `subject predicate ?o`.
    fn objects(&self, subject: &Resource, predicate: &Iri) -> Vec<Term> {
        self.matching(Some(subject), Some(predicate), None)
            .into_iter()
            .map(|t| t.object)
            .collect()
    }
}

/// An in-memory RDF graph with set semantics.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    triples: BTreeSet<Triple>,
    by_subject: AHashMap<Resource, BTreeSet<Triple>>,
    by_predicate: AHashMap<Iri, BTreeSet<Triple>>,
    by_object: AHashMap<Term, BTreeSet<Triple>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a triple; returns false if it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        if self.triples.contains(&triple) {
            return false;
        }
        self.by_subject
            .entry(triple.subject.clone())
            .or_default()
            .insert(triple.clone());
        self.by_predicate
            .entry(triple.predicate.clone())
            .or_default()
            .insert(triple.clone());
        self.by_object
            .entry(triple.object.clone())
            .or_default()
            .insert(triple.clone());
        self.triples.insert(triple)
    }

    /// Convenience for tests and loaders: `graph.add(s, p, o)`.
    pub fn add(&mut self, subject: Resource, predicate: impl AsRef<str>, object: impl Into<Term>) {
        self.insert(Triple::new(subject, Iri::new(predicate), object));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// Smallest candidate set for a pattern, or `None` when a bound position
    /// has no entries at all.
    fn candidates(
        &self,
        subject: Option<&Resource>,
        predicate: Option<&Iri>,
        object: Option<&Term>,
    ) -> Option<&BTreeSet<Triple>> {
        let mut best: Option<&BTreeSet<Triple>> = None;
        let bound = [
            subject.map(|s| self.by_subject.get(s)),
            predicate.map(|p| self.by_predicate.get(p)),
            object.map(|o| self.by_object.get(o)),
        ];
        for index in bound.into_iter().flatten() {
            let set = index?;
            if best.map_or(true, |b| set.len() < b.len()) {
                best = Some(set);
            }
        }
        Some(best.unwrap_or(&self.triples))
    }
}

impl TripleSource for Graph {
    fn matching(
        &self,
        subject: Option<&Resource>,
        predicate: Option<&Iri>,
        object: Option<&Term>,
    ) -> Vec<Triple> {
        let Some(candidates) = self.candidates(subject, predicate, object) else {
            return Vec::new();
        };
        candidates
            .iter()
            .filter(|t| subject.map_or(true, |s| t.subject == *s))
            .filter(|t| predicate.map_or(true, |p| t.predicate == *p))
            .filter(|t| object.map_or(true, |o| t.object == *o))
            .cloned()
            .collect()
    }

    fn len(&self) -> usize {
        self.triples.len()
    }

    fn contains_match(
        &self,
        subject: Option<&Resource>,
        predicate: Option<&Iri>,
        object: Option<&Term>,
    ) -> bool {
        self.candidates(subject, predicate, object)
            .is_some_and(|candidates| {
                candidates.iter().any(|t| {
                    subject.map_or(true, |s| t.subject == *s)
                        && predicate.map_or(true, |p| t.predicate == *p)
                        && object.map_or(true, |o| t.object == *o)
                })
            })
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut graph = Graph::new();
        graph.extend(iter);
        graph
    }
}

impl Extend<Triple> for Graph {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        for triple in iter {
            self.insert(triple);
        }
    }
}
