//! Predicate naming and the final comparator tie-break.
//!
//! Siblings reached through different predicates are ordered by predicate
//! name. The order must be total and deterministic; it never depends on the
//! order in which triples were loaded.

use crate::term::Iri;
use crate::vocab::split_iri;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Orders predicates and gives them display names.
pub trait NameResolver {
    /// Total order over predicates. Must only return `Equal` for equal IRIs.
    fn compare(&self, a: &Iri, b: &Iri) -> Ordering;

    /// Name shown for a predicate by renderers.
    fn display_name(&self, predicate: &Iri) -> String;
}

/// Default resolver: prioritised namespaces first, then display name, with
/// the namespace and finally the full IRI as tie-breaks.
///
/// The display name of a predicate is its override if one is configured,
/// otherwise its local name.
#[derive(Debug, Clone, Default)]
pub struct NamespaceNameResolver {
    prioritised_namespaces: Vec<String>,
    overrides: BTreeMap<String, String>,
}

impl NamespaceNameResolver {
    pub fn new(prioritised_namespaces: Vec<String>, overrides: BTreeMap<String, String>) -> Self {
        Self {
            prioritised_namespaces,
            overrides,
        }
    }

    /// Position of the predicate's namespace in the priority list; namespaces
    /// not listed rank after every listed one.
    fn priority(&self, predicate: &Iri) -> usize {
        let (namespace, _) = split_iri(predicate.as_str());
        self.prioritised_namespaces
            .iter()
            .position(|ns| ns == namespace)
            .unwrap_or(self.prioritised_namespaces.len())
    }

    fn name<'a>(&'a self, predicate: &'a Iri) -> &'a str {
        match self.overrides.get(predicate.as_str()) {
            Some(name) => name.as_str(),
            None => split_iri(predicate.as_str()).1,
        }
    }
}

impl NameResolver for NamespaceNameResolver {
    fn compare(&self, a: &Iri, b: &Iri) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        self.priority(a)
            .cmp(&self.priority(b))
            .then_with(|| self.name(a).cmp(self.name(b)))
            .then_with(|| split_iri(a.as_str()).0.cmp(split_iri(b.as_str()).0))
            .then_with(|| a.as_str().cmp(b.as_str()))
    }

    fn display_name(&self, predicate: &Iri) -> String {
        self.name(predicate).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOAF: &str = "http://xmlns.com/foaf/0.1/";
    const DC: &str = "http://purl.org/dc/terms/";

    fn iri(ns: &str, local: &str) -> Iri {
        Iri::new(format!("{ns}{local}"))
    }

    #[test]
    fn alphabetic_by_local_name() {
        let r = NamespaceNameResolver::default();
        assert_eq!(
            r.compare(&iri(FOAF, "name"), &iri(DC, "title")),
            Ordering::Less
        );
        assert_eq!(
            r.compare(&iri(FOAF, "name"), &iri(FOAF, "name")),
            Ordering::Equal
        );
    }

    #[test]
    fn namespace_breaks_local_name_ties() {
        let r = NamespaceNameResolver::default();
        // "http://purl..." < "http://xmlns..."
        assert_eq!(
            r.compare(&iri(DC, "name"), &iri(FOAF, "name")),
            Ordering::Less
        );
    }

    #[test]
    fn prioritised_namespaces_come_first() {
        let r = NamespaceNameResolver::new(vec![FOAF.to_string()], BTreeMap::new());
        assert_eq!(
            r.compare(&iri(FOAF, "zebra"), &iri(DC, "aardvark")),
            Ordering::Less
        );
    }

    #[test]
    fn overrides_rename_for_comparison_and_display() {
        let mut overrides = BTreeMap::new();
        overrides.insert(format!("{DC}title"), "aaa".to_string());
        let r = NamespaceNameResolver::new(Vec::new(), overrides);
        assert_eq!(r.display_name(&iri(DC, "title")), "aaa");
        assert_eq!(r.display_name(&iri(FOAF, "name")), "name");
        assert_eq!(
            r.compare(&iri(DC, "title"), &iri(FOAF, "name")),
            Ordering::Less
        );
    }

    #[test]
    fn overrides_colliding_with_real_names_stay_total() {
        let mut overrides = BTreeMap::new();
        overrides.insert(format!("{DC}title"), "name".to_string());
        let r = NamespaceNameResolver::new(Vec::new(), overrides);
        let a = iri(DC, "title");
        let b = iri(FOAF, "name");
        assert_ne!(r.compare(&a, &b), Ordering::Equal);
        assert_eq!(r.compare(&a, &b), r.compare(&b, &a).reverse());
    }
}
