//! Breadth-first expansion of a graph into a tree.
//!
//! Starting from a root resource, every statement touching the resource
//! becomes a candidate child: outgoing statements give forward children
//! (the object), incoming ones give inverse children (the subject). The
//! rules that turn a possibly cyclic graph into a finite tree:
//!
//! - control-vocabulary statements and self-loops are never followed;
//! - a candidate already in the node's lineage is skipped (see
//!   [`ExpansionPolicy`] for the stricter alternative);
//! - inverse `rdf:type` edges are dropped, forward ones set the type hint;
//! - inverse edges are only followed out of list-item resources;
//! - list-item resources found below the top level are leaves.

use crate::store::TripleSource;
use crate::term::{Iri, Resource, Term, Triple};
use crate::tree::{NodeId, RdfTree};
use crate::vocab::{rdf, ResultVocabulary};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Which already-visited resources a traversal refuses to revisit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionPolicy {
    /// Skip only resources in the candidate's own lineage. A resource
    /// reachable along two paths appears, fully expanded, under both.
    #[default]
    Ancestors,
    /// Also skip resources already expanded anywhere in the current
    /// traversal; each resource is expanded at most once per root.
    Global,
}

/// Expands roots of an [`RdfTree`] against a triple source.
pub struct TreeBuilder<'a, S: TripleSource + ?Sized> {
    store: &'a S,
    vocab: &'a ResultVocabulary,
    list_items: AHashSet<Resource>,
    policy: ExpansionPolicy,
    rdf_type: Iri,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Inverse,
}

impl<'a, S: TripleSource + ?Sized> TreeBuilder<'a, S> {
    /// `list_items` are the boundary resources: they expand when they are a
    /// traversal root and stay leaves everywhere else.
    pub fn new(
        store: &'a S,
        vocab: &'a ResultVocabulary,
        list_items: impl IntoIterator<Item = Resource>,
    ) -> Self {
        Self {
            store,
            vocab,
            list_items: list_items.into_iter().collect(),
            policy: ExpansionPolicy::default(),
            rdf_type: Iri::new(rdf::TYPE),
        }
    }

    pub fn with_policy(mut self, policy: ExpansionPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn is_list_item(&self, term: &Term) -> bool {
        term.as_resource()
            .is_some_and(|r| self.list_items.contains(r))
    }

    /// Outgoing statements first, then incoming ones; self-loops appear in
    /// both sets and are dropped here.
    fn candidate_statements(&self, subject: &Resource) -> Vec<(Triple, Direction)> {
        let as_object = Term::Resource(subject.clone());
        let outgoing = self.store.matching(Some(subject), None, None);
        let incoming = self.store.matching(None, None, Some(&as_object));
        outgoing
            .into_iter()
            .map(|t| (t, Direction::Forward))
            .chain(incoming.into_iter().map(|t| (t, Direction::Inverse)))
            .filter(|(t, _)| !t.is_self_loop())
            .filter(|(t, _)| !self.vocab.is_control(t.predicate.as_str()))
            .collect()
    }

    /// Expand the subtree below `root` breadth-first. Returns the number of
    /// nodes added.
    pub fn expand(&self, tree: &mut RdfTree, root: NodeId) -> usize {
        let before = tree.len();
        let mut queue: VecDeque<NodeId> = VecDeque::new();
        let mut expanded: AHashSet<Resource> = AHashSet::new();
        queue.push_back(root);

        while let Some(parent) = queue.pop_front() {
            let Some(subject) = tree.node(parent).resource().cloned() else {
                continue;
            };
            if self.policy == ExpansionPolicy::Global && expanded.contains(&subject) {
                continue;
            }

            let parent_is_list_item = self.list_items.contains(&subject);
            let has_grandparent = tree
                .node(parent)
                .parent()
                .is_some_and(|gp| tree.node(gp).value().is_some());
            // A list item keeps a single generation of children, and only
            // when it is expanded as a top-level item.
            if parent_is_list_item && has_grandparent {
                continue;
            }

            for (statement, direction) in self.candidate_statements(&subject) {
                let Triple {
                    subject: statement_subject,
                    predicate,
                    object,
                } = statement;
                let (candidate, inverse) = match direction {
                    Direction::Forward => (object, false),
                    Direction::Inverse => (Term::Resource(statement_subject), true),
                };

                let Some(resource) = candidate.as_resource().cloned() else {
                    tree.add_child(parent, candidate, Some(predicate), false);
                    continue;
                };

                let is_type = predicate == self.rdf_type;
                if is_type {
                    if inverse {
                        continue;
                    }
                    tree.set_type_hint(parent, resource.clone());
                }

                if tree.in_lineage(parent, &candidate) {
                    tracing::trace!(candidate = %candidate, "skipping ancestor");
                    continue;
                }
                if self.policy == ExpansionPolicy::Global && expanded.contains(&resource) {
                    tracing::trace!(candidate = %candidate, "skipping expanded resource");
                    continue;
                }
                if inverse && !parent_is_list_item {
                    continue;
                }

                let boundary = self.is_list_item(&candidate);
                let child = tree.add_child(parent, candidate, Some(predicate), inverse);
                if !boundary {
                    queue.push_back(child);
                }
            }

            expanded.insert(subject);
        }

        let added = tree.len() - before;
        tracing::debug!(
            root = %tree.node(root).value().map(ToString::to_string).unwrap_or_default(),
            added,
            "expanded tree root"
        );
        added
    }
}
