//! End-to-end tree generation: classify, order, expand, canonicalize.

use crate::builder::{ExpansionPolicy, TreeBuilder};
use crate::classify::{classify, resolve_list_chain, ResultShape};
use crate::error::Result;
use crate::names::{NameResolver, NamespaceNameResolver};
use crate::order::order_list_items;
use crate::store::TripleSource;
use crate::term::{Resource, Term};
use crate::tree::RdfTree;
use crate::vocab::{ResultVocabulary, DEFAULT_RESULT_PREFIX};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Settings for a [`TreeGenerator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Namespace of the result-control vocabulary.
    pub result_prefix: String,
    /// Namespaces whose predicates sort before all others, in this order.
    pub prioritised_namespaces: Vec<String>,
    /// Predicate IRI -> display name, used for ordering and rendering.
    pub name_overrides: BTreeMap<String, String>,
    pub expansion: ExpansionPolicy,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            result_prefix: DEFAULT_RESULT_PREFIX.to_string(),
            prioritised_namespaces: Vec::new(),
            name_overrides: BTreeMap::new(),
            expansion: ExpansionPolicy::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn with_result_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.result_prefix = prefix.into();
        self
    }

    pub fn with_prioritised_namespaces(mut self, namespaces: Vec<String>) -> Self {
        self.prioritised_namespaces = namespaces;
        self
    }

    pub fn with_name_override(
        mut self,
        predicate: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.name_overrides.insert(predicate.into(), name.into());
        self
    }

    pub fn with_expansion(mut self, policy: ExpansionPolicy) -> Self {
        self.expansion = policy;
        self
    }
}

/// Turns result graphs into canonical trees.
///
/// A generator holds only configuration, so one instance can serve any
/// number of graphs, including from several threads at once.
pub struct TreeGenerator {
    vocab: ResultVocabulary,
    names: Box<dyn NameResolver + Send + Sync>,
    expansion: ExpansionPolicy,
}

impl Default for TreeGenerator {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

impl TreeGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        let names =
            NamespaceNameResolver::new(config.prioritised_namespaces, config.name_overrides);
        Self {
            vocab: ResultVocabulary::new(config.result_prefix),
            names: Box::new(names),
            expansion: config.expansion,
        }
    }

    /// Replace the predicate name resolver.
    pub fn with_name_resolver(mut self, names: impl NameResolver + Send + Sync + 'static) -> Self {
        self.names = Box::new(names);
        self
    }

    pub fn vocabulary(&self) -> &ResultVocabulary {
        &self.vocab
    }

    pub fn name_resolver(&self) -> &dyn NameResolver {
        self.names.as_ref()
    }

    /// Build the canonical tree for a result graph.
    ///
    /// An empty graph gives an empty tree; a non-empty graph must describe
    /// its root(s) with `result:this` statements.
    pub fn generate<S: TripleSource + ?Sized>(&self, store: &S) -> Result<RdfTree> {
        if store.is_empty() {
            tracing::debug!("empty graph, returning an empty tree");
            return Ok(RdfTree::empty());
        }

        let classification = classify(store, &self.vocab)?;
        let mut tree = match classification.shape {
            ResultShape::Item => {
                let root = classification.roots[0].clone();
                self.item_tree(store, root)
            }
            ResultShape::List => {
                let chain = resolve_list_chain(store, &self.vocab, &classification.roots[0])?;
                self.list_tree(store, chain)
            }
            ResultShape::ListWithOrderByPredicate => {
                let items = order_list_items(
                    store,
                    &classification.roots,
                    classification.ordering_predicate.as_ref(),
                    classification.direction,
                );
                self.list_tree(store, items)
            }
        };

        tree.canonicalize(self.names.as_ref());
        tracing::debug!(
            shape = %classification.shape,
            nodes = tree.len(),
            "generated tree"
        );
        Ok(tree)
    }

    fn item_tree<S: TripleSource + ?Sized>(&self, store: &S, root: Resource) -> RdfTree {
        let mut tree = RdfTree::item(Term::Resource(root.clone()));
        let builder = TreeBuilder::new(store, &self.vocab, [root]).with_policy(self.expansion);
        let root_id = tree.root();
        builder.expand(&mut tree, root_id);
        tree
    }

    /// One list root with a separately expanded subtree per item.
    fn list_tree<S: TripleSource + ?Sized>(&self, store: &S, items: Vec<Resource>) -> RdfTree {
        let mut tree = RdfTree::list();
        let builder = TreeBuilder::new(store, &self.vocab, items.iter().cloned())
            .with_policy(self.expansion);
        let nodes: Vec<_> = items.into_iter().map(|item| tree.add_list_item(item)).collect();
        for node in nodes {
            builder.expand(&mut tree, node);
        }
        tree
    }
}

/// Generate with the default configuration.
pub fn generate_tree<S: TripleSource + ?Sized>(store: &S) -> Result<RdfTree> {
    TreeGenerator::default().generate(store)
}
