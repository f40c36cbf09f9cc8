//! Canonical tree rendering of RDF result graphs.
//!
//! A result graph is an ordinary RDF graph plus a handful of control
//! statements (in the `http://purl.org/ontology/rdf-result/` vocabulary)
//! that say what the result is about:
//!
//! - `result:this result:item <x>`: a single root resource;
//! - `result:this result:next <a>` with a `result:next` chain: an ordered list;
//! - `result:this result:listItem <a>, <b>`, optionally with
//!   `result:orderByPredicate` and `result:sortOrder`: a list sorted by the
//!   values of a predicate.
//!
//! [`TreeGenerator`] classifies the graph, expands each root breadth-first
//! into an [`RdfTree`] without revisiting a node's own ancestors, and sorts
//! every child list into a canonical order. The same graph always yields the
//! same tree, whatever order its statements were inserted in.
//!
//! Parsing RDF files lives in `rdftree-ingest-rdf`; this crate only needs a
//! [`TripleSource`].

pub mod builder;
pub mod classify;
pub mod error;
pub mod generator;
pub mod names;
pub mod order;
pub mod store;
pub mod term;
pub mod tree;
pub mod vocab;

pub use builder::{ExpansionPolicy, TreeBuilder};
pub use classify::{classify, resolve_list_chain, Classification, ResultShape, SortDirection};
pub use error::{RdfTreeError, Result};
pub use generator::{generate_tree, GeneratorConfig, TreeGenerator};
pub use names::{NameResolver, NamespaceNameResolver};
pub use order::{compare_value_sequences, order_list_items};
pub use store::{Graph, TripleSource};
pub use term::{
    compare_literals, compare_values, Iri, Literal, LiteralValue, Resource, Term, Triple,
};
pub use tree::{NodeId, NodeView, RdfTree, TreeKind, TreeNode, ValueKind};
pub use vocab::{ResultVocabulary, DEFAULT_RESULT_PREFIX};
