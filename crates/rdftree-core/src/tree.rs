//! The output tree.
//!
//! Nodes live in an arena owned by [`RdfTree`]; children and parents are
//! [`NodeId`] indices, so the parent link is a plain lookup and never
//! implies ownership. Nodes are only ever appended, which also means the
//! arena order is a valid parents-before-children order.

use crate::names::NameResolver;
use crate::term::{compare_values, Iri, Resource, Term};
use crate::vocab::rdf;
use serde::Serialize;
use std::cmp::Ordering;

/// Index of a node inside its [`RdfTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    value: Option<Term>,
    predicate: Option<Iri>,
    inverse: bool,
    type_hint: Option<Resource>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl TreeNode {
    fn new(
        value: Option<Term>,
        predicate: Option<Iri>,
        inverse: bool,
        parent: Option<NodeId>,
    ) -> Self {
        Self {
            value,
            predicate,
            inverse,
            type_hint: None,
            children: Vec::new(),
            parent,
        }
    }

    /// The term at this position; `None` only for list roots and empty trees.
    pub fn value(&self) -> Option<&Term> {
        self.value.as_ref()
    }

    pub fn resource(&self) -> Option<&Resource> {
        self.value.as_ref().and_then(Term::as_resource)
    }

    pub fn predicate(&self) -> Option<&Iri> {
        self.predicate.as_ref()
    }

    pub fn is_inverse(&self) -> bool {
        self.inverse
    }

    pub fn type_hint(&self) -> Option<&Resource> {
        self.type_hint.as_ref()
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_literal(&self) -> bool {
        self.value.as_ref().is_some_and(Term::is_literal)
    }

    /// A forward `rdf:type` edge.
    pub fn is_type(&self) -> bool {
        !self.inverse && self.predicate.as_ref().is_some_and(|p| *p == rdf::TYPE)
    }

    pub fn is_childless_resource(&self) -> bool {
        self.value.as_ref().is_some_and(Term::is_resource) && self.children.is_empty()
    }
}

/// What the root of a tree stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeKind {
    /// No input statements: a valueless, childless root.
    Empty,
    /// A single resource at the root.
    Item,
    /// A valueless list root whose children are the list items, in order.
    List,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RdfTree {
    nodes: Vec<TreeNode>,
    kind: TreeKind,
}

const ROOT: NodeId = NodeId(0);

impl RdfTree {
    pub fn empty() -> Self {
        Self {
            nodes: vec![TreeNode::new(None, None, false, None)],
            kind: TreeKind::Empty,
        }
    }

    pub fn item(root: Term) -> Self {
        Self {
            nodes: vec![TreeNode::new(Some(root), None, false, None)],
            kind: TreeKind::Item,
        }
    }

    pub fn list() -> Self {
        Self {
            nodes: vec![TreeNode::new(None, None, false, None)],
            kind: TreeKind::List,
        }
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    pub fn kind(&self) -> TreeKind {
        self.kind
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// No value at the root and nothing below it.
    pub fn is_empty(&self) -> bool {
        let root = self.node(ROOT);
        root.value.is_none() && root.children.is_empty()
    }

    pub fn is_list_root(&self, id: NodeId) -> bool {
        self.kind == TreeKind::List && id == ROOT
    }

    /// Items of a list tree (the root's children); empty for other kinds.
    pub fn list_items(&self) -> &[NodeId] {
        match self.kind {
            TreeKind::List => self.children(ROOT),
            TreeKind::Empty | TreeKind::Item => &[],
        }
    }

    pub fn add_child(
        &mut self,
        parent: NodeId,
        value: Term,
        predicate: Option<Iri>,
        inverse: bool,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes
            .push(TreeNode::new(Some(value), predicate, inverse, Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Append a list item under the list root.
    pub fn add_list_item(&mut self, item: Resource) -> NodeId {
        debug_assert_eq!(self.kind, TreeKind::List);
        self.add_child(ROOT, Term::Resource(item), None, false)
    }

    /// Record the type of a node. The first call wins.
    pub fn set_type_hint(&mut self, id: NodeId, ty: Resource) {
        let node = &mut self.nodes[id.0];
        if node.type_hint.is_none() {
            node.type_hint = Some(ty);
        }
    }

    /// Parent chain of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.node(id).parent,
        }
    }

    /// True when `value` sits at `id` itself or any of its ancestors.
    pub fn in_lineage(&self, id: NodeId, value: &Term) -> bool {
        self.node(id).value.as_ref() == Some(value)
            || self
                .ancestors(id)
                .any(|a| self.node(a).value.as_ref() == Some(value))
    }

    /// Sibling order.
    ///
    /// Rules, first discriminating one wins:
    /// 1. forward `rdf:type` edges first;
    /// 2. forward edges before inverse ones;
    /// 3. literals before resources;
    /// 4. childless resources before resources with children;
    /// 5. same predicate: by value;
    /// 6. otherwise by predicate, as ordered by `names`.
    pub fn compare_siblings(&self, a: NodeId, b: NodeId, names: &dyn NameResolver) -> Ordering {
        let (x, y) = (self.node(a), self.node(b));
        y.is_type()
            .cmp(&x.is_type())
            .then_with(|| x.inverse.cmp(&y.inverse))
            .then_with(|| y.is_literal().cmp(&x.is_literal()))
            .then_with(|| y.is_childless_resource().cmp(&x.is_childless_resource()))
            .then_with(|| match (&x.predicate, &y.predicate) {
                (Some(p), Some(q)) if p != q => names.compare(p, q),
                (Some(_), None) => Ordering::Greater,
                (None, Some(_)) => Ordering::Less,
                _ => match (&x.value, &y.value) {
                    (Some(v), Some(w)) => compare_values(v, w),
                    (v, w) => v.is_some().cmp(&w.is_some()),
                },
            })
    }

    /// Sort every node's children into canonical order.
    ///
    /// Children are visited before their parents. The list root keeps its
    /// items in list order. Running this twice changes nothing.
    pub fn canonicalize(&mut self, names: &dyn NameResolver) {
        for index in (0..self.nodes.len()).rev() {
            let id = NodeId(index);
            if self.is_list_root(id) || self.nodes[index].children.len() < 2 {
                continue;
            }
            let mut children = std::mem::take(&mut self.nodes[index].children);
            children.sort_by(|a, b| self.compare_siblings(*a, *b, names));
            self.nodes[index].children = children;
        }
    }

    /// Nested, serializable snapshot of the tree for renderers and debugging.
    pub fn to_view(&self, names: &dyn NameResolver) -> NodeView {
        self.view_of(ROOT, names)
    }

    fn view_of(&self, id: NodeId, names: &dyn NameResolver) -> NodeView {
        let node = self.node(id);
        let (kind, value, datatype, language) = match &node.value {
            None if self.is_list_root(id) => (ValueKind::List, None, None, None),
            None => (ValueKind::Empty, None, None, None),
            Some(Term::Resource(r @ Resource::Iri(_))) => {
                (ValueKind::Iri, Some(r.identifier()), None, None)
            }
            Some(Term::Resource(r @ Resource::Blank(_))) => {
                (ValueKind::Blank, Some(r.identifier()), None, None)
            }
            Some(Term::Literal(l)) => (
                ValueKind::Literal,
                Some(l.lexical().to_string()),
                l.datatype.as_ref().map(Iri::to_string),
                l.language.as_ref().map(|lang| lang.to_string()),
            ),
        };
        NodeView {
            kind,
            value,
            datatype,
            language,
            predicate: node.predicate.as_ref().map(Iri::to_string),
            name: node.predicate.as_ref().map(|p| names.display_name(p)),
            inverse: node.inverse,
            type_hint: node.type_hint.as_ref().map(Resource::identifier),
            children: node
                .children
                .iter()
                .map(|child| self.view_of(*child, names))
                .collect(),
        }
    }
}

/// Iterator over a node's ancestors.
pub struct Ancestors<'a> {
    tree: &'a RdfTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.node(current).parent;
        Some(current)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Empty,
    List,
    Iri,
    Blank,
    Literal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub kind: ValueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub inverse: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_hint: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeView>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::NamespaceNameResolver;
    use crate::term::Literal;

    const EX: &str = "http://example.org/";

    fn ex(local: &str) -> Term {
        Term::iri(format!("{EX}{local}"))
    }

    fn p(local: &str) -> Option<Iri> {
        Some(Iri::new(format!("{EX}{local}")))
    }

    fn values(tree: &RdfTree, id: NodeId) -> Vec<String> {
        tree.children(id)
            .iter()
            .map(|c| tree.node(*c).value().map(ToString::to_string).unwrap_or_default())
            .collect()
    }

    #[test]
    fn type_edge_sorts_first() {
        let mut tree = RdfTree::item(ex("root"));
        let root = tree.root();
        tree.add_child(root, Term::literal("label"), p("a"), false);
        tree.add_child(root, ex("Thing"), Some(Iri::new(rdf::TYPE)), false);
        tree.canonicalize(&NamespaceNameResolver::default());
        assert!(tree.node(tree.children(root)[0]).is_type());
    }

    #[test]
    fn forward_literal_childless_then_predicate_order() {
        let mut tree = RdfTree::item(ex("root"));
        let root = tree.root();
        let parent = tree.add_child(root, ex("withKids"), p("a"), false);
        tree.add_child(parent, Term::literal("x"), p("b"), false);
        tree.add_child(root, ex("back"), p("a"), true);
        tree.add_child(root, ex("leaf"), p("z"), false);
        tree.add_child(root, Term::literal("lit"), p("y"), false);

        tree.canonicalize(&NamespaceNameResolver::default());
        assert_eq!(
            values(&tree, root),
            vec![
                "\"lit\"".to_string(),
                format!("{EX}leaf"),
                format!("{EX}withKids"),
                format!("{EX}back"),
            ]
        );
    }

    #[test]
    fn same_predicate_orders_by_value() {
        let mut tree = RdfTree::item(ex("root"));
        let root = tree.root();
        for n in ["10", "9", "100"] {
            tree.add_child(
                root,
                Term::Literal(Literal::typed(n, crate::vocab::xsd::INTEGER)),
                p("n"),
                false,
            );
        }
        tree.canonicalize(&NamespaceNameResolver::default());
        let lexical: Vec<&str> = tree
            .children(root)
            .iter()
            .map(|c| {
                tree.node(*c)
                    .value()
                    .and_then(Term::as_literal)
                    .map(Literal::lexical)
                    .unwrap_or("")
            })
            .collect();
        assert_eq!(lexical, vec!["9", "10", "100"]);
    }

    #[test]
    fn list_root_keeps_list_order() {
        let mut tree = RdfTree::list();
        tree.add_list_item(Resource::iri(format!("{EX}z")));
        tree.add_list_item(Resource::iri(format!("{EX}a")));
        tree.canonicalize(&NamespaceNameResolver::default());
        assert_eq!(
            values(&tree, tree.root()),
            vec![format!("{EX}z"), format!("{EX}a")]
        );
        assert_eq!(tree.list_items().len(), 2);
    }

    #[test]
    fn lineage_includes_self_and_ancestors() {
        let mut tree = RdfTree::item(ex("a"));
        let b = tree.add_child(tree.root(), ex("b"), p("p"), false);
        let c = tree.add_child(b, ex("c"), p("p"), false);
        assert!(tree.in_lineage(c, &ex("a")));
        assert!(tree.in_lineage(c, &ex("c")));
        assert!(!tree.in_lineage(b, &ex("c")));
        assert_eq!(tree.ancestors(c).collect::<Vec<_>>(), vec![b, tree.root()]);
    }

    #[test]
    fn empty_tree() {
        let tree = RdfTree::empty();
        assert!(tree.is_empty());
        assert_eq!(tree.kind(), TreeKind::Empty);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn view_serializes_compactly() {
        let mut tree = RdfTree::item(ex("root"));
        tree.add_child(tree.root(), Term::literal("hi"), p("label"), false);
        let view = tree.to_view(&NamespaceNameResolver::default());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["kind"], "iri");
        assert_eq!(json["children"][0]["name"], "label");
        assert!(json["children"][0].get("inverse").is_none());
    }
}
