//! Ordering of explicit list items by the values of an ordering predicate.
//!
//! Items are sorted the way a SPARQL `ORDER BY` would sort them: an item
//! without any value for the predicate is treated as the lowest value, and
//! values compare with literals before resources, text before other
//! literals, numbers numerically.

use crate::classify::SortDirection;
use crate::store::TripleSource;
use crate::term::{compare_values, Iri, Resource, Term};
use std::cmp::Ordering;

/// Element-by-element comparison; when one sequence runs out first it is the
/// smaller one.
pub fn compare_value_sequences(a: &[Term], b: &[Term]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        match compare_values(x, y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

/// Sort list items by their values for `ordering_predicate`.
///
/// Duplicates are dropped. Items that compare equal keep identifier order,
/// and a descending sort is the exact reverse of the ascending one. Without
/// an ordering predicate every object of the item counts as a value.
pub fn order_list_items<S: TripleSource + ?Sized>(
    store: &S,
    items: &[Resource],
    ordering_predicate: Option<&Iri>,
    direction: SortDirection,
) -> Vec<Resource> {
    let mut keyed: Vec<(Resource, Vec<Term>)> = Vec::with_capacity(items.len());
    for item in items {
        if keyed.iter().any(|(seen, _)| seen == item) {
            continue;
        }
        let mut values = match ordering_predicate {
            Some(predicate) => store.objects(item, predicate),
            None => store
                .matching(Some(item), None, None)
                .into_iter()
                .map(|t| t.object)
                .collect(),
        };
        values.sort_by(compare_values);
        keyed.push((item.clone(), values));
    }

    // An empty value sequence is a prefix of every other one, so
    // `compare_value_sequences` already puts unbound items first.
    keyed.sort_by(|(a, a_values), (b, b_values)| {
        compare_value_sequences(a_values, b_values).then_with(|| a.compare_identifier(b))
    });

    let mut ordered: Vec<Resource> = keyed.into_iter().map(|(item, _)| item).collect();
    if direction == SortDirection::Descending {
        ordered.reverse();
    }
    tracing::debug!(
        items = ordered.len(),
        ordering_predicate = ordering_predicate.map(Iri::as_str),
        ?direction,
        "ordered list items"
    );
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Graph;
    use crate::term::Literal;
    use crate::vocab::xsd;

    const EX: &str = "http://example.org/";

    fn ex(local: &str) -> Resource {
        Resource::iri(format!("{EX}{local}"))
    }

    fn rank() -> Iri {
        Iri::new(format!("{EX}rank"))
    }

    #[test]
    fn unbound_sorts_lowest() {
        let mut g = Graph::new();
        g.add(ex("i1"), rank().as_str(), Literal::plain("b"));
        g.add(ex("i2"), rank().as_str(), Literal::plain("a"));
        let items = vec![ex("i1"), ex("i2"), ex("i3")];

        let asc = order_list_items(&g, &items, Some(&rank()), SortDirection::Ascending);
        assert_eq!(asc, vec![ex("i3"), ex("i2"), ex("i1")]);

        let desc = order_list_items(&g, &items, Some(&rank()), SortDirection::Descending);
        assert_eq!(desc, vec![ex("i1"), ex("i2"), ex("i3")]);
    }

    #[test]
    fn text_before_numbers_before_resources() {
        let mut g = Graph::new();
        g.add(ex("r"), rank().as_str(), ex("zzz"));
        g.add(ex("n"), rank().as_str(), Literal::typed("5", xsd::INTEGER));
        g.add(ex("t"), rank().as_str(), Literal::plain("five"));
        let items = vec![ex("r"), ex("n"), ex("t")];
        let asc = order_list_items(&g, &items, Some(&rank()), SortDirection::Ascending);
        assert_eq!(asc, vec![ex("t"), ex("n"), ex("r")]);
    }

    #[test]
    fn numbers_sort_numerically() {
        let mut g = Graph::new();
        for (item, n) in [("a", "10"), ("b", "9"), ("c", "100")] {
            g.add(ex(item), rank().as_str(), Literal::typed(n, xsd::INTEGER));
        }
        let items = vec![ex("a"), ex("b"), ex("c")];
        let asc = order_list_items(&g, &items, Some(&rank()), SortDirection::Ascending);
        assert_eq!(asc, vec![ex("b"), ex("a"), ex("c")]);
    }

    #[test]
    fn multi_valued_items_compare_lexicographically() {
        let mut g = Graph::new();
        g.add(ex("long"), rank().as_str(), Literal::plain("a"));
        g.add(ex("long"), rank().as_str(), Literal::plain("b"));
        g.add(ex("short"), rank().as_str(), Literal::plain("a"));
        g.add(ex("later"), rank().as_str(), Literal::plain("a"));
        g.add(ex("later"), rank().as_str(), Literal::plain("c"));
        let items = vec![ex("later"), ex("long"), ex("short")];
        let asc = order_list_items(&g, &items, Some(&rank()), SortDirection::Ascending);
        assert_eq!(asc, vec![ex("short"), ex("long"), ex("later")]);
    }

    #[test]
    fn ties_and_missing_predicate_fall_back_to_identifier() {
        let g = Graph::new();
        let items = vec![ex("b"), ex("a"), ex("b")];
        let asc = order_list_items(&g, &items, None, SortDirection::Ascending);
        assert_eq!(asc, vec![ex("a"), ex("b")]);
    }

    #[test]
    fn missing_predicate_orders_by_all_values() {
        let mut g = Graph::new();
        g.add(ex("a"), rank().as_str(), Literal::plain("z"));
        g.add(ex("b"), format!("{EX}label"), Literal::plain("a"));
        let items = vec![ex("a"), ex("b"), ex("c")];
        let asc = order_list_items(&g, &items, None, SortDirection::Ascending);
        assert_eq!(asc, vec![ex("c"), ex("b"), ex("a")]);
    }

    #[test]
    fn sequence_prefix_is_smaller() {
        let a = vec![Term::literal("x")];
        let b = vec![Term::literal("x"), Term::literal("y")];
        assert_eq!(compare_value_sequences(&a, &b), Ordering::Less);
        assert_eq!(compare_value_sequences(&b, &a), Ordering::Greater);
        assert_eq!(compare_value_sequences(&[], &[]), Ordering::Equal);
    }
}
