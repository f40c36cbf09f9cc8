//! Result shape classification.
//!
//! A result graph says what its root is through statements about the
//! reserved `result:this` resource:
//!
//! ```text
//! result:this result:item     <X> .             # ITEM: one tree rooted at X
//! result:this result:next     <X1> .            # LIST: X1 result:next X2 ...
//! result:this result:listItem <X1>, <X2> ;      # LIST_WITH_ORDER_BY_PREDICATE
//!             result:orderByPredicate <p> ;     #   optional
//!             result:sortOrder result:DescendingOrder .  # optional
//! ```

use crate::error::{RdfTreeError, Result};
use crate::store::TripleSource;
use crate::term::{Iri, Resource, Term, Triple};
use crate::vocab::ResultVocabulary;
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultShape {
    Item,
    List,
    ListWithOrderByPredicate,
}

impl fmt::Display for ResultShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResultShape::Item => "ITEM",
            ResultShape::List => "LIST",
            ResultShape::ListWithOrderByPredicate => "LIST_WITH_ORDER_BY_PREDICATE",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Outcome of [`classify`].
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub shape: ResultShape,
    /// The `result:this` statements that designate the root(s).
    pub control: Vec<Triple>,
    /// Item: the root. List: the first link of the chain. Ordered list: the
    /// list-item candidates in statement order.
    pub roots: Vec<Resource>,
    pub ordering_predicate: Option<Iri>,
    pub direction: SortDirection,
}

fn object_resource(triple: &Triple) -> Result<&Resource> {
    triple
        .object
        .as_resource()
        .ok_or_else(|| RdfTreeError::InvalidControlTriple {
            predicate: triple.predicate.to_string(),
            reason: format!("object {} is not a resource", triple.object),
        })
}

/// Determine the result shape from the `result:this` statements.
pub fn classify<S: TripleSource + ?Sized>(
    store: &S,
    vocab: &ResultVocabulary,
) -> Result<Classification> {
    let this = Resource::iri(&vocab.this);
    let results = store.matching(Some(&this), None, None);
    if results.is_empty() {
        return Err(RdfTreeError::MissingRoot {
            this: vocab.this.clone(),
        });
    }

    let mut shape: Option<ResultShape> = None;
    let mut control = Vec::new();
    let mut roots = Vec::new();

    for result in &results {
        let object = object_resource(result)?;
        let predicate = result.predicate.as_str();
        if predicate == vocab.item {
            if results.len() != 1 {
                return Err(RdfTreeError::ConflictingShape {
                    reason: format!(
                        "an item result must have exactly one {} statement, found {}",
                        vocab.this,
                        results.len()
                    ),
                });
            }
            identify_shape(&mut shape, ResultShape::Item, predicate)?;
        } else if predicate == vocab.next {
            if results.len() != 1 {
                return Err(RdfTreeError::ConflictingShape {
                    reason: format!(
                        "a list described by {} must have exactly one starting point, \
                         found {} statements",
                        vocab.next,
                        results.len()
                    ),
                });
            }
            identify_shape(&mut shape, ResultShape::List, predicate)?;
        } else if predicate == vocab.list_item {
            identify_shape(&mut shape, ResultShape::ListWithOrderByPredicate, predicate)?;
        } else {
            continue;
        }
        control.push(result.clone());
        if !roots.contains(object) {
            roots.push(object.clone());
        }
    }

    let mut ordering_predicate: Option<Iri> = None;
    let mut direction = SortDirection::Ascending;
    for result in &results {
        let predicate = result.predicate.as_str();
        if predicate == vocab.order_by_predicate {
            if ordering_predicate.is_some() {
                return Err(RdfTreeError::ShapeMismatch {
                    reason: "more than one ordering predicate was supplied".to_string(),
                });
            }
            if shape != Some(ResultShape::ListWithOrderByPredicate) {
                return Err(RdfTreeError::ShapeMismatch {
                    reason: format!("an ordering predicate was supplied for {}", shape_name(shape)),
                });
            }
            let iri = object_resource(result)?.as_iri().ok_or_else(|| {
                RdfTreeError::InvalidControlTriple {
                    predicate: predicate.to_string(),
                    reason: "the ordering predicate must be an IRI".to_string(),
                }
            })?;
            ordering_predicate = Some(iri.clone());
        } else if predicate == vocab.sort_order {
            if shape != Some(ResultShape::ListWithOrderByPredicate) {
                return Err(RdfTreeError::ShapeMismatch {
                    reason: format!("a sort order was supplied for {}", shape_name(shape)),
                });
            }
            let order = object_resource(result)?;
            direction = match order.as_iri().map(Iri::as_str) {
                Some(iri) if iri == vocab.ascending_order => SortDirection::Ascending,
                Some(iri) if iri == vocab.descending_order => SortDirection::Descending,
                _ => {
                    return Err(RdfTreeError::UnknownSortOrder {
                        value: order.identifier(),
                    })
                }
            };
        }
    }

    let Some(shape) = shape else {
        return Err(RdfTreeError::MissingRoot {
            this: vocab.this.clone(),
        });
    };

    tracing::debug!(
        %shape,
        roots = roots.len(),
        ordering_predicate = ordering_predicate.as_ref().map(Iri::as_str),
        ?direction,
        "classified result graph"
    );

    Ok(Classification {
        shape,
        control,
        roots,
        ordering_predicate,
        direction,
    })
}

fn identify_shape(
    shape: &mut Option<ResultShape>,
    found: ResultShape,
    predicate: &str,
) -> Result<()> {
    match *shape {
        None => {
            *shape = Some(found);
            Ok(())
        }
        // `listItem` is the only repeatable indicator.
        Some(ResultShape::ListWithOrderByPredicate)
            if found == ResultShape::ListWithOrderByPredicate =>
        {
            Ok(())
        }
        Some(existing) => Err(RdfTreeError::ConflictingShape {
            reason: format!(
                "shape {existing} was identified alongside conflicting predicate {predicate}"
            ),
        }),
    }
}

fn shape_name(shape: Option<ResultShape>) -> String {
    shape.map_or_else(|| "an unidentified shape".to_string(), |s| s.to_string())
}

/// Follow `result:next` links from `start` until a resource without one.
///
/// Each link must be unique per resource and point at a resource; a chain
/// that comes back to an earlier element is rejected instead of looping.
pub fn resolve_list_chain<S: TripleSource + ?Sized>(
    store: &S,
    vocab: &ResultVocabulary,
    start: &Resource,
) -> Result<Vec<Resource>> {
    let next = Iri::new(&vocab.next);
    let mut chain = vec![start.clone()];
    let mut visited: AHashSet<Resource> = AHashSet::new();
    visited.insert(start.clone());

    let mut current = start.clone();
    loop {
        let links = store.matching(Some(&current), Some(&next), None);
        let link = match links.as_slice() {
            [] => break,
            [only] => only,
            _ => {
                return Err(RdfTreeError::MalformedList {
                    resource: current.identifier(),
                    reason: format!("too many {} statements", vocab.next),
                })
            }
        };
        let Term::Resource(following) = &link.object else {
            return Err(RdfTreeError::MalformedList {
                resource: current.identifier(),
                reason: format!("{} cannot point at a literal", vocab.next),
            });
        };
        if !visited.insert(following.clone()) {
            return Err(RdfTreeError::MalformedList {
                resource: following.identifier(),
                reason: "the list loops back on itself".to_string(),
            });
        }
        chain.push(following.clone());
        current = following.clone();
    }
    Ok(chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Graph;
    use crate::term::Literal;

    const EX: &str = "http://example.org/";

    fn ex(local: &str) -> Resource {
        Resource::iri(format!("{EX}{local}"))
    }

    fn graph_with(vocab: &ResultVocabulary, statements: &[(&str, Term)]) -> Graph {
        let mut g = Graph::new();
        for (predicate, object) in statements {
            g.add(Resource::iri(&vocab.this), *predicate, object.clone());
        }
        g
    }

    #[test]
    fn item_shape() {
        let vocab = ResultVocabulary::default();
        let g = graph_with(&vocab, &[(vocab.item.as_str(), ex("x").into())]);
        let c = classify(&g, &vocab).unwrap();
        assert_eq!(c.shape, ResultShape::Item);
        assert_eq!(c.roots, vec![ex("x")]);
        assert_eq!(c.direction, SortDirection::Ascending);
        assert_eq!(c.control.len(), 1);
    }

    #[test]
    fn missing_this_fails() {
        let vocab = ResultVocabulary::default();
        let mut g = Graph::new();
        g.add(ex("a"), format!("{EX}p"), ex("b"));
        assert!(matches!(
            classify(&g, &vocab),
            Err(RdfTreeError::MissingRoot { .. })
        ));
    }

    #[test]
    fn no_shape_indicator_fails_as_missing_root() {
        let vocab = ResultVocabulary::default();
        let g = graph_with(&vocab, &[("http://example.org/unrelated", ex("b").into())]);
        assert!(matches!(
            classify(&g, &vocab),
            Err(RdfTreeError::MissingRoot { .. })
        ));
    }

    #[test]
    fn two_items_conflict() {
        let vocab = ResultVocabulary::default();
        let g = graph_with(
            &vocab,
            &[(vocab.item.as_str(), ex("x").into()), (vocab.item.as_str(), ex("y").into())],
        );
        assert!(matches!(
            classify(&g, &vocab),
            Err(RdfTreeError::ConflictingShape { .. })
        ));
    }

    #[test]
    fn item_next_mix_conflicts() {
        let vocab = ResultVocabulary::default();
        let g = graph_with(
            &vocab,
            &[(vocab.item.as_str(), ex("x").into()), (vocab.next.as_str(), ex("y").into())],
        );
        assert!(matches!(
            classify(&g, &vocab),
            Err(RdfTreeError::ConflictingShape { .. })
        ));
    }

    #[test]
    fn list_item_with_item_conflicts() {
        let vocab = ResultVocabulary::default();
        let g = graph_with(
            &vocab,
            &[
                (vocab.list_item.as_str(), ex("x").into()),
                (vocab.list_item.as_str(), ex("y").into()),
                (vocab.next.as_str(), ex("z").into()),
            ],
        );
        assert!(matches!(
            classify(&g, &vocab),
            Err(RdfTreeError::ConflictingShape { .. })
        ));
    }

    #[test]
    fn literal_object_is_invalid() {
        let vocab = ResultVocabulary::default();
        let g = graph_with(&vocab, &[(vocab.item.as_str(), Term::Literal(Literal::plain("x")))]);
        assert!(matches!(
            classify(&g, &vocab),
            Err(RdfTreeError::InvalidControlTriple { .. })
        ));
    }

    #[test]
    fn ordered_list_with_predicate_and_direction() {
        let vocab = ResultVocabulary::default();
        let g = graph_with(
            &vocab,
            &[
                (vocab.list_item.as_str(), ex("a").into()),
                (vocab.list_item.as_str(), ex("b").into()),
                (vocab.order_by_predicate.as_str(), ex("rank").into()),
                (vocab.sort_order.as_str(), Term::iri(&vocab.descending_order)),
            ],
        );
        let c = classify(&g, &vocab).unwrap();
        assert_eq!(c.shape, ResultShape::ListWithOrderByPredicate);
        assert_eq!(c.roots.len(), 2);
        assert_eq!(c.ordering_predicate, Some(Iri::new(format!("{EX}rank"))));
        assert_eq!(c.direction, SortDirection::Descending);
    }

    #[test]
    fn unknown_sort_order() {
        let vocab = ResultVocabulary::default();
        let g = graph_with(
            &vocab,
            &[
                (vocab.list_item.as_str(), ex("a").into()),
                (vocab.sort_order.as_str(), ex("Sideways").into()),
            ],
        );
        assert!(matches!(
            classify(&g, &vocab),
            Err(RdfTreeError::UnknownSortOrder { .. })
        ));
    }

    #[test]
    fn ordering_beside_next_conflicts() {
        let vocab = ResultVocabulary::default();
        let g = graph_with(
            &vocab,
            &[
                (vocab.next.as_str(), ex("a").into()),
                (vocab.order_by_predicate.as_str(), ex("rank").into()),
            ],
        );
        assert!(matches!(
            classify(&g, &vocab),
            Err(RdfTreeError::ConflictingShape { .. })
        ));
    }

    #[test]
    fn ordering_without_list_is_a_mismatch() {
        let vocab = ResultVocabulary::default();
        let g = graph_with(&vocab, &[(vocab.order_by_predicate.as_str(), ex("rank").into())]);
        assert!(matches!(
            classify(&g, &vocab),
            Err(RdfTreeError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn two_ordering_predicates_fail() {
        let vocab = ResultVocabulary::default();
        let g = graph_with(
            &vocab,
            &[
                (vocab.list_item.as_str(), ex("a").into()),
                (vocab.order_by_predicate.as_str(), ex("rank").into()),
                (vocab.order_by_predicate.as_str(), ex("score").into()),
            ],
        );
        assert!(matches!(
            classify(&g, &vocab),
            Err(RdfTreeError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn chain_follows_next_links() {
        let vocab = ResultVocabulary::default();
        let mut g = Graph::new();
        g.add(ex("a"), &vocab.next, ex("b"));
        g.add(ex("b"), &vocab.next, ex("c"));
        let chain = resolve_list_chain(&g, &vocab, &ex("a")).unwrap();
        assert_eq!(chain, vec![ex("a"), ex("b"), ex("c")]);
    }

    #[test]
    fn chain_rejects_cycles_and_forks() {
        let vocab = ResultVocabulary::default();
        let mut g = Graph::new();
        g.add(ex("a"), &vocab.next, ex("b"));
        g.add(ex("b"), &vocab.next, ex("a"));
        assert!(matches!(
            resolve_list_chain(&g, &vocab, &ex("a")),
            Err(RdfTreeError::MalformedList { .. })
        ));

        let mut g = Graph::new();
        g.add(ex("a"), &vocab.next, ex("b"));
        g.add(ex("a"), &vocab.next, ex("c"));
        assert!(matches!(
            resolve_list_chain(&g, &vocab, &ex("a")),
            Err(RdfTreeError::MalformedList { .. })
        ));

        let mut g = Graph::new();
        g.add(ex("a"), &vocab.next, Literal::plain("b"));
        assert!(matches!(
            resolve_list_chain(&g, &vocab, &ex("a")),
            Err(RdfTreeError::MalformedList { .. })
        ));
    }
}
