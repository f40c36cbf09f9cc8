//! RDF term model: IRIs, blank nodes, literals and triples.
//!
//! Terms are cheap to clone (`Arc<str>` inside) because the builder copies
//! them into tree nodes freely.
//!
//! Two orderings live here:
//! - the derived `Ord`, a structural order used for set/map keys, and
//! - [`compare_values`], the value order used when siblings or list items
//!   are sorted for output. Textual literals come first; numbers and
//!   booleans compare by value among themselves, other non-textual pairs by
//!   string form. Lexical form, datatype and language break the remaining
//!   ties so that no two distinct terms compare equal.

use crate::vocab::{rdf, xsd};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// An expanded IRI.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Iri(Arc<str>);

impl Iri {
    pub fn new(iri: impl AsRef<str>) -> Self {
        Self(Arc::from(iri.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Iri {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Iri {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// A graph resource: anything that can sit in subject position.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Resource {
    Iri(Iri),
    /// Blank node label, without the `_:` prefix.
    Blank(Arc<str>),
}

impl Resource {
    pub fn iri(iri: impl AsRef<str>) -> Self {
        Resource::Iri(Iri::new(iri))
    }

    pub fn blank(label: impl AsRef<str>) -> Self {
        Resource::Blank(Arc::from(label.as_ref()))
    }

    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Resource::Iri(iri) => Some(iri),
            Resource::Blank(_) => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Resource::Blank(_))
    }

    /// Identifier string used for ordering: the IRI itself, or `_:label`.
    pub fn identifier(&self) -> String {
        self.to_string()
    }

    /// Order resources by identifier string.
    pub fn compare_identifier(&self, other: &Resource) -> Ordering {
        match (self, other) {
            (Resource::Iri(a), Resource::Iri(b)) => a.as_str().cmp(b.as_str()),
            // Same `_:` prefix on both sides.
            (Resource::Blank(a), Resource::Blank(b)) => a.cmp(b),
            _ => self
                .identifier()
                .cmp(&other.identifier())
                .then_with(|| self.is_blank().cmp(&other.is_blank())),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Iri(iri) => f.write_str(iri.as_str()),
            Resource::Blank(label) => write!(f, "_:{label}"),
        }
    }
}

/// A literal as it appears in the graph: lexical form plus optional datatype
/// and language tag.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    pub lexical: Arc<str>,
    pub datatype: Option<Iri>,
    pub language: Option<Arc<str>>,
}

/// The native value of a literal, derived from its datatype.
#[derive(Clone, Debug, PartialEq)]
pub enum LiteralValue<'a> {
    Text(&'a str),
    Boolean(bool),
    Integer(i64),
    Number(f64),
    /// Unknown datatype or an ill-typed lexical form.
    Other(&'a str),
}

impl Literal {
    pub fn plain(lexical: impl AsRef<str>) -> Self {
        Self {
            lexical: Arc::from(lexical.as_ref()),
            datatype: None,
            language: None,
        }
    }

    pub fn typed(lexical: impl AsRef<str>, datatype: impl AsRef<str>) -> Self {
        Self {
            lexical: Arc::from(lexical.as_ref()),
            datatype: Some(Iri::new(datatype)),
            language: None,
        }
    }

    pub fn lang(lexical: impl AsRef<str>, language: impl AsRef<str>) -> Self {
        Self {
            lexical: Arc::from(lexical.as_ref()),
            datatype: None,
            language: Some(Arc::from(language.as_ref())),
        }
    }

    pub fn lexical(&self) -> &str {
        &self.lexical
    }

    pub fn value(&self) -> LiteralValue<'_> {
        let lexical = self.lexical();
        let Some(datatype) = self.datatype.as_ref().map(Iri::as_str) else {
            return LiteralValue::Text(lexical);
        };
        match datatype {
            xsd::STRING | xsd::NORMALIZED_STRING | xsd::TOKEN | rdf::LANG_STRING => {
                LiteralValue::Text(lexical)
            }
            xsd::BOOLEAN => match lexical.trim() {
                "true" | "1" => LiteralValue::Boolean(true),
                "false" | "0" => LiteralValue::Boolean(false),
                _ => LiteralValue::Other(lexical),
            },
            xsd::DECIMAL | xsd::DOUBLE | xsd::FLOAT => parse_number(lexical)
                .map(LiteralValue::Number)
                .unwrap_or(LiteralValue::Other(lexical)),
            dt if xsd::INTEGER_TYPES.contains(&dt) => {
                let trimmed = lexical.trim();
                match trimmed.strip_prefix('+').unwrap_or(trimmed).parse::<i64>() {
                    Ok(i) => LiteralValue::Integer(i),
                    // Out of i64 range: still numeric.
                    Err(_) => parse_number(lexical)
                        .map(LiteralValue::Number)
                        .unwrap_or(LiteralValue::Other(lexical)),
                }
            }
            _ => LiteralValue::Other(lexical),
        }
    }

    pub fn is_textual(&self) -> bool {
        matches!(self.value(), LiteralValue::Text(_))
    }
}

fn parse_number(lexical: &str) -> Option<f64> {
    match lexical.trim() {
        "INF" | "+INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        other => other.parse::<f64>().ok(),
    }
}

impl LiteralValue<'_> {
    fn as_f64(&self) -> Option<f64> {
        match self {
            LiteralValue::Integer(i) => Some(*i as f64),
            LiteralValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.lexical.escape_default())?;
        if let Some(lang) = &self.language {
            write!(f, "@{lang}")?;
        } else if let Some(dt) = &self.datatype {
            write!(f, "^^<{dt}>")?;
        }
        Ok(())
    }
}

/// Compare two literals by natural value.
///
/// Textual literals sort before all others. Two numbers compare numerically
/// and two booleans by value; any other pair of non-textual literals, mixed
/// types included, compares by lexical form. Remaining ties fall back to the
/// lexical form, then datatype, then language.
///
/// Mixing numbers with other non-textual datatypes under one key can make
/// the order intransitive (`"10"` < `"9"` by string, `9` < `10` by value).
pub fn compare_literals(a: &Literal, b: &Literal) -> Ordering {
    let by_value = match (a.value(), b.value()) {
        (LiteralValue::Text(x), LiteralValue::Text(y)) => x.cmp(y),
        (LiteralValue::Boolean(x), LiteralValue::Boolean(y)) => x.cmp(&y),
        (x, y) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => Ordering::Equal,
        },
    };
    b.is_textual()
        .cmp(&a.is_textual())
        .then(by_value)
        .then_with(|| a.lexical.cmp(&b.lexical))
        .then_with(|| a.datatype.cmp(&b.datatype))
        .then_with(|| a.language.cmp(&b.language))
}

/// Any RDF term in object position.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    Resource(Resource),
    Literal(Literal),
}

impl Term {
    pub fn iri(iri: impl AsRef<str>) -> Self {
        Term::Resource(Resource::iri(iri))
    }

    pub fn blank(label: impl AsRef<str>) -> Self {
        Term::Resource(Resource::blank(label))
    }

    pub fn literal(lexical: impl AsRef<str>) -> Self {
        Term::Literal(Literal::plain(lexical))
    }

    pub fn typed(lexical: impl AsRef<str>, datatype: impl AsRef<str>) -> Self {
        Term::Literal(Literal::typed(lexical, datatype))
    }

    pub fn as_resource(&self) -> Option<&Resource> {
        match self {
            Term::Resource(r) => Some(r),
            Term::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(l) => Some(l),
            Term::Resource(_) => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    pub fn is_resource(&self) -> bool {
        matches!(self, Term::Resource(_))
    }
}

impl From<Resource> for Term {
    fn from(value: Resource) -> Self {
        Term::Resource(value)
    }
}

impl From<Literal> for Term {
    fn from(value: Literal) -> Self {
        Term::Literal(value)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Resource(r) => fmt::Display::fmt(r, f),
            Term::Literal(l) => fmt::Display::fmt(l, f),
        }
    }
}

/// Value order of two terms: literals before resources, literals by
/// [`compare_literals`], resources by identifier.
pub fn compare_values(a: &Term, b: &Term) -> Ordering {
    match (a, b) {
        (Term::Literal(x), Term::Literal(y)) => compare_literals(x, y),
        (Term::Literal(_), Term::Resource(_)) => Ordering::Less,
        (Term::Resource(_), Term::Literal(_)) => Ordering::Greater,
        (Term::Resource(x), Term::Resource(y)) => x.compare_identifier(y),
    }
}

/// A single RDF statement.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Resource,
    pub predicate: Iri,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Resource, predicate: Iri, object: impl Into<Term>) -> Self {
        Self {
            subject,
            predicate,
            object: object.into(),
        }
    }

    /// True for `s p s` statements.
    pub fn is_self_loop(&self) -> bool {
        matches!(&self.object, Term::Resource(o) if *o == self.subject)
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subject = match &self.subject {
            Resource::Iri(iri) => format!("<{iri}>"),
            blank => blank.to_string(),
        };
        let object = match &self.object {
            Term::Resource(Resource::Iri(iri)) => format!("<{iri}>"),
            other => other.to_string(),
        };
        write!(f, "{subject} <{}> {object} .", self.predicate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textual_literals_sort_before_other_kinds() {
        let text = Literal::plain("zzz");
        let number = Literal::typed("1", xsd::INTEGER);
        let flag = Literal::typed("true", xsd::BOOLEAN);
        assert_eq!(compare_literals(&text, &number), Ordering::Less);
        assert_eq!(compare_literals(&text, &flag), Ordering::Less);
    }

    #[test]
    fn mixed_non_textual_types_compare_by_string_form() {
        let five = Literal::typed("5", xsd::INTEGER);
        let flag = Literal::typed("true", xsd::BOOLEAN);
        let date = Literal::typed("2020-01-01", "http://www.w3.org/2001/XMLSchema#date");
        assert_eq!(compare_literals(&five, &flag), Ordering::Less);
        assert_eq!(compare_literals(&date, &five), Ordering::Less);
        assert_eq!(compare_literals(&flag, &five), Ordering::Greater);
        // Same-kind pairs still use their native value.
        let f = Literal::typed("false", xsd::BOOLEAN);
        assert_eq!(compare_literals(&f, &flag), Ordering::Less);
    }

    #[test]
    fn numbers_compare_numerically_across_datatypes() {
        let nine = Literal::typed("9", xsd::INTEGER);
        let ten = Literal::typed("10", xsd::INTEGER);
        let nine_and_a_half = Literal::typed("9.5", xsd::DECIMAL);
        assert_eq!(compare_literals(&nine, &ten), Ordering::Less);
        assert_eq!(compare_literals(&nine_and_a_half, &ten), Ordering::Less);
        assert_eq!(compare_literals(&nine, &nine_and_a_half), Ordering::Less);
    }

    #[test]
    fn equal_values_fall_back_to_lexical_form() {
        let one = Literal::typed("1", xsd::INTEGER);
        let padded = Literal::typed("01", xsd::INTEGER);
        assert_eq!(compare_literals(&padded, &one), Ordering::Less);
        assert_eq!(compare_literals(&one, &one), Ordering::Equal);
    }

    #[test]
    fn ill_typed_numbers_are_other() {
        let bad = Literal::typed("abc", xsd::INTEGER);
        assert_eq!(bad.value(), LiteralValue::Other("abc"));
        assert!(!bad.is_textual());
        assert!(Literal::lang("chat", "fr").is_textual());
    }

    #[test]
    fn literals_sort_before_resources() {
        let lit = Term::literal("x");
        let res = Term::iri("http://example.org/a");
        assert_eq!(compare_values(&lit, &res), Ordering::Less);
        assert_eq!(compare_values(&res, &lit), Ordering::Greater);
    }

    #[test]
    fn resources_compare_by_identifier() {
        let a = Resource::iri("http://example.org/a");
        let b = Resource::iri("http://example.org/b");
        let blank = Resource::blank("b0");
        assert_eq!(a.compare_identifier(&b), Ordering::Less);
        assert_eq!(blank.compare_identifier(&a), Ordering::Less);
        assert_eq!(blank.identifier(), "_:b0");
    }

    #[test]
    fn self_loop_detection() {
        let a = Resource::iri("http://example.org/a");
        let p = Iri::new("http://example.org/p");
        assert!(Triple::new(a.clone(), p.clone(), a.clone()).is_self_loop());
        assert!(!Triple::new(a, p, Literal::plain("a")).is_self_loop());
    }
}
