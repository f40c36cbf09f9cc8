//! Vocabulary constants and the reserved result-control vocabulary.
//!
//! The control vocabulary (`result:this`, `result:item`, ...) tells the
//! generator which resources form the root(s) of the output. Its namespace is
//! configurable: a [`ResultVocabulary`] is built from a prefix and handed to
//! every stage explicitly, so independent conversions can use different
//! prefixes side by side.

/// Default namespace of the result-control vocabulary.
pub const DEFAULT_RESULT_PREFIX: &str = "http://purl.org/ontology/rdf-result/";

/// RDF vocabulary constants
pub mod rdf {
    pub const NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

    /// rdf:type IRI
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

    /// rdf:langString IRI
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
}

/// XSD datatype IRIs the literal comparator understands natively.
pub mod xsd {
    pub const NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";

    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const NORMALIZED_STRING: &str = "http://www.w3.org/2001/XMLSchema#normalizedString";
    pub const TOKEN: &str = "http://www.w3.org/2001/XMLSchema#token";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    pub const FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";

    /// Integer-valued datatypes (all map onto `i64` when in range).
    pub const INTEGER_TYPES: &[&str] = &[
        INTEGER,
        "http://www.w3.org/2001/XMLSchema#long",
        "http://www.w3.org/2001/XMLSchema#int",
        "http://www.w3.org/2001/XMLSchema#short",
        "http://www.w3.org/2001/XMLSchema#byte",
        "http://www.w3.org/2001/XMLSchema#nonNegativeInteger",
        "http://www.w3.org/2001/XMLSchema#nonPositiveInteger",
        "http://www.w3.org/2001/XMLSchema#positiveInteger",
        "http://www.w3.org/2001/XMLSchema#negativeInteger",
        "http://www.w3.org/2001/XMLSchema#unsignedLong",
        "http://www.w3.org/2001/XMLSchema#unsignedInt",
        "http://www.w3.org/2001/XMLSchema#unsignedShort",
        "http://www.w3.org/2001/XMLSchema#unsignedByte",
    ];
}

/// The reserved result-control vocabulary, resolved against one prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultVocabulary {
    prefix: String,
    pub this: String,
    pub item: String,
    pub next: String,
    pub list_item: String,
    pub order_by_predicate: String,
    pub sort_order: String,
    pub ascending_order: String,
    pub descending_order: String,
}

impl ResultVocabulary {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let term = |segment: &str| format!("{prefix}{segment}");
        Self {
            this: term("this"),
            item: term("item"),
            next: term("next"),
            list_item: term("listItem"),
            order_by_predicate: term("orderByPredicate"),
            sort_order: term("sortOrder"),
            ascending_order: term("AscendingOrder"),
            descending_order: term("DescendingOrder"),
            prefix,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// True when `iri` lives in the control namespace.
    ///
    /// Only the namespace part of the IRI counts: `<prefix>sub/thing` is not
    /// a control term, matching how namespaces are split everywhere else.
    pub fn is_control(&self, iri: &str) -> bool {
        iri.strip_prefix(self.prefix.as_str())
            .is_some_and(|local| !local.is_empty() && !local.contains(['/', '#']))
    }
}

impl Default for ResultVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_RESULT_PREFIX)
    }
}

/// Split an IRI into `(namespace, local name)` at the last `#` or `/`.
///
/// IRIs without either separator have an empty namespace.
pub fn split_iri(iri: &str) -> (&str, &str) {
    match iri.rfind(['#', '/']) {
        Some(idx) => iri.split_at(idx + 1),
        None => ("", iri),
    }
}
