//! RDF loading for rdftree (boundary adapter).
//!
//! Parses RDF serializations with **Sophia** into an in-memory
//! [`rdftree_core::Graph`]:
//! - N-Triples (`.nt`)
//! - Turtle (`.ttl`)
//! - N-Quads (`.nq`)
//! - TriG (`.trig`)
//! - RDF/XML (`.rdf`, `.owl`, `.xml`)
//!
//! Named graphs are flattened: every quad lands in the one default graph.

use anyhow::{anyhow, Context, Result};
use rdftree_core::vocab::xsd;
use rdftree_core::{
    Graph, Literal, Resource, Term as RdfTerm, Triple as RdfTriple, TripleSource as _,
};
use sophia::api::prelude::*;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    NTriples,
    Turtle,
    NQuads,
    TriG,
    RdfXml,
}

impl RdfFormat {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();
        ext.parse()
    }
}

impl FromStr for RdfFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "nt" | "ntriples" => RdfFormat::NTriples,
            "ttl" | "turtle" => RdfFormat::Turtle,
            "nq" | "nquads" => RdfFormat::NQuads,
            "trig" => RdfFormat::TriG,
            "rdf" | "owl" | "xml" | "rdfxml" => RdfFormat::RdfXml,
            other => return Err(anyhow!("unsupported RDF format: .{other}")),
        })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
struct RdfLoadSinkError {
    message: String,
}

impl From<anyhow::Error> for RdfLoadSinkError {
    fn from(value: anyhow::Error) -> Self {
        Self {
            message: value.to_string(),
        }
    }
}

fn unescape_rdf_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            Some(u @ ('u' | 'U')) => {
                let len = if u == 'u' { 4 } else { 8 };
                let hex: String = chars.by_ref().take(len).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push('\\');
                        out.push(u);
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Parse a term from its N-Triples-like display form.
fn parse_term_display(term: &str) -> Result<RdfTerm> {
    let s = term.trim();

    if let Some(rest) = s.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
        return Ok(RdfTerm::iri(rest));
    }

    if let Some(rest) = s.strip_prefix("_:") {
        return Ok(RdfTerm::blank(rest));
    }

    if s.starts_with('"') {
        let mut end_quote = None;
        let mut escaped = false;
        for (i, ch) in s.char_indices().skip(1) {
            if escaped {
                escaped = false;
                continue;
            }
            match ch {
                '\\' => escaped = true,
                '"' => {
                    end_quote = Some(i);
                    break;
                }
                _ => {}
            }
        }
        let Some(end) = end_quote else {
            return Err(anyhow!("invalid literal term (missing closing quote): {s}"));
        };

        let lexical = unescape_rdf_string(&s[1..end]);
        let rest = s[end + 1..].trim();

        if let Some(lang) = rest.strip_prefix('@') {
            return Ok(RdfTerm::Literal(Literal::lang(lexical, lang)));
        }
        if let Some(dt) = rest.strip_prefix("^^") {
            let dt = dt.trim();
            let dt = dt
                .strip_prefix('<')
                .and_then(|t| t.strip_suffix('>'))
                .unwrap_or(dt);
            // A simple literal and its explicit xsd:string form are the same
            // RDF term.
            if dt.is_empty() || dt == xsd::STRING {
                return Ok(RdfTerm::Literal(Literal::plain(lexical)));
            }
            return Ok(RdfTerm::Literal(Literal::typed(lexical, dt)));
        }
        return Ok(RdfTerm::Literal(Literal::plain(lexical)));
    }

    Err(anyhow!("unsupported RDF term form: {s}"))
}

/// Turn one parsed statement into a graph triple.
///
/// Statements whose predicate is not an IRI (generalized RDF) are skipped
/// with a warning rather than failing the whole load.
fn push_statement(graph: &mut Graph, subject: &str, predicate: &str, object: &str) -> Result<()> {
    let subject = match parse_term_display(subject)? {
        RdfTerm::Resource(resource) => resource,
        RdfTerm::Literal(literal) => {
            return Err(anyhow!("expected IRI/blank node subject, got literal: {literal}"))
        }
    };
    let predicate = match parse_term_display(predicate)? {
        RdfTerm::Resource(Resource::Iri(iri)) => iri,
        other => {
            tracing::warn!(predicate = %other, "skipping statement with a non-IRI predicate");
            return Ok(());
        }
    };
    let object = parse_term_display(object)?;
    graph.insert(RdfTriple::new(subject, predicate, object));
    Ok(())
}

/// Parse RDF bytes in the given format into a graph.
pub fn load_graph(bytes: &[u8], format: RdfFormat) -> Result<Graph> {
    let cursor = std::io::Cursor::new(bytes);
    let reader = std::io::BufReader::new(cursor);
    let mut graph = Graph::new();

    match format {
        RdfFormat::NTriples => {
            let mut parser = sophia::turtle::parser::nt::parse_bufread(reader);
            parser
                .try_for_each_triple(|t| -> std::result::Result<(), RdfLoadSinkError> {
                    push_statement(
                        &mut graph,
                        &t.s().to_string(),
                        &t.p().to_string(),
                        &t.o().to_string(),
                    )
                    .map_err(RdfLoadSinkError::from)
                })
                .map_err(|e| anyhow!("failed to parse N-Triples: {e}"))?;
        }
        RdfFormat::Turtle => {
            let mut parser = sophia::turtle::parser::turtle::parse_bufread(reader);
            parser
                .try_for_each_triple(|t| -> std::result::Result<(), RdfLoadSinkError> {
                    push_statement(
                        &mut graph,
                        &t.s().to_string(),
                        &t.p().to_string(),
                        &t.o().to_string(),
                    )
                    .map_err(RdfLoadSinkError::from)
                })
                .map_err(|e| anyhow!("failed to parse Turtle: {e}"))?;
        }
        RdfFormat::NQuads => {
            let mut parser = sophia::turtle::parser::nq::parse_bufread(reader);
            parser
                .try_for_each_quad(|q| -> std::result::Result<(), RdfLoadSinkError> {
                    push_statement(
                        &mut graph,
                        &q.s().to_string(),
                        &q.p().to_string(),
                        &q.o().to_string(),
                    )
                    .map_err(RdfLoadSinkError::from)
                })
                .map_err(|e| anyhow!("failed to parse N-Quads: {e}"))?;
        }
        RdfFormat::TriG => {
            let mut parser = sophia::turtle::parser::trig::parse_bufread(reader);
            parser
                .try_for_each_quad(|q| -> std::result::Result<(), RdfLoadSinkError> {
                    push_statement(
                        &mut graph,
                        &q.s().to_string(),
                        &q.p().to_string(),
                        &q.o().to_string(),
                    )
                    .map_err(RdfLoadSinkError::from)
                })
                .map_err(|e| anyhow!("failed to parse TriG: {e}"))?;
        }
        RdfFormat::RdfXml => {
            let mut parser = sophia::xml::parser::parse_bufread(reader);
            parser
                .try_for_each_triple(|t| -> std::result::Result<(), RdfLoadSinkError> {
                    push_statement(
                        &mut graph,
                        &t.s().to_string(),
                        &t.p().to_string(),
                        &t.o().to_string(),
                    )
                    .map_err(RdfLoadSinkError::from)
                })
                .map_err(|e| anyhow!("failed to parse RDF/XML: {e}"))?;
        }
    }

    tracing::debug!(?format, triples = graph.len(), "loaded RDF graph");
    Ok(graph)
}

/// Load a file, picking the format from its extension.
pub fn load_graph_file(path: &Path) -> Result<Graph> {
    let format = RdfFormat::from_path(path)?;
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    load_graph(&bytes, format).with_context(|| format!("failed to load {}", path.display()))
}
