//! RDF term types: IRI, blank node, and literal

use crate::Datatype;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Blank node identifier
///
/// Labels are only meaningful within the graph that produced them. The label
/// never includes the `_:` prefix.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlankId(Arc<str>);

impl BlankId {
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(Arc::from(label.as_ref()))
    }

    /// The label, without `_:`
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BlankId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

/// Native literal value
///
/// JSON-LD hands us booleans and numbers natively; Turtle hands us lexical
/// strings. Both end up here.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum LiteralValue {
    String(Arc<str>),
    Boolean(bool),
    Integer(i64),
    Double(f64),
}

impl LiteralValue {
    pub fn string(s: impl AsRef<str>) -> Self {
        LiteralValue::String(Arc::from(s.as_ref()))
    }

    /// Lexical form of the value
    pub fn lexical(&self) -> String {
        match self {
            LiteralValue::String(s) => s.to_string(),
            LiteralValue::Boolean(b) => b.to_string(),
            LiteralValue::Integer(i) => i.to_string(),
            LiteralValue::Double(d) if d.is_nan() => "NaN".to_string(),
            LiteralValue::Double(d) if d.is_infinite() => {
                if d.is_sign_positive() { "INF" } else { "-INF" }.to_string()
            }
            LiteralValue::Double(d) => d.to_string(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            LiteralValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean view of the value
    ///
    /// Lexical `"true"`/`"1"` and `"false"`/`"0"` count, since Turtle
    /// documents frequently spell booleans as typed strings.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            LiteralValue::Boolean(b) => Some(*b),
            LiteralValue::String(s) => match s.as_ref() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            LiteralValue::String(_) => 0,
            LiteralValue::Boolean(_) => 1,
            LiteralValue::Integer(_) => 2,
            LiteralValue::Double(_) => 3,
        }
    }
}

// f64 has no total equality; compare doubles by bit pattern so that
// LiteralValue can key hash maps and sort deterministically.
impl PartialEq for LiteralValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LiteralValue {}

impl Hash for LiteralValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            LiteralValue::String(s) => s.hash(state),
            LiteralValue::Boolean(b) => b.hash(state),
            LiteralValue::Integer(i) => i.hash(state),
            LiteralValue::Double(d) => d.to_bits().hash(state),
        }
    }
}

impl PartialOrd for LiteralValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LiteralValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (LiteralValue::String(a), LiteralValue::String(b)) => a.cmp(b),
            (LiteralValue::Boolean(a), LiteralValue::Boolean(b)) => a.cmp(b),
            (LiteralValue::Integer(a), LiteralValue::Integer(b)) => a.cmp(b),
            (LiteralValue::Double(a), LiteralValue::Double(b)) => a.total_cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// An RDF term
///
/// `Term::Iri` always holds an expanded IRI. Predicates are always `Term::Iri`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    Iri(Arc<str>),
    BlankNode(BlankId),
    Literal {
        value: LiteralValue,
        datatype: Datatype,
        /// Only set when the datatype is rdf:langString
        language: Option<Arc<str>>,
    },
}

impl Term {
    pub fn iri(iri: impl AsRef<str>) -> Self {
        Term::Iri(Arc::from(iri.as_ref()))
    }

    pub fn blank(label: impl AsRef<str>) -> Self {
        Term::BlankNode(BlankId::new(label))
    }

    /// Plain string literal (xsd:string)
    pub fn string(value: impl AsRef<str>) -> Self {
        Self::typed(value, Datatype::xsd_string())
    }

    pub fn boolean(value: bool) -> Self {
        Term::Literal {
            value: LiteralValue::Boolean(value),
            datatype: Datatype::xsd_boolean(),
            language: None,
        }
    }

    pub fn integer(value: i64) -> Self {
        Term::Literal {
            value: LiteralValue::Integer(value),
            datatype: Datatype::xsd_integer(),
            language: None,
        }
    }

    /// Language-tagged string (rdf:langString)
    pub fn lang_string(value: impl AsRef<str>, lang: impl AsRef<str>) -> Self {
        Term::Literal {
            value: LiteralValue::string(value),
            datatype: Datatype::rdf_lang_string(),
            language: Some(Arc::from(lang.as_ref())),
        }
    }

    /// Literal with an arbitrary datatype, stored lexically
    pub fn typed(value: impl AsRef<str>, datatype: Datatype) -> Self {
        Term::Literal {
            value: LiteralValue::string(value),
            datatype,
            language: None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_blank(&self) -> Option<&BlankId> {
        match self {
            Term::BlankNode(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<(&LiteralValue, &Datatype, Option<&str>)> {
        match self {
            Term::Literal {
                value,
                datatype,
                language,
            } => Some((value, datatype, language.as_deref())),
            _ => None,
        }
    }

    /// Lexical form of a literal, or the IRI string of an IRI
    ///
    /// Blank nodes have no textual value.
    pub fn lexical(&self) -> Option<String> {
        match self {
            Term::Iri(iri) => Some(iri.to_string()),
            Term::Literal { value, .. } => Some(value.lexical()),
            Term::BlankNode(_) => None,
        }
    }

    /// Boolean view of a literal
    pub fn as_bool(&self) -> Option<bool> {
        self.as_literal().and_then(|(value, _, _)| value.as_bool())
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::BlankNode(id) => write!(f, "{id}"),
            Term::Literal {
                value,
                datatype,
                language,
            } => {
                let lexical = value.lexical().replace('\\', "\\\\").replace('"', "\\\"");
                match language {
                    Some(lang) => write!(f, "\"{lexical}\"@{lang}"),
                    None if datatype.is_xsd_string() => write!(f, "\"{lexical}\""),
                    None => write!(f, "\"{lexical}\"^^{datatype}"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_forms() {
        assert_eq!(Term::iri("http://example.org/a").to_string(), "<http://example.org/a>");
        assert_eq!(Term::blank("b1").to_string(), "_:b1");
        assert_eq!(Term::string("say \"hi\"").to_string(), "\"say \\\"hi\\\"\"");
        assert_eq!(Term::lang_string("Region", "en").to_string(), "\"Region\"@en");
        assert_eq!(
            Term::boolean(true).to_string(),
            "\"true\"^^<http://www.w3.org/2001/XMLSchema#boolean>"
        );
    }

    #[test]
    fn boolean_views() {
        assert_eq!(Term::boolean(false).as_bool(), Some(false));
        assert_eq!(Term::typed("true", Datatype::xsd_boolean()).as_bool(), Some(true));
        assert_eq!(Term::string("maybe").as_bool(), None);
        assert_eq!(Term::iri("http://example.org/x").as_bool(), None);
    }

    #[test]
    fn doubles_have_total_equality() {
        let nan = LiteralValue::Double(f64::NAN);
        assert_eq!(nan, nan.clone());
        assert_ne!(LiteralValue::Double(1.0), LiteralValue::Integer(1));
        assert!(LiteralValue::string("z") < LiteralValue::Boolean(false));
    }

    #[test]
    fn lexical_of_terms() {
        assert_eq!(Term::integer(42).lexical().as_deref(), Some("42"));
        assert_eq!(
            Term::iri("http://example.org/x").lexical().as_deref(),
            Some("http://example.org/x")
        );
        assert_eq!(Term::blank("b0").lexical(), None);
    }
}
