//! Active context processing
//!
//! Supports the subset of JSON-LD 1.1 context features that tabular metadata
//! uses: `@base`, `@vocab`, `@language`, keyword aliases, prefixes, and term
//! definitions with `@id`, `@type` (`@id`, `@vocab` or a datatype) and
//! `@container` (`@list`, `@set`, `@language`).

use crate::error::{JsonLdError, Result};
use serde_json::{Map, Value as JsonValue};
use std::collections::{HashMap, HashSet};
use tabcube_graph_ir::iri;
use tabcube_vocab::csvw;

/// The CSVW context, bundled so metadata can be read offline
pub const CSVW_CONTEXT_JSON: &str = include_str!("csvw-context.jsonld");

/// Container types for `@container`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    List,
    Set,
    Language,
}

/// Type coercion of a term (`@type` in a term definition)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeMapping {
    /// String values are IRI references, resolved against the base
    Id,
    /// String values are terms or IRIs, expanded against the vocabulary
    Vocab,
    /// String values are literals of this datatype
    Datatype(String),
}

/// A term definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermDefinition {
    /// Expanded IRI, or a keyword when the term is an alias (`"id": "@id"`)
    pub id: String,
    pub type_mapping: Option<TypeMapping>,
    pub container: Option<Container>,
}

impl TermDefinition {
    fn simple(id: String) -> Self {
        Self {
            id,
            type_mapping: None,
            container: None,
        }
    }
}

/// An active context
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub base: Option<String>,
    pub vocab: Option<String>,
    pub language: Option<String>,
    terms: HashMap<String, TermDefinition>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bundled CSVW context
    pub fn csvw() -> Result<Self> {
        let doc: JsonValue = serde_json::from_str(CSVW_CONTEXT_JSON)?;
        let local = doc.get("@context").ok_or_else(|| JsonLdError::InvalidContext {
            message: "bundled CSVW context has no @context".to_string(),
        })?;
        Context::new().process(local)
    }

    /// Builder-style base override
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn get(&self, term: &str) -> Option<&TermDefinition> {
        self.terms.get(term)
    }

    /// Apply a local context (`@context` value) on top of this one
    pub fn process(&self, local: &JsonValue) -> Result<Context> {
        match local {
            JsonValue::Null => Ok(Context {
                base: self.base.clone(),
                ..Default::default()
            }),
            JsonValue::String(reference) => {
                let reference = reference.trim_end_matches(".jsonld");
                if reference == csvw::CONTEXT
                    || reference == csvw::CONTEXT.replacen("http:", "https:", 1)
                {
                    let bundled = Context::csvw()?;
                    Ok(self.merge(bundled))
                } else {
                    Err(JsonLdError::RemoteContext {
                        iri: reference.to_string(),
                    })
                }
            }
            JsonValue::Array(items) => {
                let mut ctx = self.clone();
                for item in items {
                    ctx = ctx.process(item)?;
                }
                Ok(ctx)
            }
            JsonValue::Object(map) => self.process_object(map),
            other => Err(JsonLdError::InvalidContext {
                message: format!("unexpected context value: {other}"),
            }),
        }
    }

    /// Layer `other`'s definitions over this context, keeping our base
    fn merge(&self, other: Context) -> Context {
        let mut ctx = self.clone();
        if other.vocab.is_some() {
            ctx.vocab = other.vocab;
        }
        if other.language.is_some() {
            ctx.language = other.language;
        }
        ctx.terms.extend(other.terms);
        ctx
    }

    fn process_object(&self, map: &Map<String, JsonValue>) -> Result<Context> {
        let mut ctx = self.clone();

        if let Some(base) = map.get("@base") {
            ctx.base = match base {
                JsonValue::Null => None,
                JsonValue::String(b) => Some(match &ctx.base {
                    Some(current) => iri::resolve(current, b),
                    None => b.clone(),
                }),
                other => {
                    return Err(JsonLdError::InvalidContext {
                        message: format!("@base must be a string, got {other}"),
                    })
                }
            };
        }

        if let Some(vocab) = map.get("@vocab") {
            ctx.vocab = match vocab {
                JsonValue::Null => None,
                JsonValue::String(v) => Some(v.clone()),
                other => {
                    return Err(JsonLdError::InvalidContext {
                        message: format!("@vocab must be a string, got {other}"),
                    })
                }
            };
        }

        if let Some(language) = map.get("@language") {
            ctx.language = language.as_str().map(|l| l.to_lowercase());
        }

        let mut defining = HashSet::new();
        let mut defined = HashSet::new();
        for term in map.keys().filter(|k| !k.starts_with('@')) {
            ctx.create_term(term, map, &mut defining, &mut defined)?;
        }

        Ok(ctx)
    }

    /// Create the definition for `term`, first creating any term its IRI
    /// depends on (a compact IRI prefix defined in the same local context).
    fn create_term(
        &mut self,
        term: &str,
        local: &Map<String, JsonValue>,
        defining: &mut HashSet<String>,
        defined: &mut HashSet<String>,
    ) -> Result<()> {
        if defined.contains(term) {
            return Ok(());
        }
        if !defining.insert(term.to_string()) {
            return Err(JsonLdError::CyclicIriMapping {
                term: term.to_string(),
            });
        }

        let value = match local.get(term) {
            Some(v) => v,
            None => {
                defining.remove(term);
                return Ok(());
            }
        };

        let definition = match value {
            JsonValue::Null => None,
            JsonValue::String(id) => {
                self.define_dependencies(id, local, defining, defined)?;
                Some(TermDefinition::simple(self.expand_definition_iri(term, Some(id))))
            }
            JsonValue::Object(def) => {
                let id = def.get("@id").and_then(JsonValue::as_str);
                if let Some(id) = id {
                    self.define_dependencies(id, local, defining, defined)?;
                }
                let type_mapping = match def.get("@type").and_then(JsonValue::as_str) {
                    None => None,
                    Some("@id") => Some(TypeMapping::Id),
                    Some("@vocab") => Some(TypeMapping::Vocab),
                    Some(datatype) => {
                        self.define_dependencies(datatype, local, defining, defined)?;
                        let expanded = self.expand_iri(datatype, true, false).ok_or_else(|| {
                            JsonLdError::InvalidContext {
                                message: format!("cannot expand @type '{datatype}' of '{term}'"),
                            }
                        })?;
                        Some(TypeMapping::Datatype(expanded))
                    }
                };
                let container = match def.get("@container") {
                    None | Some(JsonValue::Null) => None,
                    Some(c) => parse_container(term, c)?,
                };
                Some(TermDefinition {
                    id: self.expand_definition_iri(term, id),
                    type_mapping,
                    container,
                })
            }
            other => {
                return Err(JsonLdError::InvalidContext {
                    message: format!("invalid definition for '{term}': {other}"),
                })
            }
        };

        match definition {
            Some(def) => {
                self.terms.insert(term.to_string(), def);
            }
            None => {
                self.terms.remove(term);
            }
        }
        defining.remove(term);
        defined.insert(term.to_string());
        Ok(())
    }

    fn define_dependencies(
        &mut self,
        value: &str,
        local: &Map<String, JsonValue>,
        defining: &mut HashSet<String>,
        defined: &mut HashSet<String>,
    ) -> Result<()> {
        if let Some((prefix, _)) = iri::split_compact(value) {
            if local.contains_key(prefix) {
                self.create_term(prefix, local, defining, defined)?;
            }
        } else if local.contains_key(value) && !value.starts_with('@') {
            self.create_term(value, local, defining, defined)?;
        }
        Ok(())
    }

    fn expand_definition_iri(&self, term: &str, id: Option<&str>) -> String {
        let raw = id.unwrap_or(term);
        self.expand_iri(raw, true, false)
            .unwrap_or_else(|| raw.to_string())
    }

    /// Expand a key, value or type to an absolute IRI (or keyword)
    ///
    /// `vocab` enables term lookup and `@vocab` concatenation;
    /// `document_relative` resolves leftovers against the base IRI. Returns
    /// `None` when the value cannot be made absolute.
    pub fn expand_iri(&self, value: &str, vocab: bool, document_relative: bool) -> Option<String> {
        if value.starts_with('@') {
            return Some(value.to_string());
        }
        if vocab {
            if let Some(def) = self.terms.get(value) {
                return Some(def.id.clone());
            }
        }
        if let Some((prefix, suffix)) = iri::split_compact(value) {
            if prefix == "_" {
                return Some(value.to_string());
            }
            if let Some(def) = self.terms.get(prefix) {
                return Some(format!("{}{}", def.id, suffix));
            }
        }
        if iri::is_absolute(value) {
            return Some(value.to_string());
        }
        if vocab {
            if let Some(v) = &self.vocab {
                return Some(format!("{v}{value}"));
            }
        }
        if document_relative {
            return Some(match &self.base {
                Some(base) => iri::resolve(base, value),
                None => value.to_string(),
            });
        }
        None
    }

    /// Expand an object key to a predicate IRI or keyword
    pub fn expand_key(&self, key: &str) -> Option<String> {
        self.expand_iri(key, true, false)
            .filter(|iri| iri.starts_with('@') || iri.contains(':'))
    }
}

fn parse_container(term: &str, value: &JsonValue) -> Result<Option<Container>> {
    let names: Vec<&str> = match value {
        JsonValue::String(s) => vec![s.as_str()],
        JsonValue::Array(items) => items.iter().filter_map(JsonValue::as_str).collect(),
        _ => Vec::new(),
    };
    let mut container = None;
    for name in names {
        container = match name {
            "@list" => Some(Container::List),
            "@language" => Some(Container::Language),
            "@set" => container.or(Some(Container::Set)),
            other => {
                return Err(JsonLdError::InvalidContext {
                    message: format!("unsupported @container '{other}' on '{term}'"),
                })
            }
        };
    }
    Ok(container)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn prefixes_defined_later_in_same_context() {
        let ctx = Context::new()
            .process(&json!({
                "label": {"@id": "ex:label", "@type": "xsd:string"},
                "ex": "http://example.org/",
                "xsd": "http://www.w3.org/2001/XMLSchema#"
            }))
            .unwrap();

        let label = ctx.get("label").unwrap();
        assert_eq!(label.id, "http://example.org/label");
        assert_eq!(
            label.type_mapping,
            Some(TypeMapping::Datatype(
                "http://www.w3.org/2001/XMLSchema#string".to_string()
            ))
        );
    }

    #[test]
    fn vocab_relative_definitions() {
        let ctx = Context::new()
            .process(&json!({
                "@vocab": "https://schema.org/",
                "explicit": "name",
                "id": "@id"
            }))
            .unwrap();

        assert_eq!(ctx.get("explicit").unwrap().id, "https://schema.org/name");
        assert_eq!(ctx.get("id").unwrap().id, "@id");
        assert_eq!(ctx.expand_key("other").as_deref(), Some("https://schema.org/other"));
    }

    #[test]
    fn cyclic_definitions_are_rejected() {
        let err = Context::new()
            .process(&json!({"a": "b:x", "b": "a:y"}))
            .unwrap_err();
        assert!(matches!(err, JsonLdError::CyclicIriMapping { .. }));
    }

    #[test]
    fn csvw_context_terms() {
        let ctx = Context::csvw().unwrap();

        let columns = ctx.get("columns").unwrap();
        assert_eq!(columns.id, "http://www.w3.org/ns/csvw#column");
        assert_eq!(columns.type_mapping, Some(TypeMapping::Id));
        assert_eq!(columns.container, Some(Container::List));

        let property_url = ctx.get("propertyUrl").unwrap();
        assert_eq!(
            property_url.type_mapping,
            Some(TypeMapping::Datatype(csvw::URI_TEMPLATE.to_string()))
        );

        assert_eq!(
            ctx.expand_iri("string", true, false).as_deref(),
            Some("http://www.w3.org/2001/XMLSchema#string")
        );
        assert_eq!(
            ctx.expand_key("dcterms:title").as_deref(),
            Some("http://purl.org/dc/terms/title")
        );
    }

    #[test]
    fn csvw_context_by_reference_keeps_local_additions() {
        let ctx = Context::new()
            .with_base("file:///data/meta.json")
            .process(&json!(["http://www.w3.org/ns/csvw", {"@language": "en"}]))
            .unwrap();

        assert_eq!(ctx.language.as_deref(), Some("en"));
        assert_eq!(ctx.base.as_deref(), Some("file:///data/meta.json"));
        assert!(ctx.get("tableSchema").is_some());
    }

    #[test]
    fn unknown_remote_context_is_an_error() {
        let err = Context::new()
            .process(&json!("http://example.org/context.jsonld"))
            .unwrap_err();
        assert!(matches!(err, JsonLdError::RemoteContext { .. }));
    }

    #[test]
    fn unmapped_keys_do_not_expand() {
        let ctx = Context::new();
        assert_eq!(ctx.expand_key("title"), None);
        assert_eq!(
            ctx.expand_key("http://purl.org/dc/terms/title").as_deref(),
            Some("http://purl.org/dc/terms/title")
        );
    }

    #[test]
    fn document_relative_expansion() {
        let ctx = Context::new().with_base("file:///data/meta.json");
        assert_eq!(
            ctx.expand_iri("obs.csv", false, true).as_deref(),
            Some("file:///data/obs.csv")
        );
        assert_eq!(
            ctx.expand_iri("_:b0", false, true).as_deref(),
            Some("_:b0")
        );
    }
}
