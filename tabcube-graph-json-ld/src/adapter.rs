//! JSON-LD to GraphSink events
//!
//! Walks a compacted JSON-LD document with its active context and emits
//! triples directly, without materializing the expanded form.
//!
//! - `@type` becomes `rdf:type`
//! - `@list` values and `@container: @list` terms become indexed list items
//! - `@container: @language` maps become language-tagged literals
//! - `@graph` contents are flattened into the default graph
//! - native booleans and numbers keep their value; a coerced `@type` keeps
//!   the value and replaces the datatype

use crate::context::{Container, Context, TermDefinition, TypeMapping};
use crate::error::{JsonLdError, Result};
use serde_json::{Map, Value as JsonValue};
use tabcube_graph_ir::{Datatype, GraphSink, LiteralValue, TermId};
use tabcube_vocab::rdf;

/// Options for a single document conversion
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Base IRI (normally the document's own location)
    pub base: Option<String>,
    /// Context applied before the document's own `@context`
    pub default_context: Option<Context>,
    /// Identifier given to the top-level node when it has no `@id`
    pub root_id: Option<String>,
}

/// Convert a JSON-LD document to sink events
pub fn to_graph_events<S: GraphSink>(
    doc: &JsonValue,
    options: &ParseOptions,
    sink: &mut S,
) -> Result<()> {
    let mut ctx = options.default_context.clone().unwrap_or_default();
    if let Some(base) = &options.base {
        ctx.base = Some(base.clone());
        sink.on_base(base);
    }

    let mut walker = Walker { sink };
    match doc {
        JsonValue::Array(nodes) => {
            for node in nodes {
                walker.top_level(node, &ctx, None)?;
            }
        }
        JsonValue::Object(_) => {
            let root = options.root_id.as_deref().map(|id| walker.sink.term_iri(id));
            walker.top_level(doc, &ctx, root)?;
        }
        _ => {
            return Err(JsonLdError::InvalidStructure(
                "expected a JSON object or array at the top level".to_string(),
            ))
        }
    }
    Ok(())
}

struct Walker<'a, S> {
    sink: &'a mut S,
}

impl<S: GraphSink> Walker<'_, S> {
    fn top_level(&mut self, node: &JsonValue, ctx: &Context, root: Option<TermId>) -> Result<()> {
        let map = node.as_object().ok_or_else(|| {
            JsonLdError::InvalidStructure("top-level items must be objects".to_string())
        })?;
        self.node(map, ctx, root)?;
        Ok(())
    }

    /// Emit a node object's triples and return its subject
    fn node(&mut self, map: &Map<String, JsonValue>, outer: &Context, forced: Option<TermId>) -> Result<TermId> {
        let local;
        let ctx = match map.get("@context") {
            Some(c) => {
                local = outer.process(c)?;
                &local
            }
            None => outer,
        };

        for (prefix, def) in map
            .get("@context")
            .and_then(JsonValue::as_object)
            .into_iter()
            .flatten()
            .filter_map(|(k, v)| v.as_str().map(|ns| (k, ns)))
            .filter(|(k, ns)| !k.starts_with('@') && (ns.ends_with('/') || ns.ends_with('#')))
        {
            self.sink.on_prefix(prefix, def);
        }

        let subject = match forced {
            Some(id) => id,
            None => match self.keyword_value(map, ctx, "@id") {
                Some(JsonValue::String(id)) => self.reference(id, ctx),
                Some(other) => {
                    return Err(JsonLdError::InvalidStructure(format!(
                        "@id must be a string, got {other}"
                    )))
                }
                None => self.sink.term_blank(None),
            },
        };

        for (key, value) in map {
            let Some(expanded) = ctx.expand_key(key) else {
                tracing::trace!(key = %key, "dropping unmapped JSON-LD key");
                continue;
            };
            match expanded.as_str() {
                "@type" => {
                    let rdf_type = self.sink.term_iri(rdf::TYPE);
                    for ty in as_items(value) {
                        if let Some(iri) = ty.as_str().and_then(|t| ctx.expand_iri(t, true, true)) {
                            let object = self.sink.term_iri(&iri);
                            self.sink.emit_triple(subject, rdf_type, object);
                        }
                    }
                }
                "@graph" => {
                    for item in as_items(value) {
                        if let Some(nested) = item.as_object() {
                            self.node(nested, ctx, None)?;
                        }
                    }
                }
                k if k.starts_with('@') => {}
                predicate_iri => {
                    let predicate = self.sink.term_iri(predicate_iri);
                    self.property(subject, predicate, ctx.get(key), value, ctx)?;
                }
            }
        }

        Ok(subject)
    }

    fn property(
        &mut self,
        subject: TermId,
        predicate: TermId,
        def: Option<&TermDefinition>,
        value: &JsonValue,
        ctx: &Context,
    ) -> Result<()> {
        let container = def.and_then(|d| d.container);

        if container == Some(Container::Language) {
            if let JsonValue::Object(by_lang) = value {
                for (lang, texts) in by_lang {
                    for text in as_items(texts).filter_map(JsonValue::as_str) {
                        let object =
                            self.sink
                                .term_literal(text, Datatype::rdf_lang_string(), Some(lang.to_lowercase().as_str()));
                        self.sink.emit_triple(subject, predicate, object);
                    }
                }
                return Ok(());
            }
        }

        let explicit_list = value.as_object().and_then(|o| o.get("@list"));
        if container == Some(Container::List) || explicit_list.is_some() {
            let items = explicit_list.unwrap_or(value);
            let mut index = 0;
            for item in as_items(items) {
                if let Some(object) = self.object(item, def, ctx)? {
                    self.sink.emit_list_item(subject, predicate, object, index);
                    index += 1;
                }
            }
            return Ok(());
        }

        for item in as_items(value) {
            if let Some(set) = item.as_object().and_then(|o| o.get("@set")) {
                for member in as_items(set) {
                    if let Some(object) = self.object(member, def, ctx)? {
                        self.sink.emit_triple(subject, predicate, object);
                    }
                }
            } else if let Some(object) = self.object(item, def, ctx)? {
                self.sink.emit_triple(subject, predicate, object);
            }
        }
        Ok(())
    }

    /// Convert a single value in object position
    fn object(
        &mut self,
        value: &JsonValue,
        def: Option<&TermDefinition>,
        ctx: &Context,
    ) -> Result<Option<TermId>> {
        let coercion = def.and_then(|d| d.type_mapping.as_ref());

        let id = match value {
            JsonValue::Null => return Ok(None),
            JsonValue::String(s) => match coercion {
                Some(TypeMapping::Id) => self.reference(s, ctx),
                Some(TypeMapping::Vocab) => match ctx.expand_iri(s, true, true) {
                    Some(iri) => self.sink.term_iri(&iri),
                    None => self.sink.term_literal(s, Datatype::xsd_string(), None),
                },
                Some(TypeMapping::Datatype(dt)) => {
                    self.sink.term_literal(s, Datatype::from_iri(dt), None)
                }
                None => self.plain_string(s, ctx),
            },
            JsonValue::Bool(b) => self.native(LiteralValue::Boolean(*b), Datatype::xsd_boolean(), coercion),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => self.native(LiteralValue::Integer(i), Datatype::xsd_integer(), coercion),
                None => {
                    let d = n.as_f64().unwrap_or(f64::NAN);
                    self.native(LiteralValue::Double(d), Datatype::xsd_double(), coercion)
                }
            },
            JsonValue::Object(map) => {
                if map.contains_key("@value") {
                    return self.value_object(map, ctx);
                }
                self.node(map, ctx, None)?
            }
            JsonValue::Array(_) => {
                return Err(JsonLdError::InvalidStructure(
                    "nested arrays are not supported".to_string(),
                ))
            }
        };
        Ok(Some(id))
    }

    fn value_object(&mut self, map: &Map<String, JsonValue>, ctx: &Context) -> Result<Option<TermId>> {
        let datatype = map
            .get("@type")
            .and_then(JsonValue::as_str)
            .and_then(|t| ctx.expand_iri(t, true, true));
        let language = map.get("@language").and_then(JsonValue::as_str);

        let id = match (&map["@value"], datatype, language) {
            (JsonValue::Null, _, _) => return Ok(None),
            (JsonValue::String(s), None, Some(lang)) => {
                self.sink
                    .term_literal(s, Datatype::rdf_lang_string(), Some(lang.to_lowercase().as_str()))
            }
            (JsonValue::String(s), Some(dt), _) => self.sink.term_literal(s, Datatype::from_iri(dt), None),
            (JsonValue::String(s), None, None) => self.sink.term_literal(s, Datatype::xsd_string(), None),
            (JsonValue::Bool(b), dt, _) => self.sink.term_literal_value(
                LiteralValue::Boolean(*b),
                dt.map(Datatype::from_iri).unwrap_or_else(Datatype::xsd_boolean),
            ),
            (JsonValue::Number(n), dt, _) => {
                let (value, default) = match n.as_i64() {
                    Some(i) => (LiteralValue::Integer(i), Datatype::xsd_integer()),
                    None => (LiteralValue::Double(n.as_f64().unwrap_or(f64::NAN)), Datatype::xsd_double()),
                };
                self.sink
                    .term_literal_value(value, dt.map(Datatype::from_iri).unwrap_or(default))
            }
            (other, _, _) => {
                return Err(JsonLdError::InvalidStructure(format!(
                    "unsupported @value {other}"
                )))
            }
        };
        Ok(Some(id))
    }

    fn native(&mut self, value: LiteralValue, natural: Datatype, coercion: Option<&TypeMapping>) -> TermId {
        let datatype = match coercion {
            Some(TypeMapping::Datatype(dt)) => Datatype::from_iri(dt),
            _ => natural,
        };
        self.sink.term_literal_value(value, datatype)
    }

    fn plain_string(&mut self, s: &str, ctx: &Context) -> TermId {
        match &ctx.language {
            Some(lang) => self.sink.term_literal(s, Datatype::rdf_lang_string(), Some(lang.as_str())),
            None => self.sink.term_literal(s, Datatype::xsd_string(), None),
        }
    }

    /// An IRI reference or blank node label in `@id` position
    fn reference(&mut self, id: &str, ctx: &Context) -> TermId {
        if let Some(label) = id.strip_prefix("_:") {
            return self.sink.term_blank(Some(label));
        }
        let iri = ctx
            .expand_iri(id, false, true)
            .unwrap_or_else(|| id.to_string());
        self.sink.term_iri(&iri)
    }

    /// Value of a keyword, honouring aliases such as `"id": "@id"`
    fn keyword_value<'m>(
        &self,
        map: &'m Map<String, JsonValue>,
        ctx: &Context,
        keyword: &str,
    ) -> Option<&'m JsonValue> {
        map.iter()
            .find(|(k, _)| ctx.expand_key(k).as_deref() == Some(keyword))
            .map(|(_, v)| v)
    }
}

fn as_items(value: &JsonValue) -> impl Iterator<Item = &JsonValue> {
    let slice = match value {
        JsonValue::Array(items) => items.as_slice(),
        other => std::slice::from_ref(other),
    };
    slice.iter()
}
