//! Dependency resolution
//!
//! Loads the primary document, the external table schemas it points at and
//! the transitive closure of its `void:Dataset` dependencies into one
//! [`GraphStore`], one named graph per document.
//!
//! A location is loaded at most once: before loading, the resolver checks
//! whether the named graph already has content. That check is also what
//! stops dependency cycles, so there is no separate cycle detection.

use crate::error::InspectResult;
use crate::format::{parse_table_schema, DocumentFormat};
use crate::location::canonical_location;
use crate::query::{self, DependencyRow};
use crate::source::DocumentSource;
use crate::store::GraphStore;
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use tabcube_graph_ir::iri;

/// How one document points at another
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "role", rename_all = "kebab-case")]
pub enum DependencyRole {
    /// `csvw:tableSchema` pointing at a schema file; merged into the
    /// referencing document's graph
    TableSchema,
    /// `void:Dataset` with a `void:dataDump`; loaded into its own graph
    Dataset {
        uri_space: Option<String>,
        dataset: Option<String>,
        format: DocumentFormat,
    },
}

/// One discovered reference and whether it ended up loaded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DependencyReference {
    pub source: String,
    pub target: String,
    #[serde(flatten)]
    pub role: DependencyRole,
    pub loaded: bool,
}

/// A primary document with everything it depends on
#[derive(Debug)]
pub struct ResolvedDocument {
    /// Canonical location; also the name of the primary graph
    pub location: String,
    pub format: DocumentFormat,
    pub store: GraphStore,
    pub dependencies: Vec<DependencyReference>,
}

impl ResolvedDocument {
    pub fn primary_graph(&self) -> &str {
        &self.location
    }
}

pub struct Resolver<S> {
    source: S,
}

/// State for one resolution run
struct Run<'a, S> {
    source: &'a S,
    store: GraphStore,
    references: Vec<DependencyReference>,
    parsed: usize,
}

impl<S: DocumentSource> Run<'_, S> {
    fn blank_prefix(&mut self) -> String {
        let prefix = format!("g{}-", self.parsed);
        self.parsed += 1;
        prefix
    }

    fn load(&mut self, location: &str, format: Option<DocumentFormat>) -> InspectResult<DocumentFormat> {
        let text = self.source.fetch(location)?;
        let format = format.unwrap_or_else(|| DocumentFormat::sniff(&text));
        let prefix = self.blank_prefix();
        let graph = format.parse(&text, location, &prefix)?;
        tracing::debug!(location = %location, %format, triples = graph.len(), "loaded document");
        self.store.insert(location, graph);
        Ok(format)
    }

    /// Merge every external table schema `graph` references into `graph`
    ///
    /// With `fatal`, the first failure aborts; otherwise failures are logged.
    fn load_table_schemas(&mut self, graph: &str, fatal: bool) -> InspectResult<()> {
        for schema in query::external_table_schemas(&self.store, graph) {
            let result = self.load_table_schema(graph, &schema);
            self.references.push(DependencyReference {
                source: graph.to_string(),
                target: schema.clone(),
                role: DependencyRole::TableSchema,
                loaded: result.is_ok(),
            });
            match result {
                Ok(()) => {}
                Err(e) if fatal => return Err(e),
                Err(e) => {
                    tracing::warn!(graph = %graph, schema = %schema, error = %e, "skipping table schema");
                }
            }
        }
        Ok(())
    }

    fn load_table_schema(&mut self, graph: &str, schema: &str) -> InspectResult<()> {
        let location = canonical_location(iri::strip_fragment(schema))?;
        let text = self.source.fetch(&location)?;
        let prefix = self.blank_prefix();
        let parsed = parse_table_schema(&text, schema, &prefix)?;
        tracing::debug!(graph = %graph, schema = %schema, triples = parsed.len(), "merged table schema");
        self.store.insert(graph, parsed);
        Ok(())
    }
}

/// Canonical location of a dependency's data dump, without fragment
fn dependency_location(referrer: &str, data_dump: &str) -> InspectResult<String> {
    let absolute = if iri::is_absolute(data_dump) {
        data_dump.to_string()
    } else {
        iri::resolve(referrer, data_dump)
    };
    canonical_location(iri::strip_fragment(&absolute))
}

/// Explicit declaration, then extension, then the primary's own format
fn dependency_format(row: &DependencyRow, location: &str, primary: DocumentFormat) -> DocumentFormat {
    row.feature
        .as_deref()
        .and_then(DocumentFormat::from_feature_iri)
        .or_else(|| row.media_type.as_deref().and_then(DocumentFormat::from_media_type))
        .or_else(|| DocumentFormat::from_extension(location))
        .unwrap_or(primary)
}

impl<S: DocumentSource> Resolver<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Load `location` and everything it depends on
    ///
    /// Fails only if the primary document (or one of its own table schemas)
    /// cannot be read or parsed. Dependency failures are logged and skipped.
    pub fn resolve(&self, location: &str) -> InspectResult<ResolvedDocument> {
        let primary = canonical_location(location)?;
        let mut run = Run {
            source: &self.source,
            store: GraphStore::new(),
            references: Vec::new(),
            parsed: 0,
        };

        tracing::info!(location = %primary, "resolving document");
        let format = run.load(&primary, DocumentFormat::from_extension(&primary))?;
        if format == DocumentFormat::JsonLd {
            run.load_table_schemas(&primary, true)?;
        }

        let mut visited = HashSet::from([primary.clone()]);
        let mut failed = HashSet::new();
        let mut queue: VecDeque<(String, DependencyRow)> = query::dataset_dependencies(&run.store, &primary)
            .into_iter()
            .map(|row| (primary.clone(), row))
            .collect();

        while let Some((referrer, row)) = queue.pop_front() {
            let target = match dependency_location(&referrer, &row.data_dump) {
                Ok(target) => target,
                Err(e) => {
                    tracing::warn!(dependency = %row.data_dump, error = %e, "skipping dependency");
                    continue;
                }
            };
            let dep_format = dependency_format(&row, &target, format);
            let role = DependencyRole::Dataset {
                uri_space: row.uri_space.clone(),
                dataset: row.dataset.clone(),
                format: dep_format,
            };

            if run.store.has_content(&target) || !visited.insert(target.clone()) {
                tracing::debug!(location = %target, "dependency already visited");
                let loaded = !failed.contains(&target);
                run.references.push(DependencyReference {
                    source: referrer,
                    target,
                    role,
                    loaded,
                });
                continue;
            }

            let loaded = match run.load(&target, Some(dep_format)) {
                Ok(_) => true,
                Err(e) => {
                    tracing::warn!(location = %target, error = %e, "skipping dependency");
                    false
                }
            };
            run.references.push(DependencyReference {
                source: referrer,
                target: target.clone(),
                role,
                loaded,
            });
            if !loaded {
                failed.insert(target);
                continue;
            }

            if dep_format == DocumentFormat::JsonLd {
                run.load_table_schemas(&target, false)?;
            }
            queue.extend(
                query::dataset_dependencies(&run.store, &target)
                    .into_iter()
                    .map(|row| (target.clone(), row)),
            );
        }

        tracing::info!(
            location = %primary,
            graphs = run.store.len(),
            triples = run.store.triple_count(),
            "resolved document"
        );
        Ok(ResolvedDocument {
            location: primary,
            format,
            store: run.store,
            dependencies: run.references,
        })
    }
}

impl<S> std::fmt::Debug for Resolver<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn relative_dumps_resolve_against_the_referrer() {
        assert_eq!(
            dependency_location("file:///data/cube/meta.json", "../defs/area.ttl#scheme").unwrap(),
            "file:///data/defs/area.ttl"
        );
        assert_eq!(
            dependency_location("file:///data/meta.json", "http://example.org/a/../b.ttl").unwrap(),
            "http://example.org/b.ttl"
        );
    }

    #[test]
    fn format_precedence() {
        let mut row = DependencyRow {
            dependency: tabcube_graph_ir::Term::iri("http://e/dep"),
            data_dump: "x".to_string(),
            uri_space: None,
            dataset: None,
            feature: None,
            media_type: None,
        };
        let loc = "http://example.org/area";
        assert_eq!(dependency_format(&row, loc, DocumentFormat::JsonLd), DocumentFormat::JsonLd);
        assert_eq!(
            dependency_format(&row, "http://example.org/area.ttl", DocumentFormat::JsonLd),
            DocumentFormat::Turtle
        );
        row.media_type = Some("application/ld+json".to_string());
        assert_eq!(
            dependency_format(&row, "http://example.org/area.ttl", DocumentFormat::Turtle),
            DocumentFormat::JsonLd
        );
        row.feature = Some(tabcube_vocab::formats::TURTLE.to_string());
        assert_eq!(dependency_format(&row, loc, DocumentFormat::JsonLd), DocumentFormat::Turtle);
    }
}
