//! Concept hierarchy
//!
//! Rows of a concept list become a tree keyed by notation, hung under a
//! synthetic root. Construction is order-independent: every node is created
//! first, then linked to its parent, so a child may precede its parent in
//! the CSV.

use crate::error::{InspectError, InspectResult};
use crate::tabular::Table;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptNode {
    pub label: String,
    pub notation: String,
    pub parent: Option<String>,
    children: Vec<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct ConceptTree {
    nodes: Vec<ConceptNode>,
    /// Children of the synthetic root
    roots: Vec<usize>,
    by_notation: HashMap<String, usize>,
}

/// Nested view used for serialization
#[derive(Serialize)]
struct Outline<'a> {
    label: &'a str,
    notation: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<Outline<'a>>,
}

impl ConceptTree {
    /// Number of concepts, not counting the synthetic root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, notation: &str) -> Option<&ConceptNode> {
        self.by_notation.get(notation).map(|&i| &self.nodes[i])
    }

    /// Top-level concepts, in row order
    pub fn roots(&self) -> impl Iterator<Item = &ConceptNode> {
        self.roots.iter().map(|&i| &self.nodes[i])
    }

    /// Children of `notation`, in row order
    pub fn children(&self, notation: &str) -> Vec<&ConceptNode> {
        self.by_notation
            .get(notation)
            .map(|&i| self.nodes[i].children.iter().map(|&c| &self.nodes[c]).collect())
            .unwrap_or_default()
    }

    /// Depth-first walk from the root: `(depth, node)`, roots at depth 0
    pub fn walk(&self) -> Vec<(usize, &ConceptNode)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(usize, usize)> = self.roots.iter().rev().map(|&i| (0, i)).collect();
        while let Some((depth, i)) = stack.pop() {
            let node = &self.nodes[i];
            out.push((depth, node));
            stack.extend(node.children.iter().rev().map(|&c| (depth + 1, c)));
        }
        out
    }

    /// Render the tree, or a size summary when it exceeds `threshold` nodes
    pub fn display(&self, threshold: usize) -> String {
        if self.len() > threshold {
            return format!(
                "Concept hierarchy has {} nodes, more than the display limit of {threshold}",
                self.len()
            );
        }
        let mut out = String::new();
        for (depth, node) in self.walk() {
            let _ = writeln!(out, "{}- {} ({})", "  ".repeat(depth), node.label, node.notation);
        }
        out
    }

    fn outline(&self, ids: &[usize]) -> Vec<Outline<'_>> {
        ids.iter()
            .map(|&i| {
                let node = &self.nodes[i];
                Outline {
                    label: &node.label,
                    notation: &node.notation,
                    children: self.outline(&node.children),
                }
            })
            .collect()
    }
}

impl Serialize for ConceptTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.outline(&self.roots).serialize(serializer)
    }
}

/// Build the concept tree for a concept-list table
///
/// Each row is one concept. An empty parent cell hangs the concept under the
/// root; a parent notation with no row of its own is an error, as are a
/// notation that appears twice and a concept row with no notation. Blank
/// rows are skipped.
pub fn build_hierarchy(
    table: &Table,
    parent_col: &str,
    label_col: &str,
    notation_col: &str,
) -> InspectResult<ConceptTree> {
    let parent_idx = table.column_index(parent_col)?;
    let label_idx = table.column_index(label_col)?;
    let notation_idx = table.column_index(notation_col)?;

    let mut tree = ConceptTree::default();
    for row in 0..table.len() {
        let notation = table.cell(row, notation_idx).trim();
        let parent = table.cell(row, parent_idx).trim();
        if notation.is_empty() && parent.is_empty() && table.cell(row, label_idx).is_empty() {
            continue;
        }
        if notation.is_empty() {
            return Err(InspectError::EmptyNotation {
                table: table.location.clone(),
                row: row + 1,
            });
        }
        if tree.by_notation.contains_key(notation) {
            return Err(InspectError::DuplicateNotation {
                notation: notation.to_string(),
            });
        }
        tree.by_notation.insert(notation.to_string(), tree.nodes.len());
        tree.nodes.push(ConceptNode {
            label: table.cell(row, label_idx).to_string(),
            notation: notation.to_string(),
            parent: (!parent.is_empty()).then(|| parent.to_string()),
            children: Vec::new(),
        });
    }

    for i in 0..tree.nodes.len() {
        let Some(parent) = tree.nodes[i].parent.clone() else {
            tree.roots.push(i);
            continue;
        };
        let Some(&p) = tree.by_notation.get(&parent) else {
            return Err(InspectError::UnknownParent {
                notation: tree.nodes[i].notation.clone(),
                parent,
            });
        };
        tree.nodes[p].children.push(i);
    }

    tracing::debug!(table = %table.location, concepts = tree.len(), roots = tree.roots.len(), "built concept hierarchy");
    Ok(tree)
}
