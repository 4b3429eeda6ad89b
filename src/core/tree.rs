//! Phase 3: materialize the nested dependency tree of every component.
//!
//! ## Ordering
//!
//! Top-level records are ordered by child count (fewest first), then by name.
//! Every list of sibling nodes uses the same key, so the output is fully
//! determined by the registry contents.
//!
//! ## Termination
//!
//! Each descent ends at one of:
//! - a record whose subtree is already memoized
//! - a record without children
//! - a direct self-reference, emitted as a `"<Name> (recursive)"` leaf
//!
//! A cycle through two or more distinct records reaches none of these, so
//! records being materialized are marked, and re-entering one fails with
//! [`TreeError::CycleDetected`].

use std::cmp::Ordering;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::core::registry::{ComponentRecord, Registry};

/// Suffix appended to the name of a self-referencing child.
pub const RECURSIVE_MARKER: &str = " (recursive)";

/// A named position in the output tree.
///
/// `children` is omitted from the serialized form when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn new(name: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// Components reference each other in a loop, listed in visiting order
    /// with the first component repeated at the end.
    #[error("dependency cycle: {}", .cycle.join(" -> "))]
    CycleDetected { cycle: Vec<String> },
}

/// Sort key shared by records and nodes: child count, then name.
fn by_child_count_then_name(a: (usize, &str), b: (usize, &str)) -> Ordering {
    a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1))
}

/// Sort sibling nodes in place.
pub fn sort_nodes(nodes: &mut [TreeNode]) {
    nodes.sort_by(|a, b| {
        by_child_count_then_name((a.children.len(), &a.name), (b.children.len(), &b.name))
    });
}

/// Registry indexes in processing order.
pub fn sorted_record_order(records: &[ComponentRecord]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by(|&a, &b| {
        let (a, b) = (&records[a], &records[b]);
        by_child_count_then_name((a.children.len(), &a.name), (b.children.len(), &b.name))
    });
    order
}

/// One top-level entry of the assembled forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopLevelTree {
    pub name: String,
    pub tree: Vec<TreeNode>,
}

/// The result of assembling every record.
#[derive(Debug, Default)]
pub struct Forest {
    /// Top-level entries in processing order.
    pub trees: Vec<TopLevelTree>,
    /// Distinct cycles found; the records involved are emitted without children.
    pub cycles: Vec<Vec<String>>,
}

/// Builds trees from a completed registry, memoizing each record's subtree.
pub struct TreeAssembler<'a> {
    registry: &'a mut Registry,
    in_progress: Vec<bool>,
    stack: Vec<usize>,
}

impl<'a> TreeAssembler<'a> {
    pub fn new(registry: &'a mut Registry) -> Self {
        let len = registry.len();
        Self {
            registry,
            in_progress: vec![false; len],
            stack: Vec::new(),
        }
    }

    /// Materialize every record, in sorted order.
    pub fn assemble(mut self) -> Forest {
        let mut forest = Forest::default();

        for index in sorted_record_order(self.registry.records()) {
            let name = self.registry.get(index).name.clone();
            let tree = match self.materialize(index) {
                Ok(tree) => tree,
                Err(TreeError::CycleDetected { cycle }) => {
                    debug!(component = %name, cycle = %cycle.join(" -> "), "cycle detected");
                    self.in_progress.fill(false);
                    self.stack.clear();
                    if !forest.cycles.iter().any(|c| same_cycle(c, &cycle)) {
                        forest.cycles.push(cycle);
                    }
                    Vec::new()
                }
            };
            forest.trees.push(TopLevelTree { name, tree });
        }

        forest
    }

    /// Compute (or reuse) the sorted subtree of the record at `index` and
    /// memoize it on the record.
    pub fn materialize(&mut self, index: usize) -> Result<Vec<TreeNode>, TreeError> {
        let record = self.registry.get(index);
        if !record.tree.is_empty() {
            return Ok(record.tree.clone());
        }
        if self.in_progress[index] {
            return Err(self.cycle_from(index));
        }

        self.in_progress[index] = true;
        self.stack.push(index);

        let parent_name = record.name.clone();
        let parent_recursive = record.recursive;
        let child_names: Vec<String> = record.children.iter().cloned().collect();

        let mut nodes = Vec::with_capacity(child_names.len());
        for child_name in child_names {
            if parent_recursive && child_name == parent_name {
                nodes.push(TreeNode::leaf(format!("{}{}", child_name, RECURSIVE_MARKER)));
                continue;
            }

            let Some(child_index) = self.registry.index_of(&child_name) else {
                // Children are only ever recorded from registry lookups
                debug!(component = %parent_name, child = %child_name, "unknown child skipped");
                continue;
            };
            let child = self.registry.get(child_index);

            if !child.tree.is_empty() {
                let mut subtree = child.tree.clone();
                sort_nodes(&mut subtree);
                nodes.push(TreeNode::new(child_name, subtree));
            } else if child.children.is_empty() {
                nodes.push(TreeNode::leaf(child_name));
            } else {
                let subtree = self.materialize(child_index)?;
                nodes.push(TreeNode::new(child_name, subtree));
            }
        }

        sort_nodes(&mut nodes);

        self.stack.pop();
        self.in_progress[index] = false;
        self.registry.get_mut(index).tree = nodes.clone();

        Ok(nodes)
    }

    fn cycle_from(&self, index: usize) -> TreeError {
        let start = self.stack.iter().position(|&i| i == index).unwrap_or(0);
        let mut cycle: Vec<String> = self.stack[start..]
            .iter()
            .map(|&i| self.registry.get(i).name.clone())
            .collect();
        cycle.push(self.registry.get(index).name.clone());
        TreeError::CycleDetected { cycle }
    }
}

/// Two cycles are the same if they visit the same set of components.
fn same_cycle(a: &[String], b: &[String]) -> bool {
    let members = |c: &[String]| {
        let mut m: Vec<String> = c.iter().skip(1).cloned().collect();
        m.sort();
        m
    };
    members(a) == members(b)
}
