//! Render an assembled forest as the hierarchy document consumed by the
//! tree visualization.
//!
//! The document has a synthetic `root` node with one child per top-level
//! component:
//!
//! ```json
//! { "name": "root", "children": [ { "name": "AppComponent", "children": [ ... ] } ] }
//! ```

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::core::tree::{Forest, TreeNode};

/// Name of the synthetic node wrapping all top-level components.
pub const ROOT_NODE_NAME: &str = "root";

const INDENT: &[u8] = b"    ";

/// The synthetic root. Unlike [`TreeNode`], it always carries `children`,
/// even when no component was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootNode {
    pub name: &'static str,
    pub children: Vec<TreeNode>,
}

/// Wrap the forest in the synthetic root node.
///
/// With `prune_leaves`, top-level components without children are left out.
pub fn root_node(forest: &Forest, prune_leaves: bool) -> RootNode {
    let children = forest
        .trees
        .iter()
        .filter(|t| !prune_leaves || !t.tree.is_empty())
        .map(|t| TreeNode::new(t.name.clone(), t.tree.clone()))
        .collect();
    RootNode {
        name: ROOT_NODE_NAME,
        children,
    }
}

/// Serialize `node` as JSON indented with four spaces.
pub fn to_pretty_json(node: &RootNode) -> Result<String> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    node.serialize(&mut serializer)
        .context("Failed to serialize component tree.")?;
    String::from_utf8(buf).context("Serialized component tree is not valid UTF-8.")
}
