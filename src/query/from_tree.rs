//! The document's `from` join tree.
//!
//! Nodes live in a stable graph so indices survive deletions; edges carry
//! the link field that reaches the child. An alias index maps each
//! relation alias to its node. The tree serializes to the nested
//! [`FromNode`] shape, or `{}` when empty.

use std::collections::HashMap;

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use super::FromNode;
use crate::error::{BuilderError, BuilderResult};

#[derive(Debug, Clone, PartialEq, Eq)]
struct TreeNode {
    table: String,
    alias: String,
    key: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FromTree {
    graph: StableDiGraph<TreeNode, String>,
    root: Option<NodeIndex>,
    aliases: HashMap<String, NodeIndex>,
}

impl FromTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn root_alias(&self) -> Option<&str> {
        self.root.map(|idx| self.graph[idx].alias.as_str())
    }

    pub fn contains_alias(&self, alias: &str) -> bool {
        self.aliases.contains_key(alias)
    }

    /// All aliases in the tree, sorted.
    pub fn aliases(&self) -> Vec<&str> {
        let mut aliases: Vec<&str> = self.aliases.keys().map(String::as_str).collect();
        aliases.sort_unstable();
        aliases
    }

    /// Does the node for `alias` have join children?
    pub fn has_joins(&self, alias: &str) -> bool {
        self.aliases
            .get(alias)
            .is_some_and(|&idx| self.has_children(idx))
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Check that `fragment` can be merged without writing anything.
    pub fn check_merge(&self, fragment: &FromNode) -> BuilderResult<()> {
        match self.root_alias() {
            Some(root) if root != fragment.alias => Err(BuilderError::RootMismatch {
                expected: root.to_string(),
                found: fragment.alias.clone(),
            }),
            _ => Ok(()),
        }
    }

    /// Deep-union `fragment` into the tree. Nodes already present (same
    /// link field under the same parent) are reused, not duplicated.
    pub fn merge(&mut self, fragment: &FromNode) -> BuilderResult<()> {
        self.check_merge(fragment)?;

        let root = match self.root {
            Some(root) => root,
            None => {
                let root = self.add_node(fragment);
                self.root = Some(root);
                root
            }
        };
        self.merge_children(root, fragment);
        Ok(())
    }

    fn merge_children(&mut self, parent: NodeIndex, fragment: &FromNode) {
        for (field, child) in &fragment.join {
            let idx = match self.child_by_field(parent, field) {
                Some(idx) => {
                    let node = &mut self.graph[idx];
                    if node.key.is_none() {
                        node.key = child.key.clone();
                    }
                    idx
                }
                None => {
                    let idx = self.add_node(child);
                    self.graph.add_edge(parent, idx, field.clone());
                    idx
                }
            };
            self.merge_children(idx, child);
        }
    }

    fn add_node(&mut self, node: &FromNode) -> NodeIndex {
        let idx = self.graph.add_node(TreeNode {
            table: node.table.clone(),
            alias: node.alias.clone(),
            key: node.key.clone(),
        });
        self.aliases.insert(node.alias.clone(), idx);
        idx
    }

    fn child_by_field(&self, parent: NodeIndex, field: &str) -> Option<NodeIndex> {
        self.graph
            .edges_directed(parent, Direction::Outgoing)
            .find(|edge| edge.weight() == field)
            .map(|edge| edge.target())
    }

    fn children(&self, parent: NodeIndex) -> Vec<NodeIndex> {
        self.graph
            .neighbors_directed(parent, Direction::Outgoing)
            .collect()
    }

    fn has_children(&self, idx: NodeIndex) -> bool {
        self.graph
            .neighbors_directed(idx, Direction::Outgoing)
            .next()
            .is_some()
    }

    fn remove(&mut self, idx: NodeIndex) {
        if let Some(node) = self.graph.remove_node(idx) {
            self.aliases.remove(&node.alias);
        }
        if self.root == Some(idx) {
            self.root = None;
        }
    }

    /// Prune the branch for `relation`.
    ///
    /// The search starts below the root, which is never removed. A node
    /// matching `relation` is deleted only when it has no joins of its own:
    /// descendants' aliases run through it. Ancestors left without joins
    /// are collapsed bottom-up unless `is_referenced` reports their alias
    /// is still selected. Returns whether a node was deleted.
    pub fn prune(&mut self, relation: &str, is_referenced: &dyn Fn(&str) -> bool) -> bool {
        match self.root {
            Some(root) => self.prune_below(root, relation, is_referenced),
            None => false,
        }
    }

    fn prune_below(
        &mut self,
        parent: NodeIndex,
        relation: &str,
        is_referenced: &dyn Fn(&str) -> bool,
    ) -> bool {
        for child in self.children(parent) {
            if self.graph[child].alias == relation {
                if self.has_children(child) {
                    return false;
                }
                self.remove(child);
                return true;
            }

            if self.has_children(child) && self.prune_below(child, relation, is_referenced) {
                if !self.has_children(child) && !is_referenced(&self.graph[child].alias) {
                    self.remove(child);
                }
                return true;
            }
        }
        false
    }

    /// The tree in its nested wire shape.
    pub fn to_node(&self) -> Option<FromNode> {
        self.root.map(|root| self.node_at(root))
    }

    fn node_at(&self, idx: NodeIndex) -> FromNode {
        let node = &self.graph[idx];
        let join = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|edge| (edge.weight().clone(), self.node_at(edge.target())))
            .collect();

        FromNode {
            table: node.table.clone(),
            alias: node.alias.clone(),
            key: node.key.clone(),
            join,
        }
    }
}

impl PartialEq for FromTree {
    fn eq(&self, other: &Self) -> bool {
        self.to_node() == other.to_node()
    }
}

impl Serialize for FromTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.to_node() {
            Some(node) => node.serialize(serializer),
            None => serializer.serialize_map(Some(0))?.end(),
        }
    }
}

impl From<&FromNode> for FromTree {
    fn from(node: &FromNode) -> Self {
        let mut tree = FromTree::new();
        let root = tree.add_node(node);
        tree.root = Some(root);
        tree.merge_children(root, node);
        tree
    }
}
