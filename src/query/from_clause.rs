//! `from`-clause fragments built from a single path.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{BuilderError, BuilderResult};
use crate::idl::Idl;
use crate::path::{ColumnPath, PATH_DELIMITER};

/// One node of the `from` join tree, in its wire shape.
///
/// Each key under `join` is the link field on this node's class that
/// reaches the child; the child's `key` is the join column for link fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FromNode {
    pub table: String,
    pub alias: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub join: BTreeMap<String, FromNode>,
}

impl FromNode {
    pub fn new(table: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: alias.into(),
            key: None,
            join: BTreeMap::new(),
        }
    }

    /// Builder: set the join key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Builder: attach a child reached through `field`.
    pub fn with_join(mut self, field: impl Into<String>, child: FromNode) -> Self {
        self.join.insert(field.into(), child);
        self
    }

    /// Number of levels in this tree (a lone node has depth 1).
    pub fn depth(&self) -> usize {
        1 + self.join.values().map(FromNode::depth).max().unwrap_or(0)
    }

    /// Find a node by alias anywhere in this tree.
    pub fn find(&self, alias: &str) -> Option<&FromNode> {
        if self.alias == alias {
            return Some(self);
        }
        self.join.values().find_map(|child| child.find(alias))
    }
}

/// Build the join chain for `path`, rooted at its first class.
///
/// Every class and field on the path is resolved against the IDL, the
/// leaf field included. The node for the last class has no `join`.
pub fn build_from_fragment(idl: &Idl, path: &ColumnPath) -> BuilderResult<FromNode> {
    // (node, field leading to the next node, key for the next node)
    let mut chain: Vec<(FromNode, Option<String>, Option<String>)> = Vec::new();
    let mut alias = String::new();

    for step in path.steps() {
        let class = idl.require_class(step.class)?;
        let field = step.field.map(|name| class.require_field(name)).transpose()?;

        if !alias.is_empty() {
            alias.push_str(PATH_DELIMITER);
        }
        alias.push_str(step.class);

        let key = field.filter(|f| f.is_link()).and_then(|f| f.key.clone());
        chain.push((
            FromNode::new(class.table.clone(), alias.clone()),
            field.map(|f| f.name.clone()),
            key,
        ));

        if let Some(field) = step.field {
            alias.push_str(PATH_DELIMITER);
            alias.push_str(field);
        }
    }

    let mut chain = chain.into_iter().rev();
    let Some((mut node, _, _)) = chain.next() else {
        return Err(BuilderError::invalid_path(path.to_string(), "path is empty"));
    };

    for (mut parent, field, key) in chain {
        if let Some(key) = key {
            node.key = Some(key);
        }
        if let Some(field) = field {
            parent.join.insert(field, node);
        }
        node = parent;
    }

    tracing::debug!(path = %path, depth = node.depth(), "built from fragment");
    Ok(node)
}
