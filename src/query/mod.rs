//! The abstract query document: `select` list and `from` join tree.
//!
//! ```json
//! {
//!   "select": [
//!     { "relation": "bib-copy-acp", "alias": "::PARAM0", "column": "barcode" },
//!     { "relation": "bib", "alias": "::PARAM1", "column": { "substring": ["title", 1, 10] } }
//!   ],
//!   "from": {
//!     "table": "biblio", "alias": "bib",
//!     "join": { "copy": { "table": "copy", "alias": "bib-copy-acp", "key": "record" } }
//!   }
//! }
//! ```

pub mod from_clause;
mod from_tree;

pub use from_clause::{build_from_fragment, FromNode};
pub use from_tree::FromTree;

use std::collections::BTreeMap;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;

/// A named column transform, with optional extra parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnTransform {
    pub name: String,
    pub params: Option<Vec<Value>>,
}

impl ColumnTransform {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: None,
        }
    }

    /// Builder: attach extra parameters (the column is prepended on output).
    pub fn with_params(mut self, params: Vec<Value>) -> Self {
        self.params = Some(params);
        self
    }
}

/// The column of a select item.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnSpec {
    /// `"barcode"`
    Bare(String),
    /// `{ "lower": "barcode" }`
    Transformed { transform: String, column: String },
    /// `{ "substring": ["barcode", 1, 4] }`
    TransformedWithParams {
        transform: String,
        column: String,
        params: Vec<Value>,
    },
}

impl ColumnSpec {
    pub fn new(column: impl Into<String>, transform: Option<ColumnTransform>) -> Self {
        let column = column.into();
        match transform {
            None => ColumnSpec::Bare(column),
            Some(ColumnTransform { name, params: None }) => ColumnSpec::Transformed {
                transform: name,
                column,
            },
            Some(ColumnTransform {
                name,
                params: Some(params),
            }) => ColumnSpec::TransformedWithParams {
                transform: name,
                column,
                params,
            },
        }
    }

    /// The underlying column, with any transform unwrapped.
    pub fn column(&self) -> &str {
        match self {
            ColumnSpec::Bare(column)
            | ColumnSpec::Transformed { column, .. }
            | ColumnSpec::TransformedWithParams { column, .. } => column,
        }
    }

    pub fn transform(&self) -> Option<&str> {
        match self {
            ColumnSpec::Bare(_) => None,
            ColumnSpec::Transformed { transform, .. }
            | ColumnSpec::TransformedWithParams { transform, .. } => Some(transform),
        }
    }
}

impl Serialize for ColumnSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ColumnSpec::Bare(column) => serializer.serialize_str(column),
            ColumnSpec::Transformed { transform, column } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(transform, column)?;
                map.end()
            }
            ColumnSpec::TransformedWithParams {
                transform,
                column,
                params,
            } => {
                let mut args = Vec::with_capacity(params.len() + 1);
                args.push(Value::String(column.clone()));
                args.extend(params.iter().cloned());

                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(transform, &args)?;
                map.end()
            }
        }
    }
}

/// One output column of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectItem {
    /// Alias of the `from` node the column is read from.
    pub relation: String,
    /// Parameter name, e.g. `::PARAM0`.
    pub alias: String,
    pub column: ColumnSpec,
}

impl SelectItem {
    /// Does this item select `column` from `relation`?
    pub fn selects(&self, relation: &str, column: &str) -> bool {
        self.relation == relation && self.column.column() == column
    }
}

/// The `select`/`from` document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryDocument {
    pub select: Vec<SelectItem>,
    pub from: FromTree,
}

impl QueryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.select.is_empty() && self.from.is_empty()
    }

    /// Is `relation` still read by any select item?
    pub fn references(&self, relation: &str) -> bool {
        self.select.iter().any(|item| item.relation == relation)
    }
}

/// What the submission collaborator receives.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportDefinition {
    pub name: String,
    #[serde(rename = "def")]
    pub document: QueryDocument,
    /// Parameter name → display label.
    pub params: BTreeMap<String, String>,
}
