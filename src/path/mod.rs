//! Column paths: `class-field-class-field...` traversals through the IDL.
//!
//! A path alternates class ids and field names, starting at the report's
//! root class:
//!
//! ```text
//! bib-copy-acp-barcode
//! │   │    │   └─ leaf field (the selected column)
//! │   │    └───── class reached through the link
//! │   └────────── link field on `bib`
//! └────────────── root class
//! ```
//!
//! The prefix through the last class (`bib-copy-acp`) is the relation
//! alias: it names one node of the `from` join tree.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BuilderError, BuilderResult};
use crate::idl::{Idl, IdlField};

/// Token separator in the textual form of a path.
pub const PATH_DELIMITER: &str = "-";

/// Separator between label segments.
pub const LABEL_SEPARATOR: char = ':';

/// A parsed column path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnPath {
    tokens: Vec<String>,
}

/// One step of a path: a class, and the field leaving it (if any).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep<'a> {
    pub class: &'a str,
    pub field: Option<&'a str>,
}

/// What the column editor shows for a selected path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub label: String,
    pub class: String,
    pub column: String,
    pub datatype: String,
}

impl ColumnPath {
    /// Parse a dash-delimited path.
    pub fn parse(path: &str) -> BuilderResult<Self> {
        if path.is_empty() {
            return Err(BuilderError::invalid_path(path, "path is empty"));
        }

        let tokens: Vec<String> = path.split(PATH_DELIMITER).map(str::to_string).collect();
        if tokens.iter().any(String::is_empty) {
            return Err(BuilderError::invalid_path(path, "path contains an empty token"));
        }

        Ok(Self { tokens })
    }

    /// Build a path from tokens.
    pub fn from_tokens<I, S>(tokens: I) -> BuilderResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        let joined = tokens.join(PATH_DELIMITER);
        if tokens.is_empty() || tokens.iter().any(|t| t.is_empty() || t.contains(PATH_DELIMITER)) {
            return Err(BuilderError::invalid_path(joined, "invalid path tokens"));
        }
        Ok(Self { tokens })
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Always false; parsing rejects empty paths.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The class the traversal starts at.
    pub fn root_class(&self) -> &str {
        &self.tokens[0]
    }

    /// True when the path ends in a field (a selectable column).
    pub fn ends_in_field(&self) -> bool {
        self.tokens.len() % 2 == 0
    }

    /// The trailing field token, if the path ends in a field.
    pub fn leaf_field(&self) -> Option<&str> {
        if self.ends_in_field() {
            self.tokens.last().map(String::as_str)
        } else {
            None
        }
    }

    /// The selected column. Fails for paths that end in a class.
    pub fn leaf_column(&self) -> BuilderResult<&str> {
        self.leaf_field().ok_or_else(|| {
            BuilderError::invalid_path(self.to_string(), "path does not end in a field")
        })
    }

    /// The last class on the path: the class that owns the leaf column.
    pub fn leaf_class(&self) -> &str {
        let last_class = (self.tokens.len() - 1) / 2 * 2;
        &self.tokens[last_class]
    }

    /// The relation alias: the path through its last class.
    pub fn relation(&self) -> String {
        let end = if self.ends_in_field() {
            self.tokens.len() - 1
        } else {
            self.tokens.len()
        };
        self.tokens[..end].join(PATH_DELIMITER)
    }

    /// Walk the path as (class, outgoing field) steps.
    pub fn steps(&self) -> impl Iterator<Item = PathStep<'_>> {
        self.tokens.chunks(2).map(|pair| PathStep {
            class: pair[0].as_str(),
            field: pair.get(1).map(String::as_str),
        })
    }

    /// Resolve every field on the path, in order.
    pub fn resolve_fields<'i>(&self, idl: &'i Idl) -> BuilderResult<Vec<&'i IdlField>> {
        let mut fields = Vec::with_capacity(self.tokens.len() / 2);
        for step in self.steps() {
            let class = idl.require_class(step.class)?;
            if let Some(field) = step.field {
                fields.push(class.require_field(field)?);
            }
        }
        Ok(fields)
    }

    /// Human-readable label: the root class label followed by each field
    /// label, e.g. `Biblio:Copy:Barcode`.
    pub fn make_label(&self, idl: &Idl) -> BuilderResult<String> {
        let mut label = idl.require_class(self.root_class())?.label.clone();
        for field in self.resolve_fields(idl)? {
            label.push(LABEL_SEPARATOR);
            label.push_str(&field.label);
        }
        Ok(label)
    }

    /// Label and datatype of the leaf column.
    pub fn describe(&self, idl: &Idl) -> BuilderResult<ColumnInfo> {
        let column = self.leaf_column()?;
        let label = self.make_label(idl)?;
        let field = idl.require_field(self.leaf_class(), column)?;

        Ok(ColumnInfo {
            label,
            class: self.leaf_class().to_string(),
            column: column.to_string(),
            datatype: field.datatype.clone(),
        })
    }
}

impl fmt::Display for ColumnPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens.join(PATH_DELIMITER))
    }
}

impl FromStr for ColumnPath {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ColumnPath {
    type Error = BuilderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ColumnPath> for String {
    fn from(path: ColumnPath) -> Self {
        path.to_string()
    }
}
