//! Loading an IDL from JSON.
//!
//! Two shapes are accepted:
//!
//! ```text
//! { "bib": { "table": "biblio", "label": "Biblio", "fields": [...] }, ... }
//! [ { "id": "bib", "table": "biblio", "label": "Biblio", "fields": [...] }, ... ]
//! ```
//!
//! In the map form the key is the class id; a body `id`, if present, must
//! agree with it.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{Idl, IdlClass};

/// Errors that can occur while loading an IDL.
#[derive(Debug, thiserror::Error)]
pub enum IdlError {
    #[error("IDL file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read IDL file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse IDL: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Class at position {0} has no id")]
    MissingClassId(usize),

    #[error("Class keyed '{key}' declares id '{id}'")]
    ClassIdMismatch { key: String, id: String },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdlDocument {
    Map(HashMap<String, IdlClass>),
    List(Vec<IdlClass>),
}

impl Idl {
    /// Parse an IDL from a JSON string.
    pub fn from_json_str(content: &str) -> Result<Self, IdlError> {
        let document: IdlDocument = serde_json::from_str(content)?;
        let mut idl = Idl::new();

        match document {
            IdlDocument::Map(classes) => {
                for (key, mut class) in classes {
                    if class.id.is_empty() {
                        class.id = key;
                    } else if class.id != key {
                        return Err(IdlError::ClassIdMismatch { key, id: class.id });
                    }
                    idl.insert(class);
                }
            }
            IdlDocument::List(classes) => {
                for (position, class) in classes.into_iter().enumerate() {
                    if class.id.is_empty() {
                        return Err(IdlError::MissingClassId(position));
                    }
                    idl.insert(class);
                }
            }
        }

        Ok(idl)
    }

    /// Load an IDL from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, IdlError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(IdlError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}
