//! Schema index over the IDL: classes, their backing tables and fields.
//!
//! The index is read-only input to the builder. Every path token is
//! resolved against it: even-indexed tokens are class ids, odd-indexed
//! tokens are field names on the preceding class.

mod loader;

pub use loader::IdlError;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::SchemaLookupError;

/// How a field relates to the rest of the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// A plain column.
    #[default]
    Value,
    /// A column that joins to another class.
    Link,
}

/// A field definition on an IDL class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdlField {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default = "default_datatype")]
    pub datatype: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    /// Join column on the linked class, for link fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

fn default_datatype() -> String {
    "text".to_string()
}

impl IdlField {
    /// Create a value field.
    pub fn value(
        name: impl Into<String>,
        label: impl Into<String>,
        datatype: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            datatype: datatype.into(),
            field_type: FieldType::Value,
            key: None,
        }
    }

    /// Create a link field joining on `key`.
    pub fn link(
        name: impl Into<String>,
        label: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            datatype: "link".to_string(),
            field_type: FieldType::Link,
            key: Some(key.into()),
        }
    }

    pub fn is_link(&self) -> bool {
        self.field_type == FieldType::Link
    }
}

/// Class metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdlClass {
    #[serde(default)]
    pub id: String,
    pub table: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub fields: Vec<IdlField>,
}

impl IdlClass {
    pub fn new(id: impl Into<String>, table: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            table: table.into(),
            label: label.into(),
            fields: Vec::new(),
        }
    }

    /// Builder: add a field.
    pub fn with_field(mut self, field: IdlField) -> Self {
        self.fields.push(field);
        self
    }

    /// Builder: add a value field.
    pub fn with_value_field(
        self,
        name: impl Into<String>,
        label: impl Into<String>,
        datatype: impl Into<String>,
    ) -> Self {
        self.with_field(IdlField::value(name, label, datatype))
    }

    /// Builder: add a link field.
    pub fn with_link_field(
        self,
        name: impl Into<String>,
        label: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        self.with_field(IdlField::link(name, label, key))
    }

    /// Find a field by name.
    pub fn field(&self, name: &str) -> Option<&IdlField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Find a field by name, failing with a lookup error.
    pub fn require_field(&self, name: &str) -> Result<&IdlField, SchemaLookupError> {
        self.field(name).ok_or_else(|| SchemaLookupError::UnknownField {
            class: self.id.clone(),
            field: name.to_string(),
        })
    }

    /// Fill in labels left empty by the source document.
    fn normalize(&mut self) {
        if self.label.is_empty() {
            self.label = self.id.clone();
        }
        for field in &mut self.fields {
            if field.label.is_empty() {
                field.label = field.name.clone();
            }
        }
    }
}

/// The schema index: class id → class.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Idl {
    classes: HashMap<String, IdlClass>,
}

impl Idl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a class, replacing any class with the same id.
    pub fn with_class(mut self, class: IdlClass) -> Self {
        self.insert(class);
        self
    }

    pub fn insert(&mut self, mut class: IdlClass) {
        class.normalize();
        self.classes.insert(class.id.clone(), class);
    }

    pub fn class(&self, id: &str) -> Option<&IdlClass> {
        self.classes.get(id)
    }

    /// Find a class by id, failing with a lookup error.
    pub fn require_class(&self, id: &str) -> Result<&IdlClass, SchemaLookupError> {
        self.class(id)
            .ok_or_else(|| SchemaLookupError::UnknownClass(id.to_string()))
    }

    /// Resolve `field` on class `class_id`.
    pub fn require_field(
        &self,
        class_id: &str,
        field: &str,
    ) -> Result<&IdlField, SchemaLookupError> {
        self.require_class(class_id)?.require_field(field)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Class ids in sorted order.
    pub fn class_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.classes.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
