//! # idlreport
//!
//! A path-addressed report-definition builder over an IDL entity schema.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │              IDL (classes, tables, fields, links)       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [path codec]
//! ┌─────────────────────────────────────────────────────────┐
//! │   ColumnPath  bib-copy-acp-barcode                      │
//! │   → relation alias, leaf column, label                  │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [from-clause builder]
//! ┌─────────────────────────────────────────────────────────┐
//! │   FromNode join fragment, merged into the FromTree      │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [report builder]
//! ┌─────────────────────────────────────────────────────────┐
//! │   ReportDefinition { name, def: {select, from}, params }│
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Filter widgets resolve through [`filter::resolve_filter`].

pub mod builder;
pub mod config;
pub mod error;
pub mod filter;
pub mod idl;
pub mod path;
pub mod query;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::builder::{Removal, ReportBuilder, SelectorEntry, SelectorList};
    pub use crate::error::{BuilderError, BuilderResult, SchemaLookupError};
    pub use crate::filter::{resolve_filter, resolve_filter_on, ResolvedFilter};
    pub use crate::idl::{FieldType, Idl, IdlClass, IdlField};
    pub use crate::path::ColumnPath;
    pub use crate::query::{
        build_from_fragment, ColumnSpec, ColumnTransform, FromNode, FromTree, QueryDocument,
        ReportDefinition, SelectItem,
    };
}

pub use builder::ReportBuilder;
pub use error::{BuilderError, BuilderResult};
pub use idl::Idl;
pub use path::ColumnPath;
