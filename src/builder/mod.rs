//! The report builder session.
//!
//! [`ReportBuilder`] owns the query document, the parameter map and the
//! display/filter selector lists, and is the only writer of all of them.
//! Every mutation validates and builds what it needs before it writes,
//! so a failed call leaves the session exactly as it was.
//!
//! ```ignore
//! let mut builder = ReportBuilder::new(&idl).with_name("copies");
//! let barcode = ColumnPath::parse("bib-copy-acp-barcode")?;
//! builder.add_display_item(&barcode, None, None)?;
//! builder.remove_selected_display_items(&[barcode]);
//! ```

mod selector;

pub use selector::{SelectorEntry, SelectorList};

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::BuilderResult;
use crate::idl::Idl;
use crate::path::{ColumnInfo, ColumnPath};
use crate::query::{
    build_from_fragment, ColumnSpec, ColumnTransform, QueryDocument, ReportDefinition, SelectItem,
};

/// Prefix of generated parameter names (`::PARAM0`, `::PARAM1`, ...).
pub const PARAM_PREFIX: &str = "::PARAM";

static PARAM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"::PARAM\d+").expect("valid param pattern"));

/// What a call to [`ReportBuilder::remove_selected_display_items`] did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Removal {
    /// Select items dropped from the document.
    pub removed: Vec<SelectItem>,
    /// Aliases with no `::PARAMn` name; their params entries were left alone.
    pub skipped_aliases: Vec<String>,
    /// Requested relations whose `from` node was pruned. Passthrough
    /// ancestors collapsed along with them are not listed.
    pub pruned: Vec<String>,
    /// The last select item went away and the document was reset.
    pub reset: bool,
}

/// A report-definition builder session over one IDL.
#[derive(Debug, Clone)]
pub struct ReportBuilder<'idl> {
    idl: &'idl Idl,
    name: String,
    document: QueryDocument,
    params: BTreeMap<String, String>,
    next_param: usize,
    display: SelectorList,
    filters: SelectorList,
}

impl<'idl> ReportBuilder<'idl> {
    pub fn new(idl: &'idl Idl) -> Self {
        Self {
            idl,
            name: String::new(),
            document: QueryDocument::new(),
            params: BTreeMap::new(),
            next_param: 0,
            display: SelectorList::new(),
            filters: SelectorList::new(),
        }
    }

    /// Builder: set the report name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn idl(&self) -> &'idl Idl {
        self.idl
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn document(&self) -> &QueryDocument {
        &self.document
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn display_items(&self) -> &SelectorList {
        &self.display
    }

    pub fn filter_items(&self) -> &SelectorList {
        &self.filters
    }

    /// Snapshot of the report for submission.
    pub fn report(&self) -> ReportDefinition {
        ReportDefinition {
            name: self.name.clone(),
            document: self.document.clone(),
            params: self.params.clone(),
        }
    }

    /// Discard the document, the params and both selector lists. The
    /// report name is kept.
    pub fn reset_document(&mut self) {
        self.document = QueryDocument::new();
        self.params.clear();
        self.next_param = 0;
        self.display.clear();
        self.filters.clear();
        debug!(report = %self.name, "report builder reset");
    }

    pub fn make_label(&self, path: &ColumnPath) -> BuilderResult<String> {
        path.make_label(self.idl)
    }

    /// Label and datatype for the column editor.
    pub fn describe_column(&self, path: &ColumnPath) -> BuilderResult<ColumnInfo> {
        path.describe(self.idl)
    }

    fn next_param_name(&mut self) -> String {
        let name = format!("{}{}", PARAM_PREFIX, self.next_param);
        self.next_param += 1;
        name
    }

    /// Add a display column.
    ///
    /// Returns the new parameter name, or `None` if `path` is already in
    /// the display list. Duplicates are detected by path alone, so the same
    /// column cannot be selected twice under different transforms.
    pub fn add_display_item(
        &mut self,
        path: &ColumnPath,
        label: Option<String>,
        transform: Option<ColumnTransform>,
    ) -> BuilderResult<Option<String>> {
        if self.display.contains(path) {
            debug!(path = %path, "display item already selected");
            return Ok(None);
        }

        let column = path.leaf_column()?.to_string();
        let label = match label {
            Some(label) => label,
            None => path.make_label(self.idl)?,
        };
        let fragment = build_from_fragment(self.idl, path)?;

        // Only a root mismatch can fail here, before anything is written.
        self.document.from.merge(&fragment)?;

        let param = self.next_param_name();
        self.document.select.push(SelectItem {
            relation: path.relation(),
            alias: param.clone(),
            column: ColumnSpec::new(column, transform),
        });
        self.params.insert(param.clone(), label.clone());
        self.display.add(path.clone(), label);

        debug!(path = %path, param = %param, "added display item");
        self.log_document();
        Ok(Some(param))
    }

    /// Remove display columns.
    ///
    /// Drops every select item reading one of `selected` (transforms
    /// unwrapped), deletes their params entries, and prunes joins no
    /// longer used. If no select item is left the whole document is reset.
    pub fn remove_selected_display_items(&mut self, selected: &[ColumnPath]) -> Removal {
        let mut removal = Removal::default();
        self.display.remove_all(selected);

        let (removed, kept): (Vec<SelectItem>, Vec<SelectItem>) =
            std::mem::take(&mut self.document.select)
                .into_iter()
                .partition(|item| {
                    selected.iter().any(|path| {
                        path.leaf_field()
                            .is_some_and(|column| item.selects(&path.relation(), column))
                    })
                });
        self.document.select = kept;

        for item in &removed {
            match PARAM_PATTERN.find(&item.alias) {
                Some(param) => {
                    self.params.remove(param.as_str());
                }
                None => {
                    warn!(alias = %item.alias, "select alias has no parameter name");
                    removal.skipped_aliases.push(item.alias.clone());
                }
            }
        }
        removal.removed = removed;

        if removal.removed.is_empty() {
            return removal;
        }

        if self.document.select.is_empty() {
            self.reset_document();
            removal.reset = true;
            return removal;
        }

        for path in selected {
            let relation = path.relation();
            if !self.document.references(&relation) && self.prune_from_branch(&relation) {
                removal.pruned.push(relation);
            }
        }

        self.log_document();
        removal
    }

    /// Prune `relation` from the join tree; ancestors that end up with no
    /// joins and no select item are removed too. A relation still read by
    /// a select item is left in place.
    pub fn prune_from_branch(&mut self, relation: &str) -> bool {
        if self.document.references(relation) {
            debug!(relation, "relation still selected, not pruning");
            return false;
        }

        let select = &self.document.select;
        let pruned = self
            .document
            .from
            .prune(relation, &|alias| select.iter().any(|item| item.relation == alias));

        if pruned {
            debug!(relation, "pruned from branch");
        }
        pruned
    }

    /// Add a filter column. Returns false if the path is already listed.
    pub fn add_filter_item(
        &mut self,
        path: &ColumnPath,
        label: Option<String>,
    ) -> BuilderResult<bool> {
        if self.filters.contains(path) {
            return Ok(false);
        }

        let label = match label {
            Some(label) => {
                path.resolve_fields(self.idl)?;
                label
            }
            None => path.make_label(self.idl)?,
        };

        debug!(path = %path, "added filter item");
        Ok(self.filters.add(path.clone(), label))
    }

    /// Remove filter columns, returning the paths that were listed.
    pub fn remove_selected_filter_items(&mut self, selected: &[ColumnPath]) -> Vec<ColumnPath> {
        self.filters.remove_all(selected)
    }

    fn log_document(&self) {
        match serde_json::to_string_pretty(&self.document) {
            Ok(json) => debug!("report document:\n{}", json),
            Err(e) => warn!("failed to render report document: {}", e),
        }
    }
}
