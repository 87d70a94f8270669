//! Tests for pruning `from` branches out of a report.

use idlreport::prelude::*;
use serde_json::json;

fn fixture_idl() -> Idl {
    Idl::from_json_str(include_str!("../fixtures/idl.json")).unwrap()
}

fn path(s: &str) -> ColumnPath {
    ColumnPath::parse(s).unwrap()
}

fn builder_with<'a>(idl: &'a Idl, paths: &[&str]) -> ReportBuilder<'a> {
    let mut builder = ReportBuilder::new(idl);
    for p in paths {
        builder.add_display_item(&path(p), None, None).unwrap();
    }
    builder
}

#[test]
fn test_prune_is_idempotent() {
    let idl = fixture_idl();
    let mut builder = builder_with(&idl, &["bib-title", "bib-copy-acp-status-ccs-name"]);
    builder.remove_selected_display_items(&[path("bib-copy-acp-status-ccs-name")]);
    let after_first = builder.document().clone();

    assert!(!builder.prune_from_branch("bib-copy-acp-status-ccs"));
    assert!(!builder.prune_from_branch("bib-copy-acp"));
    assert_eq!(builder.document(), &after_first);
}

#[test]
fn test_passthrough_node_survives_while_descendant_selected() {
    let idl = fixture_idl();
    let mut builder = builder_with(
        &idl,
        &[
            "bib-title",
            "bib-copy-acp-barcode",
            "bib-copy-acp-circ_lib-aou-shortname",
        ],
    );

    let removal = builder.remove_selected_display_items(&[path("bib-copy-acp-barcode")]);

    // bib-copy-acp is no longer selected but the aou join runs through it.
    assert!(removal.pruned.is_empty());
    assert!(builder.document().from.contains_alias("bib-copy-acp"));
    assert!(builder.document().from.has_joins("bib-copy-acp"));
    assert!(!builder.document().references("bib-copy-acp"));
}

#[test]
fn test_unreferenced_ancestors_collapse() {
    let idl = fixture_idl();
    let mut builder = builder_with(
        &idl,
        &[
            "bib-title",
            "bib-copy-acp-barcode",
            "bib-copy-acp-circ_lib-aou-shortname",
        ],
    );
    builder.remove_selected_display_items(&[path("bib-copy-acp-barcode")]);

    let removal =
        builder.remove_selected_display_items(&[path("bib-copy-acp-circ_lib-aou-shortname")]);

    assert_eq!(removal.pruned, vec!["bib-copy-acp-circ_lib-aou"]);
    assert_eq!(
        serde_json::to_value(&builder.document().from).unwrap(),
        json!({ "table": "biblio", "alias": "bib" })
    );
}

#[test]
fn test_referenced_ancestor_is_kept() {
    let idl = fixture_idl();
    let mut builder = builder_with(
        &idl,
        &["bib-copy-acp-barcode", "bib-copy-acp-circ_lib-aou-shortname"],
    );

    builder.remove_selected_display_items(&[path("bib-copy-acp-circ_lib-aou-shortname")]);

    assert_eq!(builder.document().from.aliases(), vec!["bib", "bib-copy-acp"]);
    assert!(!builder.document().from.has_joins("bib-copy-acp"));
}

#[test]
fn test_sibling_branch_untouched() {
    let idl = fixture_idl();
    let mut builder = builder_with(
        &idl,
        &[
            "bib-copy-acp-status-ccs-name",
            "bib-copy-acp-circ_lib-aou-name",
        ],
    );

    builder.remove_selected_display_items(&[path("bib-copy-acp-status-ccs-name")]);

    assert_eq!(
        builder.document().from.aliases(),
        vec!["bib", "bib-copy-acp", "bib-copy-acp-circ_lib-aou"]
    );
}

#[test]
fn test_selected_relation_is_not_pruned() {
    let idl = fixture_idl();
    let mut builder = builder_with(&idl, &["bib-title", "bib-copy-acp-barcode"]);
    let before = builder.document().clone();

    assert!(!builder.prune_from_branch("bib-copy-acp"));
    assert_eq!(builder.document(), &before);

    for item in &builder.document().select {
        assert!(builder.document().from.contains_alias(&item.relation));
    }
}

#[test]
fn test_root_is_never_pruned() {
    let idl = fixture_idl();
    let mut builder = builder_with(&idl, &["bib-title", "bib-copy-acp-barcode"]);

    assert!(!builder.prune_from_branch("bib"));
    assert_eq!(builder.document().from.root_alias(), Some("bib"));
}

#[test]
fn test_matching_node_with_joins_is_kept() {
    let idl = fixture_idl();
    let mut builder = builder_with(&idl, &["bib-title", "bib-copy-acp-status-ccs-name"]);
    let before = builder.document().clone();

    assert!(!builder.prune_from_branch("bib-copy-acp"));
    assert_eq!(builder.document(), &before);
}
