//! Tests for building and merging from-clause fragments.

use idlreport::prelude::*;
use serde_json::json;

fn fixture_idl() -> Idl {
    Idl::from_json_str(include_str!("../fixtures/idl.json")).unwrap()
}

fn path(s: &str) -> ColumnPath {
    ColumnPath::parse(s).unwrap()
}

/// Walk the single chain of a fragment down to its leaf.
fn leaf(node: &FromNode) -> &FromNode {
    match node.join.values().next() {
        Some(child) => leaf(child),
        None => node,
    }
}

#[test]
fn test_copy_barcode_scenario() {
    let idl = fixture_idl();
    let barcode = path("bib-copy-acp-barcode");

    assert_eq!(barcode.make_label(&idl).unwrap(), "Biblio:Copy:Barcode");

    let fragment = build_from_fragment(&idl, &barcode).unwrap();
    assert_eq!(
        serde_json::to_value(&fragment).unwrap(),
        json!({
            "table": "biblio",
            "alias": "bib",
            "join": {
                "copy": { "table": "copy", "alias": "bib-copy-acp", "key": "record" }
            }
        })
    );
}

#[test]
fn test_fragment_depth_is_half_the_token_count() {
    let idl = fixture_idl();
    let paths = [
        "bib-title",
        "bib-copy-acp-barcode",
        "bib-copy-acp-circ_lib-aou-shortname",
        "bib-copy-acp-circ_lib-aou-parent_ou-aou-name",
        "bib-creator-au-home_ou-aou-name",
    ];

    for p in paths {
        let column_path = path(p);
        let fragment = build_from_fragment(&idl, &column_path).unwrap();

        assert_eq!(fragment.depth(), column_path.len() / 2, "{}", p);
        let leaf = leaf(&fragment);
        assert!(leaf.join.is_empty(), "{}", p);
        assert_eq!(leaf.alias, column_path.relation(), "{}", p);
    }
}

#[test]
fn test_same_class_twice_gets_distinct_aliases() {
    let idl = fixture_idl();
    let fragment =
        build_from_fragment(&idl, &path("bib-copy-acp-circ_lib-aou-parent_ou-aou-name")).unwrap();

    let circ_lib = fragment.find("bib-copy-acp-circ_lib-aou").unwrap();
    let parent = fragment.find("bib-copy-acp-circ_lib-aou-parent_ou-aou").unwrap();
    assert_eq!(circ_lib.table, "org_unit");
    assert_eq!(parent.table, "org_unit");
    assert!(circ_lib.join.contains_key("parent_ou"));
}

#[test]
fn test_class_terminated_path() {
    let idl = fixture_idl();
    let fragment = build_from_fragment(&idl, &path("bib-copy-acp")).unwrap();
    assert_eq!(fragment.depth(), 2);
    assert_eq!(leaf(&fragment).alias, "bib-copy-acp");
}

#[test]
fn test_unknown_class() {
    let idl = fixture_idl();
    let err = build_from_fragment(&idl, &path("bib-copy-acx-barcode")).unwrap_err();
    assert_eq!(
        err,
        BuilderError::SchemaLookup(SchemaLookupError::UnknownClass("acx".to_string()))
    );
}

#[test]
fn test_merge_fragments_into_tree() {
    let idl = fixture_idl();
    let mut tree = FromTree::new();

    for p in [
        "bib-title",
        "bib-copy-acp-barcode",
        "bib-copy-acp-price",
        "bib-copy-acp-status-ccs-name",
    ] {
        tree.merge(&build_from_fragment(&idl, &path(p)).unwrap()).unwrap();
    }

    assert_eq!(tree.len(), 3);
    assert_eq!(
        tree.aliases(),
        vec!["bib", "bib-copy-acp", "bib-copy-acp-status-ccs"]
    );
    assert_eq!(
        serde_json::to_value(&tree).unwrap(),
        json!({
            "table": "biblio",
            "alias": "bib",
            "join": {
                "copy": {
                    "table": "copy",
                    "alias": "bib-copy-acp",
                    "key": "record",
                    "join": {
                        "status": {
                            "table": "copy_status",
                            "alias": "bib-copy-acp-status-ccs",
                            "key": "id"
                        }
                    }
                }
            }
        })
    );
}
