//! Tests for filter-widget resolution.

use chrono::{Local, NaiveDate};
use idlreport::filter::{filter_codes, DATE_FORMAT};
use idlreport::prelude::*;
use insta::assert_snapshot;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 11, 30).unwrap()
}

#[test]
fn test_year_between() {
    let resolved = resolve_filter_on("year_between", &["2019", "2023"], day()).unwrap();
    assert_eq!(resolved.operator.as_deref(), Some("between"));
    assert_eq!(resolved.transform.as_deref(), Some("year_trunc"));
    assert_eq!(resolved.params, vec!["2019", "2023"]);
}

#[test]
fn test_lte_serializes_null_transform() {
    let resolved = resolve_filter("lte", &["5"]).unwrap();
    assert_snapshot!(
        serde_json::to_string(&resolved).unwrap(),
        @r#"{"operator":"<=","transform":null,"params":["5"]}"#
    );
}

#[test]
fn test_date_part_transforms() {
    let cases = [
        ("dow", "dow"),
        ("dom", "dom"),
        ("month", "moy"),
        ("quarter", "qoy"),
        ("year", "year_trunc"),
        ("age", "age"),
    ];

    for (prefix, transform) in cases {
        let between = resolve_filter_on(&format!("{}_between", prefix), &["1", "3"], day()).unwrap();
        assert_eq!(between.operator.as_deref(), Some("between"), "{}", prefix);
        assert_eq!(between.transform.as_deref(), Some(transform), "{}", prefix);
        assert_eq!(between.params, vec!["1", "3"]);

        let outside =
            resolve_filter_on(&format!("{}_not_between", prefix), &["1", "3"], day()).unwrap();
        assert_eq!(outside.operator.as_deref(), Some("not between"), "{}", prefix);
        assert_eq!(outside.transform.as_deref(), Some(transform), "{}", prefix);
    }
}

#[test]
fn test_date_between_defaults() {
    let resolved = resolve_filter_on("date_between", &["", "2023-12-31"], day()).unwrap();
    assert_eq!(resolved.params, vec!["2023-11-30", "2023-12-31"]);

    let resolved = resolve_filter_on::<&str>("date_between", &[], day()).unwrap();
    assert_eq!(resolved.params, vec!["2023-11-30", "2023-11-30"]);
}

#[test]
fn test_date_between_uses_local_today() {
    let today = Local::now().date_naive().format(DATE_FORMAT).to_string();
    let resolved = resolve_filter::<&str>("date_not_between", &[]).unwrap();

    // Tolerate the clock crossing midnight between the two reads.
    let tomorrow = Local::now().date_naive().format(DATE_FORMAT).to_string();
    assert!(resolved.params[0] == today || resolved.params[0] == tomorrow);
    assert_eq!(resolved.params.len(), 2);
}

#[test]
fn test_every_listed_code_resolves() {
    let codes: Vec<&str> = filter_codes().collect();
    assert!(codes.contains(&"equals"));
    assert!(codes.contains(&"age_not_between"));

    for code in codes {
        assert!(resolve_filter_on(code, &["x"], day()).is_ok(), "{}", code);
    }
}

#[test]
fn test_unknown_code_is_an_error() {
    let err = resolve_filter("soundex", &["x"]).unwrap_err();
    assert_snapshot!(err.to_string(), @"Unknown filter operator: 'soundex'");
}
