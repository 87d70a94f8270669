//! Filter-widget resolution.
//!
//! Maps the operator code picked in the filter widget, plus the widget's
//! raw input values, to the `{operator, transform, params}` triple stored
//! with a filter.

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::error::{BuilderError, BuilderResult};

/// Format of defaulted date parameters.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// How the params list is built from the widget inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParamRule {
    /// The free-text input (empty when missing).
    Text,
    /// Two dates, each defaulting to today.
    DateRange,
    /// The inputs as given.
    Inputs,
}

struct FilterRule {
    code: &'static str,
    operator: Option<&'static str>,
    transform: Option<&'static str>,
    params: ParamRule,
}

const fn rule(
    code: &'static str,
    operator: Option<&'static str>,
    transform: Option<&'static str>,
    params: ParamRule,
) -> FilterRule {
    FilterRule {
        code,
        operator,
        transform,
        params,
    }
}

const BETWEEN: Option<&str> = Some("between");
const NOT_BETWEEN: Option<&str> = Some("not between");

const FILTER_RULES: &[FilterRule] = &[
    // generic comparisons
    rule("equals", Some("equals"), None, ParamRule::Text),
    rule("like", Some("like"), None, ParamRule::Text),
    rule("ilike", Some("ilike"), None, ParamRule::Text),
    rule("gt", Some(">"), None, ParamRule::Text),
    rule("gte", Some(">="), None, ParamRule::Text),
    rule("lt", Some("<"), None, ParamRule::Text),
    rule("lte", Some("<="), None, ParamRule::Text),
    rule("in", Some("in"), None, ParamRule::Text),
    rule("not_in", Some("not in"), None, ParamRule::Text),
    rule("between", BETWEEN, None, ParamRule::Text),
    rule("not_between", NOT_BETWEEN, None, ParamRule::Text),
    // timestamps
    rule("date_between", BETWEEN, Some("date"), ParamRule::DateRange),
    rule("date_not_between", NOT_BETWEEN, Some("date"), ParamRule::DateRange),
    // date parts
    rule("dow_between", BETWEEN, Some("dow"), ParamRule::Inputs),
    rule("dow_not_between", NOT_BETWEEN, Some("dow"), ParamRule::Inputs),
    rule("dom_between", BETWEEN, Some("dom"), ParamRule::Inputs),
    rule("dom_not_between", NOT_BETWEEN, Some("dom"), ParamRule::Inputs),
    rule("month_between", BETWEEN, Some("moy"), ParamRule::Inputs),
    rule("month_not_between", NOT_BETWEEN, Some("moy"), ParamRule::Inputs),
    rule("quarter_between", BETWEEN, Some("qoy"), ParamRule::Inputs),
    rule("quarter_not_between", NOT_BETWEEN, Some("qoy"), ParamRule::Inputs),
    rule("year_between", BETWEEN, Some("year_trunc"), ParamRule::Inputs),
    rule("year_not_between", NOT_BETWEEN, Some("year_trunc"), ParamRule::Inputs),
    rule("age_between", BETWEEN, Some("age"), ParamRule::Inputs),
    rule("age_not_between", NOT_BETWEEN, Some("age"), ParamRule::Inputs),
    // string and numeric transforms
    rule("substring", None, Some("substring"), ParamRule::Inputs),
    rule("lower", None, Some("lower"), ParamRule::Inputs),
    rule("upper", None, Some("upper"), ParamRule::Inputs),
    rule("round", None, Some("round"), ParamRule::Inputs),
    rule("int", None, Some("int"), ParamRule::Inputs),
];

/// A resolved filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedFilter {
    pub operator: Option<String>,
    pub transform: Option<String>,
    pub params: Vec<String>,
}

/// All operator codes the resolver knows, in table order.
pub fn filter_codes() -> impl Iterator<Item = &'static str> {
    FILTER_RULES.iter().map(|rule| rule.code)
}

/// Resolve `code` against the widget inputs, defaulting dates to today.
pub fn resolve_filter<S: AsRef<str>>(code: &str, inputs: &[S]) -> BuilderResult<ResolvedFilter> {
    resolve_filter_on(code, inputs, Local::now().date_naive())
}

/// Resolve `code` with `today` as the default date.
pub fn resolve_filter_on<S: AsRef<str>>(
    code: &str,
    inputs: &[S],
    today: NaiveDate,
) -> BuilderResult<ResolvedFilter> {
    let rule = FILTER_RULES
        .iter()
        .find(|rule| rule.code == code)
        .ok_or_else(|| BuilderError::UnknownFilterOperator(code.to_string()))?;

    let params = match rule.params {
        ParamRule::Text => vec![inputs
            .first()
            .map(|value| value.as_ref().to_string())
            .unwrap_or_default()],
        ParamRule::DateRange => {
            let today = today.format(DATE_FORMAT).to_string();
            (0..2)
                .map(|i| match inputs.get(i).map(|v| v.as_ref().trim()) {
                    Some(value) if !value.is_empty() => value.to_string(),
                    _ => today.clone(),
                })
                .collect()
        }
        ParamRule::Inputs => inputs.iter().map(|v| v.as_ref().to_string()).collect(),
    };

    Ok(ResolvedFilter {
        operator: rule.operator.map(str::to_string),
        transform: rule.transform.map(str::to_string),
        params,
    })
}
