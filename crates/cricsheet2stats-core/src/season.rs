// Season label normalization
//
// Split-year labels collapse to a single canonical year via an enumerated
// table of known historical exceptions. This is deliberately NOT a general
// rule: an unknown split-year format means the table needs a new entry,
// not that a rule should be inferred.

use std::collections::HashMap;

use once_cell::sync::Lazy;

static SPLIT_YEAR_EXCEPTIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("2007/08", "2008"),
        ("2009/10", "2010"),
        ("2020/21", "2020"),
    ])
});

/// Map a raw season label to its canonical season identifier.
///
/// Labels outside the exception table pass through unchanged.
pub fn normalize(raw: &str) -> String {
    SPLIT_YEAR_EXCEPTIONS
        .get(raw)
        .map(|canonical| (*canonical).to_string())
        .unwrap_or_else(|| raw.to_string())
}
