//! Style filter expressions.
//!
//! Supports the small legacy-filter subset a rendered-feature query needs:
//! `["==", key, value]`, `["!=", key, value]`, `["in", key, v1, v2, ...]`
//! and `["not in", key, v1, v2, ...]`. Matching is exact JSON equality
//! against the feature's properties; an absent property compares as null.
//!
//! Everything else — unknown operators, expression-style filters, malformed
//! arrays — compiles to [`FilterExpr::Unsupported`], which matches nothing.
//! Failing closed keeps the engine from reporting features a renderer with
//! a richer filter implementation might have hidden; the alternative
//! (failing open) would surface them as false positives.

use serde_json::{Map, Value};

/// A compiled filter expression.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    /// No filter present; every feature passes.
    Always,
    /// `["==", key, value]`
    Eq(String, Value),
    /// `["!=", key, value]`
    Ne(String, Value),
    /// `["in", key, v1, v2, ...]`
    In(String, Vec<Value>),
    /// `["not in", key, v1, v2, ...]`
    NotIn(String, Vec<Value>),
    /// Unrecognized or malformed filter; matches nothing.
    Unsupported,
}

impl FilterExpr {
    /// Compile a style layer's raw filter value.
    ///
    /// `None` compiles to [`FilterExpr::Always`]. Anything that is not one
    /// of the four supported forms compiles to
    /// [`FilterExpr::Unsupported`].
    pub fn compile(filter: Option<&Value>) -> Self {
        let Some(filter) = filter else {
            return FilterExpr::Always;
        };
        let Some(parts) = filter.as_array() else {
            return FilterExpr::Unsupported;
        };
        let (Some(op), Some(key)) = (
            parts.first().and_then(Value::as_str),
            parts.get(1).and_then(Value::as_str),
        ) else {
            return FilterExpr::Unsupported;
        };

        match op {
            "==" | "!=" => {
                if parts.len() != 3 {
                    return FilterExpr::Unsupported;
                }
                let value = parts[2].clone();
                if op == "==" {
                    FilterExpr::Eq(key.to_string(), value)
                } else {
                    FilterExpr::Ne(key.to_string(), value)
                }
            }
            "in" | "not in" => {
                let values: Vec<Value> = parts[2..].to_vec();
                if op == "in" {
                    FilterExpr::In(key.to_string(), values)
                } else {
                    FilterExpr::NotIn(key.to_string(), values)
                }
            }
            _ => FilterExpr::Unsupported,
        }
    }

    /// Evaluate the filter against a feature's properties.
    pub fn matches(&self, properties: &Map<String, Value>) -> bool {
        match self {
            FilterExpr::Always => true,
            FilterExpr::Eq(key, value) => lookup(properties, key) == value,
            FilterExpr::Ne(key, value) => lookup(properties, key) != value,
            FilterExpr::In(key, values) => values.contains(lookup(properties, key)),
            FilterExpr::NotIn(key, values) => !values.contains(lookup(properties, key)),
            FilterExpr::Unsupported => false,
        }
    }
}

/// Property lookup with absent keys represented as null.
fn lookup<'a>(properties: &'a Map<String, Value>, key: &str) -> &'a Value {
    properties.get(key).unwrap_or(&Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_absent_filter_always_passes() {
        let expr = FilterExpr::compile(None);
        assert_eq!(expr, FilterExpr::Always);
        assert!(expr.matches(&Map::new()));
    }

    #[test]
    fn test_eq_matches_exact_value() {
        let filter = json!(["==", "class", "primary"]);
        let expr = FilterExpr::compile(Some(&filter));

        assert!(expr.matches(&props(json!({"class": "primary"}))));
        assert!(!expr.matches(&props(json!({"class": "secondary"}))));
        assert!(!expr.matches(&Map::new()));
    }

    #[test]
    fn test_eq_does_not_coerce_types() {
        let filter = json!(["==", "lanes", 2]);
        let expr = FilterExpr::compile(Some(&filter));

        assert!(expr.matches(&props(json!({"lanes": 2}))));
        assert!(!expr.matches(&props(json!({"lanes": "2"}))));
    }

    #[test]
    fn test_ne_matches_absent_property() {
        let filter = json!(["!=", "tunnel", true]);
        let expr = FilterExpr::compile(Some(&filter));

        assert!(expr.matches(&Map::new()));
        assert!(expr.matches(&props(json!({"tunnel": false}))));
        assert!(!expr.matches(&props(json!({"tunnel": true}))));
    }

    #[test]
    fn test_in_membership() {
        let filter = json!(["in", "class", "primary", "secondary"]);
        let expr = FilterExpr::compile(Some(&filter));

        assert!(expr.matches(&props(json!({"class": "secondary"}))));
        assert!(!expr.matches(&props(json!({"class": "tertiary"}))));
        assert!(!expr.matches(&Map::new()));
    }

    #[test]
    fn test_not_in_membership() {
        let filter = json!(["not in", "class", "primary", "secondary"]);
        let expr = FilterExpr::compile(Some(&filter));

        assert!(!expr.matches(&props(json!({"class": "primary"}))));
        assert!(expr.matches(&props(json!({"class": "tertiary"}))));
        assert!(expr.matches(&Map::new()));
    }

    #[test]
    fn test_unknown_operator_fails_closed() {
        let filter = json!(["all", ["==", "class", "primary"]]);
        let expr = FilterExpr::compile(Some(&filter));
        assert_eq!(expr, FilterExpr::Unsupported);
        assert!(!expr.matches(&props(json!({"class": "primary"}))));
    }

    #[test]
    fn test_malformed_filter_fails_closed() {
        for filter in [json!({}), json!("=="), json!([]), json!(["==", 5, 1]), json!(["==", "k"])] {
            let expr = FilterExpr::compile(Some(&filter));
            assert_eq!(expr, FilterExpr::Unsupported, "filter: {filter}");
        }
    }
}
