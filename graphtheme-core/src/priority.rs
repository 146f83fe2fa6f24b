//! Overlay priority weights.
//!
//! A weight marks how strongly a chart should claim screen space. Charts with a
//! weight are placed before charts without one, highest weight first; charts
//! without a weight keep their input order behind them.

use std::cmp::Ordering;

use serde_json::Value;

/// Parse a stored attribute value as an overlay weight.
///
/// Numbers and numeric strings are accepted. Anything else (missing, null,
/// booleans, non-numeric text, NaN, infinities) is treated as absent.
pub fn parse_weight(value: &Value) -> Option<f64> {
    let weight = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    weight.is_finite().then_some(weight)
}

/// Total order over optional weights: weighted before unweighted, larger first.
///
/// Two absent weights, or two equal weights, compare `Equal` so a stable sort
/// keeps their input order.
pub fn compare_priority(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (Some(wa), Some(wb)) => wb.partial_cmp(&wa).unwrap_or(Ordering::Equal),
    }
}

/// Stable in-place sort of `items` by the weight `weight_of` extracts.
pub fn sort_by_priority<T, F>(items: &mut [T], weight_of: F)
where
    F: Fn(&T) -> Option<f64>,
{
    items.sort_by(|a, b| compare_priority(weight_of(a), weight_of(b)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_weight() {
        assert_eq!(parse_weight(&json!(5)), Some(5.0));
        assert_eq!(parse_weight(&json!(2.5)), Some(2.5));
        assert_eq!(parse_weight(&json!("10")), Some(10.0));
        assert_eq!(parse_weight(&json!(" 7.25 ")), Some(7.25));
        assert_eq!(parse_weight(&json!(0)), Some(0.0));
        assert_eq!(parse_weight(&json!("abc")), None);
        assert_eq!(parse_weight(&json!("")), None);
        assert_eq!(parse_weight(&json!("NaN")), None);
        assert_eq!(parse_weight(&json!("inf")), None);
        assert_eq!(parse_weight(&json!(true)), None);
        assert_eq!(parse_weight(&Value::Null), None);
        assert_eq!(parse_weight(&json!([1])), None);
    }

    #[test]
    fn test_compare_priority() {
        assert_eq!(compare_priority(None, None), Ordering::Equal);
        assert_eq!(compare_priority(Some(1.0), None), Ordering::Less);
        assert_eq!(compare_priority(None, Some(1.0)), Ordering::Greater);
        assert_eq!(compare_priority(Some(10.0), Some(5.0)), Ordering::Less);
        assert_eq!(compare_priority(Some(5.0), Some(10.0)), Ordering::Greater);
        assert_eq!(compare_priority(Some(3.0), Some(3.0)), Ordering::Equal);
    }

    #[test]
    fn test_sort_weighted_first_then_input_order() {
        let mut items = vec![
            ("a", None),
            ("b", Some(5.0)),
            ("c", None),
            ("d", Some(10.0)),
            ("e", Some(5.0)),
        ];
        sort_by_priority(&mut items, |(_, w)| *w);
        let order: Vec<&str> = items.iter().map(|(name, _)| *name).collect();
        assert_eq!(order, vec!["d", "b", "e", "a", "c"]);
    }

    #[test]
    fn test_sort_without_weights_is_identity() {
        let mut items = vec![1, 2, 3, 4];
        sort_by_priority(&mut items, |_| None);
        assert_eq!(items, vec![1, 2, 3, 4]);
    }
}
