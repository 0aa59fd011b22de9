use serde_json::Value;

use super::{format_scalar, result_of};

/// Key answer fields, most specific first.
const PRIORITY_KEYS: [&str; 7] = [
    "overall_risk_score",
    "total",
    "macro_risk_score",
    "sector_risk_score",
    "debt_to_ebitda",
    "current_ratio",
    "financial_statement",
];

/// Print just the key answer value from the output, falling back to the
/// first field of the result.
pub fn print_minimal(value: &Value) {
    let result = result_of(value);

    if let Value::Object(map) = result {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                println!("{}", format_minimal(val));
                return;
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
        other => format_scalar(other),
    }
}
