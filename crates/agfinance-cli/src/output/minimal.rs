use serde_json::Value;

use super::cell;

/// Fields worth printing on their own, in priority order.
const PRIORITY_KEYS: [&str; 2] = ["monthly_payment", "eligible"];

/// Nested objects searched when the result itself has no priority field.
const NESTED_KEYS: [&str; 2] = ["quote", "best_option"];

/// Last resort before the first field (an empty comparison).
const FALLBACK_KEYS: [&str; 1] = ["count"];

/// Print just the key answer value from the output.
///
/// A quote or schedule prints the monthly payment, a comparison the best
/// option's monthly payment, a program fit its eligibility.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(answer) = find_answer(result_obj) {
        println!("{}", answer);
        return;
    }

    if let Value::Object(map) = result_obj {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, cell(val));
            return;
        }
    }

    println!("{}", cell(result_obj));
}

fn find_answer(result: &Value) -> Option<String> {
    let map = result.as_object()?;
    let direct = |keys: &[&str]| {
        keys.iter()
            .filter_map(|k| map.get(*k))
            .find(|v| !v.is_null())
            .map(cell)
    };
    direct(&PRIORITY_KEYS[..])
        .or_else(|| {
            NESTED_KEYS
                .iter()
                .filter_map(|k| map.get(*k))
                .find_map(|nested| nested.get("monthly_payment").map(cell))
        })
        .or_else(|| direct(&FALLBACK_KEYS[..]))
}
