use serde_json::Value;

use super::display_value;

/// Headline figure per result shape, checked in order.
const PRIORITY_POINTERS: &[&str] = &[
    "/recommendation/verdict",
    "/monthly_payment",
    "/content",
    "/message",
];

/// Print just the key answer value from the output.
///
/// Looks for a well-known headline field, then falls back to the first
/// field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    for pointer in PRIORITY_POINTERS {
        if let Some(val) = result_obj.pointer(pointer) {
            if !val.is_null() {
                println!("{}", display_value(val));
                return;
            }
        }
    }

    match result_obj {
        Value::Object(map) => {
            if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, display_value(val));
            }
        }
        Value::Array(items) => {
            for item in items {
                println!("{}", display_value(item));
            }
        }
        other => println!("{}", display_value(other)),
    }
}
