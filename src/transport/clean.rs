use serde_json::Value;

/// Drop `null` values from objects and arrays, recursively. Key order is preserved.
pub fn filter_absent(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, value)| !value.is_null())
                .map(|(key, value)| (key, filter_absent(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .filter(|value| !value.is_null())
                .map(filter_absent)
                .collect(),
        ),
        other => other,
    }
}

/// Keep the present entries of an ordered `(key, Option<value>)` list.
pub fn filter_absent_pairs<K, V>(pairs: impl IntoIterator<Item = (K, Option<V>)>) -> Vec<(K, V)> {
    pairs
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key, value)))
        .collect()
}
