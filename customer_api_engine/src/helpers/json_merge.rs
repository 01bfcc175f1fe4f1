use serde_json::Value;

/// Shallow-merges `patch` into `target`: keys present in the patch override the stored key at
/// the same (top) nesting level, keys absent from the patch are preserved. Non-object targets are
/// replaced wholesale. There is no structural deletion; supplying a key always sets it.
pub fn shallow_merge(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(existing), Value::Object(incoming)) => {
            for (key, value) in incoming {
                existing.insert(key, value);
            }
        },
        (target, patch) => *target = patch,
    }
}
