use serde_json::{Map, Value};

/// Overlay `source` onto `target`, key by key. Objects merge recursively,
/// `null` in `source` leaves `target` untouched, anything else replaces.
pub(crate) fn merge_non_null_json_value(source: Value, target: &mut Value) {
    match (source, target) {
        (Value::Null, _) => {}
        (Value::Object(source), Value::Object(target)) => {
            for (key, value) in source {
                match target.get_mut(&key) {
                    Some(existing) => merge_non_null_json_value(value, existing),
                    None if value.is_null() => {}
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (source, target) => *target = source,
    }
}

/// The parts of `update` that differ from `current`, as a sparse object.
pub(crate) fn json_difference(current: Value, update: &Value) -> Value {
    match (current, update) {
        (Value::Object(current), Value::Object(update)) => {
            let mut diff = Map::new();
            let mut current = current;
            for (key, new_value) in update {
                match current.remove(key) {
                    Some(old_value) => {
                        if &old_value == new_value {
                            continue;
                        }
                        let nested = json_difference(old_value, new_value);
                        if nested != Value::Object(Map::new()) {
                            diff.insert(key.clone(), nested);
                        }
                    }
                    None => {
                        diff.insert(key.clone(), new_value.clone());
                    }
                }
            }
            Value::Object(diff)
        }
        (current, update) if &current == update => Value::Object(Map::new()),
        (_, update) => update.clone(),
    }
}
