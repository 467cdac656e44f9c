//! Configuration merge logic
//!
//! Overrides are applied to the defaults with:
//! - Objects: deep-merge by key
//! - Arrays: REPLACE (last wins)
//! - Scalars: override (last wins)

use serde_json::{Map, Value};

/// Deep merge `source` into `target` in place.
///
/// Merge semantics:
/// - Objects: deep-merge by key (recursive). A missing or non-object value
///   at the target key becomes an empty object first.
/// - Arrays: REPLACE (source wins entirely)
/// - Scalars: override (source wins)
/// - Null: override (null can override any value)
pub fn deep_merge(target: &mut Value, source: &Value) {
    let Value::Object(source_map) = source else {
        *target = source.clone();
        return;
    };

    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    let Value::Object(target_map) = target else {
        return;
    };

    for (key, source_value) in source_map {
        match source_value {
            Value::Object(_) => {
                let slot = target_map
                    .entry(key.clone())
                    .or_insert_with(|| Value::Object(Map::new()));
                deep_merge(slot, source_value);
            }
            _ => {
                target_map.insert(key.clone(), source_value.clone());
            }
        }
    }
}

/// Merge multiple config layers in order (first is base, last has highest precedence)
pub fn merge_layers(layers: Vec<Value>) -> Value {
    layers.into_iter().fold(Value::Null, |mut acc, layer| {
        deep_merge(&mut acc, &layer);
        acc
    })
}
