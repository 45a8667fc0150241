use serde_json::{Map, Value};
use tracing::warn;

use super::{TraversalError, SNAPSHOT_SUFFIX};

/// Unwrap one element of a `*StatusSnapshots` array.
///
/// Each element is an object holding, among other fields, one key ending in
/// `StatusSnapshot` whose value is the component's own snapshot. Returns
/// `Ok(None)` when no such key exists. Keys are visited in sorted order, so
/// if several keys match the lexicographically first one wins.
pub fn unwrap_snapshot(node: &Value) -> Result<Option<&Map<String, Value>>, TraversalError> {
    let object = node.as_object().ok_or_else(|| {
        TraversalError::invalid_format(format!(
            "snapshot entry must be an object, found {}",
            type_name(node)
        ))
    })?;

    let mut matches = object
        .iter()
        .filter(|(key, _)| key.ends_with(SNAPSHOT_SUFFIX));

    let Some((key, value)) = matches.next() else {
        return Ok(None);
    };

    let extra = matches.count();
    if extra > 0 {
        warn!(key = %key, extra, "snapshot entry has several snapshot keys, using the first");
    }

    value.as_object().map(Some).ok_or_else(|| {
        TraversalError::invalid_format(format!(
            "'{}' must be an object, found {}",
            key,
            type_name(value)
        ))
    })
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_processor_snapshot() {
        let node = json!({"id": "x", "processorStatusSnapshot": {"id": "x"}});
        let inner = unwrap_snapshot(&node).unwrap().unwrap();
        assert_eq!(Value::Object(inner.clone()), json!({"id": "x"}));
    }

    #[test]
    fn test_missing_snapshot_key() {
        let node = json!({"id": "x", "canRead": true});
        assert!(unwrap_snapshot(&node).unwrap().is_none());
    }

    #[test]
    fn test_plural_key_does_not_match() {
        let node = json!({"processorStatusSnapshots": []});
        assert!(unwrap_snapshot(&node).unwrap().is_none());
    }

    #[test]
    fn test_non_object_entry() {
        let err = unwrap_snapshot(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, TraversalError::InvalidFormat(_)));
    }

    #[test]
    fn test_non_object_snapshot() {
        let node = json!({"processorStatusSnapshot": "oops"});
        assert!(unwrap_snapshot(&node).is_err());
    }

    #[test]
    fn test_several_keys_pick_first_sorted() {
        let node = json!({
            "processorStatusSnapshot": {"id": "p"},
            "connectionStatusSnapshot": {"id": "c"},
        });
        let inner = unwrap_snapshot(&node).unwrap().unwrap();
        assert_eq!(inner.get("id"), Some(&json!("c")));
    }
}
