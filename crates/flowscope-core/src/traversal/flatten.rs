use serde_json::{Map, Value};
use tracing::{debug, trace};

use super::{child_arrays, kind_tag, unwrap_snapshot, Traversal, TraversalError, PROCESS_GROUPS_KEY};
use crate::component::Component;

/// Flatten an aggregate snapshot into the components the traversal accepts.
///
/// Each component's `path` is the location of its parent, e.g. a processor
/// in group `Ingest` under the root group `NiFi Flow` has path
/// `/NiFi Flow/Ingest`. Siblings are sorted by kind, then by name.
pub fn flatten<'a>(
    snapshot: &'a Map<String, Value>,
    traversal: &Traversal<'_>,
) -> Result<Vec<Component<'a>>, TraversalError> {
    let components = visit(traversal, 0, PROCESS_GROUPS_KEY, "", snapshot)?;
    debug!(
        count = components.len(),
        recursive = traversal.is_recursive(),
        "flattened status snapshot"
    );
    Ok(components)
}

fn visit<'a>(
    traversal: &Traversal<'_>,
    level: usize,
    raw_key: &str,
    prefix: &str,
    node: &'a Map<String, Value>,
) -> Result<Vec<Component<'a>>, TraversalError> {
    traversal.check_depth(level)?;

    let mut result = Vec::new();
    if node.is_empty() {
        return Ok(result);
    }

    let component = Component::classify(&kind_tag(raw_key), prefix, node);

    let mut path = prefix.to_string();
    if path.is_empty() && traversal.root_id().is_some_and(|root| root != component.id) {
        path.push('.');
    }
    path.push('/');
    path.push_str(&component.name);

    trace!(level, id = %component.id, kind = %component.kind, "visit");
    if traversal.accepts(&component) {
        result.push(component);
    }

    if level == 0 || traversal.is_recursive() {
        for entry in child_arrays(node) {
            let (key, items) = entry?;
            for item in items {
                let Some(child) = unwrap_snapshot(item)? else {
                    debug!(key, "skipping entry without a snapshot");
                    continue;
                };
                result.extend(visit(traversal, level + 1, key, &path, child)?);
            }
        }
    }

    result.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.name.cmp(&b.name)));
    Ok(result)
}
