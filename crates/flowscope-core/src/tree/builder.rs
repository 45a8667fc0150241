use serde_json::{Map, Value};
use tracing::{debug, trace};

use super::OwnershipTree;
use crate::component::Component;
use crate::traversal::{
    child_arrays, kind_tag, unwrap_snapshot, Traversal, TraversalError, PROCESS_GROUPS_KEY,
};

/// Build the ownership tree of an aggregate snapshot.
///
/// Always walks the whole snapshot; the traversal's `recursive` flag is not
/// consulted. Components of a rejected node are attached to its nearest
/// accepted ancestor, so the tree holds the same components a flat listing
/// with the same kinds would.
pub fn build_tree<'a>(
    snapshot: &'a Map<String, Value>,
    traversal: &Traversal<'_>,
) -> Result<OwnershipTree<'a>, TraversalError> {
    let mut tree = OwnershipTree::new();
    visit(traversal, 0, PROCESS_GROUPS_KEY, &mut tree, snapshot)?;
    debug!(count = tree.count(), "built ownership tree");
    Ok(tree)
}

fn visit<'a>(
    traversal: &Traversal<'_>,
    level: usize,
    raw_key: &str,
    parent: &mut OwnershipTree<'a>,
    node: &'a Map<String, Value>,
) -> Result<(), TraversalError> {
    traversal.check_depth(level)?;

    if node.is_empty() {
        return Ok(());
    }

    let component = Component::classify(&kind_tag(raw_key), "", node);
    trace!(level, id = %component.id, kind = %component.kind, "visit");

    let owner = if traversal.accepts(&component) {
        parent.insert(component)
    } else {
        parent
    };

    for entry in child_arrays(node) {
        let (key, items) = entry?;
        for item in items {
            let Some(child) = unwrap_snapshot(item)? else {
                debug!(key, "skipping entry without a snapshot");
                continue;
            };
            visit(traversal, level + 1, key, owner, child)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::KindSet;
    use serde_json::json;

    fn snapshot() -> Value {
        json!({
            "id": "root",
            "name": "NiFi Flow",
            "processorStatusSnapshots": [
                {"processorStatusSnapshot": {"id": "p1", "name": "Fetch"}}
            ],
            "processGroupStatusSnapshots": [
                {
                    "processGroupStatusSnapshot": {
                        "id": "g1",
                        "name": "Ingest",
                        "processorStatusSnapshots": [
                            {"processorStatusSnapshot": {"id": "p2", "name": "Parse"}}
                        ]
                    }
                }
            ]
        })
    }

    #[test]
    fn test_nesting() {
        let value = snapshot();
        let tree = build_tree(value.as_object().unwrap(), &Traversal::new()).unwrap();

        assert_eq!(tree.len(), 1);
        let root = tree.find("root").unwrap();
        assert_eq!(root.children.len(), 2);
        let group = root.children.find("g1").unwrap();
        assert!(group.children.find("p2").is_some());
    }

    #[test]
    fn test_rejected_owner_hoists_children() {
        let value = snapshot();
        let traversal = Traversal::new().with_kinds(KindSet::PROCESSOR);
        let tree = build_tree(value.as_object().unwrap(), &traversal).unwrap();

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.count(), 2);
        assert!(tree.find("p1").is_some());
        assert!(tree.find("p2").is_some());
    }

    #[test]
    fn test_ignores_recursive_flag() {
        let value = snapshot();
        let traversal = Traversal::new().with_recursive(false);
        let tree = build_tree(value.as_object().unwrap(), &traversal).unwrap();
        assert!(tree.find("p2").is_some());
    }

    #[test]
    fn test_error_aborts() {
        let value = json!({
            "id": "root",
            "processGroupStatusSnapshots": [
                {"processGroupStatusSnapshot": {"id": "g", "processorStatusSnapshots": 3}}
            ]
        });
        let err = build_tree(value.as_object().unwrap(), &Traversal::new()).unwrap_err();
        assert!(matches!(err, TraversalError::InvalidFormat(_)));
    }
}
