use std::collections::BTreeSet;

use flowscope_core::{
    build_tree, flatten, unwrap_snapshot, Component, ComponentKind, KindSet, Traversal,
    TraversalError,
};
use serde_json::{json, Map, Value};

fn entry(kind: &str, snapshot: Value) -> Value {
    let mut element = Map::new();
    if let Some(id) = snapshot.get("id") {
        element.insert("id".to_string(), id.clone());
    }
    element.insert(format!("{}StatusSnapshot", kind), snapshot);
    Value::Object(element)
}

/// Three levels deep: root -> Ingest -> Enrich, with leaves at every level.
fn three_levels() -> Value {
    json!({
        "id": "root",
        "name": "NiFi Flow",
        "processorStatusSnapshots": [
            entry("processor", json!({"id": "p0", "name": "ListFiles"}))
        ],
        "connectionStatusSnapshots": [
            entry("connection", json!({"id": "c0", "name": "success"}))
        ],
        "processGroupStatusSnapshots": [
            entry("processGroup", json!({
                "id": "g1",
                "name": "Ingest",
                "inputPortStatusSnapshots": [
                    entry("inputPort", json!({"id": "in1", "name": "from-root"}))
                ],
                "outputPortStatusSnapshots": [
                    entry("outputPort", json!({"id": "out1", "name": "to-root"}))
                ],
                "processorStatusSnapshots": [
                    entry("processor", json!({"id": "p1", "name": "FetchFile"}))
                ],
                "processGroupStatusSnapshots": [
                    entry("processGroup", json!({
                        "id": "g2",
                        "name": "Enrich",
                        "processorStatusSnapshots": [
                            entry("processor", json!({"id": "p2", "name": "LookupRecord"}))
                        ],
                        "remoteProcessGroupStatusSnapshots": [
                            entry("remoteProcessGroup", json!({"id": "rpg", "name": "Remote"}))
                        ]
                    }))
                ]
            }))
        ]
    })
}

fn ids(components: &[Component<'_>]) -> BTreeSet<String> {
    components.iter().map(|c| c.id.clone()).collect()
}

#[test]
fn test_process_groups_only() {
    let value = json!({
        "id": "root",
        "name": "root",
        "processGroupStatusSnapshots": [
            entry("processGroup", json!({"id": "a", "name": "A", "processGroupStatusSnapshots": [
                entry("processGroup", json!({"id": "b", "name": "B"}))
            ]})),
            entry("processGroup", json!({"id": "c", "name": "C"}))
        ]
    });

    let traversal = Traversal::new().with_kinds(KindSet::ALL_KINDS);
    let list = flatten(value.as_object().unwrap(), &traversal).unwrap();

    assert_eq!(list.len(), 4);
    assert!(list.iter().all(|c| c.kind == ComponentKind::ProcessGroup));
}

#[test]
fn test_kind_filter() {
    let value = three_levels();
    let snapshot = value.as_object().unwrap();

    let masks = [
        KindSet::PROCESSOR,
        KindSet::PROCESS_GROUP | KindSet::INPUT_PORT,
        KindSet::CONNECTION,
        KindSet::ALL_EXCEPT_CONNECTIONS,
        KindSet::REMOTE_PROCESS_GROUP | KindSet::OUTPUT_PORT,
    ];
    for mask in masks {
        let list = flatten(snapshot, &Traversal::new().with_kinds(mask)).unwrap();
        assert!(!list.is_empty());
        assert!(list.iter().all(|c| mask.includes(c.kind)));
    }

    let processors = flatten(snapshot, &Traversal::new().with_kinds(KindSet::PROCESSOR)).unwrap();
    let expected: BTreeSet<String> = ["p0", "p1", "p2"].iter().map(|s| s.to_string()).collect();
    assert_eq!(ids(&processors), expected);
}

#[test]
fn test_predicate() {
    let value = three_levels();
    let snapshot = value.as_object().unwrap();

    let starts_with_f = |c: &Component<'_>| c.name.starts_with('F');
    let traversal = Traversal::new()
        .with_kinds(KindSet::ALL_KINDS)
        .with_filter(&starts_with_f);

    let list = flatten(snapshot, &traversal).unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, "p1");
}

#[test]
fn test_non_recursive_stops_after_first_level() {
    let value = three_levels();
    let traversal = Traversal::new()
        .with_kinds(KindSet::ALL_KINDS)
        .with_recursive(false);

    let list = flatten(value.as_object().unwrap(), &traversal).unwrap();
    let expected: BTreeSet<String> = ["root", "p0", "c0", "g1"].iter().map(|s| s.to_string()).collect();
    assert_eq!(ids(&list), expected);
}

#[test]
fn test_recursive_reaches_every_level() {
    let value = three_levels();
    let traversal = Traversal::new().with_kinds(KindSet::ALL_KINDS);
    let list = flatten(value.as_object().unwrap(), &traversal).unwrap();
    assert_eq!(list.len(), 10);
}

#[test]
fn test_paths_follow_nesting() {
    let value = three_levels();
    let traversal = Traversal::new().with_root_id("root");
    let list = flatten(value.as_object().unwrap(), &traversal).unwrap();

    let find = |id: &str| list.iter().find(|c| c.id == id).unwrap();
    assert_eq!(find("p2").path, "/NiFi Flow/Ingest/Enrich");
    assert_eq!(find("p2").full_path(), "/NiFi Flow/Ingest/Enrich/LookupRecord");
    assert_eq!(find("g1").path, "/NiFi Flow");
}

#[test]
fn test_tree_and_flat_agree() {
    let value = three_levels();
    let snapshot = value.as_object().unwrap();

    for mask in [KindSet::ALL_KINDS, KindSet::ALL_EXCEPT_CONNECTIONS, KindSet::PROCESSOR] {
        let traversal = Traversal::new().with_kinds(mask);
        let list = flatten(snapshot, &traversal).unwrap();
        let tree = build_tree(snapshot, &traversal).unwrap();
        assert_eq!(tree.ids(), ids(&list));
        assert_eq!(tree.count(), list.len());
    }
}

#[test]
fn test_output_is_deterministic() {
    let value = three_levels();
    let snapshot = value.as_object().unwrap();
    let traversal = Traversal::new().with_kinds(KindSet::ALL_KINDS);

    let first: Vec<_> = flatten(snapshot, &traversal).unwrap().iter().map(|c| c.id.clone()).collect();
    let second: Vec<_> = flatten(snapshot, &traversal).unwrap().iter().map(|c| c.id.clone()).collect();
    assert_eq!(first, second);

    let a = build_tree(snapshot, &traversal).unwrap().render();
    let b = build_tree(snapshot, &traversal).unwrap().render();
    assert_eq!(a, b);
}

#[test]
fn test_unwrap_snapshot() {
    let element = json!({"processorStatusSnapshot": {"id": "x"}});
    let inner = unwrap_snapshot(&element).unwrap().unwrap();
    assert_eq!(inner.get("id"), Some(&json!("x")));

    assert!(unwrap_snapshot(&json!({"id": "x"})).unwrap().is_none());

    assert!(matches!(
        unwrap_snapshot(&json!([{"processorStatusSnapshot": {}}])),
        Err(TraversalError::InvalidFormat(_))
    ));
}

#[test]
fn test_malformed_nested_array_aborts() {
    let value = json!({
        "id": "root",
        "name": "root",
        "processGroupStatusSnapshots": [
            entry("processGroup", json!({"id": "g", "name": "g", "processorStatusSnapshots": "oops"}))
        ]
    });
    let result = flatten(value.as_object().unwrap(), &Traversal::new());
    assert!(matches!(result, Err(TraversalError::InvalidFormat(_))));
}

#[test]
fn test_predicate_borrows_wanted_ids() {
    let value = three_levels();
    let snapshot = value.as_object().unwrap();

    let wanted: BTreeSet<String> = ["p1", "g2"].iter().map(|s| s.to_string()).collect();
    let in_wanted = |c: &Component<'_>| wanted.contains(&c.id);
    let traversal = Traversal::new()
        .with_kinds(KindSet::ALL_KINDS)
        .with_filter(&in_wanted);

    let list = flatten(snapshot, &traversal).unwrap();
    assert_eq!(ids(&list), wanted);
    assert_eq!(build_tree(snapshot, &traversal).unwrap().ids(), wanted);
}

#[test]
fn test_duplicate_ids_keep_both_subtrees() {
    let value = json!({
        "id": "r",
        "name": "R",
        "processGroupStatusSnapshots": [
            entry("processGroup", json!({
                "id": "g",
                "name": "G",
                "processorStatusSnapshots": [
                    entry("processor", json!({"id": "p", "name": "P"}))
                ]
            })),
            entry("processGroup", json!({"id": "g", "name": "G2"}))
        ]
    });
    let snapshot = value.as_object().unwrap();
    let traversal = Traversal::new();

    let list = flatten(snapshot, &traversal).unwrap();
    let tree = build_tree(snapshot, &traversal).unwrap();
    assert_eq!(list.len(), 4);
    assert_eq!(tree.count(), 4);
    assert_eq!(
        tree.render(),
        vec!["R (Process Group)", "├─ G (Process Group)", "│ └─ P (Processor)", "└─ G2 (Process Group)"]
    );
}
