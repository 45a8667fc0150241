//! Walking NiFi process-group status snapshots.
//!
//! A status response nests components in arrays named after their kind:
//!
//! ```text
//! processGroupStatus.aggregateSnapshot      # the requested group
//!   processorStatusSnapshots: [             # one array per child kind
//!     { "id": ..., "processorStatusSnapshot": { "id", "name", ... } }
//!   ]
//!   processGroupStatusSnapshots: [
//!     { "id": ..., "processGroupStatusSnapshot": { ...same shape... } }
//!   ]
//! ```
//!
//! [`flatten`] turns a snapshot into a sorted list of components;
//! [`crate::tree::build_tree`] turns it into an ownership tree. Both descend
//! the same way and accept components through the same [`Traversal`].

mod error;
mod flatten;
mod snapshot;

pub use error::TraversalError;
pub use flatten::flatten;
pub use snapshot::unwrap_snapshot;

use serde_json::{Map, Value};

use crate::component::{Component, KindSet};
use crate::config::{TraversalConfig, DEFAULT_MAX_DEPTH};

/// Suffix of keys holding an array of child snapshots.
pub const SNAPSHOTS_SUFFIX: &str = "StatusSnapshots";

/// Suffix of the key holding a single snapshot inside an array element.
pub const SNAPSHOT_SUFFIX: &str = "StatusSnapshot";

/// Key under which a process group lists its child groups. Also the synthetic
/// key the walk starts from.
pub const PROCESS_GROUPS_KEY: &str = "processGroupStatusSnapshots";

/// Predicate applied to components that already passed the kind filter.
/// It may borrow anything that outlives the traversal.
pub type ComponentFilter<'f> = dyn Fn(&Component<'_>) -> bool + Send + Sync + 'f;

/// Settings shared by both traversal shapes.
#[derive(Clone, Copy)]
pub struct Traversal<'f> {
    root_id: Option<&'f str>,
    kinds: KindSet,
    recursive: bool,
    filter: Option<&'f ComponentFilter<'f>>,
    max_depth: usize,
}

impl<'f> Traversal<'f> {
    /// A recursive traversal accepting every kind except connections.
    pub fn new() -> Self {
        Self {
            root_id: None,
            kinds: KindSet::default(),
            recursive: true,
            filter: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Build a traversal from configuration.
    pub fn from_config(config: &TraversalConfig) -> Result<Self, String> {
        Ok(Self::new()
            .with_kinds(config.kind_set()?)
            .with_recursive(config.recursive)
            .with_max_depth(config.max_depth))
    }

    /// Id of the flow's root process group. A top-level node with another id
    /// gets a `.` spliced in front of its descendants' paths.
    pub fn with_root_id(mut self, root_id: &'f str) -> Self {
        self.root_id = Some(root_id);
        self
    }

    pub fn with_kinds(mut self, kinds: impl Into<KindSet>) -> Self {
        self.kinds = kinds.into();
        self
    }

    /// When false, only the requested group and its direct children are
    /// visited. Ownership trees ignore this and always walk fully.
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_filter(mut self, filter: &'f ComponentFilter<'f>) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Maximum nesting depth before the snapshot is rejected as malformed.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn root_id(&self) -> Option<&'f str> {
        self.root_id
    }

    pub fn kinds(&self) -> KindSet {
        self.kinds
    }

    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Whether a classified component belongs in the output.
    pub fn accepts(&self, component: &Component<'_>) -> bool {
        self.kinds.includes(component.kind) && self.filter.map_or(true, |filter| filter(component))
    }

    pub(crate) fn check_depth(&self, level: usize) -> Result<(), TraversalError> {
        if level > self.max_depth {
            return Err(TraversalError::invalid_format(format!(
                "snapshot nesting exceeds {} levels",
                self.max_depth
            )));
        }
        Ok(())
    }
}

impl Default for Traversal<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Traversal<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Traversal")
            .field("root_id", &self.root_id)
            .field("kinds", &self.kinds)
            .field("recursive", &self.recursive)
            .field("filter", &self.filter.is_some())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

/// Extract `processGroupStatus.aggregateSnapshot` from a status response.
pub fn aggregate_snapshot(response: &Value) -> Result<&Map<String, Value>, TraversalError> {
    let status = response
        .get("processGroupStatus")
        .ok_or_else(|| TraversalError::invalid_format("missing 'processGroupStatus'"))?
        .as_object()
        .ok_or_else(|| TraversalError::invalid_format("'processGroupStatus' must be an object"))?;

    status
        .get("aggregateSnapshot")
        .ok_or_else(|| TraversalError::invalid_format("missing 'aggregateSnapshot'"))?
        .as_object()
        .ok_or_else(|| TraversalError::invalid_format("'aggregateSnapshot' must be an object"))
}

/// Lower-case kind tag for a `*StatusSnapshots` key.
pub(crate) fn kind_tag(raw_key: &str) -> String {
    raw_key
        .strip_suffix(SNAPSHOTS_SUFFIX)
        .unwrap_or(raw_key)
        .to_lowercase()
}

/// The child snapshot arrays of a node, with their keys.
pub(crate) fn child_arrays<'a>(
    node: &'a Map<String, Value>,
) -> impl Iterator<Item = Result<(&'a str, &'a Vec<Value>), TraversalError>> + 'a {
    node.iter()
        .filter(|(key, _)| key.ends_with(SNAPSHOTS_SUFFIX))
        .map(|(key, value)| {
            value
                .as_array()
                .map(|items| (key.as_str(), items))
                .ok_or_else(|| {
                    TraversalError::invalid_format(format!(
                        "'{}' must be an array, found {}",
                        key,
                        snapshot::type_name(value)
                    ))
                })
        })
}
