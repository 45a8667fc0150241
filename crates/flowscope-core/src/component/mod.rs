//! Flow components and their classification.
//!
//! A [`Component`] is built once per node of a status snapshot. It keeps a
//! borrowed view on the raw attribute map so callers can read fields beyond
//! the classified subset (run status, queued counts, ...).

mod kind;

pub use kind::*;

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// Name used when a node carries no `name` attribute.
pub const MISSING_NAME: &str = "?";

/// Name used when a node's `name` attribute is not a string.
pub const INVALID_NAME: &str = "??";

/// An identified component of a flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Component<'a> {
    pub id: String,
    pub name: String,
    pub path: String,
    #[serde(skip)]
    pub kind: ComponentKind,
    #[serde(rename = "type")]
    pub kind_label: &'static str,
    #[serde(skip)]
    pub attributes: &'a Map<String, Value>,
}

impl<'a> Component<'a> {
    /// Classify a node from its lower-case kind tag and attributes.
    ///
    /// Never fails: a missing or non-string `id` becomes empty, and a bad
    /// `name` becomes [`MISSING_NAME`] or [`INVALID_NAME`].
    pub fn classify(tag: &str, path: impl Into<String>, attributes: &'a Map<String, Value>) -> Self {
        let id = attributes
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let name = match attributes.get("name") {
            None => MISSING_NAME.to_string(),
            Some(Value::String(name)) => name.clone(),
            Some(_) => INVALID_NAME.to_string(),
        };

        let kind = ComponentKind::from_tag(tag);

        Self {
            id,
            name,
            path: path.into(),
            kind,
            kind_label: kind.title(),
            attributes,
        }
    }

    /// Look up a raw attribute by key.
    pub fn attribute(&self, key: &str) -> Option<&'a Value> {
        self.attributes.get(key)
    }

    /// Look up a string attribute by key.
    pub fn str_attribute(&self, key: &str) -> Option<&'a str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    /// Full location of this component: its path followed by its name.
    pub fn full_path(&self) -> String {
        format!("{}/{}", self.path, self.name)
    }
}

impl fmt::Display for Component<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "({})", self.kind_label)
        } else {
            write!(f, "{} ({})", self.name, self.kind_label)
        }
    }
}
