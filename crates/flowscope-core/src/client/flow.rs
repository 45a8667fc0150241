use serde_json::{json, Map, Value};
use tracing::{debug, info};

use super::{ApiError, NifiApi, RunState};
use crate::component::Component;
use crate::traversal::{self, Traversal, TraversalError};
use crate::tree::{self, OwnershipTree};

/// The flow's top-level process group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootGroup {
    pub id: String,
    pub name: String,
}

impl RootGroup {
    /// Parse a `/process-groups/root` response.
    pub fn from_response(body: &str) -> Result<Self, ApiError> {
        let value: Value = serde_json::from_str(body)?;
        let component = value
            .get("component")
            .and_then(Value::as_object)
            .ok_or_else(|| ApiError::MissingField("component".to_string()))?;

        let field = |key: &str| {
            component
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| ApiError::MissingField(format!("component.{}", key)))
        };

        Ok(Self {
            id: field("id")?,
            name: field("name")?,
        })
    }
}

/// A decoded `/flow/process-groups/{id}/status` response.
///
/// Components produced from a document borrow its attribute maps, so the
/// document must outlive any listing or tree built from it.
#[derive(Debug, Clone)]
pub struct StatusDocument {
    id: String,
    body: Value,
}

impl StatusDocument {
    pub fn new(id: impl Into<String>, body: Value) -> Self {
        Self {
            id: id.into(),
            body,
        }
    }

    /// Decode a raw response body.
    pub fn from_json(id: impl Into<String>, text: &str) -> Result<Self, ApiError> {
        Ok(Self::new(id, serde_json::from_str(text)?))
    }

    /// The process group id this status was requested for.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn aggregate_snapshot(&self) -> Result<&Map<String, Value>, TraversalError> {
        traversal::aggregate_snapshot(&self.body)
    }

    pub fn flatten(&self, traversal: &Traversal<'_>) -> Result<Vec<Component<'_>>, TraversalError> {
        traversal::flatten(self.aggregate_snapshot()?, traversal)
    }

    pub fn tree(&self, traversal: &Traversal<'_>) -> Result<OwnershipTree<'_>, TraversalError> {
        tree::build_tree(self.aggregate_snapshot()?, traversal)
    }
}

/// Flatten several documents, keeping the order they were requested in.
pub fn flatten_all<'a>(
    documents: &'a [StatusDocument],
    traversal: &Traversal<'_>,
) -> Result<Vec<Component<'a>>, TraversalError> {
    let mut result = Vec::new();
    for document in documents {
        result.extend(document.flatten(traversal)?);
    }
    Ok(result)
}

/// Build one tree per document and merge them. Later documents win on
/// colliding top-level components.
pub fn tree_all<'a>(
    documents: &'a [StatusDocument],
    traversal: &Traversal<'_>,
) -> Result<OwnershipTree<'a>, TraversalError> {
    let mut result = OwnershipTree::new();
    for document in documents {
        result.merge(document.tree(traversal)?);
    }
    Ok(result)
}

/// Status operations against one NiFi flow.
pub struct Flow<A> {
    api: A,
    root: RootGroup,
}

impl<A: NifiApi> Flow<A> {
    /// Connect to a flow, resolving its root process group.
    pub async fn connect(api: A) -> Result<Self, ApiError> {
        let body = api.get("/process-groups/root", &[]).await?;
        let root = RootGroup::from_response(&body)?;
        info!(id = %root.id, name = %root.name, "connected to flow");
        Ok(Self { api, root })
    }

    /// Use an already known root group.
    pub fn with_root(api: A, root: RootGroup) -> Self {
        Self { api, root }
    }

    pub fn root(&self) -> &RootGroup {
        &self.root
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// A default traversal that knows this flow's root id.
    pub fn traversal(&self) -> Traversal<'_> {
        Traversal::new().with_root_id(&self.root.id)
    }

    /// Fetch the status of one process group.
    pub async fn status(&self, id: &str, recursive: bool) -> Result<StatusDocument, ApiError> {
        let path = format!("/flow/process-groups/{}/status", id);
        let recursive = if recursive { "true" } else { "false" };
        let body = self.api.get(&path, &[("recursive", recursive)]).await?;
        debug!(id, bytes = body.len(), "fetched status");
        StatusDocument::from_json(id, &body)
    }

    /// Fetch the status of several process groups, one after another.
    pub async fn statuses<S: AsRef<str>>(
        &self,
        ids: &[S],
        recursive: bool,
    ) -> Result<Vec<StatusDocument>, ApiError> {
        let mut documents = Vec::with_capacity(ids.len());
        for id in ids {
            documents.push(self.status(id.as_ref(), recursive).await?);
        }
        Ok(documents)
    }

    /// Fetch a process group's entity: revision, component and counts.
    pub async fn info(&self, id: &str) -> Result<Value, ApiError> {
        let path = format!("/process-groups/{}", id);
        let body = self.api.get(&path, &[]).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Start or stop every component of a process group. Returns the state
    /// reported back by the server.
    pub async fn set_state(&self, id: &str, state: RunState) -> Result<String, ApiError> {
        let body = json!({
            "id": id,
            "state": state.as_str(),
            "disconnectedNodeAcknowledged": false,
        });

        let path = format!("/flow/process-groups/{}", id);
        let response = self.api.put(&path, &body).await?;
        let value: Value = serde_json::from_str(&response)?;

        let reported = value
            .get("state")
            .and_then(Value::as_str)
            .ok_or_else(|| ApiError::MissingField("state".to_string()))?;
        info!(id, state = reported, "changed run state");
        Ok(reported.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_from_response() {
        let body = r#"{"id": "r", "component": {"id": "r", "name": "NiFi Flow"}}"#;
        let root = RootGroup::from_response(body).unwrap();
        assert_eq!(root.id, "r");
        assert_eq!(root.name, "NiFi Flow");
    }

    #[test]
    fn test_root_missing_fields() {
        assert!(matches!(
            RootGroup::from_response(r#"{"id": "r"}"#),
            Err(ApiError::MissingField(_))
        ));
        assert!(matches!(
            RootGroup::from_response(r#"{"component": {"id": "r"}}"#),
            Err(ApiError::MissingField(field)) if field == "component.name"
        ));
        assert!(matches!(
            RootGroup::from_response("not json"),
            Err(ApiError::Parse(_))
        ));
    }

    #[test]
    fn test_document_without_envelope() {
        let document = StatusDocument::new("g", json!({"unexpected": true}));
        assert!(document.flatten(&Traversal::new()).is_err());
    }
}
