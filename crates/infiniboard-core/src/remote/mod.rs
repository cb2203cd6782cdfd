//! Remote document store contract (save / load / list).
//!
//! Every exchange hands off a whole snapshot; a failed call leaves the
//! in-memory scene untouched.

mod webhook;

pub use webhook::{WebhookAction, WebhookClient, WebhookEnvelope};

use crate::camera::Viewport;
use crate::canvas::{Canvas, CanvasData};
use crate::elements::Element;
use crate::history::now_millis;
use crate::storage::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::RwLock;
use thiserror::Error;

/// Errors from the remote store.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("a drawing name is required")]
    MissingName,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("remote returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Protocol(String),
    #[error("{0}")]
    Rejected(String),
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Payload of a save call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRequest {
    pub name: String,
    pub elements: Vec<Element>,
    pub viewport: Viewport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// A stored drawing as returned by load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadResponse {
    pub elements: Vec<Element>,
    #[serde(default)]
    pub viewport: Option<Viewport>,
}

impl From<LoadResponse> for CanvasData {
    fn from(response: LoadResponse) -> Self {
        CanvasData {
            elements: response.elements,
            viewport: response.viewport,
        }
    }
}

/// One entry of the list call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub element_count: usize,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// A remote collaborator storing whole documents.
pub trait RemoteStore: Send + Sync {
    /// Store a document; the result is opaque to the caller.
    fn save(&self, request: &SaveRequest) -> BoxFuture<'_, RemoteResult<Value>>;

    fn load(&self, id: &str) -> BoxFuture<'_, RemoteResult<LoadResponse>>;

    fn list(&self) -> BoxFuture<'_, RemoteResult<Vec<DocumentSummary>>>;
}

impl Canvas {
    /// Build the save payload for the current scene. The name is trimmed
    /// and must not be blank.
    pub fn save_request(&self, name: &str, thumbnail: Option<String>) -> RemoteResult<SaveRequest> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RemoteError::MissingName);
        }
        let data = self.get_canvas_data();
        Ok(SaveRequest {
            name: name.to_string(),
            elements: data.elements,
            viewport: self.viewport,
            thumbnail,
        })
    }
}

/// Fetch document `id` and install it wholesale. The scene is replaced
/// only when the fetch succeeds.
pub async fn load_into(canvas: &mut Canvas, store: &dyn RemoteStore, id: &str) -> RemoteResult<()> {
    let response = store.load(id).await?;
    canvas.load_canvas_data(response.into());
    Ok(())
}

#[derive(Debug, Clone)]
struct StoredDocument {
    summary: DocumentSummary,
    data: LoadResponse,
}

/// In-process store, used offline and in tests.
#[derive(Debug, Default)]
pub struct MemoryRemote {
    documents: RwLock<BTreeMap<String, StoredDocument>>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> RemoteError {
    RemoteError::Protocol(format!("lock error: {e}"))
}

impl RemoteStore for MemoryRemote {
    fn save(&self, request: &SaveRequest) -> BoxFuture<'_, RemoteResult<Value>> {
        let request = request.clone();
        Box::pin(async move {
            let mut docs = self.documents.write().map_err(lock_error)?;
            let id = format!("drawing-{}", docs.len() + 1);
            let now = now_millis().to_string();
            let summary = DocumentSummary {
                id: id.clone(),
                name: request.name,
                thumbnail: request.thumbnail,
                element_count: request.elements.len(),
                created_at: now.clone(),
                updated_at: now,
            };
            let data = LoadResponse {
                elements: request.elements,
                viewport: Some(request.viewport),
            };
            docs.insert(id.clone(), StoredDocument { summary, data });
            Ok(serde_json::json!({ "id": id }))
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, RemoteResult<LoadResponse>> {
        let id = id.to_string();
        Box::pin(async move {
            let docs = self.documents.read().map_err(lock_error)?;
            docs.get(&id)
                .map(|doc| doc.data.clone())
                .ok_or_else(|| RemoteError::Rejected(format!("drawing {id} not found")))
        })
    }

    fn list(&self) -> BoxFuture<'_, RemoteResult<Vec<DocumentSummary>>> {
        Box::pin(async move {
            let docs = self.documents.read().map_err(lock_error)?;
            Ok(docs.values().map(|doc| doc.summary.clone()).collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ElementKind, Shape, ShapeType};
    use crate::storage::block_on;
    use kurbo::Point;

    fn canvas_with_rect() -> Canvas {
        let mut canvas = Canvas::new();
        canvas.add_element(Element::new(
            Point::new(10.0, 10.0),
            "#000000",
            2.0,
            ElementKind::Shape(Shape::new(ShapeType::Rectangle, 50.0, 50.0)),
        ));
        canvas
    }

    #[test]
    fn test_save_request_requires_name() {
        let canvas = canvas_with_rect();
        assert!(matches!(canvas.save_request("   ", None), Err(RemoteError::MissingName)));
        let request = canvas.save_request("  Plan ", Some("data:x".into())).unwrap();
        assert_eq!(request.name, "Plan");
        assert_eq!(request.elements.len(), 1);
    }

    #[test]
    fn test_memory_remote_round_trip() {
        let remote = MemoryRemote::new();
        let mut canvas = canvas_with_rect();
        canvas.viewport.zoom = 2.0;
        let request = canvas.save_request("Plan", None).unwrap();
        let result = block_on(remote.save(&request)).unwrap();
        let id = result["id"].as_str().unwrap().to_string();

        let list = block_on(remote.list()).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "Plan");
        assert_eq!(list[0].element_count, 1);

        let mut other = Canvas::new();
        other.add_element(canvas.elements()[0].clone());
        other.select_all();
        block_on(load_into(&mut other, &remote, &id)).unwrap();
        assert_eq!(other.elements(), canvas.elements());
        assert!((other.viewport.zoom - 2.0).abs() < f64::EPSILON);
        assert!(other.selection().is_empty());
        assert!(!other.can_undo());
    }

    #[test]
    fn test_failed_load_leaves_scene_untouched() {
        let remote = MemoryRemote::new();
        let mut canvas = canvas_with_rect();
        let before = canvas.elements().to_vec();
        assert!(block_on(load_into(&mut canvas, &remote, "missing")).is_err());
        assert_eq!(canvas.elements(), before.as_slice());
        assert!(canvas.can_undo());
    }

    #[test]
    fn test_summary_wire_names() {
        let json = r#"{"id":"1","name":"a","thumbnail":null,"elementCount":3,"createdAt":"2024-01-01","updatedAt":"2024-01-02"}"#;
        let summary: DocumentSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.element_count, 3);
        assert_eq!(summary.updated_at, "2024-01-02");
    }
}
