//! Local session persistence.

mod autosave;
mod file;
mod memory;

pub use autosave::{AutoSaveManager, DEFAULT_AUTOSAVE_INTERVAL_SECS, LAST_SESSION_KEY, create_autosave_manager};
pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::camera::Viewport;
use crate::canvas::{Canvas, CanvasData};
use crate::elements::Element;
use crate::snap::{GridSettings, GridSettingsPatch};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Session not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What survives a reload: the scene, the view and the drawing style.
///
/// History and clipboard are deliberately absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub elements: Vec<Element>,
    #[serde(default)]
    pub viewport: Viewport,
    pub active_color: String,
    pub stroke_width: f64,
    pub font_size: f64,
    #[serde(default)]
    pub grid_settings: GridSettings,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Canvas {
    pub fn session_snapshot(&self) -> SessionSnapshot {
        let tools = self.tools();
        SessionSnapshot {
            elements: self.elements().to_vec(),
            viewport: self.viewport,
            active_color: tools.color.clone(),
            stroke_width: tools.stroke_width,
            font_size: tools.font_size,
            grid_settings: *self.grid(),
        }
    }

    /// Install a stored session. History restarts from the restored scene.
    pub fn restore_session(&mut self, snapshot: SessionSnapshot) {
        self.load_canvas_data(CanvasData {
            elements: snapshot.elements,
            viewport: Some(snapshot.viewport),
        });
        self.set_active_color(snapshot.active_color);
        self.set_stroke_width(snapshot.stroke_width);
        self.set_font_size(snapshot.font_size);
        let grid = snapshot.grid_settings;
        self.set_grid_settings(GridSettingsPatch {
            enabled: Some(grid.enabled),
            size: Some(grid.size),
            snap: Some(grid.snap),
        });
    }
}

/// Trait for session storage backends.
pub trait Storage: Send + Sync {
    fn save(&self, id: &str, session: &SessionSnapshot) -> BoxFuture<'_, StorageResult<()>>;

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<SessionSnapshot>>;

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all stored session ids.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Minimal executor for driving storage futures in tests.
#[cfg(test)]
pub(crate) fn block_on<F: Future>(f: F) -> F::Output {
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            dummy_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);

    loop {
        if let Poll::Ready(result) = f.as_mut().poll(&mut cx) {
            return result;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ElementKind, Shape, ShapeType};
    use kurbo::Point;

    #[test]
    fn test_snapshot_round_trips_session_state() {
        let mut canvas = Canvas::new();
        canvas.add_element(Element::new(
            Point::new(1.0, 2.0),
            "#ff0000",
            3.0,
            ElementKind::Shape(Shape::new(ShapeType::Star, 40.0, 40.0)),
        ));
        canvas.set_active_color("#00ff00");
        canvas.set_stroke_width(5.0);
        canvas.set_font_size(24.0);
        canvas.set_grid_settings(GridSettingsPatch {
            snap: Some(true),
            size: Some(20.0),
            ..Default::default()
        });
        canvas.viewport.x = 30.0;

        let json = canvas.session_snapshot().to_json().unwrap();
        let snapshot = SessionSnapshot::from_json(&json).unwrap();

        let mut restored = Canvas::new();
        restored.restore_session(snapshot);
        assert_eq!(restored.elements(), canvas.elements());
        assert_eq!(restored.tools().color, "#00ff00");
        assert!((restored.tools().stroke_width - 5.0).abs() < f64::EPSILON);
        assert!((restored.tools().font_size - 24.0).abs() < f64::EPSILON);
        assert_eq!(*restored.grid(), *canvas.grid());
        assert!((restored.viewport.x - 30.0).abs() < f64::EPSILON);
        assert!(!restored.can_undo());
    }

    #[test]
    fn test_snapshot_field_names() {
        let json = serde_json::to_value(Canvas::new().session_snapshot()).unwrap();
        assert!(json.get("activeColor").is_some());
        assert!(json.get("gridSettings").is_some());
        assert!(json.get("history").is_none());
    }
}
