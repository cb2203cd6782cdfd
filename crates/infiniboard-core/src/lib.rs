//! Infiniboard Core Library
//!
//! Platform-agnostic scene model and editing engine for the Infiniboard
//! infinite-canvas whiteboard.

pub mod camera;
pub mod canvas;
pub mod clipboard;
pub mod constants;
pub mod elements;
pub mod geometry;
pub mod history;
pub mod input;
pub mod interaction;
pub mod media;
pub mod remote;
pub mod selection;
pub mod snap;
pub mod storage;
pub mod text_entry;
pub mod tools;

pub use camera::{Viewport, ViewportPatch};
pub use canvas::{Canvas, CanvasData};
pub use clipboard::Clipboard;
pub use elements::{Element, ElementId, ElementKind, ElementPatch};
pub use geometry::{Bounds, SceneGeometry, hit_test};
pub use history::{History, HistoryEntry};
pub use input::{InputEvent, KeyEvent, Modifiers, MouseButton, PointerEvent, TextEntryEvent};
pub use interaction::{InteractionEngine, InteractionState};
pub use media::MediaError;
pub use remote::{DocumentSummary, LoadResponse, MemoryRemote, RemoteError, RemoteStore, SaveRequest, WebhookClient};
pub use selection::ResizeHandle;
pub use snap::{GridSettings, GridSettingsPatch, snap_to_grid};
pub use storage::{AutoSaveManager, FileStorage, MemoryStorage, SessionSnapshot, Storage, StorageError};
pub use tools::{ToolKind, ToolSettings};
