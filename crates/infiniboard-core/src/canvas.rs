//! The scene store: elements, selection, viewport and tool state for one
//! editing session.

use crate::camera::{Viewport, ViewportPatch, clamp_zoom};
use crate::clipboard::Clipboard;
use crate::constants::ZOOM_STEP;
use crate::elements::{ConnectorStyle, Element, ElementId, ElementPatch, FallbackMeasure, ShapeType, TextMeasure};
use crate::geometry::{Bounds, SceneGeometry};
use crate::history::History;
use crate::snap::{GridSettings, GridSettingsPatch};
use crate::tools::{ToolKind, ToolSettings};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Document payload exchanged with persistence collaborators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasData {
    pub elements: Vec<Element>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
}

/// Live editing session.
///
/// Mutations that create, change, delete or reorder elements are recorded
/// in [`History`]; selection, viewport, tool and lock changes are not.
pub struct Canvas {
    elements: Vec<Element>,
    selection: Vec<ElementId>,
    /// Current viewport transform.
    pub viewport: Viewport,
    /// On-screen size of the drawing surface in pixels.
    pub viewport_size: Size,
    tools: ToolSettings,
    grid: GridSettings,
    /// Element being drawn but not yet committed.
    current_element: Option<Element>,
    history: History,
    pub(crate) clipboard: Option<Clipboard>,
    text_measure: Box<dyn TextMeasure>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("elements", &self.elements.len())
            .field("selection", &self.selection)
            .field("viewport", &self.viewport)
            .field("tools", &self.tools)
            .field("history_index", &self.history.index())
            .finish()
    }
}

impl Canvas {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            selection: Vec::new(),
            viewport: Viewport::default(),
            viewport_size: Size::new(800.0, 600.0),
            tools: ToolSettings::default(),
            grid: GridSettings::default(),
            current_element: None,
            history: History::new(),
            clipboard: None,
            text_measure: Box::new(FallbackMeasure),
        }
    }

    /// Replace the text measurement used for bounds and hit-testing.
    pub fn set_text_measure(&mut self, measure: Box<dyn TextMeasure>) {
        self.text_measure = measure;
    }

    pub fn text_measure(&self) -> &dyn TextMeasure {
        self.text_measure.as_ref()
    }

    /// Geometry queries over the live collection.
    pub fn geometry(&self) -> SceneGeometry<'_> {
        SceneGeometry::new(&self.elements, self.text_measure.as_ref())
    }

    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport_size = Size::new(width, height);
    }

    // ---- Element access ----

    /// Elements in z-order (back to front).
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn get_element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|el| el.id == id)
    }

    pub(crate) fn get_element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|el| el.id == id)
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.elements.iter().position(|el| el.id == id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    // ---- Recorded mutations ----

    /// Append an element on top of the z-order.
    ///
    /// Rejected when an element with the same id already exists.
    pub fn add_element(&mut self, element: Element) -> bool {
        if self.index_of(&element.id).is_some() {
            log::warn!("rejecting element with duplicate id {}", element.id);
            return false;
        }
        log::debug!("add {} {}", element.type_name(), element.id);
        self.elements.push(element);
        self.push_history();
        true
    }

    /// Merge `patch` into an unlocked element.
    pub fn update_element(&mut self, id: &str, patch: &ElementPatch) -> bool {
        let Some(element) = self.get_element_mut(id) else {
            return false;
        };
        if element.locked {
            log::debug!("ignoring update of locked element {id}");
            return false;
        }
        element.apply_patch(patch);
        self.push_history();
        true
    }

    /// Remove an unlocked element and drop it from the selection.
    ///
    /// Connectors bound to the removed element keep their binding but
    /// have their stored endpoint moved to the last resolved position.
    pub fn delete_element(&mut self, id: &str) -> bool {
        if !self.remove_unrecorded(id) {
            return false;
        }
        self.push_history();
        true
    }

    /// Delete every selected unlocked element as one recorded change.
    pub fn delete_selected(&mut self) -> usize {
        let ids = self.selection.clone();
        let removed = ids.iter().filter(|id| self.remove_unrecorded(id)).count();
        if removed > 0 {
            self.push_history();
        }
        removed
    }

    fn remove_unrecorded(&mut self, id: &str) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        if self.elements[index].locked {
            log::debug!("ignoring delete of locked element {id}");
            return false;
        }

        let last_center = self.geometry().bounds_of(&self.elements[index]).center();
        let removed = self.elements.remove(index);
        for element in self.elements.iter_mut().filter(|el| !el.locked) {
            if let Some(c) = element.as_connector_mut() {
                if c.start_element_id.as_deref() == Some(id) {
                    c.start_point = last_center;
                }
                if c.end_element_id.as_deref() == Some(id) {
                    c.end_point = last_center;
                }
            }
        }
        self.selection.retain(|sel| sel != id);
        log::debug!("delete {} {}", removed.type_name(), removed.id);
        true
    }

    /// Move to the top of the z-order.
    pub fn bring_to_front(&mut self, id: &str) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        if index + 1 == self.elements.len() {
            return false;
        }
        let element = self.elements.remove(index);
        self.elements.push(element);
        self.push_history();
        true
    }

    /// Move to the bottom of the z-order.
    pub fn send_to_back(&mut self, id: &str) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        if index == 0 {
            return false;
        }
        let element = self.elements.remove(index);
        self.elements.insert(0, element);
        self.push_history();
        true
    }

    /// Swap with the element above.
    pub fn bring_forward(&mut self, id: &str) -> bool {
        match self.index_of(id) {
            Some(index) if index + 1 < self.elements.len() => {
                self.elements.swap(index, index + 1);
                self.push_history();
                true
            }
            _ => false,
        }
    }

    /// Swap with the element below.
    pub fn send_backward(&mut self, id: &str) -> bool {
        match self.index_of(id) {
            Some(index) if index > 0 => {
                self.elements.swap(index, index - 1);
                self.push_history();
                true
            }
            _ => false,
        }
    }

    /// Empty the collection and the selection.
    pub fn clear_canvas(&mut self) {
        self.elements.clear();
        self.selection.clear();
        self.current_element = None;
        self.push_history();
    }

    /// Replace the whole collection as one recorded change.
    pub fn set_elements(&mut self, elements: Vec<Element>) {
        self.elements = elements;
        self.selection.retain(|id| self.elements.iter().any(|el| &el.id == id));
        self.push_history();
    }

    // ---- Unrecorded mutations ----

    /// Flip the lock flag. Lock state is not undo-tracked.
    pub fn toggle_lock(&mut self, id: &str) -> bool {
        match self.get_element_mut(id) {
            Some(element) => {
                element.locked = !element.locked;
                log::debug!("element {id} locked = {}", element.locked);
                true
            }
            None => false,
        }
    }

    /// Toggle the lock flag of every selected element.
    pub fn toggle_lock_selected(&mut self) -> usize {
        let ids = self.selection.clone();
        ids.iter().filter(|id| self.toggle_lock(id)).count()
    }

    // ---- History ----

    /// Record the current collection as a new history entry.
    pub fn push_history(&mut self) {
        self.history.push(&self.elements);
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(elements) => {
                self.install(elements);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(elements) => {
                self.install(elements);
                true
            }
            None => false,
        }
    }

    fn install(&mut self, elements: Vec<Element>) {
        self.elements = elements;
        self.selection.clear();
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    // ---- Selection ----

    /// Selected ids, in selection order.
    pub fn selection(&self) -> &[ElementId] {
        &self.selection
    }

    /// Legacy single-selection alias: the most recently selected id.
    pub fn selected_element_id(&self) -> Option<&ElementId> {
        self.selection.last()
    }

    /// Legacy single-selection setter.
    pub fn set_selected_element_id(&mut self, id: Option<ElementId>) {
        self.select_elements(id.into_iter().collect());
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.iter().any(|sel| sel == id)
    }

    /// Replace the selection. Unknown and repeated ids are dropped.
    pub fn select_elements(&mut self, ids: Vec<ElementId>) {
        self.selection.clear();
        for id in ids {
            self.add_to_selection(id);
        }
    }

    pub fn add_to_selection(&mut self, id: ElementId) {
        if !self.is_selected(&id) && self.index_of(&id).is_some() {
            self.selection.push(id);
        }
    }

    pub fn remove_from_selection(&mut self, id: &str) {
        self.selection.retain(|sel| sel != id);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn select_all(&mut self) {
        self.selection = self.elements.iter().map(|el| el.id.clone()).collect();
    }

    /// Selected elements in z-order.
    pub fn selected_elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|el| self.is_selected(&el.id))
    }

    // ---- Viewport ----

    /// Merge a partial viewport update; zoom is clamped.
    pub fn set_viewport(&mut self, patch: ViewportPatch) {
        self.viewport.apply(patch);
        self.viewport.zoom = clamp_zoom(self.viewport.zoom);
    }

    fn viewport_center(&self) -> Point {
        Point::new(self.viewport_size.width / 2.0, self.viewport_size.height / 2.0)
    }

    pub fn zoom_in(&mut self) {
        let center = self.viewport_center();
        self.viewport.zoom_at(center, ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        let center = self.viewport_center();
        self.viewport.zoom_at(center, 1.0 / ZOOM_STEP);
    }

    /// Zoom to `level`, keeping the viewport centre fixed.
    pub fn zoom_to(&mut self, level: f64) {
        let center = self.viewport_center();
        self.viewport.zoom_to_at(center, level);
    }

    pub fn reset_zoom(&mut self) {
        self.viewport.reset();
    }

    /// Frame all content. No-op on an empty canvas.
    pub fn fit_to_screen(&mut self) {
        let content = self.geometry().content_bounds();
        if let Some(bounds) = content {
            let size = self.viewport_size;
            self.viewport.fit_to_bounds(bounds, size);
        }
    }

    /// Canvas point under a screen position.
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        self.viewport.screen_to_canvas(screen)
    }

    // ---- Tool configuration ----

    pub fn tools(&self) -> &ToolSettings {
        &self.tools
    }

    pub fn active_tool(&self) -> ToolKind {
        self.tools.tool
    }

    /// Switch tools. Always clears the selection.
    pub fn set_active_tool(&mut self, tool: ToolKind) {
        if self.tools.tool != tool {
            log::debug!("tool {:?} -> {:?}", self.tools.tool, tool);
        }
        self.tools.tool = tool;
        self.selection.clear();
    }

    pub fn set_active_color(&mut self, color: impl Into<String>) {
        self.tools.color = color.into();
    }

    pub fn set_active_shape_type(&mut self, shape_type: ShapeType) {
        self.tools.shape_type = shape_type;
    }

    pub fn set_connector_style(&mut self, style: ConnectorStyle) {
        self.tools.connector_style = style;
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        if width > 0.0 {
            self.tools.stroke_width = width;
        }
    }

    pub fn set_font_size(&mut self, size: f64) {
        if size > 0.0 {
            self.tools.font_size = size;
        }
    }

    pub fn grid(&self) -> &GridSettings {
        &self.grid
    }

    pub fn set_grid_settings(&mut self, patch: GridSettingsPatch) {
        self.grid.apply(patch);
    }

    /// Round a coordinate to the grid when snapping is enabled.
    pub fn snap_to_grid(&self, value: f64) -> f64 {
        self.grid.snap_value(value)
    }

    // ---- In-progress element ----

    pub fn current_element(&self) -> Option<&Element> {
        self.current_element.as_ref()
    }

    pub(crate) fn current_element_mut(&mut self) -> Option<&mut Element> {
        self.current_element.as_mut()
    }

    pub fn set_current_element(&mut self, element: Option<Element>) {
        self.current_element = element;
    }

    /// Append the in-progress element, if any, as a recorded change.
    pub fn commit_current_element(&mut self) -> Option<ElementId> {
        let element = self.current_element.take()?;
        let id = element.id.clone();
        self.add_element(element).then_some(id)
    }

    // ---- Data exchange ----

    pub fn get_canvas_data(&self) -> CanvasData {
        CanvasData {
            elements: self.elements.clone(),
            viewport: Some(self.viewport),
        }
    }

    /// Install a document wholesale. History restarts from the loaded state
    /// and the selection is cleared; an absent viewport keeps the current one.
    pub fn load_canvas_data(&mut self, data: CanvasData) {
        log::info!("loading document with {} elements", data.elements.len());
        self.elements = data.elements;
        if let Some(viewport) = data.viewport {
            self.viewport = viewport;
            self.viewport.zoom = clamp_zoom(self.viewport.zoom);
        }
        self.selection.clear();
        self.current_element = None;
        self.history.reset(self.elements.clone());
    }

    /// Ids of elements intersecting `area`.
    pub fn elements_in(&self, area: &Bounds) -> Vec<ElementId> {
        self.geometry().intersecting(area)
    }
}
