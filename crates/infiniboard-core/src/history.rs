//! Snapshot-based undo/redo log.

use crate::constants::HISTORY_CAPACITY;
use crate::elements::Element;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// A full copy of the element collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub elements: Vec<Element>,
    pub timestamp: u64,
}

/// Append-only log of scene snapshots with a cursor.
///
/// Each entry is the collection *after* a recorded mutation. The cursor
/// names the entry matching the live scene; `None` means the live scene
/// is the baseline (the empty canvas, the last loaded document, or the
/// state preserved by evicting the oldest entry).
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    cursor: Option<usize>,
    baseline: Vec<Element>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: None,
            baseline: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record a snapshot of `elements`, discarding any redo entries.
    pub fn push(&mut self, elements: &[Element]) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.entries.truncate(keep);
        self.entries.push_back(HistoryEntry {
            elements: elements.to_vec(),
            timestamp: now_millis(),
        });

        if self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                self.baseline = evicted.elements;
            }
        }
        self.cursor = Some(self.entries.len() - 1);
        log::debug!("history: {} entries, cursor {:?}", self.entries.len(), self.cursor);
    }

    /// Step back one entry and return the collection to install.
    pub fn undo(&mut self) -> Option<Vec<Element>> {
        let cursor = self.cursor?;
        if cursor == 0 {
            self.cursor = None;
            return Some(self.baseline.clone());
        }
        self.cursor = Some(cursor - 1);
        Some(self.entries[cursor - 1].elements.clone())
    }

    /// Step forward one entry and return the collection to install.
    pub fn redo(&mut self) -> Option<Vec<Element>> {
        let next = self.cursor.map_or(0, |c| c + 1);
        let entry = self.entries.get(next)?;
        self.cursor = Some(next);
        Some(entry.elements.clone())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn can_redo(&self) -> bool {
        let next = self.cursor.map_or(0, |c| c + 1);
        next < self.entries.len()
    }

    /// Cursor position as a signed index, `-1` at the baseline.
    pub fn index(&self) -> isize {
        self.cursor.map_or(-1, |c| c as isize)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Drop every entry; `baseline` becomes the state undo returns to.
    pub fn reset(&mut self, baseline: Vec<Element>) {
        self.entries.clear();
        self.cursor = None;
        self.baseline = baseline;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ElementKind, Shape, ShapeType};
    use kurbo::Point;

    fn el(x: f64) -> Element {
        Element::new(Point::new(x, 0.0), "#000", 2.0, ElementKind::Shape(Shape::new(ShapeType::Rectangle, 1.0, 1.0)))
    }

    #[test]
    fn test_empty_history() {
        let mut h = History::new();
        assert!(!h.can_undo());
        assert!(!h.can_redo());
        assert_eq!(h.index(), -1);
        assert!(h.undo().is_none());
        assert!(h.redo().is_none());
    }

    #[test]
    fn test_undo_to_baseline_and_redo() {
        let a = el(1.0);
        let b = el(2.0);
        let mut h = History::new();
        h.push(&[a.clone()]);
        h.push(&[a.clone(), b.clone()]);

        assert_eq!(h.undo().unwrap(), vec![a.clone()]);
        assert_eq!(h.undo().unwrap(), Vec::<Element>::new());
        assert_eq!(h.index(), -1);
        assert!(h.undo().is_none());
        assert_eq!(h.redo().unwrap(), vec![a.clone()]);
        assert_eq!(h.redo().unwrap(), vec![a, b]);
        assert!(h.redo().is_none());
    }

    #[test]
    fn test_push_truncates_future() {
        let mut h = History::new();
        h.push(&[el(1.0)]);
        h.push(&[el(2.0)]);
        h.undo();
        h.push(&[el(3.0)]);
        assert_eq!(h.len(), 2);
        assert!(!h.can_redo());
    }

    #[test]
    fn test_capacity_eviction_keeps_cursor_consistent() {
        let mut h = History::with_capacity(3);
        let states: Vec<Vec<Element>> = (0..5).map(|i| vec![el(i as f64)]).collect();
        for state in &states {
            h.push(state);
        }
        assert_eq!(h.len(), 3);
        assert_eq!(h.index(), 2);

        assert_eq!(h.undo().unwrap(), states[3]);
        assert_eq!(h.undo().unwrap(), states[2]);
        // Evicted entry is the new floor.
        assert_eq!(h.undo().unwrap(), states[1]);
        assert!(h.undo().is_none());
        assert_eq!(h.redo().unwrap(), states[2]);
    }

    #[test]
    fn test_default_capacity_is_fifty() {
        let mut h = History::new();
        for i in 0..60 {
            h.push(&[el(i as f64)]);
        }
        assert_eq!(h.len(), HISTORY_CAPACITY);
        assert_eq!(h.index(), HISTORY_CAPACITY as isize - 1);
    }

    #[test]
    fn test_reset_sets_baseline() {
        let loaded = vec![el(9.0)];
        let mut h = History::new();
        h.push(&[el(1.0)]);
        h.reset(loaded.clone());
        assert!(h.is_empty());
        assert!(!h.can_undo());
        h.push(&[]);
        assert_eq!(h.undo().unwrap(), loaded);
    }
}
