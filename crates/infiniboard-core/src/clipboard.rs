//! Copy, paste and duplicate.

use crate::canvas::Canvas;
use crate::constants::PASTE_OFFSET;
use crate::elements::{Element, ElementId};
use crate::history::now_millis;
use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Elements captured by the last copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clipboard {
    pub elements: Vec<Element>,
    pub copied_at: u64,
}

/// Fresh-identity copies offset by the paste delta and unlocked.
///
/// Connector bindings between elements of the batch are rewired to the
/// new copies; bindings to elements outside the batch are kept.
fn clone_batch(sources: &[Element]) -> Vec<Element> {
    let offset = Vec2::new(PASTE_OFFSET, PASTE_OFFSET);
    let copies: Vec<Element> = sources.iter().map(|el| el.duplicate_with_offset(offset)).collect();
    let remap: HashMap<ElementId, ElementId> = sources
        .iter()
        .zip(&copies)
        .map(|(src, copy)| (src.id.clone(), copy.id.clone()))
        .collect();

    copies
        .into_iter()
        .map(|mut copy| {
            if let Some(c) = copy.as_connector_mut() {
                for binding in [&mut c.start_element_id, &mut c.end_element_id] {
                    if let Some(new_id) = binding.as_ref().and_then(|id| remap.get(id)) {
                        *binding = Some(new_id.clone());
                    }
                }
            }
            copy
        })
        .collect()
}

impl Canvas {
    pub fn clipboard(&self) -> Option<&Clipboard> {
        self.clipboard.as_ref()
    }

    /// Copy the selection into the clipboard. No-op without a selection.
    pub fn copy(&mut self) -> bool {
        let elements: Vec<Element> = self.selected_elements().cloned().collect();
        if elements.is_empty() {
            return false;
        }
        log::debug!("copied {} elements", elements.len());
        self.clipboard = Some(Clipboard {
            elements,
            copied_at: now_millis(),
        });
        true
    }

    /// Append offset copies of the clipboard and select them.
    pub fn paste(&mut self) -> Vec<ElementId> {
        let sources = match &self.clipboard {
            Some(clipboard) if !clipboard.elements.is_empty() => clipboard.elements.clone(),
            _ => return Vec::new(),
        };
        self.insert_batch(clone_batch(&sources))
    }

    /// Append offset copies of the selection and select them, leaving the
    /// clipboard untouched.
    pub fn duplicate(&mut self) -> Vec<ElementId> {
        let sources: Vec<Element> = self.selected_elements().cloned().collect();
        if sources.is_empty() {
            return Vec::new();
        }
        self.insert_batch(clone_batch(&sources))
    }

    fn insert_batch(&mut self, copies: Vec<Element>) -> Vec<ElementId> {
        let ids: Vec<ElementId> = copies.iter().map(|el| el.id.clone()).collect();
        let mut elements = self.elements().to_vec();
        elements.extend(copies);
        self.set_elements(elements);
        self.select_elements(ids.clone());
        ids
    }
}
