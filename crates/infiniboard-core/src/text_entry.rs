//! Inline text entry opened by the text tool.

use crate::constants::TEXT_BLUR_GUARD_MS;
use kurbo::Point;
use std::time::{Duration, Instant};

/// What a blur event should do to an open entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurAction {
    /// Blur came too soon after opening; give focus back to the input.
    Refocus,
    /// Treat the blur like Enter.
    Commit,
}

/// State of an open text input.
#[derive(Debug, Clone)]
pub struct TextEntry {
    /// Where the input sits on screen; the committed text is placed at the
    /// canvas point under it.
    pub screen_position: Point,
    pub value: String,
    opened_at: Instant,
}

impl TextEntry {
    pub fn open(screen_position: Point) -> Self {
        Self::open_at(screen_position, Instant::now())
    }

    pub fn open_at(screen_position: Point, opened_at: Instant) -> Self {
        Self {
            screen_position,
            value: String::new(),
            opened_at,
        }
    }

    pub fn opened_at(&self) -> Instant {
        self.opened_at
    }

    /// Decide how to handle a blur arriving at `now`.
    pub fn blur_action(&self, now: Instant) -> BlurAction {
        let guard = Duration::from_millis(TEXT_BLUR_GUARD_MS);
        if now.saturating_duration_since(self.opened_at) > guard {
            BlurAction::Commit
        } else {
            BlurAction::Refocus
        }
    }

    /// Value to commit, or `None` when it is blank.
    pub fn committed_text(&self) -> Option<&str> {
        (!self.value.trim().is_empty()).then_some(self.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blur_guard() {
        let opened = Instant::now();
        let entry = TextEntry::open_at(Point::ZERO, opened);
        assert_eq!(entry.blur_action(opened + Duration::from_millis(100)), BlurAction::Refocus);
        assert_eq!(entry.blur_action(opened + Duration::from_millis(500)), BlurAction::Refocus);
        assert_eq!(entry.blur_action(opened + Duration::from_millis(501)), BlurAction::Commit);
    }

    #[test]
    fn test_blank_text_is_not_committed() {
        let mut entry = TextEntry::open(Point::ZERO);
        entry.value = "   ".to_string();
        assert!(entry.committed_text().is_none());
        entry.value = "  hello ".to_string();
        assert_eq!(entry.committed_text(), Some("  hello "));
    }
}
