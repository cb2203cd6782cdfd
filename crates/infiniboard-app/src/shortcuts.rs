//! Keyboard shortcut registry and documentation.

use infiniboard_core::Modifiers;

/// A keyboard shortcut as it appears in an event script.
#[derive(Debug, Clone)]
pub struct Shortcut {
    /// Key value, matched case-insensitively for letters.
    pub key: &'static str,
    pub command: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, command: bool, shift: bool, description: &'static str) -> Self {
        Self {
            key,
            command,
            shift,
            description,
        }
    }

    /// Modifier state that triggers this shortcut.
    pub fn modifiers(&self) -> Modifiers {
        Modifiers {
            ctrl: self.command,
            shift: self.shift,
            ..Modifiers::NONE
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Shift+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.command {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("V", false, false, "Select tool"),
            Shortcut::new("B", false, false, "Draw tool"),
            Shortcut::new("E", false, false, "Eraser tool"),
            Shortcut::new("S", false, false, "Shape tool"),
            Shortcut::new("C", false, false, "Connector tool"),
            Shortcut::new("T", false, false, "Text tool"),
            Shortcut::new("I", false, false, "Image tool (opens the picker)"),
            Shortcut::new("H", false, false, "Pan tool"),
            Shortcut::new("Space", false, false, "Hold to pan"),
            Shortcut::new("Z", true, false, "Undo"),
            Shortcut::new("Z", true, true, "Redo"),
            Shortcut::new("Y", true, false, "Redo"),
            Shortcut::new("C", true, false, "Copy selection"),
            Shortcut::new("V", true, false, "Paste"),
            Shortcut::new("D", true, false, "Duplicate selection"),
            Shortcut::new("A", true, false, "Select all"),
            Shortcut::new("L", true, false, "Toggle lock on selection"),
            Shortcut::new("=", true, false, "Zoom in"),
            Shortcut::new("-", true, false, "Zoom out"),
            Shortcut::new("0", true, false, "Reset zoom"),
            Shortcut::new("Delete", false, false, "Delete selection"),
            Shortcut::new("Backspace", false, false, "Delete selection"),
            Shortcut::new("Escape", false, false, "Cancel current action or clear selection"),
        ]
    }

    /// Print all shortcuts to stdout.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infiniboard_core::{Canvas, InteractionEngine, ToolKind};

    #[test]
    fn test_format() {
        assert_eq!(Shortcut::new("Z", true, true, "Redo").format(), "Ctrl+Shift+Z");
        assert_eq!(Shortcut::new("Delete", false, false, "Delete").format(), "Delete");
    }

    #[test]
    fn test_every_shortcut_is_handled() {
        for shortcut in ShortcutRegistry::all() {
            let mut canvas = Canvas::new();
            let mut engine = InteractionEngine::new();
            assert!(
                engine.key_down(&mut canvas, shortcut.key, shortcut.modifiers()),
                "{} not handled",
                shortcut.format()
            );
        }
    }

    #[test]
    fn test_tool_letters_match_engine() {
        for shortcut in ShortcutRegistry::all().iter().filter(|s| !s.command && s.key.len() == 1) {
            let mut canvas = Canvas::new();
            let mut engine = InteractionEngine::new();
            engine.key_down(&mut canvas, shortcut.key, Modifiers::NONE);
            assert_eq!(Some(canvas.active_tool()), ToolKind::from_shortcut(shortcut.key));
        }
    }
}
