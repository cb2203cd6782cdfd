//! Tool selection and the style applied to newly created elements.

use crate::elements::{ConnectorStyle, ShapeType};
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Select,
    #[default]
    Draw,
    Eraser,
    Shape,
    Connector,
    Text,
    Image,
    Pan,
}

impl ToolKind {
    /// Tool bound to a single-letter shortcut.
    pub fn from_shortcut(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "v" => Some(ToolKind::Select),
            "b" => Some(ToolKind::Draw),
            "e" => Some(ToolKind::Eraser),
            "s" => Some(ToolKind::Shape),
            "c" => Some(ToolKind::Connector),
            "t" => Some(ToolKind::Text),
            "i" => Some(ToolKind::Image),
            "h" => Some(ToolKind::Pan),
            _ => None,
        }
    }

    /// Get display name for UI.
    pub fn display_name(self) -> &'static str {
        match self {
            ToolKind::Select => "Select",
            ToolKind::Draw => "Draw",
            ToolKind::Eraser => "Eraser",
            ToolKind::Shape => "Shape",
            ToolKind::Connector => "Connector",
            ToolKind::Text => "Text",
            ToolKind::Image => "Image",
            ToolKind::Pan => "Pan",
        }
    }
}

/// Active tool and the style new elements pick up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolSettings {
    pub tool: ToolKind,
    pub color: String,
    pub shape_type: ShapeType,
    pub stroke_width: f64,
    pub font_size: f64,
    pub connector_style: ConnectorStyle,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            tool: ToolKind::default(),
            color: "#000000".to_string(),
            shape_type: ShapeType::default(),
            stroke_width: 2.0,
            font_size: 16.0,
            connector_style: ConnectorStyle::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ToolSettings::default();
        assert_eq!(settings.tool, ToolKind::Draw);
        assert_eq!(settings.color, "#000000");
        assert_eq!(settings.shape_type, ShapeType::Rectangle);
        assert!((settings.stroke_width - 2.0).abs() < f64::EPSILON);
        assert!((settings.font_size - 16.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shortcuts() {
        assert_eq!(ToolKind::from_shortcut("V"), Some(ToolKind::Select));
        assert_eq!(ToolKind::from_shortcut("h"), Some(ToolKind::Pan));
        assert_eq!(ToolKind::from_shortcut("i"), Some(ToolKind::Image));
        assert_eq!(ToolKind::from_shortcut("x"), None);
    }
}
