//! Embedded raster images.

use serde::{Deserialize, Serialize};

/// An image drawn into the box at the element anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Embedded payload, normally a `data:` URI.
    pub image_data: String,
    pub width: f64,
    pub height: f64,
}

impl Image {
    pub fn new(image_data: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            image_data: image_data.into(),
            width,
            height,
        }
    }

    /// MIME type declared by the data URI, if any.
    pub fn mime_type(&self) -> Option<&str> {
        let rest = self.image_data.strip_prefix("data:")?;
        let end = rest.find([';', ','])?;
        Some(&rest[..end]).filter(|mime| !mime.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_type_from_data_uri() {
        let img = Image::new("data:image/png;base64,AAAA", 10.0, 10.0);
        assert_eq!(img.mime_type(), Some("image/png"));
    }

    #[test]
    fn test_mime_type_missing() {
        assert_eq!(Image::new("https://example.com/a.png", 1.0, 1.0).mime_type(), None);
        assert_eq!(Image::new("data:,hello", 1.0, 1.0).mime_type(), None);
    }
}
