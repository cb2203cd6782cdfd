//! Image payloads: data URI decoding and insertion into the scene.

use crate::canvas::Canvas;
use crate::elements::{Element, ElementId, ElementKind, Image};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use kurbo::{Point, Size};
use std::path::Path;
use thiserror::Error;

/// Errors from decoding an image payload.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("not a data URI")]
    NotDataUri,
    #[error("unsupported media type: {0}")]
    UnsupportedType(String),
    #[error("data URI is not base64 encoded")]
    NotBase64,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("undecodable image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Raster formats accepted for embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }
        None
    }
}

/// A decoded data URI.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
    /// Natural size in pixels.
    pub size: Size,
}

/// Decode a base64 `data:image/...` URI and read its natural size.
pub fn decode_data_uri(uri: &str) -> Result<DecodedImage, MediaError> {
    let rest = uri.strip_prefix("data:").ok_or(MediaError::NotDataUri)?;
    let (header, payload) = rest.split_once(',').ok_or(MediaError::NotDataUri)?;
    let mut params = header.split(';');
    let mime_type = params.next().unwrap_or_default().to_ascii_lowercase();
    if !mime_type.starts_with("image/") {
        return Err(MediaError::UnsupportedType(mime_type));
    }
    if !params.any(|p| p.eq_ignore_ascii_case("base64")) {
        return Err(MediaError::NotBase64);
    }

    let bytes = STANDARD.decode(payload.trim())?;
    let decoded = image::load_from_memory(&bytes)?;
    Ok(DecodedImage {
        mime_type,
        bytes,
        size: Size::new(decoded.width() as f64, decoded.height() as f64),
    })
}

/// Encode raw image bytes as a data URI, sniffing the format.
pub fn data_uri_from_bytes(bytes: &[u8]) -> Result<String, MediaError> {
    let format = ImageFormat::from_magic_bytes(bytes)
        .ok_or_else(|| MediaError::UnsupportedType("application/octet-stream".to_string()))?;
    Ok(format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(bytes)))
}

/// Read an image file into a data URI.
pub fn data_uri_from_file(path: &Path) -> Result<String, MediaError> {
    let bytes = std::fs::read(path)?;
    data_uri_from_bytes(&bytes)
}

impl Canvas {
    /// Insert an image at half its natural size, centred on `center`
    /// (canvas space). The insertion is recorded.
    pub fn insert_image(&mut self, data_uri: &str, center: Point) -> Result<ElementId, MediaError> {
        let decoded = decode_data_uri(data_uri).inspect_err(|e| log::warn!("rejected image: {e}"))?;
        let width = decoded.size.width / 2.0;
        let height = decoded.size.height / 2.0;
        let tools = self.tools();
        let element = Element::new(
            Point::new(center.x - width / 2.0, center.y - height / 2.0),
            tools.color.clone(),
            tools.stroke_width,
            ElementKind::Image(Image::new(data_uri, width, height)),
        );
        let id = element.id.clone();
        self.add_element(element);
        log::info!("inserted {} image {}x{}", decoded.mime_type, decoded.size.width, decoded.size.height);
        Ok(id)
    }

    /// Insert an uploaded image at the centre of the viewport.
    pub fn upload_image(&mut self, data_uri: &str) -> Result<ElementId, MediaError> {
        let center = self.screen_to_canvas(Point::new(self.viewport_size.width / 2.0, self.viewport_size.height / 2.0));
        self.insert_image(data_uri, center)
    }

    /// Insert an image dropped at a screen position.
    pub fn drop_image(&mut self, data_uri: &str, screen_position: Point) -> Result<ElementId, MediaError> {
        let center = self.screen_to_canvas(screen_position);
        self.insert_image(data_uri, center)
    }
}
