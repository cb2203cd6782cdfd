//! CSS color strings to peniko colors.

use peniko::Color;

/// Parse `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(...)`, `rgba(...)` or a few
/// common names.
pub fn parse_color(input: &str) -> Option<Color> {
    let s = input.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(args) = s.strip_prefix("rgba(").or_else(|| s.strip_prefix("rgb(")) {
        return parse_rgb_args(args.strip_suffix(')')?);
    }
    let named = match s.to_ascii_lowercase().as_str() {
        "black" => [0, 0, 0],
        "white" => [255, 255, 255],
        "red" => [255, 0, 0],
        "green" => [0, 128, 0],
        "blue" => [0, 0, 255],
        "yellow" => [255, 255, 0],
        "orange" => [255, 165, 0],
        "purple" => [128, 0, 128],
        "gray" | "grey" => [128, 128, 128],
        "transparent" => return Some(Color::TRANSPARENT),
        _ => return None,
    };
    Some(Color::from_rgba8(named[0], named[1], named[2], 255))
}

/// Like [`parse_color`] but falls back to black.
pub fn color_or_black(input: &str) -> Color {
    parse_color(input).unwrap_or_else(|| {
        log::warn!("unrecognized color {input:?}, using black");
        Color::BLACK
    })
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    match hex.len() {
        3 => Some(Color::from_rgba8(nibble(0)?, nibble(1)?, nibble(2)?, 255)),
        6 => Some(Color::from_rgba8(byte(0)?, byte(2)?, byte(4)?, 255)),
        8 => Some(Color::from_rgba8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

fn parse_rgb_args(args: &str) -> Option<Color> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let channel = |s: &str| s.parse::<f64>().ok().map(|v| v.clamp(0.0, 255.0).round() as u8);
    match parts.as_slice() {
        [r, g, b] => Some(Color::from_rgba8(channel(r)?, channel(g)?, channel(b)?, 255)),
        [r, g, b, a] => {
            let alpha = a.parse::<f64>().ok()?.clamp(0.0, 1.0);
            Some(Color::from_rgba8(channel(r)?, channel(g)?, channel(b)?, (alpha * 255.0).round() as u8))
        }
        _ => None,
    }
}

/// `#rrggbb` plus opacity in `[0, 1]`, for SVG attributes.
pub fn to_svg_paint(color: Color) -> (String, f64) {
    let rgba = color.to_rgba8();
    (
        format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b),
        rgba.a as f64 / 255.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba(color: Color) -> [u8; 4] {
        let c = color.to_rgba8();
        [c.r, c.g, c.b, c.a]
    }

    #[test]
    fn test_hex_forms() {
        assert_eq!(rgba(parse_color("#000000").unwrap()), [0, 0, 0, 255]);
        assert_eq!(rgba(parse_color("#0066FF").unwrap()), [0, 102, 255, 255]);
        assert_eq!(rgba(parse_color("#f0a").unwrap()), [255, 0, 170, 255]);
        assert_eq!(rgba(parse_color("#11223380").unwrap()), [17, 34, 51, 128]);
        assert!(parse_color("#12345").is_none());
        assert!(parse_color("#zzzzzz").is_none());
    }

    #[test]
    fn test_rgb_functions() {
        assert_eq!(rgba(parse_color("rgb(1, 2, 3)").unwrap()), [1, 2, 3, 255]);
        assert_eq!(rgba(parse_color("rgba(0,0,0,1)").unwrap()), [0, 0, 0, 255]);
        assert_eq!(rgba(parse_color("rgba(10,20,30,0.5)").unwrap())[3], 128);
    }

    #[test]
    fn test_names_and_fallback() {
        assert_eq!(rgba(parse_color("Red").unwrap()), [255, 0, 0, 255]);
        assert_eq!(rgba(color_or_black("not a color")), [0, 0, 0, 255]);
    }

    #[test]
    fn test_svg_paint() {
        let (hex, opacity) = to_svg_paint(Color::from_rgba8(0, 102, 255, 255));
        assert_eq!(hex, "#0066ff");
        assert!((opacity - 1.0).abs() < f64::EPSILON);
    }
}
