// File: crates/grapher-core/src/theme.rs
// Summary: RGBA colors, CSS-style color parsing/blending and the resolved chart theme.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const TRANSPARENT: Rgba = Rgba { r: 0, g: 0, b: 0, a: 0 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self { Self { r, g, b, a: 255 } }

    pub fn with_opacity(self, opacity: f32) -> Self {
        Self { a: (self.a as f32 * opacity.clamp(0.0, 1.0)).round() as u8, ..self }
    }

    /// `#rrggbb`, ignoring alpha.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn opacity(self) -> f32 { self.a as f32 / 255.0 }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            f.write_str(&self.to_hex())
        } else {
            write!(f, "rgba({},{},{},{:.3})", self.r, self.g, self.b, self.opacity())
        }
    }
}

/// Parse `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r,g,b)`, `rgba(r,g,b,a)`, `transparent`
/// and a few named colors. Returns `None` for anything else.
pub fn parse_color(s: &str) -> Option<Rgba> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    let lower = s.to_ascii_lowercase();
    if let Some(body) = lower.strip_prefix("rgba(").or_else(|| lower.strip_prefix("rgb(")) {
        let body = body.strip_suffix(')')?;
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return None;
        }
        let channel = |p: &str| p.parse::<f32>().ok().map(|v| v.clamp(0.0, 255.0).round() as u8);
        let a = match parts.get(3) {
            Some(p) => (p.parse::<f32>().ok()?.clamp(0.0, 1.0) * 255.0).round() as u8,
            None => 255,
        };
        return Some(Rgba { r: channel(parts[0])?, g: channel(parts[1])?, b: channel(parts[2])?, a });
    }
    match lower.as_str() {
        "transparent" => Some(Rgba::TRANSPARENT),
        "black" => Some(Rgba::BLACK),
        "white" => Some(Rgba::WHITE),
        "red" => Some(Rgba::rgb(255, 0, 0)),
        "green" => Some(Rgba::rgb(0, 128, 0)),
        "blue" => Some(Rgba::rgb(0, 0, 255)),
        "gray" | "grey" => Some(Rgba::rgb(128, 128, 128)),
        _ => None,
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    let nibble = |c: u8| (c as char).to_digit(16).map(|d| d as u8);
    let bytes = hex.as_bytes();
    match bytes.len() {
        3 => {
            let r = nibble(bytes[0])?;
            let g = nibble(bytes[1])?;
            let b = nibble(bytes[2])?;
            Some(Rgba::rgb(r * 17, g * 17, b * 17))
        }
        6 | 8 => {
            let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
            let a = if bytes.len() == 8 { byte(6)? } else { 255 };
            Some(Rgba { r: byte(0)?, g: byte(2)?, b: byte(4)?, a })
        }
        _ => None,
    }
}

/// Linear blend: `ratio` of `a` over `1 - ratio` of `b`, per channel.
pub fn barycenter(a: Rgba, b: Rgba, ratio: f32) -> Rgba {
    let t = ratio.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f32 * t + y as f32 * (1.0 - t)).round() as u8;
    Rgba { r: mix(a.r, b.r), g: mix(a.g, b.g), b: mix(a.b, b.b), a: mix(a.a, b.a) }
}

/// Blend two CSS color strings; unparseable inputs fall back to black/white.
pub fn barycenter_color(a: &str, b: &str, ratio: f32) -> String {
    let a = parse_color(a).unwrap_or(Rgba::BLACK);
    let b = parse_color(b).unwrap_or(Rgba::WHITE);
    barycenter(a, b, ratio).to_string()
}

/// Colors used for chart chrome, resolved from the container's computed style.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    pub text: String,
    pub background: String,
    pub font_size: f32,
    pub axis_line: String,
    pub grid: String,
    /// Color of non-highlighted lines under the `color` highlight mode.
    pub muted: String,
}

impl Theme {
    /// Build from the element's text color and background. A transparent background reads as white.
    pub fn from_style(color: &str, background: &str, font_size: f32) -> Self {
        let text = parse_color(color).unwrap_or(Rgba::BLACK);
        let bg = match parse_color(background) {
            Some(c) if c.a > 0 => c,
            _ => Rgba::WHITE,
        };
        Self {
            text: text.to_string(),
            background: bg.to_string(),
            font_size,
            axis_line: text.to_string(),
            grid: barycenter(text, bg, 0.15).to_string(),
            muted: "#ccc".to_string(),
        }
    }

    pub fn light() -> Self { Self::from_style("#000000", "#ffffff", crate::types::FONT_SIZE) }

    pub fn dark() -> Self { Self::from_style("#ebebf5", "#121214", crate::types::FONT_SIZE) }

    /// Blend of the text color over the background.
    pub fn blend(&self, ratio: f32) -> String {
        barycenter_color(&self.text, &self.background, ratio)
    }
}

impl Default for Theme {
    fn default() -> Self { Self::light() }
}
