use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The default panel palette, consumed cyclically.
pub const DEFAULT_PALETTE: [&str; 12] = [
    "#e94560", "#0f3460", "#16213e", "#533483", "#1a1a2e", "#4a4e69", "#9a8c98", "#c9ada7",
    "#22223b", "#f2e9e4", "#4361ee", "#7209b7",
];

/// Color used when an explicit color cannot be parsed.
pub const FALLBACK_RGB: Rgb = Rgb { r: 0.5, g: 0.5, b: 0.5 };

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColorError {
    #[error("Palette must contain at least one color")]
    EmptyPalette,
}

/// RGB color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb`. Anything else is `None`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .ok()
                .map(|v| v as f32 / 255.0)
        };
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(&self) -> String {
        let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// A resolved panel color: the string as the element (or palette) spelled
/// it, plus the channels derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Color {
    pub hex: String,
    pub rgb: Rgb,
}

impl Color {
    /// Unparseable strings keep their spelling but render gray.
    pub fn parse(hex: &str) -> Self {
        let rgb = Rgb::from_hex(hex).unwrap_or_else(|| {
            log::warn!("Unrecognized color '{}', using gray", hex);
            FALLBACK_RGB
        });
        Self {
            hex: hex.to_string(),
            rgb,
        }
    }
}

/// Cyclic palette cursor. One allocator per render; never shared.
#[derive(Debug, Clone)]
pub struct ColorAllocator {
    palette: Vec<Color>,
    cursor: usize,
}

impl ColorAllocator {
    pub fn new<S: AsRef<str>>(palette: &[S]) -> Result<Self, ColorError> {
        if palette.is_empty() {
            return Err(ColorError::EmptyPalette);
        }
        Ok(Self {
            palette: palette.iter().map(|c| Color::parse(c.as_ref())).collect(),
            cursor: 0,
        })
    }

    /// `palette[calls mod len]`, then advance.
    pub fn next_color(&mut self) -> Color {
        let color = self.palette[self.cursor % self.palette.len()].clone();
        self.cursor += 1;
        color
    }

    /// Number of colors handed out so far.
    pub fn allocated(&self) -> usize {
        self.cursor
    }

    pub fn palette_len(&self) -> usize {
        self.palette.len()
    }
}

impl Default for ColorAllocator {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE.iter().map(|c| Color::parse(c)).collect(),
            cursor: 0,
        }
    }
}
