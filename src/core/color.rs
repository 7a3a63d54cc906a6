use serde::{Deserialize, Serialize};

use crate::error::{CanvasError, CanvasResult};

/// RGBA color with 8-bit channels.
///
/// This is the only color encoding the crate speaks. The remote store keeps
/// colors packed as `0xRRGGBBAA`; render drivers that want normalized floats
/// call [`Color::to_normalized`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    #[must_use]
    pub const fn to_packed(self) -> u32 {
        u32::from_be_bytes([self.r, self.g, self.b, self.a])
    }

    #[must_use]
    pub const fn from_packed(packed: u32) -> Self {
        let [r, g, b, a] = packed.to_be_bytes();
        Self { r, g, b, a }
    }

    /// Formats as `#rrggbbaa`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:08x}", self.to_packed())
    }

    /// Parses `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(input: &str) -> CanvasResult<Self> {
        let digits = input.trim().trim_start_matches('#');
        let packed = match digits.len() {
            6 => (parse_hex_digits(digits)? << 8) | 0xff,
            8 => parse_hex_digits(digits)?,
            _ => {
                return Err(CanvasError::InvalidData(format!(
                    "color `{input}` must have 6 or 8 hex digits"
                )));
            }
        };
        Ok(Self::from_packed(packed))
    }

    /// Channels scaled into `[0, 1]`, in `[r, g, b, a]` order.
    #[must_use]
    pub fn to_normalized(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a].map(|channel| f32::from(channel) / 255.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

fn parse_hex_digits(digits: &str) -> CanvasResult<u32> {
    if !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return Err(CanvasError::InvalidData(format!(
            "`{digits}` is not a hex color"
        )));
    }
    u32::from_str_radix(digits, 16)
        .map_err(|_| CanvasError::InvalidData(format!("`{digits}` is not a hex color")))
}
