use crate::foundation::error::{SpiroError, SpiroResult};

pub use kurbo::{Point, Rect, Vec2};

/// Opaque 8-bit RGB color.
///
/// Serializes as `"#rrggbb"`. Deserializes from `"#RRGGBB"`, `{ "r": .., "g": .., "b": .. }`
/// (0..1 floats) or `[r, g, b]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Construct a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Uniformly random color.
    pub fn random(rng: &mut impl rand::Rng) -> Self {
        Self::new(rng.r#gen(), rng.r#gen(), rng.r#gen())
    }

    /// Straight-alpha RGBA bytes with the given alpha.
    pub fn with_alpha(self, a: u8) -> [u8; 4] {
        [self.r, self.g, self.b, a]
    }
}

/// A captured frame as straight-alpha RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Wrap raw RGBA8 bytes, checking the buffer length against the dimensions.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> SpiroResult<Self> {
        let expected = (width as usize) * (height as usize) * 4;
        if data.len() != expected {
            return Err(SpiroError::validation(format!(
                "frame data is {} bytes, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// RGBA bytes of the pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
