use crate::foundation::error::{PixpackError, PixpackResult};

/// Number of bits stored per pixel.
///
/// Pixels are packed least-significant lane first: pixel `x` of a row lives at
/// bit `(x * bits) % 8` of byte `(x * bits) / 8`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum BitDepth {
    /// Monochrome, eight pixels per byte.
    One = 1,
    /// Four pixels per byte.
    Two = 2,
    /// Two pixels per byte (nibbles).
    Four = 4,
    /// One pixel per byte.
    Eight = 8,
}

impl BitDepth {
    /// Every supported depth, narrowest first.
    pub const ALL: [BitDepth; 4] = [BitDepth::One, BitDepth::Two, BitDepth::Four, BitDepth::Eight];

    /// Lane width in bits.
    pub const fn bits(self) -> u32 {
        self as u32
    }

    /// Largest storable pixel value, `2^bits - 1`.
    pub const fn mask(self) -> u8 {
        match self {
            BitDepth::One => 0x01,
            BitDepth::Two => 0x03,
            BitDepth::Four => 0x0f,
            BitDepth::Eight => 0xff,
        }
    }

    /// Lanes per byte.
    pub const fn pixels_per_byte(self) -> usize {
        8 / self.bits() as usize
    }

    /// A byte whose every lane holds `value & mask`.
    pub const fn splat(self, value: u8) -> u8 {
        let m = self.mask();
        (value & m) * (0xff / m)
    }

    /// Bytes occupied by one row of `width` pixels, padding included.
    pub const fn row_bytes(self, width: u32) -> usize {
        (width as usize * self.bits() as usize).div_ceil(8)
    }

    /// Byte index within a row and bit shift of the lane holding pixel `x`.
    pub(crate) const fn lane(self, x: usize) -> (usize, u32) {
        let ppb = self.pixels_per_byte();
        (x / ppb, ((x % ppb) as u32) * self.bits())
    }
}

impl TryFrom<u8> for BitDepth {
    type Error = PixpackError;

    fn try_from(bits: u8) -> PixpackResult<Self> {
        match bits {
            1 => Ok(BitDepth::One),
            2 => Ok(BitDepth::Two),
            4 => Ok(BitDepth::Four),
            8 => Ok(BitDepth::Eight),
            other => Err(PixpackError::contract(format!(
                "unsupported bit depth {other} (expected 1, 2, 4 or 8)"
            ))),
        }
    }
}

impl From<BitDepth> for u8 {
    fn from(d: BitDepth) -> u8 {
        d as u8
    }
}

impl std::fmt::Display for BitDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.bits())
    }
}

impl std::str::FromStr for BitDepth {
    type Err = PixpackError;

    fn from_str(s: &str) -> PixpackResult<Self> {
        let bits: u8 = s
            .trim()
            .parse()
            .map_err(|_| PixpackError::contract(format!("bit depth '{s}' is not a number")))?;
        BitDepth::try_from(bits)
    }
}

/// A rectangle in buffer coordinates. May be negative, oversized or empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// The part of a [`Rect`] that lies inside a buffer. Half-open on both axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClipRect {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize, // exclusive
    pub y1: usize, // exclusive
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Intersect with `[0, width) x [0, height)`; `None` when nothing is left.
    pub fn clip(self, width: u32, height: u32) -> Option<ClipRect> {
        if self.w <= 0 || self.h <= 0 {
            return None;
        }
        let (x, y) = (i64::from(self.x), i64::from(self.y));
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + i64::from(self.w)).min(i64::from(width));
        let y1 = (y + i64::from(self.h)).min(i64::from(height));
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some(ClipRect {
            x0: x0 as usize,
            y0: y0 as usize,
            x1: x1 as usize,
            y1: y1 as usize,
        })
    }
}

impl ClipRect {
    pub fn width(self) -> usize {
        self.x1 - self.x0
    }

    pub fn height(self) -> usize {
        self.y1 - self.y0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
