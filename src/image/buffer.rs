use crate::foundation::core::BitDepth;
use crate::foundation::error::{PixpackError, PixpackResult};

/// A packed-pixel image.
///
/// Rows are stored top to bottom, each padded to a whole number of bytes
/// (`stride` bytes per row). Padding bits are kept at zero, so two images with
/// the same size and depth are pixel-equal exactly when their bytes are equal.
///
/// `Clone` produces an independent copy of the backing storage.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Image {
    width: u32,
    height: u32,
    depth: BitDepth,
    stride: usize,
    data: Vec<u8>,
}

impl Image {
    /// A zero-filled image.
    pub fn new(width: u32, height: u32, depth: BitDepth) -> PixpackResult<Self> {
        let (stride, len) = layout(width, height, depth)?;
        Ok(Self {
            width,
            height,
            depth,
            stride,
            data: vec![0; len],
        })
    }

    /// Wrap caller-filled packed bytes. Padding bits are cleared.
    pub fn from_bytes(width: u32, height: u32, depth: BitDepth, data: Vec<u8>) -> PixpackResult<Self> {
        let (stride, len) = layout(width, height, depth)?;
        if data.len() != len {
            return Err(PixpackError::contract(format!(
                "{width}x{height} at {depth}bpp needs {len} bytes, got {}",
                data.len()
            )));
        }
        let mut img = Self {
            width,
            height,
            depth,
            stride,
            data,
        };
        img.clear_padding();
        Ok(img)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn depth(&self) -> BitDepth {
        self.depth
    }

    pub fn is_mono(&self) -> bool {
        self.depth == BitDepth::One
    }

    /// Bytes per row, padding included.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Packed bytes of row `y`.
    ///
    /// Panics if `y >= height`.
    pub fn row(&self, y: usize) -> &[u8] {
        &self.data[y * self.stride..(y + 1) * self.stride]
    }

    pub(crate) fn row_mut(&mut self, y: usize) -> &mut [u8] {
        &mut self.data[y * self.stride..(y + 1) * self.stride]
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Offset into [`Image::data`] of the byte holding pixel `(x, y)`.
    pub fn byte_offset(&self, x: usize, y: usize) -> usize {
        y * self.stride + self.depth.lane(x).0
    }

    /// Pixel value at `(x, y)`, or `None` outside the image.
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u8> {
        let (x, y) = self.index(x, y)?;
        Some(self.lane_get(x, y))
    }

    /// Store `value` (masked to the bit depth) at `(x, y)`. Writes outside the
    /// image are dropped.
    pub fn set_pixel(&mut self, x: i32, y: i32, value: u8) {
        if let Some((x, y)) = self.index(x, y) {
            self.lane_set(x, y, value);
        }
    }

    /// Overwrite every pixel with `other`'s. Size and depth must match.
    pub fn copy_from(&mut self, other: &Image) -> PixpackResult<()> {
        if other.width != self.width || other.height != self.height || other.depth != self.depth {
            return Err(PixpackError::contract(format!(
                "copy_from: {}x{}@{} into {}x{}@{}",
                other.width, other.height, other.depth, self.width, self.height, self.depth
            )));
        }
        self.data.copy_from_slice(&other.data);
        Ok(())
    }

    fn index(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.width as usize && y < self.height as usize).then_some((x, y))
    }

    pub(crate) fn lane_get(&self, x: usize, y: usize) -> u8 {
        let (byte, shift) = self.depth.lane(x);
        (self.data[y * self.stride + byte] >> shift) & self.depth.mask()
    }

    pub(crate) fn lane_set(&mut self, x: usize, y: usize, value: u8) {
        let (byte, shift) = self.depth.lane(x);
        let mask = self.depth.mask() << shift;
        let b = &mut self.data[y * self.stride + byte];
        *b = (*b & !mask) | ((value << shift) & mask);
    }

    /// Zero the unused bits at the end of every row.
    pub(crate) fn clear_padding(&mut self) {
        let used = (self.width as usize * self.depth.bits() as usize) % 8;
        if used == 0 {
            return;
        }
        let keep = ((1u16 << used) - 1) as u8;
        for row in self.data.chunks_exact_mut(self.stride) {
            if let Some(last) = row.last_mut() {
                *last &= keep;
            }
        }
    }
}

fn layout(width: u32, height: u32, depth: BitDepth) -> PixpackResult<(usize, usize)> {
    if width == 0 || height == 0 {
        return Err(PixpackError::contract(format!(
            "image must be at least 1x1, got {width}x{height}"
        )));
    }
    if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
        return Err(PixpackError::contract(format!(
            "image {width}x{height} exceeds the signed coordinate range"
        )));
    }
    let stride = depth.row_bytes(width);
    let len = stride
        .checked_mul(height as usize)
        .ok_or_else(|| PixpackError::contract("image byte size overflow"))?;
    Ok((stride, len))
}

#[cfg(test)]
#[path = "../../tests/unit/image/buffer.rs"]
mod tests;
