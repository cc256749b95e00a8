//! Composition of one packed image onto another.
//!
//! Source rows are unpacked through the expansion table of the source depth
//! and written into the destination lanes, so a 1bpp mask can stencil onto a
//! 4bpp canvas without per-pixel addressing. Same-depth opaque copies whose
//! source and destination columns both start on a byte boundary move whole
//! bytes directly.

use crate::foundation::core::{ClipRect, Rect};
use crate::foundation::error::{PixpackError, PixpackResult};
use crate::image::buffer::Image;
use crate::image::tables::{Ink, expand_table, write_lanes};

/// Where a source image lands when its top-left corner is placed at `(x, y)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Destination pixels covered after clipping.
    pub dest: ClipRect,
    /// Source column feeding `dest.x0`.
    pub src_x: usize,
    /// Source row feeding `dest.y0`.
    pub src_y: usize,
}

/// Clip `src` placed at `(x, y)` against `dest`; `None` when nothing is visible.
pub fn placement(dest: &Image, src: &Image, x: i32, y: i32) -> Option<Placement> {
    // dimensions are bounded by i32::MAX at construction
    let rect = Rect::new(x, y, src.width() as i32, src.height() as i32);
    let clip = rect.clip(dest.width(), dest.height())?;
    Some(Placement {
        dest: clip,
        src_x: (clip.x0 as i64 - i64::from(x)) as usize,
        src_y: (clip.y0 as i64 - i64::from(y)) as usize,
    })
}

/// Whether drawing `other` at `(x, y)` would touch any pixel of `img`.
pub fn overlaps_with(img: &Image, other: &Image, x: i32, y: i32) -> bool {
    placement(img, other, x, y).is_some()
}

/// Opaque copy of `src` onto `dest` at `(x, y)`, clipped. Depths must match.
pub fn draw_image(dest: &mut Image, src: &Image, x: i32, y: i32) -> PixpackResult<()> {
    same_depth("draw_image", dest, src)?;
    compose(dest, src, x, y, Ink::Copy);
    Ok(())
}

/// Copy of `src` onto `dest` at `(x, y)` where zero source pixels are
/// transparent. Depths must match.
pub fn draw_transparent_image(dest: &mut Image, src: &Image, x: i32, y: i32) -> PixpackResult<()> {
    same_depth("draw_transparent_image", dest, src)?;
    compose(dest, src, x, y, Ink::Transparent);
    Ok(())
}

/// Stencil draw: every non-zero pixel of `src` writes `color` into `dest`.
///
/// Any pair of depths is accepted. Returns whether a destination pixel was
/// written.
pub fn draw_image_core(dest: &mut Image, src: &Image, x: i32, y: i32, color: u8) -> bool {
    compose(dest, src, x, y, Ink::Stencil(color))
}

fn same_depth(op: &str, dest: &Image, src: &Image) -> PixpackResult<()> {
    if dest.depth() == src.depth() {
        return Ok(());
    }
    tracing::debug!(op, dest = %dest.depth(), src = %src.depth(), "cross-depth blit rejected");
    Err(PixpackError::contract(format!(
        "{op}: source is {}bpp but destination is {}bpp; use draw_image_core for cross-depth stencils",
        src.depth(),
        dest.depth()
    )))
}

fn compose(dest: &mut Image, src: &Image, x: i32, y: i32, ink: Ink) -> bool {
    let Some(p) = placement(dest, src, x, y) else {
        return false;
    };
    let depth = dest.depth();
    let ppb = depth.pixels_per_byte();
    let width = p.dest.width();

    let whole_bytes = if ink == Ink::Copy
        && src.depth() == depth
        && p.dest.x0 % ppb == 0
        && p.src_x % ppb == 0
    {
        width / ppb
    } else {
        0
    };
    let lanes_done = whole_bytes * ppb;

    let table = expand_table(src.depth());
    let mut scratch = Vec::with_capacity(width);
    let mut wrote = false;
    for r in 0..p.dest.height() {
        let src_row = src.row(p.src_y + r);
        let dst_row = dest.row_mut(p.dest.y0 + r);
        if whole_bytes > 0 {
            let (s, d) = (p.src_x / ppb, p.dest.x0 / ppb);
            dst_row[d..d + whole_bytes].copy_from_slice(&src_row[s..s + whole_bytes]);
            wrote = true;
        }
        if lanes_done < width {
            table.unpack_span(src_row, p.src_x + lanes_done, width - lanes_done, &mut scratch);
            wrote |= write_lanes(dst_row, depth, p.dest.x0 + lanes_done, &scratch, ink);
        }
    }
    wrote
}

#[cfg(test)]
#[path = "../../tests/unit/ops/blit.rs"]
mod tests;
