//! Whole-image and rectangular operators working directly on packed rows.

use crate::foundation::core::Rect;
use crate::foundation::error::PixpackResult;
use crate::image::buffer::Image;
use crate::image::tables::{Ink, expand_table, fill_span, write_lanes};

/// Set every pixel to `color` (masked to the bit depth).
pub fn fill(img: &mut Image, color: u8) {
    let depth = img.depth();
    let width = img.width() as usize;
    for y in 0..img.height() as usize {
        fill_span(img.row_mut(y), depth, 0, width, color);
    }
}

/// Fill `[x, x+w) x [y, y+h)` clipped to the image. Empty or fully outside
/// rectangles are a no-op.
pub fn fill_rect(img: &mut Image, x: i32, y: i32, w: i32, h: i32, color: u8) {
    let Some(clip) = Rect::new(x, y, w, h).clip(img.width(), img.height()) else {
        return;
    };
    let depth = img.depth();
    for row in clip.y0..clip.y1 {
        fill_span(img.row_mut(row), depth, clip.x0, clip.x1, color);
    }
}

/// Mirror left to right.
pub fn flip_x(img: &mut Image) {
    let depth = img.depth();
    let width = img.width() as usize;
    let table = expand_table(depth);
    let mut scratch = Vec::with_capacity(width);
    for y in 0..img.height() as usize {
        let row = img.row_mut(y);
        table.unpack_span(row, 0, width, &mut scratch);
        scratch.reverse();
        write_lanes(row, depth, 0, &scratch, Ink::Copy);
    }
}

/// Mirror top to bottom.
pub fn flip_y(img: &mut Image) {
    let stride = img.stride();
    let height = img.height() as usize;
    let data = img.data_mut();
    for y in 0..height / 2 {
        let (top, bottom) = data.split_at_mut((height - 1 - y) * stride);
        top[y * stride..(y + 1) * stride].swap_with_slice(&mut bottom[..stride]);
    }
}

/// Move the contents by `(dx, dy)`: pixel `(x, y)` lands on `(x+dx, y+dy)`.
///
/// Nothing wraps. Pixels pushed past an edge are lost and the uncovered
/// strip is filled with 0.
pub fn scroll(img: &mut Image, dx: i32, dy: i32) {
    if dx == 0 && dy == 0 {
        return;
    }
    let width = img.width() as usize;
    let height = img.height() as usize;
    let nx = dx.unsigned_abs() as usize;
    let ny = dy.unsigned_abs() as usize;
    if nx >= width || ny >= height {
        fill(img, 0);
        return;
    }

    if ny != 0 {
        let shift = ny * img.stride();
        let data = img.data_mut();
        let len = data.len();
        if dy > 0 {
            data.copy_within(0..len - shift, shift);
            data[..shift].fill(0);
        } else {
            data.copy_within(shift.., 0);
            data[len - shift..].fill(0);
        }
    }

    if nx == 0 {
        return;
    }
    let depth = img.depth();
    let ppb = depth.pixels_per_byte();
    if nx % ppb == 0 {
        let k = nx / ppb;
        let stride = img.stride();
        for y in 0..height {
            let row = img.row_mut(y);
            if dx > 0 {
                row.copy_within(0..stride - k, k);
                row[..k].fill(0);
            } else {
                row.copy_within(k.., 0);
                row[stride - k..].fill(0);
            }
        }
        // lanes shifted right run into the row padding
        img.clear_padding();
        return;
    }

    let table = expand_table(depth);
    let mut scratch = Vec::with_capacity(width);
    for y in 0..height {
        let row = img.row_mut(y);
        table.unpack_span(row, 0, width, &mut scratch);
        if dx > 0 {
            scratch.copy_within(0..width - nx, nx);
            scratch[..nx].fill(0);
        } else {
            scratch.copy_within(nx.., 0);
            scratch[width - nx..].fill(0);
        }
        write_lanes(row, depth, 0, &scratch, Ink::Copy);
    }
}

/// A copy twice as wide; every pixel becomes a 2x1 block.
pub fn doubled_x(img: &Image) -> PixpackResult<Image> {
    let depth = img.depth();
    let width = img.width() as usize;
    let mut out = Image::new(img.width().saturating_mul(2), img.height(), depth)?;
    let table = expand_table(depth);
    let mut scratch = Vec::with_capacity(width);
    let mut wide = Vec::with_capacity(width * 2);
    for y in 0..img.height() as usize {
        table.unpack_span(img.row(y), 0, width, &mut scratch);
        wide.clear();
        wide.extend(scratch.iter().flat_map(|&v| [v, v]));
        write_lanes(out.row_mut(y), depth, 0, &wide, Ink::Copy);
    }
    Ok(out)
}

/// A copy twice as tall; every pixel becomes a 1x2 block.
pub fn doubled_y(img: &Image) -> PixpackResult<Image> {
    let mut out = Image::new(img.width(), img.height().saturating_mul(2), img.depth())?;
    for y in 0..img.height() as usize {
        let src = img.row(y);
        out.row_mut(2 * y).copy_from_slice(src);
        out.row_mut(2 * y + 1).copy_from_slice(src);
    }
    Ok(out)
}

/// A copy doubled on both axes; every pixel becomes a 2x2 block.
pub fn doubled(img: &Image) -> PixpackResult<Image> {
    doubled_y(&doubled_x(img)?)
}

/// Rewrite every pixel equal to `from` as `to` (both masked to the bit depth).
pub fn replace(img: &mut Image, from: u8, to: u8) {
    let depth = img.depth();
    let (from, to) = (from & depth.mask(), to & depth.mask());
    if from == to {
        return;
    }
    let width = img.width() as usize;
    let table = expand_table(depth);
    let mut scratch = Vec::with_capacity(width);
    for y in 0..img.height() as usize {
        let row = img.row_mut(y);
        table.unpack_span(row, 0, width, &mut scratch);
        if !scratch.contains(&from) {
            continue;
        }
        for v in scratch.iter_mut().filter(|v| **v == from) {
            *v = to;
        }
        write_lanes(row, depth, 0, &scratch, Ink::Copy);
    }
}

/// Draw a one-pixel line from `(x0, y0)` to `(x1, y1)`, both ends inclusive,
/// clipped to the image.
pub fn draw_line(img: &mut Image, x0: i32, y0: i32, x1: i32, y1: i32, color: u8) {
    let (w, h) = (i64::from(img.width()), i64::from(img.height()));
    let (x0, y0, x1, y1) = (i64::from(x0), i64::from(y0), i64::from(x1), i64::from(y1));

    let (lo_x, hi_x) = (x0.min(x1).max(0), x0.max(x1).min(w - 1));
    let (lo_y, hi_y) = (y0.min(y1).max(0), y0.max(y1).min(h - 1));
    if lo_x > hi_x || lo_y > hi_y {
        return;
    }
    // straight lines are a one-pixel rectangle
    if y0 == y1 || x0 == x1 {
        let depth = img.depth();
        for y in lo_y..=hi_y {
            fill_span(img.row_mut(y as usize), depth, lo_x as usize, hi_x as usize + 1, color);
        }
        return;
    }

    // Bresenham advances the major axis on every step; after `k` steps the
    // minor offset is `(2k * minor + major) / (2 * major)`. Solve for the
    // visible range of `k` instead of walking in from off-image.
    let (adx, ady) = ((x1 - x0).abs(), (y1 - y0).abs());
    let (sx, sy) = ((x1 - x0).signum(), (y1 - y0).signum());
    let x_major = adx >= ady;
    let (major, minor) = if x_major { (adx, ady) } else { (ady, adx) };
    let ((c, s, size), (mc, ms, msize)) = if x_major {
        ((x0, sx, w), (y0, sy, h))
    } else {
        ((y0, sy, h), (x0, sx, w))
    };

    let (major, minor) = (i128::from(major), i128::from(minor));
    let (k_lo, k_hi) = visible_offsets(c, s, size);
    let (m_lo, m_hi) = visible_offsets(mc, ms, msize);
    if m_hi < 0 {
        return;
    }
    let mut k_lo = i128::from(k_lo.max(0));
    let mut k_hi = i128::from(k_hi).min(major);
    if m_lo > 0 {
        k_lo = k_lo.max(ceil_div(2 * major * i128::from(m_lo) - major, 2 * minor));
    }
    k_hi = k_hi.min((2 * major * (i128::from(m_hi) + 1) - major - 1) / (2 * minor));

    let mut k = k_lo;
    while k <= k_hi {
        let m = (2 * k * minor + major) / (2 * major);
        // both offsets are at most the i32 span
        let (k64, m64) = (k as i64, m as i64);
        let (x, y) = if x_major {
            (x0 + sx * k64, y0 + sy * m64)
        } else {
            (x0 + sx * m64, y0 + sy * k64)
        };
        img.lane_set(x as usize, y as usize, color);
        k += 1;
    }
}

/// Offsets `t` for which `c + s * t` lands in `[0, size)`.
fn visible_offsets(c: i64, s: i64, size: i64) -> (i64, i64) {
    if s > 0 {
        (-c, size - 1 - c)
    } else {
        (c - size + 1, c)
    }
}

/// Ceiling division for a positive divisor.
fn ceil_div(a: i128, b: i128) -> i128 {
    -((-a).div_euclid(b))
}

#[cfg(test)]
#[path = "../../tests/unit/ops/rect.rs"]
mod tests;
