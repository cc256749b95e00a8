//! Per-pixel reference implementations.
//!
//! Every function here is written only in terms of [`Image::get_pixel`] and
//! [`Image::set_pixel`] (which drops out-of-range writes). They are slow on
//! purpose and serve as the oracle the packed operators are checked against.

use crate::foundation::error::PixpackResult;
use crate::image::buffer::Image;

/// Which source pixels the golden blit writes, and with what value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GoldenInk {
    /// Non-zero source pixels, own value (transparent blit).
    NonZero,
    /// Every source pixel, own value (opaque blit).
    All,
    /// Non-zero source pixels, fixed color (stencil).
    Fixed(u8),
}

fn px(img: &Image, x: i32, y: i32) -> u8 {
    img.get_pixel(x, y).unwrap_or(0)
}

fn dims(img: &Image) -> (i32, i32) {
    (img.width() as i32, img.height() as i32)
}

pub fn golden_draw_transparent_image(img: &mut Image, from: &Image, x: i32, y: i32, ink: GoldenInk) {
    let (w, h) = dims(from);
    for i in 0..w {
        for j in 0..h {
            let pix = px(from, i, j);
            if pix != 0 || ink == GoldenInk::All {
                let v = match ink {
                    GoldenInk::Fixed(c) => c,
                    _ => pix,
                };
                img.set_pixel(x.saturating_add(i), y.saturating_add(j), v);
            }
        }
    }
}

pub fn golden_fill_rect(img: &mut Image, x: i32, y: i32, w: i32, h: i32, c: u8) {
    for i in 0..w {
        for j in 0..h {
            img.set_pixel(x.saturating_add(i), y.saturating_add(j), c);
        }
    }
}

pub fn golden_fill(img: &mut Image, c: u8) {
    let (w, h) = dims(img);
    golden_fill_rect(img, 0, 0, w, h, c);
}

pub fn golden_flip_x(img: &mut Image) {
    let src = img.clone();
    let (w, h) = dims(img);
    for x in 0..w {
        for y in 0..h {
            img.set_pixel(x, y, px(&src, w - 1 - x, y));
        }
    }
}

pub fn golden_flip_y(img: &mut Image) {
    let src = img.clone();
    let (w, h) = dims(img);
    for x in 0..w {
        for y in 0..h {
            img.set_pixel(x, y, px(&src, x, h - 1 - y));
        }
    }
}

/// Pixels read from outside the source count as 0.
pub fn golden_scroll(img: &mut Image, dx: i32, dy: i32) {
    let src = img.clone();
    let (w, h) = dims(img);
    for x in 0..w {
        for y in 0..h {
            let sx = i64::from(x) - i64::from(dx);
            let sy = i64::from(y) - i64::from(dy);
            let v = match (i32::try_from(sx), i32::try_from(sy)) {
                (Ok(sx), Ok(sy)) => px(&src, sx, sy),
                _ => 0,
            };
            img.set_pixel(x, y, v);
        }
    }
}

pub fn golden_replace(img: &mut Image, from: u8, to: u8) {
    let mask = img.depth().mask();
    let (w, h) = dims(img);
    for x in 0..w {
        for y in 0..h {
            if px(img, x, y) == from & mask {
                img.set_pixel(x, y, to);
            }
        }
    }
}

pub fn golden_doubled_x(img: &Image) -> PixpackResult<Image> {
    let mut out = Image::new(img.width().saturating_mul(2), img.height(), img.depth())?;
    let (w, h) = dims(&out);
    for x in 0..w {
        for y in 0..h {
            out.set_pixel(x, y, px(img, x / 2, y));
        }
    }
    Ok(out)
}

pub fn golden_doubled_y(img: &Image) -> PixpackResult<Image> {
    let mut out = Image::new(img.width(), img.height().saturating_mul(2), img.depth())?;
    let (w, h) = dims(&out);
    for x in 0..w {
        for y in 0..h {
            out.set_pixel(x, y, px(img, x, y / 2));
        }
    }
    Ok(out)
}

pub fn golden_doubled(img: &Image) -> PixpackResult<Image> {
    let mut out = Image::new(
        img.width().saturating_mul(2),
        img.height().saturating_mul(2),
        img.depth(),
    )?;
    let (w, h) = dims(&out);
    for x in 0..w {
        for y in 0..h {
            out.set_pixel(x, y, px(img, x / 2, y / 2));
        }
    }
    Ok(out)
}

/// Plain Bresenham, every step through `set_pixel`.
pub fn golden_draw_line(img: &mut Image, x0: i32, y0: i32, x1: i32, y1: i32, c: u8) {
    let (x1, y1) = (i64::from(x1), i64::from(y1));
    let (mut x, mut y) = (i64::from(x0), i64::from(y0));
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        if let (Ok(px), Ok(py)) = (i32::try_from(x), i32::try_from(y)) {
            img.set_pixel(px, py, c);
        }
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/check/golden.rs"]
mod tests;
