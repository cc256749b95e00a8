//! pixpack is a packed-pixel framebuffer engine for memory-constrained displays.
//!
//! An [`Image`] stores pixels at 1, 2, 4 or 8 bits each, row-major, every row
//! padded to a whole byte. The drawing operators work on that packed layout
//! directly instead of going through a per-pixel abstraction.
//!
//! # Layers
//!
//! 1. **Buffer**: [`Image`] with bit-exact [`Image::get_pixel`] / [`Image::set_pixel`].
//! 2. **Tables**: [`ExpandTable`] spreads the lanes of a packed byte one per byte.
//! 3. **Rectangular operators**: [`fill`], [`fill_rect`], [`flip_x`], [`flip_y`],
//!    [`scroll`], [`doubled_x`], [`doubled_y`], [`doubled`], [`replace`], [`draw_line`].
//! 4. **Composition**: [`draw_image`], [`draw_transparent_image`],
//!    [`draw_image_core`] (stencil) and [`overlaps_with`].
//! 5. **Checking**: the [`golden`] per-pixel reference and the randomized
//!    differential [`run`] that compares it against the packed operators.
//!
//! Rectangles that reach outside a buffer are clipped, never reported. Errors
//! ([`PixpackError`]) are reserved for broken preconditions and for
//! divergences found by the checker.
#![forbid(unsafe_code)]

mod check;
mod foundation;
mod image;
mod ops;

pub use check::golden;
pub use check::harness::{
    DepthReport, Divergence, HarnessConfig, PixelMismatch, Report, Rng, assert_same, fill_random,
    random_image, run, run_depth,
};
pub use foundation::core::{BitDepth, ClipRect, Rect};
pub use foundation::error::{PixpackError, PixpackResult};
pub use image::buffer::Image;
pub use image::tables::{ExpandTable, expand_table};
pub use ops::blit::{
    Placement, draw_image, draw_image_core, draw_transparent_image, overlaps_with, placement,
};
pub use ops::rect::{
    doubled, doubled_x, doubled_y, draw_line, fill, fill_rect, flip_x, flip_y, replace, scroll,
};
