//! Randomized differential exerciser.
//!
//! Two buffers are kept byte-for-byte twins: every operator is applied to the
//! first with the packed implementation and to the second with the golden
//! reference, then the two are compared pixel by pixel. The first mismatch is
//! returned as a [`Divergence`] carrying the coordinate, both values and a
//! window of raw bytes from each buffer.

use rayon::prelude::*;

use crate::check::golden::{self, GoldenInk};
use crate::foundation::core::BitDepth;
use crate::foundation::error::{PixpackError, PixpackResult};
use crate::image::buffer::Image;
use crate::ops::{blit, rect};

/// Bytes dumped before the divergent pixel's byte.
const WINDOW_BEFORE: usize = 2;
/// Total bytes dumped per buffer.
const WINDOW_LEN: usize = 16;

/// Deterministic PCG-XSH-RR generator.
#[derive(Clone, Debug)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        let mut rng = Self {
            state: seed.wrapping_add(0x9E37_79B9_7F4A_7C15).wrapping_mul(0x5851_F42D_4C95_7F2D),
        };
        rng.next_u32();
        rng
    }

    pub fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.state = old
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        let xorshifted = (((old >> 18) ^ old) >> 27) as u32;
        let rot = (old >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// Uniform-ish value in `[min, max)`. Requires `min < max`.
    pub fn range(&mut self, min: i32, max: i32) -> i32 {
        let span = (i64::from(max) - i64::from(min)).max(1) as u64;
        (i64::from(min) + (u64::from(self.next_u32()) % span) as i64) as i32
    }

    /// A random pixel value valid at `depth`.
    pub fn color(&mut self, depth: BitDepth) -> u8 {
        (self.next_u32() as u8) & depth.mask()
    }
}

/// Every pixel set to a random value.
pub fn fill_random(img: &mut Image, rng: &mut Rng) {
    let depth = img.depth();
    for x in 0..img.width() as i32 {
        for y in 0..img.height() as i32 {
            img.set_pixel(x, y, rng.color(depth));
        }
    }
}

pub fn random_image(width: u32, height: u32, depth: BitDepth, rng: &mut Rng) -> PixpackResult<Image> {
    let mut img = Image::new(width, height, depth)?;
    fill_random(&mut img, rng);
    Ok(img)
}

/// First differing pixel between an optimized result and its golden twin.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PixelMismatch {
    pub op: String,
    pub x: u32,
    pub y: u32,
    /// Golden value.
    pub expected: u8,
    /// Optimized value.
    pub actual: u8,
    /// Raw bytes of the golden buffer around the pixel.
    pub expected_bytes: Vec<u8>,
    /// Raw bytes of the optimized buffer around the pixel.
    pub actual_bytes: Vec<u8>,
}

/// Ways an optimized result can disagree with the golden one.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Divergence {
    /// Result buffers differ in shape.
    Dimensions {
        op: String,
        expected: (u32, u32, BitDepth),
        actual: (u32, u32, BitDepth),
    },
    /// A pixel differs.
    Pixel(PixelMismatch),
}

impl std::fmt::Display for Divergence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Divergence::Dimensions {
                op,
                expected,
                actual,
            } => write!(
                f,
                "{op}: invalid sizes: {}x{}@{} vs {}x{}@{}",
                actual.0, actual.1, actual.2, expected.0, expected.1, expected.2
            ),
            Divergence::Pixel(m) => {
                writeln!(
                    f,
                    "{}: pixel mismatch at {},{}: {} vs {}",
                    m.op, m.x, m.y, m.actual, m.expected
                )?;
                write!(f, "A:")?;
                for b in &m.actual_bytes {
                    write!(f, " {b:02x}")?;
                }
                write!(f, "\nB:")?;
                for b in &m.expected_bytes {
                    write!(f, " {b:02x}")?;
                }
                Ok(())
            }
        }
    }
}

fn byte_window(img: &Image, x: usize, y: usize) -> Vec<u8> {
    let data = img.data();
    let start = img.byte_offset(x, y).saturating_sub(WINDOW_BEFORE);
    let end = (start + WINDOW_LEN).min(data.len());
    data[start..end].to_vec()
}

/// Compare `actual` (optimized) against `expected` (golden) pixel by pixel.
pub fn assert_same(op: &str, actual: &Image, expected: &Image) -> Result<(), Divergence> {
    let shape = |i: &Image| (i.width(), i.height(), i.depth());
    if shape(actual) != shape(expected) {
        return Err(Divergence::Dimensions {
            op: op.to_string(),
            expected: shape(expected),
            actual: shape(actual),
        });
    }
    // padding is always zero, so equal bytes mean equal pixels
    if actual.data() == expected.data() {
        return Ok(());
    }
    for x in 0..actual.width() {
        for y in 0..actual.height() {
            let a = actual.get_pixel(x as i32, y as i32);
            let e = expected.get_pixel(x as i32, y as i32);
            if a != e {
                let (ux, uy) = (x as usize, y as usize);
                return Err(Divergence::Pixel(PixelMismatch {
                    op: op.to_string(),
                    x,
                    y,
                    expected: e.unwrap_or(0),
                    actual: a.unwrap_or(0),
                    expected_bytes: byte_window(expected, ux, uy),
                    actual_bytes: byte_window(actual, ux, uy),
                }));
            }
        }
    }
    Ok(())
}

/// Settings for a differential run.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub seed: u64,
    pub trials: u32,
    pub depths: Vec<BitDepth>,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Sprite sides are drawn from `[1, max_sprite)`.
    pub max_sprite: u32,
    /// Placement coordinates are drawn from `[min_offset, max_offset)`.
    pub min_offset: i32,
    pub max_offset: i32,
    /// Depth of the masks used for the stencil draw.
    pub stencil_depth: BitDepth,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            trials: 500,
            depths: vec![BitDepth::One, BitDepth::Four],
            canvas_width: 160,
            canvas_height: 128,
            max_sprite: 40,
            min_offset: -30,
            max_offset: 200,
            stencil_depth: BitDepth::One,
        }
    }
}

impl HarnessConfig {
    pub fn validate(&self) -> PixpackResult<()> {
        if self.trials == 0 {
            return Err(PixpackError::config("trials must be > 0"));
        }
        if self.depths.is_empty() {
            return Err(PixpackError::config("at least one bit depth is required"));
        }
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(PixpackError::config("canvas must be at least 1x1"));
        }
        if self.max_sprite < 2 || i32::try_from(self.max_sprite).is_err() {
            return Err(PixpackError::config("max_sprite must be in 2..=i32::MAX"));
        }
        if self.min_offset >= self.max_offset {
            return Err(PixpackError::config("min_offset must be < max_offset"));
        }
        Ok(())
    }
}

/// Outcome for one bit depth.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DepthReport {
    pub depth: BitDepth,
    pub trials: u32,
    /// Number of optimized-vs-golden comparisons that passed.
    pub checks: u64,
}

/// Outcome of a full run.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Report {
    pub seed: u64,
    pub depths: Vec<DepthReport>,
}

/// Run every configured depth; depths are independent and run in parallel.
#[tracing::instrument(skip(config), fields(seed = config.seed, trials = config.trials))]
pub fn run(config: &HarnessConfig) -> PixpackResult<Report> {
    config.validate()?;
    let depths = config
        .depths
        .par_iter()
        .map(|&depth| run_depth(config, depth))
        .collect::<PixpackResult<Vec<_>>>()?;
    Ok(Report {
        seed: config.seed,
        depths,
    })
}

struct Checker {
    checks: u64,
}

impl Checker {
    fn check(&mut self, op: &str, actual: &Image, expected: &Image) -> PixpackResult<()> {
        assert_same(op, actual, expected).map_err(|d| {
            tracing::debug!(%d, "optimized result diverged from golden");
            PixpackError::from(d)
        })?;
        self.checks += 1;
        Ok(())
    }
}

fn refill(s1: &mut Image, s2: &mut Image, rng: &mut Rng) -> PixpackResult<()> {
    fill_random(s1, rng);
    s2.copy_from(s1)
}

/// Run the randomized trials for a single canvas depth.
#[tracing::instrument(skip(config))]
pub fn run_depth(config: &HarnessConfig, depth: BitDepth) -> PixpackResult<DepthReport> {
    config.validate()?;
    let mut rng = Rng::new(config.seed ^ (u64::from(depth.bits()) << 56));
    let mut chk = Checker { checks: 0 };

    let mut s1 = random_image(config.canvas_width, config.canvas_height, depth, &mut rng)?;
    let mut s2 = s1.clone();
    chk.check("clone", &s1, &s2)?;

    let sprite_max = config.max_sprite as i32;
    for _ in 0..config.trials {
        let x = rng.range(config.min_offset, config.max_offset);
        let y = rng.range(config.min_offset, config.max_offset);
        let w = rng.range(1, sprite_max);
        let h = rng.range(1, sprite_max);
        let sprite = random_image(w as u32, h as u32, depth, &mut rng)?;

        refill(&mut s1, &mut s2, &mut rng)?;
        blit::draw_transparent_image(&mut s1, &sprite, x, y)?;
        golden::golden_draw_transparent_image(&mut s2, &sprite, x, y, GoldenInk::NonZero);
        chk.check("draw_transparent_image", &s1, &s2)?;

        refill(&mut s1, &mut s2, &mut rng)?;
        blit::draw_image(&mut s1, &sprite, x, y)?;
        golden::golden_draw_transparent_image(&mut s2, &sprite, x, y, GoldenInk::All);
        chk.check("draw_image", &s1, &s2)?;

        let col = rng.color(depth);
        rect::fill_rect(&mut s1, x, y, w, h, col);
        golden::golden_fill_rect(&mut s2, x, y, w, h, col);
        chk.check("fill_rect", &s1, &s2)?;

        let mask = random_image(w as u32, h as u32, config.stencil_depth, &mut rng)?;
        let c = rng.color(depth);
        refill(&mut s1, &mut s2, &mut rng)?;
        blit::draw_image_core(&mut s1, &mask, x, y, c);
        golden::golden_draw_transparent_image(&mut s2, &mask, x, y, GoldenInk::Fixed(c));
        chk.check("draw_image_core", &s1, &s2)?;

        let x1 = x.saturating_add(rng.range(-w, w + 1));
        let y1 = y.saturating_add(rng.range(-h, h + 1));
        rect::draw_line(&mut s1, x, y, x1, y1, col);
        golden::golden_draw_line(&mut s2, x, y, x1, y1, col);
        chk.check("draw_line", &s1, &s2)?;

        let (from, to) = (rng.color(depth), rng.color(depth));
        rect::replace(&mut s1, from, to);
        golden::golden_replace(&mut s2, from, to);
        chk.check("replace", &s1, &s2)?;

        let (dx, dy) = (rng.range(-w, w + 1), rng.range(-h, h + 1));
        rect::scroll(&mut s1, dx, dy);
        golden::golden_scroll(&mut s2, dx, dy);
        chk.check("scroll", &s1, &s2)?;

        rect::flip_x(&mut s1);
        golden::golden_flip_x(&mut s2);
        chk.check("flip_x", &s1, &s2)?;

        rect::flip_y(&mut s1);
        golden::golden_flip_y(&mut s2);
        chk.check("flip_y", &s1, &s2)?;

        let mut a = sprite.clone();
        let mut b = sprite.clone();
        rect::fill(&mut a, col);
        golden::golden_fill(&mut b, col);
        chk.check("fill", &a, &b)?;

        chk.check("doubled_x", &rect::doubled_x(&sprite)?, &golden::golden_doubled_x(&sprite)?)?;
        chk.check("doubled_y", &rect::doubled_y(&sprite)?, &golden::golden_doubled_y(&sprite)?)?;
        chk.check("doubled", &rect::doubled(&sprite)?, &golden::golden_doubled(&sprite)?)?;
    }

    tracing::info!(%depth, checks = chk.checks, "differential run passed");
    Ok(DepthReport {
        depth,
        trials: config.trials,
        checks: chk.checks,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/check/harness.rs"]
mod tests;
