//! Bit-expansion tables and the lane pack/unpack helpers built on them.
//!
//! An [`ExpandTable`] maps every packed byte to its lanes spread out one per
//! byte (lane 0 in the lowest byte of the `u64` entry). Operators unpack
//! source rows through the table and write them back with [`write_lanes`],
//! which touches each destination byte once and only falls back to masking
//! at the partial bytes of a span.

use std::sync::OnceLock;

use crate::foundation::core::BitDepth;

/// 256-entry lookup from a packed byte to its unpacked lanes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpandTable {
    depth: BitDepth,
    entries: [u64; 256],
}

static TABLES: [OnceLock<ExpandTable>; 4] = [const { OnceLock::new() }; 4];

/// The shared table for `depth`, built on first use.
pub fn expand_table(depth: BitDepth) -> &'static ExpandTable {
    let slot = match depth {
        BitDepth::One => 0,
        BitDepth::Two => 1,
        BitDepth::Four => 2,
        BitDepth::Eight => 3,
    };
    TABLES[slot].get_or_init(|| ExpandTable::build(depth))
}

impl ExpandTable {
    fn build(depth: BitDepth) -> Self {
        let bits = depth.bits();
        let mask = u64::from(depth.mask());
        let mut entries = [0u64; 256];
        for (b, e) in entries.iter_mut().enumerate() {
            let b = b as u64;
            for lane in 0..depth.pixels_per_byte() as u32 {
                *e |= ((b >> (lane * bits)) & mask) << (lane * 8);
            }
        }
        Self { depth, entries }
    }

    pub fn depth(&self) -> BitDepth {
        self.depth
    }

    /// Raw entry: lane `k` of `byte` sits in bits `8k..8k+8`.
    pub fn entry(&self, byte: u8) -> u64 {
        self.entries[usize::from(byte)]
    }

    /// Lanes of `byte`, leftmost pixel first. Only the first
    /// `pixels_per_byte` values are meaningful; the rest are zero.
    pub fn lanes(&self, byte: u8) -> [u8; 8] {
        self.entry(byte).to_le_bytes()
    }

    /// Unpack `n` pixels of a packed `row` starting at pixel `x0` into `out`,
    /// one value per byte.
    pub fn unpack_span(&self, row: &[u8], x0: usize, n: usize, out: &mut Vec<u8>) {
        out.clear();
        if n == 0 {
            return;
        }
        let ppb = self.depth.pixels_per_byte();
        let first = x0 / ppb;
        let last = (x0 + n - 1) / ppb;
        for &b in &row[first..=last] {
            out.extend_from_slice(&self.lanes(b)[..ppb]);
        }
        out.drain(..x0 % ppb);
        out.truncate(n);
    }
}

/// How unpacked source values land in destination lanes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Ink {
    /// Every value is written.
    Copy,
    /// Zero values leave the destination lane alone.
    Transparent,
    /// Non-zero values write the given color instead of themselves.
    Stencil(u8),
}

/// Write `values` into lanes `x0..x0 + values.len()` of a packed row.
///
/// Values are masked to the lane width. Returns whether any lane was written.
pub(crate) fn write_lanes(
    row: &mut [u8],
    depth: BitDepth,
    x0: usize,
    values: &[u8],
    ink: Ink,
) -> bool {
    let bits = depth.bits();
    let mask = depth.mask();
    let ppb = depth.pixels_per_byte();

    let mut wrote = false;
    let mut x = x0;
    let mut rest = values;
    while !rest.is_empty() {
        let lane0 = x % ppb;
        let take = (ppb - lane0).min(rest.len());
        let (chunk, tail) = rest.split_at(take);

        let mut packed = 0u8;
        let mut touched = 0u8;
        for (k, &v) in chunk.iter().enumerate() {
            let out = match ink {
                Ink::Copy => Some(v),
                Ink::Transparent => (v != 0).then_some(v),
                Ink::Stencil(c) => (v != 0).then_some(c),
            };
            if let Some(out) = out {
                let shift = (lane0 + k) as u32 * bits;
                packed |= (out & mask) << shift;
                touched |= mask << shift;
            }
        }

        let byte = &mut row[x / ppb];
        if touched == 0xff {
            *byte = packed;
        } else if touched != 0 {
            *byte = (*byte & !touched) | packed;
        }
        wrote |= touched != 0;

        x += take;
        rest = tail;
    }
    wrote
}

/// Set pixels `x0..x1` of a packed row to `value`.
pub(crate) fn fill_span(row: &mut [u8], depth: BitDepth, x0: usize, x1: usize, value: u8) {
    if x0 >= x1 {
        return;
    }
    let ppb = depth.pixels_per_byte();
    let splat = depth.splat(value);
    let first_full = x0.div_ceil(ppb);
    let end_full = x1 / ppb;
    if first_full >= end_full {
        splat_lanes(row, depth, x0, x1, splat);
        return;
    }
    splat_lanes(row, depth, x0, first_full * ppb, splat);
    row[first_full..end_full].fill(splat);
    splat_lanes(row, depth, end_full * ppb, x1, splat);
}

fn splat_lanes(row: &mut [u8], depth: BitDepth, x0: usize, x1: usize, splat: u8) {
    let ppb = depth.pixels_per_byte();
    let mut x = x0;
    while x < x1 {
        let (byte, shift) = depth.lane(x);
        let n = (ppb - x % ppb).min(x1 - x);
        let span = n as u32 * depth.bits();
        let m = (((1u16 << span) - 1) << shift) as u8;
        row[byte] = (row[byte] & !m) | (splat & m);
        x += n;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/image/tables.rs"]
mod tests;
