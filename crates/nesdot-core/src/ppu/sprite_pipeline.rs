//! Sprite pattern fetches (dots 257-320) and the resolved strips they produce.

use crate::memory::{OAM_ENTRIES, OAM_ENTRY_SIZE};

use super::{
    background::{interleave, packed_pixel},
    sprite::{SpriteAttributes, SpriteEntry},
};

/// Eight decoded pixels of one object on the line being drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub(crate) struct ObjectStrip {
    pub(crate) x: u8,
    /// `0x10 | palette << 2 | color`, or 0 where transparent.
    pub(crate) pixels: [u8; 8],
    pub(crate) behind: bool,
    pub(crate) zero: bool,
}

/// First opaque object pixel covering a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SpritePixel {
    pub(crate) value: u8,
    pub(crate) behind: bool,
    pub(crate) zero: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SpritePipeline {
    strips: [ObjectStrip; OAM_ENTRIES],
    len: usize,
    /// Secondary OAM entries evaluated for the upcoming line.
    pending: usize,
    zero_in_range: bool,
    entry: SpriteEntry,
    pattern_low: u8,
}

impl Default for SpritePipeline {
    fn default() -> Self {
        Self {
            strips: [ObjectStrip::default(); OAM_ENTRIES],
            len: 0,
            pending: 0,
            zero_in_range: false,
            entry: SpriteEntry::EMPTY,
            pattern_low: 0,
        }
    }
}

impl SpritePipeline {
    /// Dot 257: drops the strips of the finished line and takes over the
    /// evaluation result.
    pub(crate) fn prepare(&mut self, pending: usize, zero_in_range: bool) {
        self.len = 0;
        self.pending = pending;
        self.zero_in_range = zero_in_range;
    }

    pub(crate) fn pending(&self) -> usize {
        self.pending
    }

    /// Latches secondary OAM slot `slot`, or the cleared `$FF` entry when the
    /// slot is unused.
    pub(crate) fn select(&mut self, slot: usize, secondary: &[u8]) {
        self.entry = if slot < self.pending {
            let base = slot * OAM_ENTRY_SIZE;
            SpriteEntry::from_bytes(&secondary[base..base + OAM_ENTRY_SIZE])
        } else {
            SpriteEntry::EMPTY
        };
    }

    pub(crate) fn entry(&self) -> &SpriteEntry {
        &self.entry
    }

    pub(crate) fn latch_low(&mut self, value: u8) {
        self.pattern_low = value;
    }

    /// High plane arrived: decode the latched entry into a strip.
    pub(crate) fn commit(&mut self, slot: usize, pattern_high: u8) {
        if slot >= self.pending || self.len >= self.strips.len() {
            return;
        }
        let attributes = self.entry.attributes;
        let (low, high) = if attributes.contains(SpriteAttributes::FLIP_HORIZONTAL) {
            (self.pattern_low.reverse_bits(), pattern_high.reverse_bits())
        } else {
            (self.pattern_low, pattern_high)
        };
        let word = interleave(low, high);
        let base = 0x10 | (attributes.palette() << 2);
        let mut pixels = [0u8; 8];
        for (i, pixel) in pixels.iter_mut().enumerate() {
            let color = packed_pixel(word, i);
            if color != 0 {
                *pixel = base | color;
            }
        }
        self.strips[self.len] = ObjectStrip {
            x: self.entry.x,
            pixels,
            behind: attributes.contains(SpriteAttributes::PRIORITY_BEHIND_BACKGROUND),
            zero: slot == 0 && self.zero_in_range,
        };
        self.len += 1;
    }

    /// Lowest-index opaque object pixel at column `x`.
    #[inline]
    pub(crate) fn pixel(&self, x: usize) -> Option<SpritePixel> {
        self.strips[..self.len].iter().find_map(|strip| {
            let dx = x.wrapping_sub(usize::from(strip.x));
            let value = *strip.pixels.get(dx)?;
            (value != 0).then_some(SpritePixel {
                value,
                behind: strip.behind,
                zero: strip.zero,
            })
        })
    }

    #[cfg(test)]
    pub(crate) fn strips(&self) -> &[ObjectStrip] {
        &self.strips[..self.len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline_with(entries: &[[u8; 4]], zero: bool) -> (SpritePipeline, Vec<u8>) {
        let mut secondary = vec![0xFF; 32];
        for (slot, entry) in entries.iter().enumerate() {
            secondary[slot * 4..slot * 4 + 4].copy_from_slice(entry);
        }
        let mut pipeline = SpritePipeline::default();
        pipeline.prepare(entries.len(), zero);
        (pipeline, secondary)
    }

    #[test]
    fn horizontal_flip_reverses_strip() {
        let (mut pipeline, secondary) = pipeline_with(&[[0, 0, 0x41, 10]], true);
        pipeline.select(0, &secondary);
        pipeline.latch_low(0b1000_0000);
        pipeline.commit(0, 0b0000_0000);

        let strip = pipeline.strips()[0];
        assert_eq!(strip.pixels, [0, 0, 0, 0, 0, 0, 0, 0x15]);
        assert!(strip.zero);
        assert_eq!(pipeline.pixel(17).map(|p| p.value), Some(0x15));
        assert_eq!(pipeline.pixel(10), None);
    }

    #[test]
    fn earlier_slot_wins_and_transparent_pixels_fall_through() {
        let (mut pipeline, secondary) = pipeline_with(&[[0, 0, 0x20, 4], [0, 0, 0x03, 0]], false);
        pipeline.select(0, &secondary);
        pipeline.latch_low(0b0000_1111);
        pipeline.commit(0, 0);
        pipeline.select(1, &secondary);
        pipeline.latch_low(0xFF);
        pipeline.commit(1, 0xFF);

        let front = pipeline.pixel(4).expect("slot 1 shows through");
        assert_eq!(front.value, 0x1F);
        let back = pipeline.pixel(8).expect("slot 0 opaque");
        assert_eq!(back.value, 0x11);
        assert!(back.behind);
        assert!(!back.zero);
        // Past the right edge of both strips.
        assert_eq!(pipeline.pixel(12), None);
    }

    #[test]
    fn unused_slots_do_not_produce_strips() {
        let (mut pipeline, secondary) = pipeline_with(&[], false);
        pipeline.select(3, &secondary);
        assert_eq!(*pipeline.entry(), SpriteEntry::EMPTY);
        pipeline.commit(3, 0xFF);
        assert!(pipeline.strips().is_empty());
    }
}
