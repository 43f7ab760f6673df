//! Background tile latches and the pre-shifted 16-pixel ring.

use once_cell::sync::Lazy;

/// Spreads the eight bits of a pattern byte over the even bits of a word,
/// leftmost pixel in the top pair.
static PLANE_SPREAD: Lazy<[u16; 256]> = Lazy::new(|| {
    let mut table = [0u16; 256];
    for (byte, entry) in table.iter_mut().enumerate() {
        for bit in 0..8 {
            if byte & (1 << bit) != 0 {
                *entry |= 1 << (bit * 2);
            }
        }
    }
    table
});

/// Combines two pattern planes into eight packed 2-bit pixels.
#[inline]
pub(crate) fn interleave(low: u8, high: u8) -> u16 {
    PLANE_SPREAD[usize::from(low)] | (PLANE_SPREAD[usize::from(high)] << 1)
}

/// Color of pixel `i` (0 = leftmost) from an [`interleave`]d word.
#[inline]
pub(crate) fn packed_pixel(word: u16, i: usize) -> u8 {
    ((word >> (14 - 2 * i)) & 0b11) as u8
}

/// Two tiles of decoded background pixels, each `palette << 2 | color`.
///
/// The tile fetched in 8-dot group `g` lands in half `(g + 1) & 1`, which is
/// exactly the half `(x + fine_x) / 8` selects when its pixels are due.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct BgPipeline {
    /// Nametable byte of the tile being fetched.
    pub(crate) tile: u8,
    /// Palette select of the tile being fetched, already shifted left by 2.
    pub(crate) attribute: u8,
    pub(crate) pattern_low: u8,
    pub(crate) pattern_high: u8,
    pixels: [u8; 16],
}

impl BgPipeline {
    pub(crate) fn latch_attribute(&mut self, byte: u8, shift: u8) {
        self.attribute = ((byte >> shift) & 0b11) << 2;
    }

    /// Decodes the latched tile into the ring half owned by the fetch at `dot`.
    pub(crate) fn load(&mut self, dot: u16) {
        let base = (((dot / 8) + 1) & 1) as usize * 8;
        let word = interleave(self.pattern_low, self.pattern_high);
        for (i, slot) in self.pixels[base..base + 8].iter_mut().enumerate() {
            *slot = self.attribute | packed_pixel(word, i);
        }
    }

    /// Background pixel for screen column `x`.
    #[inline]
    pub(crate) fn pixel(&self, x: usize, fine_x: u8) -> u8 {
        self.pixels[(x + usize::from(fine_x)) & 15]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleave_keeps_leftmost_pixel_first() {
        let word = interleave(0b1000_0001, 0b1100_0000);
        assert_eq!(packed_pixel(word, 0), 3);
        assert_eq!(packed_pixel(word, 1), 2);
        assert_eq!(packed_pixel(word, 2), 0);
        assert_eq!(packed_pixel(word, 7), 1);
    }

    #[test]
    fn ring_halves_follow_fetch_groups() {
        let mut bg = BgPipeline::default();
        // Prefetch of tile 0 at dot 328 fills the first half.
        bg.pattern_low = 0xFF;
        bg.latch_attribute(0b0000_1100, 2);
        bg.load(328);
        // Tile 1 at dot 336 fills the second half.
        bg.pattern_low = 0x00;
        bg.pattern_high = 0xFF;
        bg.latch_attribute(0, 0);
        bg.load(336);

        assert_eq!(bg.pixel(0, 0), 0b1101);
        assert_eq!(bg.pixel(7, 0), 0b1101);
        assert_eq!(bg.pixel(8, 0), 0b0010);
        // Fine X shifts the window into the second tile.
        assert_eq!(bg.pixel(5, 3), 0b0010);
        assert_eq!(bg.pixel(4, 3), 0b1101);
    }
}
