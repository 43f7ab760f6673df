use bitflags::bitflags;

use crate::memory::PATTERN_TABLE_1;

bitflags! {
    /// Attribute bits stored in sprite byte 2.
    ///
    /// Bit layout:
    /// ```text
    /// 7 6 5 4 3 2 1 0
    /// V H P . . . p p
    /// ```
    /// Bits 2-4 do not exist in OAM and read back as zero.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub(crate) struct SpriteAttributes: u8 {
        const PALETTE = 0b0000_0011;
        const PRIORITY_BEHIND_BACKGROUND = 0b0010_0000;
        const FLIP_HORIZONTAL = 0b0100_0000;
        const FLIP_VERTICAL = 0b1000_0000;
    }
}

impl SpriteAttributes {
    /// Bits that survive a write to byte 2 of an OAM entry.
    pub(crate) const STORED_MASK: u8 = 0xE3;

    pub(crate) fn palette(self) -> u8 {
        (self & Self::PALETTE).bits()
    }
}

/// One secondary OAM entry as consumed by the pattern fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SpriteEntry {
    pub(crate) y: u8,
    pub(crate) tile: u8,
    pub(crate) attributes: SpriteAttributes,
    pub(crate) x: u8,
}

impl SpriteEntry {
    /// Cleared secondary OAM contents, fetched for unused slots.
    pub(crate) const EMPTY: Self = Self {
        y: 0xFF,
        tile: 0xFF,
        attributes: SpriteAttributes::all(),
        x: 0xFF,
    };

    pub(crate) fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            y: bytes[0],
            tile: bytes[1],
            attributes: SpriteAttributes::from_bits_truncate(bytes[2]),
            x: bytes[3],
        }
    }

    /// Pattern address of the low plane for this entry on `scanline`.
    ///
    /// `table` is the `$2000` sprite table and only applies to 8x8 objects;
    /// 8x16 objects take their table from bit 0 of the tile index.
    pub(crate) fn pattern_addr(&self, scanline: i16, height: u8, table: u16) -> u16 {
        let mut row = (scanline as u8).wrapping_sub(self.y) & (height - 1);
        if self.attributes.contains(SpriteAttributes::FLIP_VERTICAL) {
            row ^= height - 1;
        }
        let (table, tile) = if height == 16 {
            let table = if self.tile & 1 != 0 { PATTERN_TABLE_1 } else { 0 };
            let tile = (self.tile & 0xFE) + u8::from(row >= 8);
            (table, tile)
        } else {
            (table, self.tile)
        };
        table | (u16::from(tile) << 4) | u16::from(row & 7)
    }
}
