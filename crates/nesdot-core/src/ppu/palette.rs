//! Palette RAM and the derived output palette.

use crate::{
    mem_block::ppu::PaletteRam,
    memory::{PALETTE_BASE, PALETTE_RAM_SIZE},
};

use super::registers::Mask;

/// Palette contents observed on a freshly powered 2C02.
pub(crate) const POWER_UP_PALETTE: [u8; PALETTE_RAM_SIZE] = [
    0x09, 0x01, 0x00, 0x01, 0x00, 0x02, 0x02, 0x0D, 0x08, 0x10, 0x08, 0x24, 0x00, 0x00, 0x04, 0x2C,
    0x09, 0x01, 0x34, 0x03, 0x00, 0x04, 0x00, 0x14, 0x08, 0x3A, 0x00, 0x02, 0x00, 0x20, 0x2C, 0x08,
];

/// Optional remap from the 64 hardware color indices to caller-chosen indices.
pub type ColorMap = [u8; 64];

/// Palette RAM plus a pre-multiplied copy holding the final 9-bit output
/// index for every entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Palette {
    ram: PaletteRam,
    output: [u16; PALETTE_RAM_SIZE],
    coloring: u8,
    emphasis: u16,
    color_map: Option<Box<ColorMap>>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

impl Palette {
    pub(crate) fn new() -> Self {
        let mut palette = Self {
            ram: PaletteRam::new(),
            output: [0; PALETTE_RAM_SIZE],
            coloring: 0x3F,
            emphasis: 0,
            color_map: None,
        };
        palette.load(&POWER_UP_PALETTE);
        palette
    }

    /// Entry addressed by a `$3F00-$3FFF` bus address. `$3F10/$14/$18/$1C`
    /// fold onto the background entries.
    #[inline]
    pub(crate) fn index(addr: u16) -> usize {
        let index = usize::from(addr.wrapping_sub(PALETTE_BASE)) % PALETTE_RAM_SIZE;
        if index & 0x13 == 0x10 {
            index & 0x0F
        } else {
            index
        }
    }

    pub(crate) fn read(&self, addr: u16) -> u8 {
        self.ram[Self::index(addr)] & self.coloring
    }

    pub(crate) fn write(&mut self, addr: u16, value: u8) {
        let index = Self::index(addr);
        self.ram[index] = value & 0x3F;
        self.refresh(index);
        if index & 0x03 == 0 {
            self.refresh(index | 0x10);
        }
    }

    /// Picks up grayscale and emphasis changes from `$2001`.
    pub(crate) fn set_mask(&mut self, mask: Mask) {
        let coloring = mask.coloring();
        let emphasis = mask.emphasis();
        if coloring != self.coloring || emphasis != self.emphasis {
            self.coloring = coloring;
            self.emphasis = emphasis;
            self.refresh_all();
        }
    }

    pub(crate) fn set_color_map(&mut self, map: Option<ColorMap>) {
        self.color_map = map.map(Box::new);
        self.refresh_all();
    }

    /// Final output index for palette entry `index` (0..32).
    #[inline]
    pub(crate) fn output(&self, index: usize) -> u16 {
        self.output[index % PALETTE_RAM_SIZE]
    }

    pub(crate) fn ram(&self) -> &PaletteRam {
        &self.ram
    }

    /// Replaces all 32 bytes, as on power-up or state load.
    pub(crate) fn load(&mut self, bytes: &[u8; PALETTE_RAM_SIZE]) {
        for (slot, byte) in self.ram.iter_mut().zip(bytes) {
            *slot = byte & 0x3F;
        }
        self.refresh_all();
    }

    fn refresh_all(&mut self) {
        for index in 0..PALETTE_RAM_SIZE {
            self.refresh(index);
        }
    }

    fn refresh(&mut self, index: usize) {
        let raw = self.ram[Self::index(PALETTE_BASE + index as u16)];
        let color = match &self.color_map {
            Some(map) => map[usize::from(raw & 0x3F)],
            None => raw,
        };
        self.output[index] = u16::from(color & self.coloring) | self.emphasis;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprite_backdrop_entries_mirror_background() {
        let mut palette = Palette::new();
        palette.write(0x3F10, 0x21);
        assert_eq!(palette.read(0x3F00), 0x21);
        assert_eq!(palette.output(0x10), 0x21);
        assert_eq!(palette.output(0x00), 0x21);

        palette.write(0x3F04, 0x16);
        assert_eq!(palette.read(0x3F14), 0x16);
        assert_eq!(palette.output(0x14), 0x16);

        // $3F11 is a real sprite entry.
        palette.write(0x3F11, 0x30);
        assert_eq!(palette.read(0x3F01), POWER_UP_PALETTE[1]);
        // Mirrors every 32 bytes up to $3FFF.
        assert_eq!(palette.read(0x3FF1), 0x30);
    }

    #[test]
    fn grayscale_and_emphasis_reach_output() {
        let mut palette = Palette::new();
        palette.write(0x3F01, 0x2A);
        palette.set_mask(Mask::GRAYSCALE | Mask::EMPHASIZE_GREEN);
        assert_eq!(palette.output(1), 0x20 | 0x80);
        assert_eq!(palette.read(0x3F01), 0x20);
        palette.set_mask(Mask::empty());
        assert_eq!(palette.output(1), 0x2A);
    }

    #[test]
    fn color_map_applies_before_masks() {
        let mut palette = Palette::new();
        let mut map = [0u8; 64];
        for (i, slot) in map.iter_mut().enumerate() {
            *slot = 63 - i as u8;
        }
        palette.write(0x3F02, 0x01);
        palette.set_color_map(Some(map));
        assert_eq!(palette.output(2), 62);
        palette.set_color_map(None);
        assert_eq!(palette.output(2), 1);
    }
}
