use bitflags::bitflags;

bitflags! {
    /// PPU mask register (`$2001`).
    ///
    /// Bit layout:
    /// ```text
    /// 7 6 5 4 3 2 1 0
    /// B G R S B s b g
    /// ```
    /// - `g`: grayscale
    /// - `b`: show background in leftmost 8 pixels
    /// - `s`: show sprites in leftmost 8 pixels
    /// - `B`: background enable
    /// - `S`: sprite enable
    /// - `R/G/B`: color emphasis bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Mask: u8 {
        const GRAYSCALE = 0b0000_0001;
        const SHOW_BACKGROUND_LEFT = 0b0000_0010;
        const SHOW_SPRITES_LEFT = 0b0000_0100;
        const SHOW_BACKGROUND = 0b0000_1000;
        const SHOW_SPRITES = 0b0001_0000;
        const EMPHASIZE_RED = 0b0010_0000;
        const EMPHASIZE_GREEN = 0b0100_0000;
        const EMPHASIZE_BLUE = 0b1000_0000;
    }
}

impl Mask {
    /// Returns `true` when either background or sprite rendering is enabled.
    pub fn rendering_enabled(self) -> bool {
        self.intersects(Mask::SHOW_BACKGROUND | Mask::SHOW_SPRITES)
    }

    /// AND-mask applied to palette entries (`0x30` in grayscale mode).
    pub fn coloring(self) -> u8 {
        if self.contains(Mask::GRAYSCALE) {
            0x30
        } else {
            0x3F
        }
    }

    /// Emphasis bits positioned at bits 6-8 of a 9-bit output index.
    pub fn emphasis(self) -> u16 {
        u16::from(self.bits() & 0xE0) << 1
    }

    /// Per-layer pixel masks: index 0 covers x < 8, index 1 the rest.
    pub(crate) fn visibility(self) -> Visibility {
        let layer = |enable: Mask, left: Mask| {
            let on = if self.contains(enable) { 0xFF } else { 0x00 };
            let left_on = if self.contains(left) { on } else { 0x00 };
            [left_on, on]
        };
        Visibility {
            background: layer(Mask::SHOW_BACKGROUND, Mask::SHOW_BACKGROUND_LEFT),
            sprites: layer(Mask::SHOW_SPRITES, Mask::SHOW_SPRITES_LEFT),
        }
    }
}

/// AND-masks applied to layer pixels, recomputed on every `$2001` write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) struct Visibility {
    pub(crate) background: [u8; 2],
    pub(crate) sprites: [u8; 2],
}

impl Visibility {
    #[inline]
    pub(crate) fn background(&self, x: usize) -> u8 {
        self.background[usize::from(x >= 8)]
    }

    #[inline]
    pub(crate) fn sprites(&self, x: usize) -> u8 {
        self.sprites[usize::from(x >= 8)]
    }
}
