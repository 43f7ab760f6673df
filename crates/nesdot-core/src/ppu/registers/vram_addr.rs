use bitflags::bitflags;

use crate::memory;

// Layout (bits 0-14):
//  14 13 12 11 10 9 8 7 6 5 4 3 2 1 0
//  [fine_y][nt][coarse_y   ][coarse_x   ]
//  yyy     NN   YYYYY         XXXXX
bitflags! {
    /// Bit masks for the 15-bit VRAM address (`v`/`t` registers).
    pub(crate) struct VramAddrMask: u16 {
        const COARSE_X = 0x001F;
        const COARSE_Y = 0x03E0;
        const NAMETABLE_X = 0x0400;
        const NAMETABLE_Y = 0x0800;
        const NAMETABLE = 0x0C00;
        const FINE_Y = 0x7000;
        const HORIZONTAL = Self::COARSE_X.bits() | Self::NAMETABLE_X.bits();
        const VERTICAL = Self::COARSE_Y.bits() | Self::NAMETABLE_Y.bits() | Self::FINE_Y.bits();
        const ALL = Self::COARSE_X.bits()
            | Self::COARSE_Y.bits()
            | Self::NAMETABLE.bits()
            | Self::FINE_Y.bits();
    }
}

const COARSE_Y_SHIFT: u16 = 5;
const NAMETABLE_SHIFT: u16 = 10;
const FINE_Y_SHIFT: u16 = 12;

/// 15-bit VRAM address used by the PPU internal `v`/`t` registers.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct VramAddr(u16);

impl VramAddr {
    #[inline]
    pub fn coarse_x(self) -> u8 {
        (self.0 & VramAddrMask::COARSE_X.bits()) as u8
    }

    #[inline]
    pub fn set_coarse_x(&mut self, cx: u8) {
        self.0 = (self.0 & !VramAddrMask::COARSE_X.bits()) | u16::from(cx & 0b1_1111);
    }

    #[inline]
    pub fn coarse_y(self) -> u8 {
        ((self.0 & VramAddrMask::COARSE_Y.bits()) >> COARSE_Y_SHIFT) as u8
    }

    #[inline]
    pub fn set_coarse_y(&mut self, cy: u8) {
        self.0 = (self.0 & !VramAddrMask::COARSE_Y.bits())
            | (u16::from(cy & 0b1_1111) << COARSE_Y_SHIFT);
    }

    #[inline]
    pub fn nametable(self) -> u8 {
        ((self.0 & VramAddrMask::NAMETABLE.bits()) >> NAMETABLE_SHIFT) as u8
    }

    #[inline]
    pub fn set_nametable(&mut self, nt: u8) {
        self.0 =
            (self.0 & !VramAddrMask::NAMETABLE.bits()) | (u16::from(nt & 0b11) << NAMETABLE_SHIFT);
    }

    #[inline]
    pub fn fine_y(self) -> u8 {
        ((self.0 & VramAddrMask::FINE_Y.bits()) >> FINE_Y_SHIFT) as u8
    }

    #[inline]
    pub fn set_fine_y(&mut self, fy: u8) {
        self.0 = (self.0 & !VramAddrMask::FINE_Y.bits()) | (u16::from(fy & 0b111) << FINE_Y_SHIFT);
    }

    #[inline]
    pub fn raw(self) -> u16 {
        self.0
    }

    /// Replaces the raw address, masking to 15 bits.
    #[inline]
    pub fn set_raw(&mut self, v: u16) {
        self.0 = v & VramAddrMask::ALL.bits();
    }

    /// Address driven on the 14-bit PPU bus.
    #[inline]
    pub fn bus_addr(self) -> u16 {
        self.0 & memory::VRAM_MIRROR_MASK
    }

    /// Nametable byte for the tile under the scroll position.
    #[inline]
    pub fn tile_addr(self) -> u16 {
        memory::NAMETABLE_BASE | (self.0 & 0x0FFF)
    }

    /// Attribute byte covering the tile under the scroll position.
    #[inline]
    pub fn attribute_addr(self) -> u16 {
        memory::NAMETABLE_BASE
            | memory::ATTRIBUTE_OFFSET
            | (self.0 & VramAddrMask::NAMETABLE.bits())
            | (u16::from(self.coarse_y() >> 2) << 3)
            | u16::from(self.coarse_x() >> 2)
    }

    /// Bit offset of the tile's 2-bit palette select inside its attribute byte.
    #[inline]
    pub fn attribute_shift(self) -> u8 {
        ((self.coarse_y() & 0b10) << 1) | (self.coarse_x() & 0b10)
    }

    /// Adds a `$2007` increment. Bit 14 survives in the latch; only bus
    /// accesses mirror down to `$0000-$3FFF`.
    #[inline]
    pub fn increment(&mut self, step: u16) {
        self.0 = (self.0 + step) & VramAddrMask::ALL.bits();
    }

    /// Coarse X step with wrap into the horizontally adjacent nametable.
    #[inline]
    pub fn increment_coarse_x(&mut self) {
        if self.coarse_x() == 31 {
            self.0 &= !VramAddrMask::COARSE_X.bits();
            self.0 ^= VramAddrMask::NAMETABLE_X.bits();
        } else {
            self.0 += 1;
        }
    }

    /// Fine Y step, carrying into coarse Y. Row 29 wraps into the vertically
    /// adjacent nametable; rows 30 and 31 wrap in place.
    #[inline]
    pub fn increment_y(&mut self) {
        if self.fine_y() < 7 {
            self.0 += 1 << FINE_Y_SHIFT;
            return;
        }
        self.0 &= !VramAddrMask::FINE_Y.bits();
        match self.coarse_y() {
            29 => {
                self.set_coarse_y(0);
                self.0 ^= VramAddrMask::NAMETABLE_Y.bits();
            }
            31 => self.set_coarse_y(0),
            y => self.set_coarse_y(y + 1),
        }
    }

    /// Copies coarse X and the horizontal nametable bit from `t`.
    #[inline]
    pub fn copy_horizontal(&mut self, t: VramAddr) {
        let mask = VramAddrMask::HORIZONTAL.bits();
        self.0 = (self.0 & !mask) | (t.0 & mask);
    }

    /// Copies fine Y, coarse Y and the vertical nametable bit from `t`.
    #[inline]
    pub fn copy_vertical(&mut self, t: VramAddr) {
        let mask = VramAddrMask::VERTICAL.bits();
        self.0 = (self.0 & !mask) | (t.0 & mask);
    }
}

impl core::fmt::Debug for VramAddr {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VramAddr")
            .field("raw", &format_args!("{:#06X}", self.0))
            .field("fine_y", &self.fine_y())
            .field("nametable", &self.nametable())
            .field("coarse_y", &self.coarse_y())
            .field("coarse_x", &self.coarse_x())
            .finish()
    }
}

impl core::fmt::Display for VramAddr {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "raw={:#06X} fy={} nt={} cy={} cx={}",
            self.0,
            self.fine_y(),
            self.nametable(),
            self.coarse_y(),
            self.coarse_x(),
        )
    }
}

impl From<u16> for VramAddr {
    #[inline]
    fn from(v: u16) -> Self {
        VramAddr(v & VramAddrMask::ALL.bits())
    }
}

impl From<VramAddr> for u16 {
    #[inline]
    fn from(v: VramAddr) -> Self {
        v.raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coarse_x_wraps_into_next_nametable() {
        let mut v = VramAddr::from(0x001F);
        v.increment_coarse_x();
        assert_eq!(v.coarse_x(), 0);
        assert_eq!(v.nametable(), 1);
        v.set_coarse_x(31);
        v.increment_coarse_x();
        assert_eq!(v.nametable(), 0);
    }

    #[test]
    fn y_increment_handles_row_29_and_31() {
        let mut v = VramAddr::default();
        v.set_fine_y(7);
        v.set_coarse_y(29);
        v.increment_y();
        assert_eq!((v.fine_y(), v.coarse_y(), v.nametable()), (0, 0, 2));

        v.set_fine_y(7);
        v.set_coarse_y(31);
        v.increment_y();
        assert_eq!((v.fine_y(), v.coarse_y(), v.nametable()), (0, 0, 2));

        v.set_fine_y(3);
        v.increment_y();
        assert_eq!(v.fine_y(), 4);
    }

    #[test]
    fn attribute_address_selects_quadrant() {
        let mut v = VramAddr::default();
        v.set_nametable(3);
        v.set_coarse_x(6);
        v.set_coarse_y(10);
        assert_eq!(v.tile_addr(), 0x2000 | 0x0C00 | (10 << 5) | 6);
        assert_eq!(v.attribute_addr(), 0x2FC0 | (2 << 3) | 1);
        assert_eq!(v.attribute_shift(), 6);
    }

    #[test]
    fn copies_touch_only_their_half() {
        let t = VramAddr::from(0x7FFF);
        let mut v = VramAddr::default();
        v.copy_horizontal(t);
        assert_eq!(v.raw(), 0x041F);
        v.copy_vertical(t);
        assert_eq!(v.raw(), 0x7FFF);
    }
}
