use super::VramAddr;

/// Internal VRAM register block matching the NESDev `v/t/x/w` terminology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) struct VramRegisters {
    /// Current VRAM address (`v`).
    pub(crate) v: VramAddr,
    /// Temporary VRAM address (`t`).
    pub(crate) t: VramAddr,
    /// Fine X scroll component (`x`, 0..7).
    pub(crate) x: u8,
    /// Write toggle (`w`): false => first write, true => second write.
    pub(crate) w: bool,
}

impl VramRegisters {
    /// `$2005`: first write sets coarse/fine X, second sets coarse/fine Y.
    pub(crate) fn write_scroll(&mut self, value: u8) {
        if !self.w {
            self.t.set_coarse_x(value >> 3);
            self.x = value & 0b111;
        } else {
            self.t.set_coarse_y(value >> 3);
            self.t.set_fine_y(value & 0b111);
        }
        self.w = !self.w;
    }

    /// `$2006`: first write sets the high six bits (clearing bit 14), second
    /// sets the low byte and returns the completed address for `v`.
    pub(crate) fn write_addr(&mut self, value: u8) -> Option<VramAddr> {
        let second_write = self.w;
        if !second_write {
            let hi = u16::from(value & 0b0011_1111) << 8;
            let lo = self.t.raw() & 0x00FF;
            self.t.set_raw(hi | lo);
        } else {
            let hi = self.t.raw() & 0x7F00;
            self.t.set_raw(hi | u16::from(value));
        }
        self.w = !self.w;
        second_write.then_some(self.t)
    }

    pub(crate) fn reset_latch(&mut self) {
        self.w = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_pair_fills_t_and_fine_x() {
        let mut regs = VramRegisters::default();
        regs.write_scroll(0b1010_1101);
        assert!(regs.w);
        regs.write_scroll(0b0110_0011);
        assert!(!regs.w);
        assert_eq!(regs.t.coarse_x(), 0b10101);
        assert_eq!(regs.x, 0b101);
        assert_eq!(regs.t.coarse_y(), 0b01100);
        assert_eq!(regs.t.fine_y(), 0b011);
    }

    #[test]
    fn address_pair_commits_on_second_write() {
        let mut regs = VramRegisters::default();
        regs.t.set_fine_y(7);
        assert_eq!(regs.write_addr(0xFF), None);
        assert_eq!(regs.t.raw() & 0x7F00, 0x3F00);
        let committed = regs.write_addr(0x10);
        assert_eq!(committed.map(VramAddr::raw), Some(0x3F10));
    }
}
