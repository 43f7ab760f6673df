//! CPU-visible PPU register state and the internal `v/t/x/w` scroll latches.
//!
//! The concrete bit layouts live in submodules.

mod control;
mod mask;
mod status;
mod vram_addr;
mod vram_registers;

pub use control::Control;
pub use mask::Mask;
pub use status::Status;
pub use vram_addr::VramAddr;
pub(crate) use mask::Visibility;
pub(crate) use vram_registers::VramRegisters;

/// Aggregates the state of all CPU visible PPU registers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub(crate) struct Registers {
    /// `$2000`
    pub(crate) control: Control,
    /// `$2001`
    pub(crate) mask: Mask,
    /// `$2002`, top three bits only.
    pub(crate) status: Status,
    /// OAM pointer driven by `$2003`/`$2004` and cleared by sprite fetches.
    pub(crate) oam_addr: u8,
    /// Internal VRAM registers (`v`/`t`/`x`/`w`).
    pub(crate) vram: VramRegisters,
    /// Delayed `$2007` read buffer.
    pub(crate) read_buffer: u8,
    /// Last value driven onto the CPU data lines by any PPU port.
    pub(crate) io_latch: u8,
}

impl Registers {
    /// Updates control, also syncing the nametable bits into `t`.
    pub(crate) fn write_control(&mut self, value: u8) {
        self.control = Control::from_bits_retain(value);
        self.vram.t.set_nametable(self.control.nametable_index());
    }

    /// Value seen by a `$2002` read: live flags over the stale low latch bits.
    pub(crate) fn status_byte(&self) -> u8 {
        (self.status.bits() & Status::all().bits()) | (self.io_latch & !Status::all().bits())
    }

    /// Warm reset: scroll and control state clear, `v` and status survive.
    pub(crate) fn soft_reset(&mut self) {
        let v = self.vram.v;
        let status = self.status;
        let oam_addr = self.oam_addr;
        *self = Self::default();
        self.vram.v = v;
        self.status = status;
        self.oam_addr = oam_addr;
    }
}
