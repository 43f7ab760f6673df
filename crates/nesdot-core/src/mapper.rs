//! Hooks a cartridge mapper installs into the video core.

mod a12_watcher;

pub use a12_watcher::{A12StateChange, A12Watcher};

use crate::ppu::banks::VideoBanks;

/// Scanline and bus hooks for cartridge mappers.
///
/// Every method has a no-op default. The PPU calls these only from inside its
/// own stepping; implementations must not call back into the PPU.
pub trait VideoMapper {
    /// Dot 0 of every rendered line (-1 ..= 239).
    fn on_hactive(&mut self, _scanline: i16, _rendering: bool, _banks: &mut VideoBanks) {}

    /// Dot 257 of every rendered line, when sprite pattern fetches begin.
    fn on_hblank(&mut self, _scanline: i16, _rendering: bool, _banks: &mut VideoBanks) {}

    /// Every address the PPU drives onto its bus, stamped with the master cycle.
    fn on_address_line(&mut self, _addr: u16, _cycle: u64) {}

    /// Pattern reads through a [`crate::ppu::banks::ChrAccessor::Mapper`] slot.
    fn chr_read(&mut self, _addr: u16) -> u8 {
        0
    }

    fn chr_write(&mut self, _addr: u16, _value: u8) {}

    /// Nametable reads through a [`crate::ppu::banks::NametableAccessor::Mapper`] quadrant.
    fn nametable_read(&mut self, _addr: u16) -> u8 {
        0
    }

    fn nametable_write(&mut self, _addr: u16, _value: u8) {}
}
