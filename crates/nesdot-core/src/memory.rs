//! Address-space constants for the picture processing unit.

/// First CPU-visible PPU register address.
pub const REGISTER_BASE: u16 = 0x2000;
/// Last CPU address that still decodes to a PPU register mirror.
pub const REGISTER_MIRROR_END: u16 = 0x3FFF;
/// Mask for decoding register mirrors (`addr & 0x0007`).
pub const REGISTER_SELECT_MASK: u16 = 0x0007;

/// Internal nametable RAM (CIRAM) size: two 1 KiB pages.
pub const CIRAM_SIZE: usize = 0x0800;
/// Address mask applied to every PPU bus access (14-bit bus).
pub const VRAM_MIRROR_MASK: u16 = 0x3FFF;

/// Palette RAM base address (`$3F00`).
pub const PALETTE_BASE: u16 = 0x3F00;
/// Palette RAM byte count.
pub const PALETTE_RAM_SIZE: usize = 0x20;

/// Base address of nametable 0.
pub const NAMETABLE_BASE: u16 = 0x2000;
/// Size of a single nametable quadrant in bytes.
pub const NAMETABLE_SIZE: u16 = 0x0400;
/// Offset of the attribute table inside a nametable quadrant.
pub const ATTRIBUTE_OFFSET: u16 = 0x03C0;

/// Pattern table base address for table 1.
pub const PATTERN_TABLE_1: u16 = 0x1000;
/// Total size of both pattern tables (`$0000-$1FFF`).
pub const CHR_SIZE: usize = 0x2000;
/// Granularity of a CHR bank slot.
pub const CHR_BANK_SIZE: usize = 0x0400;
/// Number of CHR bank slots covering the pattern space.
pub const CHR_BANK_COUNT: usize = CHR_SIZE / CHR_BANK_SIZE;

/// Primary Object Attribute Memory (OAM) byte count.
pub const OAM_RAM_SIZE: usize = 0x100;
/// Secondary OAM capacity: room for every object when the line limit is lifted.
pub const SECONDARY_OAM_RAM_SIZE: usize = 0x100;
/// Bytes per object entry.
pub const OAM_ENTRY_SIZE: usize = 4;
/// Objects held in primary OAM.
pub const OAM_ENTRIES: usize = OAM_RAM_SIZE / OAM_ENTRY_SIZE;

/// DMA register used for transferring OAM data (`$4014`).
pub const OAM_DMA: u16 = 0x4014;

/// CPU-visible PPU register identifiers.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    /// `$2000` - PPUCTRL
    Control = 0x2000,
    /// `$2001` - PPUMASK
    Mask = 0x2001,
    /// `$2002` - PPUSTATUS
    Status = 0x2002,
    /// `$2003` - OAMADDR
    OamAddr = 0x2003,
    /// `$2004` - OAMDATA
    OamData = 0x2004,
    /// `$2005` - PPUSCROLL
    Scroll = 0x2005,
    /// `$2006` - PPUADDR
    Addr = 0x2006,
    /// `$2007` - PPUDATA
    Data = 0x2007,
}

impl Register {
    /// Raw address backing the register.
    pub const fn addr(self) -> u16 {
        self as u16
    }

    /// Resolves the canonical register for a CPU address in `$2000-$3FFF`.
    pub const fn from_cpu_addr(addr: u16) -> Self {
        match addr & REGISTER_SELECT_MASK {
            0 => Self::Control,
            1 => Self::Mask,
            2 => Self::Status,
            3 => Self::OamAddr,
            4 => Self::OamData,
            5 => Self::Scroll,
            6 => Self::Addr,
            _ => Self::Data,
        }
    }

    /// Dots between the CPU access and the moment a write lands inside the PPU.
    pub const fn write_latency(self) -> u64 {
        match self {
            Self::Control | Self::Mask | Self::Scroll | Self::Addr => 1,
            _ => 0,
        }
    }

    /// Writes the PPU drops while it is still warming up after a reset.
    pub const fn ignored_during_warm_up(self) -> bool {
        matches!(self, Self::Control | Self::Mask | Self::Scroll | Self::Addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirrors_decode_every_eight_bytes() {
        assert_eq!(Register::from_cpu_addr(0x2000), Register::Control);
        assert_eq!(Register::from_cpu_addr(0x2008), Register::Control);
        assert_eq!(Register::from_cpu_addr(0x3FFA), Register::Status);
        assert_eq!(Register::from_cpu_addr(0x3FFF), Register::Data);
        assert_eq!(Register::Data.addr(), 0x2007);
    }
}
