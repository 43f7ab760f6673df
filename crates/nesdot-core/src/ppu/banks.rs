//! Pattern and nametable address decoding.
//!
//! The 8 KiB pattern space is split into eight 1 KiB slots and the nametable
//! space into four 1 KiB quadrants. Every slot always holds exactly one
//! accessor, so any PPU address below `$3F00` resolves to a single source.
//! Mappers retarget slots through the hactive/hblank hooks or directly between
//! calls.

use crate::{
    host::PpuBus,
    mem_block::ppu::Ciram,
    memory::{CHR_BANK_COUNT, CHR_BANK_SIZE, CHR_SIZE, NAMETABLE_SIZE},
};

/// Where a 1 KiB pattern slot reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChrAccessor {
    /// 1 KiB page of CHR RAM.
    Ram(u16),
    /// 1 KiB page of CHR ROM; writes are dropped.
    Rom(u16),
    /// Computed by [`crate::mapper::VideoMapper::chr_read`].
    Mapper,
}

/// Where a nametable quadrant reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NametableAccessor {
    /// One of the two internal CIRAM pages.
    Ciram(u8),
    /// 1 KiB page of CHR RAM.
    ChrRam(u16),
    /// 1 KiB page of CHR ROM; writes are dropped.
    ChrRom(u16),
    /// Computed by [`crate::mapper::VideoMapper::nametable_read`].
    Mapper,
}

/// Fixed CIRAM layouts selected by the cartridge's CIRAM A10 wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mirroring {
    /// `$2000=$2400`, `$2800=$2C00`.
    Horizontal,
    /// `$2000=$2800`, `$2400=$2C00`.
    #[default]
    Vertical,
    /// Every quadrant maps to CIRAM page 0.
    SingleScreenLower,
    /// Every quadrant maps to CIRAM page 1.
    SingleScreenUpper,
}

impl Mirroring {
    /// CIRAM page behind each quadrant.
    pub const fn pages(self) -> [u8; 4] {
        match self {
            Mirroring::Horizontal => [0, 0, 1, 1],
            Mirroring::Vertical => [0, 1, 0, 1],
            Mirroring::SingleScreenLower => [0; 4],
            Mirroring::SingleScreenUpper => [1; 4],
        }
    }
}

/// Video memory owned by the PPU plus the slot tables that decode it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoBanks {
    chr_rom: Box<[u8]>,
    chr_ram: Box<[u8]>,
    ciram: Ciram,
    chr: [ChrAccessor; CHR_BANK_COUNT],
    nametables: [NametableAccessor; 4],
}

impl Default for VideoBanks {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoBanks {
    /// 8 KiB of CHR RAM mapped linearly, vertical mirroring.
    pub fn new() -> Self {
        let mut banks = Self {
            chr_rom: Box::default(),
            chr_ram: vec![0; CHR_SIZE].into_boxed_slice(),
            ciram: Ciram::new(),
            chr: [ChrAccessor::Mapper; CHR_BANK_COUNT],
            nametables: [NametableAccessor::Mapper; 4],
        };
        for (slot, accessor) in banks.chr.iter_mut().enumerate() {
            *accessor = ChrAccessor::Ram(slot as u16);
        }
        banks.set_mirroring(Mirroring::default());
        banks
    }

    /// CHR ROM mapped linearly into the first 8 KiB, no CHR RAM.
    pub fn with_chr_rom(rom: impl Into<Box<[u8]>>) -> Self {
        let mut banks = Self::new();
        banks.chr_rom = rom.into();
        banks.chr_ram = Box::default();
        for (slot, accessor) in banks.chr.iter_mut().enumerate() {
            *accessor = ChrAccessor::Rom(slot as u16);
        }
        banks
    }

    /// Replaces CHR RAM with `size` zeroed bytes.
    pub fn set_chr_ram_size(&mut self, size: usize) {
        self.chr_ram = vec![0; size].into_boxed_slice();
    }

    pub fn chr_rom(&self) -> &[u8] {
        &self.chr_rom
    }

    /// CHR RAM, for the cartridge layer's own save data.
    pub fn chr_ram(&self) -> &[u8] {
        &self.chr_ram
    }

    pub fn chr_ram_mut(&mut self) -> &mut [u8] {
        &mut self.chr_ram
    }

    pub fn ciram(&self) -> &Ciram {
        &self.ciram
    }

    pub(crate) fn ciram_mut(&mut self) -> &mut Ciram {
        &mut self.ciram
    }

    /// Retargets one 1 KiB pattern slot. `slot` is masked to 0..8.
    pub fn set_chr(&mut self, slot: usize, accessor: ChrAccessor) {
        self.chr[slot % CHR_BANK_COUNT] = accessor;
    }

    pub fn chr(&self, slot: usize) -> ChrAccessor {
        self.chr[slot % CHR_BANK_COUNT]
    }

    /// Retargets one nametable quadrant. `quadrant` is masked to 0..4.
    pub fn set_nametable(&mut self, quadrant: usize, accessor: NametableAccessor) {
        self.nametables[quadrant & 3] = accessor;
    }

    pub fn nametable(&self, quadrant: usize) -> NametableAccessor {
        self.nametables[quadrant & 3]
    }

    pub fn set_mirroring(&mut self, mirroring: Mirroring) {
        for (slot, page) in self.nametables.iter_mut().zip(mirroring.pages()) {
            *slot = NametableAccessor::Ciram(page);
        }
    }

    /// Reads `$0000-$3EFF`. Palette space is handled by the caller.
    pub(crate) fn read(&self, addr: u16, bus: &mut PpuBus<'_>) -> u8 {
        if addr < CHR_SIZE as u16 {
            self.read_pattern(addr, bus)
        } else {
            self.read_nametable(addr, bus)
        }
    }

    pub(crate) fn write(&mut self, addr: u16, value: u8, bus: &mut PpuBus<'_>) {
        if addr < CHR_SIZE as u16 {
            self.write_pattern(addr, value, bus);
        } else {
            self.write_nametable(addr, value, bus);
        }
    }

    #[inline]
    pub(crate) fn read_pattern(&self, addr: u16, bus: &mut PpuBus<'_>) -> u8 {
        let addr = addr & (CHR_SIZE as u16 - 1);
        let offset = addr as usize % CHR_BANK_SIZE;
        match self.chr[addr as usize / CHR_BANK_SIZE] {
            ChrAccessor::Ram(page) => read_page(&self.chr_ram, page, offset),
            ChrAccessor::Rom(page) => read_page(&self.chr_rom, page, offset),
            ChrAccessor::Mapper => bus.mapper_chr_read(addr),
        }
    }

    pub(crate) fn write_pattern(&mut self, addr: u16, value: u8, bus: &mut PpuBus<'_>) {
        let addr = addr & (CHR_SIZE as u16 - 1);
        let offset = addr as usize % CHR_BANK_SIZE;
        match self.chr[addr as usize / CHR_BANK_SIZE] {
            ChrAccessor::Ram(page) => write_page(&mut self.chr_ram, page, offset, value),
            ChrAccessor::Rom(_) => {}
            ChrAccessor::Mapper => bus.mapper_chr_write(addr, value),
        }
    }

    #[inline]
    pub(crate) fn read_nametable(&self, addr: u16, bus: &mut PpuBus<'_>) -> u8 {
        let (quadrant, offset) = split_nametable(addr);
        match self.nametables[quadrant] {
            NametableAccessor::Ciram(page) => read_page(&self.ciram, u16::from(page), offset),
            NametableAccessor::ChrRam(page) => read_page(&self.chr_ram, page, offset),
            NametableAccessor::ChrRom(page) => read_page(&self.chr_rom, page, offset),
            NametableAccessor::Mapper => bus.mapper_nametable_read(addr),
        }
    }

    pub(crate) fn write_nametable(&mut self, addr: u16, value: u8, bus: &mut PpuBus<'_>) {
        let (quadrant, offset) = split_nametable(addr);
        match self.nametables[quadrant] {
            NametableAccessor::Ciram(page) => {
                write_page(&mut self.ciram, u16::from(page), offset, value)
            }
            NametableAccessor::ChrRam(page) => write_page(&mut self.chr_ram, page, offset, value),
            NametableAccessor::ChrRom(_) => {}
            NametableAccessor::Mapper => bus.mapper_nametable_write(addr, value),
        }
    }
}

/// `$2000-$3EFF` to (quadrant, offset); `$3000+` mirrors `$2000+`.
#[inline]
fn split_nametable(addr: u16) -> (usize, usize) {
    let rel = addr & 0x0FFF;
    (
        usize::from(rel / NAMETABLE_SIZE),
        usize::from(rel % NAMETABLE_SIZE),
    )
}

/// Page numbers past the end of `storage` wrap around; empty storage reads 0.
#[inline]
fn page_index(len: usize, page: u16, offset: usize) -> Option<usize> {
    (len != 0).then(|| (usize::from(page) * CHR_BANK_SIZE + offset) % len)
}

#[inline]
fn read_page(storage: &[u8], page: u16, offset: usize) -> u8 {
    page_index(storage.len(), page, offset).map_or(0, |idx| storage[idx])
}

#[inline]
fn write_page(storage: &mut [u8], page: u16, offset: usize, value: u8) {
    if let Some(idx) = page_index(storage.len(), page, offset) {
        storage[idx] = value;
    }
}
