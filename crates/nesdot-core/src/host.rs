//! The CPU side of the PPU's world.

use crate::{mapper::VideoMapper, ppu::banks::VideoBanks};

/// Services the PPU needs from the host CPU model.
///
/// All cycle values are master clocks on the host's monotonic counter.
pub trait CpuLink {
    /// Current host cycle.
    fn cycles(&self) -> u64;

    /// Stalls the CPU for `cpu_cycles` CPU cycles (OAM DMA). The host advances
    /// its counter before returning.
    fn steal_cycles(&mut self, cpu_cycles: u32);

    /// Asserts NMI at master cycle `at`. A later call replaces an earlier one.
    fn schedule_nmi(&mut self, at: u64);

    /// Withdraws a previously scheduled NMI that has not fired yet.
    fn cancel_nmi(&mut self);

    /// Reads host memory on behalf of OAM DMA.
    fn dma_read(&mut self, addr: u16) -> u8;
}

/// Temporary view handed to every PPU entry point.
///
/// The machine assembly builds one per call from the collaborators it owns, so
/// the PPU never stores a pointer to the CPU or the cartridge.
pub struct PpuBus<'a> {
    cpu: &'a mut dyn CpuLink,
    mapper: Option<&'a mut dyn VideoMapper>,
}

impl<'a> PpuBus<'a> {
    pub fn new(cpu: &'a mut dyn CpuLink) -> Self {
        Self { cpu, mapper: None }
    }

    pub fn with_mapper(mut self, mapper: &'a mut dyn VideoMapper) -> Self {
        self.mapper = Some(mapper);
        self
    }

    #[inline]
    pub(crate) fn cycles(&self) -> u64 {
        self.cpu.cycles()
    }

    pub(crate) fn steal_cycles(&mut self, cpu_cycles: u32) {
        self.cpu.steal_cycles(cpu_cycles);
    }

    pub(crate) fn schedule_nmi(&mut self, at: u64) {
        tracing::trace!(at, "nmi scheduled");
        self.cpu.schedule_nmi(at);
    }

    pub(crate) fn cancel_nmi(&mut self) {
        tracing::trace!("nmi cancelled");
        self.cpu.cancel_nmi();
    }

    pub(crate) fn dma_read(&mut self, addr: u16) -> u8 {
        self.cpu.dma_read(addr)
    }

    #[inline]
    pub(crate) fn address_line(&mut self, addr: u16, cycle: u64) {
        if let Some(mapper) = self.mapper.as_deref_mut() {
            mapper.on_address_line(addr, cycle);
        }
    }

    pub(crate) fn hactive(&mut self, scanline: i16, rendering: bool, banks: &mut VideoBanks) {
        if let Some(mapper) = self.mapper.as_deref_mut() {
            mapper.on_hactive(scanline, rendering, banks);
        }
    }

    pub(crate) fn hblank(&mut self, scanline: i16, rendering: bool, banks: &mut VideoBanks) {
        if let Some(mapper) = self.mapper.as_deref_mut() {
            mapper.on_hblank(scanline, rendering, banks);
        }
    }

    pub(crate) fn mapper_chr_read(&mut self, addr: u16) -> u8 {
        self.mapper
            .as_deref_mut()
            .map_or(0, |mapper| mapper.chr_read(addr))
    }

    pub(crate) fn mapper_chr_write(&mut self, addr: u16, value: u8) {
        if let Some(mapper) = self.mapper.as_deref_mut() {
            mapper.chr_write(addr, value);
        }
    }

    pub(crate) fn mapper_nametable_read(&mut self, addr: u16) -> u8 {
        self.mapper
            .as_deref_mut()
            .map_or(0, |mapper| mapper.nametable_read(addr))
    }

    pub(crate) fn mapper_nametable_write(&mut self, addr: u16, value: u8) {
        if let Some(mapper) = self.mapper.as_deref_mut() {
            mapper.nametable_write(addr, value);
        }
    }
}
