#![allow(dead_code)]

use nesdot_core::{CpuLink, Ppu, PpuBus, PpuConfig, VideoMapper};

/// Minimal host: a free-running master clock, 64 KiB of flat memory and a
/// log of every NMI request.
#[derive(Debug)]
pub struct TestCpu {
    pub cycle: u64,
    pub cpu_cycle: u64,
    pub ram: Vec<u8>,
    pub scheduled: Vec<u64>,
    pub pending_nmi: Option<u64>,
    pub cancels: usize,
    pub stolen: u64,
}

impl TestCpu {
    pub fn new(cpu_cycle: u64) -> Self {
        Self {
            cycle: 0,
            cpu_cycle,
            ram: vec![0; 0x10000],
            scheduled: Vec::new(),
            pending_nmi: None,
            cancels: 0,
            stolen: 0,
        }
    }
}

impl CpuLink for TestCpu {
    fn cycles(&self) -> u64 {
        self.cycle
    }

    fn steal_cycles(&mut self, cpu_cycles: u32) {
        self.stolen += u64::from(cpu_cycles);
        self.cycle += u64::from(cpu_cycles) * self.cpu_cycle;
    }

    fn schedule_nmi(&mut self, at: u64) {
        self.scheduled.push(at);
        self.pending_nmi = Some(at);
    }

    fn cancel_nmi(&mut self) {
        self.cancels += 1;
        self.pending_nmi = None;
    }

    fn dma_read(&mut self, addr: u16) -> u8 {
        self.ram[usize::from(addr)]
    }
}

pub struct Machine {
    pub ppu: Ppu,
    pub cpu: TestCpu,
}

impl Machine {
    pub fn new(config: PpuConfig) -> Self {
        let ppu = Ppu::new(config);
        let cpu = TestCpu::new(ppu.timing().cpu_cycle);
        Self { ppu, cpu }
    }

    pub fn ntsc() -> Self {
        Self::new(PpuConfig::default())
    }

    pub fn begin_frame(&mut self) {
        let mut bus = PpuBus::new(&mut self.cpu);
        self.ppu.begin_frame(&mut bus);
    }

    /// Closes the frame and moves the host clock up to its end.
    pub fn end_frame(&mut self) {
        let mut bus = PpuBus::new(&mut self.cpu);
        self.ppu.end_frame(&mut bus);
        self.cpu.cycle = self.cpu.cycle.max(self.ppu.frame_end_cycle());
    }

    pub fn run_frame(&mut self) {
        self.begin_frame();
        self.end_frame();
    }

    pub fn run_frame_with(&mut self, mapper: &mut dyn VideoMapper) {
        {
            let mut bus = PpuBus::new(&mut self.cpu).with_mapper(mapper);
            self.ppu.begin_frame(&mut bus);
            self.ppu.end_frame(&mut bus);
        }
        self.cpu.cycle = self.cpu.cycle.max(self.ppu.frame_end_cycle());
    }

    /// Master cycle of `(scanline, dot)` in the open frame.
    pub fn cycle_of(&self, scanline: i16, dot: u16) -> u64 {
        let line = u64::try_from(scanline + 1).expect("scanline before pre-render");
        self.ppu.frame_start_cycle() + (line * 341 + u64::from(dot)) * self.ppu.timing().dot
    }

    pub fn read(&mut self, addr: u16) -> u8 {
        let mut bus = PpuBus::new(&mut self.cpu);
        self.ppu.cpu_read(addr, &mut bus)
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        let mut bus = PpuBus::new(&mut self.cpu);
        self.ppu.cpu_write(addr, value, &mut bus);
    }

    pub fn set_vram_addr(&mut self, addr: u16) {
        self.write(0x2006, (addr >> 8) as u8);
        self.write(0x2006, addr as u8);
    }

    pub fn write_vram(&mut self, addr: u16, bytes: &[u8]) {
        self.set_vram_addr(addr);
        for &byte in bytes {
            self.write(0x2007, byte);
        }
    }

    /// Uploads OAM through `$2003/$2004`.
    pub fn write_oam(&mut self, start: u8, bytes: &[u8]) {
        self.write(0x2003, start);
        for &byte in bytes {
            self.write(0x2004, byte);
        }
    }

    /// Tile 1 in pattern table 0: every pixel color 1.
    pub fn load_solid_tile(&mut self) {
        let mut tile = [0u8; 16];
        tile[..8].fill(0xFF);
        self.write_vram(0x0010, &tile);
    }
}
