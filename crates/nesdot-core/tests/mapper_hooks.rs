mod common;

use common::Machine;
use ctor::ctor;
use nesdot_core::{
    VideoMapper,
    mapper::{A12StateChange, A12Watcher},
    ppu::banks::{ChrAccessor, NametableAccessor, VideoBanks},
};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[ctor]
fn init_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_file(true)
        .with_line_number(true)
        .with_max_level(Level::DEBUG)
        .pretty()
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");
}

/// Counts scanline hooks and debounced A12 rises, MMC3 style.
struct Counter {
    a12: A12Watcher,
    rises: usize,
    hactive: Vec<i16>,
    hblank: usize,
}

impl Counter {
    fn new(machine: &Machine) -> Self {
        Self {
            a12: A12Watcher::for_timing(machine.ppu.timing()),
            rises: 0,
            hactive: Vec::new(),
            hblank: 0,
        }
    }
}

impl VideoMapper for Counter {
    fn on_hactive(&mut self, scanline: i16, _rendering: bool, _banks: &mut VideoBanks) {
        self.hactive.push(scanline);
    }

    fn on_hblank(&mut self, _scanline: i16, _rendering: bool, _banks: &mut VideoBanks) {
        self.hblank += 1;
    }

    fn on_address_line(&mut self, addr: u16, cycle: u64) {
        if self.a12.update(addr, cycle) == A12StateChange::Rise {
            self.rises += 1;
        }
    }
}

#[test]
fn a12_rises_once_per_rendered_line() {
    let mut m = Machine::ntsc();
    m.write(0x2000, 0x08);
    m.write(0x2001, 0x18);
    let mut counter = Counter::new(&m);

    m.run_frame_with(&mut counter);

    assert_eq!(counter.rises, 241);
    assert_eq!(counter.hblank, 241);
    assert_eq!(counter.hactive.len(), 241);
    assert_eq!(counter.hactive.first(), Some(&-1));
    assert_eq!(counter.hactive.last(), Some(&239));
}

#[test]
fn no_a12_activity_with_rendering_off() {
    let mut m = Machine::ntsc();
    m.write(0x2000, 0x08);
    let mut counter = Counter::new(&m);

    m.run_frame_with(&mut counter);

    assert_eq!(counter.rises, 0);
    assert_eq!(counter.hblank, 241);
}

/// CHR and nametable reads served by the cartridge.
struct Cartridge {
    chr_reads: usize,
    nametable_reads: usize,
}

impl VideoMapper for Cartridge {
    fn chr_read(&mut self, _addr: u16) -> u8 {
        self.chr_reads += 1;
        0xFF
    }

    fn nametable_read(&mut self, addr: u16) -> u8 {
        self.nametable_reads += 1;
        // Tile 1 everywhere, palette 0 in every attribute byte.
        u8::from(addr & 0x3FF < 0x3C0)
    }
}

#[test]
fn mapper_slots_serve_rendering_fetches() {
    let mut m = Machine::ntsc();
    m.write_vram(0x3F03, &[0x21]);
    m.set_vram_addr(0);
    for slot in 0..8 {
        m.ppu.banks_mut().set_chr(slot, ChrAccessor::Mapper);
    }
    for quadrant in 0..4 {
        m.ppu
            .banks_mut()
            .set_nametable(quadrant, NametableAccessor::Mapper);
    }
    m.write(0x2001, 0x0A);
    let mut cart = Cartridge {
        chr_reads: 0,
        nametable_reads: 0,
    };

    m.run_frame_with(&mut cart);

    assert!(cart.chr_reads > 0);
    assert!(cart.nametable_reads > 0);
    // Both planes set: every background pixel is color 3.
    assert_eq!(m.ppu.output().pixel(100, 100), 0x21);
}
