mod common;

use common::Machine;
use ctor::ctor;
use nesdot_core::{PpuConfig, SpriteLimit, ppu::registers::Status};
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

const SPRITE_COLOR: u8 = 0x16;
const BACKGROUND_COLOR: u8 = 0x2A;
const BACKDROP: u8 = 0x0F;

/// Tile 1 solid, palettes set, every object parked below the screen.
fn scene(config: PpuConfig) -> Machine {
    let mut m = Machine::new(config);
    m.load_solid_tile();
    m.write_vram(0x3F00, &[BACKDROP, BACKGROUND_COLOR]);
    m.write_vram(0x3F11, &[SPRITE_COLOR]);
    m.write_oam(0, &[0xF0; 256]);
    m
}

fn fill_background(m: &mut Machine, tile: u8) {
    m.write_vram(0x2000, &[tile; 0x3C0]);
    m.write_vram(0x23C0, &[0; 0x40]);
    m.set_vram_addr(0x0000);
}

#[test]
fn object_zero_over_opaque_background_sets_hit() {
    let mut m = scene(PpuConfig::default());
    fill_background(&mut m, 1);
    m.write_oam(0, &[30, 1, 0, 40]);
    m.write(0x2001, 0x1E);

    m.run_frame();

    assert!(m.ppu.status().contains(Status::SPRITE_ZERO_HIT));
    assert_eq!(m.ppu.output().pixel(40, 31), u16::from(SPRITE_COLOR));
}

#[test]
fn last_column_never_hits() {
    let mut m = scene(PpuConfig::default());
    fill_background(&mut m, 1);
    m.write_oam(0, &[30, 1, 0, 255]);
    m.write(0x2001, 0x1E);

    m.run_frame();

    assert!(!m.ppu.status().contains(Status::SPRITE_ZERO_HIT));
    assert_eq!(m.ppu.output().pixel(255, 31), u16::from(SPRITE_COLOR));
}

#[test]
fn transparent_background_never_hits() {
    let mut m = scene(PpuConfig::default());
    fill_background(&mut m, 0);
    m.write_oam(0, &[30, 1, 0, 40]);
    m.write(0x2001, 0x1E);

    m.run_frame();

    assert!(!m.ppu.status().contains(Status::SPRITE_ZERO_HIT));
    assert_eq!(m.ppu.output().pixel(40, 31), u16::from(SPRITE_COLOR));
    assert_eq!(m.ppu.output().pixel(39, 31), u16::from(BACKDROP));
}

#[test]
fn behind_priority_yields_to_opaque_background() {
    let mut m = scene(PpuConfig::default());
    fill_background(&mut m, 1);
    m.write_oam(4, &[30, 1, 0x20, 40]);
    m.write(0x2001, 0x1E);

    m.run_frame();

    assert_eq!(m.ppu.output().pixel(40, 31), u16::from(BACKGROUND_COLOR));
}

#[test]
fn left_column_mask_hides_objects() {
    let mut m = scene(PpuConfig::default());
    fill_background(&mut m, 0);
    m.write_oam(0, &[30, 1, 0, 0]);
    m.write(0x2001, 0x18);

    m.run_frame();

    let row = m.ppu.output().row(31);
    assert!(row.iter().all(|&p| p == u16::from(BACKDROP)));

    m.write(0x2001, 0x1C);
    m.run_frame();
    assert_eq!(m.ppu.output().pixel(0, 31), u16::from(SPRITE_COLOR));
}

#[test]
fn mask_write_mid_line_lands_one_dot_later() {
    let mut m = scene(PpuConfig::default());
    fill_background(&mut m, 1);
    m.write(0x2001, 0x0A);

    m.begin_frame();
    m.cpu.cycle = m.cycle_of(100, 128);
    m.write(0x2001, 0x0B);
    m.end_frame();

    let gray = u16::from(BACKGROUND_COLOR & 0x30);
    let row = m.ppu.output().row(100);
    assert!(row[..128].iter().all(|&p| p == u16::from(BACKGROUND_COLOR)));
    assert!(row[128..].iter().all(|&p| p == gray));
    assert_eq!(m.ppu.output().pixel(0, 101), gray);
}

#[test]
fn rendering_switched_off_mid_line_shows_backdrop() {
    let mut m = scene(PpuConfig::default());
    fill_background(&mut m, 1);
    m.write(0x2001, 0x0A);

    m.begin_frame();
    m.cpu.cycle = m.cycle_of(100, 128);
    m.write(0x2001, 0x00);
    m.end_frame();

    let row = m.ppu.output().row(100);
    assert_eq!(row[127], u16::from(BACKGROUND_COLOR));
    assert!(row[128..].iter().all(|&p| p == u16::from(BACKDROP)));
    assert!(m.ppu.output().row(99).iter().all(|&p| p == u16::from(BACKGROUND_COLOR)));
}

/// Nine objects on one line, 16 pixels apart.
fn crowded_line(m: &mut Machine) {
    fill_background(m, 0);
    for k in 0..9u8 {
        m.write_oam(k * 4, &[50, 1, 0, k * 16]);
    }
    m.write(0x2001, 0x1E);
}

#[test]
fn ninth_object_is_dropped_and_overflow_set() {
    let mut m = scene(PpuConfig::default());
    crowded_line(&mut m);

    m.run_frame();

    assert!(m.ppu.status().contains(Status::SPRITE_OVERFLOW));
    let row = m.ppu.output().row(51);
    for k in 0..8 {
        assert_eq!(row[k * 16], u16::from(SPRITE_COLOR), "object {k}");
    }
    assert_eq!(row[128], u16::from(BACKDROP));
}

#[test]
fn unlimited_mode_draws_every_object() {
    let mut m = scene(PpuConfig::default().with_sprite_limit(SpriteLimit::Unlimited));
    crowded_line(&mut m);

    m.run_frame();

    assert!(m.ppu.status().contains(Status::SPRITE_OVERFLOW));
    assert_eq!(m.ppu.output().pixel(128, 51), u16::from(SPRITE_COLOR));
}

#[test]
fn oam_reads_during_rendering_return_the_evaluation_latch() {
    let mut m = scene(PpuConfig::default());
    m.write(0x2001, 0x18);
    m.begin_frame();
    // Secondary OAM is being cleared on dots 1-64.
    m.cpu.cycle = m.cycle_of(10, 20);
    assert_eq!(m.read(0x2004), 0xFF);
    m.end_frame();
}

#[test]
fn sprite_fetches_reset_oam_addr() {
    let mut m = scene(PpuConfig::default());
    m.write(0x2001, 0x18);
    m.write(0x2003, 0x40);
    m.run_frame();
    assert_eq!(m.ppu.oam_addr(), 0);
}
