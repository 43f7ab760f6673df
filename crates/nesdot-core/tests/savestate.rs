mod common;

use anyhow::Result;
use common::Machine;
use ctor::ctor;
use nesdot_core::{Error, PpuConfig};
use rand::{Rng, SeedableRng, rngs::StdRng};
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

/// Random tiles, nametables, palette and OAM with rendering on and a scroll.
fn busy_machine(seed: u64) -> Machine {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut m = Machine::ntsc();

    let chr: Vec<u8> = (0..0x2000).map(|_| rng.random()).collect();
    m.ppu.banks_mut().chr_ram_mut().copy_from_slice(&chr);
    let nametables: Vec<u8> = (0..0x800).map(|_| rng.random()).collect();
    m.write_vram(0x2000, &nametables);
    let palette: Vec<u8> = (0..32).map(|_| rng.random_range(0..0x40)).collect();
    m.write_vram(0x3F00, &palette);
    let oam: Vec<u8> = (0..256).map(|_| rng.random()).collect();
    m.write_oam(0, &oam);

    m.write(0x2000, 0x80 | 0x10);
    m.write(0x2005, 13);
    m.write(0x2005, 77);
    m.write(0x2001, 0x1E);
    m
}

fn fresh_with_chr(source: &Machine) -> Machine {
    let mut m = Machine::new(PpuConfig::default());
    m.ppu
        .banks_mut()
        .chr_ram_mut()
        .copy_from_slice(source.ppu.banks().chr_ram());
    m
}

#[test]
fn restored_state_renders_identical_frames() -> Result<()> {
    let mut original = busy_machine(7);
    original.run_frame();
    let state = original.ppu.save_state()?;

    let mut restored = fresh_with_chr(&original);
    restored.ppu.load_state(&state)?;
    assert_eq!(restored.ppu.is_odd_frame(), original.ppu.is_odd_frame());

    for _ in 0..2 {
        original.run_frame();
        restored.run_frame();
        assert_eq!(original.ppu.output(), restored.ppu.output());
        assert_eq!(original.ppu.frame_dots(), restored.ppu.frame_dots());
        assert_eq!(original.ppu.status(), restored.ppu.status());
    }
    assert_eq!(original.ppu.save_state()?, restored.ppu.save_state()?);
    Ok(())
}

#[test]
fn unknown_chunks_are_skipped() -> Result<()> {
    let mut original = busy_machine(11);
    original.run_frame();
    let mut state = original.ppu.save_state()?;
    state.extend_from_slice(b"XTRA");
    state.extend_from_slice(&3u32.to_le_bytes());
    state.extend_from_slice(&[1, 2, 3]);

    let mut restored = fresh_with_chr(&original);
    restored.ppu.load_state(&state)?;
    assert_eq!(restored.ppu.palette_ram(), original.ppu.palette_ram());
    assert_eq!(restored.ppu.oam(), original.ppu.oam());
    assert_eq!(restored.ppu.vram_addr(), original.ppu.vram_addr());
    Ok(())
}

#[test]
fn truncated_stream_is_rejected_without_changes() -> Result<()> {
    let mut original = busy_machine(3);
    original.run_frame();
    let state = original.ppu.save_state()?;

    let mut target = Machine::ntsc();
    target.write(0x2000, 0x04);
    let err = target
        .ppu
        .load_state(&state[..state.len() - 1])
        .expect_err("truncated stream loaded");
    assert!(matches!(err, Error::TruncatedChunk { .. }));
    assert_eq!(target.ppu.control().bits(), 0x04);
    assert_eq!(target.ppu.palette_ram()[0], 0x09);
    Ok(())
}

#[test]
fn frame_counter_survives_a_load() -> Result<()> {
    let mut m = busy_machine(5);
    let state = m.ppu.save_state()?;
    m.run_frame();
    m.run_frame();
    m.ppu.load_state(&state)?;
    assert_eq!(m.ppu.frame_count(), 2);
    assert!(!m.ppu.is_odd_frame());
    Ok(())
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "state loaded mid-frame")]
fn loading_inside_an_open_frame_panics() {
    let mut m = busy_machine(9);
    let state = m.ppu.save_state().expect("save");
    m.begin_frame();
    let _ = m.ppu.load_state(&state);
}
