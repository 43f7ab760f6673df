//! Cycle-accurate NES picture processing unit.
//!
//! The core is driven by a host CPU model through [`CpuLink`]: the host opens
//! and closes frames, and forwards `$2000-$3FFF` and `$4014` accesses. The PPU
//! catches up lazily to the host's master-cycle counter on every access.
//! Cartridge hardware plugs in through [`VideoMapper`] and
//! [`ppu::banks::VideoBanks`].

pub mod config;
pub mod error;
pub mod host;
pub mod mapper;
pub mod mem_block;
pub mod memory;
pub mod ppu;
pub mod reset_kind;

pub use config::{PpuConfig, Region, SpriteLimit, Timing};
pub use error::{Error, Result};
pub use host::{CpuLink, PpuBus};
pub use mapper::VideoMapper;
pub use ppu::Ppu;
pub use reset_kind::ResetKind;
