//! Static configuration chosen when the PPU is created.

pub mod region;

pub use region::{Region, Timing};

/// How many objects a scanline may show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpriteLimit {
    /// Eight per line, with the hardware's overflow search.
    #[default]
    Hardware,
    /// Every in-range object is drawn. The overflow flag still rises on the
    /// ninth match so software polling it behaves the same.
    Unlimited,
}

impl SpriteLimit {
    /// Hardware secondary OAM capacity in objects.
    pub const HARDWARE: u8 = 8;

    pub const fn per_line(self) -> u8 {
        match self {
            Self::Hardware => Self::HARDWARE,
            Self::Unlimited => crate::memory::OAM_ENTRIES as u8,
        }
    }
}

/// Construction-time settings for [`crate::ppu::Ppu`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PpuConfig {
    pub region: Region,
    pub sprite_limit: SpriteLimit,
}

impl PpuConfig {
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    pub fn with_sprite_limit(mut self, sprite_limit: SpriteLimit) -> Self {
        self.sprite_limit = sprite_limit;
        self
    }
}
