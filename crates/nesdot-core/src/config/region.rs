use core::fmt;

/// Runtime region / timing selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Region {
    /// North American / Japanese NTSC timing (2C02).
    #[default]
    Ntsc,
    /// European PAL timing (2C07).
    Pal,
    /// Dendy-style hybrid timing used by some Famiclones.
    Dendy,
}

/// Frame geometry and clock ratios for one region.
///
/// All cycle figures are in master clocks, the unit the host CPU reports
/// through [`crate::host::CpuLink::cycles`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timing {
    /// Master clocks per PPU dot.
    pub dot: u64,
    /// Master clocks per CPU cycle.
    pub cpu_cycle: u64,
    /// Scanlines per frame, pre-render line included.
    pub lines_per_frame: u16,
    /// Scanline whose dot 1 raises the vblank flag.
    pub vblank_line: u16,
    /// Whether odd frames drop the last dot of the pre-render line.
    pub odd_frame_skip: bool,
}

impl Timing {
    /// Dots per scanline.
    pub const DOTS_PER_LINE: u16 = 341;

    /// Dots in a frame before any odd-frame adjustment.
    pub const fn dots_per_frame(&self) -> u64 {
        self.lines_per_frame as u64 * Self::DOTS_PER_LINE as u64
    }
}

const NTSC: Timing = Timing {
    dot: 4,
    cpu_cycle: 12,
    lines_per_frame: 262,
    vblank_line: 241,
    odd_frame_skip: true,
};

const PAL: Timing = Timing {
    dot: 5,
    cpu_cycle: 16,
    lines_per_frame: 312,
    vblank_line: 241,
    odd_frame_skip: false,
};

const DENDY: Timing = Timing {
    dot: 5,
    cpu_cycle: 15,
    lines_per_frame: 312,
    vblank_line: 291,
    odd_frame_skip: false,
};

impl Region {
    pub const fn timing(self) -> &'static Timing {
        match self {
            Region::Ntsc => &NTSC,
            Region::Pal => &PAL,
            Region::Dendy => &DENDY,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Region::Ntsc => "ntsc",
            Region::Pal => "pal",
            Region::Dendy => "dendy",
        };
        f.write_str(s)
    }
}
