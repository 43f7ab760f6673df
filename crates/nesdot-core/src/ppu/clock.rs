//! Dot/scanline position and its mapping onto host master cycles.

use crate::config::Timing;

/// Scanline index of the pre-render line.
pub const SCANLINE_PRERENDER: i16 = -1;
/// Last line that produces pixels.
pub const SCANLINE_LAST_VISIBLE: i16 = 239;
/// Sentinel for everything after the last visible line: post-render and
/// vblank lines are never stepped dot by dot.
pub const SCANLINE_VBLANK: i16 = i16::MAX;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct Clock {
    /// Master cycle at which the next dot executes.
    pub(crate) count: u64,
    pub(crate) dot: u16,
    pub(crate) scanline: i16,
    pub(crate) frame_start: u64,
    /// Master cycle at which the next frame's pre-render line starts.
    pub(crate) frame_end: u64,
    /// Master cycle of the dot that raises the vblank flag.
    pub(crate) vblank_at: u64,
    /// The pre-render line drops its last dot this frame.
    pub(crate) short_frame: bool,
}

impl Clock {
    /// A clock parked between frames at `at`.
    pub(crate) fn idle(at: u64) -> Self {
        Self {
            count: at,
            dot: 0,
            scanline: SCANLINE_VBLANK,
            frame_start: at,
            frame_end: at,
            vblank_at: at,
            short_frame: false,
        }
    }

    pub(crate) fn between_frames(&self) -> bool {
        self.scanline == SCANLINE_VBLANK && self.count >= self.frame_end
    }

    /// Starts a frame at the current position.
    pub(crate) fn begin(&mut self, timing: &Timing, short_frame: bool) {
        self.frame_start = self.count;
        self.dot = 0;
        self.scanline = SCANLINE_PRERENDER;
        self.set_short_frame(timing, short_frame);
    }

    /// Re-derives the frame end and vblank cycle for the chosen pre-render
    /// line length.
    pub(crate) fn set_short_frame(&mut self, timing: &Timing, short_frame: bool) {
        let skip = u64::from(short_frame);
        self.short_frame = short_frame;
        self.frame_end = self.frame_start + (timing.dots_per_frame() - skip) * timing.dot;
        let vblank_dot =
            (u64::from(timing.vblank_line) + 1) * u64::from(Timing::DOTS_PER_LINE) + 1 - skip;
        self.vblank_at = self.frame_start + vblank_dot * timing.dot;
    }

    /// Frame length in dots.
    pub(crate) fn frame_dots(&self, timing: &Timing) -> u64 {
        (self.frame_end - self.frame_start) / timing.dot
    }

    /// Advances one dot, wrapping lines and entering the vblank sentinel
    /// after the last visible line.
    #[inline]
    pub(crate) fn tick(&mut self, timing: &Timing) {
        self.count += timing.dot;
        let last = if self.scanline == SCANLINE_PRERENDER && self.short_frame {
            Timing::DOTS_PER_LINE - 2
        } else {
            Timing::DOTS_PER_LINE - 1
        };
        if self.dot < last {
            self.dot += 1;
            return;
        }
        self.dot = 0;
        self.scanline = if self.scanline == SCANLINE_LAST_VISIBLE {
            SCANLINE_VBLANK
        } else {
            self.scanline + 1
        };
    }
}
