//! Per-scanline object evaluation (dots 1..=256 of visible lines).
//!
//! Dots 1-64 clear secondary OAM. From dot 65 one phase transition runs on
//! every odd dot, reading one byte of primary OAM and possibly writing one
//! byte of secondary OAM. The result is consumed by the sprite fetches of
//! dots 257-320, which build the strips drawn on the following line.

use crate::{config::SpriteLimit, memory::OAM_ENTRIES};

use super::registers::Status;

/// Where the evaluation sequencer is within the current line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub(crate) enum EvalPhase {
    /// Before dot 65, and again from dot 257.
    #[default]
    Idle,
    /// Reading byte 0 (Y) of object `n` and testing it against the line.
    Compare,
    /// Copying byte 1 of an in-range object.
    CopyTile,
    /// Copying byte 2 of an in-range object.
    CopyAttribute,
    /// Copying byte 3 of an in-range object; completes the entry.
    CopyX,
    /// Secondary OAM is full. Every byte read is treated as a Y coordinate
    /// and `m` advances with `n` on a miss, so the scan walks diagonally.
    FullScan,
    /// Overflow was found; the sequencer reads `remaining` more bytes.
    OverflowCopy { remaining: u8 },
    /// All 64 objects done: keep reading byte 0 of successive objects.
    Tail,
}

/// Inputs one evaluation step works on.
pub(crate) struct EvalContext<'a> {
    pub(crate) oam: &'a [u8],
    pub(crate) secondary: &'a mut [u8],
    pub(crate) status: &'a mut Status,
    pub(crate) scanline: i16,
    pub(crate) height: u8,
    pub(crate) limit: SpriteLimit,
}

impl EvalContext<'_> {
    #[inline]
    fn in_range(&self, y: u8) -> bool {
        let row = i32::from(self.scanline) - i32::from(y);
        (0..i32::from(self.height)).contains(&row)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub(crate) struct SpriteEval {
    phase: EvalPhase,
    /// Object index, 0..=64; 64 means the scan wrapped.
    n: u8,
    /// Byte within the object.
    m: u8,
    /// Entries written to secondary OAM.
    count: u8,
    /// No object has been compared yet on this line.
    first: bool,
    zero_in_range: bool,
    /// Byte last moved through the OAM data path, returned by `$2004`.
    latch: u8,
}

impl SpriteEval {
    #[cfg(test)]
    pub(crate) fn phase(&self) -> EvalPhase {
        self.phase
    }

    pub(crate) fn count(&self) -> usize {
        usize::from(self.count)
    }

    /// The first object examined on this line matched.
    pub(crate) fn zero_in_range(&self) -> bool {
        self.zero_in_range
    }

    pub(crate) fn latch(&self) -> u8 {
        self.latch
    }

    pub(crate) fn set_latch(&mut self, value: u8) {
        self.latch = value;
    }

    /// Dots 1..=64: odd dots read `$FF`, even dots store it.
    pub(crate) fn clear_step(&mut self, dot: u16, secondary: &mut [u8], limit: SpriteLimit) {
        if dot % 2 == 1 {
            self.latch = 0xFF;
        } else {
            let index = usize::from(dot / 2 - 1);
            secondary[index] = 0xFF;
            if dot == 64 && limit == SpriteLimit::Unlimited {
                secondary.fill(0xFF);
            }
        }
    }

    /// Dot 65: evaluation starts at the object OAMADDR points at.
    pub(crate) fn begin(&mut self, oam_addr: u8) {
        *self = Self {
            phase: EvalPhase::Compare,
            n: oam_addr >> 2,
            m: 0,
            count: 0,
            first: true,
            zero_in_range: false,
            latch: self.latch,
        };
    }

    /// Dot 257: the result is handed to the fetch stage.
    pub(crate) fn end(&mut self) {
        self.phase = EvalPhase::Idle;
        self.count = 0;
    }

    pub(crate) fn step(&mut self, ctx: &mut EvalContext<'_>) {
        self.phase = self.next(ctx);
    }

    /// Runs the remaining transitions at once. Lifting the object limit needs
    /// more steps than a line has odd dots.
    pub(crate) fn finish(&mut self, ctx: &mut EvalContext<'_>) {
        while !matches!(self.phase, EvalPhase::Idle | EvalPhase::Tail) {
            self.step(ctx);
        }
    }

    fn read(&mut self, oam: &[u8]) -> u8 {
        let index = (usize::from(self.n) % OAM_ENTRIES) * 4 + usize::from(self.m);
        self.latch = oam[index];
        self.latch
    }

    /// Moves to the next object, or to the tail once the index wraps.
    fn advance(&mut self, then: EvalPhase) -> EvalPhase {
        self.n += 1;
        if usize::from(self.n) == OAM_ENTRIES {
            EvalPhase::Tail
        } else {
            then
        }
    }

    fn next(&mut self, ctx: &mut EvalContext<'_>) -> EvalPhase {
        match self.phase {
            EvalPhase::Idle => EvalPhase::Idle,
            EvalPhase::Compare => {
                let y = self.read(ctx.oam);
                ctx.secondary[usize::from(self.count) * 4] = y;
                let hit = ctx.in_range(y);
                if std::mem::take(&mut self.first) && hit {
                    self.zero_in_range = true;
                }
                if !hit {
                    return self.advance(EvalPhase::Compare);
                }
                if self.count >= SpriteLimit::HARDWARE {
                    ctx.status.insert(Status::SPRITE_OVERFLOW);
                }
                self.m = 1;
                EvalPhase::CopyTile
            }
            EvalPhase::CopyTile | EvalPhase::CopyAttribute | EvalPhase::CopyX => {
                let byte = self.read(ctx.oam);
                ctx.secondary[usize::from(self.count) * 4 + usize::from(self.m)] = byte;
                match self.phase {
                    EvalPhase::CopyTile => {
                        self.m = 2;
                        EvalPhase::CopyAttribute
                    }
                    EvalPhase::CopyAttribute => {
                        self.m = 3;
                        EvalPhase::CopyX
                    }
                    _ => {
                        self.m = 0;
                        self.count += 1;
                        let then = if self.count >= ctx.limit.per_line() {
                            EvalPhase::FullScan
                        } else {
                            EvalPhase::Compare
                        };
                        self.advance(then)
                    }
                }
            }
            EvalPhase::FullScan => {
                let y = self.read(ctx.oam);
                if ctx.in_range(y) {
                    ctx.status.insert(Status::SPRITE_OVERFLOW);
                    EvalPhase::OverflowCopy { remaining: 3 }
                } else {
                    // Hardware bug: m is incremented along with n.
                    self.m = (self.m + 1) & 3;
                    self.advance(EvalPhase::FullScan)
                }
            }
            EvalPhase::OverflowCopy { remaining } => {
                self.m += 1;
                if self.m == 4 {
                    self.m = 0;
                    self.n += 1;
                }
                self.read(ctx.oam);
                if remaining > 1 {
                    EvalPhase::OverflowCopy {
                        remaining: remaining - 1,
                    }
                } else {
                    self.m = 0;
                    EvalPhase::Tail
                }
            }
            EvalPhase::Tail => {
                self.m = 0;
                self.read(ctx.oam);
                self.n = (self.n + 1) % OAM_ENTRIES as u8;
                EvalPhase::Tail
            }
        }
    }
}
