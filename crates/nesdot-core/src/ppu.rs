//! Dot-accurate 2C02-family picture processing unit.
//!
//! The PPU runs lazily against the host CPU's master-cycle counter. The host
//! opens every frame with [`Ppu::begin_frame`] and closes it with
//! [`Ppu::end_frame`]; in between, each register access first catches the dot
//! state machine up to the cycle the access lands on, so side effects happen
//! at the right dot no matter when the host gets around to calling in.
//!
//! A frame is the pre-render line (-1), the 240 visible lines, and then the
//! post-render and vblank lines. The latter are never stepped dot by dot:
//! the only event in them is the vblank flag, whose cycle is known when the
//! frame begins.

pub mod banks;
mod background;
pub mod buffer;
mod clock;
mod fetch_table;
mod palette;
pub mod registers;
mod savestate;
mod sprite;
mod sprite_eval;
mod sprite_pipeline;

pub use buffer::{FrameBuffer, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use clock::{SCANLINE_LAST_VISIBLE, SCANLINE_PRERENDER, SCANLINE_VBLANK};
pub use palette::ColorMap;

use tracing::{debug, trace};

use crate::{
    config::{PpuConfig, SpriteLimit, Timing},
    host::PpuBus,
    mem_block::ppu::{OamRam, SecondaryOamRam},
    memory::{OAM_DMA, OAM_ENTRY_SIZE, OAM_RAM_SIZE, PALETTE_BASE, Register},
    reset_kind::ResetKind,
};

use self::{
    background::BgPipeline,
    banks::VideoBanks,
    clock::Clock,
    fetch_table::{FETCH_OPS, FetchOp, SPRITE_FETCH_END, SPRITE_FETCH_START, sprite_slot},
    palette::{POWER_UP_PALETTE, Palette},
    registers::{Control, Mask, Registers, Status, Visibility, VramAddr},
    sprite::SpriteAttributes,
    sprite_eval::{EvalContext, SpriteEval},
    sprite_pipeline::SpritePipeline,
};

/// Per-frame vblank bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
struct VblankLatch {
    /// The vblank dot has passed this frame.
    raised: bool,
    /// A `$2002` read raced the vblank dot; the flag stays clear.
    suppressed: bool,
    /// Cycle of the NMI currently scheduled with the host.
    nmi_at: Option<u64>,
}

impl VblankLatch {
    /// State outside any frame: nothing left to raise.
    const PARKED: Self = Self {
        raised: true,
        suppressed: false,
        nmi_at: None,
    };
}

#[derive(Debug, Clone)]
pub struct Ppu {
    /// Region and sprite limit chosen by the host.
    config: PpuConfig,
    /// Dot length, line count and vblank line of `config.region`.
    timing: Timing,
    /// Current dot and scanline, plus the open frame's cycle landmarks.
    clock: Clock,
    /// Collection of CPU visible registers and their helper latches.
    registers: Registers,
    /// Primary object attribute memory (64 entries of 4 bytes).
    oam: OamRam,
    /// Up to eight objects selected for the next line (more when unlimited).
    secondary: SecondaryOamRam,
    /// Object evaluation state machine, stepped on odd dots 65..=255.
    eval: SpriteEval,
    /// Decoded object strips for the line being drawn.
    sprites: SpritePipeline,
    /// Background pattern and attribute shifters.
    bg: BgPipeline,
    /// Per-column masks for the left-edge clip, derived from `$2001`.
    visibility: Visibility,
    /// Palette RAM and the output color cache.
    palette: Palette,
    /// Pattern tables, CIRAM and their mapping onto the PPU address space.
    banks: VideoBanks,
    output: FrameBuffer,
    /// Address last driven onto the PPU bus by a fetch.
    bus_addr: u16,
    /// Total number of frames completed so far.
    frame: u64,
    /// Parity of the open frame. Odd NTSC frames may drop a dot.
    odd_frame: bool,
    burst_phase: u8,
    /// Set by a warm reset; configuration writes are ignored until the end
    /// of the next frame.
    power_pending: bool,
    vblank: VblankLatch,
    /// Between `begin_frame` and `end_frame`.
    in_frame: bool,
}

impl Ppu {
    /// Powers on a PPU with 8 KiB of CHR RAM and vertical mirroring.
    pub fn new(config: PpuConfig) -> Self {
        Self::with_banks(config, VideoBanks::new())
    }

    pub fn with_banks(config: PpuConfig, banks: VideoBanks) -> Self {
        let mut ppu = Self {
            config,
            timing: *config.region.timing(),
            clock: Clock::idle(0),
            registers: Registers::default(),
            oam: OamRam::new(),
            secondary: SecondaryOamRam::filled(0xFF),
            eval: SpriteEval::default(),
            sprites: SpritePipeline::default(),
            bg: BgPipeline::default(),
            visibility: Visibility::default(),
            palette: Palette::new(),
            banks,
            output: FrameBuffer::new(),
            bus_addr: 0,
            frame: 0,
            odd_frame: false,
            burst_phase: 0,
            power_pending: false,
            vblank: VblankLatch::PARKED,
            in_frame: false,
        };
        ppu.reset(ResetKind::PowerOn);
        ppu
    }

    /// Resets the chip and parks it between frames at its current cycle.
    ///
    /// A cold reset reloads the power-up palette and clears OAM, nametable RAM
    /// and every register. A warm reset clears control, mask, scroll and the
    /// read buffer, keeps `v`, status and all memories, and makes the chip
    /// ignore `$2000/$2001/$2005/$2006` writes until the next frame ends.
    pub fn reset(&mut self, kind: ResetKind) {
        debug!(?kind, frame = self.frame, "ppu reset");
        self.clock = Clock::idle(self.clock.count);
        if kind.is_cold() {
            self.registers = Registers::default();
            self.oam.fill(0);
            self.banks.ciram_mut().fill(0);
            self.palette.load(&POWER_UP_PALETTE);
            self.odd_frame = false;
            self.burst_phase = 0;
            self.power_pending = false;
        } else {
            self.registers.soft_reset();
            self.power_pending = true;
        }
        self.secondary.fill(0xFF);
        self.eval = SpriteEval::default();
        self.sprites = SpritePipeline::default();
        self.bg = BgPipeline::default();
        self.bus_addr = 0;
        self.vblank = VblankLatch::PARKED;
        self.in_frame = false;
        self.refresh_derived();
    }

    /// Recomputes state derived from `$2001`.
    pub(crate) fn refresh_derived(&mut self) {
        let mask = self.registers.mask;
        self.visibility = mask.visibility();
        self.palette.set_mask(mask);
    }

    /// Opens a frame at the cycle the previous one ended.
    ///
    /// The frame length is predicted from the current parity and `$2001`;
    /// the pre-render line settles it at dot 339. An NMI is scheduled for the
    /// vblank dot if `$2000` asks for one.
    pub fn begin_frame(&mut self, bus: &mut PpuBus<'_>) {
        debug_assert!(
            !self.in_frame && self.clock.between_frames(),
            "begin_frame called inside an open frame"
        );
        let short = self.short_frame_due();
        self.clock.begin(&self.timing, short);
        self.vblank = VblankLatch::default();
        self.in_frame = true;
        if self.registers.control.nmi_enabled() {
            self.schedule_nmi(self.clock.vblank_at, bus);
        }
        trace!(
            frame = self.frame,
            start = self.clock.frame_start,
            end = self.clock.frame_end,
            "frame begin"
        );
    }

    /// Runs the open frame to completion.
    pub fn end_frame(&mut self, bus: &mut PpuBus<'_>) {
        debug_assert!(self.in_frame, "end_frame called without begin_frame");
        self.advance_to(self.clock.frame_end, bus);
        let dots = self.clock.frame_dots(&self.timing);
        self.burst_phase = ((u64::from(self.burst_phase) + dots) % 3) as u8;
        self.odd_frame = !self.odd_frame;
        self.frame += 1;
        self.power_pending = false;
        self.in_frame = false;
        trace!(frame = self.frame, dots, "frame end");
    }

    /// Executes every dot scheduled before `target`, stopping at the end of
    /// the frame. Already caught up is a no-op.
    pub fn advance_to(&mut self, target: u64, bus: &mut PpuBus<'_>) {
        while self.clock.count < target {
            if self.clock.scanline == SCANLINE_VBLANK {
                self.idle_until(target);
                return;
            }
            self.step_dot(bus);
            self.clock.tick(&self.timing);
        }
    }

    fn idle_until(&mut self, target: u64) {
        let target = target.min(self.clock.frame_end);
        if !self.vblank.raised && target > self.clock.vblank_at {
            self.vblank.raised = true;
            if !self.vblank.suppressed {
                self.registers.status.insert(Status::VERTICAL_BLANK);
            }
        }
        self.clock.count = self.clock.count.max(target);
    }

    fn short_frame_due(&self) -> bool {
        self.timing.odd_frame_skip && self.odd_frame && self.registers.mask.rendering_enabled()
    }

    /// Pre-render dot 339: the skip decision is final.
    fn settle_frame_length(&mut self, bus: &mut PpuBus<'_>) {
        let short = self.short_frame_due();
        if short == self.clock.short_frame {
            return;
        }
        let predicted = self.clock.vblank_at;
        self.clock.set_short_frame(&self.timing, short);
        if self.vblank.nmi_at == Some(predicted) {
            self.schedule_nmi(self.clock.vblank_at, bus);
        }
    }

    fn schedule_nmi(&mut self, at: u64, bus: &mut PpuBus<'_>) {
        self.vblank.nmi_at = Some(at);
        bus.schedule_nmi(at);
    }

    fn rendering_active(&self) -> bool {
        self.registers.mask.rendering_enabled() && self.clock.scanline <= SCANLINE_LAST_VISIBLE
    }

    fn evaluation_running(&self) -> bool {
        self.registers.mask.rendering_enabled()
            && (0..=SCANLINE_LAST_VISIBLE).contains(&self.clock.scanline)
    }

    fn step_dot(&mut self, bus: &mut PpuBus<'_>) {
        let dot = self.clock.dot;
        let scanline = self.clock.scanline;
        debug_assert!(
            dot < Timing::DOTS_PER_LINE
                && (SCANLINE_PRERENDER..=SCANLINE_LAST_VISIBLE).contains(&scanline),
            "stepping outside the rendered lines: ({scanline}, {dot})"
        );
        let rendering = self.registers.mask.rendering_enabled();

        if dot == 0 {
            bus.hactive(scanline, rendering, &mut self.banks);
            return;
        }
        if scanline == SCANLINE_PRERENDER && dot == 1 {
            self.registers.status.remove(Status::all());
        }
        if scanline >= 0 && dot <= 256 {
            self.render_pixel(usize::from(dot - 1), scanline as usize);
        }

        if rendering {
            if scanline >= 0 {
                self.evaluate(dot, scanline);
            }
            if dot == SPRITE_FETCH_START {
                let (count, zero) = if scanline >= 0 {
                    (self.eval.count(), self.eval.zero_in_range())
                } else {
                    (0, false)
                };
                self.sprites.prepare(count, zero);
                self.eval.end();
            }
            self.fetch(dot, scanline, bus);
            if dot == SPRITE_FETCH_START {
                self.registers.vram.v.copy_horizontal(self.registers.vram.t);
            }
            if scanline == SCANLINE_PRERENDER && (280..=304).contains(&dot) {
                self.registers.vram.v.copy_vertical(self.registers.vram.t);
            }
            if (SPRITE_FETCH_START..=SPRITE_FETCH_END).contains(&dot) {
                self.registers.oam_addr = 0;
            }
        }

        if dot == SPRITE_FETCH_START {
            bus.hblank(scanline, rendering, &mut self.banks);
        }
        if scanline == SCANLINE_PRERENDER && dot == Timing::DOTS_PER_LINE - 2 {
            self.settle_frame_length(bus);
        }
    }

    fn evaluate(&mut self, dot: u16, scanline: i16) {
        let limit = self.config.sprite_limit;
        match dot {
            1..=64 => self.eval.clear_step(dot, &mut self.secondary, limit),
            65..=256 => {
                if dot == 65 {
                    self.eval.begin(self.registers.oam_addr);
                }
                let mut ctx = EvalContext {
                    oam: &self.oam,
                    secondary: &mut self.secondary,
                    status: &mut self.registers.status,
                    scanline,
                    height: self.registers.control.sprite_height(),
                    limit,
                };
                if dot % 2 == 1 {
                    self.eval.step(&mut ctx);
                } else if dot == 256 && limit == SpriteLimit::Unlimited {
                    self.eval.finish(&mut ctx);
                }
            }
            _ => {}
        }
    }

    /// Puts `addr` on the bus for the next dot's read.
    #[inline]
    fn drive(&mut self, addr: u16, bus: &mut PpuBus<'_>) {
        self.bus_addr = addr;
        bus.address_line(addr, self.clock.count);
    }

    fn fetch(&mut self, dot: u16, scanline: i16, bus: &mut PpuBus<'_>) {
        let v = self.registers.vram.v;
        let control = self.registers.control;
        match FETCH_OPS[usize::from(dot)] {
            FetchOp::Idle => {}
            FetchOp::BgOpenName | FetchOp::DummyOpenName | FetchOp::ObjOpenAttribute => {
                self.drive(v.tile_addr(), bus)
            }
            FetchOp::ObjOpenName => {
                let (slot, _) = sprite_slot(dot);
                self.sprites.select(slot, &self.secondary);
                self.drive(v.tile_addr(), bus);
            }
            FetchOp::BgName => self.bg.tile = self.banks.read_nametable(self.bus_addr, bus),
            FetchOp::ObjName | FetchOp::ObjAttribute | FetchOp::DummyName => {
                self.banks.read_nametable(self.bus_addr, bus);
            }
            FetchOp::BgOpenAttribute => self.drive(v.attribute_addr(), bus),
            FetchOp::BgAttribute => {
                let byte = self.banks.read_nametable(self.bus_addr, bus);
                self.bg.latch_attribute(byte, v.attribute_shift());
            }
            FetchOp::BgOpenLow => {
                let addr = control.background_pattern_table()
                    | (u16::from(self.bg.tile) << 4)
                    | u16::from(v.fine_y());
                self.drive(addr, bus);
            }
            FetchOp::BgLow => self.bg.pattern_low = self.banks.read_pattern(self.bus_addr, bus),
            FetchOp::BgOpenHigh | FetchOp::ObjOpenHigh => self.drive(self.bus_addr | 8, bus),
            FetchOp::BgHigh => {
                self.bg.pattern_high = self.banks.read_pattern(self.bus_addr, bus);
                self.bg.load(dot);
                self.registers.vram.v.increment_coarse_x();
                if dot == 256 {
                    self.registers.vram.v.increment_y();
                }
            }
            FetchOp::ObjOpenLow => {
                let addr = self.sprites.entry().pattern_addr(
                    scanline,
                    control.sprite_height(),
                    control.sprite_pattern_table(),
                );
                self.drive(addr, bus);
            }
            FetchOp::ObjLow => {
                let low = self.banks.read_pattern(self.bus_addr, bus);
                self.sprites.latch_low(low);
            }
            FetchOp::ObjHigh => {
                let (slot, _) = sprite_slot(dot);
                let high = self.banks.read_pattern(self.bus_addr, bus);
                self.sprites.commit(slot, high);
                if dot == SPRITE_FETCH_END {
                    self.fetch_extra_sprites(scanline, bus);
                }
            }
        }

        if (SPRITE_FETCH_START..=SPRITE_FETCH_END).contains(&dot) {
            let (slot, byte) = sprite_slot(dot);
            self.eval
                .set_latch(self.secondary[slot * OAM_ENTRY_SIZE + byte.min(3)]);
        }
    }

    /// Objects past the eighth, when the line limit is lifted. Fetched off
    /// the bus, so mappers never see them.
    fn fetch_extra_sprites(&mut self, scanline: i16, bus: &mut PpuBus<'_>) {
        let control = self.registers.control;
        for slot in usize::from(SpriteLimit::HARDWARE)..self.sprites.pending() {
            self.sprites.select(slot, &self.secondary);
            let addr = self.sprites.entry().pattern_addr(
                scanline,
                control.sprite_height(),
                control.sprite_pattern_table(),
            );
            let low = self.banks.read_pattern(addr, bus);
            let high = self.banks.read_pattern(addr | 8, bus);
            self.sprites.latch_low(low);
            self.sprites.commit(slot, high);
        }
    }

    fn render_pixel(&mut self, x: usize, y: usize) {
        let color = if self.registers.mask.rendering_enabled() {
            self.composite(x)
        } else {
            self.backdrop()
        };
        self.output.set(x, y, color);
    }

    #[inline]
    fn composite(&mut self, x: usize) -> u16 {
        let bg = self.bg.pixel(x, self.registers.vram.x) & self.visibility.background(x);
        let bg_opaque = bg & 0b11 != 0;
        let mut index = if bg_opaque { bg } else { 0 };

        if self.visibility.sprites(x) != 0 {
            if let Some(obj) = self.sprites.pixel(x) {
                // Column 255 never reports a hit.
                if obj.zero && bg_opaque && x != 255 {
                    self.registers.status.insert(Status::SPRITE_ZERO_HIT);
                }
                if !(obj.behind && bg_opaque) {
                    index = obj.value;
                }
            }
        }
        self.palette.output(usize::from(index))
    }

    /// Rendering off: the backdrop, or the palette entry `v` points at.
    fn backdrop(&self) -> u16 {
        let addr = self.registers.vram.v.bus_addr();
        if addr >= PALETTE_BASE {
            self.palette.output(usize::from(addr & 0x1F))
        } else {
            self.palette.output(0)
        }
    }

    /// CPU read of `$2000-$3FFF`.
    pub fn cpu_read(&mut self, addr: u16, bus: &mut PpuBus<'_>) -> u8 {
        let at = bus.cycles();
        self.advance_to(at, bus);
        let value = match Register::from_cpu_addr(addr) {
            Register::Status => self.read_status(at, bus),
            Register::OamData => self.read_oam_data(),
            Register::Data => self.read_data(at, bus),
            _ => self.registers.io_latch,
        };
        self.registers.io_latch = value;
        value
    }

    /// CPU write of `$2000-$3FFF`, or of the OAM DMA port at `$4014`.
    pub fn cpu_write(&mut self, addr: u16, value: u8, bus: &mut PpuBus<'_>) {
        if addr == OAM_DMA {
            self.oam_dma(value, bus);
            return;
        }
        let register = Register::from_cpu_addr(addr);
        let at = bus.cycles() + register.write_latency() * self.timing.dot;
        self.advance_to(at, bus);
        self.registers.io_latch = value;

        if self.power_pending && register.ignored_during_warm_up() {
            trace!(?register, value, "write ignored during warm-up");
            return;
        }
        match register {
            Register::Control => self.write_control(value, at, bus),
            Register::Mask => self.write_mask(value),
            Register::Status => {}
            Register::OamAddr => self.registers.oam_addr = value,
            Register::OamData => self.write_oam_data(value),
            Register::Scroll => self.registers.vram.write_scroll(value),
            Register::Addr => {
                if let Some(addr) = self.registers.vram.write_addr(value) {
                    self.registers.vram.v = addr;
                    bus.address_line(addr.bus_addr(), at);
                }
            }
            Register::Data => self.write_data(value, at, bus),
        }
    }

    fn read_status(&mut self, at: u64, bus: &mut PpuBus<'_>) -> u8 {
        let vblank_at = self.clock.vblank_at;
        if self.in_frame && !self.vblank.raised && at + self.timing.dot > vblank_at {
            debug!(at, "status read on the vblank dot");
            self.vblank.suppressed = true;
            if self.vblank.nmi_at == Some(vblank_at) {
                self.vblank.nmi_at = None;
                bus.cancel_nmi();
            }
        }
        let value = self.registers.status_byte();
        self.registers.status.remove(Status::VERTICAL_BLANK);
        self.registers.vram.reset_latch();
        value
    }

    fn write_control(&mut self, value: u8, at: u64, bus: &mut PpuBus<'_>) {
        let was_enabled = self.registers.control.nmi_enabled();
        self.registers.write_control(value);
        let enabled = self.registers.control.nmi_enabled();
        if enabled == was_enabled {
            return;
        }

        if !enabled {
            if let Some(nmi_at) = self.vblank.nmi_at {
                if nmi_at > at {
                    self.vblank.nmi_at = None;
                    bus.cancel_nmi();
                }
            }
        } else if self.in_frame && !self.vblank.raised && !self.vblank.suppressed {
            self.schedule_nmi(self.clock.vblank_at, bus);
        } else if self.registers.status.contains(Status::VERTICAL_BLANK)
            && at < self.clock.frame_end
        {
            // The flag is cleared on pre-render dot 1; an edge landing there
            // or later is lost.
            debug!(at, "nmi enabled while vblank is pending");
            self.schedule_nmi(at + self.timing.dot, bus);
        }
    }

    fn write_mask(&mut self, value: u8) {
        let mask = Mask::from_bits_retain(value);
        self.registers.mask = mask;
        self.visibility = mask.visibility();
        self.palette.set_mask(mask);
    }

    fn read_oam_data(&self) -> u8 {
        if self.evaluation_running() {
            self.eval.latch()
        } else {
            self.oam[usize::from(self.registers.oam_addr)]
        }
    }

    /// `$2004` write, also the path every DMA byte takes.
    fn write_oam_data(&mut self, value: u8) {
        let addr = self.registers.oam_addr;
        if self.rendering_active() {
            self.registers.oam_addr = addr.wrapping_add(4);
            return;
        }
        let value = if addr & 3 == 2 {
            value & SpriteAttributes::STORED_MASK
        } else {
            value
        };
        self.oam[usize::from(addr)] = value;
        self.registers.oam_addr = addr.wrapping_add(1);
    }

    fn increment_v(&mut self) {
        let step = self.registers.control.vram_increment();
        self.registers.vram.v.increment(step);
    }

    fn read_data(&mut self, at: u64, bus: &mut PpuBus<'_>) -> u8 {
        if self.rendering_active() {
            let value = self.registers.read_buffer;
            self.increment_v();
            return value;
        }
        let addr = self.registers.vram.v.bus_addr();
        bus.address_line(addr, at);
        let value = if addr >= PALETTE_BASE {
            // The buffer picks up the nametable byte hidden under the palette.
            self.registers.read_buffer = self.banks.read(addr & 0x2FFF, bus);
            (self.registers.io_latch & 0xC0) | self.palette.read(addr)
        } else {
            let fetched = self.banks.read(addr, bus);
            std::mem::replace(&mut self.registers.read_buffer, fetched)
        };
        self.increment_v();
        value
    }

    fn write_data(&mut self, value: u8, at: u64, bus: &mut PpuBus<'_>) {
        if !self.rendering_active() {
            let addr = self.registers.vram.v.bus_addr();
            bus.address_line(addr, at);
            if addr >= PALETTE_BASE {
                self.palette.write(addr, value);
            } else {
                self.banks.write(addr, value, bus);
            }
        }
        self.increment_v();
    }

    /// OAM DMA from CPU page `page`.
    ///
    /// Steals one alignment cycle (two when started on an odd CPU cycle) and
    /// then a read and a write cycle per byte. Each byte lands through the
    /// `$2004` path at its own write cycle, unless the source is internal RAM
    /// and the PPU cannot be rendering during the transfer, in which case the
    /// page is copied in one go.
    pub fn oam_dma(&mut self, page: u8, bus: &mut PpuBus<'_>) {
        let cpu_cycle = self.timing.cpu_cycle;
        let odd = (bus.cycles() / cpu_cycle) % 2 == 1;
        bus.steal_cycles(1 + u32::from(odd));

        let base = u16::from(page) << 8;
        let start = bus.cycles();
        self.advance_to(start, bus);

        let transfer = 2 * OAM_RAM_SIZE as u64 * cpu_cycle;
        let quiet = !self.registers.mask.rendering_enabled()
            || (self.clock.scanline == SCANLINE_VBLANK
                && start + transfer <= self.clock.frame_end);
        if page < 0x20 && quiet {
            let mut last = self.registers.io_latch;
            for offset in 0..OAM_RAM_SIZE as u16 {
                last = bus.dma_read(base | offset);
                self.write_oam_data(last);
            }
            self.registers.io_latch = last;
            bus.steal_cycles(2 * OAM_RAM_SIZE as u32);
            return;
        }

        for offset in 0..OAM_RAM_SIZE as u16 {
            bus.steal_cycles(1);
            let value = bus.dma_read(base | offset);
            bus.steal_cycles(1);
            let at = bus.cycles();
            self.advance_to(at, bus);
            self.registers.io_latch = value;
            self.write_oam_data(value);
        }
    }

    pub fn config(&self) -> &PpuConfig {
        &self.config
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Current scanline; [`SCANLINE_VBLANK`] past the last visible line.
    pub fn scanline(&self) -> i16 {
        self.clock.scanline
    }

    pub fn dot(&self) -> u16 {
        self.clock.dot
    }

    /// Master cycle the PPU has caught up to.
    pub fn cycle(&self) -> u64 {
        self.clock.count
    }

    /// Frames completed since creation.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn frame_start_cycle(&self) -> u64 {
        self.clock.frame_start
    }

    pub fn frame_end_cycle(&self) -> u64 {
        self.clock.frame_end
    }

    /// Master cycle of the dot that raises the vblank flag in the open frame.
    pub fn vblank_cycle(&self) -> u64 {
        self.clock.vblank_at
    }

    /// Length of the open (or last) frame in dots.
    pub fn frame_dots(&self) -> u64 {
        self.clock.frame_dots(&self.timing)
    }

    pub fn is_odd_frame(&self) -> bool {
        self.odd_frame
    }

    /// Color burst phase (0..3) for composite filters.
    pub fn burst_phase(&self) -> u8 {
        self.burst_phase
    }

    /// A warm reset is still masking configuration writes.
    pub fn power_pending(&self) -> bool {
        self.power_pending
    }

    pub fn output(&self) -> &FrameBuffer {
        &self.output
    }

    /// Hands the finished frame to the caller in exchange for `buffer`.
    pub fn swap_output(&mut self, buffer: FrameBuffer) -> FrameBuffer {
        debug_assert!(!self.in_frame, "output swapped mid-frame");
        std::mem::replace(&mut self.output, buffer)
    }

    pub fn banks(&self) -> &VideoBanks {
        &self.banks
    }

    pub fn banks_mut(&mut self) -> &mut VideoBanks {
        &mut self.banks
    }

    /// Installs a remap applied to palette entries before grayscale and
    /// emphasis.
    pub fn set_color_map(&mut self, map: Option<ColorMap>) {
        self.palette.set_color_map(map);
    }

    /// Status flags without read side effects.
    pub fn status(&self) -> Status {
        self.registers.status
    }

    pub fn control(&self) -> Control {
        self.registers.control
    }

    pub fn mask(&self) -> Mask {
        self.registers.mask
    }

    /// Current VRAM address (`v`).
    pub fn vram_addr(&self) -> VramAddr {
        self.registers.vram.v
    }

    /// Temporary VRAM address (`t`).
    pub fn temp_vram_addr(&self) -> VramAddr {
        self.registers.vram.t
    }

    pub fn fine_x(&self) -> u8 {
        self.registers.vram.x
    }

    /// `$2005/$2006` write toggle: `true` when the next write is the second.
    pub fn write_toggle(&self) -> bool {
        self.registers.vram.w
    }

    pub fn oam_addr(&self) -> u8 {
        self.registers.oam_addr
    }

    pub fn oam(&self) -> &[u8] {
        &self.oam
    }

    pub fn palette_ram(&self) -> &[u8] {
        self.palette.ram()
    }
}
