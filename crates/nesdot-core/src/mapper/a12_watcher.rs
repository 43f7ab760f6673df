//! A12 edge detection for MMC3-style scanline counters.
//!
//! MMC3-family mappers clock their IRQ counter on rising edges of PPU address
//! line A12. Rapid toggles during sprite fetches must not count, so a rise is
//! only reported after A12 stayed low for a minimum time.

use crate::config::Timing;

/// A12 transition reported by [`A12Watcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum A12StateChange {
    None,
    /// Low to high after the debounce window.
    Rise,
    /// High to low.
    Fall,
}

/// Watches PPU A12 (mask `0x1000`) on the address-line hook.
///
/// `cycles_down == 0` means A12 is considered high. The first low observation
/// sets it to 1 and reports a fall; later observations add the elapsed master
/// clocks. A high observation reports a rise iff the accumulated low time is
/// strictly greater than `min_low`.
#[derive(Debug, Clone)]
pub struct A12Watcher {
    last_cycle: u64,
    cycles_down: u64,
    min_low: u64,
}

impl A12Watcher {
    /// Dots A12 has to stay low on MMC3 boards.
    pub const MMC3_LOW_DOTS: u64 = 10;

    /// `min_low` is in master clocks, the unit of the `cycle` argument.
    pub const fn new(min_low: u64) -> Self {
        Self {
            last_cycle: 0,
            cycles_down: 0,
            min_low,
        }
    }

    /// MMC3 debounce for the given region's dot length.
    pub const fn for_timing(timing: &Timing) -> Self {
        Self::new(Self::MMC3_LOW_DOTS * timing.dot)
    }

    pub fn reset(&mut self) {
        self.last_cycle = 0;
        self.cycles_down = 0;
    }

    /// Feeds one bus address as seen by [`crate::mapper::VideoMapper::on_address_line`].
    pub fn update(&mut self, addr: u16, cycle: u64) -> A12StateChange {
        let mut result = A12StateChange::None;

        if self.cycles_down > 0 {
            self.cycles_down = self
                .cycles_down
                .saturating_add(cycle.saturating_sub(self.last_cycle));
        }

        if addr & 0x1000 == 0 {
            if self.cycles_down == 0 {
                self.cycles_down = 1;
                result = A12StateChange::Fall;
            }
        } else {
            if self.cycles_down > self.min_low {
                result = A12StateChange::Rise;
            }
            self.cycles_down = 0;
        }

        self.last_cycle = cycle;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_fall_and_rise_with_delay() {
        let mut w = A12Watcher::new(10);

        assert_eq!(w.update(0x1000, 0), A12StateChange::None);
        assert_eq!(w.update(0x0000, 1), A12StateChange::Fall);
        assert_eq!(w.update(0x0000, 5), A12StateChange::None);
        // 1 + (5 - 1) = 5, not > 10.
        assert_eq!(w.update(0x1000, 6), A12StateChange::None);

        assert_eq!(w.update(0x0000, 10), A12StateChange::Fall);
        assert_eq!(w.update(0x0000, 25), A12StateChange::None);
        assert_eq!(w.update(0x1ABC, 26), A12StateChange::Rise);
    }

    #[test]
    fn ntsc_threshold_is_forty_master_clocks() {
        let mut w = A12Watcher::for_timing(crate::config::Region::Ntsc.timing());
        assert_eq!(w.update(0x0000, 100), A12StateChange::Fall);
        assert_eq!(w.update(0x1000, 139), A12StateChange::None);
        assert_eq!(w.update(0x0000, 200), A12StateChange::Fall);
        assert_eq!(w.update(0x1000, 240), A12StateChange::Rise);
    }
}
