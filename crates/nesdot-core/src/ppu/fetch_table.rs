//! Per-dot bus activity of a rendered scanline.

use once_cell::sync::Lazy;

use crate::config::Timing;

/// What the PPU drives onto its bus during one dot of a rendered line.
///
/// `Open*` dots put the address out (and are what mappers snoop); the
/// following dot completes the read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum FetchOp {
    Idle,
    BgOpenName,
    BgName,
    BgOpenAttribute,
    BgAttribute,
    BgOpenLow,
    BgLow,
    BgOpenHigh,
    /// Completes a tile: loads the ring and steps coarse X.
    BgHigh,
    ObjOpenName,
    ObjName,
    ObjOpenAttribute,
    ObjAttribute,
    ObjOpenLow,
    ObjLow,
    ObjOpenHigh,
    ObjHigh,
    DummyOpenName,
    DummyName,
}

const BG_GROUP: [FetchOp; 8] = [
    FetchOp::BgOpenName,
    FetchOp::BgName,
    FetchOp::BgOpenAttribute,
    FetchOp::BgAttribute,
    FetchOp::BgOpenLow,
    FetchOp::BgLow,
    FetchOp::BgOpenHigh,
    FetchOp::BgHigh,
];

const OBJ_GROUP: [FetchOp; 8] = [
    FetchOp::ObjOpenName,
    FetchOp::ObjName,
    FetchOp::ObjOpenAttribute,
    FetchOp::ObjAttribute,
    FetchOp::ObjOpenLow,
    FetchOp::ObjLow,
    FetchOp::ObjOpenHigh,
    FetchOp::ObjHigh,
];

pub(crate) const SPRITE_FETCH_START: u16 = 257;
pub(crate) const SPRITE_FETCH_END: u16 = 320;

pub(crate) static FETCH_OPS: Lazy<[FetchOp; Timing::DOTS_PER_LINE as usize]> = Lazy::new(|| {
    let mut ops = [FetchOp::Idle; Timing::DOTS_PER_LINE as usize];
    for (dot, op) in ops.iter_mut().enumerate().skip(1) {
        *op = match dot {
            1..=256 | 321..=336 => BG_GROUP[(dot - 1) % 8],
            257..=320 => OBJ_GROUP[(dot - 257) % 8],
            _ if dot % 2 == 1 => FetchOp::DummyOpenName,
            _ => FetchOp::DummyName,
        };
    }
    ops
});

/// Sprite slot and byte position for a dot inside 257..=320.
#[inline]
pub(crate) fn sprite_slot(dot: u16) -> (usize, usize) {
    let rel = usize::from(dot - SPRITE_FETCH_START);
    (rel / 8, rel % 8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_groups_end_on_multiples_of_eight() {
        assert_eq!(FETCH_OPS[0], FetchOp::Idle);
        assert_eq!(FETCH_OPS[1], FetchOp::BgOpenName);
        assert_eq!(FETCH_OPS[8], FetchOp::BgHigh);
        assert_eq!(FETCH_OPS[256], FetchOp::BgHigh);
        assert_eq!(FETCH_OPS[257], FetchOp::ObjOpenName);
        assert_eq!(FETCH_OPS[320], FetchOp::ObjHigh);
        assert_eq!(FETCH_OPS[328], FetchOp::BgHigh);
        assert_eq!(FETCH_OPS[336], FetchOp::BgHigh);
        assert_eq!(FETCH_OPS[337], FetchOp::DummyOpenName);
        assert_eq!(FETCH_OPS[340], FetchOp::DummyName);
        assert_eq!(sprite_slot(300), (5, 3));
    }
}
