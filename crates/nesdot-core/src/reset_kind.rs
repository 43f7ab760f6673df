/// How the console was reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResetKind {
    /// Cold boot: every register and RAM block returns to its power-up value.
    PowerOn,
    /// Reset button: scroll and control state clear, memories keep their contents,
    /// and the PPU ignores configuration writes until the first frame completes.
    Soft,
}

impl ResetKind {
    pub const fn is_cold(self) -> bool {
        matches!(self, Self::PowerOn)
    }
}
