//! Fixed-size byte blocks backing the PPU's internal RAMs.
//!
//! Every on-chip memory (OAM, secondary OAM, CIRAM and palette RAM) is a
//! [`ByteBlock`] of a length known at compile time. A block derefs to a byte
//! slice and is serialized as a single byte string, so a save-state body that
//! carries a block of the wrong size fails to decode instead of being
//! truncated or padded.

use core::{
    fmt,
    ops::{Deref, DerefMut},
};

use serde::de::{self, Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};

#[cfg(any(feature = "boxed-memblock", target_arch = "wasm32"))]
type Storage<const N: usize> = Box<[u8; N]>;

#[cfg(not(any(feature = "boxed-memblock", target_arch = "wasm32")))]
type Storage<const N: usize> = [u8; N];

/// `N` bytes, inline unless `boxed-memblock` (or a wasm target) moves them to
/// the heap.
#[repr(transparent)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ByteBlock<const N: usize>(Storage<N>);

pub mod ppu {
    use super::ByteBlock;
    use crate::memory;

    /// Character Internal RAM (CIRAM): the console's 2 KiB of nametable RAM.
    pub type Ciram = ByteBlock<{ memory::CIRAM_SIZE }>;
    pub type PaletteRam = ByteBlock<{ memory::PALETTE_RAM_SIZE }>;
    pub type OamRam = ByteBlock<{ memory::OAM_RAM_SIZE }>;
    pub type SecondaryOamRam = ByteBlock<{ memory::SECONDARY_OAM_RAM_SIZE }>;
}

impl<const N: usize> ByteBlock<N> {
    /// Size of the block in bytes.
    pub const LEN: usize = N;

    /// A zeroed block.
    pub fn new() -> Self {
        Self::filled(0)
    }

    /// A block with every byte set to `value`.
    #[cfg(any(feature = "boxed-memblock", target_arch = "wasm32"))]
    pub fn filled(value: u8) -> Self {
        Self(Box::new([value; N]))
    }

    /// A block with every byte set to `value`.
    #[cfg(not(any(feature = "boxed-memblock", target_arch = "wasm32")))]
    pub fn filled(value: u8) -> Self {
        Self([value; N])
    }

    /// Builds a block from exactly `N` bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != N {
            return None;
        }
        let mut block = Self::new();
        block.copy_from_slice(bytes);
        Some(block)
    }

    #[inline]
    pub fn fill(&mut self, value: u8) {
        self.0.fill(value);
    }
}

impl<const N: usize> Default for ByteBlock<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Deref for ByteBlock<N> {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        &self.0[..]
    }
}

impl<const N: usize> DerefMut for ByteBlock<N> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.0[..]
    }
}

impl<const N: usize> Serialize for ByteBlock<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(self)
    }
}

struct BlockVisitor<const N: usize>;

impl<'de, const N: usize> Visitor<'de> for BlockVisitor<N> {
    type Value = ByteBlock<N>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{N} bytes")
    }

    fn visit_bytes<E: de::Error>(self, bytes: &[u8]) -> Result<Self::Value, E> {
        ByteBlock::from_slice(bytes).ok_or_else(|| E::invalid_length(bytes.len(), &self))
    }

    // Self-describing formats may hand bytes over as a sequence.
    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut block = ByteBlock::new();
        for (idx, slot) in block.iter_mut().enumerate() {
            *slot = seq
                .next_element()?
                .ok_or_else(|| <A::Error as de::Error>::invalid_length(idx, &self))?;
        }
        if seq.next_element::<u8>()?.is_some() {
            return Err(de::Error::invalid_length(N + 1, &self));
        }
        Ok(block)
    }
}

impl<'de, const N: usize> Deserialize<'de> for ByteBlock<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_bytes(BlockVisitor::<N>)
    }
}
