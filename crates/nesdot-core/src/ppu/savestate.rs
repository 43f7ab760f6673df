//! Save-state chunks.
//!
//! A state is a run of chunks, each `tag: [u8; 4]`, `len: u32` (little
//! endian) and `len` payload bytes. A payload is one version byte followed by
//! a postcard body. Unknown tags and undecodable chunks are skipped; only a
//! stream whose framing is broken fails to load.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::{
    error::{Error, Result},
    mem_block::ppu::{Ciram, OamRam, PaletteRam},
    reset_kind::ResetKind,
};

use super::{
    Ppu,
    registers::{Control, Mask, Status, VramAddr},
};

pub(crate) const TAG_REGISTERS: [u8; 4] = *b"REG\0";
pub(crate) const TAG_PALETTE: [u8; 4] = *b"PAL\0";
pub(crate) const TAG_OAM: [u8; 4] = *b"OAM\0";
pub(crate) const TAG_NAMETABLES: [u8; 4] = *b"NMT\0";
pub(crate) const TAG_FRAME: [u8; 4] = *b"FRM\0";
pub(crate) const TAG_POWER: [u8; 4] = *b"POW\0";

const HEADER_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct RegisterChunk {
    control: u8,
    mask: u8,
    status: u8,
    oam_addr: u8,
    v: u16,
    t: u16,
    fine_x: u8,
    toggle: bool,
    io_latch: u8,
    read_buffer: u8,
}

impl RegisterChunk {
    const VERSION: u8 = 1;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PaletteChunk {
    ram: PaletteRam,
}

impl PaletteChunk {
    const VERSION: u8 = 1;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct OamChunk {
    oam: OamRam,
}

impl OamChunk {
    const VERSION: u8 = 1;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct NametableChunk {
    ciram: Ciram,
}

impl NametableChunk {
    const VERSION: u8 = 1;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct FrameChunk {
    odd_frame: bool,
    burst_phase: u8,
}

impl FrameChunk {
    const VERSION: u8 = 1;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PowerChunk {
    pending: bool,
}

impl PowerChunk {
    const VERSION: u8 = 1;
}

/// One framed chunk borrowed from a state stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Chunk<'a> {
    pub(crate) tag: [u8; 4],
    pub(crate) version: u8,
    pub(crate) body: &'a [u8],
}

impl Chunk<'_> {
    fn decode<T: DeserializeOwned>(&self, version: u8) -> Result<T> {
        if self.version != version {
            return Err(Error::UnsupportedVersion {
                tag: self.tag,
                version: self.version,
            });
        }
        Ok(postcard::from_bytes(self.body)?)
    }
}

#[derive(Debug, Default)]
pub(crate) struct ChunkWriter {
    out: Vec<u8>,
}

impl ChunkWriter {
    pub(crate) fn chunk<T: Serialize>(&mut self, tag: [u8; 4], version: u8, body: &T) -> Result<()> {
        let body = postcard::to_stdvec(body)?;
        let len = (body.len() + 1) as u32;
        self.out.extend_from_slice(&tag);
        self.out.extend_from_slice(&len.to_le_bytes());
        self.out.push(version);
        self.out.extend_from_slice(&body);
        Ok(())
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.out
    }
}

/// Splits a stream into chunks, failing on any framing error.
pub(crate) fn parse(data: &[u8]) -> Result<Vec<Chunk<'_>>> {
    let mut chunks = Vec::new();
    let mut offset = 0;
    while offset < data.len() {
        let Some(header) = data.get(offset..offset + HEADER_LEN) else {
            return Err(Error::TruncatedHeader { offset });
        };
        let mut tag = [0u8; 4];
        tag.copy_from_slice(&header[..4]);
        let mut len = [0u8; 4];
        len.copy_from_slice(&header[4..]);
        let len = u32::from_le_bytes(len) as usize;

        let start = offset + HEADER_LEN;
        let available = data.len() - start;
        if len > available {
            return Err(Error::TruncatedChunk {
                tag,
                offset,
                len,
                available,
            });
        }
        let Some((&version, body)) = data[start..start + len].split_first() else {
            return Err(Error::EmptyChunk { tag });
        };
        chunks.push(Chunk { tag, version, body });
        offset = start + len;
    }
    Ok(chunks)
}

impl Ppu {
    /// Serializes registers, palette, OAM, nametable RAM, frame parity and the
    /// warm-up marker. CHR RAM belongs to the cartridge's save data; see
    /// [`crate::ppu::banks::VideoBanks::chr_ram`].
    pub fn save_state(&self) -> Result<Vec<u8>> {
        let regs = &self.registers;
        let mut writer = ChunkWriter::default();
        writer.chunk(
            TAG_REGISTERS,
            RegisterChunk::VERSION,
            &RegisterChunk {
                control: regs.control.bits(),
                mask: regs.mask.bits(),
                status: regs.status.bits(),
                oam_addr: regs.oam_addr,
                v: regs.vram.v.raw(),
                t: regs.vram.t.raw(),
                fine_x: regs.vram.x,
                toggle: regs.vram.w,
                io_latch: regs.io_latch,
                read_buffer: regs.read_buffer,
            },
        )?;
        writer.chunk(
            TAG_PALETTE,
            PaletteChunk::VERSION,
            &PaletteChunk {
                ram: self.palette.ram().clone(),
            },
        )?;
        writer.chunk(
            TAG_OAM,
            OamChunk::VERSION,
            &OamChunk {
                oam: self.oam.clone(),
            },
        )?;
        writer.chunk(
            TAG_NAMETABLES,
            NametableChunk::VERSION,
            &NametableChunk {
                ciram: self.banks.ciram().clone(),
            },
        )?;
        writer.chunk(
            TAG_FRAME,
            FrameChunk::VERSION,
            &FrameChunk {
                odd_frame: self.odd_frame,
                burst_phase: self.burst_phase,
            },
        )?;
        writer.chunk(
            TAG_POWER,
            PowerChunk::VERSION,
            &PowerChunk {
                pending: self.power_pending,
            },
        )?;
        Ok(writer.finish())
    }

    /// Restores a state produced by [`Ppu::save_state`]. Call between frames.
    ///
    /// The stream is validated up front; on a framing error nothing changes.
    /// Otherwise the PPU is power-cycled and every understood chunk applied,
    /// so chunks missing from the stream keep their reset values.
    pub fn load_state(&mut self, data: &[u8]) -> Result<()> {
        debug_assert!(!self.in_frame, "state loaded mid-frame");
        let chunks = parse(data)?;
        let frame = self.frame;
        self.reset(ResetKind::PowerOn);
        self.frame = frame;
        for chunk in &chunks {
            if let Err(err) = self.apply_chunk(chunk) {
                warn!(tag = ?chunk.tag, %err, "skipping save-state chunk");
            }
        }
        self.refresh_derived();
        Ok(())
    }

    fn apply_chunk(&mut self, chunk: &Chunk<'_>) -> Result<()> {
        match chunk.tag {
            TAG_REGISTERS => {
                let body: RegisterChunk = chunk.decode(RegisterChunk::VERSION)?;
                let regs = &mut self.registers;
                regs.control = Control::from_bits_retain(body.control);
                regs.mask = Mask::from_bits_retain(body.mask);
                regs.status = Status::from_bits_truncate(body.status);
                regs.oam_addr = body.oam_addr;
                regs.vram.v = VramAddr::from(body.v);
                regs.vram.t = VramAddr::from(body.t);
                regs.vram.x = body.fine_x & 0b111;
                regs.vram.w = body.toggle;
                regs.io_latch = body.io_latch;
                regs.read_buffer = body.read_buffer;
            }
            TAG_PALETTE => {
                let body: PaletteChunk = chunk.decode(PaletteChunk::VERSION)?;
                let mut bytes = [0u8; crate::memory::PALETTE_RAM_SIZE];
                bytes.copy_from_slice(&body.ram);
                self.palette.load(&bytes);
            }
            TAG_OAM => {
                let body: OamChunk = chunk.decode(OamChunk::VERSION)?;
                self.oam = body.oam;
            }
            TAG_NAMETABLES => {
                let body: NametableChunk = chunk.decode(NametableChunk::VERSION)?;
                *self.banks.ciram_mut() = body.ciram;
            }
            TAG_FRAME => {
                let body: FrameChunk = chunk.decode(FrameChunk::VERSION)?;
                self.odd_frame = body.odd_frame;
                self.burst_phase = body.burst_phase % 3;
            }
            TAG_POWER => {
                let body: PowerChunk = chunk.decode(PowerChunk::VERSION)?;
                self.power_pending = body.pending;
            }
            tag => warn!(?tag, "unknown save-state chunk"),
        }
        Ok(())
    }
}
