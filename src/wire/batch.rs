use crate::{
    foundation::{
        core::SEGMENT_SIDE,
        error::{WyrmError, WyrmResult},
    },
    wire::pixel::{DecodedPixel, decode_pixel},
};

/// Panel rows carried by one datagram.
pub const ROWS_PER_DATAGRAM: u32 = 4;
/// Wire words carried by one datagram.
pub const WORDS_PER_DATAGRAM: usize = (ROWS_PER_DATAGRAM * SEGMENT_SIDE) as usize;
/// Header bytes: panel select, then a reserved zero.
pub const HEADER_LEN: usize = 2;
/// Total datagram length on the wire.
pub const DATAGRAM_LEN: usize = HEADER_LEN + WORDS_PER_DATAGRAM * 4;
/// Datagrams needed for one 64x64 segment.
pub const DATAGRAMS_PER_SEGMENT: usize = (SEGMENT_SIDE / ROWS_PER_DATAGRAM) as usize;

/// Accumulates four encoded panel rows into one panel-addressed datagram.
///
/// The buffer is reused for every block; a datagram slice is only valid until the
/// next call that mutates the batcher.
#[derive(Clone, Debug)]
pub struct PacketBatcher {
    buf: [u8; DATAGRAM_LEN],
    rows_pending: u32,
}

impl Default for PacketBatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketBatcher {
    /// A batcher with an all-zero buffer.
    pub fn new() -> Self {
        Self {
            buf: [0u8; DATAGRAM_LEN],
            rows_pending: 0,
        }
    }

    /// Start filling datagrams for the panel(s) selected by `select`.
    pub fn begin_segment(&mut self, select: u8) {
        self.buf[0] = select;
        self.buf[1] = 0;
        self.rows_pending = 0;
    }

    /// Panel-select byte currently written in the header.
    pub fn select(&self) -> u8 {
        self.buf[0]
    }

    /// Store the 64 wire words of segment-local `row`.
    ///
    /// Rows of a block must arrive in order, starting on a multiple of four, so a
    /// datagram never mixes rows from another segment or frame. Returns the finished
    /// datagram when `row` closes a four-row block.
    pub fn push_row<I>(&mut self, row: u32, words: I) -> WyrmResult<Option<&[u8]>>
    where
        I: IntoIterator<Item = u32>,
    {
        if row >= SEGMENT_SIDE {
            return Err(WyrmError::encode_overflow(format!(
                "row {row} outside {SEGMENT_SIDE}-row segment"
            )));
        }

        let slot = (row % ROWS_PER_DATAGRAM) as usize;
        if slot as u32 != self.rows_pending {
            return Err(WyrmError::encode_overflow(format!(
                "row {row} out of order: block has {} of {ROWS_PER_DATAGRAM} rows",
                self.rows_pending
            )));
        }
        let start = HEADER_LEN + slot * SEGMENT_SIDE as usize * 4;
        let dst = &mut self.buf[start..start + SEGMENT_SIDE as usize * 4];

        let mut written = 0usize;
        for word in words {
            let Some(chunk) = dst.get_mut(written * 4..written * 4 + 4) else {
                return Err(WyrmError::encode_overflow(format!(
                    "row {row} has more than {SEGMENT_SIDE} words"
                )));
            };
            chunk.copy_from_slice(&word.to_be_bytes());
            written += 1;
        }
        if written != SEGMENT_SIDE as usize {
            return Err(WyrmError::encode_overflow(format!(
                "row {row} has {written} words, expected {SEGMENT_SIDE}"
            )));
        }

        self.rows_pending += 1;
        if slot as u32 == ROWS_PER_DATAGRAM - 1 {
            self.rows_pending = 0;
            return Ok(Some(&self.buf[..]));
        }
        Ok(None)
    }

    /// Rows written since the last emitted datagram.
    pub fn rows_pending(&self) -> u32 {
        self.rows_pending
    }
}

/// A received datagram split into header and decoded pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedDatagram {
    /// Panel-select byte.
    pub select: u8,
    /// The 256 pixels in payload order.
    pub pixels: Vec<DecodedPixel>,
}

/// Parse a datagram the way the receiver does.
pub fn decode_datagram(bytes: &[u8]) -> WyrmResult<DecodedDatagram> {
    if bytes.len() != DATAGRAM_LEN {
        return Err(WyrmError::validation(format!(
            "datagram is {} bytes, expected {DATAGRAM_LEN}",
            bytes.len()
        )));
    }
    if bytes[1] != 0 {
        return Err(WyrmError::validation(format!(
            "reserved header byte is {:#04x}, expected 0x00",
            bytes[1]
        )));
    }

    let pixels = bytes[HEADER_LEN..]
        .chunks_exact(4)
        .map(|c| decode_pixel(u32::from_be_bytes([c[0], c[1], c[2], c[3]])))
        .collect();

    Ok(DecodedDatagram {
        select: bytes[0],
        pixels,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/wire/batch.rs"]
mod tests;
