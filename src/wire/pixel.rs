//! Per-pixel wire word packing.
//!
//! Bit layout of a word, MSB first:
//!
//! ```text
//! 31      18 17   12 11    6 5     0
//! [ addr:14 ][ blue ][ red  ][ green ]
//! ```
//!
//! `addr` is `row << 6 | col` (12 significant bits). Each colour slot carries the
//! six most significant bits of the 8-bit channel. The slot order is blue, red,
//! green and matches the panel wiring; it is not a typo for RGB.

/// Mask applied to each 8-bit channel before packing (RGB666).
pub const CHANNEL_MASK: u8 = 0xFC;

const COORD_MASK: u32 = 0x3F;

/// 12-bit segment-local pixel address.
///
/// Coordinates wrap modulo 64 in release builds; debug builds assert they are
/// already inside the panel.
pub fn encode_address(row: u32, col: u32) -> u32 {
    debug_assert!(
        row <= COORD_MASK && col <= COORD_MASK,
        "segment-local coordinate ({row}, {col}) outside 64x64 panel"
    );
    ((row & COORD_MASK) << 6) | (col & COORD_MASK)
}

/// Split a 12-bit address back into `(row, col)`.
pub fn decode_address(addr: u32) -> (u32, u32) {
    ((addr >> 6) & COORD_MASK, addr & COORD_MASK)
}

/// Pack one pixel into its host-order wire word.
pub fn encode_pixel(row: u32, col: u32, [r, g, b]: [u8; 3]) -> u32 {
    let addr = encode_address(row, col);
    let blue = u32::from(b & CHANNEL_MASK);
    let red = u32::from(r & CHANNEL_MASK);
    let green = u32::from(g & CHANNEL_MASK);
    (addr << 18) | (blue << 10) | (red << 4) | (green >> 2)
}

/// A wire word unpacked the way the receiver reads it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedPixel {
    /// Segment-local row.
    pub row: u32,
    /// Segment-local column.
    pub col: u32,
    /// Six-bit red.
    pub red: u8,
    /// Six-bit green.
    pub green: u8,
    /// Six-bit blue.
    pub blue: u8,
}

/// Unpack a host-order wire word.
pub fn decode_pixel(word: u32) -> DecodedPixel {
    let (row, col) = decode_address(word >> 18);
    DecodedPixel {
        row,
        col,
        blue: ((word >> 12) & 0x3F) as u8,
        red: ((word >> 6) & 0x3F) as u8,
        green: (word & 0x3F) as u8,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/wire/pixel.rs"]
mod tests;
