use super::*;
use crate::wire::pixel::encode_pixel;

fn row_words(row: u32, rgb: [u8; 3]) -> Vec<u32> {
    (0..64).map(|col| encode_pixel(row, col, rgb)).collect()
}

#[test]
fn sizes_match_wire_contract() {
    assert_eq!(WORDS_PER_DATAGRAM, 256);
    assert_eq!(DATAGRAM_LEN, 1026);
    assert_eq!(DATAGRAMS_PER_SEGMENT, 16);
}

#[test]
fn emits_once_per_four_rows() {
    let mut b = PacketBatcher::new();
    b.begin_segment(0x04);

    let mut emitted = 0;
    for row in 0..64 {
        let out = b.push_row(row, row_words(row, [0, 0, 0])).unwrap();
        if row % 4 == 3 {
            let dgram = out.expect("block complete");
            assert_eq!(dgram.len(), DATAGRAM_LEN);
            assert_eq!(dgram[0], 0x04);
            assert_eq!(dgram[1], 0x00);
            emitted += 1;
        } else {
            assert!(out.is_none());
        }
    }
    assert_eq!(emitted, 16);
    assert_eq!(b.rows_pending(), 0);
}

#[test]
fn rows_land_at_their_block_offsets_big_endian() {
    let mut b = PacketBatcher::new();
    b.begin_segment(0x01);
    for row in 4..7 {
        assert!(b.push_row(row, row_words(row, [255, 0, 0])).unwrap().is_none());
    }
    let dgram = b
        .push_row(7, row_words(7, [0, 0, 255]))
        .unwrap()
        .unwrap()
        .to_vec();

    // Row 5, col 2 sits at word 64 * 1 + 2.
    let off = HEADER_LEN + (64 + 2) * 4;
    let expect = encode_pixel(5, 2, [255, 0, 0]).to_be_bytes();
    assert_eq!(&dgram[off..off + 4], &expect);

    let decoded = decode_datagram(&dgram).unwrap();
    assert_eq!(decoded.select, 0x01);
    assert_eq!(decoded.pixels.len(), 256);
    assert_eq!(decoded.pixels[0].row, 4);
    assert_eq!(decoded.pixels[255].row, 7);
    assert_eq!(decoded.pixels[255].col, 63);
    assert_eq!(decoded.pixels[255].blue, 63);
    assert_eq!(decoded.pixels[66].red, 63);
}

#[test]
fn short_or_long_rows_are_encode_overflows() {
    let mut b = PacketBatcher::new();
    b.begin_segment(0x01);
    let short = b.push_row(0, (0..10).map(|c| encode_pixel(0, c, [0, 0, 0])));
    assert!(matches!(short, Err(WyrmError::EncodeOverflow(_))));

    let long = b.push_row(0, std::iter::repeat_n(0u32, 65));
    assert!(matches!(long, Err(WyrmError::EncodeOverflow(_))));

    let beyond = b.push_row(64, std::iter::repeat_n(0u32, 64));
    assert!(matches!(beyond, Err(WyrmError::EncodeOverflow(_))));
}

#[test]
fn partial_block_never_leaks_into_the_next_segment() {
    let mut b = PacketBatcher::new();
    b.begin_segment(0x01);
    for row in 0..3 {
        assert!(b.push_row(row, row_words(row, [255, 0, 0])).unwrap().is_none());
    }

    // Closing row 3 under another panel would ship rows 0..2 of segment 0x01.
    b.begin_segment(0x02);
    let stale = b.push_row(3, row_words(3, [0, 0, 0]));
    assert!(matches!(stale, Err(WyrmError::EncodeOverflow(_))));

    // Skipping a row inside a block is rejected as well.
    b.push_row(0, row_words(0, [0, 0, 0])).unwrap();
    let skipped = b.push_row(2, row_words(2, [0, 0, 0]));
    assert!(matches!(skipped, Err(WyrmError::EncodeOverflow(_))));

    b.begin_segment(0x02);
    for row in 0..3 {
        b.push_row(row, row_words(row, [0, 0, 0])).unwrap();
    }
    let dgram = b.push_row(3, row_words(3, [0, 0, 0])).unwrap().unwrap().to_vec();
    let decoded = decode_datagram(&dgram).unwrap();
    assert_eq!(decoded.select, 0x02);
    assert!(decoded.pixels.iter().all(|p| p.red == 0));
}

#[test]
fn decode_rejects_bad_length_and_reserved_byte() {
    assert!(decode_datagram(&[0u8; 1024]).is_err());
    let mut bytes = vec![0u8; DATAGRAM_LEN];
    bytes[1] = 0x7F;
    assert!(decode_datagram(&bytes).is_err());
}
